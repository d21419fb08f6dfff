//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `table`: Hubbard 参数表（终端 / CSV / JSON）
//! - `supercell`: 写出 3×3×3 显示超胞（支持批量）
//! - `select`: 表格行对应的超胞原子与聚焦位置
//! - `plot`: 耦合强度-距离图
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: table, supercell, select, plot

pub mod plot;
pub mod select;
pub mod supercell;
pub mod table;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// hpview - Hubbard 参数结果查看工具
#[derive(Parser)]
#[command(name = "hpview")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Inspect Hubbard parameter results: tables, periodic supercells and distances", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Print the Hubbard parameter table (optionally export CSV/JSON)
    Table(table::TableArgs),

    /// Write the 3x3x3 display supercell of a structure or a directory of structures
    Supercell(supercell::SupercellArgs),

    /// Show the supercell atoms to highlight for one table row
    Select(select::SelectArgs),

    /// Plot Hubbard values against the pair distance
    Plot(plot::PlotArgs),
}

/// 带 Hubbard 参数的输入（多个子命令共用）
#[derive(Args, Debug)]
pub struct HubbardInputArgs {
    /// JSON result document, or a POSCAR/CONTCAR combined with --hubbard
    pub input: PathBuf,

    /// Quantum ESPRESSO HUBBARD card (required when INPUT is a POSCAR)
    #[arg(long)]
    pub hubbard: Option<PathBuf>,
}
