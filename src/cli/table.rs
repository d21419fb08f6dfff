//! # table 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/table.rs`

use super::HubbardInputArgs;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 表格布局
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum TableLayout {
    /// Type, labels, indices, value, translation and distance
    #[default]
    Full,
    /// Kind, manifold, neighbour kind/manifold, value and type
    Brief,
}

impl std::fmt::Display for TableLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableLayout::Full => write!(f, "full"),
            TableLayout::Brief => write!(f, "brief"),
        }
    }
}

/// table 子命令参数
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub source: HubbardInputArgs,

    /// Table layout printed to the terminal
    #[arg(long, value_enum, default_value = "full")]
    pub layout: TableLayout,

    /// Also write the full table as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Also write the full table as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}
