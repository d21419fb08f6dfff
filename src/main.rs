//! # hpview - Hubbard 参数查看工具
//!
//! 读取带 Hubbard 参数 (U/V) 的结构，生成参数表、3×3×3 显示超胞和耦合强度-距离图。
//!
//! ## 子命令
//! - `table`     - Hubbard 参数表（终端显示，可导出 CSV/JSON）
//! - `supercell` - 写出 3×3×3 显示超胞（单文件或批量）
//! - `select`    - 将表格行映射为超胞中的原子对
//! - `plot`      - 耦合强度随周期像间距的散点图
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (JSON、POSCAR、HUBBARD 卡片)
//!   │     ├── geometry/  (周期像编号、间距、超胞)
//!   │     ├── hubbard/   (表格、选择、导出、绘图)
//!   │     ├── batch/     (批量处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod geometry;
mod hubbard;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
