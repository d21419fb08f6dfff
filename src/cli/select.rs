//! # select 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/select.rs`

use super::HubbardInputArgs;
use clap::Args;

/// select 子命令参数
#[derive(Args, Debug)]
pub struct SelectArgs {
    #[command(flatten)]
    pub source: HubbardInputArgs,

    /// Data row of the Hubbard table (1 = first row below the header)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub row: u64,
}
