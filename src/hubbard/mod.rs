//! # Hubbard 参数处理模块
//!
//! Hubbard 记录的表格化、行选择、导出与绘图。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`、`geometry/`
//! - 子模块: table, selection, export, plot

pub mod export;
pub mod plot;
pub mod selection;
pub mod table;

pub use selection::select_row;
pub use table::{build_hubbard_table, HubbardTable};
