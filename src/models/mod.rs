//! # 数据模型模块
//!
//! 定义晶体结构与 Hubbard 参数的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`geometry/`、`hubbard/` 和 `commands/` 使用
//! - 子模块: structure, hubbard

pub mod hubbard;
pub mod structure;

pub use hubbard::{HubbardRecord, HubbardStructure, RawHubbardRecord};
pub use structure::{Lattice, Site, Structure};
