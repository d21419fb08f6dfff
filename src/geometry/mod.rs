//! # 周期几何模块
//!
//! 周期像编号、周期像间距与 3×3×3 显示超胞。
//!
//! ## 依赖关系
//! - 被 `hubbard/` 和 `commands/` 使用
//! - 使用 `models/structure.rs`
//! - 子模块: images, distance, supercell

pub mod distance;
pub mod images;
pub mod supercell;

pub use distance::{image_distance, round_to, DISPLAY_DECIMALS};
pub use images::supercell_atomic_index;
pub use supercell::{build_supercell, Supercell};
