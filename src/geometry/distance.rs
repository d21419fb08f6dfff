//! # 周期像间距
//!
//! 参考原子与近邻周期像之间的真实笛卡尔距离：
//! `‖ p_j + t · cell − p_i ‖`
//!
//! ## 依赖关系
//! - 被 `hubbard/table.rs` 调用
//! - 使用 `models/structure.rs` 的 Lattice

use crate::models::Lattice;

/// 表格显示的小数位数
pub const DISPLAY_DECIMALS: i32 = 2;

/// 参考原子 `p_i` 到平移 `translation` 后的近邻 `p_j` 的距离（Å），全精度
pub fn image_distance(
    p_i: [f64; 3],
    p_j: [f64; 3],
    translation: [i32; 3],
    lattice: &Lattice,
) -> f64 {
    let offset = lattice.cartesian_offset(translation);
    let d = [
        p_j[0] + offset[0] - p_i[0],
        p_j[1] + offset[1] - p_i[1],
        p_j[2] + offset[2] - p_i[2],
    ];
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// 保留 `decimals` 位小数
///
/// 按浮点数的精确十进制值舍入，恰好处于中间时取偶数位（0.125 -> 0.12）。
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let digits = decimals.max(0) as usize;
    format!("{:.*}", digits, x).parse().unwrap_or(x)
}
