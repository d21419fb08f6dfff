//! # 扩展 XYZ 格式写出
//!
//! 第二行写入 `Lattice="..."` 与 `Properties=species:S:1:pos:R:3`，
//! 可被 ASE、OVITO 等直接读入并保留晶胞。
//!
//! ## 依赖关系
//! - 被 `commands/supercell.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Structure;

/// 将结构转换为扩展 XYZ 格式字符串，原子顺序不变
pub fn to_extxyz_string(structure: &Structure) -> String {
    let m = structure.lattice.matrix;
    let lattice = m
        .iter()
        .flat_map(|row| row.iter())
        .map(|x| format!("{:.10}", x))
        .collect::<Vec<_>>()
        .join(" ");

    let mut result = String::new();
    result.push_str(&format!("{}\n", structure.sites.len()));
    result.push_str(&format!(
        "Lattice=\"{}\" Properties=species:S:1:pos:R:3 pbc=\"T T T\" name={}\n",
        lattice,
        structure.name.replace(' ', "_")
    ));

    for site in &structure.sites {
        let p = site.position;
        result.push_str(&format!(
            "{:<4} {:16.10} {:16.10} {:16.10}\n",
            site.kind_name, p[0], p[1], p[2]
        ));
    }

    result
}
