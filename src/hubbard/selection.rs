//! # 表格行选择
//!
//! 由表格中的一行得到需要在超胞中高亮的两个原子（从 0 开始的序号）
//! 以及相机聚焦位置。表格序号从 1 开始，这里减 1 还原。
//!
//! ## 依赖关系
//! - 被 `commands/select.rs` 调用
//! - 使用 `hubbard/table.rs`、`geometry/supercell.rs`

use crate::error::{HpError, Result};
use crate::geometry::Supercell;
use crate::hubbard::HubbardTable;

/// 一行对应的选择结果
#[derive(Debug, Clone, PartialEq)]
pub struct RowSelection {
    /// 超胞中的原子序号 [I, J]，从 0 开始
    pub atom_indices: [usize; 2],
    /// 聚焦位置：原子 I 在超胞中的笛卡尔坐标
    pub focus: [f64; 3],
}

/// 选择第 `row` 个数据行（从 0 开始，不含表头）
pub fn select_row(table: &HubbardTable, supercell: &Supercell, row: usize) -> Result<RowSelection> {
    let entry = table.rows.get(row).ok_or_else(|| {
        HpError::InvalidArgument(format!(
            "Row {} out of range (table has {} rows)",
            row,
            table.len()
        ))
    })?;

    let atom_indices = [entry.index_i - 1, entry.index_j - 1];
    for &index in &atom_indices {
        if index >= supercell.len() {
            return Err(HpError::InvalidArgument(format!(
                "Atom {} is not part of the supercell ({} atoms)",
                index,
                supercell.len()
            )));
        }
    }

    Ok(RowSelection {
        atom_indices,
        focus: supercell.structure.sites[atom_indices[0]].position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::build_supercell;
    use crate::hubbard::build_hubbard_table;
    use crate::models::{HubbardRecord, Lattice, Site, Structure};

    fn structure() -> Structure {
        Structure::new(
            "pair",
            Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]),
            vec![
                Site::new("Fe", [0.0, 0.0, 0.0]),
                Site::new("O", [1.0, 1.0, 1.0]),
            ],
        )
    }

    fn record(translation: [i32; 3]) -> HubbardRecord {
        HubbardRecord {
            atom_index: 0,
            atom_manifold: "3d".to_string(),
            neighbour_index: 1,
            neighbour_manifold: "2p".to_string(),
            translation,
            value: 0.8,
            hubbard_type: "V".to_string(),
        }
    }

    #[test]
    fn test_selection_matches_supercell_geometry() {
        let structure = structure();
        let supercell = build_supercell(&structure);
        let table =
            build_hubbard_table(&structure, &[record([0, 0, 0]), record([1, 0, -1])]).unwrap();

        for (row, entry) in table.rows.iter().enumerate() {
            let selection = select_row(&table, &supercell, row).unwrap();
            let [i, j] = selection.atom_indices;

            // 超胞中两原子的距离等于表格中的周期像间距
            let pi = supercell.structure.sites[i].position;
            let pj = supercell.structure.sites[j].position;
            let d = ((pj[0] - pi[0]).powi(2) + (pj[1] - pi[1]).powi(2) + (pj[2] - pi[2]).powi(2))
                .sqrt();
            assert!((d - entry.distance_exact).abs() < 1e-9);

            // 聚焦于中心胞中的原子 I
            assert_eq!(selection.focus, [2.0, 2.0, 2.0]);
        }
    }

    #[test]
    fn test_selection_row_out_of_range() {
        let structure = structure();
        let supercell = build_supercell(&structure);
        let table = build_hubbard_table(&structure, &[record([0, 0, 0])]).unwrap();

        assert!(matches!(
            select_row(&table, &supercell, 1),
            Err(HpError::InvalidArgument(_))
        ));
    }
}
