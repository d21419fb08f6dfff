//! # 3×3×3 显示超胞
//!
//! 将结构沿三个晶格方向各复制三份（偏移 -1..=1），原始胞位于中心，
//! 用于无歧义地显示跨胞的 Hubbard 耦合。
//!
//! ## 算法
//! 1. 按 `IMAGE_OFFSETS` 顺序遍历 27 个偏移 (i, j, k)，slot 0 为原点胞
//! 2. 每个副本整体平移 (i+1, j+1, k+1) 个晶胞，原点胞因此落在 (1, 1, 1) 处
//! 3. 依次拼接，超胞中第 `slot * natoms + n` 个原子是位点 n 在该 slot 的像
//! 4. 晶格向量各乘 3
//!
//! ## 依赖关系
//! - 被 `commands/supercell.rs`、`commands/select.rs` 调用
//! - 使用 `geometry/images.rs` 的编号表

use crate::geometry::images::{IMAGE_OFFSETS, NUM_IMAGES};
use crate::models::{Site, Structure};

/// 每个方向的复制数
pub const REPEATS: usize = 3;

/// 超胞构建结果
#[derive(Debug, Clone)]
pub struct Supercell {
    /// 合并后的结构（晶格已放大）
    pub structure: Structure,
    /// 与 `structure.sites` 一一对应的来源偏移 (i, j, k)
    pub origin_offsets: Vec<[i32; 3]>,
    /// 原始胞的原子数
    pub base_sites: usize,
}

impl Supercell {
    /// 超胞原子数
    pub fn len(&self) -> usize {
        self.structure.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure.sites.is_empty()
    }

    /// 超胞中第 `index` 个原子在原始胞中的序号
    pub fn base_index(&self, index: usize) -> Option<usize> {
        if index < self.len() && self.base_sites > 0 {
            Some(index % self.base_sites)
        } else {
            None
        }
    }
}

/// 构建 3×3×3 超胞，不修改输入结构
pub fn build_supercell(structure: &Structure) -> Supercell {
    let natoms = structure.num_sites();
    let lattice = &structure.lattice;

    let mut sites: Vec<Site> = Vec::with_capacity(NUM_IMAGES * natoms);
    let mut origin_offsets = Vec::with_capacity(NUM_IMAGES * natoms);

    for &offset in &IMAGE_OFFSETS {
        let shift = lattice.cartesian_offset([offset[0] + 1, offset[1] + 1, offset[2] + 1]);
        sites.extend(structure.sites.iter().map(|site| site.translated(shift)));
        origin_offsets.extend(std::iter::repeat(offset).take(natoms));
    }

    let factor = REPEATS as f64;
    let lattice = lattice.scaled([factor, factor, factor]);

    Supercell {
        structure: Structure::new(format!("{}_3x3x3", structure.name), lattice, sites),
        origin_offsets,
        base_sites: natoms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::images::supercell_atomic_index;
    use crate::models::Lattice;

    fn sample_structure() -> Structure {
        Structure::new(
            "sample",
            Lattice::from_vectors([[2.0, 0.0, 0.0], [0.5, 3.0, 0.0], [0.0, 0.2, 4.0]]),
            vec![
                Site::new("Fe", [0.0, 0.0, 0.0]),
                Site::new("O", [1.0, 1.0, 1.0]),
                Site::new("O", [0.3, 2.0, 3.0]),
            ],
        )
    }

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-9)
    }

    #[test]
    fn test_supercell_size() {
        let structure = sample_structure();
        let sc = build_supercell(&structure);
        assert_eq!(sc.len(), 27 * structure.num_sites());
        assert_eq!(sc.origin_offsets.len(), sc.len());
        assert_eq!(sc.structure.name, "sample_3x3x3");
    }

    #[test]
    fn test_supercell_cell_is_tripled() {
        let structure = sample_structure();
        let sc = build_supercell(&structure);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(
                    sc.structure.lattice.matrix[i][j],
                    3.0 * structure.lattice.matrix[i][j]
                );
            }
        }
    }

    #[test]
    fn test_origin_cell_sits_at_center() {
        let structure = sample_structure();
        let sc = build_supercell(&structure);
        let center = structure.lattice.cartesian_offset([1, 1, 1]);

        for (n, site) in structure.sites.iter().enumerate() {
            assert_eq!(sc.origin_offsets[n], [0, 0, 0]);
            assert!(close(sc.structure.sites[n].position, site.translated(center).position));
        }
    }

    #[test]
    fn test_origin_copy_not_duplicated() {
        let sc = build_supercell(&sample_structure());
        let origin_count = sc
            .origin_offsets
            .iter()
            .filter(|&&o| o == [0, 0, 0])
            .count();
        assert_eq!(origin_count, 3);
    }

    #[test]
    fn test_resolver_addresses_matching_geometry() {
        let structure = sample_structure();
        let sc = build_supercell(&structure);
        let center = structure.lattice.cartesian_offset([1, 1, 1]);
        let natoms = structure.num_sites();

        for &t in &IMAGE_OFFSETS {
            for n in 0..natoms {
                let abs = supercell_atomic_index(n, natoms, t).unwrap();
                let expected = structure.sites[n]
                    .translated(center)
                    .translated(structure.lattice.cartesian_offset(t));

                assert_eq!(sc.origin_offsets[abs], t);
                assert_eq!(sc.base_index(abs), Some(n));
                assert_eq!(sc.structure.sites[abs].kind_name, structure.sites[n].kind_name);
                assert!(close(sc.structure.sites[abs].position, expected.position));
            }
        }
    }

    #[test]
    fn test_supercell_is_repeatable_and_pure() {
        let structure = sample_structure();
        let before = structure.clone();
        let a = build_supercell(&structure);
        let b = build_supercell(&structure);

        assert_eq!(structure, before);
        assert_eq!(a.structure, b.structure);
        assert_eq!(a.origin_offsets, b.origin_offsets);
    }

    #[test]
    fn test_empty_structure() {
        let structure = Structure::new("empty", sample_structure().lattice, vec![]);
        let sc = build_supercell(&structure);
        assert!(sc.is_empty());
        assert_eq!(sc.base_index(0), None);
    }
}
