//! # 周期像编号
//!
//! 3×3×3 胞块中 27 个周期像的统一编号表，以及
//! (约化序号, 平移向量) <-> 超胞绝对序号 的相互转换。
//!
//! ## 编号约定
//! `IMAGE_OFFSETS` 为 (0, -1, 1) 在三个方向上的笛卡尔积，最后一个分量变化最快：
//! ```text
//! slot 0  -> ( 0,  0,  0)   原点胞
//! slot 1  -> ( 0,  0, -1)
//! slot 2  -> ( 0,  0,  1)
//! slot 3  -> ( 0, -1,  0)
//! ...
//! slot 26 -> ( 1,  1,  1)
//! ```
//! 与 Quantum ESPRESSO `HUBBARD` 卡片中 V 项的超胞原子编号一致。
//!
//! 超胞构建 (`geometry/supercell.rs`) 按同一张表拼接原子，
//! 因此 `slot * natoms + index` 既是表格显示的序号，也是超胞中原子的位置。
//!
//! ## 依赖关系
//! - 被 `geometry/supercell.rs`、`hubbard/table.rs`、`parsers/hubbard_card.rs` 使用

use crate::error::{HpError, Result};

/// 胞块中周期像的数量
pub const NUM_IMAGES: usize = 27;

/// 每个方向上的取值顺序
const AXIS_ORDER: [i32; 3] = [0, -1, 1];

/// 27 个周期像的平移向量，下标即 slot
pub const IMAGE_OFFSETS: [[i32; 3]; NUM_IMAGES] = build_offsets();

const fn build_offsets() -> [[i32; 3]; NUM_IMAGES] {
    let mut table = [[0i32; 3]; NUM_IMAGES];
    let mut slot = 0;
    while slot < NUM_IMAGES {
        table[slot] = [
            AXIS_ORDER[slot / 9],
            AXIS_ORDER[(slot / 3) % 3],
            AXIS_ORDER[slot % 3],
        ];
        slot += 1;
    }
    table
}

/// 单个分量在 `AXIS_ORDER` 中的位置
fn axis_position(component: i32) -> Option<usize> {
    AXIS_ORDER.iter().position(|&c| c == component)
}

/// 平移向量对应的 slot
pub fn block_offset(translation: [i32; 3]) -> Result<usize> {
    let mut slot = 0;
    for component in translation {
        let pos = axis_position(component)
            .ok_or(HpError::OutOfRangeTranslation { translation })?;
        slot = slot * 3 + pos;
    }
    Ok(slot)
}

/// 周期像在超胞中的绝对序号（从 0 开始）
///
/// 显示时由调用方加 1。
pub fn supercell_atomic_index(index: usize, natoms: usize, translation: [i32; 3]) -> Result<usize> {
    Ok(block_offset(translation)? * natoms + index)
}

/// `supercell_atomic_index` 的逆：绝对序号 -> (约化序号, 平移向量)
///
/// `record` 仅用于错误信息。
pub fn split_supercell_index(
    index: usize,
    natoms: usize,
    record: usize,
) -> Result<(usize, [i32; 3])> {
    if natoms == 0 || index >= NUM_IMAGES * natoms {
        return Err(HpError::InvalidRecordIndex {
            record,
            index: index as i64,
            natoms: NUM_IMAGES * natoms,
        });
    }
    Ok((index % natoms, IMAGE_OFFSETS[index / natoms]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_offsets_are_unique_and_complete() {
        let set: HashSet<[i32; 3]> = IMAGE_OFFSETS.iter().copied().collect();
        assert_eq!(set.len(), NUM_IMAGES);
        for t in &IMAGE_OFFSETS {
            assert!(t.iter().all(|c| (-1..=1).contains(c)));
        }
    }

    #[test]
    fn test_known_slots() {
        assert_eq!(IMAGE_OFFSETS[0], [0, 0, 0]);
        assert_eq!(IMAGE_OFFSETS[1], [0, 0, -1]);
        assert_eq!(IMAGE_OFFSETS[2], [0, 0, 1]);
        assert_eq!(IMAGE_OFFSETS[3], [0, -1, 0]);
        assert_eq!(IMAGE_OFFSETS[9], [-1, 0, 0]);
        assert_eq!(IMAGE_OFFSETS[26], [1, 1, 1]);
    }

    #[test]
    fn test_block_offset_matches_table() {
        for (slot, &t) in IMAGE_OFFSETS.iter().enumerate() {
            assert_eq!(block_offset(t).unwrap(), slot);
        }
    }

    #[test]
    fn test_origin_translation_is_identity() {
        for index in 0..5 {
            assert_eq!(supercell_atomic_index(index, 5, [0, 0, 0]).unwrap(), index);
        }
    }

    #[test]
    fn test_supercell_index_is_injective() {
        let natoms = 4;
        let mut seen = HashSet::new();
        for index in 0..natoms {
            for &t in &IMAGE_OFFSETS {
                let abs = supercell_atomic_index(index, natoms, t).unwrap();
                assert!(abs < NUM_IMAGES * natoms);
                assert!(seen.insert(abs), "duplicate index {abs}");
            }
        }
        assert_eq!(seen.len(), NUM_IMAGES * natoms);
    }

    #[test]
    fn test_out_of_range_translation() {
        let err = supercell_atomic_index(0, 2, [2, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            HpError::OutOfRangeTranslation {
                translation: [2, 0, 0]
            }
        ));
        assert!(block_offset([0, 0, -2]).is_err());
    }

    #[test]
    fn test_split_inverts_resolver() {
        let natoms = 3;
        for index in 0..natoms {
            for &t in &IMAGE_OFFSETS {
                let abs = supercell_atomic_index(index, natoms, t).unwrap();
                assert_eq!(split_supercell_index(abs, natoms, 0).unwrap(), (index, t));
            }
        }
        assert!(split_supercell_index(81, natoms, 0).is_err());
        assert!(split_supercell_index(0, 0, 0).is_err());
    }
}
