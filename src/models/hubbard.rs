//! # Hubbard 参数数据模型
//!
//! 输入数据中的 Hubbard 记录是松散类型的键值对（`RawHubbardRecord`），
//! 在系统边界处一次性校验并转换为强类型的 `HubbardRecord`。
//! 之后的计算不再重复检查序号的符号与平移向量长度。
//!
//! ## 依赖关系
//! - 被 `parsers/json.rs`、`parsers/hubbard_card.rs`、`hubbard/` 使用
//! - 使用 `models/structure.rs`

use crate::error::{HpError, Result};
use crate::models::Structure;

use serde::Deserialize;

/// 一条 Hubbard 耦合记录
#[derive(Debug, Clone, PartialEq)]
pub struct HubbardRecord {
    /// 参考原子序号（约化胞，从 0 开始）
    pub atom_index: usize,
    /// 参考原子的轨道流形，如 "3d"
    pub atom_manifold: String,
    /// 近邻原子序号（约化胞，从 0 开始）
    pub neighbour_index: usize,
    /// 近邻原子的轨道流形
    pub neighbour_manifold: String,
    /// 近邻所在周期像的整数平移向量
    pub translation: [i32; 3],
    /// 耦合强度 (eV)
    pub value: f64,
    /// 耦合类型，如 "Ueff"、"V"
    pub hubbard_type: String,
}

impl HubbardRecord {
    /// 是否为同一位点、零平移的在位项
    pub fn is_onsite(&self) -> bool {
        self.atom_index == self.neighbour_index && self.translation == [0, 0, 0]
    }

    /// 检查两个序号都落在 [0, natoms) 内
    pub fn validate(&self, record: usize, natoms: usize) -> Result<()> {
        for index in [self.atom_index, self.neighbour_index] {
            if index >= natoms {
                return Err(HpError::InvalidRecordIndex {
                    record,
                    index: index as i64,
                    natoms,
                });
            }
        }
        Ok(())
    }
}

/// 外部数据中的原始记录
///
/// 序号用有符号整数、平移向量用变长数组接收，以便报告而不是吞掉非法输入。
#[derive(Debug, Clone, Deserialize)]
pub struct RawHubbardRecord {
    pub atom_index: i64,
    pub atom_manifold: String,
    pub neighbour_index: i64,
    pub neighbour_manifold: String,
    /// 必填，缺失时反序列化失败
    pub translation: Vec<f64>,
    pub value: f64,
    pub hubbard_type: String,
}

impl RawHubbardRecord {
    /// 转换为强类型记录，`record` 为该记录在输入中的位置
    pub fn into_record(self, record: usize, natoms: usize) -> Result<HubbardRecord> {
        let atom_index = checked_index(self.atom_index, record, natoms)?;
        let neighbour_index = checked_index(self.neighbour_index, record, natoms)?;

        if self.translation.len() != 3 {
            return Err(HpError::InvalidFormat(format!(
                "Hubbard record {}: translation must have 3 components, got {}",
                record,
                self.translation.len()
            )));
        }

        let mut translation = [0i32; 3];
        for (slot, &component) in translation.iter_mut().zip(&self.translation) {
            if component.fract() != 0.0 || component.abs() > i32::MAX as f64 {
                return Err(HpError::InvalidFormat(format!(
                    "Hubbard record {}: translation component {} is not an integer",
                    record, component
                )));
            }
            *slot = component as i32;
        }

        Ok(HubbardRecord {
            atom_index,
            atom_manifold: self.atom_manifold,
            neighbour_index,
            neighbour_manifold: self.neighbour_manifold,
            translation,
            value: self.value,
            hubbard_type: self.hubbard_type,
        })
    }
}

fn checked_index(index: i64, record: usize, natoms: usize) -> Result<usize> {
    if index < 0 || index as u64 >= natoms as u64 {
        return Err(HpError::InvalidRecordIndex {
            record,
            index,
            natoms,
        });
    }
    Ok(index as usize)
}

/// 带 Hubbard 参数的结构
#[derive(Debug, Clone)]
pub struct HubbardStructure {
    /// 晶体结构
    pub structure: Structure,
    /// 已校验的 Hubbard 记录（保持输入顺序）
    pub records: Vec<HubbardRecord>,
    /// 投影子类型，如 "ortho-atomic"
    pub projectors: Option<String>,
    /// Hubbard 形式，如 "dudarev"
    pub formulation: Option<String>,
}

impl HubbardStructure {
    /// 创建并校验所有记录
    pub fn new(structure: Structure, records: Vec<HubbardRecord>) -> Result<Self> {
        let natoms = structure.num_sites();
        for (i, record) in records.iter().enumerate() {
            record.validate(i, natoms)?;
        }

        Ok(HubbardStructure {
            structure,
            records,
            projectors: None,
            formulation: None,
        })
    }

    /// 从原始记录创建
    pub fn from_raw(structure: Structure, raw: Vec<RawHubbardRecord>) -> Result<Self> {
        let natoms = structure.num_sites();
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_record(i, natoms))
            .collect::<Result<Vec<_>>>()?;

        Ok(HubbardStructure {
            structure,
            records,
            projectors: None,
            formulation: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Site};

    fn two_atom_structure() -> Structure {
        Structure::new(
            "cubic",
            Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]),
            vec![
                Site::new("Fe", [0.0, 0.0, 0.0]),
                Site::new("O", [1.0, 1.0, 1.0]),
            ],
        )
    }

    fn raw(atom_index: i64, neighbour_index: i64, translation: Vec<f64>) -> RawHubbardRecord {
        RawHubbardRecord {
            atom_index,
            atom_manifold: "3d".to_string(),
            neighbour_index,
            neighbour_manifold: "2p".to_string(),
            translation,
            value: 0.5,
            hubbard_type: "V".to_string(),
        }
    }

    #[test]
    fn test_raw_record_conversion() {
        let record = raw(0, 1, vec![1.0, 0.0, -1.0]).into_record(0, 2).unwrap();
        assert_eq!(record.atom_index, 0);
        assert_eq!(record.neighbour_index, 1);
        assert_eq!(record.translation, [1, 0, -1]);
        assert!(!record.is_onsite());
    }

    #[test]
    fn test_raw_record_negative_index() {
        let err = raw(-1, 1, vec![0.0, 0.0, 0.0]).into_record(3, 2).unwrap_err();
        match err {
            HpError::InvalidRecordIndex {
                record,
                index,
                natoms,
            } => {
                assert_eq!(record, 3);
                assert_eq!(index, -1);
                assert_eq!(natoms, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raw_record_bad_translation() {
        assert!(matches!(
            raw(0, 1, vec![0.0, 0.0]).into_record(0, 2),
            Err(HpError::InvalidFormat(_))
        ));
        assert!(matches!(
            raw(0, 1, vec![0.5, 0.0, 0.0]).into_record(0, 2),
            Err(HpError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_hubbard_structure_validates_records() {
        let bad = HubbardRecord {
            atom_index: 0,
            atom_manifold: "3d".to_string(),
            neighbour_index: 2,
            neighbour_manifold: "2p".to_string(),
            translation: [0, 0, 0],
            value: 1.0,
            hubbard_type: "V".to_string(),
        };
        assert!(matches!(
            HubbardStructure::new(two_atom_structure(), vec![bad]),
            Err(HpError::InvalidRecordIndex { index: 2, .. })
        ));
    }

    #[test]
    fn test_from_raw_keeps_order() {
        let hs = HubbardStructure::from_raw(
            two_atom_structure(),
            vec![
                raw(1, 0, vec![0.0, 0.0, 0.0]),
                raw(0, 0, vec![0.0, 0.0, 0.0]),
            ],
        )
        .unwrap();

        assert_eq!(hs.records.len(), 2);
        assert_eq!(hs.records[0].atom_index, 1);
        assert!(hs.records[1].is_onsite());
    }
}
