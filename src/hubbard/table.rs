//! # Hubbard 参数表
//!
//! 将 Hubbard 记录整理为表头 + 数据行的表格，数据行保持输入顺序。
//!
//! ## 每行内容
//! - 耦合类型
//! - `kind-manifold` 标签 (I, J)
//! - 显示序号 (I, J)，从 1 开始；J 为近邻周期像在 3×3×3 超胞中的序号
//! - 保留两位小数的耦合强度
//! - 平移向量
//! - 保留两位小数的周期像间距（另存全精度值）
//!
//! ## 依赖关系
//! - 被 `commands/`、`hubbard/selection.rs`、`hubbard/export.rs`、`hubbard/plot.rs` 使用
//! - 使用 `geometry/images.rs`、`geometry/distance.rs`

use crate::error::Result;
use crate::geometry::{image_distance, round_to, supercell_atomic_index, DISPLAY_DECIMALS};
use crate::models::{HubbardRecord, Structure};

use std::fmt;

/// 完整表格的表头
pub const HEADER: [&str; 8] = [
    "Hubbard parameters",
    "Atoms (I)",
    "Atoms (J)",
    "Index (I)",
    "Index (J)",
    "Value (eV)",
    "Translation vector",
    "Distance (Å)",
];

/// `kind-manifold` 形式的原子标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLabel {
    pub kind: String,
    pub manifold: String,
}

impl fmt::Display for SiteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.manifold)
    }
}

/// 表格数据行
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub hubbard_type: String,
    pub label_i: SiteLabel,
    pub label_j: SiteLabel,
    /// 参考原子序号，从 1 开始
    pub index_i: usize,
    /// 近邻周期像的超胞序号，从 1 开始
    pub index_j: usize,
    /// 耦合强度 (eV)，两位小数
    pub value: f64,
    /// 耦合强度 (eV)，输入原值
    pub value_exact: f64,
    pub translation: [i32; 3],
    /// 周期像间距 (Å)，两位小数
    pub distance: f64,
    /// 周期像间距 (Å)，全精度
    pub distance_exact: f64,
}

impl TableRow {
    /// 按完整表头顺序格式化为字符串单元格
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.hubbard_type.clone(),
            self.label_i.to_string(),
            self.label_j.to_string(),
            self.index_i.to_string(),
            self.index_j.to_string(),
            format!("{:.2}", self.value),
            format_translation(self.translation),
            format!("{:.2}", self.distance),
        ]
    }

    /// 简表单元格：Kind, Manifold, Neighbour kind, Neighbour manifold, Value (eV), Hubbard type
    ///
    /// 简表显示耦合强度原值，不做舍入。
    pub fn brief_cells(&self) -> [String; 6] {
        [
            self.label_i.kind.clone(),
            self.label_i.manifold.clone(),
            self.label_j.kind.clone(),
            self.label_j.manifold.clone(),
            self.value_exact.to_string(),
            self.hubbard_type.clone(),
        ]
    }
}

/// `[i, j, k]` 形式的平移向量
pub fn format_translation(t: [i32; 3]) -> String {
    format!("[{}, {}, {}]", t[0], t[1], t[2])
}

/// Hubbard 参数表
#[derive(Debug, Clone)]
pub struct HubbardTable {
    /// 数据行（不含表头），顺序与输入记录一致
    pub rows: Vec<TableRow>,
}

impl HubbardTable {
    /// 数据行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 第 0 行为表头，其余为数据行
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(HEADER.iter().map(|h| h.to_string()).collect());
        rows.extend(self.rows.iter().map(TableRow::cells));
        rows
    }
}

/// 由结构和 Hubbard 记录生成表格
///
/// 序号越界返回 `InvalidRecordIndex`，平移分量超出 {-1, 0, 1} 返回 `OutOfRangeTranslation`。
pub fn build_hubbard_table(
    structure: &Structure,
    records: &[HubbardRecord],
) -> Result<HubbardTable> {
    let natoms = structure.num_sites();

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            record.validate(i, natoms)?;

            let site_i = &structure.sites[record.atom_index];
            let site_j = &structure.sites[record.neighbour_index];

            let index_j =
                supercell_atomic_index(record.neighbour_index, natoms, record.translation)? + 1;

            let distance_exact = image_distance(
                site_i.position,
                site_j.position,
                record.translation,
                &structure.lattice,
            );

            Ok(TableRow {
                hubbard_type: record.hubbard_type.clone(),
                label_i: SiteLabel {
                    kind: site_i.kind_name.clone(),
                    manifold: record.atom_manifold.clone(),
                },
                label_j: SiteLabel {
                    kind: site_j.kind_name.clone(),
                    manifold: record.neighbour_manifold.clone(),
                },
                index_i: record.atom_index + 1,
                index_j,
                value: round_to(record.value, DISPLAY_DECIMALS),
                value_exact: record.value,
                translation: record.translation,
                distance: round_to(distance_exact, DISPLAY_DECIMALS),
                distance_exact,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(HubbardTable { rows })
}
