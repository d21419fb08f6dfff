//! # Hubbard 结构 JSON 文档解析器
//!
//! 读取计算结果导出的 JSON 文档（结构 + Hubbard 参数）。
//!
//! ## 文档格式
//! ```text
//! {
//!   "name": "NiO",                                   // 可选
//!   "cell": [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]],
//!   "cell_parameters": [a, b, c, alpha, beta, gamma], // 无 "cell" 时使用
//!   "sites": [{"kind_name": "Ni", "position": [x, y, z]}, ...],
//!   "hubbard": {                                     // 可选
//!     "parameters": [
//!       {"atom_index": 0, "atom_manifold": "3d",
//!        "neighbour_index": 1, "neighbour_manifold": "2p",
//!        "translation": [0, 0, 0], "value": 0.5, "hubbard_type": "V"}
//!     ],
//!     "projectors": "ortho-atomic",                  // 可选
//!     "formulation": "dudarev"                       // 可选
//!   }
//! }
//! ```
//! 位点坐标为笛卡尔坐标（Å），序号从 0 开始。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`
//! - 使用 `serde_json` 反序列化

use crate::error::{HpError, Result};
use crate::models::{HubbardStructure, Lattice, RawHubbardRecord, Site, Structure};

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct StructureDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cell: Option<[[f64; 3]; 3]>,
    #[serde(default)]
    cell_parameters: Option<[f64; 6]>,
    sites: Vec<Site>,
    #[serde(default)]
    hubbard: Option<HubbardSection>,
}

#[derive(Debug, Deserialize)]
struct HubbardSection {
    #[serde(default)]
    parameters: Vec<RawHubbardRecord>,
    #[serde(default)]
    projectors: Option<String>,
    #[serde(default)]
    formulation: Option<String>,
}

/// 解析 JSON 文件
pub fn parse_json_file(path: &Path) -> Result<HubbardStructure> {
    let content = fs::read_to_string(path).map_err(|e| HpError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_json_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
    .map_err(|e| match e {
        HpError::JsonError(err) => HpError::ParseError {
            format: "json".to_string(),
            path: path.display().to_string(),
            reason: err.to_string(),
        },
        other => other,
    })
}

/// 从字符串内容解析 JSON 文档
pub fn parse_json_content(content: &str, default_name: &str) -> Result<HubbardStructure> {
    let doc: StructureDocument = serde_json::from_str(content)?;

    let name = doc
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_name.to_string());
    let lattice = match (doc.cell, doc.cell_parameters) {
        (Some(matrix), _) => Lattice::from_vectors(matrix),
        (None, Some([a, b, c, alpha, beta, gamma])) => {
            Lattice::from_parameters(a, b, c, alpha, beta, gamma)
        }
        (None, None) => {
            return Err(HpError::InvalidFormat(format!(
                "Structure '{}' has neither 'cell' nor 'cell_parameters'",
                name
            )))
        }
    };
    let structure = Structure::new(name, lattice, doc.sites);

    let Some(section) = doc.hubbard else {
        return HubbardStructure::new(structure, Vec::new());
    };

    let mut hubbard = HubbardStructure::from_raw(structure, section.parameters)?;
    hubbard.projectors = section.projectors;
    hubbard.formulation = section.formulation;

    Ok(hubbard)
}
