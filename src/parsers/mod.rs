//! # 解析器模块
//!
//! 读取结构文件与 Hubbard 参数，写出结构文件。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: json, poscar, hubbard_card, xyz

pub mod hubbard_card;
pub mod json;
pub mod poscar;
pub mod xyz;

use crate::error::{HpError, Result};
use crate::models::{HubbardStructure, Structure};
use std::path::Path;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

fn is_poscar_name(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    name.starts_with("POSCAR")
        || name.starts_with("CONTCAR")
        || extension(path) == "vasp"
        || extension(path) == "poscar"
}

/// 从文件路径推断格式并解析结构
pub fn parse_structure_file(path: &Path) -> Result<Structure> {
    if !path.exists() {
        return Err(HpError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    if extension(path) == "json" {
        return json::parse_json_file(path).map(|hs| hs.structure);
    }
    if is_poscar_name(path) {
        return poscar::parse_poscar_file(path);
    }

    Err(HpError::UnsupportedFormat(format!(
        "Cannot determine format for: {}",
        path.display()
    )))
}

/// 读取结构及其 Hubbard 参数
///
/// - `.json` 文档自带 Hubbard 参数，此时不能再给出卡片
/// - POSCAR/CONTCAR 需配合 `HUBBARD` 卡片文件
pub fn parse_hubbard_input(path: &Path, hubbard_card: Option<&Path>) -> Result<HubbardStructure> {
    if !path.exists() {
        return Err(HpError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    if extension(path) == "json" {
        if hubbard_card.is_some() {
            return Err(HpError::InvalidArgument(
                "--hubbard cannot be combined with a JSON document".to_string(),
            ));
        }
        return json::parse_json_file(path);
    }

    let card = hubbard_card.ok_or_else(|| {
        HpError::InvalidArgument(format!(
            "'{}' has no Hubbard parameters; pass a HUBBARD card with --hubbard",
            path.display()
        ))
    })?;

    if !card.exists() {
        return Err(HpError::FileNotFound {
            path: card.display().to_string(),
        });
    }

    let structure = parse_structure_file(path)?;
    hubbard_card::parse_hubbard_card_file(card, structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poscar_name_detection() {
        assert!(is_poscar_name(Path::new("POSCAR")));
        assert!(is_poscar_name(Path::new("run/CONTCAR_relaxed")));
        assert!(is_poscar_name(Path::new("NiO.vasp")));
        assert!(!is_poscar_name(Path::new("NiO.cif")));
    }

    #[test]
    fn test_missing_input() {
        assert!(matches!(
            parse_structure_file(Path::new("/nonexistent/POSCAR")),
            Err(HpError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_poscar_with_card() {
        let dir = std::env::temp_dir().join(format!("hpview_parsers_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let poscar = dir.join("POSCAR");
        let card = dir.join("HUBBARD.dat");

        std::fs::write(
            &poscar,
            "NiO\n1.0\n4.0 0 0\n0 4.0 0\n0 0 4.0\nNi O\n1 1\nDirect\n0 0 0\n0.5 0 0\n",
        )
        .unwrap();
        std::fs::write(&card, "HUBBARD {ortho-atomic}\nV Ni-3d O-2p 1 2 0.4\n").unwrap();

        let hs = parse_hubbard_input(&poscar, Some(&card)).unwrap();
        assert_eq!(hs.structure.num_sites(), 2);
        assert_eq!(hs.records[0].neighbour_index, 1);

        assert!(matches!(
            parse_hubbard_input(&poscar, None),
            Err(HpError::InvalidArgument(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
