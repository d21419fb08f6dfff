//! # Quantum ESPRESSO `HUBBARD` 卡片解析器
//!
//! 解析 pw.x 输入中的 `HUBBARD` 卡片，结合结构文件得到 Hubbard 记录。
//!
//! ## 卡片格式说明
//! ```text
//! HUBBARD {ortho-atomic}
//! U  Ni-3d  6.70
//! V  Ni-3d  O-2p  1  19  0.35
//! ```
//! - 在位项（U、J0、Hp、B 等）：`<type> <kind>-<manifold> <value>`，
//!   对应该 kind 的第一个位点，平移为 (0, 0, 0)
//! - 格点间项 V：`V <kind_i>-<m_i> <kind_j>-<m_j> <i> <j> <value>`，
//!   `i`、`j` 为 3×3×3 超胞中的序号（从 1 开始），编号见 `geometry/images.rs`；
//!   `i` 必须位于原点胞
//!
//! 以 `#` 或 `!` 开头的行与空行被忽略；数值允许 Fortran 的 `d` 指数。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `geometry/images.rs` 还原 (约化序号, 平移向量)
//! - 使用 `regex` 解析标签与卡片头

use crate::error::{HpError, Result};
use crate::geometry::images::split_supercell_index;
use crate::models::{HubbardRecord, HubbardStructure, Structure};

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^HUBBARD\s*[\(\{]?\s*([A-Za-z-]*)\s*[\)\}]?\s*$")
            .expect("HUBBARD header pattern is valid")
    })
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)-(\S+)$").expect("label pattern is valid")
    })
}

/// 解析卡片文件，`structure` 提供位点与 kind
pub fn parse_hubbard_card_file(path: &Path, structure: Structure) -> Result<HubbardStructure> {
    let content = fs::read_to_string(path).map_err(|e| HpError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_hubbard_card(&content, &path.display().to_string(), structure)
}

/// 从字符串内容解析卡片
pub fn parse_hubbard_card(
    content: &str,
    source: &str,
    structure: Structure,
) -> Result<HubbardStructure> {
    let err = |line_no: usize, reason: String| HpError::ParseError {
        format: "hubbard".to_string(),
        path: source.to_string(),
        reason: format!("line {}: {}", line_no, reason),
    };

    let mut projectors = None;
    let mut records = Vec::new();
    let mut seen_header = false;

    for (i, raw_line) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        if !seen_header {
            let caps = header_regex()
                .captures(line)
                .ok_or_else(|| err(line_no, format!("expected HUBBARD header, got '{}'", line)))?;
            projectors = caps
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .filter(|p| !p.is_empty());
            seen_header = true;
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let record = if tokens[0].eq_ignore_ascii_case("V") {
            parse_intersite(&tokens, records.len(), &structure).map_err(|r| err(line_no, r))?
        } else {
            parse_onsite(&tokens, &structure).map_err(|r| err(line_no, r))?
        };
        records.push(record);
    }

    if !seen_header {
        return Err(err(0, "missing HUBBARD header".to_string()));
    }

    let mut hubbard = HubbardStructure::new(structure, records)?;
    hubbard.projectors = projectors;
    Ok(hubbard)
}

/// `kind-manifold` 标签
fn split_label(label: &str) -> std::result::Result<(&str, &str), String> {
    label_regex()
        .captures(label)
        .and_then(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .ok_or_else(|| format!("invalid label '{}', expected <kind>-<manifold>", label))
}

/// Fortran 风格的实数，如 `0.35d0`
fn parse_value(token: &str) -> std::result::Result<f64, String> {
    token
        .replace(['d', 'D'], "e")
        .parse()
        .map_err(|_| format!("invalid value '{}'", token))
}

fn parse_onsite(
    tokens: &[&str],
    structure: &Structure,
) -> std::result::Result<HubbardRecord, String> {
    if tokens.len() != 3 {
        return Err(format!(
            "{} line needs 3 fields, got {}",
            tokens[0],
            tokens.len()
        ));
    }

    let (kind, manifold) = split_label(tokens[1])?;
    let index = structure
        .first_site_of_kind(kind)
        .ok_or_else(|| format!("kind '{}' not found in structure", kind))?;

    Ok(HubbardRecord {
        atom_index: index,
        atom_manifold: manifold.to_string(),
        neighbour_index: index,
        neighbour_manifold: manifold.to_string(),
        translation: [0, 0, 0],
        value: parse_value(tokens[2])?,
        hubbard_type: tokens[0].to_string(),
    })
}

fn parse_intersite(
    tokens: &[&str],
    record: usize,
    structure: &Structure,
) -> std::result::Result<HubbardRecord, String> {
    if tokens.len() != 6 {
        return Err(format!("V line needs 6 fields, got {}", tokens.len()));
    }

    let (kind_i, manifold_i) = split_label(tokens[1])?;
    let (kind_j, manifold_j) = split_label(tokens[2])?;
    let natoms = structure.num_sites();

    let resolve = |token: &str| -> std::result::Result<(usize, [i32; 3]), String> {
        let one_based: usize = token
            .parse()
            .map_err(|_| format!("invalid atom index '{}'", token))?;
        if one_based == 0 {
            return Err("atom indices start at 1".to_string());
        }
        split_supercell_index(one_based - 1, natoms, record).map_err(|e| e.to_string())
    };

    let (atom_index, atom_translation) = resolve(tokens[3])?;
    let (neighbour_index, translation) = resolve(tokens[4])?;

    if atom_translation != [0, 0, 0] {
        return Err(format!(
            "first atom index {} is outside the reference cell",
            tokens[3]
        ));
    }

    for (index, kind) in [(atom_index, kind_i), (neighbour_index, kind_j)] {
        let actual = &structure.sites[index].kind_name;
        if actual != kind {
            return Err(format!(
                "label '{}' does not match site {} of kind '{}'",
                kind,
                index + 1,
                actual
            ));
        }
    }

    Ok(HubbardRecord {
        atom_index,
        atom_manifold: manifold_i.to_string(),
        neighbour_index,
        neighbour_manifold: manifold_j.to_string(),
        translation,
        value: parse_value(tokens[5])?,
        hubbard_type: "V".to_string(),
    })
}
