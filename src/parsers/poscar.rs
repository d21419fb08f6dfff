//! # VASP POSCAR 格式解析器
//!
//! 解析 VASP POSCAR/CONTCAR 文件格式，并写出保持原子顺序的 POSCAR。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (negative: target volume)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! 写出时只合并相邻的同种原子，元素行可以重复出现（如 `Fe O Fe O`），
//! 从而保证超胞序号与文件中的原子顺序一致。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`、`commands/supercell.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{HpError, Result};
use crate::models::{Lattice, Site, Structure};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| HpError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

fn parse_error(name: &str, reason: impl Into<String>) -> HpError {
    HpError::ParseError {
        format: "poscar".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 8 {
        return Err(parse_error(default_name, "File too short"));
    }

    // Line 0: Comment/name
    let name = lines[0].trim().to_string();
    let name = if name.is_empty() {
        default_name.to_string()
    } else {
        name
    };

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .trim()
        .parse()
        .map_err(|_| parse_error(&name, format!("Invalid scaling factor '{}'", lines[1].trim())))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(parse_error(
                &name,
                format!("Invalid lattice vector at line {}", 3 + i),
            ));
        }
        *row = [parts[0], parts[1], parts[2]];
    }

    // 负的缩放系数表示目标晶胞体积
    let raw_volume = Lattice::from_vectors(matrix).volume().abs();
    let scale = if scale > 0.0 {
        scale
    } else if scale < 0.0 && raw_volume > 1e-10 {
        (-scale / raw_volume).cbrt()
    } else {
        return Err(parse_error(
            &name,
            format!("Invalid scaling factor '{}'", lines[1].trim()),
        ));
    };
    let lattice = Lattice::from_vectors(matrix).scaled([scale, scale, scale]);

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    if line5_parts.is_empty() {
        return Err(parse_error(&name, "Missing species line"));
    }
    let (elements, counts, atom_line_start) = if line5_parts[0].parse::<usize>().is_ok() {
        // VASP 4: 没有元素行，使用占位名称
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let elements: Vec<String> = (0..counts.len()).map(|i| format!("X{}", i + 1)).collect();
        (elements, counts, 6)
    } else {
        let elements: Vec<String> = line5_parts.iter().map(|s| s.to_string()).collect();
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (elements, counts, 7)
    };

    if elements.len() != counts.len() {
        return Err(parse_error(
            &name,
            format!(
                "{} species names but {} atom counts",
                elements.len(),
                counts.len()
            ),
        ));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = atom_line_start;
    if lines.len() > coord_line
        && lines[coord_line]
            .trim()
            .to_lowercase()
            .starts_with('s')
    {
        coord_line += 1;
    }

    if lines.len() <= coord_line {
        return Err(parse_error(&name, "Missing coordinate type line"));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // 原子坐标，统一存为笛卡尔坐标
    let mut sites: Vec<Site> = Vec::new();
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let parts: Vec<f64> = lines
                .get(line_idx)
                .map(|l| {
                    l.split_whitespace()
                        .take(3)
                        .filter_map(|s| s.parse().ok())
                        .collect()
                })
                .unwrap_or_default();

            if parts.len() < 3 {
                return Err(parse_error(
                    &name,
                    format!("Invalid or missing atom position at line {}", line_idx + 1),
                ));
            }

            let position = if is_cartesian {
                [parts[0] * scale, parts[1] * scale, parts[2] * scale]
            } else {
                lattice.frac_to_cart([parts[0], parts[1], parts[2]])
            };
            sites.push(Site::new(elem.clone(), position));
            line_idx += 1;
        }
    }

    Ok(Structure::new(name, lattice, sites))
}

/// 相邻同种原子分组：[(kind, count)]
fn species_runs(structure: &Structure) -> Vec<(&str, usize)> {
    let mut runs: Vec<(&str, usize)> = Vec::new();
    for site in &structure.sites {
        match runs.last_mut() {
            Some((kind, count)) if *kind == site.kind_name => *count += 1,
            _ => runs.push((site.kind_name.as_str(), 1)),
        }
    }
    runs
}

/// 将结构转换为 POSCAR 格式字符串（笛卡尔坐标，保持原子顺序）
pub fn to_poscar_string(structure: &Structure) -> String {
    let runs = species_runs(structure);
    let mut result = String::new();

    result.push_str(&format!("{}\n", structure.name));
    result.push_str("1.0\n");

    for row in &structure.lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    let kinds: Vec<&str> = runs.iter().map(|(k, _)| *k).collect();
    let counts: Vec<String> = runs.iter().map(|(_, n)| n.to_string()).collect();
    result.push_str(&format!("   {}\n", kinds.join("   ")));
    result.push_str(&format!("   {}\n", counts.join("   ")));

    result.push_str("Cartesian\n");

    for site in &structure.sites {
        let p = site.position;
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            p[0], p[1], p[2]
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poscar_direct() {
        let content = r#"NiO
1.0
4.17 0.0 0.0
0.0 4.17 0.0
0.0 0.0 4.17
Ni O
2 2
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.0
0.0 0.5 0.0
"#;
        let structure = parse_poscar_content(content, "NiO").unwrap();
        assert_eq!(structure.name, "NiO");
        assert_eq!(structure.num_sites(), 4);
        assert_eq!(structure.sites[1].kind_name, "Ni");
        assert_eq!(structure.sites[2].kind_name, "O");

        // 分数坐标已转换为笛卡尔坐标
        let p = structure.sites[1].position;
        assert!((p[0] - 2.085).abs() < 1e-9);
        assert!((p[1] - 2.085).abs() < 1e-9);
        assert!(p[2].abs() < 1e-12);
    }

    #[test]
    fn test_parse_poscar_with_scale_and_cartesian() {
        let content = r#"Si
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Cartesian
0.0 0.0 0.0
1.0 1.0 1.0
"#;
        let structure = parse_poscar_content(content, "Si").unwrap();
        let (a, _, _, _, _, _) = structure.lattice.parameters();

        assert!((a - 4.0).abs() < 1e-9);
        assert_eq!(structure.sites[1].position, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_parse_poscar_negative_scale_is_volume() {
        let content = r#"Si
-64.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Cartesian
0.0 0.0 0.0
1.0 1.0 1.0
"#;
        let structure = parse_poscar_content(content, "Si").unwrap();

        assert!((structure.lattice.volume() - 64.0).abs() < 1e-9);
        assert!((structure.lattice.matrix[0][0] - 4.0).abs() < 1e-9);
        // 笛卡尔坐标使用同一缩放系数
        assert!((structure.sites[1].position[2] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_poscar_zero_scale() {
        let content = "Si\n0.0\n2 0 0\n0 2 0\n0 0 2\nSi\n1\nDirect\n0 0 0\n";
        assert!(matches!(
            parse_poscar_content(content, "Si"),
            Err(HpError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_poscar_selective_dynamics() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.5 0.5 0.5 F F F
"#;
        let structure = parse_poscar_content(content, "Fe").unwrap();
        assert_eq!(structure.num_sites(), 2);
    }

    #[test]
    fn test_parse_poscar_missing_positions() {
        let content = r#"Broken
1.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Fe
3
Direct
0.0 0.0 0.0
"#;
        assert!(matches!(
            parse_poscar_content(content, "Broken"),
            Err(HpError::ParseError { .. })
        ));
    }

    #[test]
    fn test_poscar_writer_preserves_order() {
        let lattice = Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        let sites = vec![
            Site::new("Mn", [0.0, 0.0, 0.0]),
            Site::new("O", [2.0, 0.0, 0.0]),
            Site::new("Mn", [2.0, 2.0, 0.0]),
            Site::new("O", [0.0, 2.0, 0.0]),
            Site::new("O", [0.0, 0.0, 2.0]),
        ];
        let structure = Structure::new("MnO", lattice, sites);

        let text = to_poscar_string(&structure);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), ["Mn", "O", "Mn", "O"]);
        assert_eq!(lines[6].split_whitespace().collect::<Vec<_>>(), ["1", "1", "1", "2"]);

        let parsed = parse_poscar_content(&text, "round_trip").unwrap();
        assert_eq!(parsed.num_sites(), 5);
        for (a, b) in parsed.sites.iter().zip(&structure.sites) {
            assert_eq!(a.kind_name, b.kind_name);
            for i in 0..3 {
                assert!((a.position[i] - b.position[i]).abs() < 1e-8);
            }
        }
    }
}
