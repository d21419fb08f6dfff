//! # supercell 子命令 CLI 定义
//!
//! 写出 3×3×3 显示超胞，输入可以是单个结构文件或目录（批量模式）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/supercell.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 超胞输出文件名的标记
pub const SUPERCELL_SUFFIX: &str = "_3x3x3";

/// 超胞输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SupercellFormat {
    /// VASP POSCAR (Cartesian, atom order preserved)
    Poscar,
    /// Extended XYZ with lattice
    Xyz,
}

impl SupercellFormat {
    /// 由输入文件名生成输出文件名
    pub fn output_name(&self, stem: &str) -> String {
        match self {
            SupercellFormat::Poscar => format!("POSCAR_{}{}", stem, SUPERCELL_SUFFIX),
            SupercellFormat::Xyz => format!("{}{}.xyz", stem, SUPERCELL_SUFFIX),
        }
    }
}

/// 文件是否为本命令写出的超胞（任一格式）
pub fn is_supercell_output(path: &std::path::Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(SUPERCELL_SUFFIX))
        .unwrap_or(false)
}

impl std::fmt::Display for SupercellFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupercellFormat::Poscar => write!(f, "poscar"),
            SupercellFormat::Xyz => write!(f, "xyz"),
        }
    }
}

/// supercell 子命令参数
#[derive(Args, Debug)]
pub struct SupercellArgs {
    /// Input: structure file (JSON document or POSCAR) or directory of structure files
    pub input: PathBuf,

    /// Output: file path (single mode) or directory (batch mode); defaults next to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        default_value = "poscar",
        env = "HPVIEW_SUPERCELL_FORMAT"
    )]
    pub format: SupercellFormat,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.json,POSCAR*")
    #[arg(long, default_value = "*.json,POSCAR*,CONTCAR*,*.vasp")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0, env = "HPVIEW_JOBS")]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name() {
        assert_eq!(SupercellFormat::Poscar.output_name("NiO"), "POSCAR_NiO_3x3x3");
        assert_eq!(SupercellFormat::Xyz.output_name("NiO"), "NiO_3x3x3.xyz");
    }

    #[test]
    fn test_output_names_are_recognised() {
        use std::path::Path;

        for format in [SupercellFormat::Poscar, SupercellFormat::Xyz] {
            assert!(is_supercell_output(Path::new(&format.output_name("NiO"))));
        }
        assert!(!is_supercell_output(Path::new("POSCAR")));
        assert!(!is_supercell_output(Path::new("NiO.json")));
        assert!(!is_supercell_output(Path::new("POSCAR_3x3x3_relaxed")));
    }
}
