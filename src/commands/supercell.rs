//! # supercell 命令实现
//!
//! 为结构写出 3×3×3 显示超胞，原子顺序与 Hubbard 表中的 Index (J) 一致。
//!
//! ## 功能
//! - 单文件模式：输出到 `--output` 或输入文件旁
//! - 目录模式：按模式收集文件并行处理，已存在的输出默认跳过，
//!   已写出的超胞文件（`*_3x3x3`）不作为输入
//!
//! ## 依赖关系
//! - 使用 `cli/supercell.rs` 定义的参数
//! - 使用 `parsers/`, `geometry/supercell.rs`
//! - 使用 `batch/` 进行批量处理
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::supercell::{is_supercell_output, SupercellArgs, SupercellFormat};
use crate::error::{HpError, Result};
use crate::geometry::{build_supercell, Supercell};
use crate::parsers;
use crate::parsers::poscar::to_poscar_string;
use crate::parsers::xyz::to_extxyz_string;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 单个文件的处理配置
#[derive(Debug, Clone)]
struct SupercellConfig {
    format: SupercellFormat,
    output_dir: Option<PathBuf>,
    overwrite: bool,
}

/// 执行 supercell 命令
pub fn execute(args: SupercellArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(HpError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    if args.input.is_dir() {
        run_batch(args)
    } else {
        run_single(args)
    }
}

/// 单文件模式
fn run_single(args: SupercellArgs) -> Result<()> {
    output::print_header("3x3x3 Supercell");

    let structure = parsers::parse_structure_file(&args.input)?;
    output::print_success(&format!(
        "Loaded structure: {} ({} atoms, {})",
        structure.name,
        structure.num_sites(),
        structure.formula()
    ));

    let supercell = build_supercell(&structure);
    if supercell.is_empty() {
        output::print_warning("Structure has no atoms, writing an empty supercell.");
    }

    let output_path = match args.output {
        Some(path) => path,
        None => default_output_path(&args.input, None, args.format),
    };

    if output_path.exists() && !args.overwrite {
        output::print_warning(&format!(
            "'{}' already exists, use --overwrite to replace it",
            output_path.display()
        ));
        return Ok(());
    }

    write_supercell(&supercell, &output_path, args.format)?;
    output::print_written(
        &args.input.display().to_string(),
        &output_path.display().to_string(),
    );
    output::print_info(&format!(
        "{} atoms in supercell, origin cell occupies indices 1-{}",
        supercell.len(),
        supercell.base_sites
    ));

    Ok(())
}

/// 目录模式
fn run_batch(args: SupercellArgs) -> Result<()> {
    output::print_header(&format!("3x3x3 Supercells ({} format)", args.format));

    let files = collect_inputs(&args.input, &args.pattern, args.recursive)?;

    if files.is_empty() {
        return Err(HpError::NoFilesFound {
            pattern: args.pattern,
        });
    }

    if let Some(ref dir) = args.output {
        fs::create_dir_all(dir).map_err(|e| HpError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    output::print_info(&format!("Found {} structure file(s)", files.len()));

    let config = SupercellConfig {
        format: args.format,
        output_dir: args.output.clone(),
        overwrite: args.overwrite,
    };

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |path| {
        match process_file(path, &config) {
            Ok(status) => status,
            Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
        }
    })?;

    output::print_separator();
    output::print_done(&format!(
        "{} of {} file(s) written ({} skipped, {} failed)",
        result.success,
        result.total(),
        result.skipped,
        result.failed
    ));

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    Ok(())
}

/// 收集批量输入，排除已写出的超胞文件
fn collect_inputs(input: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let files = FileCollector::new(input.to_path_buf())
        .with_pattern(pattern)?
        .recursive(recursive)
        .collect();

    Ok(files
        .into_iter()
        .filter(|f| !is_supercell_output(f))
        .collect())
}

/// 处理单个结构文件
fn process_file(path: &Path, config: &SupercellConfig) -> Result<ProcessResult> {
    let output_path = default_output_path(path, config.output_dir.as_deref(), config.format);

    if output_path.exists() && !config.overwrite {
        return Ok(ProcessResult::Skipped(path.display().to_string()));
    }

    let structure = parsers::parse_structure_file(path)?;
    let supercell = build_supercell(&structure);
    write_supercell(&supercell, &output_path, config.format)?;

    Ok(ProcessResult::Success(output_path.display().to_string()))
}

/// 默认输出路径：指定目录或输入文件所在目录
fn default_output_path(input: &Path, output_dir: Option<&Path>, format: SupercellFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure");

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    dir.join(format.output_name(stem))
}

/// 按格式写出超胞
fn write_supercell(supercell: &Supercell, path: &Path, format: SupercellFormat) -> Result<()> {
    let content = match format {
        SupercellFormat::Poscar => to_poscar_string(&supercell.structure),
        SupercellFormat::Xyz => to_extxyz_string(&supercell.structure),
    };

    fs::write(path, content).map_err(|e| HpError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSCAR: &str = "\
pair
1.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Fe O
1 1
Direct
0.0 0.0 0.0
0.5 0.5 0.5
";

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hpview_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("runs/NiO.json"), None, SupercellFormat::Poscar);
        assert_eq!(path, PathBuf::from("runs/POSCAR_NiO_3x3x3"));

        let path = default_output_path(
            Path::new("runs/NiO.json"),
            Some(Path::new("out")),
            SupercellFormat::Xyz,
        );
        assert_eq!(path, PathBuf::from("out/NiO_3x3x3.xyz"));
    }

    #[test]
    fn test_process_file_writes_and_skips() {
        let dir = temp_dir("supercell");
        let input = dir.join("pair.vasp");
        fs::write(&input, POSCAR).unwrap();

        let config = SupercellConfig {
            format: SupercellFormat::Poscar,
            output_dir: None,
            overwrite: false,
        };

        let first = process_file(&input, &config).unwrap();
        assert!(matches!(first, ProcessResult::Success(_)));

        let written = parsers::poscar::parse_poscar_file(&dir.join("POSCAR_pair_3x3x3")).unwrap();
        assert_eq!(written.num_sites(), 54);
        assert_eq!(written.sites[0].kind_name, "Fe");
        assert_eq!(written.sites[1].kind_name, "O");

        let second = process_file(&input, &config).unwrap();
        assert!(matches!(second, ProcessResult::Skipped(_)));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_batch_rerun_ignores_written_supercells() {
        let dir = temp_dir("supercell_rerun");
        fs::write(dir.join("pair.vasp"), POSCAR).unwrap();
        let pattern = "*.json,POSCAR*,CONTCAR*,*.vasp";

        for format in [SupercellFormat::Poscar, SupercellFormat::Xyz] {
            let config = SupercellConfig {
                format,
                output_dir: None,
                overwrite: true,
            };
            for _ in 0..2 {
                let files = collect_inputs(&dir, pattern, false).unwrap();
                assert_eq!(files, vec![dir.join("pair.vasp")]);
                for file in &files {
                    assert!(matches!(
                        process_file(file, &config).unwrap(),
                        ProcessResult::Success(_)
                    ));
                }
            }
        }

        assert!(dir.join("POSCAR_pair_3x3x3").exists());
        assert!(!dir.join("POSCAR_POSCAR_pair_3x3x3_3x3x3").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_process_file_reports_parse_error() {
        let dir = temp_dir("supercell_bad");
        let input = dir.join("broken.vasp");
        fs::write(&input, "not a poscar").unwrap();

        let config = SupercellConfig {
            format: SupercellFormat::Xyz,
            output_dir: None,
            overwrite: true,
        };
        assert!(process_file(&input, &config).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
