//! # Hubbard 参数表导出
//!
//! ## 支持格式
//! - CSV: 表头 + 数据行，与终端表格列一致
//! - JSON: `{ "header": [...], "rows": [{...}] }`，数值保持为数字
//!
//! ## 依赖关系
//! - 被 `commands/table.rs` 调用
//! - 使用 `hubbard/table.rs` 的 HubbardTable
//! - 使用 `csv`、`serde_json` 写入文件

use crate::error::{HpError, Result};
use crate::hubbard::table::{HubbardTable, HEADER};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON 导出的单行
#[derive(Debug, Serialize)]
struct RowRecord<'a> {
    hubbard_type: &'a str,
    atoms_i: String,
    atoms_j: String,
    index_i: usize,
    index_j: usize,
    value: f64,
    translation: [i32; 3],
    distance: f64,
}

#[derive(Debug, Serialize)]
struct TableDocument<'a> {
    header: [&'static str; 8],
    rows: Vec<RowRecord<'a>>,
}

/// 导出为 CSV
pub fn to_csv(table: &HubbardTable, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for row in table.to_rows() {
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(|e| HpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出为 JSON
pub fn to_json(table: &HubbardTable, output_path: &Path) -> Result<()> {
    let document = TableDocument {
        header: HEADER,
        rows: table
            .rows
            .iter()
            .map(|r| RowRecord {
                hubbard_type: &r.hubbard_type,
                atoms_i: r.label_i.to_string(),
                atoms_j: r.label_j.to_string(),
                index_i: r.index_i,
                index_j: r.index_j,
                value: r.value,
                translation: r.translation,
                distance: r.distance,
            })
            .collect(),
    };

    let file = File::create(output_path).map_err(|e| HpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &document)?;
    writeln!(writer).map_err(|e| HpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
