//! # table 命令实现
//!
//! 生成 Hubbard 参数表并在终端显示，可选导出 CSV/JSON。
//!
//! ## 依赖关系
//! - 使用 `cli/table.rs` 定义的参数
//! - 使用 `hubbard/table.rs`、`hubbard/export.rs`
//! - 使用 `utils/output.rs`

use crate::cli::table::{TableArgs, TableLayout};
use crate::error::Result;
use crate::hubbard::{self, HubbardTable};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 完整表格行
#[derive(Debug, Clone, Tabled)]
struct FullRow {
    #[tabled(rename = "Hubbard parameters")]
    hubbard_type: String,
    #[tabled(rename = "Atoms (I)")]
    atoms_i: String,
    #[tabled(rename = "Atoms (J)")]
    atoms_j: String,
    #[tabled(rename = "Index (I)")]
    index_i: usize,
    #[tabled(rename = "Index (J)")]
    index_j: usize,
    #[tabled(rename = "Value (eV)")]
    value: String,
    #[tabled(rename = "Translation vector")]
    translation: String,
    #[tabled(rename = "Distance (Å)")]
    distance: String,
}

/// 简表行
#[derive(Debug, Clone, Tabled)]
struct BriefRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Manifold")]
    manifold: String,
    #[tabled(rename = "Neighbour kind")]
    neighbour_kind: String,
    #[tabled(rename = "Neighbour manifold")]
    neighbour_manifold: String,
    #[tabled(rename = "Value (eV)")]
    value: String,
    #[tabled(rename = "Hubbard type")]
    hubbard_type: String,
}

/// 执行 table 命令
pub fn execute(args: TableArgs) -> Result<()> {
    output::print_header("Hubbard Parameters");

    let hubbard = super::load_hubbard_input(&args.source)?;
    let table = hubbard::build_hubbard_table(&hubbard.structure, &hubbard.records)?;

    if table.is_empty() {
        output::print_warning("No Hubbard parameters found in the input.");
    } else {
        output::print_info(&format!("Layout: {}", args.layout));
        println!("{}", render(&table, args.layout));
    }

    if let Some(ref path) = args.csv {
        hubbard::export::to_csv(&table, path)?;
        output::print_success(&format!("Table saved to '{}'", path.display()));
    }

    if let Some(ref path) = args.json {
        hubbard::export::to_json(&table, path)?;
        output::print_success(&format!("Table saved to '{}'", path.display()));
    }

    Ok(())
}

/// 渲染终端表格
fn render(table: &HubbardTable, layout: TableLayout) -> Table {
    match layout {
        TableLayout::Full => {
            let rows: Vec<FullRow> = table
                .rows
                .iter()
                .map(|r| {
                    let cells = r.cells();
                    FullRow {
                        hubbard_type: r.hubbard_type.clone(),
                        atoms_i: cells[1].clone(),
                        atoms_j: cells[2].clone(),
                        index_i: r.index_i,
                        index_j: r.index_j,
                        value: cells[5].clone(),
                        translation: cells[6].clone(),
                        distance: cells[7].clone(),
                    }
                })
                .collect();
            Table::new(&rows)
        }
        TableLayout::Brief => {
            let rows: Vec<BriefRow> = table
                .rows
                .iter()
                .map(|r| {
                    let [kind, manifold, neighbour_kind, neighbour_manifold, value, hubbard_type] =
                        r.brief_cells();
                    BriefRow {
                        kind,
                        manifold,
                        neighbour_kind,
                        neighbour_manifold,
                        value,
                        hubbard_type,
                    }
                })
                .collect();
            Table::new(&rows)
        }
    }
}
