//! # select 命令实现
//!
//! 将 Hubbard 表的一行映射到 3×3×3 超胞中的两个原子，并给出聚焦位置。
//!
//! ## 依赖关系
//! - 使用 `cli/select.rs` 定义的参数
//! - 使用 `geometry/supercell.rs`、`hubbard/selection.rs`
//! - 使用 `utils/output.rs`

use crate::cli::select::SelectArgs;
use crate::error::{HpError, Result};
use crate::geometry::build_supercell;
use crate::hubbard::{self, table::format_translation};
use crate::utils::output;

use colored::Colorize;

/// 执行 select 命令
pub fn execute(args: SelectArgs) -> Result<()> {
    output::print_header("Row Selection");

    let hubbard = super::load_hubbard_input(&args.source)?;
    let table = hubbard::build_hubbard_table(&hubbard.structure, &hubbard.records)?;
    let supercell = build_supercell(&hubbard.structure);

    let row = usize::try_from(args.row - 1)
        .map_err(|_| HpError::InvalidArgument(format!("Row {} is too large", args.row)))?;
    let selection = hubbard::select_row(&table, &supercell, row)?;
    let entry = &table.rows[row];

    output::print_info(&format!(
        "Row {}: {} {} - {} ({:.2} eV, {:.2} Å)",
        args.row,
        entry.hubbard_type,
        entry.label_i,
        entry.label_j,
        entry.value,
        entry.distance
    ));

    for (name, &index) in ["I", "J"].iter().zip(selection.atom_indices.iter()) {
        let site = &supercell.structure.sites[index];
        let base = supercell.base_index(index).unwrap_or(index);
        println!(
            "  {} supercell atom {:>5} ({}), site {} in cell {}",
            format!("{}:", name).bold(),
            index,
            site.kind_name,
            base + 1,
            format_translation(supercell.origin_offsets[index])
        );
    }

    let f = selection.focus;
    let frac = hubbard.structure.lattice.cart_to_frac(f);
    println!(
        "  {} [{:.4}, {:.4}, {:.4}] Å, [{:.4}, {:.4}, {:.4}] in unit-cell coordinates",
        "Focus:".bold(),
        f[0],
        f[1],
        f[2],
        frac[0],
        frac[1],
        frac[2]
    );

    Ok(())
}
