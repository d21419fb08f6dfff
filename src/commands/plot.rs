//! # plot 命令实现
//!
//! 绘制 Hubbard 耦合强度随周期像间距的分布图。
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `hubbard/table.rs`、`hubbard/plot.rs`
//! - 使用 `utils/output.rs`

use crate::cli::plot::PlotArgs;
use crate::error::Result;
use crate::hubbard;
use crate::utils::output;

use std::path::Path;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    output::print_header("Hubbard Value vs Distance");

    let hubbard = super::load_hubbard_input(&args.source)?;
    let table = hubbard::build_hubbard_table(&hubbard.structure, &hubbard.records)?;

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| hubbard.structure.name.clone());
    let use_svg = is_svg(&args.output);

    hubbard::plot::generate_value_distance_plot(
        &table,
        &args.output,
        &title,
        args.width,
        args.height,
        use_svg,
    )?;

    output::print_success(&format!(
        "Plot saved to '{}' ({} points)",
        args.output.display(),
        table.len()
    ));

    Ok(())
}

/// 按扩展名判断是否输出 SVG
fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}
