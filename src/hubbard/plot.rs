//! # 耦合强度-距离图
//!
//! 使用 `plotters` 绘制 Hubbard 耦合强度随周期像间距变化的散点图，
//! 每种耦合类型一个系列。
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 调用
//! - 使用 `hubbard/table.rs` 的 HubbardTable
//! - 使用 `plotters` 渲染图表

use crate::error::{HpError, Result};
use crate::hubbard::HubbardTable;

use plotters::prelude::*;
use std::path::Path;

/// 生成耦合强度-距离散点图（PNG 或 SVG）
pub fn generate_value_distance_plot(
    table: &HubbardTable,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if table.is_empty() {
        return Err(HpError::Other("No data to plot".to_string()));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, table, title)?;
        root.present()
            .map_err(|e| HpError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, table, title)?;
        root.present()
            .map_err(|e| HpError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 按出现顺序分组：(耦合类型, [(距离, 强度)])
fn group_by_type(table: &HubbardTable) -> Vec<(String, Vec<(f64, f64)>)> {
    let mut groups: Vec<(String, Vec<(f64, f64)>)> = Vec::new();

    for row in &table.rows {
        let point = (row.distance_exact, row.value_exact);
        match groups.iter_mut().find(|(t, _)| *t == row.hubbard_type) {
            Some((_, points)) => points.push(point),
            None => groups.push((row.hubbard_type.clone(), vec![point])),
        }
    }

    groups
}

/// 坐标范围，两端各留 10% 余量
fn padded_range(values: impl Iterator<Item = f64>, floor_at_zero: bool) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = (max - min).abs();
    let margin = if span > 0.0 { span * 0.1 } else { 0.5 };

    let lo = if floor_at_zero && min >= 0.0 {
        0.0
    } else {
        min - margin
    };
    (lo, max + margin)
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    table: &HubbardTable,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| HpError::Other(format!("{:?}", e)))?;

    let groups = group_by_type(table);
    let (x_min, x_max) = padded_range(table.rows.iter().map(|r| r.distance_exact), true);
    let (y_min, y_max) = padded_range(table.rows.iter().map(|r| r.value_exact), false);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| HpError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Distance (Å)")
        .y_desc("Value (eV)")
        .draw()
        .map_err(|e| HpError::Other(format!("{:?}", e)))?;

    for (i, (hubbard_type, points)) in groups.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
            )
            .map_err(|e| HpError::Other(format!("{:?}", e)))?
            .label(hubbard_type.as_str())
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| HpError::Other(format!("{:?}", e)))?;

    Ok(())
}
