//! Error-reduction improvement chart: horizontal bars of the percentage drop
//! in total failed requests between variants.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use plotters::prelude::*;

use cacheviz_core::aggregate::{percent_improvement, sum_reduce};
use cacheviz_core::model::{ExperimentRecord, Variant};

use crate::style::{ACCENT_COLOR, ML_COLOR, SELF_HEALING_COLOR};

pub const IMPROVEMENT_CHART_FILE: &str = "improvement_chart_real.png";

/// Horizontal bars: self-healing vs baseline, ML vs baseline, ML vs
/// self-healing, each as error reduction percent over summed failures.
pub fn improvement_chart(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    ensure!(!record.scenarios.is_empty(), "no scenarios to compare");

    let failed = |variant| sum_reduce(record, variant, |m| m.failed_requests as f64);
    let baseline = failed(Variant::Baseline);
    let self_healing = failed(Variant::SelfHealing);
    let ml = failed(Variant::SelfHealingMl);

    let rows = [
        (
            "Self-Healing vs Baseline",
            SELF_HEALING_COLOR,
            percent_improvement(baseline, self_healing),
        ),
        (
            "ML vs Baseline",
            ML_COLOR,
            percent_improvement(baseline, ml),
        ),
        (
            "ML vs Self-Healing",
            ACCENT_COLOR,
            percent_improvement(self_healing, ml),
        ),
    ];

    let path = out_dir.join(IMPROVEMENT_CHART_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    // A regression shows as a leftward bar instead of being clipped away.
    let min = rows.iter().map(|(_, _, v)| *v).fold(0.0f64, f64::min);
    let x_range = (min - 5.0).min(0.0)..108.0;
    let n = rows.len();

    let mut chart = ChartBuilder::on(&root)
        .caption("Error Reduction: Improvements Over Baseline", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(190)
        .build_cartesian_2d(x_range, -0.6f64..(n as f64 - 0.4))?;

    let labels: Vec<&str> = rows.iter().map(|(l, _, _)| *l).collect();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(WHITE)
        .x_desc("Error Reduction (%)")
        .y_labels(n)
        .y_label_formatter(&move |y: &f64| {
            let i = y.round();
            if (y - i).abs() < 0.25 && i >= 0.0 && (i as usize) < labels.len() {
                labels[i as usize].to_string()
            } else {
                String::new()
            }
        })
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(i, (_, color, v))| {
        let mut bar = Rectangle::new(
            [(0.0, i as f64 - 0.35), (*v, i as f64 + 0.35)],
            color.mix(0.85).filled(),
        );
        bar.set_margin(2, 2, 0, 0);
        bar
    }))?;

    chart.draw_series(rows.iter().enumerate().map(|(i, (_, _, v))| {
        Text::new(
            format!("{}{:.1}%", if *v >= 0.0 { "+" } else { "" }, v),
            (*v + 1.5, i as f64),
            ("sans-serif", 15).into_font().color(&BLACK),
        )
    }))?;

    root.present()?;
    Ok(path)
}
