//! Time-series charts: recovery curves, MTTR comparison, and latency
//! area-under-curve panels.
//!
//! These are the best-effort tier: a scenario without a complete set of time
//! series for all three variants is skipped, and a chart with nothing left to
//! show is skipped entirely (the caller logs and moves on).

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::warn;

use cacheviz_core::aggregate::{latency_auc, mean_time_to_recovery};
use cacheviz_core::model::{ExperimentRecord, SamplePoint, ScenarioResult, Variant};

use crate::bars::{GroupedBars, ValueFormat};
use crate::style::{pretty_label, variant_color};

pub const MTTR_COMPARISON_FILE: &str = "mttr_comparison.png";
pub const LATENCY_AUC_FILE: &str = "latency_auc_comparison.png";

/// Scenarios whose hit-rate dips make recovery curves worth a figure each.
pub const STRESS_SCENARIOS: [&str; 4] = [
    "cascading_failure",
    "gradual_degradation",
    "recovery_stress_test",
    "cache_corruption",
];

/// Scenarios featured in the latency AUC panel grid.
pub const KEY_SCENARIOS: [&str; 4] = [
    "cascading_failure",
    "gradual_degradation",
    "high_failure",
    "recovery_stress_test",
];

/// All three variants' series, or `None` when any is missing or empty.
fn full_series(scenario: &ScenarioResult) -> Option<[(Variant, &[SamplePoint]); 3]> {
    let mut out = Vec::with_capacity(3);
    for variant in Variant::ALL {
        let series = scenario.variant(variant).time_series.as_deref()?;
        if series.is_empty() {
            return None;
        }
        out.push((variant, series));
    }
    out.try_into().ok()
}

fn rate_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    y_range: std::ops::Range<f64>,
    series: &[(Variant, &[SamplePoint])],
    rate: impl Fn(&SamplePoint) -> f64,
) -> Result<()> {
    let x_max = series
        .iter()
        .flat_map(|(_, s)| s.iter())
        .map(|p| p.request_number as f64)
        .fold(1.0f64, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..x_max * 1.02, y_range)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .x_desc("Request Number")
        .y_desc(y_desc)
        .draw()?;

    for (variant, points) in series {
        let color = variant_color(*variant);
        chart
            .draw_series(LineSeries::new(
                points
                    .iter()
                    .map(|p| (p.request_number as f64, rate(p) * 100.0)),
                color.stroke_width(3),
            ))?
            .label(variant.label())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(3))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// One two-panel figure (hit rate, success rate) per stress scenario with
/// complete time series. Returns the paths written.
pub fn recovery_curves(record: &ExperimentRecord, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for name in STRESS_SCENARIOS {
        let Some(scenario) = record.scenarios.get(name) else {
            continue;
        };
        let Some(series) = full_series(scenario) else {
            warn!(scenario = name, "incomplete time series, skipping recovery curve");
            continue;
        };

        let path = out_dir.join(format!("recovery_curve_{name}.png"));
        let backend_path = path.clone();
        let root = BitMapBackend::new(&backend_path, (1200, 1000)).into_drawing_area();
        root.fill(&WHITE)?;
        let panels = root.split_evenly((2, 1));

        rate_panel(
            &panels[0],
            &format!("Hit Rate Recovery - {}", pretty_label(name)),
            "Cache Hit Rate (%)",
            0.0..105.0,
            &series,
            |p| p.hit_rate,
        )?;
        rate_panel(
            &panels[1],
            &format!("Success Rate Recovery - {}", pretty_label(name)),
            "Success Rate (%)",
            85.0..105.0,
            &series,
            |p| p.success_rate,
        )?;

        root.present()?;
        written.push(path);
    }

    Ok(written)
}

/// Grouped bars of mean time to recovery per scenario. Scenarios missing any
/// variant's series, or where no variant ever dipped, are omitted; with
/// nothing left the chart is skipped and `None` returned.
pub fn mttr_comparison(record: &ExperimentRecord, out_dir: &Path) -> Result<Option<PathBuf>> {
    let mut categories = Vec::new();
    let mut columns: [Vec<f64>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    for (name, scenario) in &record.scenarios {
        let Some(series) = full_series(scenario) else {
            continue;
        };
        let mttrs: Vec<f64> = series
            .iter()
            .map(|(_, s)| mean_time_to_recovery(s))
            .collect();
        if mttrs.iter().all(|&v| v == 0.0) {
            continue;
        }
        categories.push(pretty_label(name));
        for (column, value) in columns.iter_mut().zip(&mttrs) {
            column.push(*value);
        }
    }

    if categories.is_empty() {
        warn!("no scenario produced MTTR samples, skipping chart");
        return Ok(None);
    }

    let path = out_dir.join(MTTR_COMPARISON_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let series = Variant::ALL
        .iter()
        .zip(columns)
        .map(|(&variant, values)| {
            (variant.label().to_string(), variant_color(variant), values)
        })
        .collect();

    GroupedBars {
        title: "MTTR Comparison: Time to Recover Cache Hit Rate".to_string(),
        x_desc: "Scenario".to_string(),
        y_desc: "Mean Time To Recovery (requests)".to_string(),
        categories,
        series,
        y_range: None,
        value_labels: Some(ValueFormat::Count),
        legend: true,
    }
    .render(&root)?;

    root.present()?;
    Ok(Some(path))
}

fn auc_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    series: [(Variant, &[SamplePoint]); 3],
) -> Result<()> {
    let points = |s: &[SamplePoint]| -> Vec<(f64, f64)> {
        s.iter()
            .map(|p| (p.request_number as f64, p.avg_latency))
            .collect()
    };

    let x_max = series
        .iter()
        .flat_map(|(_, s)| s.iter())
        .map(|p| p.request_number as f64)
        .fold(1.0f64, f64::max);
    let y_max = series
        .iter()
        .flat_map(|(_, s)| s.iter())
        .map(|p| p.avg_latency)
        .fold(0.0f64, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..x_max * 1.02, 0f64..(y_max * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .x_desc("Request Number")
        .y_desc("Avg Latency (ms)")
        .draw()?;

    for (variant, samples) in series {
        let color = variant_color(variant);
        let auc = latency_auc(samples);
        chart
            .draw_series(
                AreaSeries::new(points(samples), 0.0, color.mix(0.3))
                    .border_style(color.stroke_width(2)),
            )?
            .label(format!("{} (AUC: {auc:.0})", variant.label()))
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.mix(0.6).filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Panel grid of filled latency curves for the key scenarios, AUC in the
/// legend. `None` when no key scenario has complete series.
pub fn latency_auc_comparison(
    record: &ExperimentRecord,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let available: Vec<(&str, [(Variant, &[SamplePoint]); 3])> = KEY_SCENARIOS
        .iter()
        .filter_map(|&name| {
            record
                .scenarios
                .get(name)
                .and_then(full_series)
                .map(|series| (name, series))
        })
        .collect();

    if available.is_empty() {
        warn!("no key scenario has complete latency series, skipping AUC chart");
        return Ok(None);
    }

    let path = out_dir.join(LATENCY_AUC_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    for (panel, (name, series)) in panels.iter().zip(available) {
        auc_panel(panel, &pretty_label(name), series)?;
    }

    root.present()?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dip_series(offset: u64) -> Vec<SamplePoint> {
        (1..=30)
            .map(|i| {
                let hit_rate = if (10..10 + offset).contains(&i) { 0.7 } else { 0.99 };
                SamplePoint {
                    request_number: i,
                    hit_rate,
                    success_rate: hit_rate,
                    avg_latency: 1.0 + (1.0 - hit_rate) * 4.0,
                }
            })
            .collect()
    }

    fn record_with_series(names: &[&str]) -> ExperimentRecord {
        let mut record = ExperimentRecord::default();
        for name in names {
            let mut scenario = ScenarioResult::default();
            scenario.baseline.time_series = Some(dip_series(12));
            scenario.self_healing.time_series = Some(dip_series(6));
            scenario.self_healing_ml.time_series = Some(dip_series(2));
            record.scenarios.insert((*name).to_string(), scenario);
        }
        record
    }

    #[test]
    fn recovery_curves_only_for_stress_scenarios_with_full_series() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = record_with_series(&["cascading_failure", "steady_load"]);
        // Stress scenario with a missing variant series gets skipped.
        let mut partial = ScenarioResult::default();
        partial.baseline.time_series = Some(dip_series(3));
        record
            .scenarios
            .insert("cache_corruption".to_string(), partial);

        let written = recovery_curves(&record, dir.path()).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["recovery_curve_cascading_failure.png"]);
    }

    #[test]
    fn mttr_chart_skipped_when_nothing_dips() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = ExperimentRecord::default();
        let mut scenario = ScenarioResult::default();
        let healthy: Vec<SamplePoint> = (1..=10)
            .map(|i| SamplePoint {
                request_number: i,
                hit_rate: 0.99,
                success_rate: 0.99,
                avg_latency: 1.0,
            })
            .collect();
        scenario.baseline.time_series = Some(healthy.clone());
        scenario.self_healing.time_series = Some(healthy.clone());
        scenario.self_healing_ml.time_series = Some(healthy);
        record.scenarios.insert("steady".to_string(), scenario);

        assert!(mttr_comparison(&record, dir.path()).unwrap().is_none());
    }

    #[test]
    fn mttr_chart_renders_for_dipping_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_series(&["cascading_failure"]);
        let path = mttr_comparison(&record, dir.path()).unwrap().unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn auc_chart_covers_available_key_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_with_series(&["gradual_degradation", "high_failure"]);
        let path = latency_auc_comparison(&record, dir.path())
            .unwrap()
            .unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let empty = ExperimentRecord::default();
        assert!(latency_auc_comparison(&empty, dir.path())
            .unwrap()
            .is_none());
    }
}
