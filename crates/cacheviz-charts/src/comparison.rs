//! Aggregate comparison charts: metrics summed/averaged across scenarios,
//! one bar per variant.

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;

use cacheviz_core::aggregate::{summarize, VariantSummary};
use cacheviz_core::model::{ExperimentRecord, Variant};

use crate::bars::{colored_bars, zoom_range, GroupedBars, ValueFormat};
use crate::style::variant_color;

pub const COMPARISON_BAR_CHART_FILE: &str = "comparison_bar_chart_real.png";
pub const COMPREHENSIVE_COMPARISON_FILE: &str = "comprehensive_comparison.png";

fn summaries(record: &ExperimentRecord) -> [(Variant, VariantSummary); 3] {
    Variant::ALL.map(|v| (v, summarize(record, v)))
}

/// The headline four-category grouped chart: success rate, hit rate,
/// response time, and total errors for each variant, on one shared axis.
///
/// Mixed units on one axis is deliberate; this is the at-a-glance figure the
/// detailed charts back up.
pub fn comparison_bar_chart(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(COMPARISON_BAR_CHART_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let series = summaries(record)
        .iter()
        .map(|(variant, s)| {
            (
                variant.label().to_string(),
                variant_color(*variant),
                vec![
                    s.mean_success_rate * 100.0,
                    s.mean_hit_rate * 100.0,
                    s.mean_response_time,
                    s.failed_requests,
                ],
            )
        })
        .collect();

    GroupedBars {
        title: "Performance Comparison: Baseline vs Self-Healing vs ML".to_string(),
        x_desc: "Metric".to_string(),
        y_desc: "Value".to_string(),
        categories: vec![
            "Success Rate (%)".to_string(),
            "Hit Rate (%)".to_string(),
            "Avg Response Time (ms)".to_string(),
            "Total Errors".to_string(),
        ],
        series,
        y_range: None,
        value_labels: Some(ValueFormat::Plain),
        legend: true,
    }
    .render(&root)?;

    root.present()?;
    Ok(path)
}

/// 2×2 panels with per-metric scales: total errors, mean success rate
/// (zoomed), mean hit rate (zoomed), mean response time.
pub fn comprehensive_comparison(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(COMPREHENSIVE_COMPARISON_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    let summaries = summaries(record);
    let bars_for = |metric: &dyn Fn(&VariantSummary) -> f64| -> Vec<(String, RGBColor, f64)> {
        summaries
            .iter()
            .map(|(variant, s)| {
                (
                    variant.label().to_string(),
                    variant_color(*variant),
                    metric(s),
                )
            })
            .collect()
    };

    let errors = bars_for(&|s| s.failed_requests);
    colored_bars(
        &panels[0],
        "Total Errors (Lower is Better)",
        "Total Failed Requests",
        &errors,
        None,
        ValueFormat::Count,
    )?;

    let success = bars_for(&|s| s.mean_success_rate * 100.0);
    let success_zoom = zoom_range(success.iter().map(|(_, _, v)| v), 0.5, 0.3);
    colored_bars(
        &panels[1],
        "Avg Success Rate (Zoomed)",
        "Success Rate (%)",
        &success,
        Some(success_zoom),
        ValueFormat::Percent,
    )?;

    let hits = bars_for(&|s| s.mean_hit_rate * 100.0);
    let hit_zoom = zoom_range(hits.iter().map(|(_, _, v)| v), 0.5, 0.3);
    colored_bars(
        &panels[2],
        "Avg Hit Rate (Zoomed)",
        "Hit Rate (%)",
        &hits,
        Some(hit_zoom),
        ValueFormat::Percent,
    )?;

    let latency = bars_for(&|s| s.mean_response_time);
    colored_bars(
        &panels[3],
        "Avg Response Time (Trade-off)",
        "Avg Response Time (ms)",
        &latency,
        None,
        ValueFormat::Millis,
    )?;

    root.present()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheviz_core::model::ScenarioResult;

    fn sample_record() -> ExperimentRecord {
        let mut record = ExperimentRecord::default();
        let mut scenario = ScenarioResult::default();
        for (metrics, failed) in [
            (&mut scenario.baseline, 90u64),
            (&mut scenario.self_healing, 30),
            (&mut scenario.self_healing_ml, 10),
        ] {
            metrics.total_requests = 1000;
            metrics.failed_requests = failed;
            metrics.success_rate = 1.0 - failed as f64 / 1000.0;
            metrics.hit_rate = 0.975;
            metrics.avg_response_time = 1.2;
            metrics.throughput = 820.0;
        }
        record.scenarios.insert("high_failure".to_string(), scenario);
        record
    }

    #[test]
    fn renders_aggregate_charts() {
        let dir = tempfile::tempdir().unwrap();
        let record = sample_record();

        for path in [
            comparison_bar_chart(&record, dir.path()).unwrap(),
            comprehensive_comparison(&record, dir.path()).unwrap(),
        ] {
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
