//! Per-scenario comparison charts: one bar band per scenario, three bars per
//! band.

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;

use cacheviz_core::model::{ExperimentRecord, Variant, VariantMetrics};

use crate::bars::{zoom_range, GroupedBars, ValueFormat};
use crate::style::{pretty_label, variant_color};

pub const ERROR_REDUCTION_FILE: &str = "error_reduction_by_scenario.png";
pub const SUCCESS_RATE_ZOOMED_FILE: &str = "success_rate_zoomed.png";
pub const SCENARIO_COMPARISON_FILE: &str = "scenario_comparison.png";

fn scenario_labels(record: &ExperimentRecord) -> Vec<String> {
    record.scenarios.keys().map(|k| pretty_label(k)).collect()
}

fn variant_series<F>(record: &ExperimentRecord, metric: F) -> Vec<(String, RGBColor, Vec<f64>)>
where
    F: Fn(&VariantMetrics) -> f64,
{
    Variant::ALL
        .iter()
        .map(|&variant| {
            let values = record
                .scenarios
                .values()
                .map(|s| metric(s.variant(variant)))
                .collect();
            (variant.label().to_string(), variant_color(variant), values)
        })
        .collect()
}

/// Failed requests per scenario. The errors chart carries the clearest
/// hierarchy between the three variants, hence the value labels.
pub fn error_reduction_by_scenario(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(ERROR_REDUCTION_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    GroupedBars {
        title: "Failed Requests by Scenario".to_string(),
        x_desc: "Scenario".to_string(),
        y_desc: "Number of Failed Requests".to_string(),
        categories: scenario_labels(record),
        series: variant_series(record, |m| m.failed_requests as f64),
        y_range: None,
        value_labels: Some(ValueFormat::Count),
        legend: true,
    }
    .render(&root)?;

    root.present()?;
    Ok(path)
}

/// Success rate per scenario on a zoomed y axis; at full scale the variants
/// are indistinguishable.
pub fn success_rate_zoomed(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(SUCCESS_RATE_ZOOMED_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let series = variant_series(record, |m| m.success_rate * 100.0);
    let zoom = zoom_range(series.iter().flat_map(|(_, _, v)| v.iter()), 1.0, 0.5);
    // Never zoom in past the conventional 95..100.5 window.
    let y_range = zoom.start.min(95.0)..zoom.end.max(100.5);

    GroupedBars {
        title: "Success Rate Comparison (Zoomed Scale)".to_string(),
        x_desc: "Scenario".to_string(),
        y_desc: "Success Rate (%)".to_string(),
        categories: scenario_labels(record),
        series,
        y_range: Some(y_range),
        value_labels: Some(ValueFormat::Percent),
        legend: true,
    }
    .render(&root)?;

    root.present()?;
    Ok(path)
}

/// 2×2 panels: success rate, hit rate, response time, and throughput per
/// scenario.
pub fn scenario_comparison(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(SCENARIO_COMPARISON_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    type Metric = fn(&VariantMetrics) -> f64;
    let specs: [(&str, Metric); 4] = [
        ("Success Rate (%)", |m| m.success_rate * 100.0),
        ("Hit Rate (%)", |m| m.hit_rate * 100.0),
        ("Avg Response Time (ms)", |m| m.avg_response_time),
        ("Throughput (req/s)", |m| m.throughput),
    ];

    for (panel, (title, metric)) in panels.iter().zip(specs) {
        GroupedBars {
            title: title.to_string(),
            x_desc: String::new(),
            y_desc: title.to_string(),
            categories: scenario_labels(record),
            series: variant_series(record, metric),
            y_range: None,
            value_labels: None,
            // One legend for the whole figure is enough.
            legend: title.starts_with("Success"),
        }
        .render(panel)?;
    }

    root.present()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheviz_core::model::ScenarioResult;

    fn sample_record() -> ExperimentRecord {
        let mut record = ExperimentRecord::default();
        for (name, b, sh, ml) in [
            ("cascading_failure", 120u64, 40u64, 12u64),
            ("gradual_degradation", 80, 25, 9),
        ] {
            let mut scenario = ScenarioResult::default();
            for (metrics, failed) in [
                (&mut scenario.baseline, b),
                (&mut scenario.self_healing, sh),
                (&mut scenario.self_healing_ml, ml),
            ] {
                metrics.total_requests = 1000;
                metrics.failed_requests = failed;
                metrics.success_rate = 1.0 - failed as f64 / 1000.0;
                metrics.hit_rate = 0.97;
                metrics.avg_response_time = 1.2;
                metrics.throughput = 850.0;
            }
            record.scenarios.insert(name.to_string(), scenario);
        }
        record
    }

    #[test]
    fn variant_series_follows_scenario_order() {
        let record = sample_record();
        let series = variant_series(&record, |m| m.failed_requests as f64);
        assert_eq!(series.len(), 3);
        // BTreeMap order: cascading_failure, gradual_degradation.
        assert_eq!(series[0].2, vec![120.0, 80.0]);
        assert_eq!(series[2].2, vec![12.0, 9.0]);
    }

    #[test]
    fn renders_scenario_charts() {
        let dir = tempfile::tempdir().unwrap();
        let record = sample_record();

        for path in [
            error_reduction_by_scenario(&record, dir.path()).unwrap(),
            success_rate_zoomed(&record, dir.path()).unwrap(),
            scenario_comparison(&record, dir.path()).unwrap(),
        ] {
            assert!(path.exists());
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn empty_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let record = ExperimentRecord::default();
        assert!(error_reduction_by_scenario(&record, dir.path()).is_err());
    }
}
