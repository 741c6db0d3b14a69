//! ML-focused analysis panels: prediction quality, runner-reported
//! improvement deltas, and statistical significance flags.
//!
//! All four panels read optional sub-objects; a scenario that lacks one
//! contributes zero bars rather than being dropped, so the x axis stays
//! aligned across panels.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use plotters::prelude::*;

use cacheviz_core::model::{ExperimentRecord, ScenarioResult};

use crate::bars::GroupedBars;
use crate::style::{pretty_label, BASELINE_COLOR, MINT_COLOR, ML_COLOR, SELF_HEALING_COLOR};

pub const ML_ANALYSIS_FILE: &str = "ml_comprehensive_analysis.png";

fn per_scenario<F>(record: &ExperimentRecord, value: F) -> Vec<f64>
where
    F: Fn(&ScenarioResult) -> f64,
{
    record.scenarios.values().map(value).collect()
}

/// 2×2 panels: prediction accuracy, success-rate improvements, response-time
/// improvements, significance flags.
pub fn ml_analysis(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    ensure!(!record.scenarios.is_empty(), "no scenarios to analyze");

    let path = out_dir.join(ML_ANALYSIS_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    let categories: Vec<String> = record.scenarios.keys().map(|k| pretty_label(k)).collect();
    let accuracy = |s: &ScenarioResult| s.self_healing_ml.prediction_accuracy.unwrap_or_default();

    GroupedBars {
        title: "ML Prediction Accuracy Metrics".to_string(),
        x_desc: String::new(),
        y_desc: "Score (%)".to_string(),
        categories: categories.clone(),
        series: vec![
            (
                "Precision".to_string(),
                ML_COLOR,
                per_scenario(record, |s| accuracy(s).precision * 100.0),
            ),
            (
                "Recall".to_string(),
                BASELINE_COLOR,
                per_scenario(record, |s| accuracy(s).recall * 100.0),
            ),
            (
                "F1 Score".to_string(),
                MINT_COLOR,
                per_scenario(record, |s| accuracy(s).f1_score * 100.0),
            ),
        ],
        y_range: Some(0.0..110.0),
        value_labels: None,
        legend: true,
    }
    .render(&panels[0])?;

    let improvements = |s: &ScenarioResult| s.improvements.unwrap_or_default();
    GroupedBars {
        title: "Success Rate Improvements".to_string(),
        x_desc: String::new(),
        y_desc: "Improvement (%)".to_string(),
        categories: categories.clone(),
        series: vec![
            (
                "vs Baseline".to_string(),
                ML_COLOR,
                per_scenario(record, |s| {
                    improvements(s).success_rate_improvement.vs_baseline
                }),
            ),
            (
                "vs Self-Healing (No ML)".to_string(),
                SELF_HEALING_COLOR,
                per_scenario(record, |s| {
                    improvements(s).success_rate_improvement.vs_no_ml
                }),
            ),
        ],
        y_range: None,
        value_labels: None,
        legend: true,
    }
    .render(&panels[1])?;

    GroupedBars {
        title: "Response Time Improvements".to_string(),
        x_desc: String::new(),
        y_desc: "Improvement (%)".to_string(),
        categories: categories.clone(),
        series: vec![
            (
                "vs Baseline".to_string(),
                ML_COLOR,
                per_scenario(record, |s| {
                    improvements(s).response_time_improvement.vs_baseline
                }),
            ),
            (
                "vs Self-Healing (No ML)".to_string(),
                SELF_HEALING_COLOR,
                per_scenario(record, |s| {
                    improvements(s).response_time_improvement.vs_no_ml
                }),
            ),
        ],
        y_range: None,
        value_labels: None,
        legend: true,
    }
    .render(&panels[2])?;

    let significance = |s: &ScenarioResult| s.statistical_significance.unwrap_or_default();
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    GroupedBars {
        title: "Statistical Significance (p < 0.05)".to_string(),
        x_desc: String::new(),
        y_desc: "Significant (1 = yes)".to_string(),
        categories,
        series: vec![
            (
                "Success Rate".to_string(),
                ML_COLOR,
                per_scenario(record, |s| flag(significance(s).success_rate_significant)),
            ),
            (
                "Hit Rate".to_string(),
                SELF_HEALING_COLOR,
                per_scenario(record, |s| flag(significance(s).hit_rate_significant)),
            ),
            (
                "Response Time".to_string(),
                BASELINE_COLOR,
                per_scenario(record, |s| {
                    flag(significance(s).response_time_significant)
                }),
            ),
        ],
        y_range: Some(0.0..1.4),
        value_labels: None,
        legend: true,
    }
    .render(&panels[3])?;

    root.present()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cacheviz_core::model::{
        Improvements, PredictionAccuracy, StatisticalSignificance, VersusDelta,
    };

    #[test]
    fn renders_with_and_without_optional_blocks() {
        let mut record = ExperimentRecord::default();

        let mut rich = ScenarioResult::default();
        rich.self_healing_ml.prediction_accuracy = Some(PredictionAccuracy {
            precision: 0.92,
            recall: 0.88,
            f1_score: 0.9,
            total_predictions: 200,
        });
        rich.improvements = Some(Improvements {
            success_rate_improvement: VersusDelta {
                vs_baseline: 1.4,
                vs_no_ml: 0.3,
            },
            response_time_improvement: VersusDelta::default(),
        });
        rich.statistical_significance = Some(StatisticalSignificance {
            success_rate_significant: true,
            hit_rate_significant: false,
            response_time_significant: true,
        });
        record.scenarios.insert("cascading_failure".into(), rich);

        // A scenario with none of the optional blocks must still render.
        record
            .scenarios
            .insert("warmup".into(), ScenarioResult::default());

        let dir = tempfile::tempdir().unwrap();
        let path = ml_analysis(&record, dir.path()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
