//! Typed schema for the experiment runner's JSON output.
//!
//! The producer writes camelCase keys and omits fields it did not measure.
//! Missing scalars deserialize to zero and missing sub-objects to `None`, so
//! the "field absent → skip" rule lives here once instead of at every call
//! site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One experiment run: scenario name → per-variant results.
///
/// `BTreeMap` keeps chart ordering deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentRecord {
    #[serde(default)]
    pub scenarios: BTreeMap<String, ScenarioResult>,
}

/// The three cache configurations every scenario is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Baseline,
    SelfHealing,
    SelfHealingMl,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::Baseline,
        Variant::SelfHealing,
        Variant::SelfHealingMl,
    ];

    /// Display label used in legends and tables.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Baseline => "Baseline",
            Variant::SelfHealing => "Self-Healing (No ML)",
            Variant::SelfHealingMl => "Self-Healing (ML)",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    #[serde(default)]
    pub baseline: VariantMetrics,
    #[serde(default)]
    pub self_healing: VariantMetrics,
    #[serde(default, rename = "selfHealingML")]
    pub self_healing_ml: VariantMetrics,
    #[serde(default)]
    pub improvements: Option<Improvements>,
    #[serde(default)]
    pub statistical_significance: Option<StatisticalSignificance>,
}

impl ScenarioResult {
    pub fn variant(&self, variant: Variant) -> &VariantMetrics {
        match variant {
            Variant::Baseline => &self.baseline,
            Variant::SelfHealing => &self.self_healing,
            Variant::SelfHealingMl => &self.self_healing_ml,
        }
    }
}

/// Metrics recorded for one variant under one scenario.
///
/// Invariants relied on downstream (produced, not enforced, here):
/// `failed_requests <= total_requests`, rates in `[0, 1]`, and `time_series`
/// ordered by non-decreasing `request_number`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantMetrics {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub failed_requests: u64,
    /// Fraction in [0, 1].
    #[serde(default)]
    pub success_rate: f64,
    /// Fraction in [0, 1].
    #[serde(default)]
    pub hit_rate: f64,
    /// Milliseconds.
    #[serde(default)]
    pub avg_response_time: f64,
    /// Requests per second.
    #[serde(default)]
    pub throughput: f64,
    #[serde(default)]
    pub prediction_accuracy: Option<PredictionAccuracy>,
    #[serde(default)]
    pub time_series: Option<Vec<SamplePoint>>,
}

/// One point of a per-request time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplePoint {
    #[serde(default)]
    pub request_number: u64,
    #[serde(default)]
    pub hit_rate: f64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub avg_latency: f64,
}

/// Failure-prediction quality, present only for the ML variant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionAccuracy {
    #[serde(default)]
    pub precision: f64,
    #[serde(default)]
    pub recall: f64,
    #[serde(default)]
    pub f1_score: f64,
    #[serde(default)]
    pub total_predictions: u64,
}

/// Pre-computed improvement percentages shipped by the experiment runner.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvements {
    #[serde(default)]
    pub success_rate_improvement: VersusDelta,
    #[serde(default)]
    pub response_time_improvement: VersusDelta,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersusDelta {
    #[serde(default)]
    pub vs_baseline: f64,
    #[serde(default, rename = "vsNoML")]
    pub vs_no_ml: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalSignificance {
    #[serde(default)]
    pub success_rate_significant: bool,
    #[serde(default)]
    pub hit_rate_significant: bool,
    #[serde(default)]
    pub response_time_significant: bool,
}
