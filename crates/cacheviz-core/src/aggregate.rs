//! Pure aggregation arithmetic over a loaded [`ExperimentRecord`].
//!
//! Every function here is a total function of its inputs: no IO, no state,
//! and no error path. Scenarios missing an optional field are simply not
//! represented in the numbers a caller extracts for them.

use crate::model::{ExperimentRecord, SamplePoint, Variant, VariantMetrics};

/// A failure window opens when the hit rate drops below this fraction.
pub const RECOVERY_OPEN_THRESHOLD: f64 = 0.90;
/// An open failure window closes when the hit rate climbs back to this
/// fraction or above.
pub const RECOVERY_CLOSE_THRESHOLD: f64 = 0.95;

/// Sum a metric across all scenarios for one variant.
pub fn sum_reduce<F>(record: &ExperimentRecord, variant: Variant, metric: F) -> f64
where
    F: Fn(&VariantMetrics) -> f64,
{
    record
        .scenarios
        .values()
        .map(|s| metric(s.variant(variant)))
        .sum()
}

/// Arithmetic mean of a metric across all scenarios for one variant.
/// Zero for an empty record.
pub fn mean_reduce<F>(record: &ExperimentRecord, variant: Variant, metric: F) -> f64
where
    F: Fn(&VariantMetrics) -> f64,
{
    let n = record.scenarios.len();
    if n == 0 {
        return 0.0;
    }
    sum_reduce(record, variant, metric) / n as f64
}

/// `(before - after) / before * 100`, with 0 when `before` is 0.
///
/// The zero case is a policy choice inherited from the experiment pipeline,
/// not a detected error: an improvement over nothing is no improvement.
pub fn percent_improvement(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        0.0
    } else {
        (before - after) / before * 100.0
    }
}

/// Mean time to recovery over a sample series, in requests, using the
/// default hysteresis thresholds.
pub fn mean_time_to_recovery(series: &[SamplePoint]) -> f64 {
    mttr_with_thresholds(series, RECOVERY_OPEN_THRESHOLD, RECOVERY_CLOSE_THRESHOLD)
}

/// Two-threshold hysteresis detector: a window opens at the first point with
/// `hit_rate < open_below` while no window is open, and closes at the first
/// later point with `hit_rate >= close_at`, contributing the request-number
/// delta as one recovery sample. Returns the mean of all samples, or 0 when
/// none were recorded (no dip, or a window that never closed).
pub fn mttr_with_thresholds(series: &[SamplePoint], open_below: f64, close_at: f64) -> f64 {
    let mut window_open: Option<u64> = None;
    let mut recoveries: Vec<f64> = Vec::new();

    for point in series {
        match window_open {
            None if point.hit_rate < open_below => {
                window_open = Some(point.request_number);
            }
            Some(opened) if point.hit_rate >= close_at => {
                recoveries.push(point.request_number.saturating_sub(opened) as f64);
                window_open = None;
            }
            _ => {}
        }
    }

    if recoveries.is_empty() {
        0.0
    } else {
        recoveries.iter().sum::<f64>() / recoveries.len() as f64
    }
}

/// Trapezoidal integral of `avg_latency` over the request-number axis.
///
/// Only meaningful as a relative comparison between variants of the same
/// scenario; the absolute number has no unit anyone should quote.
pub fn latency_auc(series: &[SamplePoint]) -> f64 {
    series
        .windows(2)
        .map(|w| {
            let dx = w[1].request_number as f64 - w[0].request_number as f64;
            (w[0].avg_latency + w[1].avg_latency) * 0.5 * dx
        })
        .sum()
}

/// Cross-scenario totals and means for one variant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VariantSummary {
    pub total_requests: f64,
    pub failed_requests: f64,
    pub mean_success_rate: f64,
    pub mean_hit_rate: f64,
    pub mean_response_time: f64,
    pub mean_throughput: f64,
}

pub fn summarize(record: &ExperimentRecord, variant: Variant) -> VariantSummary {
    VariantSummary {
        total_requests: sum_reduce(record, variant, |m| m.total_requests as f64),
        failed_requests: sum_reduce(record, variant, |m| m.failed_requests as f64),
        mean_success_rate: mean_reduce(record, variant, |m| m.success_rate),
        mean_hit_rate: mean_reduce(record, variant, |m| m.hit_rate),
        mean_response_time: mean_reduce(record, variant, |m| m.avg_response_time),
        mean_throughput: mean_reduce(record, variant, |m| m.throughput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScenarioResult;

    fn record_with_failures(failures: &[(&str, u64)]) -> ExperimentRecord {
        let mut record = ExperimentRecord::default();
        for (name, failed) in failures {
            let mut scenario = ScenarioResult::default();
            scenario.baseline.failed_requests = *failed;
            scenario.baseline.success_rate = 1.0 - (*failed as f64 / 100.0);
            record.scenarios.insert((*name).to_string(), scenario);
        }
        record
    }

    fn point(request_number: u64, hit_rate: f64) -> SamplePoint {
        SamplePoint {
            request_number,
            hit_rate,
            success_rate: hit_rate,
            avg_latency: 1.0,
        }
    }

    #[test]
    fn sum_reduce_adds_across_scenarios() {
        let record = record_with_failures(&[("a", 5), ("b", 3)]);
        let total = sum_reduce(&record, Variant::Baseline, |m| m.failed_requests as f64);
        assert_eq!(total, 8.0);
    }

    #[test]
    fn mean_reduce_is_bounded_by_min_and_max() {
        let record = record_with_failures(&[("a", 5), ("b", 3), ("c", 40)]);
        let rates: Vec<f64> = record
            .scenarios
            .values()
            .map(|s| s.baseline.success_rate)
            .collect();
        let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
        let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mean = mean_reduce(&record, Variant::Baseline, |m| m.success_rate);
        assert!(mean >= min && mean <= max);
    }

    #[test]
    fn mean_reduce_of_empty_record_is_zero() {
        let record = ExperimentRecord::default();
        assert_eq!(mean_reduce(&record, Variant::Baseline, |m| m.hit_rate), 0.0);
    }

    #[test]
    fn percent_improvement_zero_before_is_zero() {
        assert_eq!(percent_improvement(0.0, 17.0), 0.0);
        assert_eq!(percent_improvement(0.0, 0.0), 0.0);
    }

    #[test]
    fn percent_improvement_full_reduction_is_hundred() {
        assert_eq!(percent_improvement(12.0, 0.0), 100.0);
    }

    #[test]
    fn percent_improvement_halving_is_fifty() {
        assert!((percent_improvement(10.0, 5.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn mttr_healthy_series_is_zero() {
        let series: Vec<SamplePoint> = (1..=20).map(|i| point(i, 0.97)).collect();
        assert_eq!(mean_time_to_recovery(&series), 0.0);
    }

    #[test]
    fn mttr_single_dip() {
        let series = [
            point(1, 0.99),
            point(2, 0.85),
            point(3, 0.80),
            point(4, 0.96),
        ];
        assert_eq!(mean_time_to_recovery(&series), 2.0);
    }

    #[test]
    fn mttr_unclosed_window_contributes_nothing() {
        // Drops below the open threshold and hovers in the dead band forever.
        let series = [point(1, 0.99), point(2, 0.85), point(3, 0.92), point(4, 0.93)];
        assert_eq!(mean_time_to_recovery(&series), 0.0);
    }

    #[test]
    fn mttr_averages_multiple_windows() {
        let series = [
            point(10, 0.80),
            point(14, 0.96), // recovery of 4
            point(20, 0.85),
            point(22, 0.97), // recovery of 2
        ];
        assert_eq!(mean_time_to_recovery(&series), 3.0);
    }

    #[test]
    fn mttr_thresholds_are_overridable() {
        // With a looser close threshold the first dip recovers one point
        // earlier.
        let series = [point(1, 0.99), point(2, 0.85), point(3, 0.93), point(4, 0.96)];
        assert_eq!(mean_time_to_recovery(&series), 2.0);
        assert_eq!(mttr_with_thresholds(&series, 0.90, 0.92), 1.0);
    }

    #[test]
    fn constant_latency_auc_is_level_times_span() {
        let series: Vec<SamplePoint> = (0..=10)
            .map(|i| SamplePoint {
                request_number: i * 5,
                hit_rate: 1.0,
                success_rate: 1.0,
                avg_latency: 3.5,
            })
            .collect();
        // L * (max_request - min_request) = 3.5 * 50
        assert!((latency_auc(&series) - 175.0).abs() < 1e-9);
    }

    #[test]
    fn auc_of_short_series_is_zero() {
        assert_eq!(latency_auc(&[]), 0.0);
        assert_eq!(latency_auc(&[point(1, 1.0)]), 0.0);
    }

    #[test]
    fn summarize_combines_sums_and_means() {
        let record = record_with_failures(&[("a", 10), ("b", 20)]);
        let summary = summarize(&record, Variant::Baseline);
        assert_eq!(summary.failed_requests, 30.0);
        assert!((summary.mean_success_rate - 0.85).abs() < 1e-9);
    }
}
