//! Bar-drawing plumbing shared by the chart modules. Bars are plain
//! `Rectangle` series on an `f64` axis: category `i` owns `[i - 0.4, i + 0.4]`
//! and grouped series split that band evenly.

use std::ops::Range;

use anyhow::{ensure, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

/// How a bar's value label is printed above it.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ValueFormat {
    /// Rounded integer ("412").
    Count,
    /// Two decimals with a percent sign ("99.62%").
    Percent,
    /// Two decimals with a millisecond suffix ("1.19ms").
    Millis,
    /// One decimal, bare ("97.4").
    Plain,
}

impl ValueFormat {
    pub(crate) fn format(self, v: f64) -> String {
        match self {
            ValueFormat::Count => format!("{}", v.round() as i64),
            ValueFormat::Percent => format!("{v:.2}%"),
            ValueFormat::Millis => format!("{v:.2}ms"),
            ValueFormat::Plain => format!("{v:.1}"),
        }
    }
}

/// One grouped-bar chart: `categories` along x, one colored bar per series
/// within each category band.
pub(crate) struct GroupedBars {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    /// (legend label, color, one value per category).
    pub series: Vec<(String, RGBColor, Vec<f64>)>,
    /// Explicit y range for zoomed charts; auto-scaled from data otherwise.
    pub y_range: Option<Range<f64>>,
    pub value_labels: Option<ValueFormat>,
    pub legend: bool,
}

impl GroupedBars {
    pub(crate) fn render(&self, area: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()> {
        let n = self.categories.len();
        ensure!(n > 0, "no categories to draw for '{}'", self.title);
        ensure!(!self.series.is_empty(), "no series to draw for '{}'", self.title);

        let band = 0.8 / self.series.len() as f64;
        let y_range = self
            .y_range
            .clone()
            .unwrap_or_else(|| auto_range(self.series.iter().flat_map(|(_, _, v)| v.iter())));

        let mut chart = ChartBuilder::on(area)
            .caption(&self.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(-0.6f64..(n as f64 - 0.4), y_range.clone())?;

        let categories = self.categories.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(WHITE)
            .y_desc(&self.y_desc)
            .x_desc(&self.x_desc)
            .x_labels(n)
            .x_label_formatter(&move |x: &f64| {
                let i = x.round();
                if (x - i).abs() < 0.25 && i >= 0.0 && (i as usize) < categories.len() {
                    categories[i as usize].clone()
                } else {
                    String::new()
                }
            })
            .draw()?;

        let floor = y_range.start;
        for (si, (label, color, values)) in self.series.iter().enumerate() {
            let color = *color;
            let annotations = chart.draw_series(values.iter().enumerate().map(|(ci, v)| {
                let x0 = ci as f64 - 0.4 + si as f64 * band;
                let mut bar =
                    Rectangle::new([(x0, floor), (x0 + band, *v)], color.mix(0.85).filled());
                bar.set_margin(0, 0, 1, 1);
                bar
            }))?;
            if self.legend {
                annotations.label(label).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                });
            }
        }

        if let Some(fmt) = self.value_labels {
            let lift = (y_range.end - y_range.start) * 0.01;
            for (si, (_, _, values)) in self.series.iter().enumerate() {
                chart.draw_series(values.iter().enumerate().map(|(ci, v)| {
                    let x = ci as f64 - 0.4 + (si as f64 + 0.15) * band;
                    Text::new(
                        fmt.format(*v),
                        (x, *v + lift),
                        ("sans-serif", 12).into_font().color(&BLACK),
                    )
                }))?;
            }
        }

        if self.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.9))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }
}

/// Single-series bars where each category carries its own color (the
/// three-variant aggregate panels).
pub(crate) fn colored_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    bars: &[(String, RGBColor, f64)],
    y_range: Option<Range<f64>>,
    value_labels: ValueFormat,
) -> Result<()> {
    ensure!(!bars.is_empty(), "no bars to draw for '{title}'");

    let n = bars.len();
    let y_range = y_range.unwrap_or_else(|| auto_range(bars.iter().map(|(_, _, v)| v)));

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(64)
        .build_cartesian_2d(-0.6f64..(n as f64 - 0.4), y_range.clone())?;

    let labels: Vec<String> = bars.iter().map(|(l, _, _)| l.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(WHITE)
        .y_desc(y_desc)
        .x_labels(n)
        .x_label_formatter(&move |x: &f64| {
            let i = x.round();
            if (x - i).abs() < 0.25 && i >= 0.0 && (i as usize) < labels.len() {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .draw()?;

    let floor = y_range.start;
    chart.draw_series(bars.iter().enumerate().map(|(i, (_, color, v))| {
        let mut bar = Rectangle::new(
            [(i as f64 - 0.4, floor), (i as f64 + 0.4, *v)],
            color.mix(0.85).filled(),
        );
        bar.set_margin(0, 0, 2, 2);
        bar
    }))?;

    let lift = (y_range.end - y_range.start) * 0.01;
    chart.draw_series(bars.iter().enumerate().map(|(i, (_, _, v))| {
        Text::new(
            value_labels.format(*v),
            (i as f64 - 0.15, *v + lift),
            ("sans-serif", 13).into_font().color(&BLACK),
        )
    }))?;

    Ok(())
}

/// 0 to 15% above the largest value (at least 1.0 so an all-zero chart still
/// has an axis).
pub(crate) fn auto_range<'a>(values: impl Iterator<Item = &'a f64>) -> Range<f64> {
    let max = values.copied().fold(0.0f64, f64::max);
    0.0..(max * 1.15).max(1.0)
}

/// Zoomed range hugging the data, for charts whose differences are fractions
/// of a percent.
pub(crate) fn zoom_range<'a>(
    values: impl Iterator<Item = &'a f64>,
    pad_below: f64,
    pad_above: f64,
) -> Range<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(*v);
        max = max.max(*v);
    }
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    (min - pad_below)..(max + pad_above)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_formats() {
        assert_eq!(ValueFormat::Count.format(411.7), "412");
        assert_eq!(ValueFormat::Percent.format(99.615), "99.62%");
        assert_eq!(ValueFormat::Millis.format(1.19), "1.19ms");
        assert_eq!(ValueFormat::Plain.format(97.44), "97.4");
    }

    #[test]
    fn auto_range_covers_data_with_headroom() {
        let values = [3.0, 10.0, 7.0];
        let range = auto_range(values.iter());
        assert_eq!(range.start, 0.0);
        assert!(range.end > 10.0);
    }

    #[test]
    fn auto_range_of_zeros_is_nonempty() {
        let values = [0.0, 0.0];
        assert_eq!(auto_range(values.iter()), 0.0..1.0);
    }

    #[test]
    fn zoom_range_pads_both_sides() {
        let values = [99.1, 99.8];
        let range = zoom_range(values.iter(), 0.5, 0.3);
        assert!((range.start - 98.6).abs() < 1e-9);
        assert!((range.end - 100.1).abs() < 1e-9);
    }

    #[test]
    fn zoom_range_of_empty_input_falls_back() {
        let values: [f64; 0] = [];
        assert_eq!(zoom_range(values.iter(), 1.0, 1.0), 0.0..1.0);
    }
}
