//! Summary table rendered as an image: per-scenario error counts, derived
//! improvements, and the winning variant, plus a totals row.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use plotters::prelude::*;

use cacheviz_core::aggregate::{percent_improvement, sum_reduce};
use cacheviz_core::model::{ExperimentRecord, Variant};

use crate::style::{pretty_label, ACCENT_COLOR, ML_COLOR, SELF_HEALING_COLOR};

pub const SUMMARY_TABLE_FILE: &str = "summary_table_real.png";

const COLUMNS: [(&str, f64); 7] = [
    ("Scenario", 0.20),
    ("Baseline Errors", 0.12),
    ("Self-Healing Errors", 0.12),
    ("ML Errors", 0.12),
    ("SH vs Baseline", 0.15),
    ("ML vs Baseline", 0.15),
    ("Winner", 0.14),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Winner {
    Ml,
    SelfHealing,
    Tie,
}

impl Winner {
    fn decide(self_healing_errors: u64, ml_errors: u64) -> Winner {
        if ml_errors == self_healing_errors {
            Winner::Tie
        } else if ml_errors < self_healing_errors {
            Winner::Ml
        } else {
            Winner::SelfHealing
        }
    }

    fn label(self) -> &'static str {
        match self {
            Winner::Ml => "ML",
            Winner::SelfHealing => "Self-Healing",
            Winner::Tie => "Tie",
        }
    }

    fn fill(self) -> Option<RGBColor> {
        match self {
            Winner::Ml => Some(ACCENT_COLOR),
            Winner::SelfHealing => Some(SELF_HEALING_COLOR),
            Winner::Tie => None,
        }
    }
}

struct Row {
    cells: [String; 7],
    winner: Option<Winner>,
    is_total: bool,
}

fn improvement_cell(before: f64, after: f64) -> String {
    let v = percent_improvement(before, after);
    format!("{}{:.1}%", if v >= 0.0 { "+" } else { "" }, v)
}

fn build_rows(record: &ExperimentRecord) -> Vec<Row> {
    let mut rows: Vec<Row> = record
        .scenarios
        .iter()
        .map(|(name, scenario)| {
            let b = scenario.baseline.failed_requests;
            let sh = scenario.self_healing.failed_requests;
            let ml = scenario.self_healing_ml.failed_requests;
            let winner = Winner::decide(sh, ml);
            Row {
                cells: [
                    pretty_label(name),
                    b.to_string(),
                    sh.to_string(),
                    ml.to_string(),
                    improvement_cell(b as f64, sh as f64),
                    improvement_cell(b as f64, ml as f64),
                    winner.label().to_string(),
                ],
                winner: Some(winner),
                is_total: false,
            }
        })
        .collect();

    let total = |variant| sum_reduce(record, variant, |m| m.failed_requests as f64);
    let (b, sh, ml) = (
        total(Variant::Baseline),
        total(Variant::SelfHealing),
        total(Variant::SelfHealingMl),
    );
    let winner = Winner::decide(sh as u64, ml as u64);
    rows.push(Row {
        cells: [
            "TOTAL".to_string(),
            format!("{b:.0}"),
            format!("{sh:.0}"),
            format!("{ml:.0}"),
            improvement_cell(b, sh),
            improvement_cell(b, ml),
            winner.label().to_string(),
        ],
        winner: Some(winner),
        is_total: true,
    });
    rows
}

/// Render the comparison table. Reruns overwrite the previous image.
pub fn summary_table(record: &ExperimentRecord, out_dir: &Path) -> Result<PathBuf> {
    ensure!(!record.scenarios.is_empty(), "no scenarios to tabulate");

    let rows = build_rows(record);

    const WIDTH: u32 = 1400;
    const MARGIN: i32 = 40;
    const TITLE_AREA: i32 = 70;
    const ROW_HEIGHT: i32 = 46;
    // Header row plus data rows.
    let height = (TITLE_AREA + MARGIN * 2 + ROW_HEIGHT * (rows.len() as i32 + 1)) as u32;

    let path = out_dir.join(SUMMARY_TABLE_FILE);
    let backend_path = path.clone();
    let root = BitMapBackend::new(&backend_path, (WIDTH, height)).into_drawing_area();
    root.fill(&WHITE)?;

    root.draw(&Text::new(
        "Detailed Comparison: Baseline vs Self-Healing vs ML",
        (MARGIN, MARGIN / 2),
        ("sans-serif", 26).into_font().color(&BLACK),
    ))?;

    let table_width = WIDTH as i32 - MARGIN * 2;
    let x_starts: Vec<i32> = {
        let mut xs = vec![MARGIN];
        let mut acc = 0.0;
        for (_, frac) in &COLUMNS {
            acc += frac;
            xs.push(MARGIN + (acc * table_width as f64) as i32);
        }
        xs
    };

    let draw_cell = |col: usize, y0: i32, text: &str, fill: Option<RGBColor>, bold_bg: bool| {
        let (x0, x1) = (x_starts[col], x_starts[col + 1]);
        let y1 = y0 + ROW_HEIGHT;
        if let Some(color) = fill {
            root.draw(&Rectangle::new(
                [(x0, y0), (x1, y1)],
                color.mix(if bold_bg { 0.9 } else { 0.55 }).filled(),
            ))?;
        }
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))?;
        root.draw(&Text::new(
            text.to_string(),
            (x0 + 10, y0 + ROW_HEIGHT / 2 - 8),
            ("sans-serif", 15).into_font().color(&BLACK),
        ))?;
        anyhow::Ok(())
    };

    let top = TITLE_AREA + MARGIN / 2;
    for (col, (header, _)) in COLUMNS.iter().enumerate() {
        draw_cell(col, top, header, Some(ML_COLOR), true)?;
    }

    for (ri, row) in rows.iter().enumerate() {
        let y0 = top + ROW_HEIGHT * (ri as i32 + 1);
        for (col, cell) in row.cells.iter().enumerate() {
            let fill = if row.is_total {
                Some(SELF_HEALING_COLOR)
            } else if col == 6 {
                row.winner.and_then(Winner::fill)
            } else {
                None
            };
            draw_cell(col, y0, cell, fill, row.is_total)?;
        }
    }

    root.present()?;
    Ok(path)
}
