//! Chart orchestration: locate the newest experiment, load it, and run the
//! requested chart set sequentially.
//!
//! Two failure tiers: the aggregate and per-scenario charts must succeed (an
//! error is fatal), while the trailing time-series charts degrade to a
//! warning so one malformed series cannot sink the whole run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use cacheviz_charts::{comparison, improvement, ml, recovery, scenario, table};
use cacheviz_core::model::ExperimentRecord;
use cacheviz_core::source::{
    ResultsDir, CACHE_STATISTICS_FILE, EXPERIMENTS_FILE, ML_TRAINING_DATA_FILE,
};

use crate::args::{Cli, Command};
use crate::exit_codes::EXIT_SUCCESS;

pub fn dispatch(cli: Cli) -> Result<i32> {
    let source = ResultsDir::new(&cli.results_dir);

    let Some(experiment) = source.latest_experiment() else {
        warn!(
            dir = %cli.results_dir.display(),
            "no experiment_*.json found, nothing to chart"
        );
        return Ok(EXIT_SUCCESS);
    };
    if let Some(name) = experiment.file_name().and_then(|n| n.to_str()) {
        println!("Using experiment: {name}");
    }

    let record = source.load_experiment(&experiment)?;
    if record.scenarios.is_empty() {
        warn!(file = %experiment.display(), "experiment record holds no scenarios");
        return Ok(EXIT_SUCCESS);
    }

    fs::create_dir_all(&cli.charts_dir).with_context(|| {
        format!("failed to create charts directory '{}'", cli.charts_dir.display())
    })?;

    let out = cli.charts_dir.as_path();
    match cli.cmd.unwrap_or(Command::All) {
        Command::All => all(&source, &record, out)?,
        Command::Thesis => thesis(&record, out)?,
        Command::Improved => improved(&record, out)?,
    }

    Ok(EXIT_SUCCESS)
}

fn created(path: &Path) {
    println!("Created: {}", path.display());
}

fn thesis(record: &ExperimentRecord, out: &Path) -> Result<()> {
    created(&comparison::comparison_bar_chart(record, out)?);
    created(&improvement::improvement_chart(record, out)?);
    created(&table::summary_table(record, out)?);
    Ok(())
}

fn improved(record: &ExperimentRecord, out: &Path) -> Result<()> {
    created(&scenario::error_reduction_by_scenario(record, out)?);
    created(&scenario::success_rate_zoomed(record, out)?);
    created(&comparison::comprehensive_comparison(record, out)?);
    Ok(())
}

fn all(source: &ResultsDir, record: &ExperimentRecord, out: &Path) -> Result<()> {
    for name in [EXPERIMENTS_FILE, CACHE_STATISTICS_FILE, ML_TRAINING_DATA_FILE] {
        match source.load_named(name) {
            Ok(Some(_)) => debug!(artifact = name, "auxiliary artifact present"),
            Ok(None) => debug!(artifact = name, "auxiliary artifact absent or skipped"),
            Err(e) => warn!(artifact = name, error = %e, "failed to read auxiliary artifact"),
        }
    }

    thesis(record, out)?;
    improved(record, out)?;
    created(&scenario::scenario_comparison(record, out)?);

    // Best-effort tier: log and continue.
    match ml::ml_analysis(record, out) {
        Ok(path) => created(&path),
        Err(e) => warn!(error = ?e, "skipping ML analysis chart"),
    }
    match recovery::recovery_curves(record, out) {
        Ok(paths) => paths.iter().for_each(|p| created(p)),
        Err(e) => warn!(error = ?e, "skipping recovery curves"),
    }
    match recovery::mttr_comparison(record, out) {
        Ok(Some(path)) => created(&path),
        Ok(None) => {}
        Err(e) => warn!(error = ?e, "skipping MTTR comparison"),
    }
    match recovery::latency_auc_comparison(record, out) {
        Ok(Some(path)) => created(&path),
        Ok(None) => {}
        Err(e) => warn!(error = ?e, "skipping latency AUC comparison"),
    }

    Ok(())
}