use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cacheviz",
    version,
    about = "Render comparison charts from self-healing cache experiment results"
)]
pub struct Cli {
    /// Directory the experiment runner wrote its JSON artifacts into
    #[arg(long, global = true, default_value = "experiment_results")]
    pub results_dir: PathBuf,

    /// Directory chart PNGs are written to (created if absent)
    #[arg(long, global = true, default_value = "charts")]
    pub charts_dir: PathBuf,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Command {
    /// Render the full chart suite (default)
    All,
    /// The three aggregate charts: comparison, improvements, summary table
    Thesis,
    /// The visibility-focused charts: error reduction, zoomed success rate,
    /// per-metric comparison panels
    Improved,
}
