//! Discovery and loading of experiment artifacts on disk.
//!
//! [`ResultsDir`] is the explicit handle chart generation runs against; there
//! is no implicit global "latest file" state. A missing directory or file is
//! data that happens to be empty, not an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::debug;

use crate::model::ExperimentRecord;

/// Full experiment comparison written by the experiment runner.
pub const EXPERIMENTS_FILE: &str = "experiments.json";
/// Raw cache counter dump. Loaded for visibility, no chart consumes it.
pub const CACHE_STATISTICS_FILE: &str = "cache_statistics.json";
/// ML training set export. Loaded for visibility, no chart consumes it.
pub const ML_TRAINING_DATA_FILE: &str = "ml_training_data.json";

/// Prefix of timestamped per-run result files (`experiment_*.json`).
pub const EXPERIMENT_PREFIX: &str = "experiment_";

/// The runner writes this marker instead of a result body when a run failed.
const ERROR_MARKER: &str = "{\"error\"";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Handle to the directory the experiment runner writes its JSON into.
#[derive(Debug, Clone)]
pub struct ResultsDir {
    root: PathBuf,
}

impl ResultsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Newest `experiment_*.json` by modification time, or `None` when the
    /// directory does not exist or holds no matching file.
    pub fn latest_experiment(&self) -> Option<PathBuf> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.root.display(), error = %e, "results directory not readable");
                return None;
            }
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(EXPERIMENT_PREFIX) || !name.ends_with(".json") {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                newest = Some((modified, path));
            }
        }
        newest.map(|(_, path)| path)
    }

    /// Parse one per-run result file into the typed schema.
    pub fn load_experiment(&self, path: &Path) -> Result<ExperimentRecord, SourceError> {
        let body = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load one of the fixed-name artifacts as loose JSON.
    ///
    /// `Ok(None)` for a missing file, an empty body, or a body beginning with
    /// the runner's error marker.
    pub fn load_named(&self, name: &str) -> Result<Option<serde_json::Value>, SourceError> {
        let path = self.root.join(name);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SourceError::Io { path, source }),
        };
        let trimmed = body.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(ERROR_MARKER) {
            debug!(artifact = %name, "skipping empty or error-marked artifact");
            return Ok(None);
        }
        let value = serde_json::from_str(&body).map_err(|source| SourceError::Parse {
            path,
            source,
        })?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latest_experiment_picks_most_recently_modified() {
        let dir = tempfile::tempdir().unwrap();
        let results = ResultsDir::new(dir.path());

        fs::write(dir.path().join("experiment_001.json"), "{}").unwrap();
        // Filesystem mtime granularity.
        sleep(Duration::from_millis(50));
        fs::write(dir.path().join("experiment_002.json"), "{}").unwrap();
        sleep(Duration::from_millis(50));
        // Touch the older file last so name order and mtime order disagree.
        fs::write(dir.path().join("experiment_001.json"), "{} ").unwrap();

        let latest = results.latest_experiment().unwrap();
        assert_eq!(latest.file_name().unwrap(), "experiment_001.json");
    }

    #[test]
    fn latest_experiment_ignores_non_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("experiments.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert!(ResultsDir::new(dir.path()).latest_experiment().is_none());
    }

    #[test]
    fn missing_directory_is_empty_not_an_error() {
        let results = ResultsDir::new("/nonexistent/cacheviz-results");
        assert!(results.latest_experiment().is_none());
        assert!(results.load_named(EXPERIMENTS_FILE).unwrap().is_none());
    }

    #[test]
    fn load_named_skips_error_marked_and_empty_bodies() {
        let dir = tempfile::tempdir().unwrap();
        let results = ResultsDir::new(dir.path());

        fs::write(
            dir.path().join(EXPERIMENTS_FILE),
            r#"{"error": "runner crashed"}"#,
        )
        .unwrap();
        fs::write(dir.path().join(CACHE_STATISTICS_FILE), "  \n").unwrap();
        fs::write(dir.path().join(ML_TRAINING_DATA_FILE), r#"{"samples": []}"#).unwrap();

        assert!(results.load_named(EXPERIMENTS_FILE).unwrap().is_none());
        assert!(results.load_named(CACHE_STATISTICS_FILE).unwrap().is_none());
        assert!(results.load_named(ML_TRAINING_DATA_FILE).unwrap().is_some());
    }

    #[test]
    fn load_experiment_reports_parse_failures_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("experiment_bad.json");
        fs::write(&path, "not json").unwrap();

        let err = ResultsDir::new(dir.path())
            .load_experiment(&path)
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(err.to_string().contains("experiment_bad.json"));
    }
}
