/// `load_config` module: turns command-line options and the environment into what a run needs.
///
/// # Responsibilities
/// - Load the optional filter file. A path given explicitly must be readable;
///   no path means an unfiltered run.
/// - Resolve API settings: flag, then environment (`.env` is honoured), then default.
/// - Pick the report destination, defaulting to a timestamped file in `$HOME`.
///
/// # Errors
/// All errors use `anyhow::Error` with context, and are surfaced at the CLI boundary.
use anyhow::{ensure, Context, Result};
use chrono::NaiveDateTime;
use processing_times_core::config::ApiConfig;
use processing_times_core::filter::FilterSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const BASE_URL_ENV: &str = "PROCESSING_TIMES_BASE_URL";
pub const TIMEOUT_ENV: &str = "PROCESSING_TIMES_TIMEOUT_SECS";

/// Where the report goes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportTarget {
    File(PathBuf),
    Stdout,
}

pub fn load_filter(path: Option<&Path>) -> Result<Option<FilterSet>> {
    let Some(path) = path else {
        info!("No filter configuration given, processing every office");
        return Ok(None);
    };
    match FilterSet::load(path) {
        Ok(set) => Ok(Some(set)),
        Err(e) => {
            error!(error = %e, config_path = ?path, "Failed to read filter configuration");
            Err(e).with_context(|| format!("Unable to read configuration from: {}", path.display()))
        }
    }
}

pub fn api_config(base_url: Option<String>, timeout_secs: Option<u64>) -> Result<ApiConfig> {
    let mut config = ApiConfig::default();

    if let Some(url) = base_url.or_else(|| std::env::var(BASE_URL_ENV).ok()) {
        config.base_url = url;
    }

    match timeout_secs {
        Some(secs) => {
            ensure!(secs > 0, "--timeout-secs must be at least 1 second, got 0");
            config.timeout_secs = secs;
        }
        None => {
            if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"))?;
                ensure!(secs > 0, "{TIMEOUT_ENV} must be at least 1 second, got {raw:?}");
                config.timeout_secs = secs;
            }
        }
    }

    config.trace_loaded();
    Ok(config)
}

/// `Processing-Times_<Mon-DD-YYYY_HH-MM-SS>` under `home`.
pub fn default_output_path(home: &Path, now: NaiveDateTime) -> PathBuf {
    home.join(format!(
        "Processing-Times_{}",
        now.format("%b-%d-%Y_%H-%M-%S")
    ))
}

pub fn report_target(output: Option<PathBuf>, stdout: bool, now: NaiveDateTime) -> Result<ReportTarget> {
    if stdout {
        return Ok(ReportTarget::Stdout);
    }
    if let Some(path) = output {
        return Ok(ReportTarget::File(path));
    }
    let home = std::env::var("HOME").context("HOME is not set; pass --output explicitly")?;
    Ok(ReportTarget::File(default_output_path(Path::new(&home), now)))
}
