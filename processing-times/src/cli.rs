///
/// This module implements the CLI interface for processing-times: command parsing,
/// wiring of the core pipeline, and user-visible output.
///
/// All fetching, filtering and report formatting lives in the [`processing-times-core`] crate.
/// This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: use the installed `processing-times` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`processing-times-core`]: ../../processing-times-core/
/// [`Cli`]: struct.Cli.html
/// [`run`]: fn.run.html
use crate::load_config::{api_config, load_filter, report_target, ReportTarget};
use crate::progress::ConsoleProgress;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use processing_times_core::client::UscisClient;
use processing_times_core::contract::OfficeFilter;
use processing_times_core::report::ReportWriter;
use processing_times_core::traverse::{traverse, TraversalReport};
use std::io;
use std::path::PathBuf;

/// CLI for processing-times: dump USCIS processing times into a report.
#[derive(Parser)]
#[clap(
    name = "processing-times",
    version,
    about = "Fetch USCIS form processing times into a tab-separated report"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch processing times for every form/office pair and write the report
    Fetch {
        /// Filter file, one `form,officeDescription` pair per line
        #[clap(long)]
        config: Option<PathBuf>,
        /// Report file [default: ~/Processing-Times_<timestamp>]
        #[clap(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Write the report to standard output instead of a file
        #[clap(long)]
        stdout: bool,
        /// API root [env: PROCESSING_TIMES_BASE_URL]
        #[clap(long)]
        base_url: Option<String>,
        /// Per-request timeout in seconds [env: PROCESSING_TIMES_TIMEOUT_SECS]
        #[clap(long)]
        timeout_secs: Option<u64>,
    },
}

fn print_summary(report: &TraversalReport, target: &ReportTarget) {
    let mut lines = vec!["Processing finished successfully!".to_string()];
    if !report.forms_skipped.is_empty() || !report.pairs_failed.is_empty() {
        lines.push(format!(
            "{} form(s) skipped, {} office(s) failed; see ERROR rows and log",
            report.forms_skipped.len(),
            report.pairs_failed.len()
        ));
    }
    match target {
        ReportTarget::File(path) => {
            lines.push(format!("Data is saved to file: {}", path.display()));
            for line in lines {
                println!("{line}");
            }
        }
        ReportTarget::Stdout => {
            for line in lines {
                eprintln!("{line}");
            }
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Fetch {
            config,
            output,
            stdout,
            base_url,
            timeout_secs,
        } => {
            let now = Local::now().naive_local();
            let filter = load_filter(config.as_deref())?;
            let api = api_config(base_url, timeout_secs)?;
            let client = UscisClient::new(&api).context("Unable to set up API client")?;
            let target = report_target(output, stdout, now)?;
            tracing::info!(command = "fetch", ?target, "Starting processing-times fetch");

            let filter = filter.as_ref().map(|f| f as &dyn OfficeFilter);
            let result = match &target {
                ReportTarget::File(path) => {
                    let mut writer = ReportWriter::create(path, now).with_context(|| {
                        format!("Unable to create output file: {}", path.display())
                    })?;
                    println!("* Fetching processing time data for:");
                    let mut progress = ConsoleProgress::stdout();
                    traverse(&client, filter, Some(&mut writer), &mut progress).await
                }
                ReportTarget::Stdout => {
                    let mut writer = ReportWriter::new(io::stdout(), now);
                    eprintln!("* Fetching processing time data for:");
                    let mut progress = ConsoleProgress::stderr();
                    traverse(&client, filter, Some(&mut writer), &mut progress).await
                }
            };

            match result {
                Ok(report) => {
                    tracing::info!(command = "fetch", ?report, "Fetch complete");
                    print_summary(&report, &target);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "fetch", error = %e, "Fetch aborted");
                    Err(e).context("Processing aborted")
                }
            }
        }
    }
}
