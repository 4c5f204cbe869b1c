//! Fantasy price scraper
//!
//! Polls a fantasy-sports price endpoint, skips payloads identical to the
//! last one seen, and records every new snapshot to a cumulative CSV table
//! plus optional raw and zipped JSON archives.
//!
//! # Features
//!
//! - One-shot or recurring runs (`SCRAPER_DELTA_TIME`)
//! - Content fingerprinting that survives restarts
//! - Per-sink failure isolation
//! - Graceful shutdown on SIGTERM/SIGINT

mod config;
mod detect;
mod error;
mod extract;
mod model;
mod pipeline;
mod report;
mod scheduler;
mod source;

#[cfg(test)]
mod test_utils;

use crate::config::{AppConfig, ReportConfig, ScraperConfig};
use crate::detect::{ChangeDetector, FileFingerprintStore};
use crate::error::{ConfigError, Result};
use crate::extract::{SelectionBaseline, SnapshotExtractor};
use crate::model::{FieldSet, ReportSink};
use crate::pipeline::{CycleOutcome, Pipeline};
use crate::report::{CompressedArchiveSink, CumulativeTableSink, RawArchiveSink};
use crate::scheduler::{RunReport, Schedule, Scheduler};
use crate::source::{Client, HttpFetcher};
use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Fatal: {:#}", e);
            eprintln!("Fatal: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Loads configuration, validates it, then runs the scheduler until it
/// finishes or a shutdown signal arrives. Returns the process exit code.
async fn run() -> Result<i32> {
    let app_config = config::load_app_config()?;
    init_logging(&app_config)?;

    let scraper_config = config::load_scraper_config()?;
    let report_config = config::load_report_config()?;

    let schedule = scraper_config.schedule()?;
    let scheduler = Scheduler::new(schedule, scraper_config.poll_increment()?);
    let mut pipeline = build_pipeline(&scraper_config, &report_config)?;

    let cancel = CancellationToken::new();
    let mut sig_term =
        signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sig_term.recv() => tracing::info!("Received SIGTERM. Exiting..."),
            _ = ctrl_c() => tracing::info!("Received SIGINT. Exiting..."),
        }
        shutdown.cancel();
    });

    tracing::info!(url = %scraper_config.url, "Running... Press Ctrl-C or send SIGTERM to terminate.");
    let report = scheduler.run(&mut pipeline, &cancel).await;
    Ok(exit_code(schedule, &report))
}

fn init_logging(app_config: &AppConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_max_level(app_config.log_level());
    match &app_config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }
    Ok(())
}

fn build_pipeline(
    scraper_config: &ScraperConfig,
    report_config: &ReportConfig,
) -> Result<Pipeline> {
    let fields = scraper_config.field_set()?;
    if fields.is_empty() {
        tracing::info!("No derived fields configured, writing identity columns only");
    }
    let baseline = match &scraper_config.baseline_file {
        Some(path) => {
            let baseline = SelectionBaseline::load(path)?;
            tracing::info!(
                version = baseline.version(),
                assets = baseline.len(),
                "Loaded selection baseline: {}",
                path
            );
            Some(baseline)
        }
        None => None,
    };
    let extractor = SnapshotExtractor::new(fields.clone(), scraper_config.period_id, baseline)?;
    let sinks = build_sinks(report_config, &fields)?;

    let detector = ChangeDetector::new(
        Box::new(FileFingerprintStore::new(&report_config.checksum_file)),
        scraper_config.allow_duplicates,
    );
    let source = HttpFetcher::new(Client::new(scraper_config.url.as_str()));

    Ok(Pipeline::new(Box::new(source), detector, extractor, sinks)
        .with_embedded_metadata(scraper_config.embed_metadata))
}

/// The CSV table is always written; the archives only when configured.
fn build_sinks(
    report_config: &ReportConfig,
    fields: &FieldSet,
) -> Result<Vec<Box<dyn ReportSink>>, ConfigError> {
    let mut sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(CumulativeTableSink::new(
        &report_config.csv_file,
        fields,
    ))];

    if let Some(dir) = &report_config.archive_dir {
        let policy = report_config.directory_policy();
        policy.validate(Path::new(dir))?;
        sinks.push(Box::new(RawArchiveSink::new(
            dir,
            report_config.archive_prefix.as_str(),
            policy,
        )));
    }
    if let Some(path) = &report_config.zip_file {
        sinks.push(Box::new(CompressedArchiveSink::new(
            path,
            report_config.archive_prefix.as_str(),
        )));
    }

    Ok(sinks)
}

/// A one-shot run that could not record its snapshot is a failure.
/// Recurring runs only stop on a signal, which is a clean exit.
fn exit_code(schedule: Schedule, report: &RunReport) -> i32 {
    match (schedule, report.last_outcome) {
        (Schedule::Once, Some(CycleOutcome::FetchFailed | CycleOutcome::Rejected)) => 1,
        _ => 0,
    }
}
