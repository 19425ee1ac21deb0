// ABOUTME: CLI entry point - fetch workout history, run the analysis, render a report
// ABOUTME: Modes: fetch only, analyze a saved snapshot, or both in one run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Command-line front end.
//!
//! `fetch` pulls recent workout events from the Hevy API into a JSON
//! snapshot; `analyze` runs the engine over a snapshot offline; `run` does
//! both. Keeping the snapshot on disk makes every analysis reproducible
//! and testable without network access.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use repcoach::config::CoachConfig;
use repcoach::formatters::{render, ReportFormat};
use repcoach::intelligence::CoachingEngine;
use repcoach::models::WorkoutEvent;
use repcoach::providers::{HevyClient, WorkoutProvider};

#[derive(Parser)]
#[command(name = "repcoach", version, about = "Strength-training coaching reports from logged history")]
struct Cli {
    /// Path to the coaching config JSON; defaults apply when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch recent workout events into a snapshot file
    Fetch {
        /// How many days of history to fetch
        #[arg(long, default_value_t = 30)]
        days: i64,

        /// Snapshot destination
        #[arg(short, long, default_value = "hevy_events.json")]
        outfile: PathBuf,
    },
    /// Analyze a saved snapshot and render the report
    Analyze {
        /// Snapshot to analyze
        #[arg(short, long, default_value = "hevy_events.json")]
        infile: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: Format,
    },
    /// Fetch and analyze in one step
    Run {
        #[arg(long, default_value_t = 30)]
        days: i64,

        /// Where to keep the fetched snapshot
        #[arg(short, long, default_value = "hevy_events.json")]
        outfile: PathBuf,

        #[arg(long, value_enum, default_value = "markdown")]
        format: Format,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => Self::Markdown,
            Format::Json => Self::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Fetch { days, outfile } => {
            let events = fetch(days).await?;
            save_snapshot(&outfile, &events).await?;
        }
        Command::Analyze { infile, format } => {
            let events = load_snapshot(&infile).await?;
            analyze(config, &events, format.into())?;
        }
        Command::Run {
            days,
            outfile,
            format,
        } => {
            let events = fetch(days).await?;
            save_snapshot(&outfile, &events).await?;
            analyze(config, &events, format.into())?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<CoachConfig> {
    match path {
        Some(path) => {
            let config = CoachConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            for issue in config.validate() {
                tracing::warn!(%issue, "config issue, affected entry will be sidelined");
            }
            Ok(config)
        }
        None => Ok(CoachConfig::default()),
    }
}

async fn fetch(days: i64) -> Result<Vec<WorkoutEvent>> {
    let client = HevyClient::from_env()?;
    let since = Utc::now() - Duration::days(days);
    let events = client
        .fetch_events(since)
        .await
        .context("fetching workout events")?;
    Ok(events)
}

async fn save_snapshot(path: &PathBuf, events: &[WorkoutEvent]) -> Result<()> {
    let json = serde_json::to_string_pretty(events)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("writing snapshot to {}", path.display()))?;
    info!(count = events.len(), path = %path.display(), "saved snapshot");
    Ok(())
}

async fn load_snapshot(path: &PathBuf) -> Result<Vec<WorkoutEvent>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    let events: Vec<WorkoutEvent> =
        serde_json::from_str(&raw).context("parsing snapshot JSON")?;
    Ok(events)
}

fn analyze(config: CoachConfig, events: &[WorkoutEvent], format: ReportFormat) -> Result<()> {
    let engine = CoachingEngine::new(config);
    let report = engine.analyze(events);
    let rendered = render(&report, format).context("rendering report")?;
    println!("{rendered}");
    Ok(())
}
