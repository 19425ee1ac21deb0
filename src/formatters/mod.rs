// ABOUTME: Report rendering - markdown for humans, JSON for machines
// ABOUTME: Pure functions over the finished CoachingReport, no I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! # Report Formatters
//!
//! Rendering is glue: the engine's [`CoachingReport`] is the contract and
//! these functions only reshape it. JSON output is the report serialized
//! as-is, so anything the markdown view shows can be recovered from it.

pub mod markdown;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intelligence::CoachingReport;

/// Rendering failures.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Render a report in the requested format.
pub fn render(report: &CoachingReport, format: ReportFormat) -> Result<String, FormatError> {
    match format {
        ReportFormat::Markdown => Ok(markdown::render_markdown(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}
