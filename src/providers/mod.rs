// ABOUTME: Workout data providers - the only I/O seam in front of the engine
// ABOUTME: Narrow async trait returning plain workout events, plus provider errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! # Workout Providers
//!
//! The analysis engine consumes a materialized `Vec<WorkoutEvent>`; this
//! module defines the narrow seam that produces one. Implementations do
//! the network work and normalize into the crate's models, so everything
//! downstream stays pure and testable offline.

pub mod hevy;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::WorkoutEvent;

pub use hevy::HevyClient;

/// Provider-side failures.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured (set {env_var})")]
    MissingApiKey { env_var: &'static str },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of workout history.
#[async_trait]
pub trait WorkoutProvider: Send + Sync {
    /// Fetch all workout events updated at or after `since`.
    ///
    /// Implementations return events in whatever order the upstream API
    /// yields them; ordering and deduplication are the indexer's job.
    async fn fetch_events(&self, since: DateTime<Utc>)
        -> Result<Vec<WorkoutEvent>, ProviderError>;
}
