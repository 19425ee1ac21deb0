// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Hevy API client: paged workout-event fetch normalized into crate models
//!
//! Talks to the public Hevy API (`/v1/workouts/events`) with an `api-key`
//! header. Events come paged; each page mixes "updated" events (full
//! workout payloads) with "deleted" tombstones, and only the former are
//! kept. Duplicate workout ids across pages are dropped on first-seen
//! basis here so the engine never sees the same session twice from one
//! fetch.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::{ExerciseEntry, WorkoutEvent};
use crate::providers::{ProviderError, WorkoutProvider};

const DEFAULT_BASE_URL: &str = "https://api.hevyapp.com";
const API_KEY_ENV: &str = "HEVY_API_KEY";
const PAGE_SIZE: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One entry in the events feed.
#[derive(Debug, Deserialize)]
struct HevyEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    workout: Option<HevyWorkout>,
}

#[derive(Debug, Deserialize)]
struct HevyWorkout {
    id: String,
    title: String,
    start_time: DateTime<Utc>,
    #[serde(default)]
    exercises: Vec<ExerciseEntry>,
}

#[derive(Debug, Deserialize)]
struct EventPage {
    #[serde(default)]
    events: Vec<HevyEvent>,
    page_count: u32,
}

/// Hevy API client.
#[derive(Debug)]
pub struct HevyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HevyClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        })
    }

    /// Build a client from the `HEVY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ProviderError::MissingApiKey { env_var: API_KEY_ENV })?;
        Self::new(api_key)
    }

    /// Point the client at a different base URL (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_page(&self, page: u32, since: DateTime<Utc>) -> Result<EventPage, ProviderError> {
        let url = format!("{}/v1/workouts/events", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("api-key", &self.api_key)
            .query(&[
                ("page", page.to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
                ("since", since.to_rfc3339()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WorkoutProvider for HevyClient {
    async fn fetch_events(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutEvent>, ProviderError> {
        let mut events = Vec::new();
        let mut seen = BTreeSet::new();
        let mut page = 1;
        loop {
            let page_data = self.fetch_page(page, since).await?;
            debug!(page, page_count = page_data.page_count, "fetched events page");
            events.extend(collect_updated(page_data.events, &mut seen));
            if page >= page_data.page_count {
                break;
            }
            page += 1;
        }
        info!(count = events.len(), %since, "fetched workout events");
        Ok(events)
    }
}

/// Keep full "updated" payloads, drop tombstones and already-seen ids.
fn collect_updated(events: Vec<HevyEvent>, seen: &mut BTreeSet<String>) -> Vec<WorkoutEvent> {
    events
        .into_iter()
        .filter(|e| e.event_type == "updated")
        .filter_map(|e| e.workout)
        .filter(|w| seen.insert(w.id.clone()))
        .map(|w| WorkoutEvent {
            session_id: w.id,
            title: w.title,
            start_time: w.start_time,
            exercises: w.exercises,
        })
        .collect()
}
