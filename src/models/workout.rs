// ABOUTME: Workout event models mirroring the tracking API's event payloads
// ABOUTME: Immutable once fetched; the analysis core only derives from them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a logged set.
///
/// Only `Normal` sets are working sets; warm-ups, drop sets, and failure
/// sets are excluded from calibration analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    /// Regular working set
    #[default]
    Normal,
    /// Warm-up set, not counted toward analysis
    Warmup,
    /// Drop set performed after a working set
    Dropset,
    /// Set taken to muscular failure
    Failure,
    /// Any set type this crate does not model explicitly
    #[serde(other)]
    Other,
}

/// A single logged set within an exercise.
///
/// `weight_kg`, `reps`, and `rpe` are all optional in the wire format.
/// Absent weight or reps drops the individual set at indexing time;
/// absent RPE degrades to "cannot assess intensity".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Set classification from the tracking service
    #[serde(rename = "type", default)]
    pub set_type: SetType,
    /// Load in kilograms; `None` for bodyweight-only or unlogged sets
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Completed repetitions
    #[serde(default)]
    pub reps: Option<u32>,
    /// Self-reported Rate of Perceived Exertion (~6-10 scale)
    #[serde(default)]
    pub rpe: Option<f64>,
    /// Position of the set within the exercise (0-based)
    #[serde(default)]
    pub index: u32,
}

/// One exercise block within a workout, with its logged sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Exercise title as logged by the user
    pub title: String,
    /// Free-form notes attached to the exercise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Logged sets in order
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

/// A deduplicated workout event as consumed by the analysis core.
///
/// The fetch collaborator owns the wire protocol; the core only sees this
/// flattened value, keyed by `session_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEvent {
    /// Unique session identifier from the tracking service
    pub session_id: String,
    /// Workout title (e.g. "Day 1 - Upper (Push)")
    pub title: String,
    /// When the session started (UTC)
    pub start_time: DateTime<Utc>,
    /// Exercises performed in this session
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}
