// ABOUTME: Value types for fetched workout data shared across the crate
// ABOUTME: Workout events, per-set records, and exercise name canonicalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

pub mod workout;

pub use workout::{ExerciseEntry, SetRecord, SetType, WorkoutEvent};

/// Canonical form of an exercise name used for rule lookup and indexing.
///
/// Tracked titles and configured rule keys vary in case and spacing
/// ("Bench  Press" vs "bench press"). Canonicalization happens once at
/// ingestion; names that still match nothing are surfaced to the caller
/// instead of silently defaulting.
#[must_use]
pub fn canonical_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
