// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Exercise history index: groups raw set records by exercise, chronologically
//!
//! The leaf data structure everything else queries. Building it is a pure
//! transform over the fetched events: sessions are deduplicated by id
//! (first seen wins), sets with missing weight or reps are dropped
//! individually, and configured non-strength categories are excluded with
//! per-category counts kept for diagnostics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CoachConfig;
use crate::models::{canonical_name, SetType, WorkoutEvent};

/// One working set retained for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingSet {
    pub weight_kg: f64,
    pub reps: u32,
    pub rpe: Option<f64>,
}

/// One exercise's appearance in one session.
///
/// Carries both the full working-set list (for per-set intensity scoring
/// and report breakdowns) and the representative set the calibration
/// analysis runs on.
///
/// Representative-set policy (fixed, deterministic): the top working set
/// of the session - highest weight, ties broken by more reps, then by the
/// later set index. Warm-up, drop, and failure sets never qualify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSample {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    /// Representative (top) working set weight
    pub weight_kg: f64,
    /// Representative working set reps
    pub reps: u32,
    /// Representative working set RPE, if logged
    pub rpe: Option<f64>,
    /// All working sets of the session for this exercise
    pub sets: Vec<WorkingSet>,
    /// Total volume (weight x reps summed over working sets)
    pub volume_kg: f64,
}

/// Ordered per-exercise history, most recent session first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSeries {
    /// Canonical name used for rule lookup
    pub canonical: String,
    /// Display name as first seen in the log
    pub display_name: String,
    /// Sessions sorted by timestamp descending; never empty
    pub sessions: Vec<SessionSample>,
}

impl ExerciseSeries {
    /// Most recent session. The index never emits an empty series.
    #[must_use]
    pub fn latest(&self) -> &SessionSample {
        &self.sessions[0]
    }

    /// Sessions in chronological (oldest first) order.
    pub fn chronological(&self) -> impl Iterator<Item = &SessionSample> {
        self.sessions.iter().rev()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Session id to timestamp/title mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// Index of all analyzable history, keyed by canonical exercise name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryIndex {
    series: BTreeMap<String, ExerciseSeries>,
    sessions: BTreeMap<String, SessionInfo>,
    /// Sets dropped per excluded category (diagnostics)
    pub excluded_set_counts: BTreeMap<String, usize>,
    /// Sets dropped for missing weight or reps
    pub dropped_incomplete_sets: usize,
    /// Duplicate session ids reconciled by keeping the first-seen record
    pub duplicate_sessions: usize,
}

impl HistoryIndex {
    /// Build the index from fetched events.
    #[must_use]
    pub fn build(events: &[WorkoutEvent], config: &CoachConfig) -> Self {
        let mut index = Self::default();

        // canonical -> session_id -> (display, timestamp, working sets)
        let mut buckets: BTreeMap<String, BTreeMap<String, SessionBucket>> = BTreeMap::new();

        for event in events {
            if index.sessions.contains_key(&event.session_id) {
                warn!(
                    session_id = %event.session_id,
                    "duplicate session id in fetched events, keeping first-seen record"
                );
                index.duplicate_sessions += 1;
                continue;
            }
            index.sessions.insert(
                event.session_id.clone(),
                SessionInfo {
                    session_id: event.session_id.clone(),
                    title: event.title.clone(),
                    timestamp: event.start_time,
                },
            );

            for entry in &event.exercises {
                let canonical = canonical_name(&entry.title);
                if config.is_excluded(&canonical) {
                    let working = entry
                        .sets
                        .iter()
                        .filter(|s| s.set_type == SetType::Normal)
                        .count()
                        .max(1);
                    *index.excluded_set_counts.entry(canonical).or_insert(0) += working;
                    continue;
                }

                let bucket = buckets
                    .entry(canonical)
                    .or_default()
                    .entry(event.session_id.clone())
                    .or_insert_with(|| SessionBucket {
                        display: entry.title.clone(),
                        timestamp: event.start_time,
                        sets: Vec::new(),
                    });

                for set in &entry.sets {
                    if set.set_type != SetType::Normal {
                        continue;
                    }
                    match (set.weight_kg, set.reps) {
                        (Some(weight_kg), Some(reps)) => bucket.sets.push(WorkingSet {
                            weight_kg,
                            reps,
                            rpe: set.rpe,
                        }),
                        _ => index.dropped_incomplete_sets += 1,
                    }
                }
            }
        }

        for (canonical, sessions) in buckets {
            let mut samples: Vec<SessionSample> = Vec::new();
            let mut display_name = None;
            for (session_id, bucket) in sessions {
                if bucket.sets.is_empty() {
                    continue;
                }
                display_name.get_or_insert(bucket.display);
                samples.push(make_sample(session_id, bucket.timestamp, bucket.sets));
            }
            if samples.is_empty() {
                continue;
            }
            samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let display_name = display_name.unwrap_or_else(|| canonical.clone());
            index.series.insert(
                canonical.clone(),
                ExerciseSeries {
                    canonical,
                    display_name,
                    sessions: samples,
                },
            );
        }

        debug!(
            exercises = index.series.len(),
            sessions = index.sessions.len(),
            dropped_sets = index.dropped_incomplete_sets,
            "built exercise history index"
        );
        index
    }

    /// All indexed series in canonical-name order.
    pub fn series(&self) -> impl Iterator<Item = &ExerciseSeries> {
        self.series.values()
    }

    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&ExerciseSeries> {
        self.series.get(canonical)
    }

    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// All indexed sessions, in session-id order.
    pub fn sessions(&self) -> impl Iterator<Item = &SessionInfo> {
        self.sessions.values()
    }

    /// The most recent session across all exercises.
    #[must_use]
    pub fn latest_session(&self) -> Option<&SessionInfo> {
        self.sessions.values().max_by_key(|info| info.timestamp)
    }

    /// Series whose most recent appearance is the given session.
    pub fn series_in_session<'a>(
        &'a self,
        session_id: &'a str,
    ) -> impl Iterator<Item = &'a ExerciseSeries> {
        self.series
            .values()
            .filter(move |series| series.latest().session_id == session_id)
    }
}

struct SessionBucket {
    display: String,
    timestamp: DateTime<Utc>,
    sets: Vec<WorkingSet>,
}

/// Pick the representative set and compute session aggregates.
fn make_sample(
    session_id: String,
    timestamp: DateTime<Utc>,
    sets: Vec<WorkingSet>,
) -> SessionSample {
    let volume_kg = sets
        .iter()
        .map(|s| s.weight_kg * f64::from(s.reps))
        .sum();
    // Top working set: highest weight, then most reps, then latest set.
    let top = sets
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            a.weight_kg
                .partial_cmp(&b.weight_kg)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.reps.cmp(&b.reps))
                .then(ia.cmp(ib))
        })
        .map(|(_, set)| set.clone())
        .unwrap_or(WorkingSet {
            weight_kg: 0.0,
            reps: 0,
            rpe: None,
        });

    SessionSample {
        session_id,
        timestamp,
        weight_kg: top.weight_kg,
        reps: top.reps,
        rpe: top.rpe,
        sets,
        volume_kg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseEntry, SetRecord};
    use chrono::TimeZone;

    fn set(weight: f64, reps: u32, rpe: Option<f64>) -> SetRecord {
        SetRecord {
            set_type: SetType::Normal,
            weight_kg: Some(weight),
            reps: Some(reps),
            rpe,
            index: 0,
        }
    }

    fn event(id: &str, title: &str, day: u32, exercises: Vec<ExerciseEntry>) -> WorkoutEvent {
        WorkoutEvent {
            session_id: id.to_owned(),
            title: title.to_owned(),
            start_time: Utc.with_ymd_and_hms(2026, 8, day, 10, 0, 0).unwrap(),
            exercises,
        }
    }

    fn entry(title: &str, sets: Vec<SetRecord>) -> ExerciseEntry {
        ExerciseEntry {
            title: title.to_owned(),
            notes: None,
            sets,
        }
    }

    #[test]
    fn test_series_are_most_recent_first() {
        let events = vec![
            event("a", "Push", 1, vec![entry("Bench Press", vec![set(80.0, 8, None)])]),
            event("b", "Push", 8, vec![entry("Bench Press", vec![set(82.5, 8, None)])]),
        ];
        let index = HistoryIndex::build(&events, &CoachConfig::default());
        let series = index.get("bench press").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().weight_kg, 82.5);
        let chrono: Vec<f64> = series.chronological().map(|s| s.weight_kg).collect();
        assert_eq!(chrono, vec![80.0, 82.5]);
    }

    #[test]
    fn test_duplicate_session_keeps_first_seen() {
        let events = vec![
            event("a", "Push", 1, vec![entry("Bench Press", vec![set(80.0, 8, None)])]),
            event("a", "Push again", 2, vec![entry("Bench Press", vec![set(100.0, 8, None)])]),
        ];
        let index = HistoryIndex::build(&events, &CoachConfig::default());
        assert_eq!(index.duplicate_sessions, 1);
        assert_eq!(index.session_count(), 1);
        assert_eq!(index.get("bench press").unwrap().latest().weight_kg, 80.0);
    }

    #[test]
    fn test_incomplete_sets_dropped_session_kept() {
        let incomplete = SetRecord {
            set_type: SetType::Normal,
            weight_kg: None,
            reps: Some(8),
            rpe: None,
            index: 0,
        };
        let events = vec![event(
            "a",
            "Push",
            1,
            vec![entry("Bench Press", vec![incomplete, set(80.0, 8, None)])],
        )];
        let index = HistoryIndex::build(&events, &CoachConfig::default());
        assert_eq!(index.dropped_incomplete_sets, 1);
        assert_eq!(index.get("bench press").unwrap().latest().sets.len(), 1);
    }

    #[test]
    fn test_excluded_categories_counted_not_indexed() {
        let events = vec![event(
            "a",
            "Cardio day",
            1,
            vec![entry("Treadmill", vec![set(0.0, 1, None)])],
        )];
        let index = HistoryIndex::build(&events, &CoachConfig::default());
        assert!(index.get("treadmill").is_none());
        assert_eq!(index.excluded_set_counts.get("treadmill"), Some(&1));
    }

    #[test]
    fn test_representative_set_is_top_working_set() {
        let events = vec![event(
            "a",
            "Push",
            1,
            vec![entry(
                "Bench Press",
                vec![
                    set(75.0, 10, Some(7.0)),
                    set(82.5, 6, Some(9.0)),
                    set(80.0, 8, Some(8.5)),
                ],
            )],
        )];
        let index = HistoryIndex::build(&events, &CoachConfig::default());
        let latest = index.get("bench press").unwrap().latest();
        assert_eq!(latest.weight_kg, 82.5);
        assert_eq!(latest.reps, 6);
        assert_eq!(latest.rpe, Some(9.0));
        assert_eq!(latest.sets.len(), 3);
    }

    #[test]
    fn test_warmup_sets_never_representative() {
        let warmup = SetRecord {
            set_type: SetType::Warmup,
            weight_kg: Some(120.0),
            reps: Some(3),
            rpe: None,
            index: 0,
        };
        let events = vec![event(
            "a",
            "Push",
            1,
            vec![entry("Bench Press", vec![warmup, set(80.0, 8, None)])],
        )];
        let index = HistoryIndex::build(&events, &CoachConfig::default());
        assert_eq!(index.get("bench press").unwrap().latest().weight_kg, 80.0);
    }
}
