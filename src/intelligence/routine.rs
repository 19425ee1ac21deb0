// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Maps workout history onto a configured repeating cycle
//!
//! State machine over a fixed-length cycle: find which configured day the
//! most recent workout was, then the next state is (matched + 1) mod cycle
//! length. Matching tries the workout title first and falls back to
//! overlap between the session's exercises and each day's configured
//! exercise set. Anything ambiguous fails soft to "cycle position
//! unknown" so the caller can fall back to same-session analysis.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RoutineCycle;
use crate::models::canonical_name;

/// Minimum share of the session's exercises that must appear in a day's
/// configured set for a fuzzy match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.5;

/// Resolved position within the routine cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum CyclePosition {
    /// The most recent workout matched a configured day.
    Known {
        /// Day index the latest workout matched (0-based)
        matched_day: usize,
        matched_label: String,
        /// (matched_day + 1) mod cycle length
        next_day: usize,
        next_label: String,
        /// First non-rest day at or after `next_day`; `None` when every
        /// day in the cycle is a rest day
        next_training_day: Option<usize>,
    },
    /// The latest workout could not be placed in the cycle.
    Unknown { reason: String },
}

/// Resolver over a validated routine cycle.
#[derive(Debug)]
pub struct RoutineResolver<'a> {
    cycle: &'a RoutineCycle,
}

impl<'a> RoutineResolver<'a> {
    #[must_use]
    pub fn new(cycle: &'a RoutineCycle) -> Self {
        Self { cycle }
    }

    /// Place the most recent workout in the cycle.
    #[must_use]
    pub fn resolve(&self, latest_title: &str, latest_exercises: &[String]) -> CyclePosition {
        if self.cycle.is_empty() {
            return CyclePosition::Unknown {
                reason: "routine cycle has no days".to_owned(),
            };
        }

        let matched = match self.match_by_title(latest_title) {
            TitleMatch::One(day) => Some(day),
            TitleMatch::Ambiguous => {
                return CyclePosition::Unknown {
                    reason: format!("workout title '{latest_title}' matches more than one cycle day"),
                }
            }
            TitleMatch::None => match self.match_by_exercises(latest_exercises) {
                ExerciseMatch::One(day) => Some(day),
                ExerciseMatch::Ambiguous => {
                    return CyclePosition::Unknown {
                        reason: "exercise overlap is ambiguous between cycle days".to_owned(),
                    }
                }
                ExerciseMatch::None => None,
            },
        };

        let Some(matched_day) = matched else {
            return CyclePosition::Unknown {
                reason: format!("workout '{latest_title}' did not match any configured cycle day"),
            };
        };

        let len = self.cycle.len();
        let next_day = (matched_day + 1) % len;
        debug!(matched_day, next_day, "resolved cycle position");
        CyclePosition::Known {
            matched_day,
            matched_label: self.cycle.days[matched_day].label.clone(),
            next_day,
            next_label: self.cycle.days[next_day].label.clone(),
            next_training_day: self.next_training_day(next_day),
        }
    }

    fn match_by_title(&self, title: &str) -> TitleMatch {
        let canonical_title = canonical_name(title);
        if canonical_title.is_empty() {
            return TitleMatch::None;
        }
        let matches: Vec<usize> = self
            .cycle
            .days
            .iter()
            .enumerate()
            .filter(|(_, day)| {
                let label = canonical_name(&day.label);
                label == canonical_title
                    || label.contains(&canonical_title)
                    || canonical_title.contains(&label)
            })
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [] => TitleMatch::None,
            [day] => TitleMatch::One(*day),
            _ => TitleMatch::Ambiguous,
        }
    }

    fn match_by_exercises(&self, exercises: &[String]) -> ExerciseMatch {
        if exercises.is_empty() {
            return ExerciseMatch::None;
        }
        let session: Vec<String> = exercises.iter().map(|e| canonical_name(e)).collect();

        let mut best: Option<(usize, f64)> = None;
        let mut tied = false;
        for (i, day) in self.cycle.days.iter().enumerate() {
            if day.exercises.is_empty() {
                continue;
            }
            let day_set: Vec<String> = day.exercises.iter().map(|e| canonical_name(e)).collect();
            let overlap = session.iter().filter(|e| day_set.contains(e)).count();
            let score = overlap as f64 / session.len() as f64;
            match best {
                Some((_, best_score)) if score > best_score => {
                    best = Some((i, score));
                    tied = false;
                }
                Some((_, best_score)) if score == best_score && score > 0.0 => tied = true,
                None => best = Some((i, score)),
                _ => {}
            }
        }

        match best {
            Some((day, score)) if score >= FUZZY_MATCH_THRESHOLD => {
                if tied {
                    ExerciseMatch::Ambiguous
                } else {
                    ExerciseMatch::One(day)
                }
            }
            _ => ExerciseMatch::None,
        }
    }

    fn next_training_day(&self, from: usize) -> Option<usize> {
        let len = self.cycle.len();
        (0..len)
            .map(|offset| (from + offset) % len)
            .find(|&day| !self.cycle.days[day].is_rest)
    }
}

enum TitleMatch {
    One(usize),
    Ambiguous,
    None,
}

enum ExerciseMatch {
    One(usize),
    Ambiguous,
    None,
}
