// ABOUTME: Explicit immutable configuration consumed by every analysis component
// ABOUTME: Serde-loaded from JSON with documented defaults; no ambient globals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! # Coaching Configuration
//!
//! All tunable analysis policy lives in [`CoachConfig`]: rep-range rules,
//! exercise exclusions, assisted-exercise tags, RPE thresholds, equipment
//! increment, analysis windows, and the optional routine cycle. Components
//! receive the config object at construction; nothing reads module-level
//! state.
//!
//! Validation is per entry: a malformed rep range or an empty cycle
//! disables only that rule or the cycle, never the whole run.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intelligence::coaching_constants::{
    adjustment, periodization, rpe, windows,
};
use crate::models::canonical_name;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rep range for '{exercise}' is malformed: min {min} > max {max}")]
    MalformedRepRange {
        exercise: String,
        min: u32,
        max: u32,
    },

    #[error("routine cycle must contain at least one day")]
    EmptyCycle,

    #[error("equipment increment must be positive, got {0}")]
    NonPositiveIncrement(f64),
}

/// Target repetition bounds for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min_reps: u32,
    pub max_reps: u32,
}

impl RepRange {
    /// Create a rep range without validating bounds.
    #[must_use]
    pub const fn new(min_reps: u32, max_reps: u32) -> Self {
        Self { min_reps, max_reps }
    }

    /// A range is usable when min does not exceed max and at least one rep
    /// is required.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.min_reps > 0 && self.min_reps <= self.max_reps
    }

    /// Whether a completed rep count lands inside the target bounds.
    #[must_use]
    pub const fn contains(&self, reps: u32) -> bool {
        reps >= self.min_reps && reps <= self.max_reps
    }
}

/// RPE thresholds applied as an overlay on in-range rep counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpeThresholds {
    /// In-range sets below this RPE still get an increase suggestion
    pub increase_below: f64,
    /// Sets above this RPE get a decrease suggestion regardless of reps
    pub decrease_above: f64,
}

impl Default for RpeThresholds {
    fn default() -> Self {
        Self {
            increase_below: rpe::INCREASE_THRESHOLD,
            decrease_above: rpe::DECREASE_THRESHOLD,
        }
    }
}

/// Multiplicative weight adjustment policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentFactors {
    /// Applied when reps fall short of the target range (weight too high)
    pub rep_shortfall: f64,
    /// Applied when reps exceed the target range (weight too light)
    pub rep_surplus: f64,
    /// Applied when reps are in range but RPE is below the increase threshold
    pub rpe_easy: f64,
    /// Applied when RPE exceeds the decrease threshold
    pub rpe_hard: f64,
    /// Deload recommendation range for stagnant lifts, percent of weight
    pub deload_min_pct: f64,
    pub deload_max_pct: f64,
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self {
            rep_shortfall: adjustment::REP_SHORTFALL_FACTOR,
            rep_surplus: adjustment::REP_SURPLUS_FACTOR,
            rpe_easy: adjustment::RPE_EASY_FACTOR,
            rpe_hard: adjustment::RPE_HARD_FACTOR,
            deload_min_pct: periodization::DELOAD_MIN_PCT,
            deload_max_pct: periodization::DELOAD_MAX_PCT,
        }
    }
}

/// One day in a repeating routine cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleDay {
    /// Label matched against workout titles (e.g. "Day 1 - Upper (Push)")
    pub label: String,
    /// Rest days carry no recommendations
    #[serde(default)]
    pub is_rest: bool,
    /// Exercises expected on this day, used for fuzzy matching when the
    /// title alone is ambiguous
    #[serde(default)]
    pub exercises: Vec<String>,
}

/// Optional fixed-length repeating routine.
///
/// Day index is the position within `days`; cycle position arithmetic is
/// modulo `days.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineCycle {
    pub days: Vec<CycleDay>,
}

impl RoutineCycle {
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// A cycle with no days can never be resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days.is_empty() {
            return Err(ConfigError::EmptyCycle);
        }
        Ok(())
    }
}

/// Immutable analysis configuration passed into every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Target rep range per exercise; keys are canonicalized at load time.
    /// Exercises without an entry get a `no-target` verdict.
    pub rep_ranges: BTreeMap<String, RepRange>,

    /// Exercise names excluded from analysis entirely (cardio, warm-up
    /// blocks). Matched after canonicalization.
    pub excluded_exercises: BTreeSet<String>,

    /// Assistance-type exercises (machine-assisted dips/pull-ups) where a
    /// higher weight means more help, so adjustment direction is inverted.
    pub assisted_exercises: BTreeSet<String>,

    pub rpe: RpeThresholds,
    pub adjustments: AdjustmentFactors,

    /// Smallest weight step the user's equipment supports, in kilograms
    pub equipment_increment_kg: f64,

    /// Sessions compared by the progression analyzer
    pub progression_window: usize,

    /// Consecutive identical-weight sessions before a lift counts as stagnant
    pub plateau_sessions: usize,

    /// Optional repeating routine; absent means the engine analyzes the
    /// just-completed session instead of predicting the next one
    pub routine: Option<RoutineCycle>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            rep_ranges: BTreeMap::new(),
            excluded_exercises: default_exclusions(),
            assisted_exercises: BTreeSet::new(),
            rpe: RpeThresholds::default(),
            adjustments: AdjustmentFactors::default(),
            equipment_increment_kg: adjustment::DEFAULT_INCREMENT_KG,
            progression_window: windows::PROGRESSION_WINDOW,
            plateau_sessions: periodization::STAGNATION_SESSIONS,
            routine: None,
        }
    }
}

impl CoachConfig {
    /// Load configuration from a JSON file, canonicalizing all exercise keys.
    ///
    /// Missing fields fall back to the documented defaults, so a partial
    /// file overriding only `rep_ranges` is valid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config.canonicalized())
    }

    /// Rewrite all exercise-name keys into canonical form.
    #[must_use]
    pub fn canonicalized(mut self) -> Self {
        self.rep_ranges = self
            .rep_ranges
            .into_iter()
            .map(|(name, range)| (canonical_name(&name), range))
            .collect();
        self.excluded_exercises = self
            .excluded_exercises
            .iter()
            .map(|name| canonical_name(name))
            .collect();
        self.assisted_exercises = self
            .assisted_exercises
            .iter()
            .map(|name| canonical_name(name))
            .collect();
        self
    }

    /// Look up the rep-range rule for a canonical exercise name.
    ///
    /// Returns the configured range even when malformed; callers decide
    /// whether to isolate the exercise (see `ConfigError::MalformedRepRange`).
    #[must_use]
    pub fn rule_for(&self, canonical: &str) -> Option<&RepRange> {
        self.rep_ranges.get(canonical)
    }

    #[must_use]
    pub fn is_excluded(&self, canonical: &str) -> bool {
        self.excluded_exercises.contains(canonical)
    }

    #[must_use]
    pub fn is_assisted(&self, canonical: &str) -> bool {
        self.assisted_exercises.contains(canonical)
    }

    /// Collect non-fatal configuration issues.
    ///
    /// Malformed entries stay in the config; the engine skips the affected
    /// exercise or cycle and surfaces the reason in the report.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();
        for (exercise, range) in &self.rep_ranges {
            if !range.is_valid() {
                issues.push(ConfigError::MalformedRepRange {
                    exercise: exercise.clone(),
                    min: range.min_reps,
                    max: range.max_reps,
                });
            }
        }
        if let Some(routine) = &self.routine {
            if let Err(err) = routine.validate() {
                issues.push(err);
            }
        }
        if self.equipment_increment_kg <= 0.0 {
            issues.push(ConfigError::NonPositiveIncrement(self.equipment_increment_kg));
        }
        issues
    }
}

/// Non-strength categories dropped before indexing, matching the stock
/// tracking-app activity names.
fn default_exclusions() -> BTreeSet<String> {
    [
        "warm up",
        "treadmill",
        "walking",
        "running",
        "elliptical",
        "bike",
        "stair climber",
        "rest",
        "stretching",
        "meditation",
        "cardio",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
