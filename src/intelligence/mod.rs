// ABOUTME: Coaching intelligence engine - the analysis core of the crate
// ABOUTME: History indexing, rep/RPE classification, progression, audits, grading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! # Intelligence Module
//!
//! Converts a time series of (weight, reps, RPE) observations per exercise
//! into classifications, scores, and next-session directives. Everything in
//! here is pure computation over an already-materialized snapshot: no I/O,
//! no wall-clock reads, byte-identical output for identical input.

pub mod audit;
pub mod classifier;
pub mod coaching_constants;
pub mod engine;
pub mod grading;
pub mod history;
pub mod insights;
pub mod periodization;
pub mod progression;
pub mod recommendation;
pub mod routine;

pub use audit::{DecisionAudit, DecisionAuditor, DecisionOutcome, DecisionRecord, WeightMove};
pub use classifier::{Assessment, Directive, RepRpeClassifier, Verdict};
pub use engine::{CoachingEngine, CoachingReport, ExerciseBreakdown, SessionSummary, SkippedExercise};
pub use grading::{Grade, ProgressSignal, SessionGrade, SessionGrader, SetIntensity};
pub use history::{ExerciseSeries, HistoryIndex, SessionInfo, SessionSample, WorkingSet};
pub use insights::{
    ExerciseUsage, HistoryOverview, InsightsAnalyzer, RecoveryStatus, VolumeRecoveryInsights,
    VolumeTrend, WeeklyVolume,
};
pub use periodization::{
    DeloadCandidate, PeriodizationAssessor, PeriodizationReport, ProgramStatus,
};
pub use progression::{ProgressionAnalyzer, ProgressionPoint, ProgressionSummary, Trend};
pub use recommendation::{Action, Recommendation, RecommendationSynthesizer};
pub use routine::{CyclePosition, RoutineResolver};

use coaching_constants::WEIGHT_EPSILON_KG;

/// Representative weights are compared with a small epsilon so float noise
/// never registers as a weight change.
#[must_use]
pub(crate) fn weights_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < WEIGHT_EPSILON_KG
}
