// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Coaching policy constants for RPE-based load calibration
//!
//! These values are policy, not derived fact: what counts as "too easy",
//! how aggressively to adjust load, and when a stall becomes a plateau are
//! judgment calls. They are named here (and mirrored by `CoachConfig`
//! defaults) so boundary values can be exercised explicitly in tests and
//! overridden per user without touching the analysis code.

/// RPE thresholds for intensity calibration
///
/// References:
/// - Zourdos, M.C. et al. (2016). Novel resistance training-specific RPE scale
///   measuring repetitions in reserve. J Strength Cond Res, 30(1)
/// - Helms, E.R. et al. (2016). Application of the repetitions-in-reserve-based
///   RPE scale for resistance training
pub mod rpe {
    /// Below this RPE an in-range set is considered too easy to drive adaptation
    pub const INCREASE_THRESHOLD: f64 = 7.5;

    /// Above this RPE a set is considered too costly to sustain; suggests a
    /// load reduction even when the rep target was hit. The effective band
    /// is [`INCREASE_THRESHOLD`, `DECREASE_THRESHOLD`], inclusive on both ends.
    pub const DECREASE_THRESHOLD: f64 = 9.0;
}

/// Multiplicative weight adjustment factors
pub mod adjustment {
    /// Reps fell short of the target range: the weight was too high
    pub const REP_SHORTFALL_FACTOR: f64 = 0.90;

    /// Reps exceeded the target range: the weight was too light
    pub const REP_SURPLUS_FACTOR: f64 = 1.05;

    /// In range but RPE below the increase threshold
    pub const RPE_EASY_FACTOR: f64 = 1.05;

    /// In range but RPE above the decrease threshold
    pub const RPE_HARD_FACTOR: f64 = 0.95;

    /// Smallest load step most gym equipment supports, in kilograms
    pub const DEFAULT_INCREMENT_KG: f64 = 2.5;
}

/// Session grading weights and thresholds
pub mod grading {
    /// Weight of the intensity (RPE balance) component in the overall score
    pub const INTENSITY_WEIGHT: f64 = 0.4;

    /// Weight of the progression component in the overall score
    pub const PROGRESS_WEIGHT: f64 = 0.6;

    /// Partial credit for a session-over-session plateau
    pub const PLATEAU_CREDIT: f64 = 50.0;

    /// Score assumed when a component has no judgeable inputs
    pub const NEUTRAL_SCORE: f64 = 100.0;

    /// Letter grade cutoffs; ties break toward the lower grade (strict >=)
    pub const A_PLUS_CUTOFF: f64 = 90.0;
    pub const A_CUTOFF: f64 = 85.0;
    pub const B_PLUS_CUTOFF: f64 = 80.0;
    pub const B_CUTOFF: f64 = 75.0;
    pub const C_PLUS_CUTOFF: f64 = 70.0;
    pub const C_CUTOFF: f64 = 65.0;
}

/// Plateau detection and deload policy
pub mod periodization {
    /// Consecutive sessions at identical weight before an exercise is stagnant
    pub const STAGNATION_SESSIONS: usize = 3;

    /// Fraction of stagnant exercises at which the whole program is plateaued
    pub const MAJOR_PLATEAU_FRACTION: f64 = 0.50;

    /// Fraction of stagnant exercises that signals a moderate plateau
    pub const MODERATE_PLATEAU_FRACTION: f64 = 0.30;

    /// Progressing vs. stagnant counts within this fraction of the total are
    /// reported as mixed progress
    pub const MIXED_TOLERANCE: f64 = 0.10;

    /// Recommended deload range for stagnant lifts, percent of current weight
    pub const DELOAD_MIN_PCT: f64 = 10.0;
    pub const DELOAD_MAX_PCT: f64 = 15.0;
}

/// Weekly volume trend and recovery policy
pub mod volume {
    /// Week-over-week volume change beyond this is a rapid swing, percent
    pub const RAPID_CHANGE_PCT: f64 = 10.0;

    /// Week-over-week volume change beyond this is a moderate swing, percent
    pub const MODERATE_CHANGE_PCT: f64 = 5.0;

    /// Rest-gap bounds (days) separating the recovery statuses, inclusive
    pub const HIGH_FREQUENCY_MAX_DAYS: i64 = 1;
    pub const GOOD_FREQUENCY_MAX_DAYS: i64 = 2;
    pub const OPTIMAL_RECOVERY_MAX_DAYS: i64 = 4;
    pub const EXTENDED_REST_MAX_DAYS: i64 = 7;

    /// Entries in the top-lifts-by-frequency/volume lists
    pub const TOP_LIFTS: usize = 5;
}

/// Analysis window sizes
pub mod windows {
    /// Sessions compared by the progression analyzer
    pub const PROGRESSION_WINDOW: usize = 4;

    /// Minimum sessions needed to judge a single weight-change decision
    pub const MIN_SESSIONS_FOR_AUDIT: usize = 2;
}

/// Two representative weights closer than this are the same weight.
/// Covers float noise from averaging and unit conversion, well below any
/// real equipment increment.
pub const WEIGHT_EPSILON_KG: f64 = 1e-6;
