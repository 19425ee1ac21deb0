// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Per-set verdicts combining target rep ranges with RPE readings
//!
//! The classifier answers one question: was the weight calibrated correctly
//! for the target rep range, given how hard the set felt? Verdicts come
//! from the closed set {too-light, in-range, too-heavy, no-target}; every
//! verdict carries a multiplicative adjustment and a rounded next-session
//! weight suggestion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{CoachConfig, RepRange};
use crate::intelligence::history::SessionSample;

/// Calibration verdict for one representative set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Reps exceeded the target range; the weight did not challenge the range
    TooLight,
    /// Reps landed inside the target range
    InRange,
    /// Reps fell short of the target range; the weight was too high
    TooHeavy,
    /// No rep-range rule configured for this exercise
    NoTarget,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TooLight => "too light",
            Self::InRange => "in range",
            Self::TooHeavy => "too heavy",
            Self::NoTarget => "no target",
        };
        f.write_str(label)
    }
}

/// What the evidence says the next weight change should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    Increase,
    Decrease,
    Maintain,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
        };
        f.write_str(label)
    }
}

/// Full classifier output for one set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub directive: Directive,
    /// Multiplicative adjustment; 1.0 means no change
    pub factor: f64,
    /// Suggested next-session weight, rounded to the equipment increment.
    /// `None` only for `no-target` verdicts.
    pub suggested_weight_kg: Option<f64>,
    /// True when the adjustment came from the RPE overlay rather than reps
    pub rpe_driven: bool,
    /// Short human-readable evidence summary, reused by the decision auditor
    pub reason: String,
}

/// Rep/RPE classifier configured with thresholds and the equipment increment.
#[derive(Debug, Clone)]
pub struct RepRpeClassifier {
    increase_below: f64,
    decrease_above: f64,
    rep_shortfall: f64,
    rep_surplus: f64,
    rpe_easy: f64,
    rpe_hard: f64,
    increment_kg: f64,
}

impl RepRpeClassifier {
    #[must_use]
    pub fn new(config: &CoachConfig) -> Self {
        Self {
            increase_below: config.rpe.increase_below,
            decrease_above: config.rpe.decrease_above,
            rep_shortfall: config.adjustments.rep_shortfall,
            rep_surplus: config.adjustments.rep_surplus,
            rpe_easy: config.adjustments.rpe_easy,
            rpe_hard: config.adjustments.rpe_hard,
            increment_kg: config.equipment_increment_kg,
        }
    }

    /// Classify one representative set against its rep-range rule.
    #[must_use]
    pub fn assess(
        &self,
        weight_kg: f64,
        reps: u32,
        rpe: Option<f64>,
        rule: Option<&RepRange>,
    ) -> Assessment {
        let Some(range) = rule else {
            return Assessment {
                verdict: Verdict::NoTarget,
                directive: Directive::Maintain,
                factor: 1.0,
                suggested_weight_kg: None,
                rpe_driven: false,
                reason: "no rep target configured".to_owned(),
            };
        };

        if reps < range.min_reps {
            return self.adjusted(
                Verdict::TooHeavy,
                weight_kg,
                self.rep_shortfall,
                false,
                format!("{reps} reps fell short of the {}-{} target", range.min_reps, range.max_reps),
            );
        }
        if reps > range.max_reps {
            return self.adjusted(
                Verdict::TooLight,
                weight_kg,
                self.rep_surplus,
                false,
                format!("{reps} reps exceeded the {}-{} target", range.min_reps, range.max_reps),
            );
        }

        // Reps in range: RPE overlay. Missing RPE means intensity cannot be
        // assessed, so the verdict stays in-range with no override.
        match rpe {
            Some(r) if r < self.increase_below => self.adjusted(
                Verdict::InRange,
                weight_kg,
                self.rpe_easy,
                true,
                format!("reps in range but RPE {r:.1} below {:.1}", self.increase_below),
            ),
            Some(r) if r > self.decrease_above => self.adjusted(
                Verdict::InRange,
                weight_kg,
                self.rpe_hard,
                true,
                format!("RPE {r:.1} above the {:.1} ceiling", self.decrease_above),
            ),
            Some(r) => Assessment {
                verdict: Verdict::InRange,
                directive: Directive::Maintain,
                factor: 1.0,
                suggested_weight_kg: Some(weight_kg),
                rpe_driven: false,
                reason: format!("reps in range at RPE {r:.1}"),
            },
            None => Assessment {
                verdict: Verdict::InRange,
                directive: Directive::Maintain,
                factor: 1.0,
                suggested_weight_kg: Some(weight_kg),
                rpe_driven: false,
                reason: "reps in range, no RPE logged".to_owned(),
            },
        }
    }

    /// Classify a session's representative set.
    #[must_use]
    pub fn assess_sample(&self, sample: &SessionSample, rule: Option<&RepRange>) -> Assessment {
        self.assess(sample.weight_kg, sample.reps, sample.rpe, rule)
    }

    fn adjusted(
        &self,
        verdict: Verdict,
        weight_kg: f64,
        factor: f64,
        rpe_driven: bool,
        reason: String,
    ) -> Assessment {
        let directive = directive_for_factor(factor);
        let suggested =
            round_to_increment(weight_kg * factor, weight_kg, directive, self.increment_kg);
        Assessment {
            verdict,
            directive,
            factor,
            suggested_weight_kg: Some(suggested),
            rpe_driven,
            reason,
        }
    }
}

/// Map a multiplicative factor to its directive.
#[must_use]
pub(crate) fn directive_for_factor(factor: f64) -> Directive {
    if factor > 1.0 {
        Directive::Increase
    } else if factor < 1.0 {
        Directive::Decrease
    } else {
        Directive::Maintain
    }
}

/// Round an adjusted weight to the nearest equipment increment.
///
/// Rounding never neutralizes an adjustment: a decrease suggestion must land
/// strictly below the current weight and an increase strictly above it, each
/// by at least one increment. Decreases are floored at zero.
#[must_use]
pub(crate) fn round_to_increment(
    raw: f64,
    current_kg: f64,
    directive: Directive,
    increment_kg: f64,
) -> f64 {
    let rounded = (raw / increment_kg).round() * increment_kg;
    match directive {
        Directive::Decrease if rounded >= current_kg => (current_kg - increment_kg).max(0.0),
        Directive::Increase if rounded <= current_kg => current_kg + increment_kg,
        Directive::Maintain => current_kg,
        _ => rounded.max(0.0),
    }
}
