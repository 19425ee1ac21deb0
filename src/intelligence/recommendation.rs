// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Next-session weight targets merging verdicts, trends, and deload flags
//!
//! One recommendation per exercise. Deload flags always win over a plain
//! progression suggestion. Assistance-type exercises (machine-assisted
//! dips/pull-ups) carry inverse weight semantics - more weight means more
//! help - so the adjustment direction is inverted before rounding and the
//! rationale says so explicitly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;
use crate::intelligence::classifier::{round_to_increment, Assessment, Directive, Verdict};
use crate::intelligence::periodization::DeloadCandidate;
use crate::intelligence::progression::ProgressionSummary;

/// Recommended action for the next session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Increase,
    Decrease,
    Maintain,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
        };
        f.write_str(label)
    }
}

impl From<Directive> for Action {
    fn from(directive: Directive) -> Self {
        match directive {
            Directive::Increase => Self::Increase,
            Directive::Decrease => Self::Decrease,
            Directive::Maintain => Self::Maintain,
        }
    }
}

/// One synthesized per-exercise recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub exercise: String,
    pub action: Action,
    pub current_weight_kg: f64,
    pub target_weight_kg: f64,
    pub verdict: Verdict,
    pub rationale: String,
    pub is_deload: bool,
    pub assisted: bool,
}

/// Synthesizer configured with the assisted-exercise tag set and increment.
#[derive(Debug, Clone)]
pub struct RecommendationSynthesizer {
    increment_kg: f64,
}

impl RecommendationSynthesizer {
    #[must_use]
    pub fn new(config: &CoachConfig) -> Self {
        Self {
            increment_kg: config.equipment_increment_kg,
        }
    }

    /// Merge the classifier assessment, trend, and an optional deload flag
    /// into one recommendation. Pure: identical inputs produce identical
    /// output.
    #[must_use]
    pub fn synthesize(
        &self,
        exercise: &str,
        assessment: &Assessment,
        current_weight_kg: f64,
        trend: Option<&ProgressionSummary>,
        deload: Option<&DeloadCandidate>,
        assisted: bool,
    ) -> Recommendation {
        // Deload precedence: a stagnation flag overrides whatever the last
        // session's calibration suggested.
        if let Some(candidate) = deload {
            return self.deload_recommendation(exercise, candidate, assessment, assisted);
        }

        if assessment.verdict == Verdict::NoTarget {
            return Recommendation {
                exercise: exercise.to_owned(),
                action: Action::Maintain,
                current_weight_kg,
                target_weight_kg: current_weight_kg,
                verdict: Verdict::NoTarget,
                rationale: "no rep target configured - add one to enable weight calibration"
                    .to_owned(),
                is_deload: false,
                assisted,
            };
        }

        let (directive, factor) = if assisted {
            (invert(assessment.directive), invert_factor(assessment.factor))
        } else {
            (assessment.directive, assessment.factor)
        };

        let target_weight_kg = match directive {
            Directive::Maintain => current_weight_kg,
            _ => round_to_increment(
                current_weight_kg * factor,
                current_weight_kg,
                directive,
                self.increment_kg,
            ),
        };

        let mut rationale = assessment.reason.clone();
        if assisted {
            rationale.push_str(
                "; assisted movement, so the adjustment is inverted: changing the assistance \
                 weight the other way changes difficulty the intended way",
            );
        }
        if let Some(summary) = trend {
            if summary.reduced_confidence {
                rationale.push_str(" (short history, reduced confidence)");
            }
        }

        Recommendation {
            exercise: exercise.to_owned(),
            action: directive.into(),
            current_weight_kg,
            target_weight_kg,
            verdict: assessment.verdict,
            rationale,
            is_deload: false,
            assisted,
        }
    }

    fn deload_recommendation(
        &self,
        exercise: &str,
        candidate: &DeloadCandidate,
        assessment: &Assessment,
        assisted: bool,
    ) -> Recommendation {
        let current = candidate.current_weight_kg;
        let (directive, target) = if assisted {
            // Deloading an assisted movement means more assistance weight.
            let mid_pct = (candidate.reduction_pct_min + candidate.reduction_pct_max) / 2.0;
            let raw = current * (1.0 + mid_pct / 100.0);
            (
                Directive::Increase,
                round_to_increment(raw, current, Directive::Increase, self.increment_kg),
            )
        } else {
            (Directive::Decrease, candidate.suggested_weight_kg)
        };

        let mut rationale = format!(
            "stagnant for {} sessions - deload {:.0}-{:.0}% for technique focus",
            candidate.sessions_stagnant,
            candidate.reduction_pct_min,
            candidate.reduction_pct_max,
        );
        if assisted {
            rationale.push_str("; assisted movement, so the deload adds assistance weight");
        }

        Recommendation {
            exercise: exercise.to_owned(),
            action: directive.into(),
            current_weight_kg: current,
            target_weight_kg: target,
            verdict: assessment.verdict,
            rationale,
            is_deload: true,
            assisted,
        }
    }
}

const fn invert(directive: Directive) -> Directive {
    match directive {
        Directive::Increase => Directive::Decrease,
        Directive::Decrease => Directive::Increase,
        Directive::Maintain => Directive::Maintain,
    }
}

/// Mirror a multiplicative factor around 1.0 so a 5% increase becomes a 5%
/// decrease of assistance weight and vice versa.
fn invert_factor(factor: f64) -> f64 {
    2.0 - factor
}
