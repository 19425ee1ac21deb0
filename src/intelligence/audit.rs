// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Retrospective audit of past weight-change decisions
//!
//! Walks each exercise's history oldest to newest and asks, for every
//! transition: given the reps and RPE logged in session *i*, was the
//! weight change applied in session *i+1* the right call? The nuance this
//! module exists for is separating deliberate deloads (weight dropped
//! because RPE was through the roof - a smart adjustment) from true
//! regressions, and catching the opposite case where weight was raised on
//! top of an already unsustainable RPE.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RepRange;
use crate::intelligence::classifier::{Directive, RepRpeClassifier};
use crate::intelligence::coaching_constants::windows;
use crate::intelligence::history::ExerciseSeries;
use crate::intelligence::weights_equal;

/// What actually happened to the weight between two sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMove {
    Increased,
    Decreased,
    Maintained,
}

impl fmt::Display for WeightMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Increased => "increased",
            Self::Decreased => "decreased",
            Self::Maintained => "maintained",
        };
        f.write_str(label)
    }
}

/// Judgment for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionOutcome {
    /// The change matched what the evidence called for
    Correct,
    /// Weight dropped after a very high RPE: a deliberate deload, counted
    /// as correct and never as a regression
    SmartAdjustment,
    /// The evidence called for a change that was skipped or reversed, or
    /// weight was raised on top of an unsustainable RPE
    MissedOpportunity,
    /// Any other mismatch between evidence and action
    Incorrect,
}

/// One judged transition between consecutive sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub exercise: String,
    /// Session in which the decision took effect
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub prior_weight_kg: f64,
    pub new_weight_kg: f64,
    pub prior_reps: u32,
    pub prior_rpe: Option<f64>,
    /// What the classifier would have directed at the time
    pub expected: Directive,
    pub actual: WeightMove,
    pub outcome: DecisionOutcome,
    pub judged_correct: bool,
    pub reason: String,
}

/// Aggregated audit for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionAudit {
    pub exercise: String,
    pub records: Vec<DecisionRecord>,
    pub judged: usize,
    pub correct: usize,
    pub smart_adjustments: usize,
    pub missed_opportunities: usize,
    /// correct / judged * 100; `None` when nothing was judgeable
    pub efficiency_pct: Option<f64>,
}

/// Auditor replaying the classifier against historical transitions.
#[derive(Debug)]
pub struct DecisionAuditor<'a> {
    classifier: &'a RepRpeClassifier,
    /// RPE above this makes a subsequent decrease a smart adjustment and a
    /// subsequent increase a missed opportunity
    rpe_ceiling: f64,
}

impl<'a> DecisionAuditor<'a> {
    #[must_use]
    pub fn new(classifier: &'a RepRpeClassifier, rpe_ceiling: f64) -> Self {
        Self {
            classifier,
            rpe_ceiling,
        }
    }

    /// Audit every transition of one exercise series.
    ///
    /// Transitions without a rep-range rule are excluded from judgment
    /// entirely, so exercises with no rule yield an empty audit.
    #[must_use]
    pub fn audit(&self, series: &ExerciseSeries, rule: Option<&RepRange>) -> DecisionAudit {
        let mut audit = DecisionAudit {
            exercise: series.display_name.clone(),
            records: Vec::new(),
            judged: 0,
            correct: 0,
            smart_adjustments: 0,
            missed_opportunities: 0,
            efficiency_pct: None,
        };
        let Some(rule) = rule else {
            return audit;
        };
        if series.len() < windows::MIN_SESSIONS_FOR_AUDIT {
            return audit;
        }

        let chronological: Vec<_> = series.chronological().collect();
        for pair in chronological.windows(2) {
            let (prior, next) = (pair[0], pair[1]);
            let assessment = self.classifier.assess_sample(prior, Some(rule));
            let expected = assessment.directive;

            let actual = if weights_equal(prior.weight_kg, next.weight_kg) {
                WeightMove::Maintained
            } else if next.weight_kg > prior.weight_kg {
                WeightMove::Increased
            } else {
                WeightMove::Decreased
            };

            let rpe_over_ceiling = prior.rpe.is_some_and(|r| r > self.rpe_ceiling);
            let (outcome, reason) = judge(expected, actual, rpe_over_ceiling, prior.rpe, &assessment.reason);

            let judged_correct =
                matches!(outcome, DecisionOutcome::Correct | DecisionOutcome::SmartAdjustment);
            audit.judged += 1;
            if judged_correct {
                audit.correct += 1;
            }
            match outcome {
                DecisionOutcome::SmartAdjustment => audit.smart_adjustments += 1,
                DecisionOutcome::MissedOpportunity => audit.missed_opportunities += 1,
                _ => {}
            }

            audit.records.push(DecisionRecord {
                exercise: series.display_name.clone(),
                session_id: next.session_id.clone(),
                timestamp: next.timestamp,
                prior_weight_kg: prior.weight_kg,
                new_weight_kg: next.weight_kg,
                prior_reps: prior.reps,
                prior_rpe: prior.rpe,
                expected,
                actual,
                outcome,
                judged_correct,
                reason,
            });
        }

        if audit.judged > 0 {
            audit.efficiency_pct = Some(audit.correct as f64 / audit.judged as f64 * 100.0);
        }
        audit
    }
}

/// Decision policy for a single transition.
///
/// The RPE-ceiling checks take precedence over the plain directive
/// comparison: a decrease after a very high RPE is always a smart
/// adjustment, and an increase on top of one is always a missed
/// opportunity, whatever the rep count suggested.
fn judge(
    expected: Directive,
    actual: WeightMove,
    rpe_over_ceiling: bool,
    prior_rpe: Option<f64>,
    evidence: &str,
) -> (DecisionOutcome, String) {
    if rpe_over_ceiling {
        let rpe = prior_rpe.unwrap_or_default();
        match actual {
            WeightMove::Decreased => {
                return (
                    DecisionOutcome::SmartAdjustment,
                    format!("weight dropped after RPE {rpe:.1} - deliberate deload, not a regression"),
                );
            }
            WeightMove::Increased => {
                return (
                    DecisionOutcome::MissedOpportunity,
                    format!("RPE {rpe:.1} was already unsustainable but weight was still raised"),
                );
            }
            WeightMove::Maintained => {}
        }
    }

    let matches_expectation = matches!(
        (expected, actual),
        (Directive::Increase, WeightMove::Increased)
            | (Directive::Decrease, WeightMove::Decreased)
            | (Directive::Maintain, WeightMove::Maintained)
    );
    if matches_expectation {
        return (DecisionOutcome::Correct, format!("{actual} as the evidence suggested ({evidence})"));
    }

    match expected {
        Directive::Increase => (
            DecisionOutcome::MissedOpportunity,
            format!("should have increased ({evidence}) but {actual} instead"),
        ),
        Directive::Decrease => (
            DecisionOutcome::Incorrect,
            format!("should have decreased ({evidence}) but {actual} instead"),
        ),
        Directive::Maintain => (
            DecisionOutcome::Incorrect,
            format!("weight was working ({evidence}) but was {actual} anyway"),
        ),
    }
}
