// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Letter grade and score for the most recent session
//!
//! Score = 0.4 x intensity + 0.6 x progress. Intensity is the share of
//! working sets that were either verdict in-range or inside the optimal
//! RPE band; progress is the share of exercises whose session-over-session
//! move was a progression or a judged smart adjustment, with plateaus
//! earning partial credit. Components with nothing to judge default to a
//! neutral 100 rather than dragging the grade down.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;
use crate::intelligence::classifier::Verdict;
use crate::intelligence::coaching_constants::grading;

/// Letter grade; ties break toward the lower grade (strict >= cutoffs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(label)
    }
}

impl Grade {
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= grading::A_PLUS_CUTOFF {
            Self::APlus
        } else if score >= grading::A_CUTOFF {
            Self::A
        } else if score >= grading::B_PLUS_CUTOFF {
            Self::BPlus
        } else if score >= grading::B_CUTOFF {
            Self::B
        } else if score >= grading::C_PLUS_CUTOFF {
            Self::CPlus
        } else if score >= grading::C_CUTOFF {
            Self::C
        } else {
            Self::D
        }
    }

    /// One-line coaching assessment matching the grade.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::APlus => "Excellent session - great progression and intensity balance",
            Self::A => "Great session with solid progression",
            Self::BPlus => "Good session, minor room for improvement",
            Self::B => "Decent session, consider adjusting intensity",
            Self::CPlus => "Average session, focus on progression",
            Self::C => "Below average, review the training approach",
            Self::D => "Poor session, consider a deload or technique focus",
        }
    }
}

/// One working set's contribution to the intensity component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetIntensity {
    pub verdict: Verdict,
    pub rpe: Option<f64>,
}

/// One exercise's contribution to the progress component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressSignal {
    /// Weight rose session-over-session
    Progressed,
    /// Weight dropped after an unsustainable RPE: full credit
    SmartAdjustment,
    /// Weight unchanged: partial credit
    Maintained,
    /// Weight dropped without fatigue evidence: no credit
    Regressed,
}

/// Grading result for the latest session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionGrade {
    pub grade: Grade,
    /// 0-100 weighted score
    pub score: f64,
    pub intensity_score: f64,
    pub progress_score: f64,
    pub progressed: usize,
    pub maintained: usize,
    pub regressed: usize,
    pub description: String,
}

/// Grader configured with the RPE band.
#[derive(Debug, Clone)]
pub struct SessionGrader {
    rpe_low: f64,
    rpe_high: f64,
}

impl SessionGrader {
    #[must_use]
    pub fn new(config: &CoachConfig) -> Self {
        Self {
            rpe_low: config.rpe.increase_below,
            rpe_high: config.rpe.decrease_above,
        }
    }

    /// Combine per-set intensity and per-exercise progress into one grade.
    #[must_use]
    pub fn grade(&self, sets: &[SetIntensity], signals: &[ProgressSignal]) -> SessionGrade {
        let intensity_score = self.intensity_score(sets);
        let progress_score = progress_score(signals);
        let score = grading::INTENSITY_WEIGHT * intensity_score
            + grading::PROGRESS_WEIGHT * progress_score;
        let grade = Grade::for_score(score);

        SessionGrade {
            grade,
            score,
            intensity_score,
            progress_score,
            progressed: count(signals, ProgressSignal::Progressed)
                + count(signals, ProgressSignal::SmartAdjustment),
            maintained: count(signals, ProgressSignal::Maintained),
            regressed: count(signals, ProgressSignal::Regressed),
            description: grade.description().to_owned(),
        }
    }

    /// Share of sets that hit the target: verdict in-range, or RPE inside
    /// the optimal band. Sets without a rule are excluded from the
    /// denominator; an empty denominator is neutral.
    fn intensity_score(&self, sets: &[SetIntensity]) -> f64 {
        let judgeable: Vec<_> = sets
            .iter()
            .filter(|s| s.verdict != Verdict::NoTarget)
            .collect();
        if judgeable.is_empty() {
            return grading::NEUTRAL_SCORE;
        }
        let on_target = judgeable
            .iter()
            .filter(|s| {
                s.verdict == Verdict::InRange
                    || s.rpe
                        .is_some_and(|r| r >= self.rpe_low && r <= self.rpe_high)
            })
            .count();
        on_target as f64 / judgeable.len() as f64 * 100.0
    }
}

fn progress_score(signals: &[ProgressSignal]) -> f64 {
    if signals.is_empty() {
        return grading::NEUTRAL_SCORE;
    }
    let total: f64 = signals
        .iter()
        .map(|signal| match signal {
            ProgressSignal::Progressed | ProgressSignal::SmartAdjustment => 100.0,
            ProgressSignal::Maintained => grading::PLATEAU_CREDIT,
            ProgressSignal::Regressed => 0.0,
        })
        .sum();
    total / signals.len() as f64
}

fn count(signals: &[ProgressSignal], needle: ProgressSignal) -> usize {
    signals.iter().filter(|s| **s == needle).count()
}
