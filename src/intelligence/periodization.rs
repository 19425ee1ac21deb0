// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Program-wide plateau detection and deload recommendations
//!
//! Aggregates per-exercise trends into one status for the whole program.
//! An exercise is stagnant once it has held the identical weight for the
//! configured number of consecutive sessions; stagnant lifts that qualify
//! become deload candidates with a 10-15% reduction, flagged separately
//! from ordinary recommendations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;
use crate::intelligence::classifier::{round_to_increment, Directive};
use crate::intelligence::coaching_constants::periodization as limits;
use crate::intelligence::progression::{ProgressionSummary, Trend};

/// Program-wide progression status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgramStatus {
    ProgressingWell,
    Mixed,
    ModeratePlateau,
    MajorPlateau,
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ProgressingWell => "progressing well",
            Self::Mixed => "mixed progress",
            Self::ModeratePlateau => "moderate plateau",
            Self::MajorPlateau => "major plateau",
        };
        f.write_str(label)
    }
}

impl ProgramStatus {
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::ProgressingWell => "Keep the current program, great momentum",
            Self::Mixed => "Fine-tune weights and recovery",
            Self::ModeratePlateau => "Review programming and consider a technique focus",
            Self::MajorPlateau => "Consider a deload week or a program change",
        }
    }
}

/// Exercise stuck at one weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagnantExercise {
    pub exercise: String,
    pub sessions_stagnant: usize,
}

/// Exercise trending upward over its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressingExercise {
    pub exercise: String,
    pub percent_change: f64,
}

/// Exercise trending downward over its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressingExercise {
    pub exercise: String,
    pub percent_change: f64,
}

/// Stagnant lift recommended for a deliberate weight reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadCandidate {
    pub exercise: String,
    pub sessions_stagnant: usize,
    pub current_weight_kg: f64,
    /// Midpoint of the deload range, rounded to the equipment increment
    pub suggested_weight_kg: f64,
    pub reduction_pct_min: f64,
    pub reduction_pct_max: f64,
}

/// Program-wide periodization assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodizationReport {
    pub status: ProgramStatus,
    pub suggestion: String,
    pub tracked_exercises: usize,
    /// Stagnant share of tracked exercises, percent
    pub stagnant_pct: f64,
    pub stagnant: Vec<StagnantExercise>,
    pub progressing: Vec<ProgressingExercise>,
    pub regressing: Vec<RegressingExercise>,
    pub deload_candidates: Vec<DeloadCandidate>,
}

/// Assessor configured with the plateau session count and deload policy.
#[derive(Debug, Clone)]
pub struct PeriodizationAssessor {
    plateau_sessions: usize,
    deload_min_pct: f64,
    deload_max_pct: f64,
    increment_kg: f64,
}

impl PeriodizationAssessor {
    #[must_use]
    pub fn new(config: &CoachConfig) -> Self {
        Self {
            plateau_sessions: config.plateau_sessions,
            deload_min_pct: config.adjustments.deload_min_pct,
            deload_max_pct: config.adjustments.deload_max_pct,
            increment_kg: config.equipment_increment_kg,
        }
    }

    /// Aggregate per-exercise progression summaries.
    ///
    /// `latest_weights` supplies the current weight per exercise (display
    /// name order matching `summaries`).
    #[must_use]
    pub fn assess(&self, summaries: &[(ProgressionSummary, f64)]) -> PeriodizationReport {
        let tracked = summaries.len();
        let mut stagnant = Vec::new();
        let mut progressing = Vec::new();
        let mut regressing = Vec::new();
        let mut deload_candidates = Vec::new();

        for (summary, current_weight_kg) in summaries {
            let is_stagnant = summary.stagnant_sessions >= self.plateau_sessions;
            if is_stagnant {
                stagnant.push(StagnantExercise {
                    exercise: summary.exercise.clone(),
                    sessions_stagnant: summary.stagnant_sessions,
                });
                deload_candidates.push(self.deload_candidate(summary, *current_weight_kg));
            } else {
                match summary.trend {
                    Trend::Progressive => progressing.push(ProgressingExercise {
                        exercise: summary.exercise.clone(),
                        percent_change: summary.percent_change.unwrap_or_default(),
                    }),
                    Trend::Regressive => regressing.push(RegressingExercise {
                        exercise: summary.exercise.clone(),
                        percent_change: summary.percent_change.unwrap_or_default(),
                    }),
                    Trend::Plateau | Trend::Volatile => {}
                }
            }
        }

        let stagnant_pct = if tracked == 0 {
            0.0
        } else {
            stagnant.len() as f64 / tracked as f64 * 100.0
        };
        let status = classify_status(tracked, stagnant.len(), progressing.len());

        PeriodizationReport {
            status,
            suggestion: status.suggestion().to_owned(),
            tracked_exercises: tracked,
            stagnant_pct,
            stagnant,
            progressing,
            regressing,
            deload_candidates,
        }
    }

    fn deload_candidate(&self, summary: &ProgressionSummary, current_kg: f64) -> DeloadCandidate {
        let mid_pct = (self.deload_min_pct + self.deload_max_pct) / 2.0;
        let raw = current_kg * (1.0 - mid_pct / 100.0);
        let suggested_weight_kg =
            round_to_increment(raw, current_kg, Directive::Decrease, self.increment_kg);
        DeloadCandidate {
            exercise: summary.exercise.clone(),
            sessions_stagnant: summary.stagnant_sessions,
            current_weight_kg: current_kg,
            suggested_weight_kg,
            reduction_pct_min: self.deload_min_pct,
            reduction_pct_max: self.deload_max_pct,
        }
    }
}

fn classify_status(tracked: usize, stagnant: usize, progressing: usize) -> ProgramStatus {
    if tracked == 0 {
        return ProgramStatus::Mixed;
    }
    let total = tracked as f64;
    let stagnant_fraction = stagnant as f64 / total;
    if stagnant_fraction >= limits::MAJOR_PLATEAU_FRACTION {
        return ProgramStatus::MajorPlateau;
    }
    if stagnant_fraction >= limits::MODERATE_PLATEAU_FRACTION {
        return ProgramStatus::ModeratePlateau;
    }
    let spread = (progressing as f64 - stagnant as f64).abs();
    if spread <= limits::MIXED_TOLERANCE * total {
        return ProgramStatus::Mixed;
    }
    if progressing > stagnant {
        ProgramStatus::ProgressingWell
    } else {
        ProgramStatus::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, trend: Trend, stagnant_sessions: usize, pct: f64) -> ProgressionSummary {
        ProgressionSummary {
            exercise: name.to_owned(),
            points: Vec::new(),
            trend,
            percent_change: Some(pct),
            latest_delta_kg: 0.0,
            latest_volume_delta_kg: 0.0,
            stagnant_sessions,
            reduced_confidence: false,
        }
    }

    fn assessor() -> PeriodizationAssessor {
        PeriodizationAssessor::new(&CoachConfig::default())
    }

    #[test]
    fn test_three_of_five_stagnant_is_major_plateau() {
        let summaries = vec![
            (summary("A", Trend::Plateau, 3, 0.0), 100.0),
            (summary("B", Trend::Plateau, 4, 0.0), 80.0),
            (summary("C", Trend::Plateau, 5, 0.0), 60.0),
            (summary("D", Trend::Progressive, 1, 5.0), 50.0),
            (summary("E", Trend::Progressive, 1, 3.0), 40.0),
        ];
        let report = assessor().assess(&summaries);
        assert_eq!(report.status, ProgramStatus::MajorPlateau);
        assert_eq!(report.stagnant_pct, 60.0);
        assert_eq!(report.deload_candidates.len(), 3);
    }

    #[test]
    fn test_stagnant_fraction_in_thirties_is_moderate() {
        let summaries = vec![
            (summary("A", Trend::Plateau, 3, 0.0), 100.0),
            (summary("B", Trend::Progressive, 1, 4.0), 80.0),
            (summary("C", Trend::Progressive, 1, 2.0), 60.0),
        ];
        let report = assessor().assess(&summaries);
        assert_eq!(report.status, ProgramStatus::ModeratePlateau);
    }

    #[test]
    fn test_mostly_progressing_is_progressing_well() {
        let summaries = vec![
            (summary("A", Trend::Progressive, 1, 5.0), 100.0),
            (summary("B", Trend::Progressive, 1, 4.0), 80.0),
            (summary("C", Trend::Progressive, 1, 2.0), 60.0),
            (summary("D", Trend::Volatile, 1, 0.0), 50.0),
            (summary("E", Trend::Regressive, 1, -3.0), 40.0),
        ];
        let report = assessor().assess(&summaries);
        assert_eq!(report.status, ProgramStatus::ProgressingWell);
        assert_eq!(report.progressing.len(), 3);
        assert_eq!(report.regressing.len(), 1);
        assert!(report.deload_candidates.is_empty());
    }

    #[test]
    fn test_close_counts_are_mixed() {
        // 1 progressing vs 1 stagnant of 10 tracked: spread 0 <= 10% of 10.
        let mut summaries = vec![
            (summary("A", Trend::Progressive, 1, 5.0), 100.0),
            (summary("B", Trend::Plateau, 3, 0.0), 80.0),
        ];
        for i in 0..8 {
            summaries.push((summary(&format!("X{i}"), Trend::Volatile, 1, 0.0), 50.0));
        }
        let report = assessor().assess(&summaries);
        assert_eq!(report.status, ProgramStatus::Mixed);
    }

    #[test]
    fn test_no_tracked_exercises_is_neutral_mixed() {
        let report = assessor().assess(&[]);
        assert_eq!(report.status, ProgramStatus::Mixed);
        assert_eq!(report.stagnant_pct, 0.0);
    }

    #[test]
    fn test_deload_target_rounded_below_current() {
        let summaries = vec![(summary("Squat", Trend::Plateau, 4, 0.0), 100.0)];
        let report = assessor().assess(&summaries);
        let candidate = &report.deload_candidates[0];
        // 100 - 12.5% = 87.5, already on the 2.5 grid
        assert_eq!(candidate.suggested_weight_kg, 87.5);
        assert!(candidate.suggested_weight_kg < candidate.current_weight_kg);
    }
}
