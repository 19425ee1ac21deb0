// ABOUTME: Top-level coaching engine assembling the full analysis report
// ABOUTME: Pure orchestration over the index, classifier, auditor, and graders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! End-to-end analysis: fetched events in, one [`CoachingReport`] out.
//!
//! The engine owns no I/O. It builds the history index, fans the
//! per-exercise analyses out across a thread pool, then assembles the
//! session summary, recommendations, audits, and periodization view in
//! deterministic (canonical name) order. Faults are isolated per
//! exercise: a malformed rep-range rule sidelines that one exercise with
//! a reason in the report and everything else proceeds.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CoachConfig;
use crate::intelligence::audit::{DecisionAudit, DecisionAuditor};
use crate::intelligence::classifier::{Assessment, RepRpeClassifier, Verdict};
use crate::intelligence::grading::{ProgressSignal, SessionGrade, SessionGrader, SetIntensity};
use crate::intelligence::history::{ExerciseSeries, HistoryIndex};
use crate::intelligence::insights::{HistoryOverview, InsightsAnalyzer, VolumeRecoveryInsights};
use crate::intelligence::periodization::{PeriodizationAssessor, PeriodizationReport};
use crate::intelligence::progression::{ProgressionAnalyzer, ProgressionSummary};
use crate::intelligence::recommendation::{Recommendation, RecommendationSynthesizer};
use crate::intelligence::routine::{CyclePosition, RoutineResolver};
use crate::intelligence::weights_equal;
use crate::models::WorkoutEvent;

/// Per-exercise line in the session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseBreakdown {
    pub exercise: String,
    /// Representative (top) working set
    pub weight_kg: f64,
    pub reps: u32,
    pub rpe: Option<f64>,
    pub verdict: Verdict,
    pub working_sets: usize,
    pub volume_kg: f64,
}

/// Graded summary of the most recent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub title: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub grade: SessionGrade,
    pub exercises: Vec<ExerciseBreakdown>,
}

/// Exercise set aside instead of analyzed, with the reason why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedExercise {
    pub exercise: String,
    pub reason: String,
}

/// Complete analysis output, serializable as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingReport {
    /// Graded most recent session; `None` when no history survived indexing
    pub generated_for: Option<SessionSummary>,
    pub recommendations: Vec<Recommendation>,
    /// Per-exercise decision audits, canonical name order
    pub decisions: Vec<DecisionAudit>,
    /// Correct transitions over all judged transitions, percent
    pub overall_efficiency_pct: Option<f64>,
    pub periodization: PeriodizationReport,
    pub progressions: Vec<ProgressionSummary>,
    pub cycle_position: Option<CyclePosition>,
    /// Weekly volume trend, rest cadence, and muscle-group volume split
    pub volume_recovery: Option<VolumeRecoveryInsights>,
    /// Per-exercise usage totals and top lifts over the whole snapshot
    pub overview: Option<HistoryOverview>,
    pub skipped: Vec<SkippedExercise>,
    /// Working sets dropped per excluded category
    pub excluded_set_counts: BTreeMap<String, usize>,
}

/// The analysis engine. Construct once per config, call per snapshot.
#[derive(Debug, Clone)]
pub struct CoachingEngine {
    config: CoachConfig,
}

struct ExerciseAnalysis {
    display_name: String,
    canonical: String,
    assessment: Assessment,
    progression: ProgressionSummary,
    audit: DecisionAudit,
    current_weight_kg: f64,
    assisted: bool,
    rule_issue: Option<String>,
}

impl CoachingEngine {
    #[must_use]
    pub fn new(config: CoachConfig) -> Self {
        Self {
            config: config.canonicalized(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Run the full analysis over a snapshot of fetched events.
    #[must_use]
    pub fn analyze(&self, events: &[WorkoutEvent]) -> CoachingReport {
        let index = HistoryIndex::build(events, &self.config);
        info!(
            sessions = index.session_count(),
            exercises = index.exercise_count(),
            "analyzing workout history"
        );

        let classifier = RepRpeClassifier::new(&self.config);
        let analyzer = ProgressionAnalyzer::new(&self.config);
        let auditor = DecisionAuditor::new(&classifier, self.config.rpe.decrease_above);

        let series_list: Vec<&ExerciseSeries> = index.series().collect();
        let analyses: Vec<ExerciseAnalysis> = series_list
            .par_iter()
            .map(|series| self.analyze_exercise(series, &classifier, &analyzer, &auditor))
            .collect();

        let mut skipped: Vec<SkippedExercise> = analyses
            .iter()
            .filter_map(|a| {
                a.rule_issue.as_ref().map(|reason| SkippedExercise {
                    exercise: a.display_name.clone(),
                    reason: reason.clone(),
                })
            })
            .collect();

        let decisions: Vec<DecisionAudit> = analyses
            .iter()
            .filter(|a| a.audit.judged > 0)
            .map(|a| a.audit.clone())
            .collect();
        let overall_efficiency_pct = overall_efficiency(&decisions);

        let periodization_input: Vec<(ProgressionSummary, f64)> = analyses
            .iter()
            .filter(|a| a.rule_issue.is_none())
            .map(|a| (a.progression.clone(), a.current_weight_kg))
            .collect();
        let periodization = PeriodizationAssessor::new(&self.config).assess(&periodization_input);

        let generated_for = self.grade_latest_session(&index, &classifier, &analyses);
        let cycle_position = self.resolve_cycle(&index);
        let insights = InsightsAnalyzer::new();
        let recommendations = self.build_recommendations(
            &index,
            &analyses,
            &periodization,
            cycle_position.as_ref(),
            &mut skipped,
        );

        CoachingReport {
            generated_for,
            recommendations,
            decisions,
            overall_efficiency_pct,
            periodization,
            progressions: analyses.into_iter().map(|a| a.progression).collect(),
            cycle_position,
            volume_recovery: insights.volume_recovery(&index),
            overview: insights.overview(&index),
            skipped,
            excluded_set_counts: index.excluded_set_counts.clone(),
        }
    }

    fn analyze_exercise(
        &self,
        series: &ExerciseSeries,
        classifier: &RepRpeClassifier,
        analyzer: &ProgressionAnalyzer,
        auditor: &DecisionAuditor<'_>,
    ) -> ExerciseAnalysis {
        let (rule, rule_issue) = match self.config.rule_for(&series.canonical) {
            Some(range) if range.is_valid() => (Some(range), None),
            Some(range) => {
                warn!(
                    exercise = %series.display_name,
                    min = range.min_reps,
                    max = range.max_reps,
                    "malformed rep range, sidelining exercise"
                );
                (
                    None,
                    Some(format!(
                        "rep range is malformed (min {} > max {}), calibration disabled",
                        range.min_reps, range.max_reps
                    )),
                )
            }
            None => (None, None),
        };

        let latest = series.latest();
        ExerciseAnalysis {
            display_name: series.display_name.clone(),
            canonical: series.canonical.clone(),
            assessment: classifier.assess_sample(latest, rule),
            progression: analyzer.analyze(series),
            audit: auditor.audit(series, rule),
            current_weight_kg: latest.weight_kg,
            assisted: self.config.is_assisted(&series.canonical),
            rule_issue,
        }
    }

    /// Grade the most recent session: per-set intensity over every working
    /// set logged in it, plus one progress signal per exercise that has a
    /// prior session to compare against.
    fn grade_latest_session(
        &self,
        index: &HistoryIndex,
        classifier: &RepRpeClassifier,
        analyses: &[ExerciseAnalysis],
    ) -> Option<SessionSummary> {
        let info = index.latest_session()?;
        let issues: std::collections::BTreeSet<&str> = analyses
            .iter()
            .filter(|a| a.rule_issue.is_some())
            .map(|a| a.canonical.as_str())
            .collect();

        let mut sets = Vec::new();
        let mut signals = Vec::new();
        let mut exercises = Vec::new();

        for series in index.series_in_session(&info.session_id) {
            let rule = if issues.contains(series.canonical.as_str()) {
                None
            } else {
                self.config
                    .rule_for(&series.canonical)
                    .filter(|r| r.is_valid())
            };

            let latest = series.latest();
            for set in &latest.sets {
                let assessment = classifier.assess(set.weight_kg, set.reps, set.rpe, rule);
                sets.push(SetIntensity {
                    verdict: assessment.verdict,
                    rpe: set.rpe,
                });
            }

            if let Some(signal) = progress_signal(series, self.config.rpe.decrease_above) {
                signals.push(signal);
            }

            let assessment = classifier.assess_sample(latest, rule);
            exercises.push(ExerciseBreakdown {
                exercise: series.display_name.clone(),
                weight_kg: latest.weight_kg,
                reps: latest.reps,
                rpe: latest.rpe,
                verdict: assessment.verdict,
                working_sets: latest.sets.len(),
                volume_kg: latest.volume_kg,
            });
        }

        let grade = SessionGrader::new(&self.config).grade(&sets, &signals);
        debug!(session_id = %info.session_id, grade = %grade.grade, "graded latest session");
        Some(SessionSummary {
            session_id: info.session_id.clone(),
            title: info.title.clone(),
            timestamp: info.timestamp,
            grade,
            exercises,
        })
    }

    fn resolve_cycle(&self, index: &HistoryIndex) -> Option<CyclePosition> {
        let routine = self.config.routine.as_ref()?;
        if routine.validate().is_err() {
            return None;
        }
        let info = index.latest_session()?;
        let latest_exercises: Vec<String> = index
            .series_in_session(&info.session_id)
            .map(|series| series.display_name.clone())
            .collect();
        Some(RoutineResolver::new(routine).resolve(&info.title, &latest_exercises))
    }

    /// Pick the exercises to recommend for and synthesize one entry each.
    ///
    /// When the routine resolves to a known position the scope is the next
    /// training day's configured exercise list; otherwise it falls back to
    /// the exercises of the just-completed session.
    fn build_recommendations(
        &self,
        index: &HistoryIndex,
        analyses: &[ExerciseAnalysis],
        periodization: &PeriodizationReport,
        cycle_position: Option<&CyclePosition>,
        skipped: &mut Vec<SkippedExercise>,
    ) -> Vec<Recommendation> {
        let by_canonical: BTreeMap<&str, &ExerciseAnalysis> = analyses
            .iter()
            .map(|a| (a.canonical.as_str(), a))
            .collect();
        let deloads: BTreeMap<&str, &crate::intelligence::periodization::DeloadCandidate> =
            periodization
                .deload_candidates
                .iter()
                .map(|c| (c.exercise.as_str(), c))
                .collect();

        let scope: Vec<String> = match (cycle_position, &self.config.routine) {
            (
                Some(CyclePosition::Known {
                    next_training_day: Some(day),
                    ..
                }),
                Some(routine),
            ) => routine.days[*day].exercises.clone(),
            _ => index
                .latest_session()
                .map(|info| {
                    index
                        .series_in_session(&info.session_id)
                        .map(|series| series.display_name.clone())
                        .collect()
                })
                .unwrap_or_default(),
        };

        let synthesizer = RecommendationSynthesizer::new(&self.config);
        let mut recommendations = Vec::new();
        for name in scope {
            let canonical = crate::models::canonical_name(&name);
            let Some(analysis) = by_canonical.get(canonical.as_str()) else {
                skipped.push(SkippedExercise {
                    exercise: name,
                    reason: "no logged history to calibrate from".to_owned(),
                });
                continue;
            };
            if analysis.rule_issue.is_some() {
                continue; // already surfaced in skipped
            }
            recommendations.push(synthesizer.synthesize(
                &analysis.display_name,
                &analysis.assessment,
                analysis.current_weight_kg,
                Some(&analysis.progression),
                deloads.get(analysis.display_name.as_str()).copied(),
                analysis.assisted,
            ));
        }
        recommendations
    }
}

/// Session-over-session progress signal for the latest session.
///
/// Exercises without a prior session have nothing to compare and are left
/// out of the progress denominator. A weight drop right after a
/// beyond-ceiling RPE reads as a deliberate adjustment, not a regression.
fn progress_signal(series: &ExerciseSeries, rpe_ceiling: f64) -> Option<ProgressSignal> {
    if series.len() < 2 {
        return None;
    }
    let latest = &series.sessions[0];
    let previous = &series.sessions[1];
    if weights_equal(latest.weight_kg, previous.weight_kg) {
        return Some(ProgressSignal::Maintained);
    }
    if latest.weight_kg > previous.weight_kg {
        return Some(ProgressSignal::Progressed);
    }
    if previous.rpe.is_some_and(|r| r > rpe_ceiling) {
        return Some(ProgressSignal::SmartAdjustment);
    }
    Some(ProgressSignal::Regressed)
}

fn overall_efficiency(decisions: &[DecisionAudit]) -> Option<f64> {
    let judged: usize = decisions.iter().map(|a| a.judged).sum();
    if judged == 0 {
        return None;
    }
    let correct: usize = decisions.iter().map(|a| a.correct).sum();
    Some(correct as f64 / judged as f64 * 100.0)
}
