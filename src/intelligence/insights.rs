// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Volume, recovery, and history-overview insights
//!
//! Longer-horizon views over the whole fetched window: weekly training
//! volume with a week-over-week trend, rest-day analysis with a recovery
//! status, a muscle-group volume breakdown, and a per-exercise usage
//! overview with top lifts by frequency and by volume. All of it is
//! derived from record timestamps, never the wall clock, so the latest
//! rest gap (not "days ago") drives the recovery status.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::intelligence::coaching_constants::volume as limits;
use crate::intelligence::history::HistoryIndex;

/// Keyword mapping from canonical exercise names to coarse muscle groups.
const MUSCLE_GROUPS: &[(&str, &[&str])] = &[
    ("legs", &["leg press", "squat", "leg extension", "leg curl", "calf", "bulgarian", "lunge"]),
    ("chest", &["bench", "chest", "push-up", "push up", "dip"]),
    ("back", &["row", "pull", "lat", "deadlift"]),
    ("shoulders", &["shoulder", "overhead press", "raise", "shrug"]),
    ("arms", &["curl", "tricep", "bicep"]),
];

/// One ISO week's training totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVolume {
    pub iso_year: i32,
    pub iso_week: u32,
    pub sessions: usize,
    pub total_reps: u64,
    pub volume_kg: f64,
}

/// Week-over-week volume direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeTrend {
    IncreasingRapidly,
    IncreasingModerately,
    Stable,
    DecreasingModerately,
    DecreasingRapidly,
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::IncreasingRapidly => "increasing rapidly",
            Self::IncreasingModerately => "increasing moderately",
            Self::Stable => "stable",
            Self::DecreasingModerately => "decreasing moderately",
            Self::DecreasingRapidly => "decreasing rapidly",
        };
        f.write_str(label)
    }
}

/// Recovery reading from the gap before the most recent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryStatus {
    HighFrequency,
    GoodFrequency,
    OptimalRecovery,
    ExtendedRest,
    LongBreak,
    InsufficientData,
}

impl fmt::Display for RecoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HighFrequency => "high frequency",
            Self::GoodFrequency => "good frequency",
            Self::OptimalRecovery => "optimal recovery",
            Self::ExtendedRest => "extended rest",
            Self::LongBreak => "long break",
            Self::InsufficientData => "insufficient data",
        };
        f.write_str(label)
    }
}

/// Weekly volume trend plus rest-day analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecoveryInsights {
    /// Chronological weekly totals
    pub weekly: Vec<WeeklyVolume>,
    pub volume_trend: VolumeTrend,
    /// Latest week vs the week before, percent; 0 when fewer than two weeks
    pub volume_change_pct: f64,
    /// Rest days between the two most recent training days
    pub last_rest_days: Option<i64>,
    /// Mean rest days over all consecutive training-day gaps
    pub average_rest_days: Option<f64>,
    pub recovery_status: RecoveryStatus,
    /// Total volume per coarse muscle group over the window
    pub muscle_volume_kg: BTreeMap<String, f64>,
}

/// One exercise's usage totals over the fetched window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseUsage {
    pub exercise: String,
    pub sessions: usize,
    pub total_reps: u64,
    pub average_reps: f64,
    pub average_weight_kg: f64,
    pub volume_kg: f64,
}

/// Whole-window history overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryOverview {
    pub first_session: DateTime<Utc>,
    pub last_session: DateTime<Utc>,
    pub total_sessions: usize,
    pub tracked_exercises: usize,
    /// Per-exercise usage, canonical name order
    pub exercises: Vec<ExerciseUsage>,
    /// Most-trained lifts by session count
    pub top_by_frequency: Vec<String>,
    /// Heaviest-volume lifts
    pub top_by_volume: Vec<String>,
    /// Chronological weekly totals
    pub weekly: Vec<WeeklyVolume>,
}

/// Analyzer over an already-built history index.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightsAnalyzer;

impl InsightsAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Weekly volume trend and recovery analysis; `None` without sessions.
    #[must_use]
    pub fn volume_recovery(&self, index: &HistoryIndex) -> Option<VolumeRecoveryInsights> {
        if index.session_count() == 0 {
            return None;
        }
        let weekly = weekly_breakdown(index);
        let (volume_trend, volume_change_pct) = classify_volume_trend(&weekly);

        let mut dates: Vec<NaiveDate> = index
            .sessions()
            .map(|info| info.timestamp.date_naive())
            .collect();
        dates.sort_unstable();
        dates.dedup();

        let gaps: Vec<i64> = dates
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days())
            .collect();
        let last_rest_days = gaps.last().copied();
        let average_rest_days = if gaps.is_empty() {
            None
        } else {
            Some(gaps.iter().sum::<i64>() as f64 / gaps.len() as f64)
        };
        let recovery_status = last_rest_days.map_or(RecoveryStatus::InsufficientData, classify_recovery);

        Some(VolumeRecoveryInsights {
            weekly,
            volume_trend,
            volume_change_pct,
            last_rest_days,
            average_rest_days,
            recovery_status,
            muscle_volume_kg: muscle_breakdown(index),
        })
    }

    /// Per-exercise usage overview; `None` without sessions.
    #[must_use]
    pub fn overview(&self, index: &HistoryIndex) -> Option<HistoryOverview> {
        let timestamps: Vec<DateTime<Utc>> =
            index.sessions().map(|info| info.timestamp).collect();
        let first_session = timestamps.iter().min().copied()?;
        let last_session = timestamps.iter().max().copied()?;

        let exercises: Vec<ExerciseUsage> = index
            .series()
            .map(|series| {
                let set_count: usize = series.sessions.iter().map(|s| s.sets.len()).sum();
                let total_reps: u64 = series
                    .sessions
                    .iter()
                    .flat_map(|s| &s.sets)
                    .map(|set| u64::from(set.reps))
                    .sum();
                let total_weight: f64 = series
                    .sessions
                    .iter()
                    .flat_map(|s| &s.sets)
                    .map(|set| set.weight_kg)
                    .sum();
                let volume_kg: f64 = series.sessions.iter().map(|s| s.volume_kg).sum();
                ExerciseUsage {
                    exercise: series.display_name.clone(),
                    sessions: series.len(),
                    total_reps,
                    average_reps: mean(total_reps as f64, set_count),
                    average_weight_kg: mean(total_weight, set_count),
                    volume_kg,
                }
            })
            .collect();

        let top_by_frequency = top_lifts(&exercises, |usage| usage.sessions as f64);
        let top_by_volume = top_lifts(&exercises, |usage| usage.volume_kg);

        Some(HistoryOverview {
            first_session,
            last_session,
            total_sessions: index.session_count(),
            tracked_exercises: index.exercise_count(),
            exercises,
            top_by_frequency,
            top_by_volume,
            weekly: weekly_breakdown(index),
        })
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Top lifts by a metric, ties broken by name for stable output.
fn top_lifts(exercises: &[ExerciseUsage], metric: impl Fn(&ExerciseUsage) -> f64) -> Vec<String> {
    let mut ranked: Vec<&ExerciseUsage> = exercises.iter().collect();
    ranked.sort_by(|a, b| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });
    ranked
        .into_iter()
        .take(limits::TOP_LIFTS)
        .map(|usage| usage.exercise.clone())
        .collect()
}

fn week_key(timestamp: DateTime<Utc>) -> (i32, u32) {
    let week = timestamp.iso_week();
    (week.year(), week.week())
}

fn week_entry(
    weeks: &mut BTreeMap<(i32, u32), WeeklyVolume>,
    key: (i32, u32),
) -> &mut WeeklyVolume {
    weeks.entry(key).or_insert(WeeklyVolume {
        iso_year: key.0,
        iso_week: key.1,
        sessions: 0,
        total_reps: 0,
        volume_kg: 0.0,
    })
}

fn weekly_breakdown(index: &HistoryIndex) -> Vec<WeeklyVolume> {
    let mut weeks: BTreeMap<(i32, u32), WeeklyVolume> = BTreeMap::new();
    for info in index.sessions() {
        week_entry(&mut weeks, week_key(info.timestamp)).sessions += 1;
    }
    for series in index.series() {
        for sample in &series.sessions {
            let week = week_entry(&mut weeks, week_key(sample.timestamp));
            week.total_reps += sample
                .sets
                .iter()
                .map(|set| u64::from(set.reps))
                .sum::<u64>();
            week.volume_kg += sample.volume_kg;
        }
    }
    weeks.into_values().collect()
}

/// Latest week vs the one before. A zero-volume previous week reads as
/// stable rather than an infinite swing.
fn classify_volume_trend(weekly: &[WeeklyVolume]) -> (VolumeTrend, f64) {
    let [.., previous, current] = weekly else {
        return (VolumeTrend::Stable, 0.0);
    };
    if previous.volume_kg <= 0.0 {
        return (VolumeTrend::Stable, 0.0);
    }
    let pct = (current.volume_kg - previous.volume_kg) / previous.volume_kg * 100.0;
    let trend = if pct > limits::RAPID_CHANGE_PCT {
        VolumeTrend::IncreasingRapidly
    } else if pct > limits::MODERATE_CHANGE_PCT {
        VolumeTrend::IncreasingModerately
    } else if pct < -limits::RAPID_CHANGE_PCT {
        VolumeTrend::DecreasingRapidly
    } else if pct < -limits::MODERATE_CHANGE_PCT {
        VolumeTrend::DecreasingModerately
    } else {
        VolumeTrend::Stable
    };
    (trend, pct)
}

const fn classify_recovery(last_rest_days: i64) -> RecoveryStatus {
    if last_rest_days <= limits::HIGH_FREQUENCY_MAX_DAYS {
        RecoveryStatus::HighFrequency
    } else if last_rest_days <= limits::GOOD_FREQUENCY_MAX_DAYS {
        RecoveryStatus::GoodFrequency
    } else if last_rest_days <= limits::OPTIMAL_RECOVERY_MAX_DAYS {
        RecoveryStatus::OptimalRecovery
    } else if last_rest_days <= limits::EXTENDED_REST_MAX_DAYS {
        RecoveryStatus::ExtendedRest
    } else {
        RecoveryStatus::LongBreak
    }
}

fn muscle_breakdown(index: &HistoryIndex) -> BTreeMap<String, f64> {
    let mut breakdown = BTreeMap::new();
    for series in index.series() {
        let Some(group) = MUSCLE_GROUPS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| series.canonical.contains(k)))
            .map(|(group, _)| *group)
        else {
            continue;
        };
        let volume: f64 = series.sessions.iter().map(|s| s.volume_kg).sum();
        *breakdown.entry(group.to_owned()).or_insert(0.0) += volume;
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoachConfig;
    use crate::models::{ExerciseEntry, SetRecord, SetType, WorkoutEvent};
    use chrono::TimeZone;

    fn set(weight: f64, reps: u32) -> SetRecord {
        SetRecord {
            set_type: SetType::Normal,
            weight_kg: Some(weight),
            reps: Some(reps),
            rpe: None,
            index: 0,
        }
    }

    fn event(id: &str, day: u32, exercises: Vec<(&str, Vec<SetRecord>)>) -> WorkoutEvent {
        WorkoutEvent {
            session_id: id.to_owned(),
            title: "Training".to_owned(),
            start_time: Utc.with_ymd_and_hms(2026, 8, day, 10, 0, 0).unwrap(),
            exercises: exercises
                .into_iter()
                .map(|(title, sets)| ExerciseEntry {
                    title: title.to_owned(),
                    notes: None,
                    sets,
                })
                .collect(),
        }
    }

    fn index(events: &[WorkoutEvent]) -> HistoryIndex {
        HistoryIndex::build(events, &CoachConfig::default())
    }

    #[test]
    fn test_no_sessions_yields_no_insights() {
        let index = index(&[]);
        let analyzer = InsightsAnalyzer::new();
        assert!(analyzer.volume_recovery(&index).is_none());
        assert!(analyzer.overview(&index).is_none());
    }

    #[test]
    fn test_weekly_breakdown_groups_by_iso_week() {
        // Aug 2026: days 3 and 5 share ISO week 32, day 10 is week 33.
        let events = vec![
            event("a", 3, vec![("Squat", vec![set(100.0, 5)])]),
            event("b", 5, vec![("Squat", vec![set(100.0, 5)])]),
            event("c", 10, vec![("Squat", vec![set(100.0, 5)])]),
        ];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.weekly.len(), 2);
        assert_eq!(insights.weekly[0].iso_week, 32);
        assert_eq!(insights.weekly[0].sessions, 2);
        assert_eq!(insights.weekly[0].volume_kg, 1000.0);
        assert_eq!(insights.weekly[1].sessions, 1);
    }

    #[test]
    fn test_week_over_week_swing_classifies_trend() {
        // Week 32 volume 1000, week 33 volume 1200: +20%, rapid increase.
        let events = vec![
            event("a", 3, vec![("Squat", vec![set(100.0, 10)])]),
            event("b", 10, vec![("Squat", vec![set(100.0, 12)])]),
        ];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.volume_trend, VolumeTrend::IncreasingRapidly);
        assert!((insights.volume_change_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_week_is_stable_with_zero_change() {
        let events = vec![event("a", 3, vec![("Squat", vec![set(100.0, 5)])])];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.volume_trend, VolumeTrend::Stable);
        assert_eq!(insights.volume_change_pct, 0.0);
    }

    #[test]
    fn test_recovery_reads_the_latest_rest_gap() {
        // Gaps of 2 then 3 days: last gap 3 -> optimal, average 2.5.
        let events = vec![
            event("a", 1, vec![("Squat", vec![set(100.0, 5)])]),
            event("b", 3, vec![("Squat", vec![set(100.0, 5)])]),
            event("c", 6, vec![("Squat", vec![set(100.0, 5)])]),
        ];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.last_rest_days, Some(3));
        assert_eq!(insights.average_rest_days, Some(2.5));
        assert_eq!(insights.recovery_status, RecoveryStatus::OptimalRecovery);
    }

    #[test]
    fn test_single_session_has_insufficient_recovery_data() {
        let events = vec![event("a", 1, vec![("Squat", vec![set(100.0, 5)])])];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.recovery_status, RecoveryStatus::InsufficientData);
        assert_eq!(insights.last_rest_days, None);
        assert_eq!(insights.average_rest_days, None);
    }

    #[test]
    fn test_long_gap_reads_as_long_break() {
        let events = vec![
            event("a", 1, vec![("Squat", vec![set(100.0, 5)])]),
            event("b", 12, vec![("Squat", vec![set(100.0, 5)])]),
        ];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.recovery_status, RecoveryStatus::LongBreak);
    }

    #[test]
    fn test_muscle_breakdown_maps_by_keyword() {
        let events = vec![event(
            "a",
            1,
            vec![
                ("Bench Press", vec![set(80.0, 10)]), // chest, 800
                ("Leg Press", vec![set(200.0, 10)]),  // legs, 2000
                ("Lat Pulldown", vec![set(60.0, 10)]), // back, 600
            ],
        )];
        let insights = InsightsAnalyzer::new().volume_recovery(&index(&events)).unwrap();
        assert_eq!(insights.muscle_volume_kg.get("chest"), Some(&800.0));
        assert_eq!(insights.muscle_volume_kg.get("legs"), Some(&2000.0));
        assert_eq!(insights.muscle_volume_kg.get("back"), Some(&600.0));
    }

    #[test]
    fn test_overview_aggregates_per_exercise_usage() {
        let events = vec![
            event("a", 1, vec![("Squat", vec![set(100.0, 5), set(100.0, 5)])]),
            event("b", 4, vec![("Squat", vec![set(102.5, 4)])]),
        ];
        let overview = InsightsAnalyzer::new().overview(&index(&events)).unwrap();
        assert_eq!(overview.total_sessions, 2);
        assert_eq!(overview.tracked_exercises, 1);
        let usage = &overview.exercises[0];
        assert_eq!(usage.sessions, 2);
        assert_eq!(usage.total_reps, 14);
        assert!((usage.average_reps - 14.0 / 3.0).abs() < 1e-9);
        assert_eq!(usage.volume_kg, 1410.0);
    }

    #[test]
    fn test_top_lifts_ranked_with_stable_ties() {
        let events = vec![
            event("a", 1, vec![
                ("Squat", vec![set(100.0, 5)]),
                ("Bench Press", vec![set(80.0, 8)]),
            ]),
            event("b", 4, vec![("Squat", vec![set(100.0, 5)])]),
        ];
        let overview = InsightsAnalyzer::new().overview(&index(&events)).unwrap();
        assert_eq!(overview.top_by_frequency[0], "Squat");
        // Equal-frequency entries fall back to name order.
        assert_eq!(overview.top_by_frequency[1], "Bench Press");
        assert_eq!(overview.top_by_volume[0], "Squat"); // 1000 vs 640
    }
}
