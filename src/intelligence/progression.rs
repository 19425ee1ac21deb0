// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Session-over-session progression trends per exercise
//!
//! Compares an exercise's most recent N sessions (default 4) in
//! chronological order: consecutive weight deltas give the trend, the
//! first-to-last delta gives the percentage change. "Days since previous"
//! is computed from record timestamps, never the wall clock, so results
//! are reproducible offline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CoachConfig;
use crate::intelligence::history::ExerciseSeries;
use crate::intelligence::weights_equal;

/// Window trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// All deltas >= 0 with at least one > 0
    Progressive,
    /// All deltas <= 0 with at least one < 0
    Regressive,
    /// Every delta exactly zero
    Plateau,
    /// Mixed-sign deltas
    Volatile,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Progressive => "progressive",
            Self::Regressive => "regressive",
            Self::Plateau => "plateau",
            Self::Volatile => "volatile",
        };
        f.write_str(label)
    }
}

/// One session inside the analysis window (chronological order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub weight_kg: f64,
    pub reps: u32,
    pub volume_kg: f64,
    /// Days between this session and its predecessor in the window
    pub days_since_previous: Option<i64>,
}

/// Progression analysis for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSummary {
    pub exercise: String,
    /// Window sessions, oldest first
    pub points: Vec<ProgressionPoint>,
    pub trend: Trend,
    /// (latest - earliest) / earliest * 100 over the window; `None` when the
    /// earliest weight is zero
    pub percent_change: Option<f64>,
    /// Newest session's weight minus its predecessor's; 0 for single-session
    /// series
    pub latest_delta_kg: f64,
    /// Newest minus previous session volume
    pub latest_volume_delta_kg: f64,
    /// Consecutive sessions (ending at the newest) at identical weight,
    /// counted over the full series rather than the window
    pub stagnant_sessions: usize,
    /// True when the series was shorter than the configured window
    pub reduced_confidence: bool,
}

/// Analyzer over a configurable session window.
#[derive(Debug, Clone)]
pub struct ProgressionAnalyzer {
    window: usize,
}

impl ProgressionAnalyzer {
    #[must_use]
    pub fn new(config: &CoachConfig) -> Self {
        // A window below two sessions cannot produce a delta.
        Self {
            window: config.progression_window.max(2),
        }
    }

    /// Analyze one exercise series.
    #[must_use]
    pub fn analyze(&self, series: &ExerciseSeries) -> ProgressionSummary {
        let recent: Vec<_> = series.sessions.iter().take(self.window).collect();
        let reduced_confidence = recent.len() < self.window;

        let mut points = Vec::with_capacity(recent.len());
        for (i, sample) in recent.iter().enumerate().rev() {
            // recent is most-recent-first; walk from the back for chronology
            let previous = recent.get(i + 1);
            points.push(ProgressionPoint {
                session_id: sample.session_id.clone(),
                timestamp: sample.timestamp,
                weight_kg: sample.weight_kg,
                reps: sample.reps,
                volume_kg: sample.volume_kg,
                days_since_previous: previous
                    .map(|p| (sample.timestamp - p.timestamp).num_days()),
            });
        }

        let trend = classify_trend(&points);
        let percent_change = match (points.first(), points.last()) {
            (Some(first), Some(last)) if first.weight_kg != 0.0 => {
                Some((last.weight_kg - first.weight_kg) / first.weight_kg * 100.0)
            }
            _ => None,
        };

        let latest_delta_kg = delta(&points, |p| p.weight_kg);
        let latest_volume_delta_kg = delta(&points, |p| p.volume_kg);

        let latest_weight = series.latest().weight_kg;
        let stagnant_sessions = series
            .sessions
            .iter()
            .take_while(|s| weights_equal(s.weight_kg, latest_weight))
            .count();

        ProgressionSummary {
            exercise: series.display_name.clone(),
            points,
            trend,
            percent_change,
            latest_delta_kg,
            latest_volume_delta_kg,
            stagnant_sessions,
            reduced_confidence,
        }
    }
}

fn delta(points: &[ProgressionPoint], metric: impl Fn(&ProgressionPoint) -> f64) -> f64 {
    match points.len() {
        0 | 1 => 0.0,
        n => metric(&points[n - 1]) - metric(&points[n - 2]),
    }
}

fn classify_trend(points: &[ProgressionPoint]) -> Trend {
    let mut any_up = false;
    let mut any_down = false;
    for pair in points.windows(2) {
        let d = pair[1].weight_kg - pair[0].weight_kg;
        if weights_equal(pair[0].weight_kg, pair[1].weight_kg) {
            continue;
        }
        if d > 0.0 {
            any_up = true;
        } else {
            any_down = true;
        }
    }
    match (any_up, any_down) {
        (true, true) => Trend::Volatile,
        (true, false) => Trend::Progressive,
        (false, true) => Trend::Regressive,
        // No deltas or all zero: a single session degenerates to plateau.
        (false, false) => Trend::Plateau,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::history::{SessionSample, WorkingSet};
    use chrono::TimeZone;

    fn sample(id: &str, day: u32, weight: f64, reps: u32) -> SessionSample {
        SessionSample {
            session_id: id.to_owned(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, day, 10, 0, 0).unwrap(),
            weight_kg: weight,
            reps,
            rpe: None,
            sets: vec![WorkingSet {
                weight_kg: weight,
                reps,
                rpe: None,
            }],
            volume_kg: weight * f64::from(reps),
        }
    }

    /// Weights most-recent-first, sessions three days apart.
    fn series(weights: &[f64]) -> ExerciseSeries {
        let sessions = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| sample(&format!("s{i}"), 28 - (i as u32) * 3, w, 8))
            .collect();
        ExerciseSeries {
            canonical: "bench press".to_owned(),
            display_name: "Bench Press".to_owned(),
            sessions,
        }
    }

    fn analyzer() -> ProgressionAnalyzer {
        ProgressionAnalyzer::new(&CoachConfig::default())
    }

    #[test]
    fn test_strictly_rising_weights_are_progressive() {
        let summary = analyzer().analyze(&series(&[85.0, 82.5, 80.0]));
        assert_eq!(summary.trend, Trend::Progressive);
        let pct = summary.percent_change.unwrap();
        assert!((pct - 6.25).abs() < 1e-9);
        assert_eq!(summary.latest_delta_kg, 2.5);
    }

    #[test]
    fn test_flat_then_rising_still_progressive() {
        let summary = analyzer().analyze(&series(&[85.0, 85.0, 80.0]));
        assert_eq!(summary.trend, Trend::Progressive);
    }

    #[test]
    fn test_falling_weights_are_regressive() {
        // Chronologically 85 -> 82.5 -> 80: decreasing, -5.9% overall.
        let summary = analyzer().analyze(&series(&[80.0, 82.5, 85.0]));
        assert_eq!(summary.trend, Trend::Regressive);
        let pct = summary.percent_change.unwrap();
        assert!((pct - (-5.882_352_941_176_47)).abs() < 1e-9);
    }

    #[test]
    fn test_identical_weights_are_plateau() {
        let summary = analyzer().analyze(&series(&[80.0, 80.0, 80.0, 80.0]));
        assert_eq!(summary.trend, Trend::Plateau);
        assert_eq!(summary.stagnant_sessions, 4);
        assert_eq!(summary.percent_change, Some(0.0));
    }

    #[test]
    fn test_mixed_deltas_are_volatile() {
        let summary = analyzer().analyze(&series(&[82.5, 80.0, 85.0]));
        assert_eq!(summary.trend, Trend::Volatile);
    }

    #[test]
    fn test_short_series_reduces_confidence() {
        let summary = analyzer().analyze(&series(&[82.5, 80.0]));
        assert!(summary.reduced_confidence);
        assert_eq!(summary.points.len(), 2);
        assert_eq!(summary.trend, Trend::Progressive);
    }

    #[test]
    fn test_single_session_degenerates_to_plateau() {
        let summary = analyzer().analyze(&series(&[80.0]));
        assert_eq!(summary.trend, Trend::Plateau);
        assert_eq!(summary.latest_delta_kg, 0.0);
        assert!(summary.reduced_confidence);
    }

    #[test]
    fn test_zero_base_weight_reports_no_percentage() {
        let summary = analyzer().analyze(&series(&[20.0, 0.0]));
        assert_eq!(summary.percent_change, None);
    }

    #[test]
    fn test_days_since_previous_from_timestamps() {
        let summary = analyzer().analyze(&series(&[85.0, 82.5, 80.0]));
        let days: Vec<Option<i64>> = summary
            .points
            .iter()
            .map(|p| p.days_since_previous)
            .collect();
        assert_eq!(days, vec![None, Some(3), Some(3)]);
    }

    #[test]
    fn test_window_limits_points_and_stagnation_uses_full_series() {
        // Six sessions, newest four identical: window shows plateau, and the
        // stagnation count only includes the identical streak.
        let summary = analyzer().analyze(&series(&[80.0, 80.0, 80.0, 80.0, 77.5, 75.0]));
        assert_eq!(summary.points.len(), 4);
        assert_eq!(summary.trend, Trend::Plateau);
        assert_eq!(summary.stagnant_sessions, 4);
        assert!(!summary.reduced_confidence);
    }
}
