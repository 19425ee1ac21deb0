// ABOUTME: Coaching intelligence for strength-training history
// ABOUTME: Library root - models, config, analysis engine, providers, formatters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! # repcoach
//!
//! Turns a per-exercise time series of (weight, reps, RPE) observations
//! into coaching output: a graded session summary, next-session weight
//! recommendations, a retrospective audit of past weight decisions, and a
//! program-wide periodization view.
//!
//! The analysis core is pure and deterministic: identical input snapshots
//! produce byte-identical reports, with no wall-clock reads. Fetching
//! (Hevy API) and rendering (markdown/JSON) are thin layers around it.
//!
//! ```no_run
//! use repcoach::config::CoachConfig;
//! use repcoach::intelligence::CoachingEngine;
//!
//! let engine = CoachingEngine::new(CoachConfig::default());
//! let report = engine.analyze(&[]);
//! assert!(report.generated_for.is_none());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod formatters;
pub mod intelligence;
pub mod models;
pub mod providers;

pub use config::CoachConfig;
pub use intelligence::{CoachingEngine, CoachingReport};
pub use models::WorkoutEvent;
