// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 repcoach contributors

//! Markdown rendering of the coaching report
//!
//! Section order mirrors how a lifter reads the report: how the last
//! session went, what to lift next, then the longer-horizon views. Audits
//! are sorted worst efficiency first so the exercises that need attention
//! surface at the top.

use std::fmt::Write;

use crate::intelligence::{
    weights_equal, CoachingReport, CyclePosition, DecisionAudit, DecisionOutcome, Recommendation,
};

/// Render the full report as markdown.
#[must_use]
pub fn render_markdown(report: &CoachingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Training Report\n");

    session_section(&mut out, report);
    recommendation_section(&mut out, &report.recommendations);
    audit_section(&mut out, report);
    progression_section(&mut out, report);
    periodization_section(&mut out, report);
    volume_recovery_section(&mut out, report);
    overview_section(&mut out, report);
    cycle_section(&mut out, report.cycle_position.as_ref());
    diagnostics_section(&mut out, report);

    out
}

fn session_section(out: &mut String, report: &CoachingReport) {
    let Some(summary) = &report.generated_for else {
        let _ = writeln!(out, "No analyzable sessions found in the fetched history.\n");
        return;
    };
    let _ = writeln!(out, "## Session Quality\n");
    let _ = writeln!(
        out,
        "**{}** on {} - grade **{}** ({:.0}/100)\n",
        summary.title,
        summary.timestamp.format("%Y-%m-%d"),
        summary.grade.grade,
        summary.grade.score,
    );
    let _ = writeln!(out, "{}\n", summary.grade.description);
    let _ = writeln!(
        out,
        "- Intensity: {:.0}/100, progress: {:.0}/100",
        summary.grade.intensity_score, summary.grade.progress_score
    );
    let _ = writeln!(
        out,
        "- Progressed: {}, maintained: {}, regressed: {}\n",
        summary.grade.progressed, summary.grade.maintained, summary.grade.regressed
    );

    let _ = writeln!(out, "| Exercise | Top Set | RPE | Verdict | Volume |");
    let _ = writeln!(out, "|---|---|---|---|---|");
    for exercise in &summary.exercises {
        let rpe = exercise
            .rpe
            .map_or_else(|| "-".to_owned(), |r| format!("{r:.1}"));
        let _ = writeln!(
            out,
            "| {} | {:.1} kg x {} | {} | {} | {:.0} kg |",
            exercise.exercise, exercise.weight_kg, exercise.reps, rpe, exercise.verdict,
            exercise.volume_kg,
        );
    }
    let _ = writeln!(out);
}

fn recommendation_section(out: &mut String, recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Next Session Weights\n");

    let (adjustments, maintains): (Vec<_>, Vec<_>) = recommendations
        .iter()
        .partition(|r| !weights_equal(r.target_weight_kg, r.current_weight_kg) || r.is_deload);

    for rec in &adjustments {
        let marker = if rec.is_deload { " [deload]" } else { "" };
        let _ = writeln!(
            out,
            "- **{}**: {} {:.1} kg -> {:.1} kg{} ({})",
            rec.exercise, rec.action, rec.current_weight_kg, rec.target_weight_kg, marker,
            rec.rationale,
        );
    }
    for rec in &maintains {
        let _ = writeln!(
            out,
            "- **{}**: hold at {:.1} kg ({})",
            rec.exercise, rec.current_weight_kg, rec.rationale
        );
    }
    let _ = writeln!(out);
}

fn audit_section(out: &mut String, report: &CoachingReport) {
    if report.decisions.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Decision Audit\n");
    if let Some(overall) = report.overall_efficiency_pct {
        let _ = writeln!(out, "Overall decision efficiency: **{overall:.0}%**\n");
    }

    // Worst first: the exercises where calibration went wrong most often.
    let mut audits: Vec<&DecisionAudit> = report.decisions.iter().collect();
    audits.sort_by(|a, b| {
        let ea = a.efficiency_pct.unwrap_or(100.0);
        let eb = b.efficiency_pct.unwrap_or(100.0);
        ea.partial_cmp(&eb)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });

    for audit in audits {
        let efficiency = audit
            .efficiency_pct
            .map_or_else(|| "-".to_owned(), |e| format!("{e:.0}%"));
        let _ = writeln!(
            out,
            "### {} - {efficiency} ({}/{} correct)\n",
            audit.exercise, audit.correct, audit.judged
        );
        if audit.smart_adjustments > 0 {
            let _ = writeln!(
                out,
                "{} deliberate deload(s) recognized as smart adjustments.",
                audit.smart_adjustments
            );
        }
        for record in &audit.records {
            if record.judged_correct {
                continue;
            }
            let marker = match record.outcome {
                DecisionOutcome::MissedOpportunity => "missed opportunity",
                _ => "incorrect",
            };
            let _ = writeln!(
                out,
                "- {} ({}): {:.1} kg -> {:.1} kg, {}",
                record.timestamp.format("%Y-%m-%d"),
                marker,
                record.prior_weight_kg,
                record.new_weight_kg,
                record.reason,
            );
        }
        let _ = writeln!(out);
    }
}

fn progression_section(out: &mut String, report: &CoachingReport) {
    if report.progressions.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Progression Trends\n");
    let _ = writeln!(out, "| Exercise | Trend | Change | Latest Delta |");
    let _ = writeln!(out, "|---|---|---|---|");
    for summary in &report.progressions {
        let change = summary
            .percent_change
            .map_or_else(|| "-".to_owned(), |p| format!("{p:+.1}%"));
        let confidence = if summary.reduced_confidence { "*" } else { "" };
        let _ = writeln!(
            out,
            "| {} | {}{confidence} | {change} | {:+.1} kg |",
            summary.exercise, summary.trend, summary.latest_delta_kg
        );
    }
    if report.progressions.iter().any(|p| p.reduced_confidence) {
        let _ = writeln!(out, "\n\\* short history, reduced confidence");
    }
    let _ = writeln!(out);
}

fn periodization_section(out: &mut String, report: &CoachingReport) {
    let p = &report.periodization;
    if p.tracked_exercises == 0 {
        return;
    }
    let _ = writeln!(out, "## Program Status\n");
    let _ = writeln!(
        out,
        "**{}** - {} ({:.0}% of {} tracked lifts stagnant)\n",
        p.status, p.suggestion, p.stagnant_pct, p.tracked_exercises
    );
    for candidate in &p.deload_candidates {
        let _ = writeln!(
            out,
            "- {}: stuck at {:.1} kg for {} sessions, deload to ~{:.1} kg ({:.0}-{:.0}% reduction)",
            candidate.exercise,
            candidate.current_weight_kg,
            candidate.sessions_stagnant,
            candidate.suggested_weight_kg,
            candidate.reduction_pct_min,
            candidate.reduction_pct_max,
        );
    }
    let _ = writeln!(out);
}

fn volume_recovery_section(out: &mut String, report: &CoachingReport) {
    let Some(insights) = &report.volume_recovery else {
        return;
    };
    let _ = writeln!(out, "## Volume & Recovery\n");
    let _ = writeln!(
        out,
        "Weekly volume is **{}** ({:+.1}% vs the prior week).",
        insights.volume_trend, insights.volume_change_pct
    );
    match (insights.last_rest_days, insights.average_rest_days) {
        (Some(last), Some(avg)) => {
            let _ = writeln!(
                out,
                "Last rest gap: {last} day(s), average {avg:.1} - **{}**.\n",
                insights.recovery_status
            );
        }
        _ => {
            let _ = writeln!(out, "Not enough training days to judge recovery.\n");
        }
    }

    if !insights.muscle_volume_kg.is_empty() {
        let _ = writeln!(out, "| Muscle Group | Volume |");
        let _ = writeln!(out, "|---|---|");
        for (group, volume) in &insights.muscle_volume_kg {
            let _ = writeln!(out, "| {group} | {volume:.0} kg |");
        }
        let _ = writeln!(out);
    }
}

fn overview_section(out: &mut String, report: &CoachingReport) {
    let Some(overview) = &report.overview else {
        return;
    };
    let _ = writeln!(out, "## Training Overview\n");
    let _ = writeln!(
        out,
        "{} session(s) across {} exercise(s), {} to {}.\n",
        overview.total_sessions,
        overview.tracked_exercises,
        overview.first_session.format("%Y-%m-%d"),
        overview.last_session.format("%Y-%m-%d"),
    );
    if !overview.top_by_frequency.is_empty() {
        let _ = writeln!(out, "- Most frequent: {}", overview.top_by_frequency.join(", "));
    }
    if !overview.top_by_volume.is_empty() {
        let _ = writeln!(out, "- Highest volume: {}", overview.top_by_volume.join(", "));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "| Week | Sessions | Reps | Volume |");
    let _ = writeln!(out, "|---|---|---|---|");
    for week in &overview.weekly {
        let _ = writeln!(
            out,
            "| {}-W{:02} | {} | {} | {:.0} kg |",
            week.iso_year, week.iso_week, week.sessions, week.total_reps, week.volume_kg
        );
    }
    let _ = writeln!(out);
}

fn cycle_section(out: &mut String, position: Option<&CyclePosition>) {
    let Some(position) = position else {
        return;
    };
    let _ = writeln!(out, "## Routine Cycle\n");
    match position {
        CyclePosition::Known {
            matched_label,
            next_label,
            ..
        } => {
            let _ = writeln!(out, "Last workout matched **{matched_label}**; up next: **{next_label}**.\n");
        }
        CyclePosition::Unknown { reason } => {
            let _ = writeln!(out, "Cycle position unknown: {reason}.\n");
        }
    }
}

fn diagnostics_section(out: &mut String, report: &CoachingReport) {
    if report.skipped.is_empty() && report.excluded_set_counts.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Data Notes\n");
    for skip in &report.skipped {
        let _ = writeln!(out, "- Skipped {}: {}", skip.exercise, skip.reason);
    }
    for (category, count) in &report.excluded_set_counts {
        let _ = writeln!(out, "- Excluded {count} set(s) of '{category}' (non-strength)");
    }
    let _ = writeln!(out);
}
