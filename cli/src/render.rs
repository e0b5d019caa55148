//! Plain-text rendering of command outcomes.

use std::fmt::Write;

use ebp_core::{BatchEvent, DocumentError, ScoringResult};

use crate::commands::{HintsOutcome, InspectRow, ScoreOutcome, SettingsOutcome};

/// Short column headings, in rubric order.
const SHORT_LABELS: [&str; 5] = ["Empirical", "Formal", "Transparency", "Stakeholder", "Evaluation"];

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(4)
}

fn table_header(out: &mut String, width: usize) {
    let _ = write!(out, "    #  {:<width$}", "File");
    for label in SHORT_LABELS {
        let _ = write!(out, "  {}", label);
    }
    let _ = writeln!(out, "  Total  Classification");
}

struct Row<'a> {
    file_name: &'a str,
    scores: [u8; 5],
    total: u8,
    classification: &'static str,
}

fn table_row(out: &mut String, width: usize, marker: bool, position: usize, row: Row<'_>) {
    let _ = write!(
        out,
        "{} {:>3}  {:<width$}",
        if marker { ">" } else { " " },
        position,
        row.file_name
    );
    for (label, score) in SHORT_LABELS.iter().zip(row.scores) {
        let _ = write!(out, "  {:>w$}", score, w = label.len());
    }
    let _ = writeln!(out, "  {:>5}  {}", row.total, row.classification);
}

/// Results table; the focused row is marked with `>`.
pub fn results_table(results: &[ScoringResult], focused: Option<usize>) -> String {
    let mut out = String::new();
    let width = name_width(results.iter().map(|r| r.file_name.as_str()));

    table_header(&mut out, width);
    for (i, result) in results.iter().enumerate() {
        table_row(
            &mut out,
            width,
            focused == Some(i),
            i,
            Row {
                file_name: &result.file_name,
                scores: result.scores.values(),
                total: result.total(),
                classification: result.classification().as_str(),
            },
        );
    }
    out
}

/// Per-dimension detail for one result.
pub fn focused_view(result: &ScoringResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {}/15 ({})",
        result.file_name,
        result.total(),
        result.classification()
    );

    for score in result.scores.iter() {
        let _ = writeln!(out, "  {}: {}/3", score.dimension, score.score());
        if let Some(justification) = &score.justification {
            let _ = writeln!(out, "      {}", justification);
        }
        if let Some(keywords) = result.hints.get(score.dimension) {
            let _ = writeln!(out, "      keywords: {}", keywords.join(", "));
        }
    }
    out
}

pub fn errors_view(errors: &[DocumentError]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, "  {}: {}", error.file_name, error.reason);
    }
    out
}

pub fn score_report(outcome: &ScoreOutcome) -> String {
    let state = &outcome.state;
    let mut out = String::new();

    if state.results.is_empty() {
        out.push_str("No documents were scored.\n");
    } else {
        out.push_str(&results_table(&state.results, state.focused));
        if let Some(result) = state.focused_result() {
            out.push('\n');
            out.push_str(&focused_view(result));
        }
    }

    if !state.errors.is_empty() {
        let _ = writeln!(out, "\nFailed ({}):", state.errors.len());
        out.push_str(&errors_view(&state.errors));
    }
    for warning in &outcome.warnings {
        let _ = writeln!(out, "\nwarning: {}", warning);
    }
    if let Some(path) = &outcome.report_path {
        let _ = writeln!(out, "\nReport written to {}", path.display());
    }
    out
}

pub fn hints_report(outcome: &HintsOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}, {} characters)",
        outcome.file_name, outcome.media_kind, outcome.characters
    );
    if outcome.hints.is_empty() {
        out.push_str("  no rubric keywords found\n");
    }
    for (dimension, keywords) in outcome.hints.iter() {
        let _ = writeln!(out, "  {}: {}", dimension, keywords.join(", "));
    }
    out
}

pub fn inspect_report(rows: &[InspectRow]) -> String {
    let mut out = String::new();
    let width = name_width(rows.iter().map(|r| r.file_name.as_str()));

    table_header(&mut out, width);
    for (i, row) in rows.iter().enumerate() {
        table_row(
            &mut out,
            width,
            false,
            i,
            Row {
                file_name: &row.file_name,
                scores: row.scores,
                total: row.total,
                classification: row.classification.as_str(),
            },
        );
    }
    out
}

pub fn settings_report(outcome: &SettingsOutcome) -> String {
    let settings = &outcome.settings;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{}",
        outcome.settings_file.display(),
        if outcome.created { " (created)" } else { "" }
    );
    let _ = writeln!(out, "  scoring_endpoint: {}", settings.scoring_endpoint);
    let _ = writeln!(out, "  request_timeout_secs: {}", settings.request_timeout_secs);
    let _ = writeln!(
        out,
        "  include_summary_columns: {}",
        settings.include_summary_columns
    );
    if let Some(columns) = &settings.export_columns {
        let _ = writeln!(out, "  export_columns: {}", columns.join(", "));
    }
    out
}

/// One progress line for stderr, or `None` for events not worth a line.
pub fn progress_line(event: &BatchEvent) -> Option<String> {
    match event {
        BatchEvent::Started { documents, .. } => {
            Some(format!("Scoring {} document(s)...", documents))
        }
        BatchEvent::DocumentStarted {
            index,
            file_name,
            stage,
        } => Some(format!("[{}] {}: {}", index, file_name, stage)),
        BatchEvent::DocumentScored {
            index,
            file_name,
            total,
            classification,
        } => Some(format!(
            "[{}] {}: {}/15 {}",
            index, file_name, total, classification
        )),
        BatchEvent::DocumentFailed {
            index,
            file_name,
            reason,
            ..
        } => Some(format!("[{}] {}: failed: {}", index, file_name, reason)),
        BatchEvent::Finished { .. } => None,
    }
}
