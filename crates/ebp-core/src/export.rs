//! CSV report export.
//!
//! The report has a `File` column followed by one column per rubric
//! dimension, in rubric order, and one row per scored document.

use std::path::{Path, PathBuf};

use crate::aggregate::{ScoreSet, ScoringResult};
use crate::error::{ConfigError, ExportError};
use crate::rubric::Dimension;

pub const REPORT_FILE_NAME: &str = "scoring_results.csv";

const FILE_COLUMN: &str = "File";
const TOTAL_COLUMN: &str = "Total Score";
const CLASSIFICATION_COLUMN: &str = "Summary Classification";

/// Column layout of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    include_summary: bool,
}

impl ReportLayout {
    /// Layout with the rubric dimension labels as score columns.
    pub fn new(include_summary: bool) -> Self {
        Self { include_summary }
    }

    /// Layout from configured score column labels. The labels must be the
    /// rubric dimension labels, in rubric order.
    pub fn with_columns(columns: &[String], include_summary: bool) -> Result<Self, ConfigError> {
        let expected: Vec<String> = Dimension::ALL
            .iter()
            .map(|d| d.label().to_string())
            .collect();
        if columns != expected.as_slice() {
            return Err(ConfigError::ColumnMismatch {
                configured: columns.to_vec(),
                expected,
            });
        }
        Ok(Self { include_summary })
    }

    fn header(&self) -> Vec<&'static str> {
        let mut header = vec![FILE_COLUMN];
        header.extend(Dimension::ALL.iter().map(|d| d.label()));
        if self.include_summary {
            header.push(TOTAL_COLUMN);
            header.push(CLASSIFICATION_COLUMN);
        }
        header
    }
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Render results as CSV text. Lines end with `\n`.
pub fn to_csv(results: &[ScoringResult], layout: &ReportLayout) -> String {
    let mut out = String::new();
    push_record(&mut out, layout.header());

    for result in results {
        let mut record: Vec<String> = vec![result.file_name.clone()];
        record.extend(result.scores.values().iter().map(u8::to_string));
        if layout.include_summary {
            record.push(result.total().to_string());
            record.push(result.classification().to_string());
        }
        push_record(&mut out, record);
    }

    out
}

fn push_record<S: AsRef<str>>(out: &mut String, fields: impl IntoIterator<Item = S>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field.as_ref()));
    }
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One data row of a parsed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub file_name: String,
    pub scores: ScoreSet,
}

/// Read a report produced by [`to_csv`]. Summary columns, when present,
/// are ignored; totals are recomputed from the scores.
pub fn parse_report(csv: &str) -> Result<Vec<ReportRow>, ExportError> {
    let records = split_records(csv)?;
    let mut records = records.into_iter();

    let (_, header) = records.next().ok_or_else(|| ExportError::Parse {
        line: 1,
        message: "report is empty".to_string(),
    })?;
    let expected = ReportLayout::new(false).header();
    if header.len() < expected.len() || header[..expected.len()] != expected[..] {
        return Err(ExportError::Parse {
            line: 1,
            message: format!("unexpected header: {}", header.join(",")),
        });
    }

    records
        .map(|(line, fields)| {
            if fields.len() != header.len() {
                return Err(ExportError::Parse {
                    line,
                    message: format!("expected {} fields, found {}", header.len(), fields.len()),
                });
            }

            let mut values = [0u8; 5];
            for (slot, field) in values.iter_mut().zip(&fields[1..6]) {
                *slot = field.trim().parse().map_err(|_| ExportError::Parse {
                    line,
                    message: format!("'{}' is not a score", field),
                })?;
            }
            let scores = ScoreSet::from_values(values).ok_or_else(|| ExportError::Parse {
                line,
                message: format!("scores out of range: {:?}", values),
            })?;

            Ok(ReportRow {
                file_name: fields[0].clone(),
                scores,
            })
        })
        .collect()
}

/// Split CSV text into records, tagged with the line each record starts on.
fn split_records(csv: &str) -> Result<Vec<(usize, Vec<String>)>, ExportError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = csv.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut fields)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ExportError::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_line, fields));
    }

    Ok(records)
}

/// Write the report to `<dir>/scoring_results.csv`, creating `dir` if needed.
pub fn write_report(
    dir: &Path,
    results: &[ScoringResult],
    layout: &ReportLayout,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(REPORT_FILE_NAME);
    let write_err = |source: std::io::Error| ExportError::Write {
        path: path.display().to_string(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(write_err)?;
    std::fs::write(&path, to_csv(results, layout)).map_err(write_err)?;

    tracing::info!(path = %path.display(), rows = results.len(), "Wrote report");
    Ok(path)
}
