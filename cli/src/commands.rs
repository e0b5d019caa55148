//! Command runners. Each returns a serializable outcome; printing is left to
//! the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use ebp_core::{
    parse_report, validate_selection, write_report, BatchEvent, BatchOrchestrator, BatchState,
    Classification, Config, HintEngine, HttpScoringClient, KeywordHints, MediaKind, Normalizer,
    Settings, Upload,
};

use crate::cli::ScoreArgs;
use crate::error::{CommandError, CommandResult, ResultExt};
use crate::render;

#[derive(Debug, Serialize)]
pub struct ScoreOutcome {
    #[serde(flatten)]
    pub state: BatchState,
    pub report_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HintsOutcome {
    pub file_name: String,
    pub media_kind: MediaKind,
    pub characters: usize,
    pub hints: KeywordHints,
}

#[derive(Debug, Serialize)]
pub struct InspectRow {
    pub file_name: String,
    pub scores: [u8; 5],
    pub total: u8,
    pub classification: Classification,
}

#[derive(Debug, Serialize)]
pub struct SettingsOutcome {
    pub settings_file: PathBuf,
    pub created: bool,
    pub settings: Settings,
}

/// Apply command-line overrides on top of stored settings.
pub fn effective_settings(args: &ScoreArgs, stored: Settings) -> Settings {
    let mut settings = stored;
    if let Some(endpoint) = &args.endpoint {
        settings.scoring_endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        settings.request_timeout_secs = timeout;
    }
    if args.summary_columns {
        settings.include_summary_columns = true;
    }
    settings
}

fn read_uploads(files: &[PathBuf]) -> CommandResult<Vec<Upload>> {
    files
        .iter()
        .map(|path| Upload::from_path(path).map_err(|e| CommandError::read(format!("{:#}", e))))
        .collect()
}

/// Run one batch and optionally export it.
pub async fn score(args: &ScoreArgs, config: &Config) -> CommandResult<ScoreOutcome> {
    let settings = effective_settings(args, Settings::load(&config.settings_file));
    settings.validate()?;
    let layout = settings.report_layout()?;

    let uploads = read_uploads(&args.files)?;
    let client = HttpScoringClient::new(
        settings.scoring_endpoint.clone(),
        settings.request_timeout(),
    )?;

    let (tx, rx) = mpsc::channel(64);
    let orchestrator = BatchOrchestrator::new(Arc::new(client)).with_events(tx);
    let progress = (!args.json).then(|| tokio::spawn(print_progress(rx)));

    let mut warnings = Vec::new();
    let mut state = orchestrator.submit(uploads).await?;
    if let Some(index) = args.focus {
        match orchestrator.focus(index).await {
            Ok(()) => state = orchestrator.state().await,
            Err(e) => {
                tracing::warn!(index, "Focus not changed: {}", e);
                warnings.push(format!("focus not changed: {}", e));
            }
        }
    }

    // Closes the event channel so the progress printer finishes
    drop(orchestrator);
    if let Some(handle) = progress {
        if let Err(e) = handle.await {
            tracing::warn!("Progress printer failed: {}", e);
        }
    }

    let report_path = match &args.export_dir {
        Some(dir) => Some(write_report(dir, &state.results, &layout)?),
        None => None,
    };

    Ok(ScoreOutcome {
        state,
        report_path,
        warnings,
    })
}

async fn print_progress(mut rx: mpsc::Receiver<BatchEvent>) {
    while let Some(event) = rx.recv().await {
        if let Some(line) = render::progress_line(&event) {
            eprintln!("{}", line);
        }
    }
}

/// Extract one document locally and compute its keyword hints.
pub async fn hints(path: &Path) -> CommandResult<HintsOutcome> {
    let upload = Upload::from_path(path).map_err(|e| CommandError::read(format!("{:#}", e)))?;
    let document = validate_selection(vec![upload])?
        .pop()
        .ok_or_else(|| CommandError::internal("selection produced no document"))?;

    let text = Normalizer::new()
        .normalize(&document)
        .await
        .map_err(|e| CommandError::extraction(e.to_string()))?;
    let hints = HintEngine::new().hints_for(&text);

    Ok(HintsOutcome {
        file_name: document.name,
        media_kind: document.media_kind,
        characters: text.content.chars().count(),
        hints,
    })
}

/// Read an exported report back.
pub fn inspect(path: &Path) -> CommandResult<Vec<InspectRow>> {
    let content = std::fs::read_to_string(path).read_err()?;
    let rows = parse_report(&content)?;

    Ok(rows
        .into_iter()
        .map(|row| InspectRow {
            total: row.scores.total(),
            classification: row.scores.classification(),
            scores: row.scores.values(),
            file_name: row.file_name,
        })
        .collect())
}

/// Show the stored settings, writing the defaults first when `init` is set
/// and no settings file exists yet.
pub fn settings(config: &Config, init: bool) -> CommandResult<SettingsOutcome> {
    let created = init && !config.settings_file.exists();
    let settings = Settings::load(&config.settings_file);

    if created {
        config.ensure_dirs()?;
        settings.save(&config.settings_file).internal_err()?;
        tracing::info!(path = %config.settings_file.display(), "Wrote default settings");
    }

    Ok(SettingsOutcome {
        settings_file: config.settings_file.clone(),
        created,
        settings,
    })
}
