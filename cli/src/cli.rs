use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ebp")]
#[command(about = "Score policy documents against the evidence-based policy rubric")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one batch of documents with the remote scoring service
    Score(ScoreArgs),
    /// Show keyword hints for one document, without contacting the service
    Hints {
        /// PDF, DOCX or plain text file
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the stored settings
    Settings {
        /// Write default settings if no settings file exists
        #[arg(long)]
        init: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a previously exported report
    Inspect {
        /// Path to a scoring_results.csv file
        csv: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// PDF, DOCX or plain text files, scored in the given order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Scoring service endpoint (overrides settings)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-document request timeout in seconds (overrides settings)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write scoring_results.csv into this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Show this result (0-based) in detail instead of the first one
    #[arg(long)]
    pub focus: Option<usize>,

    /// Add total and classification columns to the exported report
    #[arg(long)]
    pub summary_columns: bool,

    /// Print the batch as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        let cli = Cli::try_parse_from([
            "ebp",
            "score",
            "a.pdf",
            "b.txt",
            "--timeout",
            "30",
            "--focus",
            "1",
            "--summary-columns",
        ])
        .unwrap();

        match cli.command {
            Command::Score(args) => {
                assert_eq!(args.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.txt")]);
                assert_eq!(args.timeout, Some(30));
                assert_eq!(args.focus, Some(1));
                assert!(args.summary_columns);
                assert!(!args.json);
                assert_eq!(args.endpoint, None);
            }
            other => panic!("expected score, got {:?}", other),
        }
    }

    #[test]
    fn test_score_requires_files() {
        assert!(Cli::try_parse_from(["ebp", "score"]).is_err());
    }

    #[test]
    fn test_parse_inspect() {
        let cli = Cli::try_parse_from(["ebp", "inspect", "out/scoring_results.csv", "--json"])
            .unwrap();
        assert!(matches!(cli.command, Command::Inspect { json: true, .. }));
    }
}
