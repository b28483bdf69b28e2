//! Command-line parsing for the exoplanet classifier.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! classification and prediction code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PipelineConfig;
use crate::plot::DEFAULT_BINS;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "exo", version, about = "Exoplanet mass estimation, classification and disposition prediction")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate masses and planet classes for one or more catalogs.
    Classify(ClassifyArgs),
    /// Cross-validated disposition prediction for a KOI-style catalog.
    Predict(PredictArgs),
    /// Classify a catalog, then predict dispositions on the annotated records.
    Run(RunArgs),
}

/// Output location shared by every command.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Directory for annotated CSVs.
    #[arg(long, env = "EXO_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

/// Options for the mass/class stage.
#[derive(Debug, Args, Clone)]
pub struct ClassifyOptions {
    /// Mass-radius calibration CSV (mass, radius columns).
    #[arg(long, env = "EXO_CALIBRATION", value_name = "CSV")]
    pub calibration: PathBuf,

    /// Print a radius histogram by class.
    #[arg(long)]
    pub histogram: bool,

    /// Histogram bins (log-spaced in radius).
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,

    /// Histogram height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for the prediction stage.
///
/// Folds, seed and forest shape are fixed (`PipelineConfig::default()`).
#[derive(Debug, Args, Clone)]
pub struct PredictOptions {
    /// Write a JSON run summary (parameters, accuracy, crosstab).
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,
}

impl PredictOptions {
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
    }
}

#[derive(Debug, Args, Clone)]
pub struct ClassifyArgs {
    /// Catalog CSVs to annotate.
    #[arg(required = true, value_name = "CATALOG")]
    pub catalogs: Vec<PathBuf>,

    #[command(flatten)]
    pub options: ClassifyOptions,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// KOI-style catalog with disposition and false-positive flag columns.
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub options: PredictOptions,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    #[command(flatten)]
    pub classify: ClassifyOptions,

    #[command(flatten)]
    pub predict: PredictOptions,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn predict_defaults_match_pipeline_defaults() {
        let cli = Cli::parse_from(["exo", "predict", "koi.csv"]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.options.config(), PipelineConfig::default());
        assert_eq!(args.catalog, PathBuf::from("koi.csv"));
    }

    #[test]
    fn model_parameters_are_not_command_line_options() {
        for flag in ["--folds", "--seed", "--trees", "--max-depth"] {
            let parsed = Cli::try_parse_from(["exo", "predict", flag, "3", "koi.csv"]);
            assert!(parsed.is_err(), "{flag} should be rejected");
        }
    }

    #[test]
    fn classify_accepts_several_catalogs() {
        let cli = Cli::parse_from([
            "exo",
            "classify",
            "--calibration",
            "mr.csv",
            "--out-dir",
            "out",
            "koi.csv",
            "toi.csv",
        ]);
        let Command::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.catalogs.len(), 2);
        assert_eq!(args.options.calibration, PathBuf::from("mr.csv"));
        assert_eq!(args.output.out_dir, PathBuf::from("out"));
        assert_eq!(args.options.bins, DEFAULT_BINS);
    }
}
