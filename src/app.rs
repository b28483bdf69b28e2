//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - runs classification and/or prediction
//! - prints reports and writes annotated CSVs

use clap::Parser;

use crate::cli::{ClassifyArgs, ClassifyOptions, Command, PredictArgs, PredictOptions, RunArgs};
use crate::domain::{CelestialObjectRecord, PipelineConfig};
use crate::error::AppError;
use crate::io::export::{ExportColumns, write_annotated_csv};
use crate::io::summary::{PredictionSummary, write_summary_json};

pub mod pipeline;

use pipeline::{ClassifiedCatalog, MASS_SUFFIX, PREDICTION_SUFFIX, PredictionOutput};

/// Entry point for the `exo` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; the CLI still accepts every value as a flag.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    if let Err(e) = crate::logging::init(cli.verbose) {
        eprintln!("warning: {e}");
    }

    match cli.command {
        Command::Classify(args) => handle_classify(args),
        Command::Predict(args) => handle_predict(args),
        Command::Run(args) => handle_run(args),
    }
}

fn handle_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let estimator = pipeline::load_estimator(&args.options.calibration)?;
    ensure_out_dir(&args.output.out_dir)?;

    for path in &args.catalogs {
        let classified = pipeline::run_classification(&estimator, path)?;
        print_classification(&classified, &args.options);

        let out = pipeline::output_path(&args.output.out_dir, path, MASS_SUFFIX);
        write_annotated_csv(
            &out,
            &classified.catalog.headers,
            &classified.records,
            ExportColumns {
                mass_and_class: true,
                prediction: false,
            },
        )?;
        println!("Wrote {}\n", out.display());
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    ensure_out_dir(&args.output.out_dir)?;
    let catalog = crate::io::ingest::load_catalog(&args.catalog)?;
    let config = args.options.config();

    let output = pipeline::run_prediction(&catalog, &catalog.records, &config)?;
    finish_prediction(&catalog.source, &output, &config, &args.options)?;

    let out = pipeline::output_path(&args.output.out_dir, &args.catalog, PREDICTION_SUFFIX);
    write_annotated_csv(
        &out,
        &catalog.headers,
        &output.run.records,
        ExportColumns {
            mass_and_class: false,
            prediction: true,
        },
    )?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let estimator = pipeline::load_estimator(&args.classify.calibration)?;
    ensure_out_dir(&args.output.out_dir)?;

    let classified = pipeline::run_classification(&estimator, &args.catalog)?;
    print_classification(&classified, &args.classify);

    let config = args.predict.config();
    let output = pipeline::run_prediction(&classified.catalog, &classified.records, &config)?;
    finish_prediction(&classified.catalog.source, &output, &config, &args.predict)?;

    let out = pipeline::output_path(&args.output.out_dir, &args.catalog, PREDICTION_SUFFIX);
    write_annotated_csv(
        &out,
        &classified.catalog.headers,
        &output.run.records,
        ExportColumns {
            mass_and_class: true,
            prediction: true,
        },
    )?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn print_classification(classified: &ClassifiedCatalog, options: &ClassifyOptions) {
    println!(
        "{}",
        crate::report::format_classification_summary(&classified.catalog, &classified.records)
    );
    if options.histogram {
        print_histogram(&classified.records, options);
    }
}

fn print_histogram(records: &[CelestialObjectRecord], options: &ClassifyOptions) {
    let plot = crate::plot::render_radius_histogram(records, options.bins, options.height);
    println!("{plot}");
}

fn finish_prediction(
    source: &str,
    output: &PredictionOutput,
    config: &PipelineConfig,
    options: &PredictOptions,
) -> Result<(), AppError> {
    println!(
        "{}",
        crate::report::format_prediction_summary(&output.run, config, &output.crosstab)
    );

    if let Some(path) = &options.summary {
        let summary = PredictionSummary::new(source, config, &output.run, output.crosstab.clone());
        write_summary_json(path, &summary)?;
    }
    Ok(())
}

fn ensure_out_dir(dir: &std::path::Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create output directory '{}': {e}", dir.display())))
}
