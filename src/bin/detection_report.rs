//! detection-report - analyze saved detector output and print quality reports
//!
//! Input is a JSON file holding one detection set or an array of them, in
//! the order the runs happened:
//!
//! ```json
//! [{ "boxes": [[10, 20, 100, 200]], "confidences": [0.85],
//!    "class_ids": [0], "labels": ["person"], "inference_time": 0.15 }]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::io::IsTerminal;
use std::path::PathBuf;

use detection_quality::{AnalyzerConfig, AnalyzerError, DetectionAnalyzer, DetectionSet};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON file with one detection set or an array of detection sets.
    #[arg(long)]
    input: PathBuf,
    /// JSON threshold overrides (defaults to DETECTION_ANALYZER_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the analysis history to this JSON file.
    #[arg(long)]
    export: Option<PathBuf>,
    /// UI mode for stderr progress.
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto, value_name = "MODE")]
    ui: ui::UiMode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputFile {
    Many(Vec<DetectionSet>),
    One(DetectionSet),
}

impl InputFile {
    fn into_sets(self) -> Vec<DetectionSet> {
        match self {
            InputFile::Many(sets) => sets,
            InputFile::One(set) => vec![set],
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::new(
        args.ui,
        std::io::stderr().is_terminal(),
        std::io::stdout().is_terminal(),
    );

    let config = {
        let _stage = ui.stage("Load thresholds");
        match &args.config {
            Some(path) => AnalyzerConfig::from_path(path)?,
            None => AnalyzerConfig::load()?,
        }
    };
    let sets = {
        let _stage = ui.stage("Read detections");
        let raw = std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        let input: InputFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid detection file {}", args.input.display()))?;
        input.into_sets()
    };
    log::info!("loaded {} detection set(s) from {}", sets.len(), args.input.display());

    let mut analyzer = DetectionAnalyzer::with_config(config)?;
    let mut reports = Vec::with_capacity(sets.len());
    {
        let _stage = ui.stage("Analyze detections");
        let counter = ui.counter(sets.len());
        for (i, set) in sets.iter().enumerate() {
            let report = analyzer
                .analyze_report(set)
                .with_context(|| format!("detection set #{}", i + 1))?;
            reports.push(report);
            counter.inc(1);
        }
        counter.finish_and_clear();
    }

    for report in &reports {
        println!("{report}\n");
    }

    match analyzer.compare_with_history() {
        Ok(comparison) => println!("{comparison}"),
        Err(err @ AnalyzerError::InsufficientHistory { .. }) => {
            log::info!("skipping comparison: {}", err)
        }
        Err(err) => return Err(err.into()),
    }

    if let Some(path) = &args.export {
        let _stage = ui.stage("Export report");
        analyzer.export_report(path)?;
        println!("report exported to {}", path.display());
    }
    Ok(())
}
