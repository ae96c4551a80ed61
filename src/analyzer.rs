use std::path::Path;

use chrono::Utc;

use crate::analysis::{aggregate, assess, classify, rank_detections, recommend, AnalysisRecord};
use crate::config::AnalyzerConfig;
use crate::detect::DetectionSet;
use crate::error::{AnalyzerError, Result};
use crate::export::export_history;
use crate::history::{Comparison, History};
use crate::report::AnalysisReport;

/// Runs the analysis pipeline and keeps the history of every call.
///
/// Mutating calls take `&mut self`, so records are appended in call order.
/// Callers that share one analyzer across threads wrap it in a `Mutex`.
#[derive(Debug, Default)]
pub struct DetectionAnalyzer {
    config: AnalyzerConfig,
    history: History,
}

impl DetectionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            history: History::new(),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn history(&self) -> &[AnalysisRecord] {
        self.history.records()
    }

    /// Analyzes `set` and appends the result to history.
    pub fn analyze(&mut self, set: &DetectionSet) -> Result<AnalysisRecord> {
        self.analyze_report(set).map(AnalysisReport::into_record)
    }

    /// Like [`analyze`](Self::analyze), returning the full report.
    pub fn analyze_report(&mut self, set: &DetectionSet) -> Result<AnalysisReport> {
        let report = self.evaluate(set)?;
        log::debug!("{}", report);
        self.history.append(report.record.clone());
        log::info!(
            "analysis #{}: {} detection(s), verdict {:?}",
            self.history.len(),
            report.record.total_detections(),
            report.assessment.verdict
        );
        Ok(report)
    }

    /// Runs the pipeline without touching history.
    pub fn evaluate(&self, set: &DetectionSet) -> Result<AnalysisReport> {
        set.validate()?;
        let cfg = &self.config;

        let metrics = aggregate(set)?;
        let tiers = classify(&set.confidences, &cfg.tiers);
        let counts = tiers.counts();
        let detections = rank_detections(set, &cfg.labels)?;
        let assessment = assess(&counts, metrics.avg_confidence, &cfg.assessment);
        let recommendations = recommend(
            &counts,
            metrics.avg_confidence,
            metrics.inference_time,
            cfg,
        );
        let record = AnalysisRecord::new(Utc::now(), &metrics, counts);

        Ok(AnalysisReport {
            record,
            fps: metrics.fps,
            tiers,
            tier_thresholds: cfg.tiers.clone(),
            detections,
            assessment,
            recommendations,
        })
    }

    /// Compares the latest analysis with the one before it.
    ///
    /// Fewer than two analyses yields the recoverable
    /// [`AnalyzerError::InsufficientHistory`].
    pub fn compare_with_history(&self) -> Result<Comparison> {
        self.history.compare_latest_to_previous().inspect_err(|err| {
            if let AnalyzerError::InsufficientHistory { .. } = err {
                log::warn!("{}", err);
            }
        })
    }

    pub fn export_report(&self, path: impl AsRef<Path>) -> Result<()> {
        export_history(self.history.records(), path.as_ref())
    }
}

/// One-shot analysis with default thresholds and a throwaway history.
pub fn quick_analyze(set: &DetectionSet) -> Result<AnalysisReport> {
    DetectionAnalyzer::new().analyze_report(set)
}
