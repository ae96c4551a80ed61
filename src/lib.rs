//! Detection Quality Analyzer
//!
//! Turns the post-NMS output of an object detector (boxes, confidences,
//! class ids, optional inference time) into a quality assessment:
//!
//! - summary statistics and per-class counts (`analysis::metrics`)
//! - High / Medium / Low confidence tiers and per-detection labels (`analysis::tier`)
//! - an overall verdict with strengths and concerns (`analysis::assessment`)
//! - threshold, latency and NMS tuning suggestions (`analysis::recommend`)
//! - run-over-run comparison and JSON export (`history`, `export`)
//!
//! [`DetectionAnalyzer`] wires these together and keeps the history.
//!
//! ```no_run
//! use detection_quality::{BoundingBox, DetectionAnalyzer, DetectionSet};
//!
//! let set = DetectionSet::new(
//!     vec![BoundingBox::from([10.0, 20.0, 100.0, 200.0])],
//!     vec![0.85],
//!     vec![0],
//!     ["person", "car"],
//! )
//! .with_inference_time(0.15);
//!
//! let mut analyzer = DetectionAnalyzer::new();
//! let record = analyzer.analyze(&set)?;
//! println!("{} detection(s)", record.total_detections());
//! analyzer.export_report("detection_report.json")?;
//! # Ok::<(), detection_quality::AnalyzerError>(())
//! ```

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod detect;
pub mod error;
pub mod export;
pub mod history;
pub mod report;

pub use analysis::{
    AnalysisRecord, Assessment, ClassDistribution, ConfidenceTier, QualityLabel, Recommendation,
    TierCounts, Verdict,
};
pub use analyzer::{quick_analyze, DetectionAnalyzer};
pub use config::AnalyzerConfig;
pub use detect::{BoundingBox, DetectionSet};
pub use error::{AnalyzerError, Result};
pub use export::{export_history, load_report, ExportedReport};
pub use history::{Comparison, Direction, History, LatencyDirection, Trend};
pub use report::AnalysisReport;
