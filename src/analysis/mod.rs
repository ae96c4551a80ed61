//! Per-call analysis pipeline.
//!
//! `metrics` and `tier` work directly on a [`crate::DetectionSet`];
//! `assessment` and `recommend` consume their output. `record` holds the
//! summary that ends up in history.

pub mod assessment;
pub mod metrics;
pub mod recommend;
pub mod record;
pub mod tier;

pub use assessment::{assess, Assessment, Concern, Strength, Verdict};
pub use metrics::{aggregate, ClassDistribution, DetectionMetrics};
pub use recommend::{recommend, LatencyBand, Recommendation};
pub use record::AnalysisRecord;
pub use tier::{
    classify, rank_detections, ConfidenceTier, QualityLabel, RankedDetection, TierCounts,
    TierGroups,
};
