use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::metrics::{ClassDistribution, DetectionMetrics};
use crate::analysis::tier::TierCounts;

/// Summary of one analysis call, as kept in history and exported.
///
/// Immutable once built: fields are private and only readable through
/// accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    timestamp: DateTime<Utc>,
    total_detections: usize,
    avg_confidence: f64,
    class_distribution: ClassDistribution,
    confidence_levels: TierCounts,
    inference_time: Option<f64>,
}

impl AnalysisRecord {
    pub(crate) fn new(
        timestamp: DateTime<Utc>,
        metrics: &DetectionMetrics,
        confidence_levels: TierCounts,
    ) -> Self {
        Self {
            timestamp,
            total_detections: metrics.total_detections,
            avg_confidence: metrics.avg_confidence,
            class_distribution: metrics.class_distribution.clone(),
            confidence_levels,
            inference_time: metrics.inference_time,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn total_detections(&self) -> usize {
        self.total_detections
    }

    pub fn avg_confidence(&self) -> f64 {
        self.avg_confidence
    }

    pub fn class_distribution(&self) -> &ClassDistribution {
        &self.class_distribution
    }

    pub fn confidence_levels(&self) -> TierCounts {
        self.confidence_levels
    }

    pub fn inference_time(&self) -> Option<f64> {
        self.inference_time
    }
}

#[cfg(test)]
pub(crate) fn test_record(
    total_detections: usize,
    avg_confidence: f64,
    inference_time: Option<f64>,
) -> AnalysisRecord {
    AnalysisRecord {
        timestamp: Utc::now(),
        total_detections,
        avg_confidence,
        class_distribution: ClassDistribution::new(),
        confidence_levels: TierCounts {
            medium: total_detections,
            ..TierCounts::default()
        },
        inference_time,
    }
}
