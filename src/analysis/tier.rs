use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{LabelThresholds, TierThresholds};
use crate::detect::{BoundingBox, DetectionSet};
use crate::error::Result;

/// Coarse three-level bucket feeding the ratio heuristics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Both boundaries are exclusive lower bounds: a confidence exactly at
    /// `high` is Medium, exactly at `medium` is Low.
    pub fn for_confidence(confidence: f64, thresholds: &TierThresholds) -> Self {
        if confidence > thresholds.high {
            ConfidenceTier::High
        } else if confidence > thresholds.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// Per-tier detection counts. Serialized as `confidence_levels`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn get(&self, tier: ConfidenceTier) -> usize {
        match tier {
            ConfidenceTier::High => self.high,
            ConfidenceTier::Medium => self.medium,
            ConfidenceTier::Low => self.low,
        }
    }

    /// Share of detections in `tier`; 0 when there are none at all.
    pub fn ratio(&self, tier: ConfidenceTier) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(tier) as f64 / total as f64,
        }
    }

    pub fn high_ratio(&self) -> f64 {
        self.ratio(ConfidenceTier::High)
    }

    pub fn low_ratio(&self) -> f64 {
        self.ratio(ConfidenceTier::Low)
    }
}

/// Output of [`classify`]: the tier of every detection plus the
/// `(index, confidence)` members of each tier, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierGroups {
    pub tiers: Vec<ConfidenceTier>,
    pub high: Vec<(usize, f64)>,
    pub medium: Vec<(usize, f64)>,
    pub low: Vec<(usize, f64)>,
}

impl TierGroups {
    pub fn group(&self, tier: ConfidenceTier) -> &[(usize, f64)] {
        match tier {
            ConfidenceTier::High => &self.high,
            ConfidenceTier::Medium => &self.medium,
            ConfidenceTier::Low => &self.low,
        }
    }

    pub fn counts(&self) -> TierCounts {
        TierCounts {
            high: self.high.len(),
            medium: self.medium.len(),
            low: self.low.len(),
        }
    }
}

pub fn classify(confidences: &[f64], thresholds: &TierThresholds) -> TierGroups {
    let mut groups = TierGroups {
        tiers: Vec::with_capacity(confidences.len()),
        ..TierGroups::default()
    };
    for (index, &confidence) in confidences.iter().enumerate() {
        let tier = ConfidenceTier::for_confidence(confidence, thresholds);
        groups.tiers.push(tier);
        let bucket = match tier {
            ConfidenceTier::High => &mut groups.high,
            ConfidenceTier::Medium => &mut groups.medium,
            ConfidenceTier::Low => &mut groups.low,
        };
        bucket.push((index, confidence));
    }
    groups
}

/// Finer four-level per-detection label used in the detection listing.
/// Independent of [`ConfidenceTier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityLabel {
    pub fn for_confidence(confidence: f64, thresholds: &LabelThresholds) -> Self {
        if confidence > thresholds.excellent {
            QualityLabel::Excellent
        } else if confidence > thresholds.good {
            QualityLabel::Good
        } else if confidence > thresholds.fair {
            QualityLabel::Fair
        } else {
            QualityLabel::Poor
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            QualityLabel::Excellent => "✅ excellent",
            QualityLabel::Good => "✅ good",
            QualityLabel::Fair => "⚠️  fair",
            QualityLabel::Poor => "❌ poor",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedDetection {
    /// Position in the input detection set.
    pub index: usize,
    pub class_name: String,
    pub confidence: f64,
    pub label: QualityLabel,
    pub bbox: BoundingBox,
}

/// All detections ordered by descending confidence (stable on ties).
pub fn rank_detections(
    set: &DetectionSet,
    thresholds: &LabelThresholds,
) -> Result<Vec<RankedDetection>> {
    let mut ranked = Vec::with_capacity(set.len());
    for (index, (&confidence, bbox)) in set.confidences.iter().zip(&set.boxes).enumerate() {
        ranked.push(RankedDetection {
            index,
            class_name: set.label_at(index)?.to_string(),
            confidence,
            label: QualityLabel::for_confidence(confidence, thresholds),
            bbox: *bbox,
        });
    }
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(ranked)
}
