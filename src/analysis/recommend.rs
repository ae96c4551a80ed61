use std::fmt;

use crate::analysis::tier::TierCounts;
use crate::config::{AnalyzerConfig, LatencyBands};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatencyBand {
    Slow,
    Moderate,
    Fast,
}

impl LatencyBand {
    pub fn for_duration(seconds: f64, bands: &LatencyBands) -> Self {
        if seconds > bands.slow_secs {
            LatencyBand::Slow
        } else if seconds > bands.moderate_secs {
            LatencyBand::Moderate
        } else {
            LatencyBand::Fast
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Recommendation {
    RaiseConfidenceThreshold,
    ImproveInputOrModel,
    Latency { band: LatencyBand, millis: f64 },
    LowerNmsThreshold,
    NoChangesNeeded,
}

impl Recommendation {
    /// False for purely informational entries.
    pub fn is_actionable(&self) -> bool {
        !matches!(
            self,
            Recommendation::NoChangesNeeded
                | Recommendation::Latency {
                    band: LatencyBand::Fast,
                    ..
                }
        )
    }
}

/// Builds the ordered suggestion list: threshold guidance, then latency,
/// then overlap. Never empty; falls back to [`Recommendation::NoChangesNeeded`].
/// A non-positive `inference_time` gives no latency entry.
pub fn recommend(
    counts: &TierCounts,
    avg_confidence: f64,
    inference_time: Option<f64>,
    config: &AnalyzerConfig,
) -> Vec<Recommendation> {
    let thresholds = &config.assessment;
    let high_ratio = counts.high_ratio();
    let low_ratio = counts.low_ratio();
    let mut out = Vec::new();

    if low_ratio > thresholds.low_ratio_limit {
        out.push(Recommendation::RaiseConfidenceThreshold);
    } else if high_ratio < thresholds.weak_high_ratio && avg_confidence < thresholds.acceptable_mean
    {
        out.push(Recommendation::ImproveInputOrModel);
    }

    if let Some(seconds) = inference_time.filter(|secs| *secs > 0.0) {
        out.push(Recommendation::Latency {
            band: LatencyBand::for_duration(seconds, &config.latency),
            millis: seconds * 1000.0,
        });
    }

    if counts.total() > config.overlap.min_detections
        && avg_confidence > config.overlap.min_mean_confidence
    {
        out.push(Recommendation::LowerNmsThreshold);
    }

    if out.is_empty() {
        out.push(Recommendation::NoChangesNeeded);
    }
    out
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::RaiseConfidenceThreshold => f.write_str(
                "📌 many low-confidence results; raise the CONFIDENCE threshold to 0.6-0.7 to reduce false positives",
            ),
            Recommendation::ImproveInputOrModel => f.write_str(
                "📌 overall confidence is low; check input image quality or consider a higher-capacity model",
            ),
            Recommendation::Latency {
                band: LatencyBand::Slow,
                millis,
            } => write!(
                f,
                "⚡ inference is slow ({millis:.0}ms), consider:\
                 \n     - reducing the input size (e.g. 416x416 to 320x320)\
                 \n     - enabling GPU acceleration\
                 \n     - a lighter model"
            ),
            Recommendation::Latency {
                band: LatencyBand::Moderate,
                millis,
            } => write!(
                f,
                "⚡ inference time is moderate ({millis:.0}ms); to speed it up:\
                 \n     - try GPU acceleration\
                 \n     - or reduce the input size slightly"
            ),
            Recommendation::Latency {
                band: LatencyBand::Fast,
                millis,
            } => write!(
                f,
                "✅ inference is fast ({millis:.0}ms), fine for real-time detection"
            ),
            Recommendation::LowerNmsThreshold => f.write_str(
                "📌 many confident detections; if boxes are duplicated, lower the NMS THRESHOLD to 0.3",
            ),
            Recommendation::NoChangesNeeded => {
                f.write_str("✅ current parameters look good, no changes needed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(high: usize, medium: usize, low: usize) -> TierCounts {
        TierCounts { high, medium, low }
    }

    fn bands(recs: &[Recommendation]) -> Vec<LatencyBand> {
        recs.iter()
            .filter_map(|r| match r {
                Recommendation::Latency { band, .. } => Some(*band),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn latency_bands() {
        let cfg = AnalyzerConfig::default();
        let quiet = counts(3, 0, 0);
        assert_eq!(bands(&recommend(&quiet, 0.9, Some(0.045), &cfg)), vec![LatencyBand::Fast]);
        assert_eq!(bands(&recommend(&quiet, 0.9, Some(0.125), &cfg)), vec![LatencyBand::Moderate]);
        assert_eq!(bands(&recommend(&quiet, 0.9, Some(0.420), &cfg)), vec![LatencyBand::Slow]);
        assert_eq!(LatencyBand::for_duration(0.3, &cfg.latency), LatencyBand::Moderate);
        assert_eq!(LatencyBand::for_duration(0.1, &cfg.latency), LatencyBand::Fast);
    }

    #[test]
    fn fast_inference_is_the_only_entry_for_a_clean_run() {
        let recs = recommend(&counts(3, 0, 0), 0.88, Some(0.045), &AnalyzerConfig::default());
        assert_eq!(recs.len(), 1);
        assert!(!recs[0].is_actionable());
        assert!(recs[0].to_string().contains("45ms"));
    }

    #[test]
    fn zero_duration_gives_no_latency_entry() {
        let recs = recommend(&counts(3, 0, 0), 0.88, Some(0.0), &AnalyzerConfig::default());
        assert_eq!(recs, vec![Recommendation::NoChangesNeeded]);
    }

    #[test]
    fn threshold_rules_are_exclusive() {
        let cfg = AnalyzerConfig::default();
        // low ratio 0.5 and high ratio 0 with a low mean: only the first fires
        let recs = recommend(&counts(0, 2, 2), 0.45, None, &cfg);
        assert_eq!(recs, vec![Recommendation::RaiseConfidenceThreshold]);

        let recs = recommend(&counts(0, 5, 0), 0.55, None, &cfg);
        assert_eq!(recs, vec![Recommendation::ImproveInputOrModel]);
    }

    #[test]
    fn overlap_needs_more_than_ten_confident_detections() {
        let cfg = AnalyzerConfig::default();
        let recs = recommend(&counts(11, 0, 0), 0.9, None, &cfg);
        assert_eq!(recs, vec![Recommendation::LowerNmsThreshold]);
        let recs = recommend(&counts(10, 0, 0), 0.9, None, &cfg);
        assert_eq!(recs, vec![Recommendation::NoChangesNeeded]);
    }

    #[test]
    fn entries_keep_threshold_latency_overlap_order() {
        let recs = recommend(&counts(1, 4, 7), 0.71, Some(0.5), &AnalyzerConfig::default());
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], Recommendation::RaiseConfidenceThreshold);
        assert!(matches!(
            recs[1],
            Recommendation::Latency {
                band: LatencyBand::Slow,
                ..
            }
        ));
        assert_eq!(recs[2], Recommendation::LowerNmsThreshold);
    }

    #[test]
    fn empty_set_without_duration_gets_improve_advice() {
        // ratios and mean are all 0, so the low-confidence branch fires
        let recs = recommend(&TierCounts::default(), 0.0, None, &AnalyzerConfig::default());
        assert_eq!(recs, vec![Recommendation::ImproveInputOrModel]);
    }
}
