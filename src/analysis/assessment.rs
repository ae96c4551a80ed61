//! Overall quality verdict from tier ratios and mean confidence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::tier::TierCounts;
use crate::config::AssessmentThresholds;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strength {
    MostlyHighConfidence { high_ratio: f64 },
    HighMeanConfidence { avg_confidence: f64 },
    NoLowConfidence,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Concern {
    FewHighConfidence { high_ratio: f64 },
    LowMeanConfidence { avg_confidence: f64 },
    ManyLowConfidence { low_ratio: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assessment {
    pub high_ratio: f64,
    pub low_ratio: f64,
    pub strengths: Vec<Strength>,
    pub concerns: Vec<Concern>,
    pub verdict: Verdict,
}

/// Evaluates strengths and concerns independently, then picks the verdict.
///
/// The verdict rules are checked top-down and the first match wins. Later
/// rules are supersets of earlier ones, so order is significant: a set with
/// mostly high-tier detections and no low-tier ones is Excellent whatever its
/// mean confidence.
pub fn assess(
    counts: &TierCounts,
    avg_confidence: f64,
    thresholds: &AssessmentThresholds,
) -> Assessment {
    let high_ratio = counts.high_ratio();
    let low_ratio = counts.low_ratio();
    let no_low = counts.low == 0;

    let mut strengths = Vec::new();
    if high_ratio > thresholds.strong_high_ratio {
        strengths.push(Strength::MostlyHighConfidence { high_ratio });
    }
    if avg_confidence > thresholds.high_mean {
        strengths.push(Strength::HighMeanConfidence { avg_confidence });
    }
    if no_low {
        strengths.push(Strength::NoLowConfidence);
    }

    let mut concerns = Vec::new();
    if high_ratio < thresholds.weak_high_ratio {
        concerns.push(Concern::FewHighConfidence { high_ratio });
    }
    if avg_confidence < thresholds.acceptable_mean {
        concerns.push(Concern::LowMeanConfidence { avg_confidence });
    }
    if low_ratio > thresholds.low_ratio_limit {
        concerns.push(Concern::ManyLowConfidence { low_ratio });
    }

    let rules = [
        (
            Verdict::Excellent,
            high_ratio >= thresholds.strong_high_ratio && no_low,
        ),
        (
            Verdict::Good,
            high_ratio >= thresholds.weak_high_ratio && avg_confidence >= thresholds.acceptable_mean,
        ),
        (Verdict::Fair, avg_confidence >= thresholds.fair_mean),
    ];
    let verdict = rules
        .iter()
        .find(|(_, matched)| *matched)
        .map(|(verdict, _)| *verdict)
        .unwrap_or(Verdict::Poor);

    Assessment {
        high_ratio,
        low_ratio,
        strengths,
        concerns,
        verdict,
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::MostlyHighConfidence { high_ratio } => write!(
                f,
                "✅ more than half of the detections are high confidence ({:.1}%)",
                high_ratio * 100.0
            ),
            Strength::HighMeanConfidence { avg_confidence } => write!(
                f,
                "✅ mean confidence is high ({:.2}%)",
                avg_confidence * 100.0
            ),
            Strength::NoLowConfidence => {
                f.write_str("✅ no low-confidence detections, output is stable")
            }
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concern::FewHighConfidence { high_ratio } => write!(
                f,
                "❌ few high-confidence detections ({:.1}%), model or parameters may need tuning",
                high_ratio * 100.0
            ),
            Concern::LowMeanConfidence { avg_confidence } => write!(
                f,
                "❌ mean confidence is low ({:.2}%)",
                avg_confidence * 100.0
            ),
            Concern::ManyLowConfidence { low_ratio } => write!(
                f,
                "❌ many low-confidence detections ({:.1}%), likely false positives",
                low_ratio * 100.0
            ),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Excellent => "🌟 excellent detection quality",
            Verdict::Good => "✅ good detection quality",
            Verdict::Fair => "⚠️  fair detection quality, room for improvement",
            Verdict::Poor => "❌ poor detection quality, needs tuning",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    fn thresholds() -> AssessmentThresholds {
        AnalyzerConfig::default().assessment
    }

    fn counts(high: usize, medium: usize, low: usize) -> TierCounts {
        TierCounts { high, medium, low }
    }

    #[test]
    fn excellent_ignores_mean_confidence() {
        let a = assess(&counts(6, 4, 0), 0.4, &thresholds());
        assert_eq!(a.verdict, Verdict::Excellent);
        assert!(a
            .concerns
            .contains(&Concern::LowMeanConfidence { avg_confidence: 0.4 }));
    }

    #[test]
    fn mixed_set_falls_through_to_fair() {
        let a = assess(&counts(1, 3, 1), 0.658, &thresholds());
        assert_eq!(a.high_ratio, 0.2);
        assert_eq!(a.low_ratio, 0.2);
        assert_eq!(a.verdict, Verdict::Fair);
        assert_eq!(
            a.concerns,
            vec![Concern::FewHighConfidence { high_ratio: 0.2 }]
        );
        assert!(a.strengths.is_empty());
    }

    #[test]
    fn good_requires_both_ratio_and_mean() {
        assert_eq!(assess(&counts(3, 6, 1), 0.65, &thresholds()).verdict, Verdict::Good);
        assert_eq!(assess(&counts(3, 6, 1), 0.55, &thresholds()).verdict, Verdict::Fair);
        assert_eq!(assess(&counts(2, 7, 1), 0.65, &thresholds()).verdict, Verdict::Fair);
    }

    #[test]
    fn low_mean_is_poor() {
        let a = assess(&counts(0, 2, 5), 0.35, &thresholds());
        assert_eq!(a.verdict, Verdict::Poor);
        assert_eq!(a.concerns.len(), 3);
    }

    #[test]
    fn strengths_are_not_exclusive() {
        let a = assess(&counts(3, 0, 0), 0.88, &thresholds());
        assert_eq!(
            a.strengths,
            vec![
                Strength::MostlyHighConfidence { high_ratio: 1.0 },
                Strength::HighMeanConfidence { avg_confidence: 0.88 },
                Strength::NoLowConfidence,
            ]
        );
        assert!(a.concerns.is_empty());
    }

    #[test]
    fn empty_set_is_poor_without_error() {
        let a = assess(&TierCounts::default(), 0.0, &thresholds());
        assert_eq!(a.high_ratio, 0.0);
        assert_eq!(a.low_ratio, 0.0);
        assert_eq!(a.verdict, Verdict::Poor);
        assert_eq!(a.strengths, vec![Strength::NoLowConfidence]);
    }
}
