//! Text rendering of one analysis and of a history comparison.

use std::fmt;

use crate::analysis::{
    AnalysisRecord, Assessment, ConfidenceTier, RankedDetection, Recommendation, TierGroups,
};
use crate::config::TierThresholds;
use crate::history::{Comparison, Direction, LatencyDirection};

const RULE_WIDTH: usize = 60;

/// Everything one analysis call produced.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisReport {
    pub record: AnalysisRecord,
    pub fps: Option<f64>,
    pub tiers: TierGroups,
    pub tier_thresholds: TierThresholds,
    /// Detections by descending confidence.
    pub detections: Vec<RankedDetection>,
    pub assessment: Assessment,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    pub fn into_record(self) -> AnalysisRecord {
        self.record
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = &self.record;
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "Detection Quality Report")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Analyzed at: {}\n",
            record.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
        )?;

        writeln!(f, "[Summary]")?;
        writeln!(f, "  Detections: {}", record.total_detections())?;
        writeln!(
            f,
            "  Mean confidence: {:.2}%",
            record.avg_confidence() * 100.0
        )?;
        if let Some(secs) = record.inference_time() {
            writeln!(f, "  Inference time: {:.2} ms", secs * 1000.0)?;
        }
        if let Some(fps) = self.fps {
            writeln!(f, "  FPS: {fps:.2}")?;
        }

        writeln!(f, "\n[Class distribution]")?;
        for (name, count) in record.class_distribution().ranked() {
            writeln!(f, "  {name}: {count}")?;
        }

        writeln!(f, "\n[Confidence tiers]")?;
        let counts = self.tiers.counts();
        if counts.total() > 0 {
            let t = &self.tier_thresholds;
            for (tier, heading) in [
                (ConfidenceTier::High, format!("high (>{:.2})", t.high)),
                (
                    ConfidenceTier::Medium,
                    format!("medium ({:.2}-{:.2})", t.medium, t.high),
                ),
                (ConfidenceTier::Low, format!("low (<={:.2})", t.medium)),
            ] {
                writeln!(
                    f,
                    "  {heading:<18} {} [{:.1}%]",
                    counts.get(tier),
                    counts.ratio(tier) * 100.0
                )?;
            }
        }

        writeln!(f, "\n[Detections]")?;
        for d in &self.detections {
            writeln!(
                f,
                "  #{}: {:<15} confidence: {:.2}%  {}",
                d.index + 1,
                d.class_name,
                d.confidence * 100.0,
                d.label
            )?;
        }

        writeln!(f, "\n[Assessment]")?;
        writeln!(f, "  Strengths:")?;
        for strength in &self.assessment.strengths {
            writeln!(f, "    {strength}")?;
        }
        writeln!(f, "\n  Concerns:")?;
        for concern in &self.assessment.concerns {
            writeln!(f, "    {concern}")?;
        }
        writeln!(f, "\n  Verdict: {}", self.assessment.verdict)?;

        writeln!(f, "\n[Recommendations]")?;
        for (i, rec) in self.recommendations.iter().enumerate() {
            writeln!(f, "  {}. {rec}", i + 1)?;
        }
        write!(f, "\n{rule}")
    }
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Increased => "↑",
        Direction::NotIncreased => "↓",
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}\nHistory comparison\n{rule}")?;
        writeln!(f, "\nLatest vs previous:")?;
        writeln!(
            f,
            "  Detections: {} vs {} ({})",
            self.detections.latest,
            self.detections.previous,
            arrow(self.detections.direction)
        )?;
        write!(
            f,
            "  Mean confidence: {:.2}% vs {:.2}% ({})",
            self.avg_confidence.latest * 100.0,
            self.avg_confidence.previous * 100.0,
            arrow(self.avg_confidence.direction)
        )?;
        if let Some(t) = &self.inference_time {
            let trend = match t.direction {
                LatencyDirection::Faster => "↓ faster",
                LatencyDirection::Slower => "↑ slower",
            };
            write!(
                f,
                "\n  Inference time: {:.2}ms vs {:.2}ms ({trend})",
                t.latest * 1000.0,
                t.previous * 1000.0
            )?;
        }
        Ok(())
    }
}
