use serde::Deserialize;
use std::path::Path;

use crate::error::{AnalyzerError, Result};

const DEFAULT_HIGH_CONFIDENCE: f64 = 0.8;
const DEFAULT_MEDIUM_CONFIDENCE: f64 = 0.5;
const DEFAULT_EXCELLENT_LABEL: f64 = 0.8;
const DEFAULT_GOOD_LABEL: f64 = 0.6;
const DEFAULT_FAIR_LABEL: f64 = 0.5;
const DEFAULT_STRONG_HIGH_RATIO: f64 = 0.5;
const DEFAULT_WEAK_HIGH_RATIO: f64 = 0.3;
const DEFAULT_HIGH_MEAN: f64 = 0.7;
const DEFAULT_ACCEPTABLE_MEAN: f64 = 0.6;
const DEFAULT_FAIR_MEAN: f64 = 0.5;
const DEFAULT_LOW_RATIO_LIMIT: f64 = 0.2;
const DEFAULT_SLOW_INFERENCE_SECS: f64 = 0.3;
const DEFAULT_MODERATE_INFERENCE_SECS: f64 = 0.1;
const DEFAULT_OVERLAP_MIN_DETECTIONS: usize = 10;
const DEFAULT_OVERLAP_MIN_MEAN: f64 = 0.7;

pub const CONFIG_PATH_ENV: &str = "DETECTION_ANALYZER_CONFIG";
pub const HIGH_CONFIDENCE_ENV: &str = "DETECTION_ANALYZER_HIGH_CONFIDENCE";
pub const MEDIUM_CONFIDENCE_ENV: &str = "DETECTION_ANALYZER_MEDIUM_CONFIDENCE";
pub const SLOW_INFERENCE_ENV: &str = "DETECTION_ANALYZER_SLOW_INFERENCE_SECS";

#[derive(Debug, Deserialize, Default)]
struct AnalyzerConfigFile {
    tiers: Option<TierConfigFile>,
    labels: Option<LabelConfigFile>,
    assessment: Option<AssessmentConfigFile>,
    latency: Option<LatencyConfigFile>,
    overlap: Option<OverlapConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct TierConfigFile {
    high: Option<f64>,
    medium: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct LabelConfigFile {
    excellent: Option<f64>,
    good: Option<f64>,
    fair: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct AssessmentConfigFile {
    strong_high_ratio: Option<f64>,
    weak_high_ratio: Option<f64>,
    high_mean: Option<f64>,
    acceptable_mean: Option<f64>,
    fair_mean: Option<f64>,
    low_ratio_limit: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct LatencyConfigFile {
    slow_secs: Option<f64>,
    moderate_secs: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlapConfigFile {
    min_detections: Option<usize>,
    min_mean_confidence: Option<f64>,
}

/// Heuristic thresholds used by every stage of the analysis.
///
/// `Default` yields the stock boundaries. All tier and label comparisons are
/// exclusive lower bounds: a confidence equal to a boundary falls below it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub tiers: TierThresholds,
    pub labels: LabelThresholds,
    pub assessment: AssessmentThresholds,
    pub latency: LatencyBands,
    pub overlap: OverlapRule,
}

/// Three-level tier boundaries (High / Medium / Low).
#[derive(Debug, Clone, PartialEq)]
pub struct TierThresholds {
    pub high: f64,
    pub medium: f64,
}

/// Four-level display label boundaries (Excellent / Good / Fair / Poor).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentThresholds {
    /// Share of high-tier detections counted as a strength (strict `>`) and
    /// required for an Excellent verdict (`>=`).
    pub strong_high_ratio: f64,
    /// Below this share of high-tier detections is a concern; at or above it
    /// qualifies for a Good verdict.
    pub weak_high_ratio: f64,
    pub high_mean: f64,
    pub acceptable_mean: f64,
    pub fair_mean: f64,
    pub low_ratio_limit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatencyBands {
    pub slow_secs: f64,
    pub moderate_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRule {
    pub min_detections: usize,
    pub min_mean_confidence: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tiers: TierThresholds {
                high: DEFAULT_HIGH_CONFIDENCE,
                medium: DEFAULT_MEDIUM_CONFIDENCE,
            },
            labels: LabelThresholds {
                excellent: DEFAULT_EXCELLENT_LABEL,
                good: DEFAULT_GOOD_LABEL,
                fair: DEFAULT_FAIR_LABEL,
            },
            assessment: AssessmentThresholds {
                strong_high_ratio: DEFAULT_STRONG_HIGH_RATIO,
                weak_high_ratio: DEFAULT_WEAK_HIGH_RATIO,
                high_mean: DEFAULT_HIGH_MEAN,
                acceptable_mean: DEFAULT_ACCEPTABLE_MEAN,
                fair_mean: DEFAULT_FAIR_MEAN,
                low_ratio_limit: DEFAULT_LOW_RATIO_LIMIT,
            },
            latency: LatencyBands {
                slow_secs: DEFAULT_SLOW_INFERENCE_SECS,
                moderate_secs: DEFAULT_MODERATE_INFERENCE_SECS,
            },
            overlap: OverlapRule {
                min_detections: DEFAULT_OVERLAP_MIN_DETECTIONS,
                min_mean_confidence: DEFAULT_OVERLAP_MIN_MEAN,
            },
        }
    }
}

impl AnalyzerConfig {
    /// Loads thresholds from `DETECTION_ANALYZER_CONFIG` (if set), then applies
    /// per-threshold environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_ENV).ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads thresholds from an explicit file, ignoring the environment.
    pub fn from_path(path: &Path) -> Result<Self> {
        let cfg = Self::from_file(read_config_file(path)?);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AnalyzerConfigFile) -> Self {
        let defaults = Self::default();
        let tiers = file.tiers.unwrap_or_default();
        let labels = file.labels.unwrap_or_default();
        let assessment = file.assessment.unwrap_or_default();
        let latency = file.latency.unwrap_or_default();
        let overlap = file.overlap.unwrap_or_default();
        Self {
            tiers: TierThresholds {
                high: tiers.high.unwrap_or(defaults.tiers.high),
                medium: tiers.medium.unwrap_or(defaults.tiers.medium),
            },
            labels: LabelThresholds {
                excellent: labels.excellent.unwrap_or(defaults.labels.excellent),
                good: labels.good.unwrap_or(defaults.labels.good),
                fair: labels.fair.unwrap_or(defaults.labels.fair),
            },
            assessment: AssessmentThresholds {
                strong_high_ratio: assessment
                    .strong_high_ratio
                    .unwrap_or(defaults.assessment.strong_high_ratio),
                weak_high_ratio: assessment
                    .weak_high_ratio
                    .unwrap_or(defaults.assessment.weak_high_ratio),
                high_mean: assessment
                    .high_mean
                    .unwrap_or(defaults.assessment.high_mean),
                acceptable_mean: assessment
                    .acceptable_mean
                    .unwrap_or(defaults.assessment.acceptable_mean),
                fair_mean: assessment
                    .fair_mean
                    .unwrap_or(defaults.assessment.fair_mean),
                low_ratio_limit: assessment
                    .low_ratio_limit
                    .unwrap_or(defaults.assessment.low_ratio_limit),
            },
            latency: LatencyBands {
                slow_secs: latency.slow_secs.unwrap_or(defaults.latency.slow_secs),
                moderate_secs: latency
                    .moderate_secs
                    .unwrap_or(defaults.latency.moderate_secs),
            },
            overlap: OverlapRule {
                min_detections: overlap
                    .min_detections
                    .unwrap_or(defaults.overlap.min_detections),
                min_mean_confidence: overlap
                    .min_mean_confidence
                    .unwrap_or(defaults.overlap.min_mean_confidence),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(value) = env_f64(HIGH_CONFIDENCE_ENV)? {
            self.tiers.high = value;
        }
        if let Some(value) = env_f64(MEDIUM_CONFIDENCE_ENV)? {
            self.tiers.medium = value;
        }
        if let Some(value) = env_f64(SLOW_INFERENCE_ENV)? {
            self.latency.slow_secs = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let unit_values = [
            ("tiers.high", self.tiers.high),
            ("tiers.medium", self.tiers.medium),
            ("labels.excellent", self.labels.excellent),
            ("labels.good", self.labels.good),
            ("labels.fair", self.labels.fair),
            ("assessment.strong_high_ratio", self.assessment.strong_high_ratio),
            ("assessment.weak_high_ratio", self.assessment.weak_high_ratio),
            ("assessment.high_mean", self.assessment.high_mean),
            ("assessment.acceptable_mean", self.assessment.acceptable_mean),
            ("assessment.fair_mean", self.assessment.fair_mean),
            ("assessment.low_ratio_limit", self.assessment.low_ratio_limit),
            ("overlap.min_mean_confidence", self.overlap.min_mean_confidence),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalyzerError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.tiers.high <= self.tiers.medium {
            return Err(AnalyzerError::InvalidConfig(format!(
                "tiers.high ({}) must be greater than tiers.medium ({})",
                self.tiers.high, self.tiers.medium
            )));
        }
        if !(self.labels.excellent > self.labels.good && self.labels.good > self.labels.fair) {
            return Err(AnalyzerError::InvalidConfig(
                "labels must satisfy excellent > good > fair".to_string(),
            ));
        }
        if !(self.latency.moderate_secs > 0.0
            && self.latency.slow_secs > self.latency.moderate_secs
            && self.latency.slow_secs.is_finite())
        {
            return Err(AnalyzerError::InvalidConfig(format!(
                "latency bands must satisfy slow_secs ({}) > moderate_secs ({}) > 0",
                self.latency.slow_secs, self.latency.moderate_secs
            )));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AnalyzerConfigFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AnalyzerError::InvalidConfig(format!(
            "failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AnalyzerError::InvalidConfig(format!("invalid config file {}: {}", path.display(), e))
    })
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or_else(|| AnalyzerError::InvalidConfig(format!("{key} must be a finite number"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_boundaries() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.tiers.high, 0.8);
        assert_eq!(cfg.tiers.medium, 0.5);
        assert_eq!(cfg.labels.good, 0.6);
        assert_eq!(cfg.latency.slow_secs, 0.3);
        assert_eq!(cfg.latency.moderate_secs, 0.1);
        assert_eq!(cfg.overlap.min_detections, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let file: AnalyzerConfigFile =
            serde_json::from_str(r#"{ "tiers": { "high": 0.9 }, "overlap": { "min_detections": 4 } }"#)
                .unwrap();
        let cfg = AnalyzerConfig::from_file(file);
        assert_eq!(cfg.tiers.high, 0.9);
        assert_eq!(cfg.tiers.medium, 0.5);
        assert_eq!(cfg.overlap.min_detections, 4);
        assert_eq!(cfg.overlap.min_mean_confidence, 0.7);
    }

    #[test]
    fn rejects_inverted_tiers() {
        let mut cfg = AnalyzerConfig::default();
        cfg.tiers.medium = 0.85;
        assert!(matches!(
            cfg.validate(),
            Err(AnalyzerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_inverted_latency_bands() {
        let mut cfg = AnalyzerConfig::default();
        cfg.latency.slow_secs = 0.05;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_nan_latency_bands() {
        let mut cfg = AnalyzerConfig::default();
        cfg.latency.slow_secs = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(AnalyzerError::InvalidConfig(_))
        ));

        let mut cfg = AnalyzerConfig::default();
        cfg.latency.moderate_secs = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalyzerConfig::default();
        cfg.latency.slow_secs = f64::INFINITY;
        assert!(cfg.validate().is_err());
    }
}
