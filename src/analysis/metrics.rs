use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::detect::DetectionSet;
use crate::error::Result;

/// Class name -> occurrence count, kept in first-encounter order.
///
/// Serializes as a JSON object whose keys appear in that same order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDistribution {
    entries: Vec<(String, usize)>,
}

impl ClassDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, class_name: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == class_name) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((class_name.to_string(), 1)),
        }
    }

    pub fn get(&self, class_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == class_name)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Entries by descending count. Equal counts keep first-encounter order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Serialize for ClassDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

struct DistributionVisitor;

impl<'de> Visitor<'de> for DistributionVisitor {
    type Value = ClassDistribution;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of class name to count")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, count)) = access.next_entry::<String, usize>()? {
            entries.push((name, count));
        }
        Ok(ClassDistribution { entries })
    }
}

impl<'de> Deserialize<'de> for ClassDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Scalar summary of one detection set.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionMetrics {
    pub total_detections: usize,
    /// Mean confidence; 0 for an empty set.
    pub avg_confidence: f64,
    pub class_distribution: ClassDistribution,
    /// Positive inference duration; a zero or negative one is dropped.
    pub inference_time: Option<f64>,
    /// `1 / inference_time`.
    pub fps: Option<f64>,
}

/// Computes count, mean confidence, class distribution and FPS.
///
/// Class ids are resolved through the label table with a bounds check; an
/// out-of-range id is reported as [`crate::AnalyzerError::UnknownClass`].
pub fn aggregate(set: &DetectionSet) -> Result<DetectionMetrics> {
    let total_detections = set.len();
    let avg_confidence = mean(&set.confidences);

    let mut class_distribution = ClassDistribution::new();
    for index in 0..set.class_ids.len() {
        class_distribution.increment(set.label_at(index)?);
    }

    let inference_time = set.measured_inference_time();
    let fps = inference_time.map(|secs| 1.0 / secs);

    Ok(DetectionMetrics {
        total_detections,
        avg_confidence,
        class_distribution,
        inference_time,
        fps,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    fn set(confidences: Vec<f64>, class_ids: Vec<usize>) -> DetectionSet {
        DetectionSet::new(
            vec![BoundingBox::default(); confidences.len()],
            confidences,
            class_ids,
            ["person", "bicycle", "car", "motorbike", "bus", "dog"],
        )
    }

    #[test]
    fn empty_set_has_zero_mean_and_no_fps() {
        let metrics = aggregate(&set(vec![], vec![])).unwrap();
        assert_eq!(metrics.total_detections, 0);
        assert_eq!(metrics.avg_confidence, 0.0);
        assert!(metrics.class_distribution.is_empty());
        assert_eq!(metrics.fps, None);
    }

    #[test]
    fn counts_classes_and_averages_confidence() {
        let metrics = aggregate(
            &set(vec![0.89, 0.75, 0.68, 0.52, 0.45], vec![0, 0, 1, 0, 5])
                .with_inference_time(0.125),
        )
        .unwrap();
        assert_eq!(metrics.total_detections, 5);
        assert!((metrics.avg_confidence - 0.658).abs() < 1e-9);
        assert_eq!(metrics.class_distribution.get("person"), Some(3));
        assert_eq!(metrics.class_distribution.get("bicycle"), Some(1));
        assert_eq!(metrics.class_distribution.get("dog"), Some(1));
        assert_eq!(metrics.fps, Some(8.0));
    }

    #[test]
    fn zero_duration_is_treated_as_absent() {
        let metrics = aggregate(&set(vec![0.9], vec![0]).with_inference_time(0.0)).unwrap();
        assert_eq!(metrics.inference_time, None);
        assert_eq!(metrics.fps, None);
    }

    #[test]
    fn ranking_breaks_ties_by_first_encounter() {
        let metrics = aggregate(&set(vec![0.9; 6], vec![5, 2, 0, 2, 0, 1])).unwrap();
        let ranked = metrics.class_distribution.ranked();
        assert_eq!(
            ranked,
            vec![("car", 2), ("person", 2), ("dog", 1), ("bicycle", 1)]
        );
    }

    #[test]
    fn distribution_serializes_in_encounter_order() {
        let metrics = aggregate(&set(vec![0.9; 3], vec![2, 0, 2])).unwrap();
        let json = serde_json::to_string(&metrics.class_distribution).unwrap();
        assert_eq!(json, r#"{"car":2,"person":1}"#);
        let back: ClassDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metrics.class_distribution);
    }
}
