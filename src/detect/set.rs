use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Box geometry as handed over by the detector. Opaque to the analyzer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x, y, w, h]: [f32; 4]) -> Self {
        Self { x, y, w, h }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.w, b.h]
    }
}

/// Post-NMS output of one detection pass.
///
/// `boxes`, `confidences` and `class_ids` are parallel: entry `i` of each
/// describes the same detection. Every class id must index into `labels`.
/// Both preconditions are checked by [`DetectionSet::validate`], which the
/// analyzer runs before computing anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    pub boxes: Vec<BoundingBox>,
    pub confidences: Vec<f64>,
    pub class_ids: Vec<usize>,
    pub labels: Vec<String>,
    /// Forward-pass duration in seconds.
    #[serde(default)]
    pub inference_time: Option<f64>,
}

impl DetectionSet {
    pub fn new<L: Into<String>>(
        boxes: Vec<BoundingBox>,
        confidences: Vec<f64>,
        class_ids: Vec<usize>,
        labels: impl IntoIterator<Item = L>,
    ) -> Self {
        Self {
            boxes,
            confidences,
            class_ids,
            labels: labels.into_iter().map(Into::into).collect(),
            inference_time: None,
        }
    }

    pub fn with_inference_time(mut self, seconds: f64) -> Self {
        self.inference_time = Some(seconds);
        self
    }

    /// Inference duration when one was actually measured. Zero, negative and
    /// NaN durations count as absent.
    pub fn measured_inference_time(&self) -> Option<f64> {
        self.inference_time.filter(|secs| *secs > 0.0)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Checks index alignment and class-id range.
    pub fn validate(&self) -> Result<()> {
        let expected = self.boxes.len();
        for (field, actual) in [
            ("confidences", self.confidences.len()),
            ("class_ids", self.class_ids.len()),
        ] {
            if actual != expected {
                return Err(AnalyzerError::LengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        for index in 0..self.class_ids.len() {
            self.label_at(index)?;
        }
        Ok(())
    }

    /// Class name of detection `index`, bounds-checked against the label table.
    pub fn label_at(&self, index: usize) -> Result<&str> {
        let class_id = *self
            .class_ids
            .get(index)
            .ok_or(AnalyzerError::LengthMismatch {
                field: "class_ids",
                expected: self.boxes.len(),
                actual: self.class_ids.len(),
            })?;
        self.labels
            .get(class_id)
            .map(String::as_str)
            .ok_or(AnalyzerError::UnknownClass {
                index,
                class_id,
                labels: self.labels.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(n: usize) -> Vec<BoundingBox> {
        vec![BoundingBox::default(); n]
    }

    #[test]
    fn empty_set_is_valid() {
        let set = DetectionSet::new(vec![], vec![], vec![], ["person"]);
        assert!(set.is_empty());
        assert!(set.validate().is_ok());
    }

    #[test]
    fn mismatched_confidences_are_reported() {
        let set = DetectionSet::new(boxes(3), vec![0.9, 0.8], vec![0, 0, 0], ["person"]);
        match set.validate() {
            Err(AnalyzerError::LengthMismatch {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "confidences");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_class_id_is_reported() {
        let set = DetectionSet::new(boxes(2), vec![0.9, 0.8], vec![0, 4], ["person", "car"]);
        match set.validate() {
            Err(AnalyzerError::UnknownClass {
                index,
                class_id,
                labels,
            }) => assert_eq!((index, class_id, labels), (1, 4, 2)),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn boxes_deserialize_from_arrays() {
        let set: DetectionSet = serde_json::from_str(
            r#"{
                "boxes": [[10, 20, 100, 200]],
                "confidences": [0.85],
                "class_ids": [1],
                "labels": ["person", "car"]
            }"#,
        )
        .unwrap();
        assert_eq!(set.boxes[0].w, 100.0);
        assert_eq!(set.inference_time, None);
        assert_eq!(set.label_at(0).unwrap(), "car");
    }

    #[test]
    fn zero_or_negative_duration_is_not_measured() {
        let set = DetectionSet::new(vec![], vec![], vec![], ["person"]);
        assert_eq!(set.clone().with_inference_time(0.0).measured_inference_time(), None);
        assert_eq!(set.clone().with_inference_time(-0.2).measured_inference_time(), None);
        assert_eq!(
            set.with_inference_time(0.045).measured_inference_time(),
            Some(0.045)
        );
    }
}
