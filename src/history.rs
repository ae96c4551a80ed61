//! Append-only log of analysis records and latest-vs-previous comparison.

use crate::analysis::AnalysisRecord;
use crate::error::{AnalyzerError, Result};

#[derive(Debug, Default, Clone)]
pub struct History {
    records: Vec<AnalysisRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record` at the tail. No checks against earlier records.
    pub fn append(&mut self, record: AnalysisRecord) {
        self.records.push(record);
    }

    /// Records in append order, oldest first.
    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.records.last()
    }

    /// Compares the two most recently appended records.
    pub fn compare_latest_to_previous(&self) -> Result<Comparison> {
        let [.., previous, latest] = self.records.as_slice() else {
            return Err(AnalyzerError::InsufficientHistory {
                available: self.records.len(),
            });
        };
        Ok(Comparison::between(previous, latest))
    }
}

/// Strict-greater check: equal values report `NotIncreased`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Increased,
    NotIncreased,
}

impl Direction {
    fn of<T: PartialOrd>(latest: T, previous: T) -> Self {
        if latest > previous {
            Direction::Increased
        } else {
            Direction::NotIncreased
        }
    }
}

/// Strict-less check on durations: equal values report `Slower`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatencyDirection {
    Faster,
    Slower,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trend<T, D> {
    pub latest: T,
    pub previous: T,
    pub direction: D,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub detections: Trend<usize, Direction>,
    pub avg_confidence: Trend<f64, Direction>,
    /// Present only when both records carry a positive inference time.
    pub inference_time: Option<Trend<f64, LatencyDirection>>,
}

impl Comparison {
    pub fn between(previous: &AnalysisRecord, latest: &AnalysisRecord) -> Self {
        let detections = Trend {
            latest: latest.total_detections(),
            previous: previous.total_detections(),
            direction: Direction::of(latest.total_detections(), previous.total_detections()),
        };
        let avg_confidence = Trend {
            latest: latest.avg_confidence(),
            previous: previous.avg_confidence(),
            direction: Direction::of(latest.avg_confidence(), previous.avg_confidence()),
        };
        let measured =
            |record: &AnalysisRecord| record.inference_time().filter(|secs| *secs > 0.0);
        let inference_time = match (measured(latest), measured(previous)) {
            (Some(latest), Some(previous)) => Some(Trend {
                latest,
                previous,
                direction: if latest < previous {
                    LatencyDirection::Faster
                } else {
                    LatencyDirection::Slower
                },
            }),
            _ => None,
        };
        Self {
            detections,
            avg_confidence,
            inference_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::record::test_record;

    #[test]
    fn comparison_needs_two_records() {
        let mut history = History::new();
        assert!(matches!(
            history.compare_latest_to_previous(),
            Err(AnalyzerError::InsufficientHistory { available: 0 })
        ));
        history.append(test_record(5, 0.7, None));
        match history.compare_latest_to_previous() {
            Err(err @ AnalyzerError::InsufficientHistory { available: 1 }) => {
                assert!(err.is_recoverable())
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn fewer_detections_is_not_increased() {
        let mut history = History::new();
        history.append(test_record(5, 0.70, Some(0.125)));
        history.append(test_record(3, 0.82, Some(0.045)));
        let cmp = history.compare_latest_to_previous().unwrap();
        assert_eq!(cmp.detections.latest, 3);
        assert_eq!(cmp.detections.previous, 5);
        assert_eq!(cmp.detections.direction, Direction::NotIncreased);
        assert_eq!(cmp.avg_confidence.direction, Direction::Increased);
        assert_eq!(
            cmp.inference_time.map(|t| t.direction),
            Some(LatencyDirection::Faster)
        );
    }

    #[test]
    fn ties_take_the_non_strict_branch() {
        let mut history = History::new();
        history.append(test_record(5, 0.7, Some(0.1)));
        history.append(test_record(5, 0.7, Some(0.1)));
        let cmp = history.compare_latest_to_previous().unwrap();
        assert_eq!(cmp.detections.direction, Direction::NotIncreased);
        assert_eq!(cmp.avg_confidence.direction, Direction::NotIncreased);
        assert_eq!(
            cmp.inference_time.map(|t| t.direction),
            Some(LatencyDirection::Slower)
        );
    }

    #[test]
    fn compares_only_the_last_two() {
        let mut history = History::new();
        history.append(test_record(1, 0.1, None));
        history.append(test_record(2, 0.2, Some(0.3)));
        history.append(test_record(4, 0.4, None));
        let cmp = history.compare_latest_to_previous().unwrap();
        assert_eq!(cmp.detections.previous, 2);
        assert_eq!(cmp.detections.direction, Direction::Increased);
        assert!(cmp.inference_time.is_none());
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|r| r.total_detections()), Some(4));
    }

    #[test]
    fn zero_durations_give_no_latency_trend() {
        let mut history = History::new();
        history.append(test_record(3, 0.88, Some(0.0)));
        history.append(test_record(3, 0.88, Some(0.0)));
        let cmp = history.compare_latest_to_previous().unwrap();
        assert!(cmp.inference_time.is_none());
    }
}
