//! Prediction classifier.
//!
//! Reduces one frame's raw detections to the three signals the triggers
//! consume. Pure: no state survives between calls.

use crate::config::EngineConfig;
use crate::detect::{Detection, Point};

pub const PERSON_LABEL: &str = "person";

/// Signals extracted from a single frame. Discarded after the frame is processed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifiedFrame {
    pub person_count: usize,
    /// Anchor of the last confident person in detector order; `None` iff no person.
    pub first_person_anchor: Option<Point>,
    /// Distinct prohibited labels, in first-seen order.
    pub prohibited_labels: Vec<String>,
}

impl ClassifiedFrame {
    /// Zero people or more than one.
    pub fn person_count_anomaly(&self) -> bool {
        self.person_count == 0 || self.person_count > 1
    }
}

#[derive(Clone, Debug)]
pub struct Classifier {
    person_score_threshold: f32,
    prohibited_labels: Vec<String>,
}

impl Classifier {
    pub fn new(person_score_threshold: f32, prohibited_labels: Vec<String>) -> Self {
        Self {
            person_score_threshold,
            prohibited_labels,
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(cfg.person_score_threshold, cfg.prohibited_labels.clone())
    }

    pub fn is_prohibited(&self, label: &str) -> bool {
        self.prohibited_labels.iter().any(|p| p == label)
    }

    pub fn classify(&self, detections: &[Detection]) -> ClassifiedFrame {
        let mut frame = ClassifiedFrame::default();

        for det in detections {
            if det.label == PERSON_LABEL && det.score > self.person_score_threshold {
                frame.person_count += 1;
                frame.first_person_anchor = Some(det.bbox.anchor());
            }

            // No score threshold for prohibited objects.
            if self.is_prohibited(&det.label) && !frame.prohibited_labels.contains(&det.label) {
                frame.prohibited_labels.push(det.label.clone());
            }
        }

        frame
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BBox;

    fn det(label: &str, score: f32, x: f32, y: f32) -> Detection {
        Detection::new(label, score, BBox::new(x, y, 50.0, 80.0))
    }

    #[test]
    fn empty_frame_has_no_person_and_no_objects() {
        let frame = Classifier::default().classify(&[]);
        assert_eq!(frame.person_count, 0);
        assert!(frame.first_person_anchor.is_none());
        assert!(frame.prohibited_labels.is_empty());
        assert!(frame.person_count_anomaly());
    }

    #[test]
    fn counts_only_confident_people() {
        let frame = Classifier::default().classify(&[
            det("person", 0.95, 1.0, 2.0),
            det("person", 0.6, 100.0, 0.0),
            det("person", 0.3, 200.0, 0.0),
        ]);
        assert_eq!(frame.person_count, 1);
        assert_eq!(frame.first_person_anchor, Some(Point::new(1.0, 2.0)));
        assert!(!frame.person_count_anomaly());
    }

    #[test]
    fn anchor_follows_last_confident_person() {
        let frame = Classifier::default().classify(&[
            det("person", 0.9, 10.0, 10.0),
            det("person", 0.8, 300.0, 40.0),
        ]);
        assert_eq!(frame.person_count, 2);
        assert_eq!(frame.first_person_anchor, Some(Point::new(300.0, 40.0)));
    }

    #[test]
    fn prohibited_labels_are_distinct_and_ignore_score() {
        let frame = Classifier::default().classify(&[
            det("cell phone", 0.2, 0.0, 0.0),
            det("cup", 0.9, 0.0, 0.0),
            det("laptop", 0.7, 0.0, 0.0),
            det("cell phone", 0.9, 5.0, 5.0),
        ]);
        assert_eq!(frame.prohibited_labels, vec!["cell phone", "laptop"]);
        assert_eq!(frame.person_count, 0);
    }

    #[test]
    fn custom_label_list() {
        let classifier = Classifier::new(0.5, vec!["book".to_string()]);
        let frame = classifier.classify(&[det("book", 0.4, 0.0, 0.0), det("laptop", 0.9, 0.0, 0.0)]);
        assert_eq!(frame.prohibited_labels, vec!["book"]);
    }
}
