//! Aggregate state read by the UI.
//!
//! Written only by the engine. Counts and the prohibited-object list only
//! grow until `reset()`.

use std::time::Instant;

use crate::classify::ClassifiedFrame;
use crate::error::ErrorRecord;
use crate::trigger::{Firing, TriggerKind};

/// Per-session frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames the detector answered successfully.
    pub frames_processed: u64,
    /// Frames where the detector returned an error.
    pub frames_failed: u64,
    /// Cycles that ran with no frame available.
    pub frames_skipped: u64,
}

/// Point-in-time copy of the aggregate state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub person_count: usize,
    /// Deduplicated, first-seen order.
    pub prohibited_objects_ever_detected: Vec<String>,
    pub is_moving_too_much: bool,
    pub warning_count: u64,
    pub last_error: Option<ErrorRecord>,
    pub detection_running: bool,
    pub stats: SessionStats,
}

impl Snapshot {
    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }
}

#[derive(Debug, Default)]
pub struct AggregateState {
    person_count: usize,
    prohibited_objects: Vec<String>,
    /// Movement flag holds until the movement trigger rearms.
    moving_until: Option<Instant>,
    warning_count: u64,
    last_error: Option<ErrorRecord>,
    stats: SessionStats,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_frame(&mut self, frame: &ClassifiedFrame) {
        self.person_count = frame.person_count;
        self.stats.frames_processed += 1;
    }

    pub fn observe_failure(&mut self, record: ErrorRecord) {
        self.stats.frames_failed += 1;
        self.record_error(record);
    }

    pub fn observe_skip(&mut self) {
        self.stats.frames_skipped += 1;
    }

    pub fn record_error(&mut self, record: ErrorRecord) {
        self.last_error = Some(record);
    }

    /// Apply the side effects of a trigger firing on `frame`.
    pub fn record_warning(&mut self, firing: Firing, frame: &ClassifiedFrame) {
        match firing.kind {
            TriggerKind::PersonCount => {}
            TriggerKind::ProhibitedObject => {
                self.merge_prohibited(&frame.prohibited_labels);
            }
            TriggerKind::Movement => {
                self.moving_until = Some(firing.rearm_at);
            }
        }
        self.warning_count += 1;
    }

    /// Union `labels` into the ever-detected list. Returns how many were new.
    pub fn merge_prohibited(&mut self, labels: &[String]) -> usize {
        let mut added = 0;
        for label in labels {
            if !self.prohibited_objects.contains(label) {
                self.prohibited_objects.push(label.clone());
                added += 1;
            }
        }
        added
    }

    pub fn warning_count(&self) -> u64 {
        self.warning_count
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_moving_too_much(&self, now: Instant) -> bool {
        self.moving_until.is_some_and(|until| now < until)
    }

    pub fn snapshot(&self, now: Instant, detection_running: bool) -> Snapshot {
        Snapshot {
            person_count: self.person_count,
            prohibited_objects_ever_detected: self.prohibited_objects.clone(),
            is_moving_too_much: self.is_moving_too_much(now),
            warning_count: self.warning_count,
            last_error: self.last_error.clone(),
            detection_running,
            stats: self.stats,
        }
    }
}
