//! Proctoring engine: frame loop + trigger evaluation.
//!
//! One engine owns the detector, the frame source, the three triggers, the
//! movement anchor and the aggregate state. Cycles run one at a time on the
//! caller's thread, so at most one detection call is ever in flight.
//! Detector failures stop at this boundary: they become `last_error` and
//! the loop carries on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::classify::{ClassifiedFrame, Classifier};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::detect::{Detection, DetectorBackend, ModelLoader};
use crate::error::{
    EngineError, ErrorKind, ErrorRecord, DETECTION_FAILED, MODEL_LOAD_FAILED, PRECONDITION_FAILED,
};
use crate::frame::FrameSource;
use crate::movement::MovementEstimator;
use crate::schedule::FrameScheduler;
use crate::state::{AggregateState, Snapshot};
use crate::trigger::{TriggerBank, TriggerKind};

const STATS_LOG_INTERVAL: u64 = 300;

enum ModelSlot {
    Pending,
    Ready(Box<dyn DetectorBackend>),
    Failed(String),
}

/// Why a cycle did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Stopped,
    ModelUnavailable,
    NoSource,
    NoFrame,
}

/// Result of one detection cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Skipped(SkipReason),
    /// The detector failed; recorded in `last_error`.
    Failed,
    /// Detections were classified; carries the trigger that fired, if any.
    Processed(Option<TriggerKind>),
}

/// Stops a running session from another thread (e.g. a Ctrl-C handler).
#[derive(Clone, Debug)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            log::info!("detection stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

pub struct ProctorEngine {
    clock: Arc<dyn Clock>,
    classifier: Classifier,
    model: ModelSlot,
    source: Option<Box<dyn FrameSource>>,
    triggers: TriggerBank,
    movement: MovementEstimator,
    state: AggregateState,
    running: StopHandle,
}

impl ProctorEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            classifier: Classifier::from_config(&config),
            triggers: TriggerBank::new(config.cooldown, config.movement_threshold_px),
            clock,
            model: ModelSlot::Pending,
            source: None,
            movement: MovementEstimator::new(),
            state: AggregateState::new(),
            running: StopHandle {
                running: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    // -------------------- Setup --------------------

    /// Load the detector. On failure the error is kept in `last_error` and
    /// every later `start()` fails with `ModelUnavailable`.
    pub fn load_model<L: ModelLoader>(&mut self, loader: L) -> Result<(), EngineError> {
        let loaded = loader.load().and_then(|mut backend| {
            backend.warm_up()?;
            Ok(backend)
        });

        match loaded {
            Ok(backend) => {
                log::info!("model loaded: {}", backend.name());
                self.model = ModelSlot::Ready(backend);
                Ok(())
            }
            Err(err) => {
                log::error!("error loading model: {:#}", err);
                let reason = format!("{:#}", err);
                self.state.record_error(ErrorRecord::new(
                    ErrorKind::ModelLoad,
                    MODEL_LOAD_FAILED,
                    Some(err),
                ));
                self.model = ModelSlot::Failed(reason.clone());
                Err(EngineError::ModelUnavailable(reason))
            }
        }
    }

    pub fn model_ready(&self) -> bool {
        matches!(self.model, ModelSlot::Ready(_))
    }

    pub fn attach_source(&mut self, source: Box<dyn FrameSource>) {
        let (width, height) = source.resolution();
        log::info!("frame source attached ({}x{})", width, height);
        self.source = Some(source);
    }

    // -------------------- Lifecycle --------------------

    /// Begin a session. No-op if one is already running.
    ///
    /// Cooldowns from earlier sessions keep running; the movement anchor
    /// starts fresh.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.is_running() {
            return Ok(());
        }

        if let ModelSlot::Failed(reason) = &self.model {
            return Err(EngineError::ModelUnavailable(reason.clone()));
        }
        if !self.model_ready() || self.source.is_none() {
            log::error!("{}", PRECONDITION_FAILED);
            self.state.record_error(ErrorRecord::new(
                ErrorKind::Precondition,
                PRECONDITION_FAILED,
                None,
            ));
            return Err(EngineError::Precondition(PRECONDITION_FAILED));
        }

        self.movement.clear();
        self.running.running.store(true, Ordering::SeqCst);
        log::info!("detection started");
        Ok(())
    }

    /// End the session. Idempotent; pending cooldowns are left alone.
    pub fn stop(&self) {
        self.running.stop();
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    /// Clear counters, cooldowns and the movement anchor.
    pub fn reset(&mut self) {
        self.state = AggregateState::new();
        self.triggers.reset();
        self.movement.clear();
    }

    // -------------------- Frame loop --------------------

    /// Run cycles until the session stops or the scheduler runs dry.
    /// Returns the number of cycles run.
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler) -> u64 {
        let mut cycles = 0u64;
        while self.is_running() && scheduler.schedule_next_cycle() {
            self.run_cycle();
            cycles += 1;
        }
        cycles
    }

    /// One detection cycle.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if !self.is_running() {
            return CycleOutcome::Skipped(SkipReason::Stopped);
        }
        let ModelSlot::Ready(detector) = &mut self.model else {
            return CycleOutcome::Skipped(SkipReason::ModelUnavailable);
        };
        let Some(source) = self.source.as_mut() else {
            return CycleOutcome::Skipped(SkipReason::NoSource);
        };
        let Some(frame) = source.current_frame() else {
            self.state.observe_skip();
            return CycleOutcome::Skipped(SkipReason::NoFrame);
        };

        match detector.detect(&frame) {
            Ok(detections) => {
                let fired = self.process_detections(&detections);
                self.log_stats();
                CycleOutcome::Processed(fired)
            }
            Err(err) => {
                log::warn!("error detecting objects on frame {}: {:#}", frame.sequence, err);
                self.state.observe_failure(ErrorRecord::new(
                    ErrorKind::Detection,
                    DETECTION_FAILED,
                    Some(err),
                ));
                CycleOutcome::Failed
            }
        }
    }

    /// Classify one frame's detections and evaluate the triggers.
    ///
    /// This is the body of a successful cycle; hosts that run the detector
    /// themselves can call it directly. Ignored while stopped.
    pub fn process_detections(&mut self, detections: &[Detection]) -> Option<TriggerKind> {
        if !self.is_running() {
            return None;
        }
        let now = self.clock.now();
        let frame = self.classifier.classify(detections);
        self.state.observe_frame(&frame);
        log::debug!(
            "frame: persons={} prohibited={:?}",
            frame.person_count,
            frame.prohibited_labels
        );

        // The anchor moves on every person frame, even when another trigger wins.
        let displacement = frame
            .first_person_anchor
            .and_then(|anchor| self.movement.update(anchor));

        let firing = self.triggers.evaluate(&frame, displacement, now)?;
        self.state.record_warning(firing, &frame);
        log_warning(firing.kind, &frame, displacement, self.state.warning_count());
        Some(firing.kind)
    }

    // -------------------- Observation --------------------

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.clock.now(), self.is_running())
    }

    pub fn is_trigger_armed(&self, kind: TriggerKind) -> bool {
        self.triggers.is_armed(kind, self.clock.now())
    }

    fn log_stats(&self) {
        let stats = self.state.stats();
        if stats.frames_processed % STATS_LOG_INTERVAL == 0 {
            log::info!(
                "frames: processed={} failed={} skipped={} warnings={}",
                stats.frames_processed,
                stats.frames_failed,
                stats.frames_skipped,
                self.state.warning_count()
            );
        }
    }
}

fn log_warning(
    kind: TriggerKind,
    frame: &ClassifiedFrame,
    displacement: Option<f32>,
    warning_count: u64,
) {
    match kind {
        TriggerKind::PersonCount => log::warn!(
            "warning #{}: {} person(s) in frame",
            warning_count,
            frame.person_count
        ),
        TriggerKind::ProhibitedObject => log::warn!(
            "warning #{}: prohibited object(s) {:?}",
            warning_count,
            frame.prohibited_labels
        ),
        TriggerKind::Movement => log::warn!(
            "warning #{}: moved {:.1}px",
            warning_count,
            displacement.unwrap_or_default()
        ),
    }
}
