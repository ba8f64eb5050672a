//! Proctoring Signal Engine
//!
//! Turns a stream of webcam object detections into a small number of
//! discrete proctoring warnings for a video-interview client.
//!
//! # Architecture
//!
//! Each detection cycle flows:
//!
//! 1. **Frame loop** (`engine`): one cycle per host refresh (`schedule`),
//!    detector errors absorbed into `last_error`.
//! 2. **Detector adapter** (`detect`): external model behind `DetectorBackend`.
//! 3. **Classifier** (`classify`): person count, person anchor, prohibited labels.
//! 4. **Triggers** (`trigger`): person count, prohibited object, movement
//!    (`movement`), first match wins, 5 s cooldown each.
//! 5. **Aggregate state** (`state`): counters and flags read by the UI.
//!
//! # Module Structure
//!
//! - `config`: engine tuning, JSON file + `PROCTOR_*` environment
//! - `clock`: wall clock and manual clock for cooldowns
//! - `frame`: `VideoFrame`, `FrameSource`, synthetic source
//! - `error`: lifecycle errors and the observable `ErrorRecord`

pub mod classify;
pub mod clock;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod frame;
pub mod movement;
pub mod schedule;
pub mod state;
pub mod trigger;

pub use classify::{ClassifiedFrame, Classifier};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use detect::{
    BBox, Detection, DetectorBackend, ModelLoader, Point, ScriptedBackend, ScriptedFrame,
};
pub use engine::{CycleOutcome, ProctorEngine, SkipReason, StopHandle};
pub use error::{EngineError, ErrorKind, ErrorRecord};
pub use frame::{FrameSource, SyntheticSource, VideoFrame};
pub use movement::MovementEstimator;
pub use schedule::{FrameScheduler, RefreshScheduler, StepScheduler};
pub use state::{SessionStats, Snapshot};
pub use trigger::{TriggerKind, TriggerState};
