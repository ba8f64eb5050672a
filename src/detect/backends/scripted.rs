use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::detect::backend::{DetectorBackend, ModelLoader};
use crate::detect::result::Detection;
use crate::frame::VideoFrame;

/// One scripted detector response.
///
/// In JSON a frame is either a list of detections or `{"error": "..."}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ScriptedFrame {
    Detections(Vec<Detection>),
    Failure { error: String },
}

/// Scripted backend for tests and demos. Replays a fixed sequence of
/// detector responses, wrapping around at the end, and ignores pixels.
pub struct ScriptedBackend {
    frames: Vec<ScriptedFrame>,
    cursor: usize,
}

impl ScriptedBackend {
    pub fn new(frames: Vec<ScriptedFrame>) -> Self {
        Self { frames, cursor: 0 }
    }

    /// Build from plain detection lists (no scripted failures).
    pub fn from_detections(frames: Vec<Vec<Detection>>) -> Self {
        Self::new(frames.into_iter().map(ScriptedFrame::Detections).collect())
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let frames: Vec<ScriptedFrame> =
            serde_json::from_str(raw).map_err(|e| anyhow!("invalid detection script: {}", e))?;
        Ok(Self::new(frames))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read detection script {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Number of responses handed out so far.
    pub fn calls(&self) -> usize {
        self.cursor
    }
}

impl DetectorBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self, _frame: &VideoFrame) -> Result<Vec<Detection>> {
        if self.frames.is_empty() {
            return Ok(Vec::new());
        }
        let frame = &self.frames[self.cursor % self.frames.len()];
        self.cursor += 1;
        match frame {
            ScriptedFrame::Detections(detections) => Ok(detections.clone()),
            ScriptedFrame::Failure { error } => Err(anyhow!("{}", error)),
        }
    }
}

impl ModelLoader for ScriptedBackend {
    fn load(self) -> Result<Box<dyn DetectorBackend>> {
        log::info!("loaded scripted detector ({} frames)", self.frames.len());
        Ok(Box::new(self))
    }
}
