use std::sync::Arc;
use thiserror::Error;

pub(crate) const MODEL_LOAD_FAILED: &str = "Error loading the detection model.";
pub(crate) const PRECONDITION_FAILED: &str = "Model or video reference is missing.";
pub(crate) const DETECTION_FAILED: &str = "Error detecting objects in the video frame.";

/// Lifecycle errors returned synchronously by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The detector failed to load; sessions cannot start.
    #[error("detection model unavailable: {0}")]
    ModelUnavailable(String),
    /// `start()` called without a loaded model or a frame source.
    #[error("cannot start detection: {0}")]
    Precondition(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ModelLoad,
    Detection,
    Precondition,
}

/// Most recent failure, as exposed to the UI. Overwritten by the next one.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    /// Underlying error, if any. Opaque to consumers.
    pub cause: Option<Arc<anyhow::Error>>,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, message: impl Into<String>, cause: Option<anyhow::Error>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: cause.map(Arc::new),
        }
    }

    /// Full cause chain, `"outer: inner"`.
    pub fn cause_chain(&self) -> Option<String> {
        self.cause.as_ref().map(|e| format!("{:#}", e))
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cause_chain() {
            Some(cause) => write!(f, "{} ({})", self.message, cause),
            None => f.write_str(&self.message),
        }
    }
}
