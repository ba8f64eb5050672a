use anyhow::Result;

use crate::detect::result::Detection;
use crate::frame::VideoFrame;

/// Detector backend trait.
///
/// Wraps the external object-detection model. The engine treats it as a
/// black box: one frame in, the list of labelled boxes out. A backend is
/// loaded once and then reused by every cycle of every session, so `detect`
/// must not depend on state from previous calls for correctness.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    ///
    /// An error here is non-fatal: the engine records it and tries again on
    /// the next cycle.
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<Detection>>;

    /// Optional warm-up hook, run once right after loading.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Produces a detector backend. Called once per engine, before any session.
pub trait ModelLoader {
    fn load(self) -> Result<Box<dyn DetectorBackend>>;
}

/// An already constructed backend loads as itself.
impl ModelLoader for Box<dyn DetectorBackend> {
    fn load(self) -> Result<Box<dyn DetectorBackend>> {
        Ok(self)
    }
}
