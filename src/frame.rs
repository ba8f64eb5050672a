//! Video frames and the sources that supply them.
//!
//! - `VideoFrame`: one captured frame handed to the detector. Not retained
//!   by the engine after the cycle that used it.
//! - `FrameSource`: whatever the host renders from (webcam element, capture
//!   device). "No frame available" is a normal answer, not an error.
//! - `SyntheticSource`: blank frames at a fixed size, for tests and demos.

// ----------------------------------------------------------------------------
// VideoFrame
// ----------------------------------------------------------------------------

pub struct VideoFrame {
    data: Vec<u8>,

    pub width: u32,
    pub height: u32,

    /// Position of this frame in its source's stream.
    pub sequence: u64,
}

impl VideoFrame {
    /// Wrap packed RGB pixel data.
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            sequence,
        }
    }

    /// All-black RGB frame.
    pub fn blank(width: u32, height: u32, sequence: u64) -> Self {
        let len = width as usize * height as usize * 3;
        Self::new(vec![0u8; len], width, height, sequence)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for VideoFrame {
    // Pixel bytes omitted.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// FrameSource
// ----------------------------------------------------------------------------

/// Source of the frame currently on screen.
pub trait FrameSource: Send {
    /// The frame available right now, or `None` if the source has nothing
    /// to show yet (stream not started, device between frames).
    fn current_frame(&mut self) -> Option<VideoFrame>;

    /// Resolution of produced frames.
    fn resolution(&self) -> (u32, u32);
}

/// Synthetic frame source. Always has a frame, unless a frame limit was set
/// and has been reached.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frames_emitted: u64,
    frame_limit: Option<u64>,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        log::info!("SyntheticSource: {}x{}", width, height);
        Self {
            width,
            height,
            frames_emitted: 0,
            frame_limit: None,
        }
    }

    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }
}

impl FrameSource for SyntheticSource {
    fn current_frame(&mut self) -> Option<VideoFrame> {
        if let Some(limit) = self.frame_limit {
            if self.frames_emitted >= limit {
                return None;
            }
        }
        let frame = VideoFrame::blank(self.width, self.height, self.frames_emitted);
        self.frames_emitted += 1;
        Some(frame)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_source_stops_at_limit() {
        let mut source = SyntheticSource::new(8, 6).with_frame_limit(2);
        let first = source.current_frame().expect("frame 0");
        assert_eq!(first.pixels().len(), 8 * 6 * 3);
        assert_eq!(first.sequence, 0);
        assert_eq!(source.current_frame().expect("frame 1").sequence, 1);
        assert!(source.current_frame().is_none());
        assert_eq!(source.frames_emitted(), 2);
    }
}
