mod backend;
mod backends;
mod result;

pub use backend::{DetectorBackend, ModelLoader};
pub use backends::{ScriptedBackend, ScriptedFrame};
pub use result::{BBox, Detection, Point};
