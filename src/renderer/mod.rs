//! WebGPU rendering module
//!
//! Frames are described as draw commands (`scene`), tessellated into
//! textured triangle batches (`shapes`) and drawn by a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{DrawCmd, Fill};
pub use shapes::{Batch, TextureSlot};
