// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The fullscreen quad, the two grid programs and the engine that owns the
//! device and records each frame.

pub mod present;
pub mod program;
pub mod quad;
pub mod render_engine;
pub mod transition;

// Re-export main types
pub use present::RenderProgram;
pub use program::{GridProgram, ProgramConfig};
pub use quad::{FullscreenQuad, QuadVertex};
pub use render_engine::RenderEngine;
pub use transition::TransitionProgram;
