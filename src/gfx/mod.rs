//! # Graphics Module
//!
//! GPU side of the grid simulation.
//!
//! - **Double buffer** ([`double_buffer`]) - the two grid textures and their roles
//! - **Offscreen target** ([`offscreen`]) - transition output following the pending buffer
//! - **Rendering** ([`rendering`]) - transition and render programs, frame recording
//! - **Resources** ([`resources`]) - textures, bind groups, uniforms and readback
//! - **Shaders** ([`shaders`]) - WGSL lookup by name and compilation
//!
//! The engine is normally created by [`GridshadeApp`](crate::GridshadeApp)
//! once the window exists.

pub mod double_buffer;
pub mod offscreen;
pub mod rendering;
pub mod resources;
pub mod shaders;

// Re-export commonly used types
pub use double_buffer::{BufferRoles, BufferSlot, DoubleBuffer};
pub use offscreen::OffscreenTarget;
pub use rendering::render_engine::RenderEngine;
