// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Grid textures, their bind groups, the tile uniform block and the
//! staging buffer used to read textures back to the host.

pub mod grid_bindings;
pub mod readback;
pub mod texture_resource;
pub mod tile_uniforms;

// Re-export main types
pub use grid_bindings::{grid_bind_group_layout, grid_bind_groups};
pub use readback::TextureReadback;
pub use texture_resource::TextureResource;
pub use tile_uniforms::TileUniforms;
