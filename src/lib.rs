// src/lib.rs
//! Gridshade
//!
//! A double-buffered cellular automaton evaluated on the GPU with wgpu and
//! shown in a winit window. Each generation is computed by a fragment program
//! that samples the active buffer and writes the pending one; the two swap
//! roles on every commit.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod simulation;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GridshadeApp;
pub use config::SimulationConfig;
pub use error::{GridError, Result};
