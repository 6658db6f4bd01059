//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the grid.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`ControlPanel`] - pause, step, rate, seed pattern and status
//!
//! While the UI wants the pointer, clicks are not turned into grid edits.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{ControlPanel, PanelStatus};
