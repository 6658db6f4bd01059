// src/simulation/mod.rs
//! Simulation system
//!
//! Host-side state and scheduling for the grid automaton: the pixel grid
//! mirror, the generation clock, pointer edits, reference rules and seed
//! patterns, plus the frame orchestration that drives a [`GridPipeline`].

pub mod clock;
pub mod edit;
pub mod host;
pub mod manager;
pub mod patterns;
pub mod pixel_grid;
pub mod rules;
pub mod traits;

pub use clock::{ClockState, SimulationClock};
pub use edit::{CellEdit, EditController, EditPolicy};
pub use host::HostPipeline;
pub use manager::{FrameReport, GridSimulation};
pub use patterns::Pattern;
pub use pixel_grid::{CellPalette, GridCoord, PixelGrid, Rgba};
pub use rules::{CellRule, IsolationRule, LifeRule};
pub use traits::GridPipeline;
