// src/config.rs
//! Simulation configuration
//!
//! All sizes are fixed for the lifetime of a simulation. Defaults are the
//! reference configuration: a 128x128 grid shown at 32x32 pixels per cell on
//! a 640x480 surface.

use std::path::PathBuf;

use crate::error::{GridError, Result};
use crate::simulation::edit::EditPolicy;
use crate::simulation::patterns::Pattern;
use crate::simulation::pixel_grid::{CellPalette, Rgba, OPAQUE_BLACK, OPAQUE_WHITE};

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    /// Surface pixels per cell, horizontally
    pub tile_width: u32,
    /// Surface pixels per cell, vertically
    pub tile_height: u32,
    pub surface_width: u32,
    pub surface_height: u32,
    /// Generations committed per second while running
    pub frames_per_second: f64,
    pub start_paused: bool,
    /// Read every transition result back into the host mirror
    pub mirror_to_host: bool,
    pub alive_color: Rgba,
    pub dead_color: Rgba,
    /// Colour the offscreen target is cleared to before each transition pass
    pub clear_color: wgpu::Color,
    pub edit_policy: EditPolicy,
    pub initial_pattern: Pattern,
    pub vertex_shader: String,
    pub transition_shader: String,
    pub render_shader: String,
    pub shader_dir: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_width: 128,
            grid_height: 128,
            tile_width: 32,
            tile_height: 32,
            surface_width: 640,
            surface_height: 480,
            frames_per_second: 10.0,
            start_paused: false,
            mirror_to_host: false,
            alive_color: OPAQUE_WHITE,
            dead_color: OPAQUE_BLACK,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.5,
                a: 1.0,
            },
            edit_policy: EditPolicy::InvertRgb,
            initial_pattern: Pattern::Glider,
            vertex_shader: "fullscreen.vert.wgsl".to_string(),
            transition_shader: "life.frag.wgsl".to_string(),
            render_shader: "render.frag.wgsl".to_string(),
            shader_dir: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_grid_size(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile_width = width;
        self.tile_height = height;
        self
    }

    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        self.surface_width = width;
        self.surface_height = height;
        self
    }

    pub fn with_frames_per_second(mut self, frames_per_second: f64) -> Self {
        self.frames_per_second = frames_per_second;
        self
    }

    pub fn with_start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    pub fn with_mirror_to_host(mut self, mirror: bool) -> Self {
        self.mirror_to_host = mirror;
        self
    }

    pub fn with_colors(mut self, alive: Rgba, dead: Rgba) -> Self {
        self.alive_color = alive;
        self.dead_color = dead;
        self
    }

    pub fn with_edit_policy(mut self, policy: EditPolicy) -> Self {
        self.edit_policy = policy;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.initial_pattern = pattern;
        self
    }

    pub fn with_transition_shader(mut self, name: &str) -> Self {
        self.transition_shader = name.to_owned();
        self
    }

    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    pub fn grid_size(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Live and dead colours shared by the seed patterns and the rules
    pub fn palette(&self) -> CellPalette {
        CellPalette::new(self.alive_color, self.dead_color)
    }

    /// Grid cells covered by the surface, clipped to the grid
    pub fn visible_cells(&self) -> (u32, u32) {
        (
            self.surface_width
                .div_ceil(self.tile_width.max(1))
                .min(self.grid_width),
            self.surface_height
                .div_ceil(self.tile_height.max(1))
                .min(self.grid_height),
        )
    }

    /// Rejects configurations no simulation can be built from
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("grid width", self.grid_width),
            ("grid height", self.grid_height),
            ("tile width", self.tile_width),
            ("tile height", self.tile_height),
            ("surface width", self.surface_width),
            ("surface height", self.surface_height),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(GridError::InvalidConfig(format!("{} must be non-zero", name)));
        }
        if !self.frames_per_second.is_finite() || self.frames_per_second <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "frames per second must be positive, got {}",
                self.frames_per_second
            )));
        }
        if self.alive_color[..3] == self.dead_color[..3] {
            return Err(GridError::InvalidConfig(
                "alive and dead colours must differ in RGB".to_owned(),
            ));
        }
        Ok(())
    }
}
