//! Uniform block shared by the transition and render programs
//!
//! Field names follow the WGSL `TileUniforms` struct declared by every
//! fragment program.

use crate::config::SimulationConfig;
use crate::simulation::pixel_grid::Rgba;

fn unorm(color: Rgba) -> [f32; 4] {
    color.map(|channel| channel as f32 / 255.0)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileUniforms {
    /// Surface pixels per grid cell, horizontally
    pub u_tile_width: f32,
    /// Surface pixels per grid cell, vertically
    pub u_tile_height: f32,
    pub u_texture_width: f32,
    pub u_texture_height: f32,
    pub u_canvas_width: f32,
    pub u_canvas_height: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    /// Colour written for live cells; liveness is nearness to it
    pub u_alive_color: [f32; 4],
    pub u_dead_color: [f32; 4],
}

impl TileUniforms {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            u_tile_width: config.tile_width as f32,
            u_tile_height: config.tile_height as f32,
            u_texture_width: config.grid_width as f32,
            u_texture_height: config.grid_height as f32,
            u_canvas_width: config.surface_width as f32,
            u_canvas_height: config.surface_height as f32,
            _pad0: 0.0,
            _pad1: 0.0,
            u_alive_color: unorm(config.alive_color),
            u_dead_color: unorm(config.dead_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_four_vec4s() {
        assert_eq!(std::mem::size_of::<TileUniforms>(), 64);
        assert_eq!(std::mem::offset_of!(TileUniforms, u_alive_color), 32);
        assert_eq!(std::mem::offset_of!(TileUniforms, u_dead_color), 48);
    }

    #[test]
    fn test_values_follow_config() {
        let uniforms = TileUniforms::from_config(&SimulationConfig::default());
        assert_eq!(uniforms.u_tile_width, 32.0);
        assert_eq!(uniforms.u_tile_height, 32.0);
        assert_eq!(uniforms.u_texture_width, 128.0);
        assert_eq!(uniforms.u_canvas_width, 640.0);
        assert_eq!(uniforms.u_canvas_height, 480.0);
        assert_eq!(uniforms.u_alive_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniforms.u_dead_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_custom_colours_are_normalised() {
        let config = SimulationConfig::default().with_colors([0, 255, 0, 255], [0, 0, 51, 255]);
        let uniforms = TileUniforms::from_config(&config);
        assert_eq!(uniforms.u_alive_color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(uniforms.u_dead_color, [0.0, 0.0, 0.2, 1.0]);
    }
}
