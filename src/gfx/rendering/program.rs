//! Program linking shared by the transition and render passes
//!
//! A program is a vertex/fragment shader pair linked into a render pipeline
//! against the grid bind group layout, plus one bind group per buffer slot.

use crate::error::{GridError, Result};
use crate::gfx::double_buffer::{BufferSlot, DoubleBuffer};
use crate::gfx::resources::{
    grid_bind_group_layout, grid_bind_groups, TextureResource, TileUniforms,
};
use crate::gfx::shaders::ShaderLibrary;
use crate::wgpu_utils::UniformBuffer;

use super::quad::{FullscreenQuad, QuadVertex};

/// Configuration for linking a grid program
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub label: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub target_format: wgpu::TextureFormat,
}

impl ProgramConfig {
    pub fn new(label: &str, vertex_shader: &str, fragment_shader: &str) -> Self {
        Self {
            label: label.to_owned(),
            vertex_shader: vertex_shader.to_owned(),
            fragment_shader: fragment_shader.to_owned(),
            target_format: TextureResource::GRID_FORMAT,
        }
    }

    /// Sets the colour attachment format (builder pattern)
    pub fn with_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = format;
        self
    }
}

/// A linked program with a bind group for each possible source buffer
pub struct GridProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    bind_groups: [wgpu::BindGroup; 2],
}

impl GridProgram {
    /// Compiles both shaders and links them
    ///
    /// # Errors
    /// Shader lookup and compile failures are returned as is; a pipeline the
    /// device rejects becomes [`GridError::ProgramLink`].
    pub fn link(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        config: &ProgramConfig,
        buffers: &DoubleBuffer,
        uniforms: &UniformBuffer<TileUniforms>,
    ) -> Result<Self> {
        let (vertex, fragment) =
            library.compile_pair(device, &config.vertex_shader, &config.fragment_shader)?;

        let layout = grid_bind_group_layout(device, &format!("{} Bind Group Layout", config.label));
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", config.label)),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex.module,
                entry_point: Some(vertex.entry_point()),
                buffers: &[QuadVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment.module,
                entry_point: Some(fragment.entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GridError::ProgramLink {
                program: config.label.clone(),
                log: err.to_string(),
            });
        }

        let bind_groups = grid_bind_groups(device, &layout, buffers, uniforms, &config.label);
        log::info!(
            "Linked program '{}' ({} + {})",
            config.label,
            vertex.name,
            fragment.name
        );

        Ok(Self {
            label: config.label.clone(),
            pipeline,
            bind_groups,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Draws the quad sampling `source`
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        source: BufferSlot,
        quad: &FullscreenQuad,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_groups[source.index()], &[]);
        quad.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_to_grid_format() {
        let config = ProgramConfig::new("Transition", "fullscreen.vert.wgsl", "life.frag.wgsl");
        assert_eq!(config.target_format, wgpu::TextureFormat::Rgba8Unorm);

        let config = config.with_target_format(wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(config.target_format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(config.fragment_shader, "life.frag.wgsl");
    }
}
