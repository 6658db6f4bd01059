//! Render pass: magnifies the active buffer onto the window surface

use crate::error::Result;
use crate::gfx::double_buffer::DoubleBuffer;
use crate::gfx::resources::TileUniforms;
use crate::gfx::shaders::ShaderLibrary;
use crate::wgpu_utils::UniformBuffer;

use super::program::{GridProgram, ProgramConfig};
use super::quad::FullscreenQuad;

pub struct RenderProgram {
    program: GridProgram,
    surface_size: (u32, u32),
}

impl RenderProgram {
    pub fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        vertex_shader: &str,
        render_shader: &str,
        surface: &wgpu::SurfaceConfiguration,
        buffers: &DoubleBuffer,
        uniforms: &UniformBuffer<TileUniforms>,
    ) -> Result<Self> {
        let config = ProgramConfig::new("Render Program", vertex_shader, render_shader)
            .with_target_format(surface.format);
        let program = GridProgram::link(device, library, &config, buffers, uniforms)?;
        Ok(Self {
            program,
            surface_size: (surface.width, surface.height),
        })
    }

    pub fn label(&self) -> &str {
        self.program.label()
    }

    /// Records the pass drawing the active buffer into `view`
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        buffers: &DoubleBuffer,
        quad: &FullscreenQuad,
    ) {
        let (width, height) = self.surface_size;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Grid Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        self.program.draw(&mut pass, buffers.active_slot(), quad);
    }
}
