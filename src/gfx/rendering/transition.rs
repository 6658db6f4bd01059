//! Transition pass: one generation from the active buffer into the pending one

use crate::error::Result;
use crate::gfx::double_buffer::DoubleBuffer;
use crate::gfx::offscreen::OffscreenTarget;
use crate::gfx::resources::TileUniforms;
use crate::gfx::shaders::ShaderLibrary;
use crate::wgpu_utils::UniformBuffer;

use super::program::{GridProgram, ProgramConfig};
use super::quad::FullscreenQuad;

pub struct TransitionProgram {
    program: GridProgram,
    // Read each result back into host memory after the pass
    mirror_to_host: bool,
}

impl TransitionProgram {
    pub fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        vertex_shader: &str,
        rule_shader: &str,
        buffers: &DoubleBuffer,
        uniforms: &UniformBuffer<TileUniforms>,
        mirror_to_host: bool,
    ) -> Result<Self> {
        let config = ProgramConfig::new("Transition Program", vertex_shader, rule_shader);
        let program = GridProgram::link(device, library, &config, buffers, uniforms)?;
        Ok(Self {
            program,
            mirror_to_host,
        })
    }

    pub fn label(&self) -> &str {
        self.program.label()
    }

    pub fn mirrors_to_host(&self) -> bool {
        self.mirror_to_host
    }

    /// Records the pass into `encoder`
    ///
    /// The viewport is the grid itself, so each fragment is one cell. The
    /// target is cleared first, then fully overwritten by the quad.
    ///
    /// # Errors
    /// [`GridError::InvalidRenderTarget`](crate::error::GridError::InvalidRenderTarget)
    /// if the offscreen target is attached to the active buffer.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        buffers: &DoubleBuffer,
        target: &OffscreenTarget,
        quad: &FullscreenQuad,
    ) -> Result<()> {
        let view = target.attachment(buffers)?;
        let (width, height) = buffers.dimensions();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Transition Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(target.clear_color()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
        self.program.draw(&mut pass, buffers.active_slot(), quad);
        Ok(())
    }
}
