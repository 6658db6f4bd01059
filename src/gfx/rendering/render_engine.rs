//! WGPU-based rendering engine for the grid simulation
//!
//! Owns the device, the window surface and every GPU resource of the
//! simulation: the double buffer, the offscreen target following the pending
//! buffer, and the transition and render programs. Implements
//! [`GridPipeline`] so the frame loop can drive it like any other pipeline.

use std::sync::Arc;

use wgpu::TextureFormat;

use crate::config::SimulationConfig;
use crate::error::{GridError, Result};
use crate::gfx::double_buffer::{BufferSlot, DoubleBuffer};
use crate::gfx::offscreen::OffscreenTarget;
use crate::gfx::resources::{TextureReadback, TileUniforms};
use crate::gfx::shaders::ShaderLibrary;
use crate::simulation::pixel_grid::PixelGrid;
use crate::simulation::traits::GridPipeline;
use crate::wgpu_utils::UniformBuffer;

use super::present::RenderProgram;
use super::quad::FullscreenQuad;
use super::transition::TransitionProgram;

/// Surface texture acquired for the current frame
struct Frame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// Core rendering engine managing GPU resources and draw calls
///
/// A frame is recorded across several calls: [`render`](GridPipeline::render)
/// acquires the surface and records the grid pass, [`transition`](GridPipeline::transition)
/// records the next generation, and [`finish_frame`](Self::finish_frame)
/// adds the UI overlay, submits and presents.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,

    quad: FullscreenQuad,
    tile_uniforms: UniformBuffer<TileUniforms>,
    buffers: DoubleBuffer,
    offscreen: OffscreenTarget,
    transition_program: TransitionProgram,
    render_program: RenderProgram,

    readback: Option<TextureReadback>,

    frame: Option<Frame>,
    encoder: Option<wgpu::CommandEncoder>,
}

impl RenderEngine {
    /// Creates a render engine for the given window
    ///
    /// Initializes wgpu, allocates both grid textures with `initial` in the
    /// active one, and links the transition and render programs named by
    /// `config`.
    ///
    /// # Arguments
    /// * `window` - Window the presentation surface is created for
    /// * `config` - Grid, tile and surface sizes, colours and shader names
    /// * `initial` - First generation, uploaded into the active buffer
    ///
    /// # Returns
    /// An engine with a configured surface and both programs linked
    ///
    /// # Errors
    /// [`GridError::NoGraphicsContext`] when no adapter or device is
    /// available; resource, shader and link errors from setup otherwise.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        config: &SimulationConfig,
        initial: &PixelGrid,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|err| GridError::NoGraphicsContext(err.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| GridError::NoGraphicsContext(err.to_string()))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|err| GridError::NoGraphicsContext(err.to_string()))?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| {
                GridError::NoGraphicsContext("surface reports no supported formats".to_owned())
            })?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: config.surface_width,
            height: config.surface_height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let library = match &config.shader_dir {
            Some(dir) => ShaderLibrary::new().with_search_dir(dir),
            None => ShaderLibrary::new(),
        };

        let quad = FullscreenQuad::new(&device);
        let tile_uniforms =
            UniformBuffer::new_with_data(&device, &TileUniforms::from_config(config));
        let buffers = DoubleBuffer::new(&device, &queue, initial)?;
        let offscreen = OffscreenTarget::new(buffers.roles(), config.clear_color);

        let transition_program = TransitionProgram::new(
            &device,
            &library,
            &config.vertex_shader,
            &config.transition_shader,
            &buffers,
            &tile_uniforms,
            config.mirror_to_host,
        )?;
        let render_program = RenderProgram::new(
            &device,
            &library,
            &config.vertex_shader,
            &config.render_shader,
            &surface_config,
            &buffers,
            &tile_uniforms,
        )?;

        let readback = if config.mirror_to_host {
            let (width, height) = buffers.dimensions();
            Some(TextureReadback::new(&device, width, height)?)
        } else {
            None
        };

        log::info!(
            "Render engine ready: {} and {} on a {}x{} {:?} surface",
            transition_program.label(),
            render_program.label(),
            surface_config.width,
            surface_config.height,
            format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config: surface_config,
            format,
            quad,
            tile_uniforms,
            buffers,
            offscreen,
            transition_program,
            render_program,
            readback,
            frame: None,
            encoder: None,
        })
    }

    /// Returns the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns the wgpu command queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating the UI renderer.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn tile_uniforms(&self) -> TileUniforms {
        self.tile_uniforms.content()
    }

    /// Encoder for the frame being recorded, created on first use
    fn take_encoder(&mut self) -> wgpu::CommandEncoder {
        self.encoder.take().unwrap_or_else(|| {
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Grid Frame Encoder"),
                })
        })
    }

    /// Submits whatever has been recorded so far
    fn flush(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }

    /// Acquires the surface texture for this frame if not already held
    ///
    /// Returns `false` when the frame has to be skipped.
    fn acquire_frame(&mut self) -> Result<bool> {
        if self.frame.is_some() {
            return Ok(true);
        }

        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some(Frame { texture, view });
                Ok(true)
            }
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {}; reconfiguring and skipping frame", err);
                self.surface.configure(&self.device, &self.config);
                Ok(false)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture; skipping frame");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn read_back(&mut self, slot: BufferSlot) -> Result<PixelGrid> {
        if self.readback.is_none() {
            let (width, height) = self.buffers.dimensions();
            self.readback = Some(TextureReadback::new(&self.device, width, height)?);
        }
        self.flush();

        let readback = self
            .readback
            .as_ref()
            .ok_or_else(|| GridError::Readback("no staging buffer".to_owned()))?;
        readback.read(&self.device, &self.queue, self.buffers.texture(slot))
    }

    /// Records the UI overlay, submits the frame and presents it
    ///
    /// `overlay` draws on top of the grid pass with the surface view it is
    /// given. If the surface could not be acquired this frame, recorded
    /// simulation work is still submitted and the overlay is skipped.
    ///
    /// # Arguments
    /// * `overlay` - Callback recording extra passes onto the frame's surface view
    ///
    /// # Returns
    /// The overlay's result, after the frame has been presented
    pub fn finish_frame<F>(&mut self, overlay: F) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)
            -> Result<()>,
    {
        let Some(frame) = self.frame.take() else {
            self.flush();
            return Ok(());
        };

        let mut encoder = self.take_encoder();
        let result = overlay(&self.device, &self.queue, &mut encoder, &frame.view);

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.texture.present();
        result
    }
}

impl GridPipeline for RenderEngine {
    fn upload(&mut self, grid: &PixelGrid) -> Result<()> {
        self.buffers.upload(&self.queue, grid);
        Ok(())
    }

    fn download(&mut self) -> Result<PixelGrid> {
        self.read_back(self.buffers.active_slot())
    }

    fn render(&mut self) -> Result<()> {
        if !self.acquire_frame()? {
            return Ok(());
        }

        let mut encoder = self.take_encoder();
        if let Some(frame) = &self.frame {
            self.render_program
                .encode(&mut encoder, &frame.view, &self.buffers, &self.quad);
        }
        self.encoder = Some(encoder);
        Ok(())
    }

    fn transition(&mut self) -> Result<()> {
        let mut encoder = self.take_encoder();
        let encoded =
            self.transition_program
                .encode(&mut encoder, &self.buffers, &self.offscreen, &self.quad);
        self.encoder = Some(encoder);
        encoded
    }

    fn commit(&mut self) {
        self.buffers.commit();
        self.offscreen.retarget(self.buffers.roles());
    }

    fn active_slot(&self) -> BufferSlot {
        self.buffers.active_slot()
    }

    fn mirrors_to_host(&self) -> bool {
        self.transition_program.mirrors_to_host()
    }
}
