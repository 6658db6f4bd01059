//! Pipeline seam between the frame loop and the buffers it drives
//!
//! [`GridSimulation`](super::manager::GridSimulation) sequences one frame as
//! edits, render, transition, then the commit decision. Anything that owns a
//! buffer pair and can run those passes implements [`GridPipeline`]: the GPU
//! [`RenderEngine`](crate::gfx::rendering::render_engine::RenderEngine) and
//! the host-memory [`HostPipeline`](super::host::HostPipeline).

use crate::error::Result;
use crate::gfx::double_buffer::BufferSlot;

use super::pixel_grid::PixelGrid;

pub trait GridPipeline {
    /// Pushes `grid` into the active buffer without touching the pending one
    fn upload(&mut self, grid: &PixelGrid) -> Result<()>;

    /// Regenerates a host copy of the active buffer
    fn download(&mut self) -> Result<PixelGrid>;

    /// Draws the active buffer to the presented surface
    fn render(&mut self) -> Result<()>;

    /// Evaluates one generation from the active buffer into the pending one
    ///
    /// Nothing is read back here. A pipeline that
    /// [mirrors to the host](Self::mirrors_to_host) is downloaded by the frame
    /// loop after a commit, once per generation.
    fn transition(&mut self) -> Result<()>;

    /// Promotes the pending buffer to active and re-points the offscreen target
    fn commit(&mut self);

    fn active_slot(&self) -> BufferSlot;

    fn mirrors_to_host(&self) -> bool;
}
