//! Host-memory pipeline
//!
//! Runs the same double-buffer protocol as the GPU engine on two
//! [`PixelGrid`]s, evaluating a [`CellRule`] in place of the fragment
//! program. Used for headless runs and tests.

use crate::error::Result;
use crate::gfx::double_buffer::{BufferRoles, BufferSlot};
use crate::gfx::offscreen::OffscreenTarget;

use super::pixel_grid::PixelGrid;
use super::rules::{self, CellRule};
use super::traits::GridPipeline;

pub struct HostPipeline {
    grids: [PixelGrid; 2],
    roles: BufferRoles,
    target: OffscreenTarget,
    rule: Box<dyn CellRule>,
    mirror_to_host: bool,

    frames_rendered: u64,
    last_rendered: Option<BufferSlot>,
    uploads: u64,
    readbacks: u64,
}

impl HostPipeline {
    pub fn new(width: u32, height: u32, rule: Box<dyn CellRule>, mirror_to_host: bool) -> Self {
        let roles = BufferRoles::new();
        Self {
            grids: [PixelGrid::new(width, height), PixelGrid::new(width, height)],
            roles,
            target: OffscreenTarget::new(&roles, wgpu::Color::BLACK),
            rule,
            mirror_to_host,
            frames_rendered: 0,
            last_rendered: None,
            uploads: 0,
            readbacks: 0,
        }
    }

    pub fn rule_name(&self) -> &str {
        self.rule.name()
    }

    pub fn grid(&self, slot: BufferSlot) -> &PixelGrid {
        &self.grids[slot.index()]
    }

    pub fn pending_slot(&self) -> BufferSlot {
        self.roles.pending()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Buffer shown by the most recent render
    pub fn last_rendered(&self) -> Option<BufferSlot> {
        self.last_rendered
    }

    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Host copies made through [`download`](GridPipeline::download)
    pub fn readbacks(&self) -> u64 {
        self.readbacks
    }
}

impl GridPipeline for HostPipeline {
    fn upload(&mut self, grid: &PixelGrid) -> Result<()> {
        let active = &mut self.grids[self.roles.active().index()];
        assert_eq!(
            grid.dimensions(),
            active.dimensions(),
            "uploaded grid does not match the buffer size"
        );
        active.clone_from(grid);
        self.uploads += 1;
        Ok(())
    }

    fn download(&mut self) -> Result<PixelGrid> {
        self.readbacks += 1;
        Ok(self.grids[self.roles.active().index()].clone())
    }

    fn render(&mut self) -> Result<()> {
        self.frames_rendered += 1;
        self.last_rendered = Some(self.roles.active());
        Ok(())
    }

    fn transition(&mut self) -> Result<()> {
        let target = self.target.check(&self.roles)?;
        let [a, b] = &mut self.grids;
        let (source, output) = match target {
            BufferSlot::A => (&*b, a),
            BufferSlot::B => (&*a, b),
        };
        rules::step_into(source, output, self.rule.as_ref());
        Ok(())
    }

    fn commit(&mut self) {
        self.roles.commit();
        self.target.retarget(&self.roles);
    }

    fn active_slot(&self) -> BufferSlot {
        self.roles.active()
    }

    fn mirrors_to_host(&self) -> bool {
        self.mirror_to_host
    }
}
