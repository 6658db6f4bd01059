//! Double-buffered simulation state
//!
//! Two equally sized grid textures whose roles swap on every generation
//! commit. The textures themselves never move or get copied; only the
//! active/pending label does.

use crate::error::Result;
use crate::gfx::resources::texture_resource::TextureResource;
use crate::simulation::pixel_grid::PixelGrid;

/// Identity of one of the two buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    A,
    B,
}

impl BufferSlot {
    pub fn index(self) -> usize {
        match self {
            BufferSlot::A => 0,
            BufferSlot::B => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            BufferSlot::A => BufferSlot::B,
            BufferSlot::B => BufferSlot::A,
        }
    }
}

/// Active/pending labelling of a buffer pair
///
/// The active buffer is displayed and edited; the pending buffer receives
/// the next generation. They are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRoles {
    active: BufferSlot,
}

impl BufferRoles {
    pub fn new() -> Self {
        Self {
            active: BufferSlot::A,
        }
    }

    pub fn active(&self) -> BufferSlot {
        self.active
    }

    pub fn pending(&self) -> BufferSlot {
        self.active.other()
    }

    /// Promotes the pending buffer to active
    pub fn commit(&mut self) {
        self.active = self.active.other();
    }
}

impl Default for BufferRoles {
    fn default() -> Self {
        Self::new()
    }
}

/// The two GPU grid textures and their roles
pub struct DoubleBuffer {
    textures: [TextureResource; 2],
    roles: BufferRoles,
    width: u32,
    height: u32,
}

impl DoubleBuffer {
    /// Allocates both textures, uploads `initial` into the active one and
    /// clears the pending one to opaque black
    ///
    /// # Errors
    /// Fails with [`GridError::Resource`](crate::error::GridError::Resource)
    /// if either texture cannot be allocated.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, initial: &PixelGrid) -> Result<Self> {
        let (width, height) = initial.dimensions();
        let textures = [
            TextureResource::create_grid_texture(device, width, height, "Grid Buffer A")?,
            TextureResource::create_grid_texture(device, width, height, "Grid Buffer B")?,
        ];

        let buffers = Self {
            textures,
            roles: BufferRoles::new(),
            width,
            height,
        };
        buffers.upload(queue, initial);
        buffers.textures[buffers.pending_slot().index()]
            .write_rgba(queue, PixelGrid::new(width, height).as_bytes());

        log::info!("Allocated {}x{} grid double buffer", width, height);
        Ok(buffers)
    }

    /// Pushes `grid` into the active texture, leaving the pending one alone
    ///
    /// # Panics
    /// Panics if `grid` does not match the buffer dimensions.
    pub fn upload(&self, queue: &wgpu::Queue, grid: &PixelGrid) {
        assert_eq!(
            grid.dimensions(),
            (self.width, self.height),
            "uploaded grid does not match the double buffer size"
        );
        self.textures[self.active_slot().index()].write_rgba(queue, grid.as_bytes());
    }

    /// Swaps roles; no texture data moves
    pub fn commit(&mut self) {
        self.roles.commit();
    }

    pub fn roles(&self) -> &BufferRoles {
        &self.roles
    }

    pub fn active_slot(&self) -> BufferSlot {
        self.roles.active()
    }

    pub fn pending_slot(&self) -> BufferSlot {
        self.roles.pending()
    }

    pub fn resource(&self, slot: BufferSlot) -> &TextureResource {
        &self.textures[slot.index()]
    }

    pub fn view(&self, slot: BufferSlot) -> &wgpu::TextureView {
        &self.textures[slot.index()].view
    }

    pub fn texture(&self, slot: BufferSlot) -> &wgpu::Texture {
        &self.textures[slot.index()].texture
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::TextureReadback;
    use crate::simulation::pixel_grid::OPAQUE_WHITE;

    /// Device without a surface, or `None` on machines with no adapter
    fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Test Device"),
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..Default::default()
        }))
        .ok()
    }

    #[test]
    fn test_roles_start_with_a_active() {
        let roles = BufferRoles::new();
        assert_eq!(roles.active(), BufferSlot::A);
        assert_eq!(roles.pending(), BufferSlot::B);
    }

    #[test]
    fn test_active_and_pending_always_distinct() {
        let mut roles = BufferRoles::new();
        for _ in 0..17 {
            assert_ne!(roles.active(), roles.pending());
            roles.commit();
        }
        assert_ne!(roles.active(), roles.pending());
    }

    #[test]
    fn test_commit_twice_is_identity() {
        let mut roles = BufferRoles::new();
        roles.commit();
        let once = roles;
        roles.commit();
        roles.commit();
        assert_eq!(roles, once);
        roles.commit();
        assert_eq!(roles, BufferRoles::new());
    }

    #[test]
    fn test_commit_promotes_pending() {
        let mut roles = BufferRoles::new();
        let pending = roles.pending();
        let active = roles.active();
        roles.commit();
        assert_eq!(roles.active(), pending);
        assert_eq!(roles.pending(), active);
    }

    #[test]
    fn test_slot_indices() {
        assert_eq!(BufferSlot::A.index(), 0);
        assert_eq!(BufferSlot::B.index(), 1);
        assert_eq!(BufferSlot::A.other().other(), BufferSlot::A);
    }

    #[test]
    fn test_gpu_upload_touches_active_texture_only() {
        let Some((device, queue)) = headless_device() else {
            return;
        };

        // 13 columns leave padding at the end of every staged row
        let mut initial = PixelGrid::new(13, 7);
        initial.set_pixel(0, 0, [1, 2, 3, 255]);
        initial.set_pixel(12, 6, [200, 100, 50, 255]);
        initial.set_pixel(5, 3, OPAQUE_WHITE);

        let mut buffers = DoubleBuffer::new(&device, &queue, &initial).unwrap();
        let readback = TextureReadback::new(&device, 13, 7).unwrap();
        let read = |slot: BufferSlot, buffers: &DoubleBuffer| {
            readback.read(&device, &queue, buffers.texture(slot)).unwrap()
        };

        assert_eq!(read(buffers.active_slot(), &buffers), initial);
        let pending_before = read(buffers.pending_slot(), &buffers);
        assert_eq!(pending_before, PixelGrid::new(13, 7));

        let mut edited = initial.clone();
        edited.set_pixel(6, 3, [9, 9, 9, 255]);
        buffers.upload(&queue, &edited);
        assert_eq!(read(buffers.active_slot(), &buffers), edited);
        assert_eq!(read(buffers.pending_slot(), &buffers), pending_before);

        buffers.commit();
        assert_eq!(read(buffers.active_slot(), &buffers), pending_before);
        assert_eq!(read(buffers.pending_slot(), &buffers), edited);
    }
}
