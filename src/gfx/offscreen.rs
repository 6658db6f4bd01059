//! Offscreen render target for the transition pass
//!
//! The target's colour attachment follows the pending buffer: it is
//! re-pointed after every commit and checked before every draw so the
//! transition pass never writes the texture it samples.

use crate::error::{GridError, Result};
use crate::gfx::double_buffer::{BufferRoles, BufferSlot, DoubleBuffer};

/// Render target bound to whichever buffer is pending
#[derive(Debug, Clone)]
pub struct OffscreenTarget {
    attached: BufferSlot,
    clear_color: wgpu::Color,
}

impl OffscreenTarget {
    pub fn new(roles: &BufferRoles, clear_color: wgpu::Color) -> Self {
        Self {
            attached: roles.pending(),
            clear_color,
        }
    }

    /// Re-points the attachment at the current pending buffer
    pub fn retarget(&mut self, roles: &BufferRoles) {
        self.attached = roles.pending();
    }

    pub fn attached(&self) -> BufferSlot {
        self.attached
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    /// Returns the attached slot, refusing if it is the active buffer
    pub fn check(&self, roles: &BufferRoles) -> Result<BufferSlot> {
        if self.attached == roles.active() {
            return Err(GridError::InvalidRenderTarget(self.attached));
        }
        Ok(self.attached)
    }

    /// View to render the transition output into
    pub fn attachment<'a>(&self, buffers: &'a DoubleBuffer) -> Result<&'a wgpu::TextureView> {
        let slot = self.check(buffers.roles())?;
        Ok(buffers.view(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_follows_pending_buffer() {
        let mut roles = BufferRoles::new();
        let mut target = OffscreenTarget::new(&roles, wgpu::Color::BLACK);
        for _ in 0..5 {
            assert_eq!(target.check(&roles).unwrap(), roles.pending());
            roles.commit();
            target.retarget(&roles);
        }
    }

    #[test]
    fn test_stale_target_is_rejected() {
        let mut roles = BufferRoles::new();
        let target = OffscreenTarget::new(&roles, wgpu::Color::BLACK);
        roles.commit();
        match target.check(&roles) {
            Err(GridError::InvalidRenderTarget(slot)) => assert_eq!(slot, roles.active()),
            other => panic!("expected InvalidRenderTarget, got {:?}", other),
        }
    }
}
