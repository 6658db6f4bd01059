//! Bind group layout shared by every grid program
//!
//! binding 0: source grid texture, binding 1: its sampler, binding 2:
//! [`TileUniforms`](super::tile_uniforms::TileUniforms).

use crate::gfx::double_buffer::{BufferSlot, DoubleBuffer};
use crate::gfx::resources::tile_uniforms::TileUniforms;
use crate::wgpu_utils::{binding_types, UniformBuffer};

pub fn grid_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            binding_types::fragment_entry(0, binding_types::texture_2d()),
            binding_types::fragment_entry(
                1,
                binding_types::sampler(wgpu::SamplerBindingType::Filtering),
            ),
            binding_types::fragment_entry(2, binding_types::uniform()),
        ],
    })
}

/// One bind group per buffer, indexed by [`BufferSlot::index`]
///
/// Each group samples the texture of its slot, so a draw selects its source
/// buffer by picking the group rather than rebinding textures.
pub fn grid_bind_groups(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffers: &DoubleBuffer,
    uniforms: &UniformBuffer<TileUniforms>,
    label: &str,
) -> [wgpu::BindGroup; 2] {
    [BufferSlot::A, BufferSlot::B].map(|slot| {
        let resource = buffers.resource(slot);
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} ({:?})", label, slot)),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&resource.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&resource.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.binding_resource(),
                },
            ],
        })
    })
}
