//! Texture readback into host memory
//!
//! Copies a grid texture into a mappable staging buffer and unpacks the
//! padded rows into a [`PixelGrid`].

use crate::error::{GridError, Result};
use crate::simulation::pixel_grid::{PixelGrid, CHANNELS};

/// Reusable staging buffer sized for one grid texture
pub struct TextureReadback {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

/// Rounds a row up to the copy alignment wgpu requires
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * CHANNELS as u32;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

impl TextureReadback {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        let padded_bytes_per_row = padded_bytes_per_row(width);

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Grid Readback Buffer"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GridError::Resource {
                label: "Grid Readback Buffer".to_owned(),
                log: err.to_string(),
            });
        }

        Ok(Self {
            buffer,
            width,
            height,
            padded_bytes_per_row,
        })
    }

    /// Reads `texture` back to the host, blocking until the copy completes
    ///
    /// Work already submitted to `queue` is ordered before the copy, so any
    /// pass that wrote `texture` must be submitted first.
    pub fn read(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
    ) -> Result<PixelGrid> {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Grid Readback Encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = self.buffer.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        device
            .poll(wgpu::PollType::Wait)
            .map_err(|err| GridError::Readback(err.to_string()))?;

        pollster::block_on(receiver)
            .map_err(|_| GridError::Readback("map callback was dropped".to_owned()))?
            .map_err(|err| GridError::Readback(err.to_string()))?;

        let row_bytes = self.width as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data
                .chunks(self.padded_bytes_per_row as usize)
                .take(self.height as usize)
            {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        self.buffer.unmap();

        Ok(PixelGrid::from_rgba(self.width, self.height, pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(128), 512);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(10), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }
}
