//! Host-side mirror of one generation of simulation state
//!
//! A [`PixelGrid`] is a row-major RGBA8 image whose row 0 is the bottom row
//! of the grid as displayed. It is the layout uploaded to and read back from
//! the GPU textures byte for byte.

/// One RGBA8 cell value
pub type Rgba = [u8; 4];

pub const R: usize = 0;
pub const G: usize = 1;
pub const B: usize = 2;
pub const A: usize = 3;

/// Bytes per cell
pub const CHANNELS: usize = 4;

/// Opaque black, the initial value of every cell
pub const OPAQUE_BLACK: Rgba = [0, 0, 0, 255];
pub const OPAQUE_WHITE: Rgba = [255, 255, 255, 255];

/// Integer grid coordinate, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inverts the colour channels of `value`, keeping alpha
pub fn invert_rgb(value: Rgba) -> Rgba {
    [255 - value[R], 255 - value[G], 255 - value[B], value[A]]
}

/// Squared RGB distance between two cells, alpha ignored
fn rgb_distance(a: Rgba, b: Rgba) -> u32 {
    (R..A)
        .map(|c| {
            let d = a[c].abs_diff(b[c]) as u32;
            d * d
        })
        .sum()
}

/// Colours of live and dead cells
///
/// A cell is live when its RGB is strictly closer to `alive` than to `dead`.
/// The transition shaders apply the same test to the colours they receive in
/// `TileUniforms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPalette {
    pub alive: Rgba,
    pub dead: Rgba,
}

impl CellPalette {
    pub fn new(alive: Rgba, dead: Rgba) -> Self {
        Self { alive, dead }
    }

    pub fn is_live(&self, value: Rgba) -> bool {
        rgb_distance(value, self.alive) < rgb_distance(value, self.dead)
    }

    /// Number of live cells in `grid`
    pub fn count_live(&self, grid: &PixelGrid) -> usize {
        grid.pixels
            .chunks_exact(CHANNELS)
            .filter(|cell| self.is_live([cell[R], cell[G], cell[B], cell[A]]))
            .count()
    }
}

impl Default for CellPalette {
    fn default() -> Self {
        Self::new(OPAQUE_WHITE, OPAQUE_BLACK)
    }
}

/// Fixed-size 2-D array of RGBA8 cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Creates a grid filled with opaque black
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, OPAQUE_BLACK)
    }

    pub fn filled(width: u32, height: u32, value: Rgba) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        let pixels = value
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wraps raw RGBA8 bytes, e.g. from a texture readback
    ///
    /// # Panics
    /// Panics if `pixels` does not hold exactly `width * height` cells.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "pixel data does not match a {}x{} grid",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) is outside the {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        CHANNELS * (y as usize * self.width as usize + x as usize)
    }

    /// Reads one cell
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the grid.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.index(x, y);
        [
            self.pixels[idx + R],
            self.pixels[idx + G],
            self.pixels[idx + B],
            self.pixels[idx + A],
        ]
    }

    /// Writes one cell
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the grid.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: Rgba) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + CHANNELS].copy_from_slice(&value);
    }

    /// Reads a cell with clamp-to-edge addressing
    ///
    /// Matches the GPU sampler: out-of-range coordinates read the nearest
    /// edge cell instead of wrapping.
    pub fn sample_clamped(&self, x: i64, y: i64) -> Rgba {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get_pixel(cx, cy)
    }

    pub fn fill(&mut self, value: Rgba) {
        for cell in self.pixels.chunks_exact_mut(CHANNELS) {
            cell.copy_from_slice(&value);
        }
    }

    /// Live cells under the default white-on-black palette
    pub fn live_count(&self) -> usize {
        CellPalette::default().count_live(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_opaque_black() {
        let grid = PixelGrid::new(4, 3);
        assert_eq!(grid.as_bytes().len(), 4 * 3 * 4);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.get_pixel(x, y), OPAQUE_BLACK);
            }
        }
    }

    #[test]
    fn test_read_returns_written_value() {
        let mut grid = PixelGrid::new(128, 128);
        let samples = [
            (0, 0, [1, 2, 3, 4]),
            (127, 0, [255, 0, 0, 255]),
            (0, 127, [0, 0, 0, 0]),
            (127, 127, [10, 20, 30, 40]),
            (64, 17, [255, 255, 255, 255]),
        ];
        for (x, y, value) in samples {
            grid.set_pixel(x, y, value);
            assert_eq!(grid.get_pixel(x, y), value);
        }
        // Neighbouring cells untouched
        assert_eq!(grid.get_pixel(63, 17), OPAQUE_BLACK);
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = PixelGrid::new(3, 2);
        grid.set_pixel(1, 1, [9, 9, 9, 9]);
        let idx = 4 * (1 * 3 + 1);
        assert_eq!(&grid.as_bytes()[idx..idx + 4], &[9, 9, 9, 9]);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_range_write_panics() {
        let mut grid = PixelGrid::new(8, 8);
        grid.set_pixel(8, 0, OPAQUE_WHITE);
    }

    #[test]
    fn test_sample_clamped_reads_edge() {
        let mut grid = PixelGrid::new(4, 4);
        grid.set_pixel(0, 0, OPAQUE_WHITE);
        assert_eq!(grid.sample_clamped(-1, -1), OPAQUE_WHITE);
        assert_eq!(grid.sample_clamped(-1, 0), OPAQUE_WHITE);
        assert_eq!(grid.sample_clamped(0, -5), OPAQUE_WHITE);
        assert_eq!(grid.sample_clamped(4, 4), OPAQUE_BLACK);
    }

    #[test]
    fn test_invert_preserves_alpha() {
        assert_eq!(invert_rgb([0, 10, 255, 77]), [255, 245, 0, 77]);
        assert_eq!(invert_rgb(invert_rgb([3, 4, 5, 6])), [3, 4, 5, 6]);
    }

    #[test]
    fn test_live_count() {
        let mut grid = PixelGrid::new(5, 5);
        assert_eq!(grid.live_count(), 0);
        grid.set_pixel(2, 2, OPAQUE_WHITE);
        grid.set_pixel(4, 0, [200, 200, 200, 255]);
        grid.set_pixel(0, 4, [100, 100, 100, 255]);
        assert_eq!(grid.live_count(), 2);
        grid.fill(OPAQUE_WHITE);
        assert_eq!(grid.live_count(), 25);
    }

    #[test]
    fn test_palette_decides_by_nearest_colour() {
        let green = [0, 255, 0, 255];
        let palette = CellPalette::new(green, OPAQUE_BLACK);
        assert!(palette.is_live(green));
        assert!(palette.is_live(OPAQUE_WHITE));
        assert!(!palette.is_live(OPAQUE_BLACK));
        assert!(!palette.is_live(invert_rgb(green)));

        let mut grid = PixelGrid::new(4, 4);
        grid.set_pixel(1, 1, green);
        grid.set_pixel(2, 1, green);
        assert_eq!(palette.count_live(&grid), 2);
        // Pure green has no red, so the default palette sees it as dead too
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn test_palette_ignores_alpha() {
        let palette = CellPalette::default();
        assert!(palette.is_live([255, 255, 255, 0]));
        assert!(!palette.is_live([0, 0, 0, 0]));
    }
}
