//! Host-side transition rules
//!
//! Reference evaluators for the rules the WGSL transition programs
//! implement. They sample neighbours with the same clamp-to-edge policy as
//! the GPU sampler, so a host step and a GPU pass produce identical grids.

use super::pixel_grid::{CellPalette, PixelGrid, Rgba, OPAQUE_BLACK, OPAQUE_WHITE};

/// Offsets of the eight Moore neighbours
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Counts live Moore neighbours of `(x, y)` under clamp-to-edge addressing
///
/// Offsets falling outside the grid read the nearest edge cell, which at a
/// corner is often the cell itself.
pub fn live_neighbors(grid: &PixelGrid, x: u32, y: u32, palette: &CellPalette) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|(dx, dy)| palette.is_live(grid.sample_clamped(x as i64 + dx, y as i64 + dy)))
        .count() as u8
}

/// A per-cell state transition
pub trait CellRule {
    /// Next value of the cell at `(x, y)`
    fn next(&self, grid: &PixelGrid, x: u32, y: u32) -> Rgba;

    fn name(&self) -> &str;
}

/// Conway's B3/S23, matching `life.frag.wgsl`
#[derive(Debug, Clone, Copy)]
pub struct LifeRule {
    pub alive: Rgba,
    pub dead: Rgba,
}

impl LifeRule {
    pub fn with_palette(palette: CellPalette) -> Self {
        Self {
            alive: palette.alive,
            dead: palette.dead,
        }
    }

    pub fn palette(&self) -> CellPalette {
        CellPalette::new(self.alive, self.dead)
    }
}

impl Default for LifeRule {
    fn default() -> Self {
        Self {
            alive: OPAQUE_WHITE,
            dead: OPAQUE_BLACK,
        }
    }
}

impl CellRule for LifeRule {
    fn next(&self, grid: &PixelGrid, x: u32, y: u32) -> Rgba {
        let palette = self.palette();
        let neighbors = live_neighbors(grid, x, y, &palette);
        let alive = palette.is_live(grid.get_pixel(x, y));
        match (alive, neighbors) {
            (true, 2) | (true, 3) | (false, 3) => self.alive,
            _ => self.dead,
        }
    }

    fn name(&self) -> &str {
        "life"
    }
}

/// Turns off every cell with no live neighbours, leaves others unchanged
#[derive(Debug, Clone, Copy)]
pub struct IsolationRule {
    pub alive: Rgba,
    pub dead: Rgba,
}

impl IsolationRule {
    pub fn with_palette(palette: CellPalette) -> Self {
        Self {
            alive: palette.alive,
            dead: palette.dead,
        }
    }
}

impl Default for IsolationRule {
    fn default() -> Self {
        Self {
            alive: OPAQUE_WHITE,
            dead: OPAQUE_BLACK,
        }
    }
}

impl CellRule for IsolationRule {
    fn next(&self, grid: &PixelGrid, x: u32, y: u32) -> Rgba {
        let palette = CellPalette::new(self.alive, self.dead);
        if live_neighbors(grid, x, y, &palette) == 0 {
            self.dead
        } else {
            grid.get_pixel(x, y)
        }
    }

    fn name(&self) -> &str {
        "isolation"
    }
}

/// Evaluates one generation of `rule` over `source` into `target`
///
/// # Panics
/// Panics if the two grids differ in size.
pub fn step_into(source: &PixelGrid, target: &mut PixelGrid, rule: &dyn CellRule) {
    assert_eq!(
        source.dimensions(),
        target.dimensions(),
        "source and target grids must be the same size"
    );
    for y in 0..source.height() {
        for x in 0..source.width() {
            target.set_pixel(x, y, rule.next(source, x, y));
        }
    }
}

/// Evaluates one generation of `rule` over `grid`
pub fn step(grid: &PixelGrid, rule: &dyn CellRule) -> PixelGrid {
    let mut next = PixelGrid::new(grid.width(), grid.height());
    step_into(grid, &mut next, rule);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_reads_itself_outside_bounds() {
        let palette = CellPalette::default();
        let mut grid = PixelGrid::new(128, 128);
        assert_eq!(live_neighbors(&grid, 0, 0, &palette), 0);

        // (-1,-1), (0,-1) and (-1,0) all clamp back onto the corner
        grid.set_pixel(0, 0, OPAQUE_WHITE);
        assert_eq!(live_neighbors(&grid, 0, 0, &palette), 3);

        // (1,-1) clamps onto (1,0), so that edge cell is counted twice
        grid.set_pixel(1, 0, OPAQUE_WHITE);
        assert_eq!(live_neighbors(&grid, 0, 0, &palette), 5);

        grid.set_pixel(1, 1, OPAQUE_WHITE);
        assert_eq!(live_neighbors(&grid, 0, 0, &palette), 6);
    }

    #[test]
    fn test_far_corner_clamps_too() {
        let palette = CellPalette::default();
        let mut grid = PixelGrid::new(16, 16);
        grid.set_pixel(15, 15, OPAQUE_WHITE);
        assert_eq!(live_neighbors(&grid, 15, 15, &palette), 3);
        // A bottom edge cell only clamps its (0,-1) offset onto itself
        grid.set_pixel(8, 0, OPAQUE_WHITE);
        assert_eq!(live_neighbors(&grid, 8, 0, &palette), 1);
    }

    #[test]
    fn test_no_wraparound() {
        let palette = CellPalette::default();
        let mut grid = PixelGrid::new(8, 8);
        grid.set_pixel(7, 4, OPAQUE_WHITE);
        assert_eq!(live_neighbors(&grid, 0, 4, &palette), 0);
    }

    #[test]
    fn test_isolated_cell_turns_off() {
        let mut grid = PixelGrid::new(128, 128);
        grid.set_pixel(64, 64, OPAQUE_WHITE);
        let next = step(&grid, &IsolationRule::default());
        assert_eq!(next.live_count(), 0);
    }

    #[test]
    fn test_isolation_keeps_supported_cells() {
        let mut grid = PixelGrid::new(16, 16);
        grid.set_pixel(5, 5, OPAQUE_WHITE);
        grid.set_pixel(6, 5, OPAQUE_WHITE);
        let next = step(&grid, &IsolationRule::default());
        assert_eq!(next.get_pixel(5, 5), OPAQUE_WHITE);
        assert_eq!(next.get_pixel(6, 5), OPAQUE_WHITE);
        assert_eq!(next.live_count(), 2);
    }

    #[test]
    fn test_blinker_oscillates() {
        let rule = LifeRule::default();
        let mut grid = PixelGrid::new(16, 16);
        for y in 4..7 {
            grid.set_pixel(8, y, OPAQUE_WHITE);
        }
        let horizontal = step(&grid, &rule);
        assert_eq!(horizontal.live_count(), 3);
        for x in 7..10 {
            assert_eq!(horizontal.get_pixel(x, 5), OPAQUE_WHITE);
        }
        assert_eq!(step(&horizontal, &rule), grid);
    }

    #[test]
    fn test_block_is_still_life() {
        let rule = LifeRule::default();
        let mut grid = PixelGrid::new(8, 8);
        for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
            grid.set_pixel(x, y, OPAQUE_WHITE);
        }
        assert_eq!(step(&grid, &rule), grid);
    }

    #[test]
    fn test_custom_alive_colour_blinker_survives() {
        let green = [0, 255, 0, 255];
        let rule = LifeRule::with_palette(CellPalette::new(green, OPAQUE_BLACK));
        let mut grid = PixelGrid::new(16, 16);
        for y in 4..7 {
            grid.set_pixel(8, y, green);
        }

        let next = step(&grid, &rule);
        assert_eq!(rule.palette().count_live(&next), 3);
        for x in 7..10 {
            assert_eq!(next.get_pixel(x, 5), green);
        }
        assert_eq!(step(&next, &rule), grid);
    }

    #[test]
    fn test_isolation_uses_its_palette() {
        let palette = CellPalette::new([0, 0, 255, 255], [40, 40, 40, 255]);
        let mut grid = PixelGrid::filled(8, 8, palette.dead);
        grid.set_pixel(2, 2, palette.alive);
        grid.set_pixel(3, 2, palette.alive);
        grid.set_pixel(6, 6, palette.alive);

        let next = step(&grid, &IsolationRule::with_palette(palette));
        assert_eq!(next.get_pixel(2, 2), palette.alive);
        assert_eq!(next.get_pixel(3, 2), palette.alive);
        assert_eq!(next.get_pixel(6, 6), palette.dead);
        assert_eq!(palette.count_live(&next), 2);
    }
}
