//! Seed patterns for the grid
//!
//! Patterns are placed relative to the visible region, since at the default
//! magnification only the bottom-left corner of the grid fits on screen.

use rand::Rng;

use super::pixel_grid::{PixelGrid, Rgba};

/// Classic Game of Life seeds
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Pattern {
    Clear,
    Glider,
    Blinker,
    GosperGun,
    /// Each cell alive with the given probability
    Random(f64),
}

const GLIDER: [(u32, u32); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

const GOSPER_GUN: [(u32, u32); 36] = [
    (24, 0),
    (22, 1),
    (24, 1),
    (12, 2),
    (13, 2),
    (20, 2),
    (21, 2),
    (34, 2),
    (35, 2),
    (11, 3),
    (15, 3),
    (20, 3),
    (21, 3),
    (34, 3),
    (35, 3),
    (0, 4),
    (1, 4),
    (10, 4),
    (16, 4),
    (20, 4),
    (21, 4),
    (0, 5),
    (1, 5),
    (10, 5),
    (14, 5),
    (16, 5),
    (17, 5),
    (22, 5),
    (24, 5),
    (10, 6),
    (16, 6),
    (24, 6),
    (11, 7),
    (15, 7),
    (12, 8),
    (13, 8),
];

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::Clear,
        Pattern::Glider,
        Pattern::Blinker,
        Pattern::GosperGun,
        Pattern::Random(0.3),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Clear => "Clear",
            Pattern::Glider => "Glider",
            Pattern::Blinker => "Blinker",
            Pattern::GosperGun => "Gosper Gun",
            Pattern::Random(_) => "Random",
        }
    }

    /// Parses a command-line pattern name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "clear" => Some(Pattern::Clear),
            "glider" => Some(Pattern::Glider),
            "blinker" => Some(Pattern::Blinker),
            "gosper" | "gosper-gun" | "gun" => Some(Pattern::GosperGun),
            "random" => Some(Pattern::Random(0.3)),
            _ => None,
        }
    }

    /// Builds a fresh grid seeded with this pattern
    ///
    /// `visible` is the number of grid cells covered by the surface; shapes
    /// are centred in that region when they fit, and clipped otherwise.
    pub fn build(
        &self,
        grid_size: (u32, u32),
        visible: (u32, u32),
        alive: Rgba,
        dead: Rgba,
    ) -> PixelGrid {
        self.build_with_rng(grid_size, visible, alive, dead, &mut rand::rng())
    }

    pub fn build_with_rng<R: Rng>(
        &self,
        grid_size: (u32, u32),
        visible: (u32, u32),
        alive: Rgba,
        dead: Rgba,
        rng: &mut R,
    ) -> PixelGrid {
        let mut grid = PixelGrid::filled(grid_size.0, grid_size.1, dead);
        let (cx, cy) = (visible.0 / 2, visible.1 / 2);

        match self {
            Pattern::Clear => {}
            Pattern::Glider => {
                // Shape rows run downwards; flip so it heads down-right on screen
                stamp(&mut grid, &GLIDER, cx.saturating_sub(1), cy + 1, true, alive);
            }
            Pattern::Blinker => {
                stamp(
                    &mut grid,
                    &[(0, 0), (0, 1), (0, 2)],
                    cx,
                    cy.saturating_sub(1),
                    false,
                    alive,
                );
            }
            Pattern::GosperGun => {
                stamp(&mut grid, &GOSPER_GUN, 1, visible.1.saturating_sub(2), true, alive);
            }
            Pattern::Random(density) => {
                let density = density.clamp(0.0, 1.0);
                for y in 0..visible.1.min(grid.height()) {
                    for x in 0..visible.0.min(grid.width()) {
                        if rng.random_bool(density) {
                            grid.set_pixel(x, y, alive);
                        }
                    }
                }
            }
        }

        grid
    }
}

/// Writes `cells` at `origin`, skipping any that fall outside the grid
fn stamp(
    grid: &mut PixelGrid,
    cells: &[(u32, u32)],
    origin_x: u32,
    origin_y: u32,
    flip_y: bool,
    alive: Rgba,
) {
    for &(dx, dy) in cells {
        let x = origin_x as i64 + dx as i64;
        let y = if flip_y {
            origin_y as i64 - dy as i64
        } else {
            origin_y as i64 + dy as i64
        };
        if grid.contains(x, y) {
            grid.set_pixel(x as u32, y as u32, alive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::pixel_grid::{OPAQUE_BLACK, OPAQUE_WHITE};
    use crate::simulation::rules::{step, LifeRule};
    use rand::{rngs::StdRng, SeedableRng};

    const GRID: (u32, u32) = (128, 128);
    const VISIBLE: (u32, u32) = (20, 15);

    #[test]
    fn test_clear_is_all_dead() {
        let grid = Pattern::Clear.build(GRID, VISIBLE, OPAQUE_WHITE, OPAQUE_BLACK);
        assert_eq!(grid.live_count(), 0);
        assert_eq!(grid.get_pixel(0, 0), OPAQUE_BLACK);
    }

    #[test]
    fn test_shapes_have_expected_cell_counts() {
        let count = |pattern: Pattern| {
            pattern
                .build(GRID, VISIBLE, OPAQUE_WHITE, OPAQUE_BLACK)
                .live_count()
        };
        assert_eq!(count(Pattern::Glider), 5);
        assert_eq!(count(Pattern::Blinker), 3);
        assert_eq!(count(Pattern::GosperGun), 36);
    }

    #[test]
    fn test_glider_lies_in_visible_region() {
        let grid = Pattern::Glider.build(GRID, VISIBLE, OPAQUE_WHITE, OPAQUE_BLACK);
        for y in 0..GRID.1 {
            for x in 0..GRID.0 {
                if grid.get_pixel(x, y) == OPAQUE_WHITE {
                    assert!(x < VISIBLE.0 && y < VISIBLE.1, "cell ({x}, {y}) off screen");
                }
            }
        }
    }

    #[test]
    fn test_glider_survives_four_generations() {
        let rule = LifeRule::default();
        let mut grid = Pattern::Glider.build(GRID, VISIBLE, OPAQUE_WHITE, OPAQUE_BLACK);
        for _ in 0..4 {
            grid = step(&grid, &rule);
        }
        assert_eq!(grid.live_count(), 5);
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let build = |seed| {
            Pattern::Random(0.5).build_with_rng(
                GRID,
                VISIBLE,
                OPAQUE_WHITE,
                OPAQUE_BLACK,
                &mut StdRng::seed_from_u64(seed),
            )
        };
        assert_eq!(build(7), build(7));
        let grid = build(7);
        assert!(grid.live_count() > 0);
        assert!(grid.live_count() <= (VISIBLE.0 * VISIBLE.1) as usize);
    }

    #[test]
    fn test_custom_colours() {
        let alive = [0, 255, 0, 255];
        let dead = [10, 10, 10, 255];
        let grid = Pattern::Blinker.build(GRID, VISIBLE, alive, dead);
        assert_eq!(grid.get_pixel(0, 0), dead);
        assert_eq!(grid.get_pixel(VISIBLE.0 / 2, VISIBLE.1 / 2), alive);
    }

    #[test]
    fn test_pattern_names() {
        assert_eq!(Pattern::from_name("Glider"), Some(Pattern::Glider));
        assert_eq!(Pattern::from_name("gun"), Some(Pattern::GosperGun));
        assert_eq!(Pattern::from_name("spaceship"), None);
    }
}
