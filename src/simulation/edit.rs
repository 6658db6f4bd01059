//! Pointer-driven cell editing
//!
//! Converts surface-space pointer positions into grid cells and queues
//! read-modify-write edits. Edits are applied by
//! [`GridSimulation::tick`](super::manager::GridSimulation::tick) before the
//! frame is rendered, so they are visible without a generation commit.

use cgmath::Point2;

use super::pixel_grid::{invert_rgb, GridCoord, PixelGrid, Rgba};

/// How an edit derives the new value of a cell from its current value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// Invert R, G and B, keep alpha
    InvertRgb,
    /// Replace the cell with a fixed colour
    Paint(Rgba),
}

impl EditPolicy {
    pub fn resolve(&self, current: Rgba) -> Rgba {
        match self {
            EditPolicy::InvertRgb => invert_rgb(current),
            EditPolicy::Paint(value) => *value,
        }
    }
}

impl Default for EditPolicy {
    fn default() -> Self {
        EditPolicy::InvertRgb
    }
}

/// A queued edit against the active buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEdit {
    pub coord: GridCoord,
    pub policy: EditPolicy,
}

impl CellEdit {
    /// Applies the edit in place and returns the value written
    ///
    /// # Panics
    /// Panics if the coordinate is outside `grid`.
    pub fn apply(&self, grid: &mut PixelGrid) -> Rgba {
        let current = grid.get_pixel(self.coord.x, self.coord.y);
        let value = self.policy.resolve(current);
        grid.set_pixel(self.coord.x, self.coord.y, value);
        value
    }
}

/// Maps pointer input onto grid edits
#[derive(Debug, Clone)]
pub struct EditController {
    tile_width: u32,
    tile_height: u32,
    surface_height: u32,
    grid_width: u32,
    grid_height: u32,
    policy: EditPolicy,

    cursor: Option<Point2<f64>>,
    primary_down: bool,
    // Last cell touched by the current press, so a drag edits each cell once
    last_cell: Option<GridCoord>,
    pending: Vec<CellEdit>,
}

impl EditController {
    pub fn new(
        tile_size: (u32, u32),
        surface_height: u32,
        grid_size: (u32, u32),
        policy: EditPolicy,
    ) -> Self {
        assert!(tile_size.0 > 0 && tile_size.1 > 0, "tile size must be non-zero");
        Self {
            tile_width: tile_size.0,
            tile_height: tile_size.1,
            surface_height,
            grid_width: grid_size.0,
            grid_height: grid_size.1,
            policy,
            cursor: None,
            primary_down: false,
            last_cell: None,
            pending: Vec::new(),
        }
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: EditPolicy) {
        self.policy = policy;
    }

    /// Raw surface-to-grid mapping
    ///
    /// Flips y from the surface's top-left origin to the grid's bottom-left
    /// origin, then floors by the tile size. No clamping is done; the result
    /// may lie outside the grid.
    pub fn surface_to_grid(&self, position: Point2<f64>) -> (i64, i64) {
        let flipped_y = self.surface_height as f64 - position.y;
        let x = (position.x / self.tile_width as f64).floor() as i64;
        let y = (flipped_y / self.tile_height as f64).floor() as i64;
        (x, y)
    }

    /// Grid cell under `position`, or `None` when it falls outside the grid
    pub fn cell_at(&self, position: Point2<f64>) -> Option<GridCoord> {
        let (x, y) = self.surface_to_grid(position);
        if x < 0 || y < 0 || x >= self.grid_width as i64 || y >= self.grid_height as i64 {
            return None;
        }
        Some(GridCoord::new(x as u32, y as u32))
    }

    /// Records the latest pointer position; paints while the primary button is held
    pub fn pointer_moved(&mut self, position: Point2<f64>) {
        self.cursor = Some(position);
        if self.primary_down {
            self.edit_at(position);
        }
    }

    pub fn pointer_left(&mut self) {
        self.cursor = None;
        self.primary_down = false;
        self.last_cell = None;
    }

    /// Primary button press or release at the last known cursor position
    pub fn primary_button(&mut self, pressed: bool) {
        self.primary_down = pressed;
        self.last_cell = None;
        if pressed {
            if let Some(position) = self.cursor {
                self.edit_at(position);
            }
        }
    }

    /// A complete click at `position`
    pub fn click(&mut self, position: Point2<f64>) {
        self.cursor = Some(position);
        self.last_cell = None;
        self.edit_at(position);
    }

    /// Queues an edit of an explicit cell with an explicit colour
    pub fn paint(&mut self, coord: GridCoord, value: Rgba) {
        self.pending.push(CellEdit {
            coord,
            policy: EditPolicy::Paint(value),
        });
    }

    fn edit_at(&mut self, position: Point2<f64>) {
        let Some(coord) = self.cell_at(position) else {
            log::debug!(
                "Ignoring edit outside the grid at ({:.1}, {:.1})",
                position.x,
                position.y
            );
            return;
        };
        if self.last_cell == Some(coord) {
            return;
        }
        self.last_cell = Some(coord);
        log::debug!("Queued edit on cell ({}, {})", coord.x, coord.y);
        self.pending.push(CellEdit {
            coord,
            policy: self.policy,
        });
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes all queued edits in arrival order
    pub fn drain(&mut self) -> Vec<CellEdit> {
        std::mem::take(&mut self.pending)
    }
}
