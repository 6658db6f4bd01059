//! Frame orchestration for the grid simulation
//!
//! Owns the clock, the edit queue and the host mirror, and drives a
//! [`GridPipeline`] through one frame at a time.

use crate::config::SimulationConfig;
use crate::error::Result;

use super::clock::SimulationClock;
use super::edit::EditController;
use super::pixel_grid::{CellPalette, PixelGrid};
use super::traits::GridPipeline;

/// What a single [`GridSimulation::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub edits_applied: usize,
    pub committed: bool,
    pub generation: u64,
}

pub struct GridSimulation {
    clock: SimulationClock,
    editor: EditController,
    // Host copy of the active buffer; `None` when it must be downloaded
    mirror: Option<PixelGrid>,
    palette: CellPalette,
    generation: u64,
}

impl GridSimulation {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut clock = SimulationClock::new(config.frames_per_second);
        if config.start_paused {
            clock.pause();
        }
        let editor = EditController::new(
            config.tile_size(),
            config.surface_height,
            config.grid_size(),
            config.edit_policy,
        );

        Self {
            clock,
            editor,
            mirror: None,
            palette: config.palette(),
            generation: 0,
        }
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditController {
        &mut self.editor
    }

    pub fn palette(&self) -> CellPalette {
        self.palette
    }

    /// Generations committed since the last seed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Host mirror if it is currently up to date
    pub fn mirror(&self) -> Option<&PixelGrid> {
        self.mirror.as_ref()
    }

    /// Replaces the active generation with `grid` and resets the count
    pub fn seed(&mut self, pipeline: &mut dyn GridPipeline, grid: PixelGrid) -> Result<()> {
        pipeline.upload(&grid)?;
        log::info!(
            "Seeded {}x{} grid with {} live cells",
            grid.width(),
            grid.height(),
            self.palette.count_live(&grid)
        );
        self.mirror = Some(grid);
        self.generation = 0;
        Ok(())
    }

    /// Host view of the active generation, downloading it if the mirror is stale
    pub fn host_view(&mut self, pipeline: &mut dyn GridPipeline) -> Result<&PixelGrid> {
        let grid = match self.mirror.take() {
            Some(grid) => grid,
            None => pipeline.download()?,
        };
        let grid: &PixelGrid = self.mirror.insert(grid);
        Ok(grid)
    }

    /// Runs one animation frame
    ///
    /// In order: queued edits are written into the active buffer, the active
    /// buffer is rendered, the next generation is evaluated into the pending
    /// buffer, and the clock decides whether to promote it. A pipeline that
    /// mirrors to the host is read back only on frames that commit.
    /// `timestamp_ms` is a monotonic time in milliseconds.
    pub fn tick(
        &mut self,
        pipeline: &mut dyn GridPipeline,
        timestamp_ms: f64,
    ) -> Result<FrameReport> {
        let edits = self.editor.drain();
        if !edits.is_empty() {
            let mut grid = match self.mirror.take() {
                Some(grid) => grid,
                None => pipeline.download()?,
            };
            for edit in &edits {
                edit.apply(&mut grid);
            }
            pipeline.upload(&grid)?;
            self.mirror = Some(grid);
        }

        pipeline.render()?;
        pipeline.transition()?;

        let committed = self.clock.tick(timestamp_ms);
        if committed {
            pipeline.commit();
            self.generation += 1;
            self.mirror = if pipeline.mirrors_to_host() {
                Some(pipeline.download()?)
            } else {
                None
            };
            log::trace!(
                "Committed generation {} into {:?}",
                self.generation,
                pipeline.active_slot()
            );
        }

        Ok(FrameReport {
            edits_applied: edits.len(),
            committed,
            generation: self.generation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::double_buffer::BufferSlot;
    use crate::simulation::host::HostPipeline;
    use crate::simulation::patterns::Pattern;
    use crate::simulation::pixel_grid::{GridCoord, OPAQUE_BLACK, OPAQUE_WHITE};
    use crate::simulation::rules::{IsolationRule, LifeRule};
    use cgmath::Point2;

    fn isolation(mirror: bool) -> HostPipeline {
        HostPipeline::new(128, 128, Box::new(IsolationRule::default()), mirror)
    }

    fn single_cell() -> PixelGrid {
        let mut grid = PixelGrid::filled(128, 128, OPAQUE_BLACK);
        grid.set_pixel(64, 64, OPAQUE_WHITE);
        grid
    }

    #[test]
    fn test_isolated_cell_dies_after_one_generation() {
        let mut pipeline = isolation(false);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();

        let first = sim.tick(&mut pipeline, 0.0).unwrap();
        assert!(!first.committed);
        assert_eq!(sim.host_view(&mut pipeline).unwrap().get_pixel(64, 64), OPAQUE_WHITE);

        let second = sim.tick(&mut pipeline, 1000.0).unwrap();
        assert!(second.committed);
        assert_eq!(second.generation, 1);

        let view = sim.host_view(&mut pipeline).unwrap();
        assert_eq!(view.live_count(), 0);
        assert_eq!(view.get_pixel(64, 64), OPAQUE_BLACK);
    }

    #[test]
    fn test_edit_shows_before_commit() {
        let config = SimulationConfig::default().with_start_paused(true);
        let mut pipeline = isolation(false);
        let mut sim = GridSimulation::new(&config);
        sim.seed(&mut pipeline, PixelGrid::filled(128, 128, OPAQUE_BLACK))
            .unwrap();

        // Surface (16, 16) lands on cell (0, 14) once y is flipped
        sim.editor_mut().click(Point2::new(16.0, 16.0));
        let report = sim.tick(&mut pipeline, 0.0).unwrap();

        assert_eq!(report.edits_applied, 1);
        assert!(!report.committed);
        assert_eq!(pipeline.last_rendered(), Some(BufferSlot::A));
        assert_eq!(pipeline.grid(BufferSlot::A).get_pixel(0, 14), OPAQUE_WHITE);
        assert_eq!(sim.mirror().unwrap().get_pixel(0, 14), OPAQUE_WHITE);
    }

    #[test]
    fn test_edit_without_mirror_downloads_first() {
        let mut pipeline = isolation(false);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();
        sim.tick(&mut pipeline, 0.0).unwrap();
        sim.tick(&mut pipeline, 500.0).unwrap();
        assert!(sim.mirror().is_none());

        sim.editor_mut().paint(GridCoord::new(3, 3), OPAQUE_WHITE);
        sim.tick(&mut pipeline, 510.0).unwrap();

        let view = sim.host_view(&mut pipeline).unwrap();
        assert_eq!(view.get_pixel(3, 3), OPAQUE_WHITE);
        assert_eq!(view.get_pixel(64, 64), OPAQUE_BLACK);
    }

    #[test]
    fn test_render_always_shows_active_buffer() {
        let mut pipeline = isolation(false);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();

        for frame in 0..6 {
            let before = pipeline.active_slot();
            let report = sim.tick(&mut pipeline, frame as f64 * 150.0).unwrap();
            assert_eq!(pipeline.last_rendered(), Some(before));
            assert_eq!(report.committed, pipeline.active_slot() != before);
        }
    }

    #[test]
    fn test_mirror_mode_keeps_mirror_current() {
        let mut pipeline = isolation(true);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();

        sim.tick(&mut pipeline, 0.0).unwrap();
        sim.tick(&mut pipeline, 200.0).unwrap();

        let mirror = sim.mirror().expect("mirror kept after commit");
        assert_eq!(mirror.live_count(), 0);
        assert_eq!(pipeline.grid(pipeline.active_slot()), mirror);
    }

    #[test]
    fn test_paused_clock_commits_only_on_step() {
        let config = SimulationConfig::default().with_start_paused(true);
        let mut pipeline = HostPipeline::new(8, 8, Box::new(LifeRule::default()), false);
        let mut sim = GridSimulation::new(&config);
        sim.seed(&mut pipeline, PixelGrid::new(8, 8)).unwrap();

        assert!(!sim.tick(&mut pipeline, 0.0).unwrap().committed);
        assert!(!sim.tick(&mut pipeline, 5000.0).unwrap().committed);

        assert!(sim.clock_mut().step());
        let stepped = sim.tick(&mut pipeline, 5016.0).unwrap();
        assert!(stepped.committed);
        assert_eq!(stepped.generation, 1);
        assert!(!sim.tick(&mut pipeline, 9000.0).unwrap().committed);
    }

    #[test]
    fn test_seed_resets_generation() {
        let mut pipeline = isolation(false);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();
        sim.tick(&mut pipeline, 0.0).unwrap();
        sim.tick(&mut pipeline, 1000.0).unwrap();
        assert_eq!(sim.generation(), 1);

        sim.seed(&mut pipeline, single_cell()).unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(pipeline.grid(pipeline.active_slot()).get_pixel(64, 64), OPAQUE_WHITE);
    }

    #[test]
    fn test_mirror_reads_back_once_per_generation() {
        let mut pipeline = isolation(true);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();

        // 16ms frames against a 100ms generation: one commit at 112ms
        let commits = (0..=12)
            .map(|frame| sim.tick(&mut pipeline, frame as f64 * 16.0).unwrap())
            .filter(|report| report.committed)
            .count();
        assert_eq!(commits, 1);
        assert_eq!(pipeline.readbacks(), 1);

        sim.clock_mut().pause();
        for frame in 13..40 {
            assert!(!sim.tick(&mut pipeline, frame as f64 * 16.0).unwrap().committed);
        }
        assert_eq!(pipeline.readbacks(), 1);

        assert!(sim.clock_mut().step());
        assert!(sim.tick(&mut pipeline, 700.0).unwrap().committed);
        assert_eq!(pipeline.readbacks(), 2);
        assert_eq!(sim.mirror(), Some(pipeline.grid(pipeline.active_slot())));
    }

    #[test]
    fn test_without_mirror_frames_never_read_back() {
        let mut pipeline = isolation(false);
        let mut sim = GridSimulation::new(&SimulationConfig::default());
        sim.seed(&mut pipeline, single_cell()).unwrap();
        for frame in 0..30 {
            sim.tick(&mut pipeline, frame as f64 * 16.0).unwrap();
        }
        assert!(sim.generation() > 0);
        assert_eq!(pipeline.readbacks(), 0);
    }

    #[test]
    fn test_custom_colours_survive_the_first_generation() {
        let green = [0, 255, 0, 255];
        let config = SimulationConfig::default().with_colors(green, OPAQUE_BLACK);
        let seed = Pattern::Blinker.build(
            config.grid_size(),
            config.visible_cells(),
            config.alive_color,
            config.dead_color,
        );
        let mut pipeline = HostPipeline::new(
            128,
            128,
            Box::new(LifeRule::with_palette(config.palette())),
            true,
        );
        let mut sim = GridSimulation::new(&config);
        sim.seed(&mut pipeline, seed).unwrap();

        sim.tick(&mut pipeline, 0.0).unwrap();
        assert!(sim.tick(&mut pipeline, 200.0).unwrap().committed);

        let view = sim.host_view(&mut pipeline).unwrap();
        assert_eq!(config.palette().count_live(view), 3);
        assert_eq!(view.get_pixel(10, 7), green);
    }
}
