// src/ui/panel.rs
//! Simulation control panel
//!
//! Pause/step buttons, the generation rate field, seed patterns, the edit
//! mode and a status readout of the buffer roles.

use crate::gfx::double_buffer::BufferSlot;
use crate::simulation::clock::ClockState;
use crate::simulation::edit::EditPolicy;
use crate::simulation::manager::GridSimulation;
use crate::simulation::patterns::Pattern;

/// Pipeline facts shown in the status section
#[derive(Debug, Clone, Copy)]
pub struct PanelStatus {
    pub active_slot: BufferSlot,
    pub mirror_to_host: bool,
}

/// Persistent state of the control panel between frames
#[derive(Debug, Clone)]
pub struct ControlPanel {
    fps_text: String,
    selected_pattern: Pattern,
    reseed: Option<Pattern>,
}

impl ControlPanel {
    pub fn new(frames_per_second: f64, pattern: Pattern) -> Self {
        Self {
            fps_text: format_rate(frames_per_second),
            selected_pattern: pattern,
            reseed: None,
        }
    }

    /// Pattern the user asked to reseed with since the last call
    pub fn take_reseed(&mut self) -> Option<Pattern> {
        self.reseed.take()
    }

    pub fn selected_pattern(&self) -> Pattern {
        self.selected_pattern
    }

    /// Builds the panel for this frame
    pub fn show(&mut self, ui: &imgui::Ui, sim: &mut GridSimulation, status: PanelStatus) {
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return;
        }

        ui.window("Simulation")
            .size([240.0, 330.0], imgui::Condition::FirstUseEver)
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .collapsible(true)
            .build(|| {
                self.render_clock_controls(ui, sim);
                ui.separator();
                self.render_pattern_controls(ui);
                ui.separator();
                render_edit_controls(ui, sim);
                ui.separator();
                render_status(ui, sim, status);
            });
    }

    fn render_clock_controls(&mut self, ui: &imgui::Ui, sim: &mut GridSimulation) {
        let label = match sim.clock().state() {
            ClockState::Running => "Pause",
            ClockState::Paused => "Resume",
        };
        if ui.button(label) {
            sim.clock_mut().pause();
        }
        ui.same_line();
        if ui.button("Step") {
            sim.clock_mut().step();
        }

        ui.text("Generations per second");
        ui.set_next_item_width(100.0);
        let entered = ui
            .input_text("##fps", &mut self.fps_text)
            .enter_returns_true(true)
            .build();
        ui.same_line();
        if entered || ui.button("Apply") {
            if !sim.clock_mut().set_frames_per_second(&self.fps_text) {
                log::warn!("Ignoring generation rate {:?}", self.fps_text);
            }
            self.fps_text = format_rate(sim.clock().frames_per_second());
        }
    }

    fn render_pattern_controls(&mut self, ui: &imgui::Ui) {
        ui.text("Seed pattern");
        for pattern in Pattern::ALL {
            if ui.radio_button_bool(pattern.as_str(), self.selected_pattern == pattern) {
                self.selected_pattern = pattern;
            }
        }
        if ui.button("Reseed") {
            self.reseed = Some(self.selected_pattern);
        }
    }
}

fn render_edit_controls(ui: &imgui::Ui, sim: &mut GridSimulation) {
    ui.text("Click edits");
    let policy = sim.editor().policy();
    if ui.radio_button_bool("Invert", policy == EditPolicy::InvertRgb) {
        sim.editor_mut().set_policy(EditPolicy::InvertRgb);
    }
    ui.same_line();
    if ui.radio_button_bool("Paint", matches!(policy, EditPolicy::Paint(_))) {
        let alive = sim.palette().alive;
        sim.editor_mut().set_policy(EditPolicy::Paint(alive));
    }
}

fn render_status(ui: &imgui::Ui, sim: &GridSimulation, status: PanelStatus) {
    ui.text(format!("Generation: {}", sim.generation()));
    ui.text(format!("State: {:?}", sim.clock().state()));
    ui.text(format!("Active buffer: {:?}", status.active_slot));
    ui.text(format!(
        "Host mirror: {}",
        if status.mirror_to_host {
            "every generation"
        } else {
            "on demand"
        }
    ));
}

fn format_rate(frames_per_second: f64) -> String {
    format!("{}", frames_per_second)
}
