//! Windowed application
//!
//! Creates a fixed-size window, builds the render engine once the event loop
//! resumes, and runs one [`GridSimulation::tick`] per redraw. Setup failures
//! are logged, shown in a blocking dialog, and returned from [`GridshadeApp::run`].

use cgmath::Point2;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::SimulationConfig;
use crate::error::{GridError, Result};
use crate::gfx::rendering::render_engine::RenderEngine;
use crate::simulation::manager::GridSimulation;
use crate::simulation::patterns::Pattern;
use crate::simulation::pixel_grid::PixelGrid;
use crate::simulation::traits::GridPipeline;
use crate::ui::{ControlPanel, PanelStatus, UiManager};

pub struct GridshadeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SimulationConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    simulation: GridSimulation,
    panel: ControlPanel,
    start: Instant,
    fatal: Option<GridError>,
}

impl GridshadeApp {
    /// Creates the application; nothing touches the GPU until [`run`](Self::run)
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        let simulation = GridSimulation::new(&config);
        let panel = ControlPanel::new(config.frames_per_second, config.initial_pattern);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                simulation,
                panel,
                start: Instant::now(),
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    ///
    /// Returns the error that stopped the application, if any.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Fresh grid for `pattern` at the configured size
fn seed_grid(config: &SimulationConfig, pattern: Pattern) -> PixelGrid {
    pattern.build(
        config.grid_size(),
        config.visible_cells(),
        config.alive_color,
        config.dead_color,
    )
}

impl AppState {
    fn setup(&mut self, window: Arc<Window>) -> Result<()> {
        let initial = seed_grid(&self.config, self.config.initial_pattern);
        let mut renderer =
            pollster::block_on(RenderEngine::new(window.clone(), &self.config, &initial))?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.simulation.seed(&mut renderer, initial)?;
        let tiles = renderer.tile_uniforms();
        log::info!(
            "Showing {}x{} cells of a {}x{} grid at {}x{} pixels per cell",
            self.config.visible_cells().0,
            self.config.visible_cells().1,
            tiles.u_texture_width,
            tiles.u_texture_height,
            tiles.u_tile_width,
            tiles.u_tile_height
        );

        self.window = Some(window);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.start = Instant::now();
        Ok(())
    }

    /// Logs `err`, shows it in a blocking dialog and stops the event loop
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: GridError) {
        log::error!("{}", err);
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Gridshade")
            .set_description(err.to_string())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, timestamp_ms: f64) -> Result<()> {
        let AppState {
            config,
            window,
            render_engine,
            ui_manager,
            simulation,
            panel,
            ..
        } = self;
        let (Some(window), Some(engine)) = (window.as_ref(), render_engine.as_mut()) else {
            return Ok(());
        };

        simulation.tick(engine, timestamp_ms)?;

        let status = PanelStatus {
            active_slot: engine.active_slot(),
            mirror_to_host: engine.mirrors_to_host(),
        };
        match ui_manager.as_mut() {
            Some(ui_manager) => engine.finish_frame(|device, queue, encoder, view| {
                ui_manager.draw(device, queue, encoder, window, view, |ui| {
                    panel.show(ui, simulation, status)
                })
            })?,
            None => engine.finish_frame(|_, _, _, _| Ok(()))?,
        }

        if let Some(pattern) = panel.take_reseed() {
            let grid = seed_grid(config, pattern);
            log::info!("Reseeding with {}", pattern.as_str());
            simulation.seed(engine, grid)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };
        match key_code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => {
                self.simulation.clock_mut().pause();
            }
            KeyCode::KeyS | KeyCode::ArrowRight => {
                if !self.simulation.clock_mut().step() {
                    log::debug!("Step ignored while running");
                }
            }
            _ => (),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("Gridshade")
            .with_inner_size(PhysicalSize::new(
                self.config.surface_width,
                self.config.surface_height,
            ))
            .with_resizable(false);

        let result = event_loop
            .create_window(attributes)
            .map_err(|err| GridError::NoGraphicsContext(err.to_string()))
            .and_then(|window| self.setup(Arc::new(window)));
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets first look at input
        let mut ui_wants_mouse = false;
        let mut ui_wants_keyboard = false;
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            ui_manager.handle_input(&window, &ui_event);
            ui_wants_mouse = ui_manager.wants_mouse();
            ui_wants_keyboard = ui_manager.wants_keyboard();
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if !ui_wants_keyboard {
                    self.handle_key(event_loop, &event);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let editor = self.simulation.editor_mut();
                if ui_wants_mouse {
                    editor.primary_button(false);
                } else {
                    editor.pointer_moved(Point2::new(position.x, position.y));
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.simulation.editor_mut().pointer_left();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if !(pressed && ui_wants_mouse) {
                    self.simulation.editor_mut().primary_button(pressed);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let timestamp_ms = self.start.elapsed().as_secs_f64() * 1000.0;
                if let Err(err) = self.redraw(timestamp_ms) {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
