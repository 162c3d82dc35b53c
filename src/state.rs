use crate::camera::{CameraController, CameraState, ControllerRequest};
use crate::config::Settings;
use crate::error::{Result, ViewerError};
use crate::input::{InputEvent, Key};
use crate::pacer::{FramePacer, TickReport};
use crate::plot::PlotConfig;
use crate::scrolling::ScrollingBuffer;
use crate::sim::Simulation;
use log::info;

/// Application state
///
/// Owns the simulation and everything the frame loop mutates; the front end
/// passes events and frame ticks in by reference.
pub struct AppState<S: Simulation> {
    pub sim: S,
    pub controller: CameraController,
    pub pacer: FramePacer,
    /// Samples of the plotted channel against plot time
    pub buffer: ScrollingBuffer,
    pub plot: PlotConfig,
    /// Channel sampled into the buffer after each tick
    pub channel: String,
    /// Accumulated wall-clock frame time, the plot's x axis
    pub plot_time: f64,
    /// Enable debug overlay
    pub debug: bool,
    /// Set once the user asked to leave
    pub quit: bool,
    pub last_tick: Option<TickReport>,
}

impl<S: Simulation> AppState<S> {
    pub fn new(sim: S, settings: &Settings) -> Result<Self> {
        if sim.channel(&settings.channel).is_none() {
            return Err(ViewerError::UnknownChannel {
                name: settings.channel.clone(),
                available: sim.channel_names().join(", "),
            });
        }
        let buffer = ScrollingBuffer::new(settings.capacity)
            .ok_or_else(|| ViewerError::InvalidConfig("capacity must be at least 1".into()))?;
        let pacer = FramePacer::new(settings.pacer)
            .ok_or_else(|| ViewerError::InvalidConfig("frame interval must be positive".into()))?;

        let mut controller_config = settings.controller;
        controller_config.extent = sim.extent();
        let camera = CameraState::framing(sim.extent(), sim.center());

        Ok(AppState {
            controller: CameraController::new(camera, controller_config),
            pacer,
            buffer,
            plot: settings.plot,
            channel: settings.channel.clone(),
            plot_time: 0.0,
            debug: settings.debug,
            quit: false,
            last_tick: None,
            sim,
        })
    }

    /// Applies one input event. Camera changes and resets take effect
    /// before the next call to [`AppState::frame`].
    pub fn handle(&mut self, event: InputEvent, viewport_height: f64) {
        match event {
            InputEvent::Button {
                button,
                pressed,
                x,
                y,
            } => self.controller.on_button_event(button, pressed, x, y),
            InputEvent::Move { x, y, modifiers } => {
                self.controller
                    .on_pointer_move(x, y, viewport_height, modifiers.shift)
            }
            InputEvent::Scroll { yoffset } => self.controller.on_scroll(yoffset),
            InputEvent::Key {
                key,
                pressed,
                modifiers,
            } => {
                if pressed && self.handle_app_key(key) {
                    return;
                }
                if let Some(ControllerRequest::ResetSimulation) =
                    self.controller.on_key(key, pressed, modifiers)
                {
                    self.pacer.reset_request(&mut self.sim);
                }
            }
        }
    }

    /// Keys owned by the application rather than the camera. Returns `true`
    /// when the key was consumed.
    fn handle_app_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape | Key::Char('q') | Key::Char('Q') => self.quit = true,
            Key::Char('d') | Key::Char('D') => self.debug = !self.debug,
            Key::Char('+') | Key::Char('=') => self.plot.adjust_history(1.0),
            Key::Char('-') | Key::Char('_') => self.plot.adjust_history(-1.0),
            Key::Char('c') | Key::Char('C') => {
                self.buffer.erase();
                info!("plot cleared");
            }
            _ => return false,
        }
        true
    }

    /// Runs one frame: steps the simulation through the frame interval,
    /// then samples the plotted channel at `plot_time + wall_dt`.
    pub fn frame(&mut self, wall_dt: f64) -> TickReport {
        let report = self.pacer.tick(&mut self.sim);
        self.plot_time += wall_dt;
        if let Some(value) = self.sim.channel(&self.channel) {
            self.buffer.add_point(self.plot_time as f32, value as f32);
        }
        self.last_tick = Some(report);
        report
    }
}
