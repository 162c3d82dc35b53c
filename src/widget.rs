use crate::error::Result;
use crate::graphics::{render_scene, Canvas};
use crate::input::{InputEvent, Key, Modifiers};
use crate::plot::draw_plot;
use crate::sim::Simulation;
use crate::state::AppState;
use crate::vertex::CELL_ASPECT;
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use crossterm::{cursor, execute, queue, style, terminal};
use log::{debug, info};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Rows reserved for the plot panel at the bottom of the screen
pub const PLOT_HEIGHT: u16 = 9;

const HELP: &str = "drag: orbit  right: pan  wheel: zoom  shift: horizontal  bksp: reset  d: debug  +/-: history  c: clear  q: quit";

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub cols: u16,
    pub rows: u16,
}

impl ScreenSize {
    /// Current terminal size, 80x24 when it cannot be queried
    pub fn detect() -> Self {
        termsize::get()
            .map(|size| ScreenSize {
                cols: size.cols,
                rows: size.rows,
            })
            .unwrap_or(ScreenSize { cols: 80, rows: 24 })
    }

    /// Rows available to the 3D view
    pub fn scene_rows(&self) -> u16 {
        self.rows.saturating_sub(PLOT_HEIGHT).max(1)
    }

    /// Whether a cell belongs to the plot panel, which captures pointer input
    pub fn in_plot_panel(&self, row: u16) -> bool {
        row >= self.scene_rows()
    }
}

/// Terminal front end: turns crossterm events into viewer input and paints
/// the scene and the plot
pub struct ViewerWidget {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Screen size
    size: ScreenSize,
}

impl ViewerWidget {
    pub fn new(size: ScreenSize) -> Self {
        ViewerWidget {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            size,
        }
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    /// Maps a terminal event to viewer input.
    ///
    /// Column coordinates are divided by the cell aspect so a drag covers
    /// the same distance horizontally and vertically. Presses and wheel
    /// events over the plot panel are swallowed; releases always go through
    /// so no button stays stuck.
    pub fn translate(&mut self, event: &Event) -> Option<InputEvent> {
        match event {
            Event::Resize(cols, rows) => {
                self.size = ScreenSize {
                    cols: *cols,
                    rows: *rows,
                };
                debug!("resized to {cols}x{rows}");
                None
            }
            Event::Mouse(mouse) => {
                let x = f64::from(mouse.column) / CELL_ASPECT;
                let y = f64::from(mouse.row);
                let captured = self.size.in_plot_panel(mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(button) if !captured => Some(InputEvent::Button {
                        button: button.into(),
                        pressed: true,
                        x,
                        y,
                    }),
                    MouseEventKind::Up(button) => Some(InputEvent::Button {
                        button: button.into(),
                        pressed: false,
                        x,
                        y,
                    }),
                    MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(InputEvent::Move {
                        x,
                        y,
                        modifiers: mouse.modifiers.into(),
                    }),
                    MouseEventKind::ScrollUp if !captured => Some(InputEvent::Scroll { yoffset: 1.0 }),
                    MouseEventKind::ScrollDown if !captured => Some(InputEvent::Scroll { yoffset: -1.0 }),
                    _ => None,
                }
            }
            Event::Key(key_event) => {
                let modifiers = Modifiers::from(key_event.modifiers);
                let key = Key::from(key_event.code);
                // Raw mode swallows SIGINT, treat ctrl-c as close
                let key = match key {
                    Key::Char('c') if modifiers.control => Key::Escape,
                    other => other,
                };
                Some(InputEvent::Key {
                    key,
                    pressed: key_event.kind == KeyEventKind::Press,
                    modifiers,
                })
            }
            _ => None,
        }
    }

    /// Handle events for the viewer
    pub fn event<S: Simulation>(&mut self, event: &Event, app: &mut AppState<S>) {
        if let Some(input) = self.translate(event) {
            app.handle(input, f64::from(self.size.scene_rows()));
        }
    }

    /// Builds the full screen as one string per row
    pub fn compose<S: Simulation>(&mut self, app: &AppState<S>) -> Vec<String> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let cols = usize::from(self.size.cols);
        let scene_rows = usize::from(self.size.scene_rows());
        let plot_rows = usize::from(self.size.rows).saturating_sub(scene_rows);

        let camera = app.controller.camera();
        let mut scene = Canvas::new(cols, scene_rows);
        render_scene(&mut scene, camera, &app.sim.segments(), app.sim.extent());

        // Add debug info if debug mode is enabled
        if app.debug {
            let steps = app.last_tick.map_or(0, |tick| tick.steps);
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("FPS: {:.2}", self.fps),
                format!("Sim time: {:.3}s  steps/frame: {}  resets: {}", app.sim.time(), steps, app.pacer.resets()),
                format!(
                    "Azimuth: {:.1}  Elevation: {:.1}  Distance: {:.2}",
                    camera.azimuth, camera.elevation, camera.distance
                ),
                format!(
                    "Look-at: ({:.2}, {:.2}, {:.2})",
                    camera.lookat[0], camera.lookat[1], camera.lookat[2]
                ),
            ];
            for (row, line) in lines.iter().enumerate() {
                scene.text(0, row, line);
            }
        }
        scene.text(0, scene_rows.saturating_sub(1), HELP);

        let mut rows: Vec<String> = scene.rows().collect();
        if plot_rows > 0 {
            let mut plot = Canvas::new(cols, plot_rows);
            draw_plot(&mut plot, &app.buffer, app.plot_time, &app.plot, &app.channel);
            rows.extend(plot.rows());
        }
        rows
    }

    /// Paint the viewer
    pub fn paint<S: Simulation, W: Write>(&mut self, out: &mut W, app: &AppState<S>) -> Result<()> {
        let rows = self.compose(app);
        queue!(out, terminal::BeginSynchronizedUpdate)?;
        for (row, line) in rows.iter().enumerate() {
            queue!(out, cursor::MoveTo(0, row as u16), style::Print(line))?;
        }
        queue!(out, terminal::EndSynchronizedUpdate)?;
        out.flush()?;
        Ok(())
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives
struct TerminalGuard {
    out: io::Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide
        )?;
        Ok(TerminalGuard { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Runs the viewer until the user quits.
///
/// Each frame steps the simulation, samples the plot and paints, then waits
/// for input until the next frame boundary. Input collected while waiting is
/// applied before the next frame's stepping loop.
pub fn run<S: Simulation>(app: &mut AppState<S>) -> Result<()> {
    let mut terminal = TerminalGuard::enter()?;
    let mut widget = ViewerWidget::new(ScreenSize::detect());
    let frame = Duration::from_secs_f64(app.pacer.config().frame_interval);
    info!(
        "viewer started at {}x{}, frame interval {:?}",
        widget.size().cols,
        widget.size().rows,
        frame
    );

    let mut last = Instant::now();
    while !app.quit {
        let started = Instant::now();
        app.frame(started.duration_since(last).as_secs_f64());
        last = started;
        widget.paint(&mut terminal.out, app)?;

        let deadline = started.checked_add(frame);
        while !app.quit {
            let remaining = deadline.map_or(frame, |d| d.saturating_duration_since(Instant::now()));
            if !event::poll(remaining)? {
                break;
            }
            widget.event(&event::read()?, app);
        }
    }

    info!(
        "viewer stopped after {} frames and {} steps",
        app.pacer.ticks(),
        app.pacer.total_steps()
    );
    Ok(())
}
