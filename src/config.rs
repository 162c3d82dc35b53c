use crate::camera::{ControllerConfig, DEFAULT_SCROLL_ZOOM};
use crate::error::{Result, ViewerError};
use crate::pacer::{PacerConfig, DEFAULT_FRAME_INTERVAL, MAX_FRAME_INTERVAL};
use crate::pendulum::PendulumParams;
use crate::plot::{PlotConfig, MAX_HISTORY, MIN_HISTORY};
use crate::scrolling::DEFAULT_CAPACITY;
use clap::Parser;
use std::path::PathBuf;

/// Runs a double pendulum in real time in the terminal, with an orbit camera
/// and a scrolling plot of one simulation channel.
///
/// Mouse: left drag orbits, right drag pans, middle drag or wheel zooms,
/// shift switches drags to the horizontal plane. Keys: backspace resets,
/// d toggles debug info, + and - change the plot history, c clears the
/// plot, q quits.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Simulated seconds covered by each rendered frame, at most one
    #[arg(long, default_value_t = DEFAULT_FRAME_INTERVAL)]
    pub frame_interval: f64,

    /// Cap on simulation steps per frame (unbounded when omitted)
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Fraction of the viewport height one scroll unit zooms by
    #[arg(long, default_value_t = DEFAULT_SCROLL_ZOOM)]
    pub scroll_zoom: f64,

    /// Samples kept for the plot
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Seconds of history shown in the plot
    #[arg(long, default_value_t = 10.0)]
    pub history: f64,

    /// Simulation channel to plot
    #[arg(long, default_value = "qvel1")]
    pub channel: String,

    /// Lower limit of the plot's y axis
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub y_min: f64,

    /// Upper limit of the plot's y axis
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub y_max: f64,

    /// Pendulum integration step, seconds
    #[arg(long, default_value_t = 0.002)]
    pub timestep: f64,

    /// Viscous damping on both joints
    #[arg(long, default_value_t = 0.05)]
    pub damping: f64,

    /// Initial angle of the upper link, radians
    #[arg(long, default_value_t = 1.2, allow_negative_numbers = true)]
    pub theta1: f64,

    /// Initial angle of the lower link, radians
    #[arg(long, default_value_t = -0.6, allow_negative_numbers = true)]
    pub theta2: f64,

    /// Start with the debug overlay visible
    #[arg(long)]
    pub debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Typed settings for every part of the viewer
#[derive(Debug, Clone)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub pacer: PacerConfig,
    pub plot: PlotConfig,
    pub capacity: usize,
    pub channel: String,
    pub pendulum: PendulumParams,
    pub debug: bool,
}

impl Args {
    /// Checks ranges and splits the flags into per-component settings
    pub fn validate(&self) -> Result<Settings> {
        let pacer = PacerConfig {
            frame_interval: self.frame_interval,
            max_steps_per_tick: self.max_steps,
        };
        if !pacer.is_valid() {
            return Err(ViewerError::InvalidConfig(format!(
                "frame interval must be within (0, {MAX_FRAME_INTERVAL}] seconds and step cap non-zero (got {} and {:?})",
                self.frame_interval, self.max_steps
            )));
        }
        if !(self.scroll_zoom.is_finite() && self.scroll_zoom > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "scroll zoom must be positive, got {}",
                self.scroll_zoom
            )));
        }
        if self.capacity == 0 {
            return Err(ViewerError::InvalidConfig("capacity must be at least 1".into()));
        }
        if !(MIN_HISTORY..=MAX_HISTORY).contains(&self.history) {
            return Err(ViewerError::InvalidConfig(format!(
                "history must be within {MIN_HISTORY}..={MAX_HISTORY} seconds, got {}",
                self.history
            )));
        }
        if !(self.y_min.is_finite() && self.y_max.is_finite() && self.y_min < self.y_max) {
            return Err(ViewerError::InvalidConfig(format!(
                "plot range is empty: {}..{}",
                self.y_min, self.y_max
            )));
        }

        let pendulum = PendulumParams {
            damping: self.damping,
            timestep: self.timestep,
            initial_angles: [self.theta1, self.theta2],
            ..PendulumParams::default()
        };
        pendulum.validate()?;

        Ok(Settings {
            controller: ControllerConfig {
                scroll_zoom: self.scroll_zoom,
                ..ControllerConfig::default()
            },
            pacer,
            plot: PlotConfig {
                history: self.history,
                y_min: self.y_min,
                y_max: self.y_max,
            },
            capacity: self.capacity,
            channel: self.channel.clone(),
            pendulum,
            debug: self.debug,
        })
    }
}
