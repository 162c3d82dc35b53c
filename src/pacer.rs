use crate::sim::Simulation;
use log::{debug, info, trace, warn};
use std::time::{Duration, Instant};

/// Default simulated seconds per rendered frame
pub const DEFAULT_FRAME_INTERVAL: f64 = 1.0 / 60.0;
/// Longest accepted frame interval, seconds
pub const MAX_FRAME_INTERVAL: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacerConfig {
    /// Simulated time each tick must cover, seconds
    pub frame_interval: f64,
    /// Optional cap on steps per tick. `None` catches up unconditionally.
    pub max_steps_per_tick: Option<u32>,
}

impl Default for PacerConfig {
    fn default() -> Self {
        PacerConfig {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            max_steps_per_tick: None,
        }
    }
}

impl PacerConfig {
    pub fn is_valid(&self) -> bool {
        self.frame_interval > 0.0
            && self.frame_interval <= MAX_FRAME_INTERVAL
            && self.max_steps_per_tick != Some(0)
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub steps: u32,
    /// Simulated time covered by this tick
    pub sim_elapsed: f64,
    /// Wall-clock time the stepping loop took
    pub wall: Duration,
    /// Set when the step cap ended the tick before the interval was covered
    pub truncated: bool,
}

/// Steps a simulation so that each rendered frame covers a fixed span of
/// simulated time.
#[derive(Debug, Clone)]
pub struct FramePacer {
    config: PacerConfig,
    ticks: u64,
    steps: u64,
    resets: u64,
}

impl FramePacer {
    /// Returns `None` for an interval outside `(0, MAX_FRAME_INTERVAL]` or a
    /// zero step cap
    pub fn new(config: PacerConfig) -> Option<Self> {
        if !config.is_valid() {
            return None;
        }
        Some(FramePacer {
            config,
            ticks: 0,
            steps: 0,
            resets: 0,
        })
    }

    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulation steps taken so far, across all ticks
    pub fn total_steps(&self) -> u64 {
        self.steps
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Ticks with the configured frame interval
    pub fn tick<S: Simulation + ?Sized>(&mut self, sim: &mut S) -> TickReport {
        self.tick_for(sim, self.config.frame_interval)
    }

    /// Steps `sim` until at least `interval` seconds of simulated time have
    /// passed since the call began. The pacer is idle again once this returns.
    ///
    /// Without a step cap this runs to completion even when stepping is
    /// slower than real time; the frame then simply takes longer.
    pub fn tick_for<S: Simulation + ?Sized>(&mut self, sim: &mut S, interval: f64) -> TickReport {
        let started = Instant::now();
        let t0 = sim.time();
        let mut steps = 0u32;
        let mut truncated = false;

        while sim.time() - t0 < interval {
            if self.config.max_steps_per_tick.is_some_and(|max| steps >= max) {
                truncated = true;
                break;
            }
            sim.step();
            steps += 1;
        }

        let report = TickReport {
            steps,
            sim_elapsed: sim.time() - t0,
            wall: started.elapsed(),
            truncated,
        };
        self.ticks += 1;
        self.steps += u64::from(steps);

        trace!("tick {}: {} steps, {:.4}s simulated", self.ticks, steps, report.sim_elapsed);
        if truncated {
            warn!(
                "tick {} hit the {} step cap after {:.4}s of {:.4}s",
                self.ticks, steps, report.sim_elapsed, interval
            );
        }
        if report.wall.as_secs_f64() > interval {
            debug!(
                "tick {} ran slower than real time: {:.4}s wall for {:.4}s simulated",
                self.ticks,
                report.wall.as_secs_f64(),
                report.sim_elapsed
            );
        }
        report
    }

    /// Rolls the simulation back to its initial conditions and recomputes
    /// derived quantities, so reads right after the reset are valid.
    pub fn reset_request<S: Simulation + ?Sized>(&mut self, sim: &mut S) {
        sim.reset();
        sim.forward();
        self.resets += 1;
        info!("simulation reset ({} so far)", self.resets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-step clock that counts calls
    struct Clock {
        time: f64,
        dt: f64,
        steps: u32,
        forwarded: bool,
    }

    impl Clock {
        fn new(dt: f64) -> Self {
            Clock {
                time: 0.0,
                dt,
                steps: 0,
                forwarded: true,
            }
        }
    }

    impl Simulation for Clock {
        fn time(&self) -> f64 {
            self.time
        }
        fn step(&mut self) {
            self.time += self.dt;
            self.steps += 1;
        }
        fn reset(&mut self) {
            self.time = 0.0;
            self.forwarded = false;
        }
        fn forward(&mut self) {
            self.forwarded = true;
        }
        fn channel(&self, name: &str) -> Option<f64> {
            (name == "time").then_some(self.time)
        }
        fn channel_names(&self) -> Vec<&'static str> {
            vec!["time"]
        }
    }

    #[test]
    fn tick_covers_the_interval() {
        let mut pacer = FramePacer::new(PacerConfig::default()).unwrap();
        let mut sim = Clock::new(0.002);
        let report = pacer.tick(&mut sim);

        // 1/60 s needs 9 steps of 2 ms
        assert_eq!(report.steps, 9);
        assert!(report.sim_elapsed >= DEFAULT_FRAME_INTERVAL);
        assert!(report.sim_elapsed - DEFAULT_FRAME_INTERVAL < 0.002);
        assert!(!report.truncated);
    }

    #[test]
    fn large_steps_take_a_single_step() {
        let mut pacer = FramePacer::new(PacerConfig::default()).unwrap();
        let mut sim = Clock::new(0.1);
        assert_eq!(pacer.tick(&mut sim).steps, 1);
        assert_eq!(pacer.tick(&mut sim).steps, 1);
        assert_eq!(pacer.ticks(), 2);
        assert_eq!(pacer.total_steps(), 2);
    }

    #[test]
    fn step_cap_truncates_the_tick() {
        let config = PacerConfig {
            frame_interval: 0.1,
            max_steps_per_tick: Some(5),
        };
        let mut pacer = FramePacer::new(config).unwrap();
        let mut sim = Clock::new(0.001);
        let report = pacer.tick(&mut sim);
        assert_eq!(report.steps, 5);
        assert!(report.truncated);
        assert_eq!(sim.steps, 5);
    }

    #[test]
    fn tick_for_overrides_interval() {
        let mut pacer = FramePacer::new(PacerConfig::default()).unwrap();
        let mut sim = Clock::new(0.01);
        assert_eq!(pacer.tick_for(&mut sim, 0.05).steps, 5);
    }

    #[test]
    fn reset_runs_forward_pass() {
        let mut pacer = FramePacer::new(PacerConfig::default()).unwrap();
        let mut sim = Clock::new(0.01);
        pacer.tick(&mut sim);
        pacer.reset_request(&mut sim);
        assert!(sim.forwarded);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(pacer.resets(), 1);
    }

    #[test]
    fn rejects_invalid_config() {
        for frame_interval in [0.0, -1.0, 1.5, 1e20, f64::NAN, f64::INFINITY] {
            let config = PacerConfig {
                frame_interval,
                ..PacerConfig::default()
            };
            assert!(FramePacer::new(config).is_none());
        }
        let config = PacerConfig {
            max_steps_per_tick: Some(0),
            ..PacerConfig::default()
        };
        assert!(FramePacer::new(config).is_none());
    }
}
