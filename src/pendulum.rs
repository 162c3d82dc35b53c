//! Damped planar double pendulum, the simulation the viewer ships with.
//!
//! Two point masses hang from a fixed pivot in the x-z plane. Angles are
//! absolute and measured from the downward vertical. Integration is
//! semi-implicit Euler with a fixed step.

use crate::sim::{Segment, Simulation};
use thiserror::Error;

const CHANNELS: [&str; 10] = [
    "time", "qpos0", "qpos1", "qvel0", "qvel1", "qacc0", "qacc1", "energy", "tip_x", "tip_z",
];

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("timestep must be positive and finite, got {0}")]
    Timestep(f64),
    #[error("link {index} {what} must be positive and finite, got {value}")]
    Link {
        index: usize,
        what: &'static str,
        value: f64,
    },
    #[error("damping must be non-negative and finite, got {0}")]
    Damping(f64),
    #[error("initial angles must be finite")]
    InitialState,
}

/// Physical parameters and initial conditions
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumParams {
    pub lengths: [f64; 2],
    pub masses: [f64; 2],
    /// Viscous damping per joint
    pub damping: f64,
    pub gravity: f64,
    pub timestep: f64,
    pub initial_angles: [f64; 2],
}

impl Default for PendulumParams {
    fn default() -> Self {
        PendulumParams {
            lengths: [0.5, 0.5],
            masses: [1.0, 1.0],
            damping: 0.05,
            gravity: 9.81,
            timestep: 0.002,
            initial_angles: [1.2, -0.6],
        }
    }
}

impl PendulumParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(ModelError::Timestep(self.timestep));
        }
        for index in 0..2 {
            for (what, value) in [("length", self.lengths[index]), ("mass", self.masses[index])] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ModelError::Link { index, what, value });
                }
            }
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(ModelError::Damping(self.damping));
        }
        if !self.initial_angles.iter().all(|a| a.is_finite()) {
            return Err(ModelError::InitialState);
        }
        Ok(())
    }

    fn reach(&self) -> f64 {
        self.lengths[0] + self.lengths[1]
    }
}

/// Quantities recomputed from `(qpos, qvel)` by [`Simulation::forward`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Derived {
    qacc: [f64; 2],
    elbow: [f64; 3],
    tip: [f64; 3],
    energy: f64,
}

#[derive(Debug, Clone)]
pub struct DoublePendulum {
    params: PendulumParams,
    pivot: [f64; 3],
    time: f64,
    qpos: [f64; 2],
    qvel: [f64; 2],
    derived: Derived,
}

impl DoublePendulum {
    /// Builds the model at its initial conditions with derived quantities
    /// already valid
    pub fn new(params: PendulumParams) -> Result<Self, ModelError> {
        params.validate()?;
        let pivot = [0.0, 0.0, params.reach() * 1.1];
        let mut model = DoublePendulum {
            qpos: params.initial_angles,
            qvel: [0.0; 2],
            params,
            pivot,
            time: 0.0,
            derived: Derived::default(),
        };
        model.forward();
        Ok(model)
    }

    pub fn params(&self) -> &PendulumParams {
        &self.params
    }

    pub fn qpos(&self) -> [f64; 2] {
        self.qpos
    }

    pub fn qvel(&self) -> [f64; 2] {
        self.qvel
    }

    /// Total mechanical energy as of the last forward pass
    pub fn energy(&self) -> f64 {
        self.derived.energy
    }

    /// Joint accelerations from the equations of motion
    fn accelerations(&self) -> [f64; 2] {
        let [l1, l2] = self.params.lengths;
        let [m1, m2] = self.params.masses;
        let g = self.params.gravity;
        let b = self.params.damping;
        let [t1, t2] = self.qpos;
        let [w1, w2] = self.qvel;
        let (sin_d, cos_d) = (t1 - t2).sin_cos();

        // Mass matrix
        let a11 = (m1 + m2) * l1 * l1;
        let a12 = m2 * l1 * l2 * cos_d;
        let a22 = m2 * l2 * l2;

        // Gravity, velocity-product and damping forces
        let f1 = -m2 * l1 * l2 * w2 * w2 * sin_d - (m1 + m2) * g * l1 * t1.sin() - b * w1;
        let f2 = m2 * l1 * l2 * w1 * w1 * sin_d - m2 * g * l2 * t2.sin() - b * w2;

        let det = a11 * a22 - a12 * a12;
        [(a22 * f1 - a12 * f2) / det, (a11 * f2 - a12 * f1) / det]
    }
}

impl Simulation for DoublePendulum {
    fn time(&self) -> f64 {
        self.time
    }

    fn step(&mut self) {
        let dt = self.params.timestep;
        let qacc = self.accelerations();
        for i in 0..2 {
            self.qvel[i] += dt * qacc[i];
            self.qpos[i] += dt * self.qvel[i];
        }
        self.time += dt;
        self.forward();
    }

    fn reset(&mut self) {
        self.time = 0.0;
        self.qpos = self.params.initial_angles;
        self.qvel = [0.0; 2];
        self.derived = Derived::default();
    }

    fn forward(&mut self) {
        let [l1, l2] = self.params.lengths;
        let [m1, m2] = self.params.masses;
        let g = self.params.gravity;
        let [t1, t2] = self.qpos;
        let [w1, w2] = self.qvel;

        let elbow = [
            self.pivot[0] + l1 * t1.sin(),
            0.0,
            self.pivot[2] - l1 * t1.cos(),
        ];
        let tip = [elbow[0] + l2 * t2.sin(), 0.0, elbow[2] - l2 * t2.cos()];

        let kinetic = 0.5 * (m1 + m2) * l1 * l1 * w1 * w1
            + 0.5 * m2 * l2 * l2 * w2 * w2
            + m2 * l1 * l2 * w1 * w2 * (t1 - t2).cos();
        let potential = g * (m1 * elbow[2] + m2 * tip[2]);

        self.derived = Derived {
            qacc: self.accelerations(),
            elbow,
            tip,
            energy: kinetic + potential,
        };
    }

    fn channel(&self, name: &str) -> Option<f64> {
        let value = match name {
            "time" => self.time,
            "qpos0" => self.qpos[0],
            "qpos1" => self.qpos[1],
            "qvel0" => self.qvel[0],
            "qvel1" => self.qvel[1],
            "qacc0" => self.derived.qacc[0],
            "qacc1" => self.derived.qacc[1],
            "energy" => self.derived.energy,
            "tip_x" => self.derived.tip[0],
            "tip_z" => self.derived.tip[2],
            _ => return None,
        };
        Some(value)
    }

    fn channel_names(&self) -> Vec<&'static str> {
        CHANNELS.to_vec()
    }

    fn extent(&self) -> f64 {
        2.0 * self.params.reach()
    }

    fn center(&self) -> [f64; 3] {
        [0.0, 0.0, self.pivot[2] * 0.5]
    }

    fn segments(&self) -> Vec<Segment> {
        let reach = self.params.reach() * 0.25;
        vec![
            // Mount
            Segment {
                start: [self.pivot[0] - reach, 0.0, self.pivot[2]],
                end: [self.pivot[0] + reach, 0.0, self.pivot[2]],
            },
            Segment {
                start: self.pivot,
                end: self.derived.elbow,
            },
            Segment {
                start: self.derived.elbow,
                end: self.derived.tip,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(model: &mut DoublePendulum, seconds: f64) {
        let steps = (seconds / model.params().timestep).round() as usize;
        for _ in 0..steps {
            model.step();
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        let params = PendulumParams {
            timestep: 0.0,
            ..PendulumParams::default()
        };
        assert_eq!(DoublePendulum::new(params).unwrap_err(), ModelError::Timestep(0.0));

        let mut params = PendulumParams::default();
        params.lengths[1] = -1.0;
        assert!(matches!(
            DoublePendulum::new(params),
            Err(ModelError::Link { index: 1, what: "length", .. })
        ));

        let params = PendulumParams {
            damping: f64::NAN,
            ..PendulumParams::default()
        };
        assert!(matches!(DoublePendulum::new(params), Err(ModelError::Damping(_))));
    }

    #[test]
    fn hanging_at_rest_stays_at_rest() {
        let mut model = DoublePendulum::new(PendulumParams {
            initial_angles: [0.0, 0.0],
            ..PendulumParams::default()
        })
        .unwrap();
        run(&mut model, 1.0);
        assert_relative_eq!(model.qpos()[0], 0.0);
        assert_relative_eq!(model.qvel()[1], 0.0);
        assert_relative_eq!(model.time(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn damping_drains_energy() {
        let mut model = DoublePendulum::new(PendulumParams {
            damping: 0.5,
            initial_angles: [0.4, 0.2],
            ..PendulumParams::default()
        })
        .unwrap();
        let start = model.energy();
        run(&mut model, 3.0);
        assert!(model.energy() < start);
    }

    #[test]
    fn reset_invalidates_derived_until_forward() {
        let mut model = DoublePendulum::new(PendulumParams::default()).unwrap();
        let energy = model.channel("energy");
        run(&mut model, 0.5);

        model.reset();
        assert_eq!(model.channel("time"), Some(0.0));
        assert_eq!(model.channel("energy"), Some(0.0));
        assert!(model.segments()[2].end == [0.0; 3]);

        model.forward();
        assert_eq!(model.channel("energy"), energy);
    }

    #[test]
    fn every_listed_channel_reads() {
        let model = DoublePendulum::new(PendulumParams::default()).unwrap();
        for name in model.channel_names() {
            assert!(model.channel(name).is_some(), "{name}");
        }
        assert_eq!(model.channel("qvel5"), None);
    }

    #[test]
    fn tip_sits_at_full_reach_when_hanging() {
        let model = DoublePendulum::new(PendulumParams {
            initial_angles: [0.0, 0.0],
            ..PendulumParams::default()
        })
        .unwrap();
        let pivot_z = model.segments()[1].start[2];
        assert_relative_eq!(model.channel("tip_z").unwrap(), pivot_z - 1.0, epsilon = 1e-12);
        assert_relative_eq!(model.channel("tip_x").unwrap(), 0.0, epsilon = 1e-12);
    }
}
