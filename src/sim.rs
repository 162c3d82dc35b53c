/// A line segment in world space, used to draw the simulated scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: [f64; 3],
    pub end: [f64; 3],
}

/// The physics engine as seen by the viewer.
///
/// The viewer only ever advances the model one fixed step at a time, rolls
/// it back to its initial conditions, and reads named scalar channels.
pub trait Simulation {
    /// Current simulated time in seconds
    fn time(&self) -> f64;

    /// Advances the model by one integration step
    fn step(&mut self);

    /// Restores time and state to the initial conditions. Derived quantities
    /// are not valid again until [`Simulation::forward`] runs.
    fn reset(&mut self);

    /// Recomputes derived quantities from the current state without
    /// advancing time
    fn forward(&mut self);

    /// Reads one named channel, `None` for unknown names
    fn channel(&self, name: &str) -> Option<f64>;

    /// Names accepted by [`Simulation::channel`]
    fn channel_names(&self) -> Vec<&'static str>;

    /// Characteristic size of the scene, scales camera framing and zoom
    fn extent(&self) -> f64 {
        1.0
    }

    /// Point the camera initially looks at
    fn center(&self) -> [f64; 3] {
        [0.0; 3]
    }

    /// Wireframe of the current configuration
    fn segments(&self) -> Vec<Segment> {
        Vec::new()
    }
}
