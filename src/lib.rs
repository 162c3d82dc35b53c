//! Real-time simulation viewer core: a frame pacer that keeps simulated time
//! in step with the frame rate, an orbit camera controller, and a scrolling
//! sample buffer for live plots, plus the terminal front end around them.

pub mod camera;
pub mod config;
pub mod error;
pub mod graphics;
pub mod input;
pub mod math;
pub mod pacer;
pub mod pendulum;
pub mod plot;
pub mod scrolling;
pub mod sim;
pub mod state;
pub mod vertex;
pub mod widget;

pub use camera::{CameraAction, CameraController, CameraState, ControllerConfig, DragAxis, PointerState};
pub use error::ViewerError;
pub use pacer::{FramePacer, PacerConfig, TickReport};
pub use scrolling::ScrollingBuffer;
pub use sim::{Segment, Simulation};
