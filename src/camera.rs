use crate::input::{Key, Modifiers, MouseButton};
use crate::math::{add, camera_frame, camera_to_world, scale, sub};

/// Default fraction of the viewport height one scroll unit emulates
pub const DEFAULT_SCROLL_ZOOM: f64 = 0.05;

/// Closest the camera may get to its look-at point
const MIN_DISTANCE: f64 = 1e-3;

/// Elevation limit in degrees, keeps the camera frame well defined
const MAX_ELEVATION: f64 = 89.0;

/// Parameters needed to rebuild the view transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Rotation around the world z axis, degrees
    pub azimuth: f64,
    /// Angle above the horizontal plane, degrees
    pub elevation: f64,
    /// Distance from the eye to the look-at point
    pub distance: f64,
    pub lookat: [f64; 3],
    /// Vertical field of view, degrees
    pub fovy: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        CameraState::framing(1.0, [0.0; 3])
    }
}

impl CameraState {
    /// Free camera framing a scene of size `extent` centred on `center`
    pub fn framing(extent: f64, center: [f64; 3]) -> Self {
        CameraState {
            azimuth: 90.0,
            elevation: -45.0,
            distance: 1.5 * extent,
            lookat: center,
            fovy: 45.0,
        }
    }

    /// `(forward, up, right)` unit vectors of the camera
    pub fn frame(&self) -> ([f64; 3], [f64; 3], [f64; 3]) {
        camera_frame(self.azimuth, self.elevation)
    }

    /// Eye position in world space
    pub fn eye(&self) -> [f64; 3] {
        let (forward, _, _) = self.frame();
        sub(&self.lookat, &scale(&forward, self.distance))
    }

    /// Height of the view frustum at unit distance
    pub fn frustum_height(&self) -> f64 {
        2.0 * (self.fovy.to_radians() / 2.0).tan()
    }

    /// Applies one camera action with deltas already normalized by the
    /// viewport height. `extent` is the size of the scene being viewed.
    pub fn apply(&mut self, action: CameraAction, rdx: f64, rdy: f64, extent: f64) {
        match action {
            CameraAction::Orbit(_) => {
                self.azimuth -= rdx * 180.0;
                self.elevation =
                    (self.elevation - rdy * 180.0).clamp(-MAX_ELEVATION, MAX_ELEVATION);
            }
            CameraAction::Pan(axis) => {
                let (forward, up, _) = self.frame();
                let local = match axis {
                    DragAxis::Vertical => [rdx, 0.0, -rdy],
                    DragAxis::Horizontal => [rdx, rdy, 0.0],
                };
                let shift = camera_to_world(&local, &forward, &up);
                // Move the look-at point against the drag so the scene follows the cursor
                let scl = self.frustum_height() * self.distance;
                self.lookat = add(&self.lookat, &scale(&shift, -scl));
            }
            CameraAction::Zoom => {
                let extent = extent.max(MIN_DISTANCE);
                // Dragging up, like scrolling up, brings the camera closer
                self.distance += (1.0 + self.distance / extent / 3.0).ln() * rdy * 9.0 * extent;
                self.distance = self.distance.max(MIN_DISTANCE);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAxis {
    Horizontal,
    Vertical,
}

/// The one camera action a pointer move resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Pan(DragAxis),
    Orbit(DragAxis),
    Zoom,
}

impl CameraAction {
    /// Picks the action for the held buttons, right over left over middle.
    /// Returns `None` when no button is held.
    pub fn select(pointer: &PointerState, shift: bool) -> Option<Self> {
        let axis = if shift {
            DragAxis::Horizontal
        } else {
            DragAxis::Vertical
        };
        if pointer.right {
            Some(CameraAction::Pan(axis))
        } else if pointer.left {
            Some(CameraAction::Orbit(axis))
        } else if pointer.middle {
            Some(CameraAction::Zoom)
        } else {
            None
        }
    }
}

/// Pressed buttons and last cursor position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
    pub last_x: f64,
    pub last_y: f64,
}

impl PointerState {
    pub fn any_pressed(&self) -> bool {
        self.left || self.middle || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Viewport-height fraction one scroll unit emulates
    pub scroll_zoom: f64,
    /// Key that asks for a simulation reset
    pub reset_key: Key,
    /// Scene size, scales zoom speed
    pub extent: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            scroll_zoom: DEFAULT_SCROLL_ZOOM,
            reset_key: Key::Backspace,
            extent: 1.0,
        }
    }
}

/// Requests the controller hands back to the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerRequest {
    ResetSimulation,
}

/// Turns pointer, scroll and key input into camera updates
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: CameraState,
    pointer: PointerState,
    config: ControllerConfig,
}

impl CameraController {
    pub fn new(camera: CameraState, config: ControllerConfig) -> Self {
        CameraController {
            camera,
            pointer: PointerState::default(),
            config,
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Records a button press or release and the cursor position
    pub fn on_button_event(&mut self, button: MouseButton, pressed: bool, x: f64, y: f64) {
        match button {
            MouseButton::Left => self.pointer.left = pressed,
            MouseButton::Middle => self.pointer.middle = pressed,
            MouseButton::Right => self.pointer.right = pressed,
        }
        self.pointer.last_x = x;
        self.pointer.last_y = y;
    }

    /// Moves the camera according to the held buttons.
    ///
    /// Deltas are divided by the viewport height, so sensitivity does not
    /// depend on the window's aspect ratio.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, viewport_height: f64, shift: bool) {
        let Some(action) = CameraAction::select(&self.pointer, shift) else {
            return;
        };

        let dx = x - self.pointer.last_x;
        let dy = y - self.pointer.last_y;
        self.pointer.last_x = x;
        self.pointer.last_y = y;

        self.camera.apply(
            action,
            dx / viewport_height,
            dy / viewport_height,
            self.config.extent,
        );
    }

    /// Zooms as if the pointer was dragged vertically by a fraction of the
    /// viewport height per scroll unit. Scrolling up zooms in.
    pub fn on_scroll(&mut self, yoffset: f64) {
        self.camera.apply(
            CameraAction::Zoom,
            0.0,
            -self.config.scroll_zoom * yoffset,
            self.config.extent,
        );
    }

    /// Only the reset key is handled here, and only on press
    pub fn on_key(
        &mut self,
        key: Key,
        pressed: bool,
        _modifiers: Modifiers,
    ) -> Option<ControllerRequest> {
        if pressed && key == self.config.reset_key {
            Some(ControllerRequest::ResetSimulation)
        } else {
            None
        }
    }
}
