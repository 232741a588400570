use std::cell::RefCell;

use glam::Vec3;

use crate::utils::flatten_horizontal;

/// Anything that can tell the controller where "forward" and "right" point
/// in world space. Read fresh every tick.
pub trait OrientationSource {
    fn forward(&self) -> Vec3;
    fn right(&self) -> Vec3;
}

// Lets a shared `Rc<RefCell<Camera>>` be handed out while the host keeps steering it
impl<T: OrientationSource> OrientationSource for RefCell<T> {
    fn forward(&self) -> Vec3 {
        self.borrow().forward()
    }

    fn right(&self) -> Vec3 {
        self.borrow().right()
    }
}

pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.6, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            up: Vec3::Y,
        }
    }

    pub fn target(&self) -> Vec3 { self.eye + OrientationSource::forward(self) }

    pub fn set_look_at(&mut self, target: Vec3) {
        let dir = (target - self.eye).normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.asin().clamp(-1.4, 1.4);
    }

    /// Apply a look delta (radians), keeping pitch short of straight up/down
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        let pi_half = std::f32::consts::PI / 2.0;
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-pi_half, pi_half);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationSource for Camera {
    fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-1.5533, 1.5533); // Slightly less than π/2 to avoid gimbal lock
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    fn right(&self) -> Vec3 {
        OrientationSource::forward(self).cross(self.up).normalize_or_zero()
    }
}

/// A fixed basis, for hosts that already track their own view axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedOrientation {
    pub forward: Vec3,
    pub right: Vec3,
}

impl FixedOrientation {
    pub fn new(forward: Vec3, right: Vec3) -> Self {
        Self { forward, right }
    }

    /// forward = +Z, right = +X
    pub fn axis_aligned() -> Self {
        Self::new(Vec3::Z, Vec3::X)
    }
}

impl OrientationSource for FixedOrientation {
    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn right(&self) -> Vec3 {
        self.right
    }
}

/// Camera axes flattened onto the horizontal plane for one tick.
/// Both axes are unit length with `y == 0`, or zero when the source axis was vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationFrame {
    pub forward: Vec3,
    pub right: Vec3,
}

impl OrientationFrame {
    pub fn from_source(source: &dyn OrientationSource) -> Self {
        Self {
            forward: flatten_horizontal(source.forward()),
            right: flatten_horizontal(source.right()),
        }
    }

    /// Map a stick value onto world-space horizontal directions
    pub fn map_stick(&self, x: f32, y: f32) -> Vec3 {
        self.right * x + self.forward * y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_flattens_pitched_camera() {
        let mut cam = Camera::new();
        cam.yaw = std::f32::consts::FRAC_PI_2; // looking down +Z
        cam.pitch = -0.7;

        let frame = OrientationFrame::from_source(&cam);
        assert_eq!(frame.forward.y, 0.0);
        assert!((frame.forward - Vec3::Z).length() < 1e-5);
        assert!((frame.right.length() - 1.0).abs() < 1e-5);
        assert!(frame.forward.dot(frame.right).abs() < 1e-5);
    }

    #[test]
    fn test_frame_from_vertical_axis_is_zero() {
        let source = FixedOrientation::new(Vec3::NEG_Y, Vec3::X);
        let frame = OrientationFrame::from_source(&source);
        assert_eq!(frame.forward, Vec3::ZERO);
        assert_eq!(frame.right, Vec3::X);
    }

    #[test]
    fn test_refcell_source_reads_current_camera() {
        let cam = RefCell::new(Camera::new());
        let before = OrientationSource::forward(&cam);
        cam.borrow_mut().rotate(std::f32::consts::PI, 0.0);
        let after = OrientationSource::forward(&cam);
        assert!((before + after).length() < 1e-5);
    }

    #[test]
    fn test_set_look_at() {
        let mut cam = Camera::new();
        cam.set_look_at(cam.eye + Vec3::new(0.0, 0.0, 5.0));
        assert!((OrientationSource::forward(&cam) - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_map_stick_axis_aligned() {
        let frame = OrientationFrame::from_source(&FixedOrientation::axis_aligned());
        assert_eq!(frame.map_stick(1.0, 0.0), Vec3::X);
        assert_eq!(frame.map_stick(0.0, 1.0), Vec3::Z);
    }
}
