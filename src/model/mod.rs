// MODEL: Configuration, camera orientation and the character rig
pub mod camera;
pub mod config;
pub mod rig;

pub use camera::{Camera, FixedOrientation, OrientationFrame, OrientationSource};
pub use config::{ActionNames, MotionConfig};
pub use rig::{Rig, RigNode};
