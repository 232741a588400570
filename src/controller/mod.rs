// CONTROLLER: Input, locomotion and the update loop
pub mod input;
pub mod motion;
pub mod physics;
pub mod frame_loop;

pub use input::{ActionAsset, ActionMap, ActionSubscription, InputEvent, InputPhase, InputState, KeyBindings, KeyboardStick};
pub use motion::{CharacterBody, ControllerStatus, Dependencies, MotionController};
pub use physics::{Aabb, CollisionFlags, KinematicBody};
pub use frame_loop::FrameLoop;
