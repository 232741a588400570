// Re-export all public modules so they can be used from main.rs
pub mod error;
pub mod logging;
pub mod utils;

// MVC Architecture
pub mod model;
pub mod controller;

pub use controller::{CharacterBody, ControllerStatus, Dependencies, FrameLoop, MotionController};
pub use error::{ConfigError, InitError};
pub use model::{MotionConfig, OrientationSource};

#[cfg(target_arch = "wasm32")]
pub mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;
    use wasm_bindgen::prelude::wasm_bindgen;
    use web_sys::KeyboardEvent;

    use crate::controller::input::wasm::keyboard_event_to_input;
    use crate::controller::{ActionAsset, FrameLoop, InputEvent, KeyBindings, KeyboardStick, KinematicBody, MotionController};
    use crate::model::{Camera, MotionConfig, Rig, RigNode};

    const MOUSE_SENSITIVITY: f32 = 0.002;

    #[wasm_bindgen(start)]
    pub fn start() {
        crate::logging::init();
    }

    /// Browser-facing wrapper: keyboard drives the stick channels, the
    /// page's animation clock drives the frame loop
    #[wasm_bindgen]
    pub struct WebLocomotion {
        frame_loop: FrameLoop,
        actions: ActionAsset,
        stick: KeyboardStick,
        rig: Rig,
        camera: Rc<RefCell<Camera>>,
    }

    #[wasm_bindgen]
    impl WebLocomotion {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebLocomotion {
            let config = MotionConfig::default();
            let mut actions = ActionAsset::with_default_layout(&config.actions);
            let stick = KeyboardStick::new(KeyBindings::default(), config.actions.clone());

            let camera = Rc::new(RefCell::new(Camera::new()));
            let rig = Rig::new(KinematicBody::new(Vec3::ZERO))
                .with_child(RigNode::Camera(camera.clone()));

            let mut frame_loop = FrameLoop::new(MotionController::new(config));
            frame_loop.start(rig.dependencies(Some(&mut actions), None));

            WebLocomotion { frame_loop, actions, stick, rig, camera }
        }

        pub fn key_event(&mut self, e: &KeyboardEvent, is_down: bool) {
            for event in keyboard_event_to_input(&mut self.stick, e, is_down) {
                self.actions.dispatch(&event);
            }
        }

        pub fn focus_lost(&mut self) {
            self.stick.clear_keys();
            self.actions.dispatch(&InputEvent::FocusLost);
        }

        pub fn look(&mut self, dx: f32, dy: f32) {
            self.camera
                .borrow_mut()
                .rotate(dx * MOUSE_SENSITIVITY, -dy * MOUSE_SENSITIVITY);
        }

        /// `now_ms` as reported by `performance.now()`
        pub fn frame(&mut self, now_ms: f64) {
            self.frame_loop.frame_at(now_ms / 1000.0);
            let pos = self.rig.body.borrow().position;
            self.camera.borrow_mut().eye = pos + Vec3::new(0.0, 1.6, 0.0);
        }

        pub fn position(&self) -> Vec<f32> {
            self.rig.body.borrow().position.to_array().to_vec()
        }
    }

    impl Drop for WebLocomotion {
        fn drop(&mut self) {
            self.frame_loop.stop();
        }
    }
}
