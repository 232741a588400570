use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;
use tracing::{debug, error, info, trace, warn};

use crate::controller::input::{ActionAsset, ActionSubscription, Channel, InputState};
use crate::error::InitError;
use crate::model::{MotionConfig, OrientationFrame, OrientationSource};
use crate::utils::{clamp_axis, move_toward};

/// Speed margin the target must exceed before the acceleration rate is used.
/// Keeps the rate from flickering between accel and decel near equal speeds.
pub const ACCELERATION_HYSTERESIS: f32 = 0.001;

/// Collision-resolving mover that receives one displacement per tick
pub trait CharacterBody {
    fn move_by(&mut self, displacement: Vec3);
}

/// Collaborators injected at initialization. Body and orientation are only
/// borrowed: the controller keeps weak handles and never extends their lifetime.
#[derive(Default)]
pub struct Dependencies<'a> {
    body: Option<Weak<RefCell<dyn CharacterBody>>>,
    actions: Option<&'a mut ActionAsset>,
    orientation: Option<Weak<dyn OrientationSource>>,
}

impl<'a> Dependencies<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body<B: CharacterBody + 'static>(mut self, body: &Rc<RefCell<B>>) -> Self {
        let body: Rc<RefCell<dyn CharacterBody>> = body.clone();
        self.body = Some(Rc::downgrade(&body));
        self
    }

    pub fn with_actions(mut self, actions: &'a mut ActionAsset) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn with_orientation<O: OrientationSource + 'static>(mut self, source: &Rc<O>) -> Self {
        let source: Rc<dyn OrientationSource> = source.clone();
        self.orientation = Some(Rc::downgrade(&source));
        self
    }

    pub fn has_orientation(&self) -> bool {
        self.orientation.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerStatus {
    Uninitialized,
    Active,
    /// Every tick is a no-op; the error says which dependency was missing
    Inert(InitError),
    ShutDown,
}

/// Turns stick input and a camera basis into one world-space displacement per tick
pub struct MotionController {
    config: MotionConfig,
    status: ControllerStatus,
    input: InputState,
    move_sub: Option<ActionSubscription>,
    vertical_sub: Option<ActionSubscription>,
    body: Option<Weak<RefCell<dyn CharacterBody>>>,
    orientation: Option<Weak<dyn OrientationSource>>,
    // Smoothed horizontal velocity in world space (xz plane)
    horizontal_velocity: Vec3,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            status: ControllerStatus::Uninitialized,
            input: InputState::new(),
            move_sub: None,
            vertical_sub: None,
            body: None,
            orientation: None,
            horizontal_velocity: Vec3::ZERO,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ControllerStatus::Active
    }

    pub fn input_state(&self) -> InputState {
        self.input
    }

    pub fn horizontal_velocity(&self) -> Vec3 {
        self.horizontal_velocity
    }

    /// Resolve collaborators and subscribe to the stick channels. Runs once;
    /// a missing dependency leaves the controller inert instead of failing.
    pub fn initialize(&mut self, deps: Dependencies<'_>) {
        if self.status != ControllerStatus::Uninitialized {
            warn!(status = ?self.status, "motion controller already initialized, ignoring");
            return;
        }

        match self.resolve(deps) {
            Ok(()) => {
                info!(
                    horizontal_speed = self.config.horizontal_speed,
                    vertical_speed = self.config.vertical_speed(),
                    acceleration = self.config.acceleration,
                    deceleration = self.config.deceleration,
                    "motion controller active"
                );
                self.status = ControllerStatus::Active;
            }
            Err(err) => {
                match err {
                    InitError::MissingOrientation => warn!("{err}"),
                    _ => error!("{err}"),
                }
                self.disconnect();
                self.status = ControllerStatus::Inert(err);
            }
        }
    }

    fn resolve(&mut self, deps: Dependencies<'_>) -> Result<(), InitError> {
        let body = deps.body.ok_or(InitError::MissingBody)?;
        let asset = deps.actions.ok_or(InitError::MissingActions)?;

        let names = &self.config.actions;
        let map = asset
            .find_map_mut(&names.map)
            .ok_or_else(|| InitError::MissingActionMap(names.map.clone()))?;
        map.enable();

        self.move_sub = map.subscribe(&names.move_action);
        if self.move_sub.is_none() {
            warn!(action = %names.move_action, map = %names.map, "action not found, horizontal movement disabled");
        }
        self.vertical_sub = map.subscribe(&names.vertical_action);
        if self.vertical_sub.is_none() {
            warn!(action = %names.vertical_action, map = %names.map, "action not found, vertical movement disabled");
        }

        self.body = Some(body);
        self.orientation = Some(deps.orientation.ok_or(InitError::MissingOrientation)?);
        Ok(())
    }

    /// Advance one simulation step and hand the displacement to the body
    pub fn tick(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }

        let Some(body) = self.body.as_ref().and_then(|b| b.upgrade()) else {
            self.go_inert(InitError::BodyDropped);
            return;
        };
        let Some(orientation) = self.orientation.as_ref().and_then(|o| o.upgrade()) else {
            self.go_inert(InitError::OrientationDropped);
            return;
        };

        self.poll_input();
        let frame = OrientationFrame::from_source(orientation.as_ref());
        let displacement = self.step(&frame, dt);

        trace!(
            velocity = ?self.horizontal_velocity,
            ?displacement,
            dt,
            "motion tick"
        );
        body.borrow_mut().move_by(displacement);
    }

    /// Release the input subscriptions and the borrowed collaborators.
    /// After this no input event can reach the controller.
    pub fn shutdown(&mut self) {
        if self.status == ControllerStatus::ShutDown {
            return;
        }
        self.disconnect();
        self.status = ControllerStatus::ShutDown;
        info!("motion controller shut down");
    }

    /// Camera-relative target velocity for the current stick value
    pub fn desired_horizontal_velocity(&self, frame: &OrientationFrame) -> Vec3 {
        let stick = self.input.move_axis;
        frame.map_stick(stick.x, stick.y) * self.config.horizontal_speed
    }

    fn step(&mut self, frame: &OrientationFrame, dt: f32) -> Vec3 {
        let vertical_input = clamp_axis(self.input.vertical_axis.y);
        let vertical_speed = self.config.vertical_speed();

        let desired = self.desired_horizontal_velocity(frame);
        let accelerating = is_accelerating(self.horizontal_velocity.length(), desired.length());
        let rate = if accelerating {
            self.config.acceleration
        } else {
            self.config.deceleration
        };

        self.horizontal_velocity = move_toward(self.horizontal_velocity, desired, rate * dt);

        (self.horizontal_velocity + Vec3::Y * vertical_input * vertical_speed) * dt
    }

    fn poll_input(&mut self) {
        if let Some(sub) = &self.move_sub {
            for phase in sub.drain() {
                debug!(?phase, "move");
                self.input.apply(Channel::Move, phase);
            }
        }
        if let Some(sub) = &self.vertical_sub {
            for phase in sub.drain() {
                debug!(?phase, "vertical move");
                self.input.apply(Channel::Vertical, phase);
            }
        }
    }

    fn go_inert(&mut self, err: InitError) {
        warn!("{err}, motion controller disabled");
        self.disconnect();
        self.status = ControllerStatus::Inert(err);
    }

    fn disconnect(&mut self) {
        self.move_sub = None;
        self.vertical_sub = None;
        self.body = None;
        self.orientation = None;
    }
}

/// Equal speeds (within the hysteresis band) count as decelerating
pub fn is_accelerating(current_speed: f32, desired_speed: f32) -> bool {
    desired_speed > current_speed + ACCELERATION_HYSTERESIS
}
