use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use tracing::{error, info};

// Import from the library crate
use glide::{controller, logging, model};

use controller::{ActionAsset, FrameLoop, InputEvent, KinematicBody, MotionController};
use model::{Camera, MotionConfig, Rig, RigNode};

const TICK_RATE: f32 = 60.0;

/// One scripted input change and how long to hold the result
struct Step {
    label: &'static str,
    events: Vec<InputEvent>,
    seconds: f32,
}

fn script(config: &MotionConfig) -> Vec<Step> {
    let mv = config.actions.move_action.as_str();
    let vert = config.actions.vertical_action.as_str();
    vec![
        Step {
            label: "forward",
            events: vec![InputEvent::performed(mv, Vec2::new(0.0, 1.0))],
            seconds: 1.0,
        },
        Step {
            label: "strafe right and climb",
            events: vec![
                InputEvent::performed(mv, Vec2::new(1.0, 0.0)),
                InputEvent::performed(vert, Vec2::new(0.0, 1.0)),
            ],
            seconds: 0.5,
        },
        Step {
            label: "release",
            events: vec![InputEvent::canceled(mv), InputEvent::canceled(vert)],
            seconds: 0.5,
        },
    ]
}

fn load_config() -> Result<MotionConfig, glide::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading motion config");
            MotionConfig::load(path)
        }
        None => Ok(MotionConfig::default()),
    }
}

fn main() -> ExitCode {
    logging::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid motion config");
            return ExitCode::FAILURE;
        }
    };

    let mut actions = ActionAsset::with_default_layout(&config.actions);
    let camera = Rc::new(RefCell::new(Camera::new()));
    camera.borrow_mut().set_look_at(Vec3::new(0.0, 1.6, 10.0));
    let rig = Rig::new(KinematicBody::new(Vec3::ZERO)).with_child(RigNode::group(
        "head",
        vec![RigNode::Camera(camera.clone())],
    ));

    let steps = script(&config);
    let mut frame_loop = FrameLoop::new(MotionController::new(config));
    frame_loop.start(rig.dependencies(Some(&mut actions), None));
    if !frame_loop.controller().is_active() {
        error!(status = ?frame_loop.controller().status(), "controller is inert, nothing to simulate");
        return ExitCode::FAILURE;
    }

    let dt = 1.0 / TICK_RATE;
    for step in steps {
        for event in &step.events {
            actions.dispatch(event);
        }
        let start = rig.body.borrow().position;
        let frames = (step.seconds * TICK_RATE).round() as u32;
        for _ in 0..frames {
            frame_loop.frame(dt);
        }
        let end = rig.body.borrow().position;
        info!(
            step = step.label,
            displacement = ?(end - start),
            velocity = ?frame_loop.controller().horizontal_velocity(),
            "step finished"
        );
    }

    frame_loop.stop();
    info!(
        frames = frame_loop.frames(),
        elapsed = frame_loop.elapsed(),
        position = ?rig.body.borrow().position,
        "simulation done"
    );
    ExitCode::SUCCESS
}
