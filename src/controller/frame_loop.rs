use tracing::{debug, info, warn};

use crate::controller::motion::{Dependencies, MotionController};

/// Largest step handed to the controller; longer stalls are cut short
pub const DEFAULT_MAX_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Host-side driver: initialize once, then tick per frame, then shut down once
pub struct FrameLoop {
    controller: MotionController,
    state: LoopState,
    max_dt: f32,
    last_time: Option<f64>,
    frames: u64,
    elapsed: f64,
}

impl FrameLoop {
    pub fn new(controller: MotionController) -> Self {
        Self::with_max_dt(controller, DEFAULT_MAX_DT)
    }

    pub fn with_max_dt(controller: MotionController, max_dt: f32) -> Self {
        Self {
            controller,
            state: LoopState::Idle,
            max_dt,
            last_time: None,
            frames: 0,
            elapsed: 0.0,
        }
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds handed to the controller so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn start(&mut self, deps: Dependencies<'_>) {
        if self.state != LoopState::Idle {
            warn!(state = ?self.state, "frame loop already started");
            return;
        }
        self.controller.initialize(deps);
        self.state = LoopState::Running;
        info!(status = ?self.controller.status(), "frame loop started");
    }

    /// Run one frame with an explicit step (seconds), clamped to `[0, max_dt]`
    pub fn frame(&mut self, dt: f32) {
        if self.state != LoopState::Running {
            return;
        }
        let dt = dt.clamp(0.0, self.max_dt);
        self.controller.tick(dt);
        self.frames += 1;
        self.elapsed += dt as f64;
    }

    /// Run one frame from a host clock reading in seconds. The first reading
    /// only establishes the time base.
    pub fn frame_at(&mut self, now: f64) {
        if self.state != LoopState::Running {
            return;
        }
        let Some(last) = self.last_time.replace(now) else {
            debug!(now, "frame loop clock started");
            return;
        };
        self.frame((now - last) as f32);
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.controller.shutdown();
        self.state = LoopState::Stopped;
        info!(frames = self.frames, elapsed = self.elapsed, "frame loop stopped");
    }
}
