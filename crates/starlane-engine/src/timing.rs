//! Real-time pacing for the fixed-step loop.

use std::time::{Duration, Instant};

/// Most fixed steps run for one frame. A longer backlog is dropped.
pub const MAX_STEPS_PER_FRAME: u32 = 10;

/// Wall-clock gaps longer than this (a stall or a debugger pause) are clipped.
const MAX_FRAME_GAP: Duration = Duration::from_millis(250);

/// Converts wall-clock time into whole fixed steps and sleeps out the rest
/// of each frame.
#[derive(Debug)]
pub struct FramePacer {
    frame_budget: Duration,
    step: Duration,
    frame_start: Instant,
    backlog: Duration,
}

impl FramePacer {
    /// Paces `target_fps` frames per second with steps of `fixed_dt` seconds.
    #[must_use]
    pub fn new(target_fps: u32, fixed_dt: f32) -> Self {
        Self {
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            step: Duration::from_secs_f32(fixed_dt.max(0.001)),
            frame_start: Instant::now(),
            backlog: Duration::ZERO,
        }
    }

    /// Starts a frame and returns how many fixed steps are due.
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        self.backlog += (now - self.frame_start).min(MAX_FRAME_GAP);
        self.frame_start = now;

        let due = (self.backlog.as_nanos() / self.step.as_nanos())
            .min(u128::from(MAX_STEPS_PER_FRAME)) as u32;
        if due == MAX_STEPS_PER_FRAME {
            self.backlog = Duration::ZERO;
        } else {
            self.backlog -= self.step * due;
        }
        due
    }

    /// Sleeps until the frame budget is spent.
    pub fn finish_frame(&self) {
        if let Some(rest) = self.frame_budget.checked_sub(self.frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
