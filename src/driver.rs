//! Per-frame loop driver
//!
//! The host calls `frame(now)` once per display refresh with a timestamp in
//! seconds. Each frame runs exactly one session update with the real time
//! elapsed since the previous frame; the state machine copes with both tiny
//! and very large steps, so nothing is banked or dropped.

use crate::session::{RenderSnapshot, Session};
use crate::sim::TickInput;

pub struct SessionDriver {
    session: Session,
    last_time: Option<f64>,
}

impl SessionDriver {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            last_time: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn set_input(&mut self, input: TickInput) {
        self.session.set_input(input);
    }

    /// Seconds since the previous frame: 0 on the first frame, never
    /// negative, 0 for a clock that is not a number
    fn frame_dt(&mut self, now: f64) -> f32 {
        let dt = match self.last_time {
            Some(prev) => (now - prev) as f32,
            None => 0.0,
        };
        self.last_time = Some(now);
        if dt.is_finite() { dt.max(0.0) } else { 0.0 }
    }

    /// Advance to `now` (seconds) and return the frame to draw
    pub fn frame(&mut self, now: f64) -> RenderSnapshot {
        let dt = self.frame_dt(now);
        self.session.update(dt);
        self.session.snapshot()
    }
}
