//! Frame time and scheduled events.
//!
//! Session time is accumulated in `f64` so long sessions and many small
//! deltas do not drift the timer deadlines.  Timers never call back into the
//! simulation: the game loop drains whatever is due right after advancing the
//! clock, before any other work for that frame.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ClockError {
    #[error("frame delta is not finite: {0}")]
    NonFinite(f32),
    #[error("frame delta is negative: {0}")]
    Negative(f32),
}

/// Shortest period a repeating timer may have, in seconds.
pub const MIN_REPEAT_INTERVAL: f64 = 0.001;

/// Most events one repeating timer yields from a single drain.
pub const MAX_CATCH_UP: u64 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    ReloadComplete,
    SpawnTick,
}

#[derive(Clone, Debug)]
struct Scheduled {
    due: f64,
    /// `Some` for repeating timers.
    every: Option<f64>,
    event: TimerEvent,
}

#[derive(Clone, Debug, Default)]
pub struct SimulationClock {
    now: f64,
    delta: f32,
    frames: u64,
    timers: Vec<Scheduled>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by one frame.  The delta must be finite and
    /// non-negative; a rejected delta leaves the clock untouched.
    pub fn advance(&mut self, dt: f32) -> Result<f32, ClockError> {
        if !dt.is_finite() {
            return Err(ClockError::NonFinite(dt));
        }
        if dt < 0.0 {
            return Err(ClockError::Negative(dt));
        }
        self.now += dt as f64;
        self.delta = dt;
        self.frames += 1;
        Ok(dt)
    }

    /// Seconds since the session started.
    pub fn elapsed(&self) -> f64 {
        self.now
    }

    /// Delta of the most recent frame.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn schedule_once(&mut self, delay: f32, event: TimerEvent) {
        self.timers.push(Scheduled {
            due: self.now + delay as f64,
            every: None,
            event,
        });
    }

    /// Fire `event` every `interval` seconds, first one `interval` from now.
    /// Intervals shorter than [`MIN_REPEAT_INTERVAL`] (zero, negative, NaN)
    /// are raised to it.
    pub fn schedule_repeating(&mut self, interval: f32, event: TimerEvent) {
        let every = (interval as f64).max(MIN_REPEAT_INTERVAL);
        self.timers.push(Scheduled {
            due: self.now + every,
            every: Some(every),
            event,
        });
    }

    pub fn is_scheduled(&self, event: TimerEvent) -> bool {
        self.timers.iter().any(|t| t.event == event)
    }

    /// Remove and return every event due at the current time, earliest first.
    /// A repeating timer that fell several intervals behind yields once per
    /// missed interval, up to [`MAX_CATCH_UP`]; the rest are skipped.
    pub fn drain_due(&mut self) -> Vec<TimerEvent> {
        let mut due: Vec<(f64, TimerEvent)> = Vec::new();
        let now = self.now;

        self.timers.retain_mut(|t| {
            if t.due > now {
                return true;
            }
            let Some(every) = t.every else {
                due.push((t.due, t.event));
                return false;
            };
            let missed = ((now - t.due) / every).floor() as u64 + 1;
            for k in 0..missed.min(MAX_CATCH_UP) {
                due.push((t.due + k as f64 * every, t.event));
            }
            t.due += missed as f64 * every;
            true
        });

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, e)| e).collect()
    }
}
