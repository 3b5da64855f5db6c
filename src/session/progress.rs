//! Progress sampling

use std::time::{Duration, Instant};

use crate::models::{format_clock, ProgressDisplay};
use crate::stream::PlaybackEngine;

/// Sampling period
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Derive the display values for `position` out of `duration`
///
/// A missing or non-positive duration is replaced by `max(position, 1)`.
pub fn compute(position: f64, duration: Option<f64>) -> ProgressDisplay {
    let position = if position.is_finite() { position.max(0.0) } else { 0.0 };
    let duration = match duration {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => position.max(1.0),
    };

    let percent = (position / duration * 100.0).floor() as u32;
    let remaining = (duration - position).max(0.0);

    ProgressDisplay {
        position,
        duration,
        percent,
        elapsed: format_clock(position),
        remaining: format!("-{}", format_clock(remaining)),
    }
}

/// Fixed-period sampler of engine position and duration
#[derive(Debug)]
pub struct ProgressPoller {
    interval: Duration,
    last_tick: Option<Instant>,
    display: ProgressDisplay,
}

impl Default for ProgressPoller {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl ProgressPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
            display: ProgressDisplay::zero(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Latest display values
    pub fn display(&self) -> &ProgressDisplay {
        &self.display
    }

    /// True when a full interval has passed since the last tick
    pub fn due(&self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Tick if due. Returns true if the display changed.
    pub fn poll(&mut self, now: Instant, engine: &dyn PlaybackEngine) -> bool {
        if !self.due(now) {
            return false;
        }
        self.last_tick = Some(now);
        self.tick(engine)
    }

    /// Sample the engine once
    ///
    /// Skipped while the engine is idle. Read failures leave the display
    /// as it was. Returns true if the display changed.
    pub fn tick(&mut self, engine: &dyn PlaybackEngine) -> bool {
        match engine.is_idle() {
            Ok(false) => {}
            Ok(true) | Err(_) => return false,
        }

        let Ok(position) = engine.time_position() else {
            return false;
        };
        let Ok(duration) = engine.duration() else {
            return false;
        };

        let display = compute(position.unwrap_or(0.0), duration);
        if display == self.display {
            return false;
        }
        self.display = display;
        true
    }

    /// Back to zero, e.g. after stop
    pub fn reset(&mut self) {
        self.display = ProgressDisplay::zero();
        self.last_tick = None;
    }
}
