//! Frame timing. Every "per tick" constant in the game is tuned for 60 Hz, so
//! the wall-clock delta is converted into a number of 60 Hz ticks and each
//! increment is scaled by it.

/// Duration of one 60 Hz tick in milliseconds.
pub const TICK_MS: f64 = 1000.0 / 60.0;

/// Upper bound applied to a single frame delta (tab backgrounding etc.).
pub const MAX_FRAME_MS: f64 = 250.0;

/// Slack for float drift in frame-progress accumulators (0.1 summed ten times
/// is slightly below 1.0).
const PROGRESS_EPSILON: f64 = 1e-9;

/// Adds `amount` to a frame-progress accumulator. Returns true, and resets the
/// accumulator to 0, when it crosses 1.0; any excess is discarded so a single
/// call never yields more than one frame step.
pub fn advance_progress(progress: &mut f64, amount: f64) -> bool {
    *progress += amount;
    if *progress >= 1.0 - PROGRESS_EPSILON {
        *progress = 0.0;
        true
    } else {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameTime {
    /// Milliseconds elapsed since the previous tick, after clamping.
    pub elapsed_ms: f64,
    /// `elapsed_ms` expressed in 60 Hz ticks.
    pub ticks: f64,
}

impl FrameTime {
    pub fn from_elapsed_ms(elapsed_ms: f64) -> Self {
        let ms = if elapsed_ms.is_finite() { elapsed_ms.clamp(0.0, MAX_FRAME_MS) } else { 0.0 };
        Self { elapsed_ms: ms, ticks: ms / TICK_MS }
    }

    /// Exactly one 60 Hz tick.
    pub fn one_tick() -> Self {
        Self { elapsed_ms: TICK_MS, ticks: 1.0 }
    }
}

/// FrameClock turns absolute `requestAnimationFrame` timestamps into deltas.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>, // timestamp of the previous frame
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first call yields a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let elapsed = self.last_ms.map(|last| now_ms - last).unwrap_or(0.0);
        self.last_ms = Some(now_ms);
        FrameTime::from_elapsed_ms(elapsed)
    }
}
