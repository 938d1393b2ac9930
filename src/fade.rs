//! Overworld → battle transition. Alpha only ramps up; a restart is the
//! only way back to `None`.

use crate::timing::FrameTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FadePhase {
    None,
    Fading,
    Faded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fade {
    pub phase: FadePhase,
    pub alpha: f64, // 0..=255
}

impl Default for Fade {
    fn default() -> Self {
        Self { phase: FadePhase::None, alpha: 0.0 }
    }
}

impl Fade {
    /// Begins fading. Only valid from `None`; returns whether it started.
    pub fn start(&mut self) -> bool {
        if self.phase != FadePhase::None {
            return false;
        }
        self.phase = FadePhase::Fading;
        self.alpha = 0.0;
        true
    }

    pub fn started(&self) -> bool {
        self.phase != FadePhase::None
    }

    pub fn is_faded(&self) -> bool {
        self.phase == FadePhase::Faded
    }

    /// Returns true on the single tick the fade completes.
    pub fn update(&mut self, speed: f64, time: FrameTime) -> bool {
        if self.phase != FadePhase::Fading {
            return false;
        }
        self.alpha = (self.alpha + speed * time.ticks).min(255.0);
        if self.alpha >= 255.0 {
            self.phase = FadePhase::Faded;
            return true;
        }
        false
    }

    /// Opacity of the overworld layers while the transition runs.
    pub fn overworld_opacity(&self) -> f64 {
        1.0 - self.alpha / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_nothing_until_started() {
        let mut fade = Fade::default();
        assert!(!fade.update(10.0, FrameTime::one_tick()));
        assert_eq!(fade.alpha, 0.0);
        assert_eq!(fade.overworld_opacity(), 1.0);
    }

    #[test]
    fn alpha_is_monotonic_and_faded_fires_once() {
        let mut fade = Fade::default();
        assert!(fade.start());
        assert!(!fade.start(), "second start is ignored");
        let mut last = 0.0;
        let mut completions = 0;
        for _ in 0..100 {
            if fade.update(10.0, FrameTime::one_tick()) {
                completions += 1;
            }
            assert!(fade.alpha >= last);
            last = fade.alpha;
        }
        assert_eq!(completions, 1);
        assert!(fade.is_faded());
        assert_eq!(fade.alpha, 255.0);
        assert_eq!(fade.overworld_opacity(), 0.0);
    }

    #[test]
    fn faded_cannot_be_restarted() {
        let mut fade = Fade { phase: FadePhase::Faded, alpha: 255.0 };
        assert!(!fade.start());
        assert_eq!(fade.alpha, 255.0);
    }
}
