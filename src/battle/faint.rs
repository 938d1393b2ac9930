//! Knockout after the attack pulse: the wild HP bar drains, the creature
//! cries, drops out of view and the dialog reports the faint.

use crate::config::BattleConfig;
use crate::effects::{Effects, Sfx};
use crate::timing::FrameTime;

const HP_FULL: (f64, f64, f64) = (112.0, 248.0, 168.0); // #70f8a8
const HP_EMPTY: (f64, f64, f64) = (248.0, 88.0, 56.0); // #f85838

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FaintPhase {
    Standing,
    Draining { elapsed_ms: f64 },
    Pausing { elapsed_ms: f64 },
    Falling { elapsed_ms: f64 },
    Fainted { elapsed_ms: f64 },
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Knockout {
    pub phase: FaintPhase,
}

impl Default for Knockout {
    fn default() -> Self {
        Self { phase: FaintPhase::Standing }
    }
}

impl Knockout {
    /// Starts the drain; false once it has already run.
    pub fn start(&mut self) -> bool {
        if self.phase != FaintPhase::Standing {
            return false;
        }
        log::info!("wild creature hit, HP draining");
        self.phase = FaintPhase::Draining { elapsed_ms: 0.0 };
        true
    }

    pub fn started(&self) -> bool {
        self.phase != FaintPhase::Standing
    }

    pub fn has_fainted(&self) -> bool {
        matches!(self.phase, FaintPhase::Fainted { .. } | FaintPhase::Done)
    }

    pub fn update(&mut self, cfg: &BattleConfig, time: FrameTime) -> Effects {
        let mut fx = Effects::new();
        let ms = time.elapsed_ms;
        self.phase = match self.phase {
            FaintPhase::Draining { elapsed_ms } if elapsed_ms + ms >= cfg.hp_drain_ms => {
                fx.sound(Sfx::WildCry);
                FaintPhase::Pausing { elapsed_ms: 0.0 }
            }
            FaintPhase::Draining { elapsed_ms } => FaintPhase::Draining { elapsed_ms: elapsed_ms + ms },
            FaintPhase::Pausing { elapsed_ms } if elapsed_ms + ms >= cfg.faint_pause_ms => {
                FaintPhase::Falling { elapsed_ms: 0.0 }
            }
            FaintPhase::Pausing { elapsed_ms } => FaintPhase::Pausing { elapsed_ms: elapsed_ms + ms },
            FaintPhase::Falling { elapsed_ms } if elapsed_ms + ms >= cfg.faint_fall_ms => {
                log::info!("wild creature fainted");
                fx.sound(Sfx::Confirm);
                FaintPhase::Fainted { elapsed_ms: 0.0 }
            }
            FaintPhase::Falling { elapsed_ms } => FaintPhase::Falling { elapsed_ms: elapsed_ms + ms },
            FaintPhase::Fainted { elapsed_ms } if elapsed_ms + ms >= cfg.fainted_caption_ms => FaintPhase::Done,
            FaintPhase::Fainted { elapsed_ms } => FaintPhase::Fainted { elapsed_ms: elapsed_ms + ms },
            phase => phase,
        };
        fx
    }

    /// Drain progress in 0..=1.
    fn drained(&self, cfg: &BattleConfig) -> f64 {
        match self.phase {
            FaintPhase::Standing => 0.0,
            FaintPhase::Draining { elapsed_ms } => (elapsed_ms / cfg.hp_drain_ms).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Width of the wild HP bar.
    pub fn hp_width(&self, cfg: &BattleConfig) -> f64 {
        cfg.hp_bar_w * (1.0 - self.drained(cfg))
    }

    /// Bar colour shifts from green to red while draining.
    pub fn hp_color(&self, cfg: &BattleConfig) -> String {
        let t = self.drained(cfg);
        let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            lerp(HP_FULL.0, HP_EMPTY.0),
            lerp(HP_FULL.1, HP_EMPTY.1),
            lerp(HP_FULL.2, HP_EMPTY.2)
        )
    }

    /// Downward offset and alpha (0..=255) of the wild battler.
    pub fn fall(&self, cfg: &BattleConfig) -> (f64, f64) {
        let t = match self.phase {
            FaintPhase::Falling { elapsed_ms } => (elapsed_ms / cfg.faint_fall_ms).clamp(0.0, 1.0),
            FaintPhase::Fainted { .. } | FaintPhase::Done => 1.0,
            _ => 0.0,
        };
        (cfg.faint_fall_distance * t, 255.0 * (1.0 - t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ko: &mut Knockout, cfg: &BattleConfig, ms: f64) -> Effects {
        let mut fx = Effects::new();
        let mut left = ms;
        while left > 0.0 {
            let step = left.min(100.0);
            fx.extend(ko.update(cfg, FrameTime::from_elapsed_ms(step)));
            left -= step;
        }
        fx
    }

    #[test]
    fn standing_until_started() {
        let cfg = BattleConfig::default();
        let mut ko = Knockout::default();
        assert!(run(&mut ko, &cfg, 5000.0).is_empty());
        assert_eq!(ko.hp_width(&cfg), 96.0);
        assert_eq!(ko.hp_color(&cfg), "#70f8a8");
        assert_eq!(ko.fall(&cfg), (0.0, 255.0));
        assert!(ko.start());
        assert!(!ko.start(), "runs once");
    }

    #[test]
    fn hp_drains_linearly_then_cries() {
        let cfg = BattleConfig::default();
        let mut ko = Knockout::default();
        ko.start();
        let fx = run(&mut ko, &cfg, 1000.0);
        assert!(fx.is_empty());
        assert!((ko.hp_width(&cfg) - 48.0).abs() < 1e-9, "half drained after half the time");
        let fx = run(&mut ko, &cfg, 1000.0);
        assert_eq!(fx.count_sound(Sfx::WildCry), 1);
        assert_eq!(ko.hp_width(&cfg), 0.0);
        assert_eq!(ko.hp_color(&cfg), "#f85838");
        assert_eq!(ko.phase, FaintPhase::Pausing { elapsed_ms: 0.0 });
    }

    #[test]
    fn creature_falls_after_the_pause() {
        let cfg = BattleConfig::default();
        let mut ko = Knockout::default();
        ko.start();
        run(&mut ko, &cfg, 2000.0 + 400.0);
        assert_eq!(ko.fall(&cfg), (0.0, 255.0), "still paused");
        run(&mut ko, &cfg, 100.0 + 500.0);
        let (dy, alpha) = ko.fall(&cfg);
        assert!((dy - 20.0).abs() < 1e-9);
        assert!((alpha - 127.5).abs() < 1e-9);
        assert!(!ko.has_fainted());
    }

    #[test]
    fn fainted_caption_follows_the_fall() {
        let cfg = BattleConfig::default();
        let mut ko = Knockout::default();
        ko.start();
        let fx = run(&mut ko, &cfg, 2000.0 + 500.0 + 1000.0);
        assert!(ko.has_fainted());
        assert_eq!(fx.count_sound(Sfx::Confirm), 1);
        assert_eq!(ko.fall(&cfg), (40.0, 0.0));
        run(&mut ko, &cfg, 1000.0);
        assert_eq!(ko.phase, FaintPhase::Done);
        assert!(ko.has_fainted(), "caption stays up");
    }
}
