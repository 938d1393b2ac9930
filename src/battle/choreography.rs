//! Sequencing after the panels dock: trainer throw, partner reveal and the
//! caption cross-fade that ends with the menu.

use crate::battle::panels::{BattlePanels, PanelId};
use crate::config::BattleConfig;
use crate::effects::{Effects, Sfx};
use crate::timing::{FrameTime, advance_progress};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrainerPhase {
    Waiting,
    Throwing,
    SlidingOut,
    Gone,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainerThrow {
    pub phase: TrainerPhase,
    pub frame: u32,
    progress: f64,
}

impl Default for TrainerThrow {
    fn default() -> Self {
        Self { phase: TrainerPhase::Waiting, frame: 0, progress: 0.0 }
    }
}

impl TrainerThrow {
    /// Returns true on the tick the ball is thrown. Panels must already have
    /// been stepped for this tick.
    pub fn update(&mut self, panels: &mut BattlePanels, cfg: &BattleConfig, time: FrameTime, fx: &mut Effects) -> bool {
        match self.phase {
            TrainerPhase::Waiting => {
                if panels.gate.all_docked() {
                    log::debug!("battle panels docked, trainer throwing");
                    self.phase = TrainerPhase::Throwing;
                }
                false
            }
            TrainerPhase::Throwing => {
                let last = cfg.trainer_frames.max(1) - 1;
                if self.frame < last && advance_progress(&mut self.progress, cfg.trainer_anim_speed * time.ticks) {
                    self.frame += 1;
                }
                if self.frame < last {
                    return false;
                }
                fx.sound(Sfx::BallToss);
                panels.get_mut(PanelId::Partner).visible = true;
                panels.get_mut(PanelId::Trainer).retarget(-cfg.trainer_w, cfg.slide_speed);
                self.phase = TrainerPhase::SlidingOut;
                true
            }
            TrainerPhase::SlidingOut => {
                let trainer = panels.get_mut(PanelId::Trainer);
                let total = trainer.distance();
                let remaining = (trainer.target - trainer.pos).abs();
                trainer.alpha = if total > 0.0 { 255.0 * remaining / total } else { 0.0 };
                if trainer.docked {
                    trainer.visible = false;
                    self.phase = TrainerPhase::Gone;
                }
                false
            }
            TrainerPhase::Gone => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptionPhase {
    First,
    Transitioning,
    Second,
}

/// Outgoing caption fades to 0, only then the incoming one fades to 255.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptionFade {
    pub phase: CaptionPhase,
    pub outgoing: f64,
    pub incoming: f64,
    started: bool,
}

impl Default for CaptionFade {
    fn default() -> Self {
        Self { phase: CaptionPhase::First, outgoing: 255.0, incoming: 0.0, started: false }
    }
}

impl CaptionFade {
    pub fn begin(&mut self) {
        if self.phase == CaptionPhase::First && !self.started {
            self.started = true;
            self.phase = CaptionPhase::Transitioning;
        }
    }

    /// Returns true on the tick the incoming caption is fully shown.
    pub fn update(&mut self, speed: f64, time: FrameTime) -> bool {
        if self.phase != CaptionPhase::Transitioning {
            return false;
        }
        let step = speed * time.ticks;
        if self.outgoing > 0.0 {
            self.outgoing = (self.outgoing - step).max(0.0);
            return false;
        }
        self.incoming = (self.incoming + step).min(255.0);
        if self.incoming >= 255.0 {
            self.phase = CaptionPhase::Second;
            return true;
        }
        false
    }
}

/// Looping idle animation for the battle creatures.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopAnim {
    pub frame: u32,
    progress: f64,
}

impl LoopAnim {
    pub fn advance(&mut self, frames: u32, speed: f64, time: FrameTime) {
        if advance_progress(&mut self.progress, speed * time.ticks) {
            self.frame = (self.frame + 1) % frames.max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn docked_panels() -> BattlePanels {
        let mut panels = BattlePanels::new(&BattleConfig::default(), &WorldConfig::default());
        panels.reveal(8.0);
        for _ in 0..60 {
            panels.update(FrameTime::one_tick());
        }
        panels
    }

    #[test]
    fn trainer_waits_for_the_gate() {
        let cfg = BattleConfig::default();
        let mut panels = BattlePanels::new(&cfg, &WorldConfig::default());
        panels.reveal(8.0);
        let mut trainer = TrainerThrow::default();
        let mut fx = Effects::new();
        for _ in 0..59 {
            panels.update(FrameTime::one_tick());
            trainer.update(&mut panels, &cfg, FrameTime::one_tick(), &mut fx);
            assert_eq!(trainer.phase, TrainerPhase::Waiting);
        }
        panels.update(FrameTime::one_tick());
        trainer.update(&mut panels, &cfg, FrameTime::one_tick(), &mut fx);
        assert_eq!(trainer.phase, TrainerPhase::Throwing);
    }

    #[test]
    fn throw_reveals_partner_and_trainer_fades_out() {
        let cfg = BattleConfig::default();
        let mut panels = docked_panels();
        let mut trainer = TrainerThrow::default();
        let mut fx = Effects::new();
        let mut throws = 0;
        for _ in 0..200 {
            panels.update(FrameTime::one_tick());
            if trainer.update(&mut panels, &cfg, FrameTime::one_tick(), &mut fx) {
                throws += 1;
                assert!(panels.get(PanelId::Partner).visible);
            }
            if trainer.phase == TrainerPhase::SlidingOut {
                let alpha = panels.get(PanelId::Trainer).alpha;
                assert!((0.0..=255.0).contains(&alpha));
            }
        }
        assert_eq!(throws, 1);
        assert_eq!(fx.count_sound(Sfx::BallToss), 1);
        assert_eq!(trainer.frame, cfg.trainer_frames - 1);
        assert_eq!(trainer.phase, TrainerPhase::Gone);
        assert!(!panels.get(PanelId::Trainer).visible);
    }

    #[test]
    fn captions_cross_fade_in_sequence() {
        let mut caption = CaptionFade::default();
        assert!(!caption.update(5.0, FrameTime::one_tick()), "nothing before begin");
        caption.begin();
        let mut revealed = 0;
        for _ in 0..200 {
            let out_before = caption.outgoing;
            if caption.update(5.0, FrameTime::one_tick()) {
                revealed += 1;
            }
            if caption.incoming > 0.0 {
                assert_eq!(out_before, 0.0, "incoming rose before outgoing reached 0");
            }
        }
        assert_eq!(revealed, 1);
        assert_eq!(caption.phase, CaptionPhase::Second);
        assert_eq!((caption.outgoing, caption.incoming), (0.0, 255.0));
    }

    #[test]
    fn loop_anim_wraps() {
        let mut anim = LoopAnim::default();
        for _ in 0..(3 * 5) {
            anim.advance(3, 0.4, FrameTime::one_tick());
        }
        assert_eq!(anim.frame, 2, "0.4 per tick steps every 3 ticks: 5 steps mod 3");
    }
}
