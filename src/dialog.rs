//! "Wants to battle" dialog: slides up once the cry has finished, holds, then
//! kicks off the fade and slides back out.

use crate::config::DialogConfig;
use crate::effects::{Effects, Sfx};
use crate::encounter::Encounter;
use crate::fade::Fade;
use crate::timing::FrameTime;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dialog {
    pub visible: bool,
    pub slide_y: f64,
    pub fully_visible: bool,
    pub text: String,
    pub pause_ms: f64,
    arrived: bool, // arrival sound already played
}

impl Dialog {
    pub fn target_y(cfg: &DialogConfig, viewport_h: f64) -> f64 {
        viewport_h - cfg.height
    }

    pub fn update(
        &mut self,
        enc: &Encounter,
        fade: &mut Fade,
        cfg: &DialogConfig,
        viewport_h: f64,
        time: FrameTime,
    ) -> Effects {
        let mut fx = Effects::new();
        let target = Self::target_y(cfg, viewport_h);
        let step = cfg.slide_speed * time.ticks;

        if enc.animation_complete && enc.cry_finished() && !self.visible && !fade.started() {
            self.visible = true;
            self.slide_y = viewport_h;
            self.fully_visible = false;
            self.text = cfg.text.clone();
            self.pause_ms = 0.0;
            log::debug!("dialog opening");
        }
        if !self.visible {
            return fx;
        }

        if fade.started() {
            self.fully_visible = false;
            self.slide_y += step;
            if self.slide_y > viewport_h {
                self.visible = false;
            }
            return fx;
        }

        if self.slide_y > target {
            self.slide_y = (self.slide_y - step).max(target);
        }
        if self.slide_y <= target {
            self.fully_visible = true;
            if !self.arrived {
                self.arrived = true;
                fx.sound(Sfx::Confirm);
            }
        }

        if self.fully_visible && enc.animation_complete {
            self.pause_ms += time.elapsed_ms;
            if self.pause_ms >= cfg.pause_ms {
                self.pause_ms = 0.0;
                if fade.start() {
                    log::info!("dialog pause elapsed, fading to battle");
                }
            }
        }
        fx
    }

    /// Manual skip of the pause. Only starts a fade that has not begun yet.
    pub fn skip(&mut self, enc: &Encounter, fade: &mut Fade) -> bool {
        if enc.animation_complete && self.fully_visible && fade.start() {
            self.pause_ms = 0.0;
            log::info!("dialog skipped, fading to battle");
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncounterConfig;
    use crate::encounter::{CryState, EncounterPhase};
    use crate::fade::FadePhase;

    fn finished_encounter(cry: CryState) -> Encounter {
        let mut enc = Encounter::new(&EncounterConfig::default());
        enc.phase = EncounterPhase::Stopped;
        enc.animation_complete = true;
        enc.cry = cry;
        enc
    }

    #[test]
    fn waits_for_the_cry() {
        let cfg = DialogConfig::default();
        let mut fade = Fade::default();
        let mut dialog = Dialog::default();
        let enc = finished_encounter(CryState::Playing);
        dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        assert!(!dialog.visible, "dialog must not open before the cry ends");

        let enc = finished_encounter(CryState::Finished);
        dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        assert!(dialog.visible);
        assert_eq!(dialog.text, cfg.text);
    }

    #[test]
    fn slides_to_target_and_plays_arrival_once() {
        let cfg = DialogConfig::default();
        let mut fade = Fade::default();
        let mut dialog = Dialog::default();
        let enc = finished_encounter(CryState::Finished);
        let mut arrivals = 0;
        for _ in 0..30 {
            arrivals += dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick()).count_sound(Sfx::Confirm);
            assert!(dialog.slide_y >= Dialog::target_y(&cfg, 320.0));
        }
        assert!(dialog.fully_visible);
        assert_eq!(dialog.slide_y, 264.0);
        assert_eq!(arrivals, 1);
    }

    #[test]
    fn pause_starts_fade_then_slides_out() {
        let cfg = DialogConfig::default();
        let mut fade = Fade::default();
        let mut dialog = Dialog::default();
        let enc = finished_encounter(CryState::Finished);
        for _ in 0..20 {
            dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        }
        assert_eq!(fade.phase, FadePhase::None);
        for _ in 0..12 {
            dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::from_elapsed_ms(200.0));
        }
        assert_eq!(fade.phase, FadePhase::Fading, "2000ms pause should have started the fade");
        for _ in 0..30 {
            dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        }
        assert!(!dialog.visible, "dialog slides below the viewport and hides");
        dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        assert!(!dialog.visible, "dialog never reopens once the fade started");
    }

    #[test]
    fn skip_only_when_fully_visible() {
        let cfg = DialogConfig::default();
        let mut fade = Fade::default();
        let mut dialog = Dialog::default();
        let enc = finished_encounter(CryState::Finished);
        dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        assert!(!dialog.skip(&enc, &mut fade), "still sliding");
        for _ in 0..20 {
            dialog.update(&enc, &mut fade, &cfg, 320.0, FrameTime::one_tick());
        }
        assert!(dialog.skip(&enc, &mut fade));
        assert!(!dialog.skip(&enc, &mut fade), "fade already running");
        assert_eq!(fade.phase, FadePhase::Fading);
    }
}
