//! Battle screen shown once the fade completes.

pub mod choreography;
pub mod faint;
pub mod menu;
pub mod moves;
pub mod panels;

pub use choreography::{CaptionFade, CaptionPhase, LoopAnim, TrainerPhase, TrainerThrow};
pub use faint::{FaintPhase, Knockout};
pub use menu::{BattleMenu, GridLayout, MenuCaption, MenuOption, Overlay};
pub use moves::{AttackPulse, MOVE_CATALOG, MoveInfo, MoveSlot, MoveType, PulsePhase};
pub use panels::{BattlePanels, DockingGate, Panel, PanelId, normalized_speeds};

use crate::config::SceneConfig;
use crate::effects::{Effect, Effects, Music, Sfx};
use crate::input::Key;
use crate::timing::FrameTime;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub panels: BattlePanels,
    pub trainer: TrainerThrow,
    pub caption: CaptionFade,
    pub wild_idle: LoopAnim,
    pub partner_idle: LoopAnim,
    pub menu: BattleMenu,
    pub knockout: Knockout,
    pub entered: bool,
    partner_appeared: bool,
}

impl Battle {
    pub fn new(cfg: &SceneConfig) -> Self {
        Self {
            panels: BattlePanels::new(&cfg.battle, &cfg.world),
            trainer: TrainerThrow::default(),
            caption: CaptionFade::default(),
            wild_idle: LoopAnim::default(),
            partner_idle: LoopAnim::default(),
            menu: BattleMenu::default(),
            knockout: Knockout::default(),
            entered: false,
            partner_appeared: false,
        }
    }

    /// Runs once, on the tick the fade reaches `Faded`.
    pub fn enter(&mut self, cfg: &SceneConfig) -> Effects {
        let mut fx = Effects::new();
        if self.entered {
            return fx;
        }
        self.entered = true;
        self.panels.reveal(cfg.battle.slide_speed);
        fx.push(Effect::StopMusic);
        fx.push(Effect::PlayMusic { track: Music::Battle, looped: true });
        fx.sound(Sfx::BattleCry);
        log::info!("battle started");
        fx
    }

    pub fn update(&mut self, cfg: &SceneConfig, time: FrameTime) -> Effects {
        let mut fx = Effects::new();
        if !self.entered {
            return fx;
        }

        for id in self.panels.update(time) {
            if id == PanelId::Partner && !self.partner_appeared {
                self.partner_appeared = true;
                fx.sound(Sfx::BallPoof);
                log::debug!("partner in place");
            }
        }

        if self.trainer.update(&mut self.panels, &cfg.battle, time, &mut fx) {
            self.caption.begin();
        }
        if self.caption.update(cfg.battle.caption_fade_speed, time) {
            self.menu.revealed = true;
            log::debug!("caption swapped, menu revealed");
        }

        self.wild_idle.advance(cfg.battle.wild_frames, cfg.battle.idle_anim_speed, time);
        if self.panels.get(PanelId::Partner).visible {
            self.partner_idle.advance(cfg.battle.partner_frames, cfg.battle.idle_anim_speed, time);
        }

        fx.extend(self.knockout.update(&cfg.battle, time));
        let pulsing = self.menu.pulse.is_active();
        fx.extend(self.menu.update(&cfg.menu, time));
        if pulsing && !self.menu.pulse.is_active() {
            self.knockout.start();
        }
        fx
    }

    /// The menu stays closed for good once the wild creature is hit.
    pub fn accepts_input(&self) -> bool {
        !self.knockout.started()
    }

    pub fn key_down(&mut self, key: Key) -> Effects {
        if !self.accepts_input() {
            return Effects::new();
        }
        self.menu.key_down(key)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, cfg: &SceneConfig) -> Effects {
        if !self.accepts_input() {
            return Effects::new();
        }
        self.menu.pointer_down(x, y, &cfg.menu, &cfg.world)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, cfg: &SceneConfig) {
        if self.accepts_input() {
            self.menu.pointer_move(x, y, &cfg.menu, &cfg.world)
        }
    }

    /// Width of the wild HP bar on the stat panel.
    pub fn wild_hp_width(&self, cfg: &SceneConfig) -> f64 {
        self.knockout.hp_width(&cfg.battle)
    }

    /// Captions currently drawn in the battle dialog with their alpha.
    pub fn captions<'a>(&self, cfg: &'a SceneConfig) -> Vec<(&'a str, f64)> {
        if self.knockout.has_fainted() {
            return vec![(cfg.battle.fainted_caption.as_str(), 255.0)];
        }
        if self.menu.pulse.is_active() || self.knockout.started() {
            return vec![(cfg.battle.attack_caption.as_str(), 255.0)];
        }
        match self.menu.caption {
            Some(MenuCaption::CantEscape) => return vec![(cfg.menu.run_caption.as_str(), 255.0)],
            Some(MenuCaption::FullHp) => return vec![(cfg.menu.full_hp_caption.as_str(), 255.0)],
            None => {}
        }
        match self.caption.phase {
            CaptionPhase::First => vec![(cfg.battle.first_caption.as_str(), 255.0)],
            CaptionPhase::Transitioning if self.caption.outgoing > 0.0 => {
                vec![(cfg.battle.first_caption.as_str(), self.caption.outgoing)]
            }
            CaptionPhase::Transitioning => vec![(cfg.battle.second_caption.as_str(), self.caption.incoming)],
            CaptionPhase::Second => vec![(cfg.battle.second_caption.as_str(), 255.0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(battle: &mut Battle, cfg: &SceneConfig, ticks: usize) -> Effects {
        let mut fx = Effects::new();
        for _ in 0..ticks {
            fx.extend(battle.update(cfg, FrameTime::one_tick()));
        }
        fx
    }

    #[test]
    fn nothing_moves_before_enter() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        let fx = run(&mut battle, &cfg, 100);
        assert!(fx.is_empty());
        assert_eq!(battle, Battle::new(&cfg));
    }

    #[test]
    fn enter_swaps_music_once() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        let fx = battle.enter(&cfg);
        assert_eq!(
            fx.as_slice(),
            &[
                Effect::StopMusic,
                Effect::PlayMusic { track: Music::Battle, looped: true },
                Effect::PlaySound(Sfx::BattleCry)
            ]
        );
        assert!(battle.enter(&cfg).is_empty(), "second enter is a no-op");
    }

    #[test]
    fn full_sequence_reveals_menu() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        battle.enter(&cfg);
        let fx = run(&mut battle, &cfg, 400);
        assert_eq!(fx.count_sound(Sfx::BallToss), 1);
        assert_eq!(fx.count_sound(Sfx::BallPoof), 1, "partner appear sound is guarded");
        assert!(battle.menu.revealed);
        assert_eq!(battle.trainer.phase, TrainerPhase::Gone);
        assert_eq!(battle.captions(&cfg), vec![(cfg.battle.second_caption.as_str(), 255.0)]);
    }

    #[test]
    fn attack_caption_while_pulse_runs() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        battle.enter(&cfg);
        run(&mut battle, &cfg, 400);
        battle.key_down(Key::Confirm);
        battle.key_down(Key::Down);
        battle.key_down(Key::Right);
        let fx = battle.key_down(Key::Confirm);
        assert_eq!(fx.count_sound(Sfx::Spore), 1);
        assert_eq!(battle.captions(&cfg)[0].0, cfg.battle.attack_caption);
        let fx = run(&mut battle, &cfg, 100);
        assert_eq!(fx.count_sound(Sfx::SpikeCannon), 1);
        assert!(!battle.menu.pulse.is_active());
    }

    fn use_spike_cannon(battle: &mut Battle, cfg: &SceneConfig) {
        battle.enter(cfg);
        run(battle, cfg, 400);
        battle.key_down(Key::Confirm);
        battle.key_down(Key::Down);
        battle.key_down(Key::Right);
        battle.key_down(Key::Confirm);
        while battle.menu.pulse.is_active() {
            battle.update(cfg, FrameTime::one_tick());
        }
    }

    #[test]
    fn impact_starts_the_hp_drain() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        battle.enter(&cfg);
        run(&mut battle, &cfg, 400);
        assert_eq!(battle.wild_hp_width(&cfg), cfg.battle.hp_bar_w, "full before the attack");

        use_spike_cannon(&mut battle, &cfg);
        assert!(battle.knockout.started());
        run(&mut battle, &cfg, 60);
        let w = battle.wild_hp_width(&cfg);
        assert!(w > 0.0 && w < cfg.battle.hp_bar_w, "draining, got {w}");
        assert_eq!(battle.captions(&cfg), vec![(cfg.battle.attack_caption.as_str(), 255.0)]);
    }

    #[test]
    fn drain_ends_in_the_fainted_caption() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        use_spike_cannon(&mut battle, &cfg);
        // 2s drain, 0.5s pause, 1s fall at 60 ticks per second plus slack.
        let fx = run(&mut battle, &cfg, 220);
        assert_eq!(fx.count_sound(Sfx::WildCry), 1);
        assert_eq!(battle.wild_hp_width(&cfg), 0.0);
        assert!(battle.knockout.has_fainted());
        assert_eq!(battle.captions(&cfg), vec![(cfg.battle.fainted_caption.as_str(), 255.0)]);
    }

    #[test]
    fn menu_ignores_input_after_the_hit() {
        let cfg = SceneConfig::default();
        let mut battle = Battle::new(&cfg);
        use_spike_cannon(&mut battle, &cfg);
        let before = battle.menu.clone();
        assert!(battle.key_down(Key::Back).is_empty());
        assert!(battle.pointer_down(300.0, 250.0, &cfg).is_empty());
        battle.pointer_move(300.0, 250.0, &cfg);
        assert_eq!(battle.menu, before);
    }
}
