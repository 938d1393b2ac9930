//! The composed scene state. `update` runs the controllers in a fixed order
//! because each stage gates the next one; restart replaces the whole value.

use crate::battle::Battle;
use crate::config::SceneConfig;
use crate::dialog::Dialog;
use crate::effects::{Effect, Effects, Music, Sfx};
use crate::encounter::Encounter;
use crate::fade::Fade;
use crate::input::{InputEvent, Key};
use crate::timing::FrameTime;
use crate::world::{Camera, Player, WalkabilityIndex};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneState {
    pub config: SceneConfig,
    pub walkability: WalkabilityIndex,
    pub player: Player,
    pub camera: Camera,
    pub encounter: Encounter,
    pub dialog: Dialog,
    pub fade: Fade,
    pub battle: Battle,
}

impl SceneState {
    pub fn new(config: SceneConfig) -> Self {
        let player = Player::spawn(&config.player);
        let camera = Self::camera_for(&player, &config);
        Self {
            walkability: WalkabilityIndex::from_config(&config.world),
            player,
            camera,
            encounter: Encounter::new(&config.encounter),
            dialog: Dialog::default(),
            fade: Fade::default(),
            battle: Battle::new(&config),
            config,
        }
    }

    fn camera_for(player: &Player, cfg: &SceneConfig) -> Camera {
        let world = &cfg.world;
        Camera::follow(
            player.center(&cfg.player),
            (world.viewport_w, world.viewport_h),
            (world.map_w, world.map_h),
        )
    }

    pub fn in_battle(&self) -> bool {
        self.fade.is_faded()
    }

    pub fn player_cell(&self) -> (i32, i32) {
        let (cx, cy) = self.player.center(&self.config.player);
        self.walkability.cell_of(cx, cy)
    }

    /// Hard input gate for the overworld player.
    pub fn movement_frozen(&self) -> bool {
        self.dialog.visible || self.encounter.is_active() || self.fade.started()
    }

    /// One tick: movement, camera, encounter, dialog, fade, then battle.
    pub fn update(&mut self, time: FrameTime) -> Vec<Effect> {
        let mut fx = Effects::new();
        let cfg = &self.config;

        let frozen = self.movement_frozen();
        let map = (cfg.world.map_w, cfg.world.map_h);
        if self.player.step(frozen, &self.walkability, &cfg.player, map, time).collided {
            fx.sound(Sfx::Collision);
        }
        self.camera = Self::camera_for(&self.player, cfg);

        let cell = self.player_cell();
        fx.extend(self.encounter.update(cell, &cfg.encounter, &cfg.world, time));
        fx.extend(self.dialog.update(&self.encounter, &mut self.fade, &cfg.dialog, cfg.world.viewport_h, time));

        if self.fade.update(cfg.fade.speed, time) {
            fx.extend(self.battle.enter(cfg));
        }
        if self.fade.is_faded() {
            fx.extend(self.battle.update(cfg, time));
        }
        fx.into_vec()
    }

    /// Pure form of `update`: the next state and its effects.
    pub fn advance(&self, time: FrameTime) -> (SceneState, Vec<Effect>) {
        let mut next = self.clone();
        let fx = next.update(time);
        (next, fx)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Effect> {
        let mut fx = Effects::new();
        match event {
            InputEvent::KeyDown(Key::Restart) => {
                fx.sound(Sfx::Confirm);
                for effect in self.restart() {
                    fx.push(effect);
                }
            }
            InputEvent::KeyDown(Key::Mute) => fx.push(Effect::ToggleMute),
            InputEvent::KeyDown(key) => {
                if key.is_direction() {
                    self.set_held(key, true);
                }
                if self.in_battle() {
                    fx.extend(self.battle.key_down(key));
                }
            }
            InputEvent::KeyUp(key) if key.is_direction() => self.set_held(key, false),
            InputEvent::KeyUp(_) => {}
            InputEvent::PointerDown { x, y } => {
                if self.in_battle() {
                    fx.extend(self.battle.pointer_down(x, y, &self.config));
                } else {
                    self.dialog.skip(&self.encounter, &mut self.fade);
                }
            }
            InputEvent::PointerMove { x, y } => {
                if self.in_battle() {
                    self.battle.pointer_move(x, y, &self.config);
                }
            }
        }
        fx.into_vec()
    }

    fn set_held(&mut self, key: Key, down: bool) {
        let held = &mut self.player.held;
        match key {
            Key::Up => held.up = down,
            Key::Down => held.down = down,
            Key::Left => held.left = down,
            Key::Right => held.right = down,
            _ => {}
        }
    }

    /// Replaces every controller with its initial value in one assignment.
    pub fn restart(&mut self) -> Vec<Effect> {
        log::info!("scene restart");
        *self = SceneState::new(self.config.clone());
        vec![Effect::StopMusic, Effect::PlayMusic { track: Music::Overworld, looped: true }]
    }

    /// Scene entry: fresh state plus the overworld music.
    pub fn on_enter(&mut self) -> Vec<Effect> {
        *self = SceneState::new(self.config.clone());
        vec![Effect::PlayMusic { track: Music::Overworld, looped: true }]
    }

    pub fn on_sound_ended(&mut self, sfx: Sfx) {
        if sfx == Sfx::WildCry {
            self.encounter.on_cry_ended();
        }
    }

    pub fn on_sound_failed(&mut self, sfx: Sfx) {
        if sfx == Sfx::WildCry {
            self.encounter.on_cry_failed();
        }
    }
}
