//! Scene tunables. `Default` carries the shipped values; with the
//! `serde_json` feature a JSON document can override any subset of them.

use crate::error::GameError;
use crate::world::walkability::CellRect;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub encounter: EncounterConfig,
    pub dialog: DialogConfig,
    pub fade: FadeConfig,
    pub battle: BattleConfig,
    pub menu: MenuConfig,
    pub audio: AudioConfig,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    pub viewport_w: f64,
    pub viewport_h: f64,
    pub cell_size: f64,
    pub map_w: f64,
    pub map_h: f64,
    pub walkable_rects: Vec<CellRect>,
    pub walkable_cells: Vec<(i32, i32)>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub width: f64,
    pub height: f64,
    pub frames: u32,       // walk frames per direction row
    pub anim_speed: f64,   // progress per tick
    pub speed: f64,        // px per tick, per axis
    pub margin: f64,       // distance kept from the map edge
    pub spawn_x: f64,
    pub spawn_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    pub frame_w: f64,
    pub frame_h: f64,
    pub frames: u32,
    pub target_x: f64,
    pub target_y: f64,
    pub start_y: f64,
    pub fly_speed: f64,
    pub anim_speed: f64,
    /// Progress multiplier while the second-to-last frame is showing.
    pub hold_factor: f64,
    pub alert_ms: f64,
    pub alert_bounce: f64,
    pub cry_fallback_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DialogConfig {
    pub height: f64,
    pub slide_speed: f64,
    pub pause_ms: f64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FadeConfig {
    pub speed: f64, // alpha per tick
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub slide_speed: f64,
    pub trainer_w: f64,
    pub trainer_h: f64,
    pub trainer_frames: u32,
    pub trainer_anim_speed: f64,
    pub caption_fade_speed: f64,
    pub first_caption: String,
    pub second_caption: String,
    pub attack_caption: String,
    pub idle_anim_speed: f64,
    pub wild_frames: u32,
    pub partner_frames: u32,
    pub dialog_height: f64,
    pub hp_bar_w: f64,
    pub hp_drain_ms: f64,
    pub faint_pause_ms: f64,
    pub faint_fall_ms: f64,
    pub faint_fall_distance: f64,
    pub fainted_caption: String,
    pub fainted_caption_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuConfig {
    pub fight_x: f64,
    pub fight_y: f64,
    pub fight_w: f64,
    pub fight_h: f64,
    pub padding: f64,
    pub moves_x: f64,
    pub moves_y: f64,
    pub moves_w: f64,
    pub moves_h: f64,
    pub moves_grid_w: f64,
    pub use_w: f64,
    pub use_h: f64,
    pub use_right: f64,
    pub use_bottom: f64,
    pub charge_ms: f64,
    pub impact_ms: f64,
    pub run_caption: String,
    pub full_hp_caption: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AudioConfig {
    pub music_volume: f64,
    pub sfx_volume: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_w: 480.0,
            viewport_h: 320.0,
            cell_size: 32.0,
            map_w: 1024.0,
            map_h: 640.0,
            walkable_rects: vec![CellRect::new(15, 4, 16, 7), CellRect::new(14, 8, 16, 12)],
            walkable_cells: vec![(17, 8), (17, 9)],
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 42.0,
            frames: 4,
            anim_speed: 0.15,
            speed: 3.0,
            margin: 10.0,
            spawn_x: 480.0,
            spawn_y: 192.0,
        }
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            frame_w: 132.0,
            frame_h: 132.0,
            frames: 6,
            target_x: 448.0,
            target_y: 0.0,
            start_y: -200.0,
            fly_speed: 2.5,
            anim_speed: 0.1,
            hold_factor: 0.3,
            alert_ms: 600.0,
            alert_bounce: 16.0,
            cry_fallback_ms: 1500.0,
        }
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            height: 56.0,
            slide_speed: 5.0,
            pause_ms: 2000.0,
            text: "Bugia wants to battle!".to_string(),
        }
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self { speed: 10.0 }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            slide_speed: 8.0,
            trainer_w: 180.0,
            trainer_h: 128.0,
            trainer_frames: 5,
            trainer_anim_speed: 0.15,
            caption_fade_speed: 5.0,
            first_caption: "Wild BUGIA appeared!".to_string(),
            second_caption: "What will CURSAUR do?".to_string(),
            attack_caption: "CURSAUR used PROMPT PULSE!".to_string(),
            idle_anim_speed: 0.4,
            wild_frames: 8,
            partner_frames: 8,
            dialog_height: 88.0,
            hp_bar_w: 96.0,
            hp_drain_ms: 2000.0,
            faint_pause_ms: 500.0,
            faint_fall_ms: 1000.0,
            faint_fall_distance: 40.0,
            fainted_caption: "Bugia fainted!".to_string(),
            fainted_caption_ms: 1000.0,
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            fight_x: 240.0,
            fight_y: 232.0,
            fight_w: 240.0,
            fight_h: 88.0,
            padding: 12.0,
            moves_x: 0.0,
            moves_y: 232.0,
            moves_w: 480.0,
            moves_h: 88.0,
            moves_grid_w: 320.0,
            use_w: 96.0,
            use_h: 21.0,
            use_right: 8.0,
            use_bottom: 22.0,
            charge_ms: 1000.0,
            impact_ms: 500.0,
            run_caption: "Can't escape!".to_string(),
            full_hp_caption: "CURSAUR already has full HP.".to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { music_volume: 0.3, sfx_volume: 0.6 }
    }
}

impl SceneConfig {
    /// Parses a (possibly partial) JSON override; absent fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let cfg: SceneConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("world.viewport_w", self.world.viewport_w),
            ("world.viewport_h", self.world.viewport_h),
            ("world.cell_size", self.world.cell_size),
            ("world.map_w", self.world.map_w),
            ("world.map_h", self.world.map_h),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("encounter.frame_w", self.encounter.frame_w),
            ("encounter.frame_h", self.encounter.frame_h),
            ("encounter.fly_speed", self.encounter.fly_speed),
            ("encounter.anim_speed", self.encounter.anim_speed),
            ("encounter.hold_factor", self.encounter.hold_factor),
            ("encounter.alert_ms", self.encounter.alert_ms),
            ("encounter.cry_fallback_ms", self.encounter.cry_fallback_ms),
            ("dialog.height", self.dialog.height),
            ("dialog.slide_speed", self.dialog.slide_speed),
            ("dialog.pause_ms", self.dialog.pause_ms),
            ("fade.speed", self.fade.speed),
            ("battle.slide_speed", self.battle.slide_speed),
            ("battle.trainer_anim_speed", self.battle.trainer_anim_speed),
            ("battle.caption_fade_speed", self.battle.caption_fade_speed),
            ("battle.idle_anim_speed", self.battle.idle_anim_speed),
            ("battle.hp_bar_w", self.battle.hp_bar_w),
            ("battle.hp_drain_ms", self.battle.hp_drain_ms),
            ("battle.faint_pause_ms", self.battle.faint_pause_ms),
            ("battle.faint_fall_ms", self.battle.faint_fall_ms),
            ("battle.fainted_caption_ms", self.battle.fainted_caption_ms),
            ("menu.fight_w", self.menu.fight_w),
            ("menu.fight_h", self.menu.fight_h),
            ("menu.moves_grid_w", self.menu.moves_grid_w),
            ("menu.charge_ms", self.menu.charge_ms),
            ("menu.impact_ms", self.menu.impact_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        let counts = [
            ("player.frames", self.player.frames),
            ("encounter.frames", self.encounter.frames),
            ("battle.trainer_frames", self.battle.trainer_frames),
            ("battle.wild_frames", self.battle.wild_frames),
            ("battle.partner_frames", self.battle.partner_frames),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(GameError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        if self.player.margin < 0.0 {
            return Err(GameError::InvalidConfig("player.margin must not be negative".into()));
        }
        let volumes = [("audio.music_volume", self.audio.music_volume), ("audio.sfx_volume", self.audio.sfx_volume)];
        for (name, value) in volumes {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidConfig(format!("{name} must be within 0..=1, got {value}")));
            }
        }
        Ok(())
    }
}
