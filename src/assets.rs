//! Image identifiers and the readiness capability the renderer queries.
//! Loading itself happens at the host boundary (see `web`); a failed load is
//! recorded once and never retried.

use std::collections::HashMap;

use crate::error::GameError;
use crate::render::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageId {
    Map,
    Player,
    Creature,
    Alert,
    Dialog,
    BattleBackground,
    BattleGrass,
    BattleWater,
    WildStat,
    PartnerStat,
    Trainer,
    WildBattler,
    PartnerBattler,
    BattleDialog,
    FightMenu,
    MovePanel,
    BagScreen,
    PartyScreen,
    PulseCharge,
    PulseImpact,
}

impl ImageId {
    pub const ALL: [ImageId; 20] = [
        ImageId::Map,
        ImageId::Player,
        ImageId::Creature,
        ImageId::Alert,
        ImageId::Dialog,
        ImageId::BattleBackground,
        ImageId::BattleGrass,
        ImageId::BattleWater,
        ImageId::WildStat,
        ImageId::PartnerStat,
        ImageId::Trainer,
        ImageId::WildBattler,
        ImageId::PartnerBattler,
        ImageId::BattleDialog,
        ImageId::FightMenu,
        ImageId::MovePanel,
        ImageId::BagScreen,
        ImageId::PartyScreen,
        ImageId::PulseCharge,
        ImageId::PulseImpact,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ImageId::Map => "assets/images/map.png",
            ImageId::Player => "assets/sprites/player.png",
            ImageId::Creature => "assets/sprites/bugia.png",
            ImageId::Alert => "assets/sprites/exclamation.png",
            ImageId::Dialog => "assets/images/dialog.png",
            ImageId::BattleBackground => "assets/images/battle/background.png",
            ImageId::BattleGrass => "assets/images/battle/grass.png",
            ImageId::BattleWater => "assets/images/battle/water.png",
            ImageId::WildStat => "assets/images/battle/wild_stat.png",
            ImageId::PartnerStat => "assets/images/battle/partner_stat.png",
            ImageId::Trainer => "assets/images/battle/trainer.png",
            ImageId::WildBattler => "assets/images/battle/bugia_idle.png",
            ImageId::PartnerBattler => "assets/images/battle/cursaur_idle.png",
            ImageId::BattleDialog => "assets/images/battle/dialog.png",
            ImageId::FightMenu => "assets/images/battle/fight_menu.png",
            ImageId::MovePanel => "assets/images/battle/moves.png",
            ImageId::BagScreen => "assets/images/battle/bag.png",
            ImageId::PartyScreen => "assets/images/battle/party.png",
            ImageId::PulseCharge => "assets/images/battle/prompt_pulse_charge.png",
            ImageId::PulseImpact => "assets/images/battle/prompt_pulse_impact.png",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// What the renderer may ask about images.
pub trait AssetSource {
    /// Dimensions of a decoded image; `None` while loading or after failure.
    fn image(&self, id: ImageId) -> Option<ImageInfo>;

    fn is_ready(&self, id: ImageId) -> bool {
        self.image(id).is_some()
    }
}

/// Fixed-size frame grid over a sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSheet {
    pub frame_w: f64,
    pub frame_h: f64,
}

impl SpriteSheet {
    pub fn new(frame_w: f64, frame_h: f64) -> Self {
        Self { frame_w, frame_h }
    }

    pub fn frame(&self, row: u32, col: u32) -> Rect {
        Rect::new(col as f64 * self.frame_w, row as f64 * self.frame_h, self.frame_w, self.frame_h)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(ImageInfo),
    Failed,
}

/// Load bookkeeping shared by hosts.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    states: HashMap<ImageId, LoadState>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a load; returns false if the image was already requested,
    /// including after a failure.
    pub fn begin(&mut self, id: ImageId) -> bool {
        if self.states.contains_key(&id) {
            return false;
        }
        self.states.insert(id, LoadState::Loading);
        true
    }

    pub fn mark_loaded(&mut self, id: ImageId, info: ImageInfo) {
        log::debug!("image {id:?} ready ({}x{})", info.width, info.height);
        self.states.insert(id, LoadState::Ready(info));
    }

    pub fn mark_failed(&mut self, id: ImageId, reason: impl Into<String>) -> GameError {
        let err = GameError::AssetLoad { asset: id, reason: reason.into() };
        log::warn!("{err}");
        self.states.insert(id, LoadState::Failed);
        err
    }

    /// Loads still in flight.
    pub fn pending(&self) -> usize {
        self.states.values().filter(|s| **s == LoadState::Loading).count()
    }
}

impl AssetSource for AssetRegistry {
    fn image(&self, id: ImageId) -> Option<ImageInfo> {
        match self.states.get(&id) {
            Some(LoadState::Ready(info)) => Some(*info),
            _ => None,
        }
    }
}
