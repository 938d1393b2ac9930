//! Scripted creature encounter: hidden → flying in → animating → stopped.
//! The chain only moves forward; a scene restart rebuilds it from scratch.

use crate::config::{EncounterConfig, WorldConfig};
use crate::effects::{Effects, Sfx};
use crate::timing::{FrameTime, advance_progress};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterPhase {
    Hidden,
    FlyingIn,
    Animating,
    Stopped,
}

/// Tracks the cry that separates the landing from the dialog.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CryState {
    Silent,
    /// Playback started; waiting for the "ended" notification.
    Playing,
    /// Playback could not start; waiting out the fallback delay instead.
    Fallback { waited_ms: f64 },
    Finished,
}

/// "!" shown above the player when the encounter triggers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertIndicator {
    pub elapsed_ms: f64,
    pub duration_ms: f64,
    pub bounce: f64,
}

impl AlertIndicator {
    pub fn visible(&self) -> bool {
        self.elapsed_ms < self.duration_ms
    }

    /// Vertical offset in px (negative is up): a single half-sine arc.
    pub fn offset_y(&self) -> f64 {
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        -self.bounce * (std::f64::consts::PI * t).sin()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub phase: EncounterPhase,
    pub x: f64,
    pub y: f64,
    pub frame: u32,
    progress: f64,
    pub animation_complete: bool,
    pub cry: CryState,
    pub alert: Option<AlertIndicator>,
}

impl Encounter {
    pub fn new(cfg: &EncounterConfig) -> Self {
        Self {
            phase: EncounterPhase::Hidden,
            x: cfg.target_x,
            y: cfg.start_y,
            frame: 0,
            progress: 0.0,
            animation_complete: false,
            cry: CryState::Silent,
            alert: None,
        }
    }

    /// Triggered. The player stays frozen from here on, through the cry and
    /// its fallback wait, until the dialog takes over the gate.
    pub fn is_active(&self) -> bool {
        self.phase != EncounterPhase::Hidden
    }

    pub fn cry_finished(&self) -> bool {
        self.cry == CryState::Finished
    }

    /// Cell columns under the creature and the row just below it.
    pub fn trigger_cells(cfg: &EncounterConfig, world: &WorldConfig) -> (i32, i32, i32) {
        let cell = world.cell_size;
        let left = (cfg.target_x / cell).floor() as i32;
        let right = ((cfg.target_x + cfg.frame_w) / cell).floor() as i32;
        let row = ((cfg.target_y + cfg.frame_h) / cell).floor() as i32;
        (left, right, row)
    }

    pub fn update(
        &mut self,
        player_cell: (i32, i32),
        cfg: &EncounterConfig,
        world: &WorldConfig,
        time: FrameTime,
    ) -> Effects {
        let mut fx = Effects::new();

        if let Some(alert) = self.alert.as_mut() {
            alert.elapsed_ms += time.elapsed_ms;
            if !alert.visible() {
                self.alert = None;
            }
        }

        match self.phase {
            EncounterPhase::Hidden => {
                let (left, right, row) = Self::trigger_cells(cfg, world);
                let (cx, cy) = player_cell;
                if (left..=right).contains(&cx) && cy == row {
                    log::info!("encounter triggered at cell ({cx}, {cy})");
                    self.phase = EncounterPhase::FlyingIn;
                    self.alert = Some(AlertIndicator {
                        elapsed_ms: 0.0,
                        duration_ms: cfg.alert_ms,
                        bounce: cfg.alert_bounce,
                    });
                    fx.sound(Sfx::Confirm);
                }
            }
            EncounterPhase::FlyingIn => {
                self.y += cfg.fly_speed * time.ticks;
                if self.y >= cfg.target_y {
                    self.y = cfg.target_y;
                    self.phase = EncounterPhase::Animating;
                    self.frame = 0;
                    self.progress = 0.0;
                    log::debug!("creature landed, animating");
                }
            }
            EncounterPhase::Animating => {
                let frames = cfg.frames.max(1);
                let held = frames >= 2 && self.frame == frames - 2;
                let rate = if held { cfg.anim_speed * cfg.hold_factor } else { cfg.anim_speed };
                if advance_progress(&mut self.progress, rate * time.ticks) {
                    self.frame += 1;
                    if self.frame >= frames {
                        self.frame = frames - 1;
                        self.phase = EncounterPhase::Stopped;
                        self.animation_complete = true;
                        self.cry = CryState::Playing;
                        fx.sound(Sfx::WildCry);
                        log::debug!("creature animation complete, cry started");
                    }
                }
            }
            EncounterPhase::Stopped => {
                if let CryState::Fallback { waited_ms } = self.cry {
                    let waited_ms = waited_ms + time.elapsed_ms;
                    self.cry = if waited_ms >= cfg.cry_fallback_ms {
                        CryState::Finished
                    } else {
                        CryState::Fallback { waited_ms }
                    };
                }
            }
        }

        fx
    }

    pub fn on_cry_ended(&mut self) {
        if self.cry == CryState::Playing {
            self.cry = CryState::Finished;
        }
    }

    pub fn on_cry_failed(&mut self) {
        if self.cry == CryState::Playing {
            log::warn!("creature cry did not play, waiting out the fallback delay");
            self.cry = CryState::Fallback { waited_ms: 0.0 };
        }
    }
}
