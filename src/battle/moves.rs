//! Move catalog and the attack-pulse timeline of the one usable move.

use crate::config::MenuConfig;
use crate::effects::{Effects, Sfx};
use crate::timing::FrameTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    Psychic,
    Steel,
}

impl MoveType {
    pub fn label(self) -> &'static str {
        match self {
            MoveType::Psychic => "PSYCHIC",
            MoveType::Steel => "STEEL",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveInfo {
    pub name: &'static str,
    pub pp_max: u32,
    pub kind: MoveType,
    pub usable: bool,
}

pub const MOVE_CATALOG: [MoveInfo; 4] = [
    MoveInfo { name: "CONTEXT RECALL", pp_max: 20, kind: MoveType::Psychic, usable: false },
    MoveInfo { name: "SYNTAX SLASH", pp_max: 10, kind: MoveType::Steel, usable: false },
    MoveInfo { name: "DEBUG DASH", pp_max: 15, kind: MoveType::Steel, usable: false },
    MoveInfo { name: "PROMPT PULSE", pp_max: 5, kind: MoveType::Psychic, usable: true },
];

/// Remaining PP for one catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveSlot {
    pub pp: u32,
}

pub fn fresh_slots() -> [MoveSlot; 4] {
    MOVE_CATALOG.map(|m| MoveSlot { pp: m.pp_max })
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PulsePhase {
    Idle,
    Charge { elapsed_ms: f64 },
    Impact { elapsed_ms: f64 },
}

/// Charge: scale 0.5 → 2.0 while alpha drops 255 → 0. Impact: a second
/// sprite fading 255 → 0 over a shorter span. Then idle again.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackPulse {
    pub phase: PulsePhase,
}

impl Default for AttackPulse {
    fn default() -> Self {
        Self { phase: PulsePhase::Idle }
    }
}

impl AttackPulse {
    pub fn is_active(&self) -> bool {
        self.phase != PulsePhase::Idle
    }

    /// Starts the charge; a running pulse is never restarted.
    pub fn start(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = PulsePhase::Charge { elapsed_ms: 0.0 };
        true
    }

    pub fn update(&mut self, cfg: &MenuConfig, time: FrameTime) -> Effects {
        let mut fx = Effects::new();
        self.phase = match self.phase {
            PulsePhase::Idle => PulsePhase::Idle,
            PulsePhase::Charge { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + time.elapsed_ms;
                if elapsed_ms >= cfg.charge_ms {
                    fx.sound(Sfx::SpikeCannon);
                    PulsePhase::Impact { elapsed_ms: 0.0 }
                } else {
                    PulsePhase::Charge { elapsed_ms }
                }
            }
            PulsePhase::Impact { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + time.elapsed_ms;
                if elapsed_ms >= cfg.impact_ms {
                    log::debug!("attack pulse finished");
                    PulsePhase::Idle
                } else {
                    PulsePhase::Impact { elapsed_ms }
                }
            }
        };
        fx
    }

    /// Charge sprite scale, if the charge is showing.
    pub fn charge_scale(&self, cfg: &MenuConfig) -> Option<f64> {
        match self.phase {
            PulsePhase::Charge { elapsed_ms } => Some(0.5 + 1.5 * (elapsed_ms / cfg.charge_ms).min(1.0)),
            _ => None,
        }
    }

    /// Alpha of whichever sprite is showing.
    pub fn alpha(&self, cfg: &MenuConfig) -> f64 {
        match self.phase {
            PulsePhase::Idle => 0.0,
            PulsePhase::Charge { elapsed_ms } => 255.0 * (1.0 - (elapsed_ms / cfg.charge_ms).min(1.0)),
            PulsePhase::Impact { elapsed_ms } => 255.0 * (1.0 - (elapsed_ms / cfg.impact_ms).min(1.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_usable_move() {
        assert_eq!(MOVE_CATALOG.iter().filter(|m| m.usable).count(), 1);
        assert_eq!(fresh_slots()[3].pp, 5);
    }

    #[test]
    fn charge_then_impact_then_idle() {
        let cfg = MenuConfig::default();
        let mut pulse = AttackPulse::default();
        assert!(pulse.start());
        assert_eq!(pulse.charge_scale(&cfg), Some(0.5));
        assert_eq!(pulse.alpha(&cfg), 255.0);

        pulse.update(&cfg, FrameTime::from_elapsed_ms(250.0));
        pulse.update(&cfg, FrameTime::from_elapsed_ms(250.0));
        assert_eq!(pulse.charge_scale(&cfg), Some(1.25));
        assert_eq!(pulse.alpha(&cfg), 127.5);

        let mut impacts = 0;
        for _ in 0..2 {
            impacts += pulse.update(&cfg, FrameTime::from_elapsed_ms(250.0)).count_sound(Sfx::SpikeCannon);
        }
        assert_eq!(impacts, 1);
        assert!(matches!(pulse.phase, PulsePhase::Impact { .. }));
        assert_eq!(pulse.charge_scale(&cfg), None);

        pulse.update(&cfg, FrameTime::from_elapsed_ms(250.0));
        assert!(pulse.is_active());
        pulse.update(&cfg, FrameTime::from_elapsed_ms(250.0));
        assert!(!pulse.is_active());
    }

    #[test]
    fn cannot_retrigger_while_active() {
        let cfg = MenuConfig::default();
        let mut pulse = AttackPulse::default();
        pulse.start();
        pulse.update(&cfg, FrameTime::from_elapsed_ms(100.0));
        let before = pulse;
        assert!(!pulse.start());
        assert_eq!(pulse, before);
    }
}
