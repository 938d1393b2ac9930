//! Slide-in battle panels. Each panel moves along one axis toward its target;
//! arrival is reported once per panel and fed into a `DockingGate`.

use crate::config::{BattleConfig, WorldConfig};
use crate::timing::FrameTime;

/// Positions closer than this to the target count as docked.
const DOCK_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanelId {
    Grass,
    WildStat,
    Water,
    Trainer,
    Wild,
    Partner,
    PartnerStat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlideAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Panel {
    pub id: PanelId,
    pub axis: SlideAxis,
    pub pos: f64,   // along the slide axis
    pub cross: f64, // fixed coordinate on the other axis
    pub w: f64,
    pub h: f64,
    pub start: f64,
    pub target: f64,
    pub speed: f64,
    pub visible: bool,
    pub alpha: f64,
    pub docked: bool,
}

impl Panel {
    fn new(id: PanelId, axis: SlideAxis, start: f64, target: f64, cross: f64, size: (f64, f64)) -> Self {
        Self {
            id,
            axis,
            pos: start,
            cross,
            w: size.0,
            h: size.1,
            start,
            target,
            speed: 0.0,
            visible: false,
            alpha: 255.0,
            docked: start == target,
        }
    }

    pub fn distance(&self) -> f64 {
        (self.target - self.start).abs()
    }

    /// Top-left corner in screen space.
    pub fn origin(&self) -> (f64, f64) {
        match self.axis {
            SlideAxis::Horizontal => (self.pos, self.cross),
            SlideAxis::Vertical => (self.cross, self.pos),
        }
    }

    /// Moves toward the target; returns true on the tick it docks.
    pub fn step(&mut self, time: FrameTime) -> bool {
        if self.docked || !self.visible {
            return false;
        }
        let remaining = self.target - self.pos;
        let step = self.speed * time.ticks;
        if remaining.abs() <= step + DOCK_EPSILON {
            self.pos = self.target;
            self.docked = true;
            return true;
        }
        self.pos += step.copysign(remaining);
        false
    }

    /// Resets the slide to a new target from the current position.
    pub fn retarget(&mut self, target: f64, speed: f64) {
        self.start = self.pos;
        self.target = target;
        self.speed = speed;
        self.docked = self.pos == target;
    }
}

/// Speed per panel so that the furthest panel moves at `base`. Zero
/// distances fall back to `base`.
pub fn normalized_speeds(distances: &[f64], base: f64) -> Vec<f64> {
    let max = distances.iter().copied().fold(0.0_f64, f64::max);
    distances
        .iter()
        .map(|&d| if d > 0.0 && max > 0.0 { d / max * base } else { base })
        .collect()
}

/// Counts arrivals of the panels the trainer waits on.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DockingGate {
    waiting: Vec<PanelId>,
}

impl DockingGate {
    pub fn new(required: &[PanelId]) -> Self {
        Self { waiting: required.to_vec() }
    }

    pub fn arrive(&mut self, id: PanelId) {
        self.waiting.retain(|w| *w != id);
    }

    pub fn all_docked(&self) -> bool {
        self.waiting.is_empty()
    }
}

/// Panels whose speeds are normalized together and which gate the trainer.
pub const GATED_PANELS: [PanelId; 4] = [PanelId::Grass, PanelId::WildStat, PanelId::Water, PanelId::Trainer];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlePanels {
    panels: [Panel; 7], // indexed by `PanelId as usize`
    pub gate: DockingGate,
}

impl BattlePanels {
    pub fn new(battle: &BattleConfig, world: &WorldConfig) -> Self {
        let vw = world.viewport_w;
        let vh = world.viewport_h;
        let h = SlideAxis::Horizontal;
        let v = SlideAxis::Vertical;
        let water_start = vw;
        let water_target = vw - 240.0;
        let wild_target = 288.0;
        let panels = [
            Panel::new(PanelId::Grass, h, -240.0, 0.0, 184.0, (240.0, 48.0)),
            Panel::new(PanelId::WildStat, h, -200.0, 0.0, 0.0, (200.0, 58.0)),
            Panel::new(PanelId::Water, h, water_start, water_target, 58.0, (240.0, 48.0)),
            Panel::new(
                PanelId::Trainer,
                h,
                vw,
                0.0,
                vh - battle.dialog_height - battle.trainer_h,
                (battle.trainer_w, battle.trainer_h),
            ),
            // Rides in with the water panel, so it starts the same distance out.
            Panel::new(PanelId::Wild, h, wild_target + (water_start - water_target), wild_target, 10.0, (96.0, 96.0)),
            Panel::new(PanelId::Partner, v, vh, 134.0, 56.0, (128.0, 128.0)),
            Panel::new(PanelId::PartnerStat, h, 280.0, 280.0, 168.0, (200.0, 64.0)),
        ];
        Self { panels, gate: DockingGate::new(&GATED_PANELS) }
    }

    pub fn get(&self, id: PanelId) -> &Panel {
        &self.panels[id as usize]
    }

    pub fn get_mut(&mut self, id: PanelId) -> &mut Panel {
        &mut self.panels[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    /// Shows the panels revealed by the fade and derives their speeds.
    pub fn reveal(&mut self, base: f64) {
        let distances: Vec<f64> = GATED_PANELS.iter().map(|id| self.get(*id).distance()).collect();
        let speeds = normalized_speeds(&distances, base);
        for (id, speed) in GATED_PANELS.iter().zip(speeds) {
            self.get_mut(*id).speed = speed;
        }
        let water_speed = self.get(PanelId::Water).speed;
        self.get_mut(PanelId::Wild).speed = water_speed;
        self.get_mut(PanelId::Partner).speed = base;

        for panel in self.panels.iter_mut() {
            panel.visible = panel.id != PanelId::Partner;
            if panel.docked && GATED_PANELS.contains(&panel.id) {
                self.gate.arrive(panel.id);
            }
        }
    }

    /// Steps the sliding panels and returns the ids that docked this tick.
    pub fn update(&mut self, time: FrameTime) -> Vec<PanelId> {
        let mut docked = Vec::new();
        for panel in self.panels.iter_mut() {
            if panel.step(time) {
                docked.push(panel.id);
            }
        }
        for id in &docked {
            if GATED_PANELS.contains(id) {
                self.gate.arrive(*id);
            }
        }
        docked
    }
}
