//! Player movement controller and walk-cycle animation.

use crate::config::PlayerConfig;
use crate::timing::{FrameTime, advance_progress};
use crate::world::walkability::WalkabilityIndex;

/// Facing doubles as the sprite-sheet row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    Down,
    Up,
    Right,
    Left,
}

impl Facing {
    pub fn row(self) -> u32 {
        match self {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::Right => 2,
            Facing::Left => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Per-axis sum of unit vectors; opposite keys cancel.
    pub fn direction(&self) -> (f64, f64) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f64;
        (axis(self.left, self.right), axis(self.up, self.down))
    }

    /// Later entries in left, right, up, down order win.
    pub fn facing(&self) -> Option<Facing> {
        let mut facing = None;
        if self.left {
            facing = Some(Facing::Left);
        }
        if self.right {
            facing = Some(Facing::Right);
        }
        if self.up {
            facing = Some(Facing::Up);
        }
        if self.down {
            facing = Some(Facing::Down);
        }
        facing
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub collided: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub x: f64, // top-left, world space
    pub y: f64,
    pub facing: Facing,
    pub held: HeldDirections,
    pub moving: bool,
    pub frame: u32,
    anim_progress: f64,
}

impl Player {
    pub fn spawn(cfg: &PlayerConfig) -> Self {
        Self {
            x: cfg.spawn_x,
            y: cfg.spawn_y,
            facing: Facing::Up,
            held: HeldDirections::default(),
            moving: false,
            frame: 0,
            anim_progress: 0.0,
        }
    }

    pub fn center(&self, cfg: &PlayerConfig) -> (f64, f64) {
        (self.x + cfg.width / 2.0, self.y + cfg.height / 2.0)
    }

    /// One movement tick. `frozen` is the hard input gate (dialog up,
    /// encounter running, fade started): nothing moves and facing is kept.
    pub fn step(
        &mut self,
        frozen: bool,
        walk: &WalkabilityIndex,
        cfg: &PlayerConfig,
        map: (f64, f64),
        time: FrameTime,
    ) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        self.moving = self.held.any() && !frozen;

        if !frozen {
            if let Some(facing) = self.held.facing() {
                self.facing = facing;
            }
            let (dx, dy) = self.held.direction();
            if dx != 0.0 || dy != 0.0 {
                let step = cfg.speed * time.ticks;
                let max_x = (map.0 - cfg.width - cfg.margin).max(cfg.margin);
                let max_y = (map.1 - cfg.height - cfg.margin).max(cfg.margin);
                let nx = (self.x + dx * step).clamp(cfg.margin, max_x);
                let ny = (self.y + dy * step).clamp(cfg.margin, max_y);
                let (cx, cy) = walk.cell_of(nx + cfg.width / 2.0, ny + cfg.height / 2.0);
                if walk.is_walkable(cx, cy) {
                    self.x = nx;
                    self.y = ny;
                } else {
                    outcome.collided = true;
                }
            }
        }

        self.animate(cfg, time);
        outcome
    }

    fn animate(&mut self, cfg: &PlayerConfig, time: FrameTime) {
        if !self.moving {
            self.frame = 0;
            self.anim_progress = 0.0;
            return;
        }
        if advance_progress(&mut self.anim_progress, cfg.anim_speed * time.ticks) {
            self.frame = (self.frame + 1) % cfg.frames.max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn setup() -> (Player, WalkabilityIndex, PlayerConfig, (f64, f64)) {
        let world = WorldConfig::default();
        let cfg = PlayerConfig::default();
        (Player::spawn(&cfg), WalkabilityIndex::from_config(&world), cfg, (world.map_w, world.map_h))
    }

    #[test]
    fn walks_up_the_corridor() {
        let (mut p, walk, cfg, map) = setup();
        p.held.up = true;
        let out = p.step(false, &walk, &cfg, map, FrameTime::one_tick());
        assert!(!out.collided);
        assert_eq!(p.y, cfg.spawn_y - cfg.speed);
        assert!(p.moving);
        assert_eq!(p.facing, Facing::Up);
    }

    #[test]
    fn rejects_unwalkable_cell_and_reports_collision() {
        let (mut p, walk, cfg, map) = setup();
        p.held.left = true;
        // Spawn centre x is 496; the sixth step left lands in column 14 of row 6, which is blocked.
        let mut collisions = 0;
        for _ in 0..10 {
            if p.step(false, &walk, &cfg, map, FrameTime::one_tick()).collided {
                collisions += 1;
            }
        }
        assert!(collisions > 0, "expected the wall at column 14 to block");
        let (cx, _) = walk.cell_of(p.center(&cfg).0, p.center(&cfg).1);
        assert_eq!(cx, 15, "player must stay in a walkable column");
        assert!(p.moving, "blocked but held still animates");
    }

    #[test]
    fn diagonal_is_not_normalised() {
        let held = HeldDirections { up: true, right: true, ..Default::default() };
        assert_eq!(held.direction(), (1.0, -1.0));
        let cancel = HeldDirections { left: true, right: true, ..Default::default() };
        assert_eq!(cancel.direction(), (0.0, 0.0));
    }

    #[test]
    fn facing_follows_priority_order() {
        let held = HeldDirections { left: true, down: true, ..Default::default() };
        assert_eq!(held.facing(), Some(Facing::Down));
        let held = HeldDirections { left: true, right: true, ..Default::default() };
        assert_eq!(held.facing(), Some(Facing::Right));
        assert_eq!(HeldDirections::default().facing(), None);
    }

    #[test]
    fn frozen_player_ignores_input() {
        let (mut p, walk, cfg, map) = setup();
        p.held.down = true;
        let before = (p.x, p.y, p.facing);
        p.step(true, &walk, &cfg, map, FrameTime::one_tick());
        assert_eq!((p.x, p.y, p.facing), before);
        assert!(!p.moving);
        assert_eq!(p.frame, 0);
    }

    #[test]
    fn never_leaves_map_margins() {
        let cfg = PlayerConfig::default();
        let map = (1024.0, 640.0);
        let open = WalkabilityIndex::new(vec![crate::world::CellRect::new(-5, -5, 100, 100)], vec![], 32.0);
        for mask in 0u8..16 {
            let mut p = Player::spawn(&cfg);
            p.held = HeldDirections {
                up: mask & 1 != 0,
                down: mask & 2 != 0,
                left: mask & 4 != 0,
                right: mask & 8 != 0,
            };
            for _ in 0..400 {
                p.step(false, &open, &cfg, map, FrameTime::from_elapsed_ms(250.0));
                assert!(p.x >= cfg.margin && p.x <= map.0 - cfg.width - cfg.margin, "x out of bounds: {}", p.x);
                assert!(p.y >= cfg.margin && p.y <= map.1 - cfg.height - cfg.margin, "y out of bounds: {}", p.y);
            }
        }
    }

    #[test]
    fn walk_cycle_advances_and_resets() {
        let (mut p, walk, cfg, map) = setup();
        p.held.up = true;
        for _ in 0..7 {
            p.step(false, &walk, &cfg, map, FrameTime::one_tick());
        }
        assert_eq!(p.frame, 1, "0.15 per tick crosses 1.0 on the 7th tick");
        p.held.up = false;
        p.step(false, &walk, &cfg, map, FrameTime::one_tick());
        assert_eq!(p.frame, 0);
    }
}
