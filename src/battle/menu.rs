//! Battle menu: the 2×2 FIGHT/BAG/POKéMON/RUN grid, the move sub-grid, the
//! bag and party sub-screens and the captions they leave behind.

use crate::battle::moves::{AttackPulse, MOVE_CATALOG, MoveSlot, fresh_slots};
use crate::config::{MenuConfig, WorldConfig};
use crate::effects::{Effects, Sfx};
use crate::input::Key;
use crate::timing::FrameTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MenuOption {
    Fight,
    Bag,
    Party,
    Run,
}

impl MenuOption {
    pub const ALL: [MenuOption; 4] = [MenuOption::Fight, MenuOption::Bag, MenuOption::Party, MenuOption::Run];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(3)]
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Fight => "FIGHT",
            MenuOption::Bag => "BAG",
            MenuOption::Party => "POKéMON",
            MenuOption::Run => "RUN",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overlay {
    None,
    Moves,
    Bag,
    Party,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MenuCaption {
    CantEscape,
    FullHp,
}

/// A panel divided into a 2×2 grid inside its padding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub padding: f64,
}

impl GridLayout {
    pub fn fight(cfg: &MenuConfig) -> Self {
        Self { x: cfg.fight_x, y: cfg.fight_y, w: cfg.fight_w, h: cfg.fight_h, padding: cfg.padding }
    }

    /// Left part of the move panel; the right part shows PP and type.
    pub fn moves(cfg: &MenuConfig) -> Self {
        Self { x: cfg.moves_x, y: cfg.moves_y, w: cfg.moves_grid_w, h: cfg.moves_h, padding: cfg.padding }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Cell under a point on the padded interior, clamped to the grid.
    pub fn cell_at(&self, px: f64, py: f64) -> Option<usize> {
        let ix = self.x + self.padding;
        let iy = self.y + self.padding;
        let iw = self.w - 2.0 * self.padding;
        let ih = self.h - 2.0 * self.padding;
        if iw <= 0.0 || ih <= 0.0 || px < ix || px >= ix + iw || py < iy || py >= iy + ih {
            return None;
        }
        let col = (((px - ix) / (iw / 2.0)).floor() as usize).min(1);
        let row = (((py - iy) / (ih / 2.0)).floor() as usize).min(1);
        Some(row * 2 + col)
    }

    /// Top-left of a cell's interior area.
    pub fn cell_origin(&self, index: usize) -> (f64, f64) {
        let iw = (self.w - 2.0 * self.padding) / 2.0;
        let ih = (self.h - 2.0 * self.padding) / 2.0;
        let (row, col) = (index / 2, index % 2);
        (self.x + self.padding + col as f64 * iw, self.y + self.padding + row as f64 * ih)
    }
}

/// The "use" box on the bag and party sub-screens.
pub fn use_box(cfg: &MenuConfig, world: &WorldConfig) -> (f64, f64, f64, f64) {
    (
        world.viewport_w - cfg.use_right - cfg.use_w,
        world.viewport_h - cfg.use_bottom - cfg.use_h,
        cfg.use_w,
        cfg.use_h,
    )
}

fn in_box(b: (f64, f64, f64, f64), px: f64, py: f64) -> bool {
    px >= b.0 && px < b.0 + b.2 && py >= b.1 && py < b.1 + b.3
}

/// Moves a 2×2 cursor; edges clamp, nothing wraps.
pub fn navigate(cursor: usize, key: Key) -> usize {
    let (row, col) = (cursor / 2, cursor % 2);
    match key {
        Key::Up if row == 1 => cursor - 2,
        Key::Down if row == 0 => cursor + 2,
        Key::Left if col == 1 => cursor - 1,
        Key::Right if col == 0 => cursor + 1,
        _ => cursor,
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleMenu {
    pub revealed: bool,
    pub cursor: usize,
    pub hovered: Option<usize>,
    /// Option kept highlighted while its caption is up.
    pub selected: Option<MenuOption>,
    pub overlay: Overlay,
    pub move_cursor: usize,
    pub move_hovered: Option<usize>,
    pub moves: [MoveSlot; 4],
    pub caption: Option<MenuCaption>,
    pub pulse: AttackPulse,
    pub use_hovered: bool,
}

impl Default for BattleMenu {
    fn default() -> Self {
        Self {
            revealed: false,
            cursor: 0,
            hovered: None,
            selected: None,
            overlay: Overlay::None,
            move_cursor: 0,
            move_hovered: None,
            moves: fresh_slots(),
            caption: None,
            pulse: AttackPulse::default(),
            use_hovered: false,
        }
    }
}

impl BattleMenu {
    fn accepts_input(&self) -> bool {
        self.revealed && !self.pulse.is_active()
    }

    /// Cell highlighted on the main grid: the sticky selection wins over hover.
    pub fn highlighted(&self) -> usize {
        match self.selected {
            Some(option) => option as usize,
            None => self.hovered.unwrap_or(self.cursor),
        }
    }

    pub fn key_down(&mut self, key: Key) -> Effects {
        let mut fx = Effects::new();
        if !self.accepts_input() {
            return fx;
        }
        if self.caption.is_some() {
            if matches!(key, Key::Confirm | Key::Back) {
                self.dismiss_caption();
            }
            return fx;
        }
        match (self.overlay, key) {
            (Overlay::None, Key::Confirm) => fx.extend(self.select(MenuOption::from_index(self.cursor))),
            (Overlay::None, _) => {
                self.cursor = navigate(self.cursor, key);
                self.hovered = None;
            }
            (Overlay::Moves, Key::Confirm) => fx.extend(self.select_move(self.move_cursor)),
            (Overlay::Moves, Key::Back) => self.close_overlay(),
            (Overlay::Moves, _) => {
                self.move_cursor = navigate(self.move_cursor, key);
                self.move_hovered = None;
            }
            (Overlay::Bag | Overlay::Party, Key::Confirm) => fx.extend(self.press_use()),
            (Overlay::Bag | Overlay::Party, Key::Back) => self.close_overlay(),
            (Overlay::Bag | Overlay::Party, _) => {}
        }
        fx
    }

    pub fn pointer_down(&mut self, px: f64, py: f64, cfg: &MenuConfig, world: &WorldConfig) -> Effects {
        let mut fx = Effects::new();
        if !self.accepts_input() {
            return fx;
        }
        if self.caption.is_some() {
            self.dismiss_caption();
            return fx;
        }
        match self.overlay {
            Overlay::Moves => {
                if let Some(cell) = GridLayout::moves(cfg).cell_at(px, py) {
                    self.move_cursor = cell;
                    self.move_hovered = Some(cell);
                    fx.extend(self.select_move(cell));
                } else if !(GridLayout { w: cfg.moves_w, ..GridLayout::moves(cfg) }).contains(px, py) {
                    self.close_overlay();
                }
            }
            Overlay::Bag | Overlay::Party => {
                if in_box(use_box(cfg, world), px, py) {
                    fx.extend(self.press_use());
                } else {
                    self.close_overlay();
                }
            }
            Overlay::None => {
                if let Some(cell) = GridLayout::fight(cfg).cell_at(px, py) {
                    self.cursor = cell;
                    self.hovered = Some(cell);
                    fx.extend(self.select(MenuOption::from_index(cell)));
                }
            }
        }
        fx
    }

    pub fn pointer_move(&mut self, px: f64, py: f64, cfg: &MenuConfig, world: &WorldConfig) {
        if !self.revealed {
            return;
        }
        match self.overlay {
            Overlay::None => {
                self.hovered = GridLayout::fight(cfg).cell_at(px, py);
                if let Some(cell) = self.hovered {
                    self.cursor = cell;
                }
            }
            Overlay::Moves => {
                self.move_hovered = GridLayout::moves(cfg).cell_at(px, py);
                if let Some(cell) = self.move_hovered {
                    self.move_cursor = cell;
                }
            }
            Overlay::Bag | Overlay::Party => self.use_hovered = in_box(use_box(cfg, world), px, py),
        }
    }

    pub fn update(&mut self, cfg: &MenuConfig, time: FrameTime) -> Effects {
        self.pulse.update(cfg, time)
    }

    fn select(&mut self, option: MenuOption) -> Effects {
        let mut fx = Effects::new();
        match option {
            MenuOption::Fight => {
                self.overlay = Overlay::Moves;
                self.move_cursor = 0;
                self.move_hovered = None;
                fx.sound(Sfx::Confirm);
            }
            MenuOption::Bag => {
                self.overlay = Overlay::Bag;
                self.use_hovered = false;
                fx.sound(Sfx::Confirm);
            }
            MenuOption::Party => {
                self.overlay = Overlay::Party;
                self.use_hovered = false;
                fx.sound(Sfx::Confirm);
            }
            MenuOption::Run => {
                self.caption = Some(MenuCaption::CantEscape);
                self.selected = Some(MenuOption::Run);
                fx.sound(Sfx::Denied);
            }
        }
        fx
    }

    fn select_move(&mut self, index: usize) -> Effects {
        let mut fx = Effects::new();
        let index = index.min(MOVE_CATALOG.len() - 1);
        let info = MOVE_CATALOG[index];
        let slot = &mut self.moves[index];
        if !info.usable || slot.pp == 0 {
            fx.sound(Sfx::Denied);
            return fx;
        }
        if self.pulse.start() {
            slot.pp -= 1;
            self.overlay = Overlay::None;
            self.move_hovered = None;
            fx.sound(Sfx::Spore);
            log::info!("{} used, {} PP left", info.name, slot.pp);
        }
        fx
    }

    fn press_use(&mut self) -> Effects {
        let mut fx = Effects::new();
        match self.overlay {
            Overlay::Bag => {
                self.overlay = Overlay::None;
                self.caption = Some(MenuCaption::FullHp);
                self.selected = Some(MenuOption::Bag);
                self.cursor = MenuOption::Bag as usize;
                fx.sound(Sfx::Denied);
            }
            Overlay::Party => {
                self.close_overlay();
                fx.sound(Sfx::Confirm);
            }
            _ => {}
        }
        fx
    }

    fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
        self.move_hovered = None;
        self.use_hovered = false;
    }

    fn dismiss_caption(&mut self) {
        if let Some(MenuCaption::FullHp) = self.caption {
            self.cursor = MenuOption::Bag as usize;
        }
        self.caption = None;
        self.selected = None;
    }
}
