//! Immediate-mode render dispatch. Everything here is a pure function of the
//! scene state: it reads controllers, computes geometry and opacity, and
//! issues draw calls. Images that are not ready are skipped.

use crate::assets::{AssetSource, ImageId, SpriteSheet};
use crate::battle::menu::use_box;
use crate::battle::{Battle, GridLayout, MOVE_CATALOG, MenuOption, Overlay, PanelId, PulsePhase};
use crate::config::SceneConfig;
use crate::encounter::EncounterPhase;
use crate::state::SceneState;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Drawing target. Alpha is 0..=1.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: &str, alpha: f64);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64);
    /// `src` of `None` draws the whole image.
    fn draw_image(&mut self, id: ImageId, src: Option<Rect>, dest: Rect, alpha: f64);
    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: &str, alpha: f64);
}

const TEXT: &str = "#202020";
const HIGHLIGHT: &str = "#f85838";
// HP bar offset and height inside the wild stat panel.
const HP_BAR: (f64, f64, f64) = (78.0, 34.0, 6.0);

fn blit<S, A>(surface: &mut S, assets: &A, id: ImageId, src: Option<Rect>, dest: Rect, alpha: f64)
where
    S: Surface + ?Sized,
    A: AssetSource + ?Sized,
{
    if alpha > 0.0 && assets.is_ready(id) {
        surface.draw_image(id, src, dest, alpha.clamp(0.0, 1.0));
    }
}

pub fn render<S, A>(state: &SceneState, assets: &A, surface: &mut S)
where
    S: Surface + ?Sized,
    A: AssetSource + ?Sized,
{
    let world = &state.config.world;
    surface.fill_rect(Rect::new(0.0, 0.0, world.viewport_w, world.viewport_h), "#000000", 1.0);
    if state.in_battle() {
        render_battle(&state.battle, &state.config, assets, surface);
    } else {
        render_overworld(state, assets, surface);
    }
}

fn render_overworld<S, A>(state: &SceneState, assets: &A, surface: &mut S)
where
    S: Surface + ?Sized,
    A: AssetSource + ?Sized,
{
    let cfg = &state.config;
    let (vw, vh) = (cfg.world.viewport_w, cfg.world.viewport_h);
    let cam = state.camera;
    let opacity = state.fade.overworld_opacity();

    blit(surface, assets, ImageId::Map, Some(Rect::new(cam.x, cam.y, vw, vh)), Rect::new(0.0, 0.0, vw, vh), opacity);

    let enc = &state.encounter;
    if enc.phase != EncounterPhase::Hidden {
        let sheet = SpriteSheet::new(cfg.encounter.frame_w, cfg.encounter.frame_h);
        let dest = Rect::new(enc.x - cam.x, enc.y - cam.y, cfg.encounter.frame_w, cfg.encounter.frame_h);
        blit(surface, assets, ImageId::Creature, Some(sheet.frame(0, enc.frame)), dest, opacity);
    }

    let p = &state.player;
    let sheet = SpriteSheet::new(cfg.player.width, cfg.player.height);
    let (px, py) = (p.x - cam.x, p.y - cam.y);
    let dest = Rect::new(px, py, cfg.player.width, cfg.player.height);
    blit(surface, assets, ImageId::Player, Some(sheet.frame(p.facing.row(), p.frame)), dest, opacity);

    if let (Some(alert), Some(info)) = (enc.alert, assets.image(ImageId::Alert)) {
        if alert.visible() {
            let (w, h) = (info.width as f64, info.height as f64);
            let x = px + cfg.player.width / 2.0 - w / 2.0;
            let y = py - h + alert.offset_y();
            blit(surface, assets, ImageId::Alert, None, Rect::new(x, y, w, h), opacity);
        }
    }

    let dialog = &state.dialog;
    if dialog.visible {
        let dest = Rect::new(0.0, dialog.slide_y, vw, cfg.dialog.height);
        blit(surface, assets, ImageId::Dialog, None, dest, opacity);
        surface.draw_text(&dialog.text, 16.0, dialog.slide_y + cfg.dialog.height / 2.0 + 6.0, TEXT, opacity);
    }

    // Battle background fades in over the dissolving overworld.
    if state.fade.started() {
        blit(surface, assets, ImageId::BattleBackground, None, Rect::new(0.0, 0.0, vw, vh), state.fade.alpha / 255.0);
    }
}

fn render_battle<S, A>(battle: &Battle, cfg: &SceneConfig, assets: &A, surface: &mut S)
where
    S: Surface + ?Sized,
    A: AssetSource + ?Sized,
{
    let (vw, vh) = (cfg.world.viewport_w, cfg.world.viewport_h);
    blit(surface, assets, ImageId::BattleBackground, None, Rect::new(0.0, 0.0, vw, vh), 1.0);

    let panel_image = |id: PanelId| match id {
        PanelId::Grass => ImageId::BattleGrass,
        PanelId::WildStat => ImageId::WildStat,
        PanelId::Water => ImageId::BattleWater,
        PanelId::Trainer => ImageId::Trainer,
        PanelId::Wild => ImageId::WildBattler,
        PanelId::Partner => ImageId::PartnerBattler,
        PanelId::PartnerStat => ImageId::PartnerStat,
    };
    let order = [
        PanelId::Grass,
        PanelId::Water,
        PanelId::Wild,
        PanelId::WildStat,
        PanelId::PartnerStat,
        PanelId::Partner,
        PanelId::Trainer,
    ];
    for id in order {
        let panel = battle.panels.get(id);
        if !panel.visible {
            continue;
        }
        let (x, mut y) = panel.origin();
        let mut alpha = panel.alpha / 255.0;
        if id == PanelId::Wild {
            let (drop, fade) = battle.knockout.fall(&cfg.battle);
            y += drop;
            alpha *= fade / 255.0;
        }
        let dest = Rect::new(x, y, panel.w, panel.h);
        let sheet = SpriteSheet::new(panel.w, panel.h);
        let src = match id {
            PanelId::Trainer => Some(sheet.frame(0, battle.trainer.frame)),
            PanelId::Wild => Some(sheet.frame(0, battle.wild_idle.frame)),
            PanelId::Partner => Some(sheet.frame(0, battle.partner_idle.frame)),
            _ => None,
        };
        blit(surface, assets, panel_image(id), src, dest, alpha);
        if id == PanelId::WildStat {
            let hp = battle.wild_hp_width(cfg);
            if hp > 0.0 {
                let (bx, by, bh) = HP_BAR;
                surface.fill_rect(Rect::new(x + bx, y + by, hp, bh), &battle.knockout.hp_color(&cfg.battle), alpha);
            }
        }
    }

    render_pulse(battle, cfg, assets, surface);

    let box_y = vh - cfg.battle.dialog_height;
    blit(surface, assets, ImageId::BattleDialog, None, Rect::new(0.0, box_y, vw, cfg.battle.dialog_height), 1.0);
    for (text, alpha) in battle.captions(cfg) {
        surface.draw_text(text, 20.0, box_y + 36.0, "#ffffff", alpha / 255.0);
    }

    let menu = &battle.menu;
    if !menu.revealed || menu.pulse.is_active() || !battle.accepts_input() {
        return;
    }
    match menu.overlay {
        Overlay::None => {
            let layout = GridLayout::fight(&cfg.menu);
            blit(surface, assets, ImageId::FightMenu, None, Rect::new(layout.x, layout.y, layout.w, layout.h), 1.0);
            for option in MenuOption::ALL {
                let (x, y) = layout.cell_origin(option as usize);
                surface.draw_text(option.label(), x + 14.0, y + 22.0, TEXT, 1.0);
            }
            stroke_cell(surface, layout, menu.highlighted());
        }
        Overlay::Moves => {
            let m = &cfg.menu;
            blit(surface, assets, ImageId::MovePanel, None, Rect::new(m.moves_x, m.moves_y, m.moves_w, m.moves_h), 1.0);
            let layout = GridLayout::moves(m);
            for (i, info) in MOVE_CATALOG.iter().enumerate() {
                let (x, y) = layout.cell_origin(i);
                surface.draw_text(info.name, x + 14.0, y + 22.0, TEXT, 1.0);
            }
            let current = menu.move_hovered.unwrap_or(menu.move_cursor);
            stroke_cell(surface, layout, current);
            let info = MOVE_CATALOG[current.min(MOVE_CATALOG.len() - 1)];
            let pp = menu.moves[current.min(MOVE_CATALOG.len() - 1)].pp;
            let dx = m.moves_x + m.moves_grid_w + m.padding;
            surface.draw_text(&format!("PP {pp}/{}", info.pp_max), dx, m.moves_y + 34.0, TEXT, 1.0);
            surface.draw_text(&format!("TYPE/{}", info.kind.label()), dx, m.moves_y + 62.0, TEXT, 1.0);
        }
        Overlay::Bag | Overlay::Party => {
            let id = if menu.overlay == Overlay::Bag { ImageId::BagScreen } else { ImageId::PartyScreen };
            blit(surface, assets, id, None, Rect::new(0.0, 0.0, vw, vh), 1.0);
            if menu.use_hovered {
                let (x, y, w, h) = use_box(&cfg.menu, &cfg.world);
                surface.stroke_rect(Rect::new(x, y, w, h), HIGHLIGHT, 2.0);
            }
        }
    }
}

fn stroke_cell<S: Surface + ?Sized>(surface: &mut S, layout: GridLayout, cell: usize) {
    let (x, y) = layout.cell_origin(cell);
    let w = (layout.w - 2.0 * layout.padding) / 2.0;
    let h = (layout.h - 2.0 * layout.padding) / 2.0;
    surface.stroke_rect(Rect::new(x, y, w, h), HIGHLIGHT, 2.0);
}

fn render_pulse<S, A>(battle: &Battle, cfg: &SceneConfig, assets: &A, surface: &mut S)
where
    S: Surface + ?Sized,
    A: AssetSource + ?Sized,
{
    let pulse = &battle.menu.pulse;
    let wild = battle.panels.get(PanelId::Wild);
    let (wx, wy) = wild.origin();
    let (cx, cy) = (wx + wild.w / 2.0, wy + wild.h / 2.0);
    let alpha = pulse.alpha(&cfg.menu) / 255.0;
    match pulse.phase {
        PulsePhase::Idle => {}
        PulsePhase::Charge { .. } => {
            let size = 88.0 * pulse.charge_scale(&cfg.menu).unwrap_or(1.0);
            let dest = Rect::new(cx - size / 2.0, cy - size / 2.0, size, size);
            blit(surface, assets, ImageId::PulseCharge, None, dest, alpha);
        }
        PulsePhase::Impact { .. } => {
            let dest = Rect::new(wx, wy, wild.w, wild.h);
            blit(surface, assets, ImageId::PulseImpact, None, dest, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageInfo;
    use crate::fade::FadePhase;

    #[derive(Default)]
    struct Recorder {
        images: Vec<(ImageId, Rect, f64)>,
        texts: Vec<String>,
        fills: Vec<(Rect, String)>,
    }

    impl Surface for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: &str, _alpha: f64) {
            self.fills.push((rect, color.to_string()));
        }
        fn stroke_rect(&mut self, _rect: Rect, _color: &str, _line_width: f64) {}
        fn draw_image(&mut self, id: ImageId, _src: Option<Rect>, dest: Rect, alpha: f64) {
            self.images.push((id, dest, alpha));
        }
        fn draw_text(&mut self, text: &str, _x: f64, _y: f64, _color: &str, _alpha: f64) {
            self.texts.push(text.to_string());
        }
    }

    struct AllReady;

    impl AssetSource for AllReady {
        fn image(&self, _id: ImageId) -> Option<ImageInfo> {
            Some(ImageInfo { width: 16, height: 16 })
        }
    }

    struct NoneReady;

    impl AssetSource for NoneReady {
        fn image(&self, _id: ImageId) -> Option<ImageInfo> {
            None
        }
    }

    #[test]
    fn overworld_draws_map_and_player() {
        let state = SceneState::new(SceneConfig::default());
        let mut rec = Recorder::default();
        render(&state, &AllReady, &mut rec);
        let ids: Vec<ImageId> = rec.images.iter().map(|(id, ..)| *id).collect();
        assert_eq!(ids, vec![ImageId::Map, ImageId::Player]);
    }

    #[test]
    fn missing_assets_draw_nothing() {
        let state = SceneState::new(SceneConfig::default());
        let mut rec = Recorder::default();
        render(&state, &NoneReady, &mut rec);
        assert!(rec.images.is_empty());
    }

    #[test]
    fn fading_dissolves_overworld() {
        let mut state = SceneState::new(SceneConfig::default());
        state.fade.phase = FadePhase::Fading;
        state.fade.alpha = 51.0;
        let mut rec = Recorder::default();
        render(&state, &AllReady, &mut rec);
        let map = rec.images.iter().find(|(id, ..)| *id == ImageId::Map).expect("map drawn");
        assert!((map.2 - 0.8).abs() < 1e-9);
        let bg = rec.images.iter().find(|(id, ..)| *id == ImageId::BattleBackground).expect("background drawn");
        assert!((bg.2 - 0.2).abs() < 1e-9);
    }

    #[test]
    fn battle_shows_first_caption() {
        let mut state = SceneState::new(SceneConfig::default());
        state.fade.phase = FadePhase::Faded;
        state.fade.alpha = 255.0;
        state.battle.enter(&state.config);
        let mut rec = Recorder::default();
        render(&state, &AllReady, &mut rec);
        assert!(rec.images.iter().all(|(id, ..)| *id != ImageId::Map), "overworld not drawn once faded");
        assert!(rec.images.iter().any(|(id, ..)| *id == ImageId::BattleGrass));
        assert_eq!(rec.texts, vec![state.config.battle.first_caption.clone()]);
    }

    fn battle_state() -> SceneState {
        let mut state = SceneState::new(SceneConfig::default());
        state.fade.phase = FadePhase::Faded;
        state.fade.alpha = 255.0;
        state.battle.enter(&state.config);
        for _ in 0..400 {
            state.battle.update(&state.config, crate::timing::FrameTime::one_tick());
        }
        state
    }

    fn hp_bar(rec: &Recorder) -> Option<&(Rect, String)> {
        rec.fills.iter().find(|(rect, _)| rect.h == HP_BAR.2)
    }

    #[test]
    fn wild_hp_bar_starts_full_and_green() {
        let state = battle_state();
        let mut rec = Recorder::default();
        render(&state, &AllReady, &mut rec);
        let (rect, color) = hp_bar(&rec).expect("hp bar drawn");
        let (sx, sy) = state.battle.panels.get(PanelId::WildStat).origin();
        assert_eq!(*rect, Rect::new(sx + HP_BAR.0, sy + HP_BAR.1, 96.0, HP_BAR.2));
        assert_eq!(color, "#70f8a8");
    }

    #[test]
    fn fainted_battler_is_gone_and_bar_empty() {
        let mut state = battle_state();
        state.battle.knockout.phase = crate::battle::FaintPhase::Done;
        let mut rec = Recorder::default();
        render(&state, &AllReady, &mut rec);
        assert!(hp_bar(&rec).is_none(), "empty bar is not drawn");
        assert!(rec.images.iter().all(|(id, ..)| *id != ImageId::WildBattler));
        assert!(rec.images.iter().all(|(id, ..)| *id != ImageId::FightMenu), "menu stays hidden");
        assert_eq!(rec.texts, vec![state.config.battle.fainted_caption.clone()]);
    }

    #[test]
    fn falling_battler_drops_and_fades() {
        let mut state = battle_state();
        state.battle.knockout.phase = crate::battle::FaintPhase::Falling { elapsed_ms: 500.0 };
        let mut rec = Recorder::default();
        render(&state, &AllReady, &mut rec);
        let (_, dest, alpha) = rec.images.iter().find(|(id, ..)| *id == ImageId::WildBattler).expect("still drawn");
        let (_, wy) = state.battle.panels.get(PanelId::Wild).origin();
        assert!((dest.y - (wy + 20.0)).abs() < 1e-9);
        assert!((alpha - 0.5).abs() < 1e-9);
    }
}
