//! Browser host: canvas surface, image and audio loading, DOM listeners and
//! the requestAnimationFrame loop. Everything stateful lives in `HOST`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement, window};

use crate::assets::{AssetRegistry, AssetSource, ImageId, ImageInfo};
use crate::audio::{AudioBackend, NullAudio, SoundHandle};
use crate::config::SceneConfig;
use crate::effects::{Music, Sfx};
use crate::error::GameError;
use crate::input::{InputEvent, Key};
use crate::render::{Rect, Surface};
use crate::scene::{MAP_SCENE, MapScene, SceneManager};
use crate::timing::FrameClock;

const CANVAS_ID: &str = "bugia-canvas";
const FONT: &str = "16px 'Press Start 2P', monospace";

// --- Images ------------------------------------------------------------------

/// Readiness view over the shared registry the load callbacks write into.
pub struct WebAssets {
    registry: Rc<RefCell<AssetRegistry>>,
}

impl AssetSource for WebAssets {
    fn image(&self, id: ImageId) -> Option<ImageInfo> {
        self.registry.borrow().image(id)
    }
}

/// Starts every image load once. Failures are recorded and never retried.
pub fn load_images() -> Result<(WebAssets, HashMap<ImageId, HtmlImageElement>), JsValue> {
    let registry = Rc::new(RefCell::new(AssetRegistry::new()));
    let mut elements = HashMap::new();
    for id in ImageId::ALL {
        if !registry.borrow_mut().begin(id) {
            continue;
        }
        let img = HtmlImageElement::new()?;
        {
            let reg = registry.clone();
            let el = img.clone();
            let onload = Closure::wrap(Box::new(move || {
                let info = ImageInfo { width: el.natural_width(), height: el.natural_height() };
                let mut reg = reg.borrow_mut();
                reg.mark_loaded(id, info);
                if reg.pending() == 0 {
                    log::info!("all images settled");
                }
            }) as Box<dyn FnMut()>);
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
        }
        {
            let reg = registry.clone();
            let onerror = Closure::wrap(Box::new(move || {
                let mut reg = reg.borrow_mut();
                reg.mark_failed(id, format!("could not fetch {}", id.path()));
                if reg.pending() == 0 {
                    log::info!("all images settled");
                }
            }) as Box<dyn FnMut()>);
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }
        img.set_src(id.path());
        elements.insert(id, img);
    }
    log::info!("loading {} images", elements.len());
    Ok((WebAssets { registry }, elements))
}

// --- Canvas ------------------------------------------------------------------

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<ImageId, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, images: HashMap<ImageId, HtmlImageElement>) -> Self {
        ctx.set_font(FONT);
        ctx.set_text_align("left");
        ctx.set_image_smoothing_enabled(false);
        Self { ctx, images }
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, rect: Rect, color: &str, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
        self.ctx.set_global_alpha(1.0);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn draw_image(&mut self, id: ImageId, src: Option<Rect>, dest: Rect, alpha: f64) {
        let Some(img) = self.images.get(&id) else { return };
        self.ctx.set_global_alpha(alpha);
        let drawn = match src {
            Some(s) => self
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img, s.x, s.y, s.w, s.h, dest.x, dest.y, dest.w, dest.h,
                ),
            None => self.ctx.draw_image_with_html_image_element_and_dw_and_dh(img, dest.x, dest.y, dest.w, dest.h),
        };
        if let Err(err) = drawn {
            log::debug!("draw {id:?} failed: {err:?}");
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: &str, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, x, y);
        self.ctx.set_global_alpha(1.0);
    }
}

// --- Audio -------------------------------------------------------------------

#[derive(Default)]
struct Playback {
    playing: HashSet<Sfx>,
    finished: Vec<Sfx>,
    failed: Vec<Sfx>,
}

/// One `<audio>` element per sound. `ended` and rejected `play()` promises
/// are queued and drained by the director each frame.
pub struct HtmlAudio {
    sfx: HashMap<Sfx, HtmlAudioElement>,
    music: HashMap<Music, HtmlAudioElement>,
    current: Option<Music>,
    playback: Rc<RefCell<Playback>>,
    rejected: HashMap<Sfx, Closure<dyn FnMut(JsValue)>>,
    music_rejected: Closure<dyn FnMut(JsValue)>,
    next_handle: SoundHandle,
}

impl HtmlAudio {
    pub fn new() -> Result<Self, JsValue> {
        let playback = Rc::new(RefCell::new(Playback::default()));
        let mut sfx = HashMap::new();
        let mut rejected = HashMap::new();
        for id in Sfx::ALL {
            let el = HtmlAudioElement::new_with_src(id.path())?;
            el.set_preload("auto");
            {
                let pb = playback.clone();
                let ended = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
                    let mut pb = pb.borrow_mut();
                    pb.playing.remove(&id);
                    pb.finished.push(id);
                }) as Box<dyn FnMut(_)>);
                el.add_event_listener_with_callback("ended", ended.as_ref().unchecked_ref())?;
                ended.forget();
            }
            {
                let pb = playback.clone();
                let errored = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
                    log::warn!("sound {} could not be loaded", id.path());
                    let mut pb = pb.borrow_mut();
                    if pb.playing.remove(&id) {
                        pb.failed.push(id);
                    }
                }) as Box<dyn FnMut(_)>);
                el.add_event_listener_with_callback("error", errored.as_ref().unchecked_ref())?;
                errored.forget();
            }
            let pb = playback.clone();
            let reject = Closure::wrap(Box::new(move |reason: JsValue| {
                log::warn!("playback of {id:?} rejected: {reason:?}");
                let mut pb = pb.borrow_mut();
                if pb.playing.remove(&id) {
                    pb.failed.push(id);
                }
            }) as Box<dyn FnMut(JsValue)>);
            rejected.insert(id, reject);
            sfx.insert(id, el);
        }

        let mut music = HashMap::new();
        for track in [Music::Overworld, Music::Battle] {
            let el = HtmlAudioElement::new_with_src(track.path())?;
            el.set_preload("auto");
            music.insert(track, el);
        }
        let music_rejected = Closure::wrap(Box::new(|reason: JsValue| {
            log::warn!("music playback rejected: {reason:?}");
        }) as Box<dyn FnMut(JsValue)>);

        Ok(Self { sfx, music, current: None, playback, rejected, music_rejected, next_handle: 0 })
    }
}

impl AudioBackend for HtmlAudio {
    fn play_music(&mut self, track: Music, looped: bool) -> Result<(), GameError> {
        self.stop_music();
        let el = self.music.get(&track).ok_or_else(|| GameError::Dom(format!("no element for {track:?}")))?;
        el.set_loop(looped);
        let promise = el.play()?;
        let _ = promise.catch(&self.music_rejected);
        self.current = Some(track);
        Ok(())
    }

    fn stop_music(&mut self) {
        let Some(track) = self.current.take() else { return };
        if let Some(el) = self.music.get(&track) {
            let _ = el.pause();
            el.set_current_time(0.0);
        }
    }

    fn play_sfx(&mut self, sfx: Sfx) -> Result<SoundHandle, GameError> {
        let el = self.sfx.get(&sfx).ok_or(GameError::AudioUnavailable { sound: sfx })?;
        el.set_current_time(0.0);
        let promise = el
            .play()
            .map_err(|err| GameError::AudioPlayback { sound: sfx, reason: format!("{err:?}") })?;
        if let Some(reject) = self.rejected.get(&sfx) {
            let _ = promise.catch(reject);
        }
        self.playback.borrow_mut().playing.insert(sfx);
        self.next_handle += 1;
        Ok(self.next_handle)
    }

    fn is_playing(&self, sfx: Sfx) -> bool {
        self.playback.borrow().playing.contains(&sfx)
    }

    fn set_music_volume(&mut self, volume: f64) {
        for el in self.music.values() {
            el.set_volume(volume);
        }
    }

    fn set_sfx_volume(&mut self, volume: f64) {
        for el in self.sfx.values() {
            el.set_volume(volume);
        }
    }

    fn drain_finished(&mut self) -> Vec<Sfx> {
        std::mem::take(&mut self.playback.borrow_mut().finished)
    }

    fn drain_failed(&mut self) -> Vec<Sfx> {
        std::mem::take(&mut self.playback.borrow_mut().failed)
    }
}

// --- Host & loop -------------------------------------------------------------

struct Host {
    manager: SceneManager,
    assets: WebAssets,
    surface: CanvasSurface,
    clock: FrameClock,
}

impl Host {
    fn frame(&mut self, ts: f64) {
        let elapsed = self.clock.tick(ts).elapsed_ms;
        self.manager.update(elapsed);
        self.manager.render(&self.assets, &mut self.surface);
    }
}

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

fn dispatch(event: InputEvent) {
    HOST.with(|cell| {
        if let Some(host) = cell.borrow_mut().as_mut() {
            host.manager.handle_event(event);
        }
    });
}

pub fn start(config: SceneConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute("style", "image-rendering:pixelated; border:2px solid #222; background:#000;").ok();
        doc.body().ok_or_else(|| JsValue::from_str("no body"))?.append_child(&c)?;
        c
    };
    canvas.set_width(config.world.viewport_w as u32);
    canvas.set_height(config.world.viewport_h as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let (assets, images) = load_images()?;
    let backend: Box<dyn AudioBackend> = match HtmlAudio::new() {
        Ok(audio) => Box::new(audio),
        Err(err) => {
            log::warn!("audio disabled: {err:?}");
            Box::new(NullAudio)
        }
    };

    let mut manager = SceneManager::new();
    manager.register(MAP_SCENE, Box::new(MapScene::new(config, backend)));
    manager.change_scene(MAP_SCENE).map_err(|err| JsValue::from_str(&err.to_string()))?;

    HOST.with(|cell| {
        cell.replace(Some(Host {
            manager,
            assets,
            surface: CanvasSurface::new(ctx, images),
            clock: FrameClock::new(),
        }))
    });

    // Keyboard: held directions need both edges; auto-repeat is ignored.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = Key::from_code(&evt.code());
            if key != Key::Other {
                evt.prevent_default();
            }
            if !evt.repeat() {
                dispatch(InputEvent::KeyDown(key));
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            dispatch(InputEvent::KeyUp(Key::from_code(&evt.code())));
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Pointer: offset coordinates are canvas-local.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            dispatch(InputEvent::PointerDown { x: evt.offset_x() as f64, y: evt.offset_y() as f64 });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            dispatch(InputEvent::PointerMove { x: evt.offset_x() as f64, y: evt.offset_y() as f64 });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_loop();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &FrameCallback) {
    let Some(win) = window() else { return };
    if let Some(closure) = callback.borrow().as_ref() {
        let _ = win.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        HOST.with(|cell| {
            if let Some(host) = cell.borrow_mut().as_mut() {
                host.frame(ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}
