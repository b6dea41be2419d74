//! Dig Blob entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::UVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use dig_blob::persistence::{LocalStore, MemoryStore, PersistenceProvider};
    use dig_blob::renderer::{DrawCommand, Frame, css_color};
    use dig_blob::{Emote, InputEvent, Session, Settings, Viewport};

    /// Longest frame step fed to the simulation (ms)
    const MAX_FRAME_MS: f32 = 100.0;

    struct Game {
        session: Session,
        ctx: CanvasRenderingContext2d,
        /// Keys currently held
        keys: HashSet<String>,
        last_time: f64,
    }

    impl Game {
        /// Held arrow keys as a direction
        fn held_direction(&self) -> (f32, f32) {
            let held = |key: &str| self.keys.contains(key) as i32 as f32;
            (
                held("ArrowRight") - held("ArrowLeft"),
                held("ArrowDown") - held("ArrowUp"),
            )
        }

        fn sync_direction(&mut self) {
            let (dx, dy) = self.held_direction();
            self.session.on_input(InputEvent::Move { dx, dy });
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.session.tick(dt);
            paint(&self.ctx, &self.session.render());
        }
    }

    /// Replay a frame on the canvas
    fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame) {
        for command in &frame.commands {
            match command {
                DrawCommand::Clear { color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(0.0, 0.0, frame.viewport.x as f64, frame.viewport.y as f64);
                }
                DrawCommand::PushTransform { scale, offset } => {
                    ctx.save();
                    let _ = ctx.scale(*scale as f64, *scale as f64);
                    let _ = ctx.translate(-offset.x as f64, -offset.y as f64);
                }
                DrawCommand::PopTransform => ctx.restore(),
                DrawCommand::FillRect { min, size, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                }
                DrawCommand::FillCircle { center, radius, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                    ctx.fill();
                }
                DrawCommand::StrokeCircle {
                    center,
                    radius,
                    width,
                    color,
                } => {
                    stroke_arc(ctx, *center, *radius, 0.0, TAU as f32, *width, *color);
                }
                DrawCommand::StrokeArc {
                    center,
                    radius,
                    start,
                    end,
                    width,
                    color,
                } => {
                    stroke_arc(ctx, *center, *radius, *start, *end, *width, *color);
                }
                DrawCommand::FillPolygon { points, color, outline } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.close_path();
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill();
                    if let Some((stroke, width)) = outline {
                        ctx.set_stroke_style_str(&css_color(*stroke));
                        ctx.set_line_width(*width as f64);
                        ctx.stroke();
                    }
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    color,
                    align,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.set_font(&format!("{}px Arial", size.max(1.0)));
                    ctx.set_text_align(align.as_str());
                    ctx.set_text_baseline("middle");
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
    }

    fn stroke_arc(
        ctx: &CanvasRenderingContext2d,
        center: glam::Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: dig_blob::renderer::Color,
    ) {
        ctx.set_stroke_style_str(&css_color(color));
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        let _ = ctx.arc(center.x as f64, center.y as f64, radius as f64, start as f64, end as f64);
        ctx.stroke();
    }

    /// Emote hotkeys: the number row, then the letter row (`e` opens the wheel)
    fn emote_for_key(key: &str) -> Option<Emote> {
        const KEYS: [&str; 20] = [
            "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "q", "w", "", "r", "t", "y", "u", "i", "o", "p",
        ];
        KEYS.iter()
            .position(|k| !k.is_empty() && *k == key)
            .and_then(|i| Emote::from_id(i as u8))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Dig Blob starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok());
        let surface = canvas.as_ref().map(|canvas| {
            let width = window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
            let height = window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            Viewport::new(width as f32, height as f32)
        });

        let store: Box<dyn PersistenceProvider> = match LocalStore::open() {
            Some(store) => Box::new(store),
            None => {
                log::warn!("LocalStorage unavailable; progress will not be saved");
                Box::new(MemoryStore::new())
            }
        };
        let world = Settings::load(store.as_ref()).world;
        let seed = js_sys::Date::now() as u64;

        let session = match Session::initialize(surface, UVec2::new(world.width, world.height), store, seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return Err(JsValue::from_str(&e.to_string()));
            }
        };

        let Some((canvas, ctx)) = canvas.and_then(|canvas| {
            let ctx = canvas_context(&canvas)?;
            Some((canvas, ctx))
        }) else {
            return Err(JsValue::from_str("no 2d context"));
        };

        let game = Rc::new(RefCell::new(Game {
            session,
            ctx,
            keys: HashSet::new(),
            last_time: 0.0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, &canvas, game.clone());
        request_animation_frame(game);

        log::info!("Dig Blob running!");
        Ok(())
    }

    fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
    }

    /// Pointer position relative to the canvas
    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        (
            (event.client_x() as f64 - rect.left()) as f32,
            (event.client_y() as f64 - rect.top()) as f32,
        )
    }

    fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if key.starts_with("Arrow") {
                    event.prevent_default();
                }
                if event.repeat() {
                    return;
                }
                match key.as_str() {
                    "e" => g.session.on_input(InputEvent::ToggleEmoteWheel),
                    "s" => g.session.on_input(InputEvent::ToggleShop),
                    "c" => g.session.on_input(InputEvent::ToggleControls),
                    " " => g.session.on_input(InputEvent::ToggleDig),
                    other => {
                        if let Some(emote) = emote_for_key(other) {
                            g.session.on_input(InputEvent::ShowEmote(emote));
                        }
                    }
                }
                g.keys.insert(key);
                g.sync_direction();
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.keys.remove(&event.key());
                g.sync_direction();
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = canvas_point(&canvas_clone, &event);
                game.borrow_mut().session.on_input(InputEvent::PointerMoved { x, y });
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down / up
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let (x, y) = canvas_point(&canvas_clone, &event);
                game.borrow_mut().session.on_input(InputEvent::Interact { x, y });
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.on_input(InputEvent::InteractEnd);
            });
            let _ = canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let width = window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
                let height = window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0);
                canvas_clone.set_width(width as u32);
                canvas_clone.set_height(height as u32);
                game.borrow_mut()
                    .session
                    .resize(Viewport::new(width as f32, height as f32));
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dig_blob::persistence::{MemoryStore, PersistenceProvider};
    use dig_blob::{InputEvent, Session, Settings, Viewport};
    use glam::UVec2;

    env_logger::init();
    log::info!("Dig Blob (native) starting...");
    log::info!("Native mode runs a headless simulation - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let store: Box<dyn PersistenceProvider> = Box::new(MemoryStore::new());
    let world = Settings::load(store.as_ref()).world;

    let mut session = match Session::initialize(
        Some(Viewport::new(1280.0, 720.0)),
        UVec2::new(world.width, world.height),
        store,
        seed,
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    // Ten seconds of wandering in a square at 60 fps
    let legs = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];
    for frame in 0..600 {
        let (dx, dy) = legs[(frame / 150) % legs.len()];
        session.on_input(InputEvent::Move { dx, dy });
        session.tick(1000.0 / 60.0);
    }

    let state = session.state();
    let player = &state.player.body;
    println!(
        "After {} ticks: level {}, score {}, gold {}, size {:.1}, health {}, {} enemies, {} cells generated",
        state.time_ticks,
        player.level(),
        player.score,
        player.gold,
        player.size,
        player.health,
        state.enemies.len(),
        state.terrain.generated_cells()
    );
    let frame = session.render();
    println!("Last frame: {} draw commands", frame.commands.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
