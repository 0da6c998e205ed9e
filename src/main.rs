//! Retro Arcade entry point
//!
//! The browser build wires DOM events, the canvas and animation frames into
//! the `Arcade` shell. The native build runs every game headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use retro_arcade::Arcade;
    use retro_arcade::audio::WebAudioSink;
    use retro_arcade::error::EngineError;
    use retro_arcade::input::{Action, CanvasRect};
    use retro_arcade::render::CanvasSurface;
    use retro_arcade::storage::LocalStore;

    const CANVAS_ID: &str = "game-canvas";

    /// Everything the DOM callbacks share
    struct App {
        arcade: Arcade,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        document: Document,
        /// Game screen showing (as opposed to the menu)
        in_game: bool,
        audio_ready: bool,
        shown_score: Option<u64>,
    }

    impl App {
        /// First user gesture unlocks audio output
        fn gesture(&mut self) {
            if !self.audio_ready {
                self.arcade.warm_up_audio();
                self.audio_ready = true;
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        /// Rebuild the game list from the current progress and scores
        fn show_menu(&mut self) {
            self.in_game = false;
            self.shown_score = None;
            self.set_hidden("game-screen", true);
            self.set_hidden("menu-screen", false);

            let summary = self.arcade.summary();
            self.set_text(
                "#menu-summary",
                &format!(
                    "{}/{} UNLOCKED - {} PTS",
                    summary.unlocked, summary.total_games, summary.total_score
                ),
            );

            let Some(list) = self.document.get_element_by_id("game-list") else {
                log::warn!("#game-list missing, menu not rendered");
                return;
            };
            list.set_inner_html("");
            for entry in self.arcade.menu() {
                let Ok(card) = self.document.create_element("button") else {
                    continue;
                };
                let class = if entry.unlocked { "game-card" } else { "game-card locked" };
                let _ = card.set_attribute("class", class);
                let _ = card.set_attribute("data-index", &entry.index.to_string());
                let icon = if entry.unlocked { entry.icon } else { "🔒" };
                card.set_inner_html(&format!(
                    "<span class=\"icon\">{}</span><span class=\"name\">{}</span><span class=\"best\">HI {}</span>",
                    icon, entry.name, entry.high_score
                ));
                let _ = list.append_child(&card);
            }
        }

        fn launch(&mut self, index: usize) {
            let desc = match self.arcade.launch(index) {
                Ok(desc) => desc,
                Err(e) => {
                    log::info!("Launch refused: {}", e);
                    return;
                }
            };
            self.canvas.set_width(desc.width);
            self.canvas.set_height(desc.height);
            self.set_text("#game-title", desc.name);
            self.set_hidden("menu-screen", true);
            self.set_hidden("game-screen", false);
            self.in_game = true;
            self.shown_score = None;
            self.resize();
        }

        fn back_to_menu(&mut self) {
            self.arcade.back_to_menu();
            self.show_menu();
        }

        /// Fit the canvas inside its container, keeping the backing store at
        /// the logical size
        fn resize(&mut self) {
            let Some(container) = self.document.get_element_by_id("canvas-container") else {
                return;
            };
            let (w, h) = (container.client_width() as f32, container.client_height() as f32);
            if let Some(scale) = self.arcade.resize(w, h) {
                let style = self.canvas.style();
                let _ = style.set_property("width", &format!("{}px", scale.css_width));
                let _ = style.set_property("height", &format!("{}px", scale.css_height));
            }
        }

        /// Client coordinates to logical canvas pixels
        fn to_logical(&self, client_x: i32, client_y: i32) -> Vec2 {
            let r = self.canvas.get_bounding_client_rect();
            let rect = CanvasRect {
                left: r.left() as f32,
                top: r.top() as f32,
                width: r.width() as f32,
                height: r.height() as f32,
            };
            let backing = Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32);
            rect.client_to_logical(backing, Vec2::new(client_x as f32, client_y as f32))
        }

        fn update_hud(&mut self) {
            let score = self.arcade.score();
            if self.shown_score == Some(score) {
                return;
            }
            self.shown_score = Some(score);
            self.set_text("#hud-score .hud-value", &score.to_string());
            let best = self
                .arcade
                .session()
                .map_or(0, |s| s.engine().high_score());
            self.set_text("#hud-high .hud-value", &best.to_string());
        }
    }

    pub fn run() -> Result<(), EngineError> {
        let window = web_sys::window().ok_or(EngineError::NoWindow)?;
        let document = window.document().ok_or(EngineError::NoWindow)?;

        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| EngineError::CanvasNotFound(CANVAS_ID.to_string()))?;
        let surface = CanvasSurface::from_canvas(&canvas)?;

        let seed = js_sys::Date::now() as u64 ^ (js_sys::Math::random() * u32::MAX as f64) as u64;
        let arcade = Arcade::new(Rc::new(LocalStore), Box::new(WebAudioSink::new()), seed);
        log::info!("Arcade initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            arcade,
            surface,
            canvas: canvas.clone(),
            document: document.clone(),
            in_game: false,
            audio_ready: false,
            shown_score: None,
        }));
        app.borrow_mut().show_menu();
        update_mute_label(&app.borrow());

        setup_menu(&document, app.clone());
        setup_keyboard(app.clone());
        setup_buttons(&document, app.clone());
        setup_canvas(&canvas, app.clone());
        setup_shell_buttons(&document, app.clone());
        setup_auto_pause(app.clone());

        request_animation_frame(app);

        log::info!("Retro Arcade running!");
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            if a.in_game {
                a.arcade.frame(time, &mut a.surface);
                // B after game over leaves the session from a key handler
                if a.arcade.current().is_none() {
                    a.show_menu();
                } else {
                    a.update_hud();
                }
            }
        }

        request_animation_frame(app);
    }

    /// One delegated click handler for every card in the game list
    fn setup_menu(document: &Document, app: Rc<RefCell<App>>) {
        let Some(list) = document.get_element_by_id("game-list") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let Some(card) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(".game-card").ok().flatten())
            else {
                return;
            };
            let Some(index) = card
                .get_attribute("data-index")
                .and_then(|i| i.parse::<usize>().ok())
            else {
                return;
            };
            let mut a = app.borrow_mut();
            a.gesture();
            a.launch(index);
        });
        let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if !a.in_game {
                    return;
                }
                a.gesture();
                if a.arcade.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if a.arcade.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen controls: every `[data-action]` element presses its action
    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        let Ok(buttons) = document.query_selector_all("[data-action]") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(action) = button
                .get_attribute("data-action")
                .and_then(|name| Action::from_str(&name))
            else {
                log::warn!("Unknown data-action on control button");
                continue;
            };

            for (event_name, pressed) in [
                ("mousedown", true),
                ("touchstart", true),
                ("mouseup", false),
                ("mouseleave", false),
                ("touchend", false),
                ("touchcancel", false),
            ] {
                let app = app.clone();
                let el = button.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    // Keeps touches from also firing the emulated mouse events
                    if event.type_().starts_with("touch") {
                        event.prevent_default();
                    }
                    let mut a = app.borrow_mut();
                    if pressed {
                        a.gesture();
                        let _ = el.class_list().add_1("pressed");
                        a.arcade.button_press(action);
                    } else {
                        let _ = el.class_list().remove_1("pressed");
                        a.arcade.button_release(action);
                    }
                });
                let _ = button
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Swipes, taps and drags on the canvas
    fn setup_canvas(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Touch start: begin a swipe and tap at the contact point
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.gesture();
                let pos = a.to_logical(touch.client_x(), touch.client_y());
                a.arcade.touch_start(pos, js_sys::Date::now());
                a.arcade.tap(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let pos = a.to_logical(touch.client_x(), touch.client_y());
                    a.arcade.tap(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: finish the swipe
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut a = app.borrow_mut();
                    let pos = a.to_logical(touch.client_x(), touch.client_y());
                    a.arcade.touch_end(pos, js_sys::Date::now());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().arcade.touch_cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.gesture();
                let pos = a.to_logical(event.client_x(), event.client_y());
                a.arcade.tap(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn update_mute_label(app: &App) {
        let label = if app.arcade.settings().muted { "🔇" } else { "🔊" };
        app.set_text("#mute-btn", label);
    }

    /// Back and mute buttons, plus refitting on window resize
    fn setup_shell_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("back-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().back_to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.gesture();
                let muted = a.arcade.toggle_mute();
                update_mute_label(&a);
                log::info!("Muted: {}", muted);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.hidden() {
                    app.borrow_mut().arcade.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().arcade.pause();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Retro Arcade starting...");

    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Retro Arcade (native) starting...");
    log::info!("The playable build is wasm32 - run with `trunk serve` for the web version");

    println!("\nRunning headless smoke sessions...");
    let failures = smoke_test();
    if failures == 0 {
        println!("✓ All games ran cleanly!");
    } else {
        println!("✗ {} game(s) failed to start", failures);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run every registered game for a minute of simulated time with scripted
/// input. Returns the number of games that could not be started.
#[cfg(not(target_arch = "wasm32"))]
fn smoke_test() -> usize {
    use glam::Vec2;
    use retro_arcade::games::REGISTRY;
    use retro_arcade::input::{Action, InputSignal};
    use retro_arcade::render::RecordingSurface;
    use retro_arcade::{EngineConfig, Session};

    const FRAMES: u32 = 3600;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MOVES: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    let mut failures = 0;
    for (i, desc) in REGISTRY.iter().enumerate() {
        let config = EngineConfig::new(desc.id)
            .with_size(desc.width, desc.height)
            .with_seed(i as u64 + 1);
        let mut session = match Session::new(config, (desc.build)()) {
            Ok(session) => session,
            Err(e) => {
                log::error!("{}: {}", desc.id, e);
                failures += 1;
                continue;
            }
        };

        let mut surface = RecordingSurface::new();
        let center = Vec2::new(desc.width as f32, desc.height as f32) / 2.0;
        session.start();
        for frame in 0..FRAMES {
            if frame % 30 == 0 {
                let action = MOVES[(frame / 30) as usize % MOVES.len()];
                session.handle_input(InputSignal::Press(action));
                session.handle_input(InputSignal::Press(Action::A));
                session.handle_tap(center + Vec2::new((frame % 90) as f32 - 45.0, 0.0));
                session.handle_input(InputSignal::Release(action));
                session.handle_input(InputSignal::Release(Action::A));
                session.handle_input(InputSignal::ReleaseAny);
            }
            session.frame(frame as f64 * FRAME_MS, &mut surface);
            if session.engine().is_game_over() {
                break;
            }
        }

        let engine = session.engine();
        log::info!(
            "{:<14} score {:>6}  {}",
            desc.id,
            engine.score(),
            if engine.is_game_over() { "game over" } else { "still running" }
        );
        session.teardown();
    }
    failures
}
