//! Charge Climb entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};

    use charge_climb::audio::AudioManager;
    use charge_climb::consts::*;
    use charge_climb::platform::{Button, Session};
    use charge_climb::sim::{AnimationState, GameState, Platform, Rgba};
    use charge_climb::{HudSnapshot, QualityPreset, Settings};

    const BACKGROUND: &str = "#0f172a";
    const PLATFORM_COLOR: &str = "#475569";
    const CATCH_COLOR: &str = "#334155";
    const PLAYER_COLOR: &str = "#3b82f6";

    /// Game instance: the session plus the canvas it draws into
    struct Game {
        session: Session,
        ctx: Option<CanvasRenderingContext2d>,
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn render(&self) {
            let Some(ctx) = &self.ctx else { return };
            let state = self.session.state();

            ctx.set_fill_style_str(BACKGROUND);
            ctx.fill_rect(0.0, 0.0, VIEWPORT_WIDTH as f64, VIEWPORT_HEIGHT as f64);

            ctx.save();
            ctx.translate(-state.camera.x as f64, -state.camera.y as f64).ok();

            let top = state.camera.y;
            let bottom = state.camera.y + VIEWPORT_HEIGHT;
            for platform in state.platforms.iter().filter(|p| p.bottom() >= top && p.pos.y <= bottom) {
                draw_platform(ctx, platform);
            }

            for particle in &state.particles {
                ctx.set_fill_style_str(&particle.color.css(particle.alpha()));
                ctx.fill_rect(
                    particle.pos.x as f64,
                    particle.pos.y as f64,
                    particle.size as f64,
                    particle.size as f64,
                );
            }

            draw_player(ctx, state);
            ctx.restore();
        }

        /// Push HUD values into the DOM when they change
        fn update_hud(&mut self, document: &Document) {
            let hud = self.session.hud();
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }

            set_text(document, "#hud-height .hud-value", &format!("{}m", hud.height_m));
            set_text(document, "#hud-best .hud-value", &format!("{}m", hud.best_m));
            set_text(document, "#hud-time .hud-value", &hud.clock);
            set_text(document, "#hud-section .hud-value", &hud.section.to_string());

            if let Some(el) = document.get_element_by_id("charge-meter-fill") {
                let _ = el.set_attribute("style", &format!("width: {:.0}%", hud.charge_ratio * 100.0));
            }
            if let Some(el) = document.get_element_by_id("charge-meter") {
                let visible = self.session.settings().show_charge_meter && hud.charge_ratio > 0.0;
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
            if let Some(el) = document.get_element_by_id("start-prompt") {
                let _ = el.set_attribute("class", if hud.started { "hidden" } else { "" });
            }

            self.last_hud = Some(hud);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn draw_platform(ctx: &CanvasRenderingContext2d, platform: &Platform) {
        let color = if platform.size.x >= CATCH_WIDTH {
            CATCH_COLOR
        } else {
            PLATFORM_COLOR
        };
        ctx.set_fill_style_str(color);
        ctx.fill_rect(
            platform.pos.x as f64,
            platform.pos.y as f64,
            platform.size.x as f64,
            platform.size.y as f64,
        );
    }

    /// Box with a charge-dependent squash and tint
    fn draw_player(ctx: &CanvasRenderingContext2d, state: &GameState) {
        let player = &state.player;
        let ratio = player.charge_ratio();
        let (color, squash) = match player.animation {
            AnimationState::Charging => (
                Rgba::from_hsl(120.0 - ratio * 60.0, 0.7, 0.6).css(1.0),
                ratio * 6.0,
            ),
            AnimationState::Landing if player.animation_ticks < 6 => (PLAYER_COLOR.to_string(), 3.0),
            _ => (PLAYER_COLOR.to_string(), 0.0),
        };
        ctx.set_fill_style_str(&color);
        ctx.fill_rect(
            (player.pos.x - squash / 2.0) as f64,
            (player.pos.y + squash) as f64,
            (player.size.x + squash) as f64,
            (player.size.y - squash) as f64,
        );
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Charge Climb starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok());
        let ctx = canvas.as_ref().and_then(|canvas| {
            canvas.set_width(VIEWPORT_WIDTH as u32);
            canvas.set_height(VIEWPORT_HEIGHT as u32);
            canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        });
        if ctx.is_none() {
            log::warn!("No 2D canvas context - rendering disabled");
        }

        let seed = js_sys::Date::now() as u64;
        let mut settings = Settings::load();
        let query = window.location().search().unwrap_or_default();
        if let Some(preset) = QualityPreset::from_query(&query) {
            log::info!("Quality {} from URL", preset.as_str());
            settings.quality = preset;
        }
        let mut session = Session::new(seed, settings).with_audio(Box::new(AudioManager::new()));
        session.start();
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            ctx,
            last_hud: None,
        }));

        setup_keyboard(game.clone());
        for (id, button) in [
            ("btn-left", Button::Left),
            ("btn-right", Button::Right),
            ("btn-jump", Button::TouchJump),
        ] {
            bind_hold_button(&document, id, button, game.clone());
        }
        setup_restart_button(&document, game.clone());
        setup_page_lifecycle(&document, game.clone());

        request_animation_frame(game);

        log::info!("Charge Climb running!");
    }

    /// Register a listener and leak the closure for the page lifetime
    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        if target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Failed to listen for {}", event);
        }
        closure.forget();
    }

    /// Apply `f` to the game unless a frame currently holds it
    fn with_game(game: &Rc<RefCell<Game>>, f: impl FnOnce(&mut Game)) {
        match game.try_borrow_mut() {
            Ok(mut g) => f(&mut g),
            Err(_) => log::debug!("Game busy, input dropped"),
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            listen(&window, "keydown", move |event: KeyboardEvent| {
                let code = event.code();
                if let Some(button) = Button::from_code(&code) {
                    event.prevent_default();
                    with_game(&game, |g| g.session.input_mut().press(button));
                } else if code == "KeyM" && !event.repeat() {
                    with_game(&game, |g| g.session.toggle_mute());
                }
            });
        }

        listen(&window, "keyup", move |event: KeyboardEvent| {
            if let Some(button) = Button::from_code(&event.code()) {
                event.prevent_default();
                with_game(&game, |g| g.session.input_mut().release(button));
            }
        });
    }

    /// On-screen hold button driven by touch or mouse
    fn bind_hold_button(document: &Document, id: &str, button: Button, game: Rc<RefCell<Game>>) {
        let Some(el) = document.get_element_by_id(id) else {
            log::debug!("No #{} control", id);
            return;
        };

        for event in ["touchstart", "mousedown"] {
            let game = game.clone();
            listen(&el, event, move |event: web_sys::Event| {
                event.prevent_default();
                with_game(&game, |g| g.session.input_mut().press(button));
            });
        }
        for event in ["touchend", "touchcancel", "mouseup", "mouseleave"] {
            let game = game.clone();
            listen(&el, event, move |event: web_sys::Event| {
                event.prevent_default();
                with_game(&game, |g| g.session.input_mut().release(button));
            });
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("restart-btn") else {
            return;
        };
        listen(&btn, "click", move |_event: web_sys::MouseEvent| {
            let seed = js_sys::Date::now() as u64;
            with_game(&game, |g| {
                g.session.restart(seed);
                g.last_hud = None;
            });
        });
    }

    /// Focus loss drops held input; page teardown shuts the session down
    fn setup_page_lifecycle(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            listen(&window, "blur", move |_event: web_sys::Event| {
                with_game(&game, |g| g.session.input_mut().release_all());
            });
        }

        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: web_sys::Event| {
                if document_clone.hidden() {
                    with_game(&game, |g| g.session.input_mut().release_all());
                }
            });
        }

        // Page is going away: stop the loop and close the audio context
        listen(&window, "pagehide", move |_event: web_sys::Event| {
            with_game(&game, |g| g.session.shutdown());
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        match game.try_borrow_mut() {
            Ok(mut g) => {
                g.session.frame(time);
                g.render();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    g.update_hud(&document);
                }
            }
            Err(_) => log::debug!("Frame skipped, game busy"),
        }

        let running = game
            .try_borrow()
            .map(|g| g.session.is_running())
            .unwrap_or(true);
        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Headless run with a scripted player; logs what happened
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use charge_climb::Settings;
    use charge_climb::audio::NullAudio;
    use charge_climb::platform::{Button, Session};
    use charge_climb::sim::GameEvent;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let frames: u32 = std::env::args()
        .nth(2)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3600);

    log::info!("Charge Climb (native) starting, seed {}", seed);
    log::info!("Native mode runs a scripted climber - use `trunk serve` for the web version");

    let mut session = Session::new(seed, Settings::load()).with_audio(Box::new(NullAudio));
    session.start();

    let mut jumps = 0;
    let mut resets = 0;
    let mut sections = 0;
    let frame_ms = 1000.0 / 60.0;

    for frame in 0..frames {
        // Swap walking direction every 150 frames, hold jump for a varying charge
        let phase = frame % 75;
        let input = session.input_mut();
        if phase == 0 {
            input.press(Button::Jump);
        } else if phase == 20 + (frame / 75) % 40 {
            input.release(Button::Jump);
        }
        let go_left = (frame / 150) % 2 == 1;
        input.release(if go_left { Button::Right } else { Button::Left });
        input.press(if go_left { Button::Left } else { Button::Right });

        for event in session.frame(frame as f64 * frame_ms) {
            match event {
                GameEvent::Jump => jumps += 1,
                GameEvent::SafetyReset => resets += 1,
                GameEvent::SectionGenerated { .. } => sections += 1,
                _ => {}
            }
        }
    }
    session.stop();

    let hud = session.hud();
    println!("\nScripted run finished after {} frames", frames);
    println!("  time:     {}", hud.clock);
    println!("  height:   {}m (best {}m)", hud.height_m, hud.best_m);
    println!("  section:  {}", hud.section);
    println!("  jumps:    {}", jumps);
    println!("  resets:   {}", resets);
    println!("  sections: {}", sections);
}
