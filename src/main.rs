//! Spike Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement};

    use spike_run::audio::{AudioManager, SoundEffect};
    use spike_run::render::CanvasRenderer;
    use spike_run::sim::{EndCause, GameEvent, RenderSnapshot, RunPhase, WorldState, tick};
    use spike_run::{BalanceLedger, Session};

    /// Game instance holding all state
    struct Game {
        state: WorldState,
        renderer: Option<CanvasRenderer>,
        ledger: BalanceLedger,
        session: Session,
        audio: AudioManager,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: WorldState::new(seed),
                renderer: None,
                ledger: BalanceLedger::load(),
                session: Session::load(),
                audio: AudioManager::new(),
            }
        }

        /// Start a run: fresh world, armed ledger. Also serves as restart.
        fn start_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.state = WorldState::new(seed);
            self.state.begin();
            self.ledger.begin_run();
            self.audio.resume();
            log::info!("Run started with seed: {}", seed);
        }

        /// Jump input; plays the jump sound only when the input was honored
        fn jump(&mut self) {
            if self.state.try_jump() {
                self.audio.play(SoundEffect::Jump);
            }
        }

        /// One scheduling tick: advance the sim, then drain notifications
        fn update(&mut self) {
            tick(&mut self.state);

            let events: Vec<GameEvent> = self.state.events.drain(..).collect();
            for event in events {
                match event {
                    GameEvent::ScoreChanged(score) => set_text("hud-score", &score.to_string()),
                    GameEvent::RunEnded { cause, score } => self.on_run_ended(cause, score),
                }
            }
        }

        fn on_run_ended(&mut self, cause: EndCause, score: u64) {
            self.audio.play(match cause {
                EndCause::TrapHit => SoundEffect::TrapHit,
                EndCause::Captured => SoundEffect::Captured,
            });
            self.audio.play(SoundEffect::GameOver);

            // Idempotent per run; a re-rendered overlay can't double-credit
            let best = self.ledger.best_candidate(score);
            if self.ledger.settle(score, js_sys::Date::now()) {
                log::info!("Run over ({:?}), settled {} points", cause, score);
            }

            set_text("final-score", &score.to_string());
            set_text("final-best", &best.to_string());
            set_text("hud-best", &best.to_string());
            set_text("hud-balance", &self.ledger.balance.to_string());
            show("game-over", true);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref renderer) = self.renderer {
                let snap = RenderSnapshot::capture(&self.state);
                renderer.render(&snap);
            }
        }
    }

    // === Small DOM helpers ===

    fn document() -> web_sys::Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(id: &str, visible: bool) {
        if let Some(el) = document().get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn input_value(id: &str) -> String {
        document()
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_input_value(id: &str, value: &str) {
        if let Some(input) = document()
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(value);
        }
    }

    /// Size the backing buffer to the CSS size times the device pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn on_click(id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        if let Some(el) = document().get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spike Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().renderer = CanvasRenderer::new(&canvas);

        // Keep the backing buffer in step with the viewport
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let (width, height) = fit_canvas(&canvas);
                if let Some(ref mut renderer) = game.borrow_mut().renderer {
                    renderer.resize(width, height);
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let g = game.borrow();
            set_text("hud-balance", &g.ledger.balance.to_string());
            set_text("hud-best", &g.ledger.best_score().to_string());
            // Gate on the login screen unless an identity survived the reload
            if g.session.is_logged_in() {
                show("login", false);
                show("start-prompt", true);
            } else {
                show("login", true);
            }
        }

        setup_input_handlers(game.clone());
        setup_login(game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game);

        log::info!("Spike Run running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        // Keyboard: jump on Space/ArrowUp, start or restart on Enter
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if !g.session.is_logged_in() {
                    return;
                }
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        match g.state.phase {
                            RunPhase::Playing => g.jump(),
                            RunPhase::Start => {
                                show("start-prompt", false);
                                g.start_run();
                            }
                            RunPhase::GameOver => {}
                        }
                    }
                    "Enter" => {
                        if g.state.phase != RunPhase::Playing {
                            show("start-prompt", false);
                            show("game-over", false);
                            g.start_run();
                        }
                    }
                    "m" | "M" => {
                        let muted = g.audio.toggle_muted();
                        set_text("hud-muted", if muted { "muted" } else { "" });
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch anywhere on the canvas also jumps (or starts)
        {
            let game = game.clone();
            let document = document();
            if let Some(canvas) = document.get_element_by_id("canvas") {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    if !g.session.is_logged_in() {
                        return;
                    }
                    match g.state.phase {
                        RunPhase::Playing => g.jump(),
                        RunPhase::Start => {
                            show("start-prompt", false);
                            g.start_run();
                        }
                        RunPhase::GameOver => {}
                    }
                });
                let _ = canvas.add_event_listener_with_callback(
                    "touchstart",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }
    }

    fn setup_login(game: Rc<RefCell<Game>>) {
        // Fill the key field with freshly generated material
        on_click("generate-btn", move |_| {
            set_input_value("key-input", &Session::generate_key_material());
            set_text("login-error", "");
        });

        // Accept whatever well-formed material is in the field
        {
            let game = game.clone();
            on_click("login-btn", move |_| {
                let material = input_value("key-input");
                let mut g = game.borrow_mut();
                match g.session.login(&material) {
                    Ok(()) => {
                        show("login", false);
                        show("start-prompt", true);
                        set_text("login-error", "");
                    }
                    Err(e) => set_text("login-error", &e.to_string()),
                }
            });
        }

        on_click("logout-btn", move |_| {
            let mut g = game.borrow_mut();
            g.session.logout();
            g.state = WorldState::new(js_sys::Date::now() as u64);
            show("game-over", false);
            show("start-prompt", false);
            show("login", true);
        });
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        // Restart from the game-over overlay
        {
            let game = game.clone();
            on_click("restart-btn", move |_| {
                show("game-over", false);
                game.borrow_mut().start_run();
            });
        }

        // Cosmetic withdrawal: resets the balance, transfers nothing
        on_click("withdraw-btn", move |_| {
            let mut g = game.borrow_mut();
            match g.ledger.withdraw() {
                Ok(amount) => {
                    g.audio.play(SoundEffect::Withdraw);
                    set_text("withdraw-msg", &format!("Withdrew {} points!", amount));
                }
                Err(e) => set_text("withdraw-msg", &e.to_string()),
            }
            set_text("hud-balance", &g.ledger.balance.to_string());
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spike Run (native) starting...");
    log::info!("This is a browser game - build for wasm32 and serve the web bundle");

    // Quick native smoke run of the simulation
    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use spike_run::sim::{WorldState, tick};

    let mut state = WorldState::new(42);
    state.begin();
    for _ in 0..600 {
        if state.player.grounded
            && state.obstacles.iter().any(|o| {
                !o.triggered
                    && o.world_x > state.player.world_x
                    && o.world_x - state.player.world_x < 120.0
            })
        {
            state.try_jump();
        }
        tick(&mut state);
    }
    println!(
        "600 ticks: x={:.0} score={} obstacles={} running={}",
        state.player.world_x,
        state.display_score(),
        state.obstacles.len(),
        state.running()
    );
}
