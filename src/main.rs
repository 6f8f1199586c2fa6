//! Lane Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use lane_runner::consts::*;
    use lane_runner::sim::{GameState, Intent};
    use lane_runner::{EntityView, Game, Presenter, TickDriver, Tuning, autopilot};

    /// World width shown on the canvas (lanes plus a margin)
    const VIEW_HALF_WIDTH: f32 = 3.0 * LANE_WIDTH / 2.0 + 1.0;

    /// DOM HUD plus a top-down 2D canvas view
    struct DomPresenter {
        document: Document,
        ctx: Option<CanvasRenderingContext2d>,
        width: f64,
        height: f64,
    }

    impl DomPresenter {
        fn new(document: Document, canvas: &HtmlCanvasElement) -> Self {
            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
            if ctx.is_none() {
                log::warn!("No 2D context - drawing disabled");
            }
            Self {
                document,
                ctx,
                width: canvas.width() as f64,
                height: canvas.height() as f64,
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// World (x, z) to canvas pixels; the player sits near the bottom
        fn to_screen(&self, x: f32, z: f32) -> (f64, f64) {
            let near = PLAYER_Z + CULL_MARGIN;
            let sx = (x + VIEW_HALF_WIDTH) / (2.0 * VIEW_HALF_WIDTH);
            let sz = (z - SPAWN_Z) / (near - SPAWN_Z);
            (sx as f64 * self.width, sz as f64 * self.height)
        }

        fn unit(&self) -> f64 {
            self.width / (2.0 * VIEW_HALF_WIDTH as f64)
        }
    }

    impl Presenter for DomPresenter {
        // Visuals are redrawn from state every frame, so mounting is bookkeeping only
        fn mount(&mut self, entity: &EntityView) {
            log::debug!("mount {:?} #{}", entity.kind, entity.id);
        }

        fn unmount(&mut self, entity: &EntityView) {
            log::debug!("unmount {:?} #{}", entity.kind, entity.id);
        }

        fn set_player_transform(&mut self, _lane: i8, _vertical_offset: f32, _squash: f32) {}

        fn render_frame(&mut self, state: &GameState) {
            let Some(ctx) = self.ctx.as_ref() else {
                return;
            };
            let unit = self.unit();

            ctx.set_fill_style_str("#222222");
            ctx.fill_rect(0.0, 0.0, self.width, self.height);

            // Lane strips
            ctx.set_fill_style_str("#1f6b1f");
            for lane in LANES {
                let (x, _) = self.to_screen(lane as f32 * LANE_WIDTH, SPAWN_Z);
                ctx.fill_rect(x - unit * 0.8, 0.0, unit * 1.6, self.height);
            }

            ctx.set_fill_style_str("#3050ff");
            for o in state.registry.obstacles() {
                let (x, y) = self.to_screen(o.pos.x, o.pos.z);
                ctx.fill_rect(x - unit / 2.0, y - unit / 2.0, unit, unit);
            }

            ctx.set_fill_style_str("#ffd700");
            for c in state.registry.coins() {
                // Spin shows as a horizontally squashed coin
                let w = unit * 0.6 * (c.spin.cos().abs() as f64).max(0.15);
                let (x, y) = self.to_screen(c.pos.x, c.pos.z);
                ctx.fill_rect(x - w / 2.0, y - unit * 0.3, w, unit * 0.6);
            }

            // Higher jumps draw bigger, slides draw flatter
            let player = &state.player;
            let size = unit * (1.0 + player.pos.y as f64 * 0.4);
            let (x, y) = self.to_screen(player.pos.x, player.pos.z);
            ctx.set_fill_style_str("#ff2020");
            ctx.fill_rect(
                x - size / 2.0,
                y - size * player.squash as f64 / 2.0,
                size,
                size * player.squash as f64,
            );
        }

        fn set_hud(&mut self, text: &str) {
            self.set_text("score", text);
        }

        fn show_menu(&mut self) {
            self.set_visible("menu", true);
            self.set_visible("gameOver", false);
            self.set_visible("hud", false);
        }

        fn show_hud(&mut self) {
            self.set_visible("menu", false);
            self.set_visible("gameOver", false);
            self.set_visible("hud", true);
        }

        fn show_game_over(&mut self, score: u64, coins: u32) {
            self.set_visible("hud", false);
            self.set_visible("gameOver", true);
            self.set_text("finalScore", &format!("Your score: {} | Coins: {}", score, coins));
        }
    }

    /// Records whether the frame asked for another one
    #[derive(Default)]
    struct RafDriver {
        requested: bool,
    }

    impl TickDriver for RafDriver {
        fn request_next_tick(&mut self) {
            self.requested = true;
        }
    }

    struct App {
        game: Game<DomPresenter>,
        idle_mode: bool,
    }

    type SharedApp = Rc<RefCell<App>>;

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lane Runner starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let presenter = DomPresenter::new(document.clone(), &canvas);
        let game = match Game::new(seed, Tuning::default(), presenter) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Failed to create game: {}", e);
                return;
            }
        };
        let app = Rc::new(RefCell::new(App {
            game,
            idle_mode: false,
        }));
        log::info!("Game initialized with seed: {}", seed);

        for id in ["startButton", "restartButton"] {
            setup_start_button(&document, id, app.clone());
        }
        setup_keyboard(app);
    }

    /// Start a run unless one is already going
    fn start(app: &SharedApp) {
        let mut driver = RafDriver::default();
        app.borrow_mut().game.start(now_ms(), &mut driver);
        if driver.requested {
            request_animation_frame(app.clone());
        }
    }

    fn setup_start_button(document: &Document, id: &str, app: SharedApp) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("No #{} element", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            start(&app);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: SharedApp) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if let Some(intent) = Intent::from_key(&key) {
                event.prevent_default();
                app.borrow_mut().game.handle_input(intent, now_ms());
                return;
            }
            match key.as_str() {
                " " | "Enter" => start(&app),
                "i" | "I" => {
                    let mut a = app.borrow_mut();
                    a.idle_mode = !a.idle_mode;
                    log::info!("Idle mode: {}", a.idle_mode);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: SharedApp) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: SharedApp, time: f64) {
        let mut driver = RafDriver::default();
        {
            let mut a = app.borrow_mut();
            if a.idle_mode {
                if let Some(intent) = autopilot::choose_intent(a.game.state()) {
                    a.game.handle_input(intent, time);
                }
            }
            a.game.frame(time, &mut driver);
        }

        if driver.requested {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_runner::consts::FRAME_MS;
    use lane_runner::{Game, HeadlessDriver, LogPresenter, Tuning, autopilot};

    /// Two minutes of 60 Hz frames
    const DEMO_FRAMES: u64 = 60 * 120;

    env_logger::init();
    log::info!("Lane Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

    let mut game = match Game::new(seed, tuning, LogPresenter::new(60)) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };
    let mut driver = HeadlessDriver::new(FRAME_MS);
    game.start(driver.now_ms(), &mut driver);

    // Autopilot plays the run
    let frames = driver.run_with(&mut game, DEMO_FRAMES, |g, now| {
        if let Some(intent) = autopilot::choose_intent(g.state()) {
            g.handle_input(intent, now);
        }
    });

    let stats = &game.state().stats;
    println!(
        "seed {}: {:?} after {} frames | score {} | coins {} | speed {:.2}",
        seed,
        game.phase(),
        frames,
        stats.display_score(),
        stats.coins,
        stats.speed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Load tuning from a JSON file, falling back to defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> lane_runner::Tuning {
    use lane_runner::Tuning;

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Can't read tuning file {}: {}; using defaults", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("{}: {}; using defaults", path, e);
            Tuning::default()
        }
    }
}
