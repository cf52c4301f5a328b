//! Sky Strike entry point
//!
//! In the browser: wires the session to the frame clock, DOM input and HUD.
//! Natively: runs a short headless mission as a smoke test.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use sky_strike::catalog::CatalogState;
    use sky_strike::platform::InputSnapshot;
    use sky_strike::platform::web::{self, PauseRequest, RafScheduler};
    use sky_strike::sim::GameListener;
    use sky_strike::{Session, Tuning};

    const CATALOG_URL: &str = "archetypes.json";

    /// Mirrors game events into the page's HUD elements
    #[derive(Default)]
    struct HudListener {
        score: u64,
    }

    impl HudListener {
        fn set_text(selector: &str, text: &str) {
            let document = web_sys::window().and_then(|w| w.document());
            if let Some(el) = document.and_then(|d| d.query_selector(selector).ok().flatten()) {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(id: &str, class: &str) {
            let document = web_sys::window().and_then(|w| w.document());
            if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
                let _ = el.set_attribute("class", class);
            }
        }
    }

    impl GameListener for HudListener {
        fn on_score_change(&mut self, score: u64) {
            self.score = score;
            Self::set_text("#hud-score .hud-value", &score.to_string());
        }

        fn on_health_change(&mut self, health: u32) {
            Self::set_text("#hud-health .hud-value", &health.to_string());
        }

        fn on_combo_change(&mut self, combo: u32) {
            // Only show for an actual chain
            if combo > 1 {
                Self::set_text("#hud-combo .hud-value", &combo.to_string());
                Self::set_class("hud-combo", "hud-item pop");
            } else {
                Self::set_class("hud-combo", "hud-item hidden");
            }
        }

        fn on_level_change(&mut self, level: u32) {
            Self::set_text("#hud-level .hud-value", &level.to_string());
            // Level 1 is announced on every (re)start
            if level > 1 {
                log::info!("Level {}", level);
            }
        }

        fn on_game_over(&mut self) {
            Self::set_text("#final-score", &self.score.to_string());
            Self::set_class("game-over", "");
        }
    }

    type SharedSession = Rc<RefCell<Session<HudListener>>>;

    /// Per-frame work: advance the simulation and hand the frame to the renderer
    fn frame_callback(session: SharedSession, input: Rc<RefCell<InputSnapshot>>) -> impl FnMut(f64) {
        move |delta_ms| {
            let mut session = session.borrow_mut();
            session.frame(delta_ms, &input.borrow());
            web::present(&session.snapshot());
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sky Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let session: SharedSession = Rc::new(RefCell::new(Session::new(
            seed,
            Tuning::load(),
            HudListener::default(),
        )));
        let input = Rc::new(RefCell::new(InputSnapshot::default()));
        log::info!("Session created with seed: {}", seed);

        // Catalog arrives asynchronously; until then nothing spawns
        {
            let session = session.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let catalog = CatalogState::from_result(web::fetch_catalog(CATALOG_URL).await);
                session.borrow_mut().set_catalog(catalog);
            });
        }

        {
            let session = session.clone();
            let result = web::attach_input_listeners(&canvas, input.clone(), move |request| {
                let mut session = session.borrow_mut();
                match request {
                    PauseRequest::Toggle => session.toggle_pause(),
                    PauseRequest::Pause => session.set_paused(true),
                }
            });
            if let Err(e) = result {
                log::error!("Failed to attach input listeners: {:?}", e);
            }
        }

        setup_restart_button(session.clone());

        session.borrow_mut().start();

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        let clock = RafScheduler::clock();
        clock
            .borrow_mut()
            .start(frame_callback(session.clone(), input.clone()));

        // Stop the clock while the tab is hidden so the first frame back
        // does not see the whole gap
        let result = web::on_visibility_change(move |hidden| {
            if hidden {
                session.borrow_mut().set_paused(true);
                clock.borrow_mut().stop();
                log::info!("Auto-paused (tab hidden)");
            } else {
                clock
                    .borrow_mut()
                    .start(frame_callback(session.clone(), input.clone()));
            }
        });
        if let Err(e) = result {
            log::error!("Failed to watch page visibility: {:?}", e);
        }

        log::info!("Sky Strike running!");
    }

    fn setup_restart_button(session: SharedSession) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("game-over"))
                {
                    let _ = el.set_attribute("class", "hidden");
                }
                session.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use sky_strike::catalog::{CatalogState, StaticCatalog};
    use sky_strike::consts::NOMINAL_FRAME_MS;
    use sky_strike::platform::InputSnapshot;
    use sky_strike::sim::GameListener;
    use sky_strike::{Session, Tuning};

    /// Ten minutes at 60 Hz
    const MAX_FRAMES: u32 = 36_000;
    /// Frames between changes of strafing direction
    const WEAVE_FRAMES: u32 = 90;

    #[derive(Debug, Default)]
    struct LogListener {
        kills: u32,
        best_combo: u32,
        game_over: bool,
    }

    impl GameListener for LogListener {
        fn on_score_change(&mut self, score: u64) {
            log::debug!("Score: {}", score);
        }

        fn on_combo_change(&mut self, combo: u32) {
            if combo > 0 {
                self.kills += 1;
            }
            self.best_combo = self.best_combo.max(combo);
        }

        fn on_level_change(&mut self, level: u32) {
            log::debug!("Level: {}", level);
        }

        fn on_game_over(&mut self) {
            self.game_over = true;
        }
    }

    pub fn run(seed: u64) {
        let mut session = Session::new(seed, Tuning::load(), LogListener::default());
        session.set_catalog(CatalogState::Ready(StaticCatalog::builtin()));
        session.start();

        // Hold fire and strafe back and forth
        let mut input = InputSnapshot::default();
        input.key_down(" ");

        let mut frames = 0;
        while frames < MAX_FRAMES && !session.state().is_game_over() {
            if frames % WEAVE_FRAMES == 0 {
                let (release, press) = if (frames / WEAVE_FRAMES) % 2 == 0 {
                    ("a", "d")
                } else {
                    ("d", "a")
                };
                input.key_up(release);
                input.key_down(press);
            }
            session.frame(NOMINAL_FRAME_MS, &input);
            frames += 1;
        }

        let state = session.state();
        let listener = session.listener();
        log::info!(
            "Headless run finished after {} frames ({:.1}s simulated)",
            frames,
            state.clock_ms / 1000.0
        );
        println!(
            "seed {}: score {}, level {}, kills {}, best combo {}, health {}{}",
            seed,
            state.score,
            state.level(),
            listener.kills,
            listener.best_combo,
            state.player.health,
            if listener.game_over { " (game over)" } else { "" },
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Strike (native) starting headless run...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
