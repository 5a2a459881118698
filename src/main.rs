//! Neon Drift entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Event, EventTarget, HtmlCanvasElement, KeyboardEvent, PageTransitionEvent, TouchEvent,
    };

    use neon_drift::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
    use neon_drift::renderer::{RenderState, build_frame};
    use neon_drift::sim::GamePhase;
    use neon_drift::ui::{OverlayVisibility, Scoreboard};
    use neon_drift::{Session, Settings, Tuning};

    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    /// A DOM listener we must detach on teardown
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    /// Everything alive while the page hosts the game
    struct App {
        game: Rc<RefCell<Game>>,
        listeners: Vec<Listener>,
    }

    impl App {
        fn listen(
            &mut self,
            target: &EventTarget,
            kind: &'static str,
            f: impl FnMut(Event) + 'static,
        ) {
            let closure = Closure::<dyn FnMut(Event)>::new(f);
            if target
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                .is_ok()
            {
                self.listeners.push(Listener {
                    target: target.clone(),
                    kind,
                    closure,
                });
            } else {
                log::warn!("Could not attach {} listener", kind);
            }
        }

        /// Stop the loop and detach every listener
        fn teardown(self) {
            {
                let mut g = self.game.borrow_mut();
                g.running = false;
                if let (Some(id), Some(window)) = (g.frame_id.take(), web_sys::window()) {
                    let _ = window.cancel_animation_frame(id);
                }
                g.session.input.clear();
            }
            for l in self.listeners {
                let _ = l.target.remove_event_listener_with_callback(
                    l.kind,
                    l.closure.as_ref().unchecked_ref(),
                );
            }
            log::info!("Neon Drift stopped");
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        scoreboard: Scoreboard<Box<dyn KeyValueStore>>,
        settings: Settings,
        render_state: Option<RenderState>,
        running: bool,
        frame_id: Option<i32>,
        /// Last (score, best, phase) written to the page
        last_hud: Option<(u64, u64, GamePhase)>,
    }

    impl Game {
        /// One animation frame: simulate, draw, refresh the page
        fn frame(&mut self, time: f64) {
            self.session.advance(time, &mut self.scoreboard);
            self.render();
            self.update_hud();
        }

        /// Render the current frame; skipped while there is no surface
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let frame = build_frame(&self.session.state, &self.settings);
            match render_state.render(&frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (width, height) = render_state.size;
                    render_state.resize(width, height);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements and overlays in the DOM
        fn update_hud(&mut self) {
            let phase = self.session.phase();
            let snapshot = (self.scoreboard.current, self.scoreboard.high.best, phase);
            if self.last_hud == Some(snapshot) {
                return;
            }
            self.last_hud = Some(snapshot);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.scoreboard.current_text()));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                el.set_text_content(Some(&self.scoreboard.best_text()));
            }
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&self.scoreboard.final_score.to_string()));
            }

            let visible = OverlayVisibility::for_phase(phase);
            for (id, shown) in [
                ("menu", visible.menu),
                ("pause-overlay", visible.paused),
                ("game-over", visible.game_over),
                ("pause-btn", visible.pause_button),
                ("touch-hint", visible.touch_hint),
                ("new-best", visible.game_over && self.scoreboard.new_best),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.class_list().toggle_with_force("hidden", !shown);
                }
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// Tuning overrides embedded in the page as `<script id="tuning">`
    fn load_tuning(document: &web_sys::Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        }
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("device: {e}"))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Neon Drift starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Backing store follows the displayed size; the logical 400x800
        // surface is stretched over it
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; scores will not persist", e);
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load(&*store);
        let scoreboard = Scoreboard::new(store);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, load_tuning(&document));
        log::info!("Game initialized with seed: {}", seed);

        // Without a GPU the game still runs; frames are simply not drawn
        let render_state = match init_gpu(&canvas, width, height).await {
            Ok(rs) => Some(rs),
            Err(e) => {
                log::error!("Rendering unavailable ({})", e);
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            session,
            scoreboard,
            settings,
            render_state,
            running: true,
            frame_id: None,
            last_hud: None,
        }));

        let mut app = App {
            game: game.clone(),
            listeners: Vec::new(),
        };
        setup_input_handlers(&mut app, &window, &canvas);
        setup_buttons(&mut app, &document);
        setup_settings_controls(&mut app, &document);

        // Tear down when the page goes away. Kept out of `app.listeners` so
        // it is never dropped while running.
        let on_pagehide = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let cached = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|e| e.persisted());
            if cached {
                suspend();
            } else {
                shutdown();
            }
        });
        let _ = window
            .add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref());
        on_pagehide.forget();

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        APP.with(|slot| *slot.borrow_mut() = Some(app));

        request_animation_frame(game);

        log::info!("Neon Drift running!");
        Ok(())
    }

    /// Page is entering the back/forward cache: the loop and listeners stay
    /// alive for the restore, the run waits under the pause overlay
    fn suspend() {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                app.game.borrow_mut().session.suspend();
                log::info!("Neon Drift suspended");
            }
        });
    }

    /// Stop the loop and detach listeners (idempotent)
    #[wasm_bindgen]
    pub fn shutdown() {
        if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
            app.teardown();
        }
    }

    fn setup_input_handlers(app: &mut App, window: &web_sys::Window, canvas: &HtmlCanvasElement) {
        // Keyboard
        {
            let game = app.game.clone();
            app.listen(window, "keydown", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    game.borrow_mut().session.key_down(&event.key());
                }
            });
        }
        {
            let game = app.game.clone();
            app.listen(window, "keyup", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    game.borrow_mut().session.key_up(&event.key(), now_ms());
                }
            });
        }

        // Keys released while unfocused never arrive
        {
            let game = app.game.clone();
            app.listen(window, "blur", move |_event: Event| {
                game.borrow_mut().session.input.clear();
            });
        }

        // Touch start
        {
            let game = app.game.clone();
            app.listen(canvas, "touchstart", move |event: Event| {
                if let Some(touch) = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|e| e.touches().get(0))
                {
                    game.borrow_mut().session.touch_start(touch.client_x() as f32);
                }
            });
        }

        // Touch move
        {
            let game = app.game.clone();
            let canvas_clone = canvas.clone();
            app.listen(canvas, "touchmove", move |event: Event| {
                event.prevent_default();
                if let Some(touch) = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|e| e.touches().get(0))
                {
                    let rect = canvas_clone.get_bounding_client_rect();
                    game.borrow_mut().session.touch_move(
                        touch.client_x() as f32,
                        rect.left() as f32,
                        rect.width() as f32,
                    );
                }
            });
        }
    }

    fn setup_buttons(app: &mut App, document: &web_sys::Document) {
        type Action = fn(&mut Session) -> Result<(), neon_drift::sim::PhaseError>;
        let buttons: [(&'static str, Action); 5] = [
            ("start-btn", |s| s.start(now_ms())),
            ("pause-btn", |s| s.pause()),
            ("resume-btn", |s| s.resume(now_ms())),
            ("restart-btn", |s| s.start(now_ms())),
            ("menu-btn", |s| s.main_menu()),
        ];

        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let game = app.game.clone();
            app.listen(&btn, "click", move |_event: Event| {
                if let Err(e) = action(&mut game.borrow_mut().session) {
                    log::debug!("#{} ignored: {}", id, e);
                }
            });
        }
    }

    /// Write the current settings onto the menu's toggle buttons
    fn show_settings(settings: &Settings) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("quality-btn") {
            let label = format!("QUALITY: {}", settings.quality.as_str().to_uppercase());
            el.set_text_content(Some(&label));
        }
        if let Some(el) = document.get_element_by_id("motion-btn") {
            let state = if settings.reduced_motion { "ON" } else { "OFF" };
            el.set_text_content(Some(&format!("REDUCED MOTION: {state}")));
        }
    }

    /// Menu toggles that change and persist [`Settings`]
    fn setup_settings_controls(app: &mut App, document: &web_sys::Document) {
        type Change = fn(&mut Settings);
        let controls: [(&'static str, Change); 2] = [
            ("quality-btn", |s| {
                s.cycle_quality();
            }),
            ("motion-btn", |s| {
                s.toggle_reduced_motion();
            }),
        ];

        for (id, change) in controls {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let game = app.game.clone();
            app.listen(&btn, "click", move |_event: Event| {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                change(&mut g.settings);
                g.settings.save(&mut g.scoreboard.store);
                show_settings(&g.settings);
            });
        }

        show_settings(&app.game.borrow().settings);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_for_frame = game.clone();
        let callback = Closure::once_into_js(move |time: f64| {
            game_loop(game_for_frame, time);
        });
        let id = window
            .request_animation_frame(callback.unchecked_ref())
            .ok();
        game.borrow_mut().frame_id = id;
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }
            g.frame(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Drift (native) starting...");
    log::info!(
        "Native mode runs a headless autopilot demo - run with `trunk serve` for the web version"
    );

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use neon_drift::consts::*;
    use neon_drift::persistence::MemoryStore;
    use neon_drift::renderer::build_frame;
    use neon_drift::sim::{GamePhase, GameState, ObstacleKind, lane_x};
    use neon_drift::ui::Scoreboard;
    use neon_drift::{Session, Settings, Tuning};

    /// Simulated frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after two minutes of game time
    const MAX_FRAMES: u64 = 60 * 120;

    fn lane_of(x: f32) -> u32 {
        let lane = ((x + PLAYER_WIDTH / 2.0) / LANE_WIDTH).floor();
        lane.clamp(0.0, (LANE_COUNT - 1) as f32) as u32
    }

    /// Lane the autopilot wants: stay put unless an enemy is coming
    fn target_lane(state: &GameState) -> u32 {
        let player = &state.player.rect;
        let danger = |lane: u32| {
            state.obstacles.iter().any(|o| {
                o.kind == ObstacleKind::Enemy
                    && lane_of(o.rect.pos.x) == lane
                    && o.rect.bottom() > player.pos.y - 350.0
                    && o.rect.pos.y < player.bottom()
            })
        };

        let current = lane_of(player.pos.x);
        if !danger(current) {
            return current;
        }
        (0..LANE_COUNT)
            .filter(|lane| !danger(*lane))
            .min_by_key(|lane| lane.abs_diff(current))
            .unwrap_or(current)
    }

    fn steer(session: &mut Session, now: f64) {
        let target_x = lane_x(target_lane(&session.state));
        let x = session.state.player.x();
        for key in ["ArrowLeft", "ArrowRight"] {
            session.key_up(key, now);
        }
        if x > target_x + 4.0 {
            session.key_down("ArrowLeft");
        } else if x < target_x - 4.0 {
            session.key_down("ArrowRight");
        }
    }

    pub fn run(seed: u64) {
        let mut session = Session::new(seed, Tuning::default());
        let mut scoreboard = Scoreboard::new(MemoryStore::new());
        let settings = Settings::default();

        let mut now = 0.0;
        if let Err(e) = session.start(now) {
            log::error!("Could not start: {}", e);
            return;
        }

        let mut vertices = 0usize;
        while session.phase() == GamePhase::Playing && session.frames < MAX_FRAMES {
            now += FRAME_MS;
            steer(&mut session, now);
            session.advance(now, &mut scoreboard);
            vertices = build_frame(&session.state, &settings).vertices.len();
        }

        let seconds = session.frames as f64 * FRAME_MS / 1000.0;
        match session.phase() {
            GamePhase::GameOver => log::info!(
                "Crashed after {:.1}s with score {} (speed {:.2})",
                seconds,
                scoreboard.final_score,
                session.state.speed
            ),
            _ => log::info!(
                "Survived {:.1}s, score {} (speed {:.2})",
                seconds,
                scoreboard.current,
                session.state.speed
            ),
        }
        log::debug!("Last frame: {} vertices", vertices);
        println!("seed {seed}: score {}", scoreboard.current.max(scoreboard.final_score));
    }
}
