//! Flappy Weather entry point
//!
//! Browser builds run the interactive game; native builds run a headless
//! autopilot session that exercises the full simulation and persistence.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use flappy_weather::consts::*;
    use flappy_weather::persistence::Store;
    use flappy_weather::platform::{Action, FrameClock, action_for_key};
    use flappy_weather::renderer::{RenderState, VertexCanvas, draw_scene};
    use flappy_weather::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use flappy_weather::{HighScores, Settings};

    /// LocalStorage key prefix
    const STORAGE_PREFIX: &str = "flappy_weather";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        canvas: VertexCanvas,
        clock: FrameClock,
        last_time: f64,
        input: TickInput,
        settings: Settings,
        high_scores: HighScores,
        store: Option<Store>,
        /// Rank reached by the last finished run
        last_rank: Option<usize>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, store: Option<Store>) -> flappy_weather::Result<Self> {
            let high_scores = match &store {
                Some(store) => HighScores::load(store, settings.max_high_scores),
                None => HighScores::new(settings.max_high_scores),
            };
            Ok(Self {
                state: GameState::new(seed, settings.features())?,
                render_state: None,
                canvas: VertexCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                clock: FrameClock::default(),
                last_time: 0.0,
                input: TickInput::default(),
                settings,
                high_scores,
                store,
                last_rank: None,
            })
        }

        fn apply_action(&mut self, action: Action) {
            match action {
                Action::Flap => self.input.flap = true,
                Action::Restart => self.input.restart = true,
                Action::Pause => self.input.pause = true,
                Action::SkipWeather => self.input.skip_weather = true,
                Action::ToggleAutopilot => {
                    self.input.autopilot = !self.input.autopilot;
                    log::info!("Autopilot: {}", self.input.autopilot);
                }
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let steps = self.clock.advance(dt);
            for _ in 0..steps {
                let input = self.input.clone();
                tick(&mut self.state, &input);

                // Clear one-shot inputs after processing
                self.input.flap = false;
                self.input.pause = false;
                self.input.restart = false;
                self.input.skip_weather = false;

                self.handle_events();
            }
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Crashed { score } => self.record_score(score),
                    GameEvent::Restarted => self.last_rank = None,
                    other => log::debug!("{:?}", other),
                }
            }
        }

        fn record_score(&mut self, score: u64) {
            log::info!("Crashed with score {}", score);
            if !self.settings.high_scores {
                return;
            }
            self.last_rank = self.high_scores.add_score(score);
            if let Some(rank) = self.last_rank {
                log::info!("New high score #{}: {}", rank, score);
                if let Some(store) = &self.store
                    && let Err(e) = self.high_scores.save(store)
                {
                    log::warn!("Failed to save high scores: {}", e);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            self.canvas.clear();
            draw_scene(&self.state, &mut self.canvas);
            match render_state.render(self.canvas.vertices(), self.state.background_color()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set_text("#hud-score .hud-value", &self.state.score.to_string());
            let best = self.high_scores.top_score().unwrap_or(0);
            set_text("#hud-best .hud-value", &best.to_string());
            if let Some(weather) = &self.state.weather {
                set_text("#hud-weather .hud-value", weather.state().as_str());
            }

            // Active modifier, hidden when none
            if let Some(el) = document.get_element_by_id("hud-modifier") {
                match &self.state.modifier {
                    Some(modifier) => {
                        let _ = el.set_attribute("class", "hud-item");
                        let seconds = modifier.ticks_remaining as f32 / FRAME_RATE as f32;
                        set_text(
                            "#hud-modifier .hud-value",
                            &format!("{} {:.1}s", modifier.kind.as_str(), seconds),
                        );
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-item hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if self.state.phase == GamePhase::Paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    set_text("#final-score", &self.state.score.to_string());
                    let rank = self
                        .last_rank
                        .map(|r| format!("New high score #{}", r))
                        .unwrap_or_default();
                    set_text("#final-rank", &rank);
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Weather starting...");

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

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let store = match Store::open(STORAGE_PREFIX) {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Persistence unavailable: {}", e);
                None
            }
        };
        let settings = store.as_ref().map(Settings::load).unwrap_or_default();

        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(seed, settings, store) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Failed to start game: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let logical = glam::Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        match RenderState::new(surface, &adapter, width, height, logical).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("{}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Flappy Weather running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click flaps, or starts over after a crash
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.flap = true;
                g.input.restart = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start behaves like a click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.flap = true;
                g.input.restart = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(action) = action_for_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().apply_action(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.clock.reset();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
    use std::path::PathBuf;

    use flappy_weather::consts::{FRAME_RATE, SCREEN_HEIGHT, SCREEN_WIDTH};
    use flappy_weather::persistence::Store;
    use flappy_weather::renderer::{VertexCanvas, draw_scene};
    use flappy_weather::sim::{GameEvent, GameState, TickInput, tick};
    use flappy_weather::{Error, HighScores, QualityPreset, Result, Settings};

    /// Two full weather cycles at the default settings
    const DEFAULT_FRAMES: u64 = 2 * 4 * 30 * FRAME_RATE as u64;
    const DEFAULT_DATA_DIR: &str = "./.flappy-weather";
    const DATA_DIR_ENV: &str = "FLAPPY_WEATHER_DATA";

    /// Summary of a headless session
    pub struct Report {
        pub frames: u64,
        pub runs: u32,
        pub best: u64,
        pub peak_vertices: usize,
    }

    fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str) -> Result<Option<T>> {
        arg.map(|s| {
            s.parse()
                .map_err(|_| Error::Config(format!("invalid {}: {:?}", name, s)))
        })
        .transpose()
    }

    pub fn run(mut args: impl Iterator<Item = String>) -> Result<Report> {
        let frames = parse_arg(args.next(), "frame count")?.unwrap_or(DEFAULT_FRAMES);
        let seed = match parse_arg(args.next(), "seed")? {
            Some(seed) => seed,
            None => std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        };

        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let store = Store::open(dir)?;
        log::info!("Data directory: {}", store.dir().display());

        let mut settings = Settings::load(&store);
        if let Some(name) = args.next() {
            let quality = QualityPreset::from_str(&name)
                .ok_or_else(|| Error::Config(format!("unknown quality {:?}", name)))?;
            if quality != settings.quality {
                settings.quality = quality;
                settings.save(&store)?;
            }
        }
        log::info!("Quality: {}", settings.quality.as_str());
        let mut high_scores = HighScores::load(&store, settings.max_high_scores);
        let mut state = GameState::new(seed, settings.features())?;
        log::info!("Headless run: {} frames, seed {}", frames, seed);

        let mut canvas = VertexCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let mut input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut report = Report {
            frames,
            runs: 1,
            best: 0,
            peak_vertices: 0,
        };

        for _ in 0..frames {
            tick(&mut state, &input);
            input.restart = false;

            for event in state.drain_events() {
                match event {
                    GameEvent::Crashed { score } => {
                        report.best = report.best.max(score);
                        if settings.high_scores
                            && let Some(rank) = high_scores.add_score(score)
                        {
                            log::info!("New high score #{}: {}", rank, score);
                        }
                        input.restart = true;
                    }
                    GameEvent::Restarted => report.runs += 1,
                    GameEvent::Flapped => {}
                    other => log::debug!("{:?}", other),
                }
            }

            canvas.clear();
            draw_scene(&state, &mut canvas);
            report.peak_vertices = report.peak_vertices.max(canvas.vertices().len());
        }

        report.best = report.best.max(state.score);
        if settings.high_scores {
            high_scores.save(&store)?;
        }
        Ok(report)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Weather (native) starting...");

    match headless::run(std::env::args().skip(1)) {
        Ok(report) => {
            println!(
                "{} frames, {} runs, best score {}, peak {} vertices/frame",
                report.frames, report.runs, report.best, report.peak_vertices
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
