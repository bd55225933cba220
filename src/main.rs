//! Neon Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::Vec2;
    use neon_breaker::audio::{AudioManager, play_events};
    use neon_breaker::consts::*;
    use neon_breaker::highscores::{HighScores, format_score, today};
    use neon_breaker::persistence::LocalStorage;
    use neon_breaker::platform::{InputState, to_playfield_x};
    use neon_breaker::renderer::{RenderState, SceneOptions, ScreenShake, build_scene};
    use neon_breaker::settings::{QualityPreset, Settings};
    use neon_breaker::sim::{GameEvent, GamePhase, GameState, MenuCommand, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: InputState,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        /// None when the browser blocks LocalStorage
        store: Option<LocalStorage>,
        shake: ScreenShake,
        /// Power-up name and milliseconds left on screen
        notification: Option<(&'static str, f32)>,
        last_bonus: u64,
        /// Rank of the score that just ended the game, if it made the board
        last_rank: Option<usize>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let store = match LocalStorage::open() {
                Ok(store) => Some(store),
                Err(e) => {
                    log::warn!("LocalStorage unavailable, nothing will be saved: {}", e);
                    None
                }
            };
            let (settings, high_scores) = match &store {
                Some(store) => (Settings::load(store), HighScores::load(store)),
                None => (Settings::default(), HighScores::new()),
            };

            let mut game = Self {
                state: GameState::new(seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: InputState::new(),
                audio: AudioManager::new(),
                settings,
                high_scores,
                store,
                shake: ScreenShake::default(),
                notification: None,
                last_bonus: 0,
                last_rank: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            };
            game.apply_settings();
            game
        }

        /// Push settings into the particle engine and the audio gain
        fn apply_settings(&mut self) {
            self.state
                .particles
                .set_max_particles(self.settings.max_particles());
            self.audio.set_gain(self.settings.effective_volume());
        }

        fn save_settings(&mut self) {
            if let Some(store) = &mut self.store {
                self.settings.save(store);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.tick_input();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();
            }

            let events = self.state.drain_events();
            self.handle_events(&events);

            let elapsed_ms = dt * 1000.0;
            self.shake.update(elapsed_ms);
            if let Some((_, remaining)) = &mut self.notification {
                *remaining -= elapsed_ms;
                if *remaining <= 0.0 {
                    self.notification = None;
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Hand this frame's events to sound, shake, notifications and scores
        fn handle_events(&mut self, events: &[GameEvent]) {
            play_events(&mut self.audio, events);

            for event in events {
                match event {
                    GameEvent::ScreenShake { duration_ms } => {
                        if self.settings.effective_screen_shake() {
                            self.shake.trigger(*duration_ms);
                        }
                    }
                    GameEvent::PowerUpCollected { kind, .. } => {
                        self.notification = Some((kind.name(), NOTIFICATION_MS));
                    }
                    GameEvent::LevelComplete { bonus, .. } => {
                        self.last_bonus = *bonus;
                    }
                    GameEvent::GameOver { score, level } => {
                        self.record_score(*score, *level);
                    }
                    _ => {}
                }
            }
        }

        fn record_score(&mut self, score: u64, level: u32) {
            self.last_rank = self.high_scores.add_score(score, level, today());
            match self.last_rank {
                Some(rank) => {
                    log::info!("New high score #{}: {}", rank, score);
                    if let Some(store) = &mut self.store {
                        self.high_scores.save(store);
                    }
                }
                None => log::info!("Score {} did not make the board", score),
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let mut options = SceneOptions::from_settings(&self.settings);
            options.shake = self.shake.offset();
            let vertices = build_scene(&self.state, &options);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
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
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &format_score(self.state.score));
            set_text(&document, "#hud-lives .hud-value", &self.state.lives.to_string());
            set_text(&document, "#hud-level .hud-value", &self.state.level.to_string());
            let best = self.high_scores.top_score().max(self.state.score);
            set_text(&document, "#hud-best .hud-value", &format_score(best));

            if let Some(el) = document.get_element_by_id("hud-combo") {
                if self.state.combo > 1 {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text(
                        &document,
                        "#hud-combo .hud-value",
                        &format!("{} (x{})", self.state.combo, self.state.combo_multiplier()),
                    );
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            let effects: Vec<String> = self
                .state
                .power_ups
                .active_power_ups()
                .into_iter()
                .map(|(name, ms)| format!("{} {}s", name, (ms / 1000.0).ceil() as u32))
                .collect();
            set_text(&document, "#hud-effects", &effects.join("  "));

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps || self.input.debug {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text(
                        &document,
                        "#hud-fps .hud-value",
                        &format!("{} fps / {} particles", self.fps, self.state.particles.len()),
                    );
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("notification") {
                match self.notification {
                    Some((name, _)) => {
                        el.set_text_content(Some(name));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            let phase = self.state.phase;
            show(&document, "start-screen", phase == GamePhase::Start);
            show(&document, "pause-menu", phase == GamePhase::Paused);
            show(&document, "level-complete", phase == GamePhase::LevelComplete);
            show(&document, "game-over", phase == GamePhase::GameOver);

            match phase {
                GamePhase::LevelComplete => {
                    set_text(&document, "#complete-level", &self.state.level.to_string());
                    set_text(&document, "#complete-bonus", &self.last_bonus.to_string());
                }
                GamePhase::GameOver => {
                    set_text(&document, "#final-score", &format_score(self.state.score));
                    set_text(&document, "#final-level", &self.state.level.to_string());
                    show(&document, "new-high-score", self.last_rank.is_some());
                }
                _ => {}
            }
        }

        /// Fill the high score table on the start screen
        fn update_high_score_list(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(list) = document.get_element_by_id("high-score-list") else {
                return;
            };

            if self.high_scores.is_empty() {
                list.set_inner_html("<li>No scores yet</li>");
                return;
            }
            let rows: String = self
                .high_scores
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    format!(
                        "<li>{}. {} - level {} - {}</li>",
                        i + 1,
                        format_score(entry.score),
                        entry.level,
                        entry.date
                    )
                })
                .collect();
            list.set_inner_html(&rows);
        }

        /// Settings hotkeys handled outside the simulation
        fn settings_key(&mut self, code: &str) -> bool {
            match code {
                "KeyM" => {
                    self.settings.muted = !self.settings.muted;
                    log::info!("Muted: {}", self.settings.muted);
                }
                "KeyQ" => {
                    let next = match self.settings.quality {
                        QualityPreset::Low => QualityPreset::Medium,
                        QualityPreset::Medium => QualityPreset::High,
                        QualityPreset::High => QualityPreset::Low,
                    };
                    self.settings.apply_preset(next);
                    log::info!("Quality: {}", next.as_str());
                }
                _ => return false,
            }
            self.apply_settings();
            self.save_settings();
            true
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Blocking error overlay for failures the game cannot run without
    fn show_fatal_error(document: &Document, message: &str) {
        if let Some(el) = document.get_element_by_id("error") {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "");
        }
        show(document, "loading", false);
    }

    /// Client x to playfield x, accounting for letterboxing in the canvas
    fn pointer_x(canvas: &HtmlCanvasElement, client_x: i32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        let aspect = PLAYFIELD_WIDTH / PLAYFIELD_HEIGHT;
        let width = (rect.width() as f32).min(rect.height() as f32 * aspect);
        let left = rect.left() as f32 + (rect.width() as f32 - width) / 2.0;
        to_playfield_x(client_x as f32, left, width, PLAYFIELD_WIDTH)
    }

    fn resize_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Neon Breaker starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> on the page");
            show_fatal_error(&document, "Canvas element missing");
            return;
        };
        resize_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let playfield = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        match RenderState::for_canvas(canvas.clone(), playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Renderer init failed: {}", e);
                show_fatal_error(
                    &document,
                    &format!("WebGPU is required to play Neon Breaker ({})", e),
                );
                return;
            }
        }

        show(&document, "loading", false);
        game.borrow().update_high_score_list();

        setup_input_handlers(&canvas, game.clone());
        setup_menu_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(&canvas, game.clone());

        show(&document, "hud", true);

        request_animation_frame(game);

        log::info!("Neon Breaker running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse move steers the paddle
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = pointer_x(&canvas_clone, event.client_x());
                game.borrow_mut().input.pointer_moved(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - launch and fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let x = pointer_x(&canvas_clone, touch.client_x());
                    game.borrow_mut().input.pointer_moved(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (launch)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.tap();
                if let Some(touch) = event.touches().get(0) {
                    let x = pointer_x(&canvas_clone, touch.client_x());
                    g.input.pointer_moved(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let code = event.code();
                let handled = g.input.key_down(&code, event.ctrl_key(), event.shift_key())
                    || g.settings_key(&code);
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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

            let was_game_over = g.state.phase == GamePhase::GameOver;
            g.update(dt, time);
            if g.state.phase == GamePhase::GameOver && !was_game_over {
                g.update_high_score_list();
            }
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    /// Overlay buttons queue menu commands for the next tick
    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons = [
            ("start-btn", MenuCommand::Start),
            ("resume-btn", MenuCommand::Resume),
            ("next-level-btn", MenuCommand::NextLevel),
            ("restart-btn", MenuCommand::Restart),
            ("pause-menu-btn", MenuCommand::MainMenu),
            ("game-over-menu-btn", MenuCommand::MainMenu),
        ];

        for (id, command) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Button #{} missing from page", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.queue_command(command);
                if command == MenuCommand::MainMenu {
                    g.update_high_score_list();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
                    g.input.release_all();
                    if g.state.phase == GamePhase::Playing {
                        g.input.request_pause();
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.settings.mute_on_blur {
                    g.audio.set_gain(0.0);
                }
                if g.state.phase == GamePhase::Playing {
                    g.input.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores the volume muted on blur
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let volume = g.settings.effective_volume();
                g.audio.set_gain(volume);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = resize_canvas(&canvas);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Breaker (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run_demo(seed, headless::DEMO_TICKS);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_breaker::audio::{NullAudio, play_events};
    use neon_breaker::highscores::{HighScores, format_score, today};
    use neon_breaker::persistence::MemoryStore;
    use neon_breaker::settings::Settings;
    use neon_breaker::sim::{GameEvent, GameState, TickInput, tick};

    /// Ten simulated minutes
    pub const DEMO_TICKS: u32 = 60 * 60 * 10;

    /// Let the autopilot play and keep score the way the browser host does
    pub fn run_demo(seed: u64, ticks: u32) {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        let mut high_scores = HighScores::load(&store);
        let mut audio = NullAudio;

        let mut state = GameState::new(seed);
        state.particles.set_max_particles(settings.max_particles());
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let mut games = 0;
        for _ in 0..ticks {
            tick(&mut state, &input);
            let events = state.drain_events();
            play_events(&mut audio, &events);

            for event in &events {
                match event {
                    GameEvent::LevelComplete { level, bonus } => {
                        log::info!("Level {} cleared, bonus {}", level, bonus);
                    }
                    GameEvent::GameOver { score, level } => {
                        games += 1;
                        if high_scores.add_score(*score, *level, today()).is_some() {
                            high_scores.save(&mut store);
                        }
                    }
                    _ => {}
                }
            }
        }

        println!(
            "Seed {}: {} games finished, current score {} on level {}, best {}",
            seed,
            games,
            format_score(state.score),
            state.level,
            format_score(high_scores.top_score().max(state.score))
        );
        for (i, entry) in high_scores.entries.iter().enumerate() {
            println!("  {:>2}. {} (level {})", i + 1, format_score(entry.score), entry.level);
        }
    }
}
