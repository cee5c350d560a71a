//! Pixel Dodge entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use pixel_dodge::platform;
    use pixel_dodge::quests::{LocalQuestPool, QuestLog, QuestSource};
    use pixel_dodge::renderer::{RenderState, scene};
    use pixel_dodge::sim::{InputSnapshot, Session};
    use pixel_dodge::tuning::VOID_UNLOCK_QUESTS;
    use pixel_dodge::{Difficulty, GameSettings, PlayerStats};

    /// Level-triggered pressed-key map written by listeners, read at tick
    /// time. Not an event queue: only pause is edge-triggered, and it is
    /// handled before keys reach this map.
    #[derive(Default)]
    struct KeyMap {
        pressed: HashMap<String, bool>,
    }

    impl KeyMap {
        fn set(&mut self, key: &str, down: bool) {
            self.pressed.insert(key.to_string(), down);
        }

        fn clear(&mut self) {
            self.pressed.clear();
        }

        fn is_down(&self, key: &str) -> bool {
            self.pressed.get(key).copied().unwrap_or(false)
        }

        fn snapshot(&self) -> InputSnapshot {
            InputSnapshot {
                left: self.is_down("a") || self.is_down("arrowleft") || self.is_down("leftbtn"),
                right: self.is_down("d") || self.is_down("arrowright") || self.is_down("rightbtn"),
            }
        }
    }

    /// An event listener registration that deregisters itself when
    /// dropped, so a finished run leaves nothing firing against stale
    /// state.
    struct Listener {
        target: web_sys::EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn attach(
            target: &web_sys::EventTarget,
            event: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Self {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            if let Err(err) =
                target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to attach {event} listener: {err:?}");
            }
            Self {
                target: target.clone(),
                event,
                closure,
            }
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        }
    }

    /// App instance holding all state
    struct App {
        session: Session,
        render_state: Option<RenderState>,
        /// Render-only jitter source; never feeds back into gameplay
        shake_rng: Pcg32,
        /// Seeds sessions and the quest fallback sampling
        rng: Pcg32,
        keys: KeyMap,
        paused: bool,
        last_time: Option<f64>,
        settings: GameSettings,
        stats: PlayerStats,
        quest_log: QuestLog,
        quest_source: Box<dyn QuestSource>,
        difficulty: Difficulty,
        /// Gameplay listeners; cleared when the run ends
        input_listeners: Vec<Listener>,
        /// Whether a requestAnimationFrame chain is active
        loop_alive: bool,
    }

    impl App {
        /// One frame: compute the wall-clock delta, honor the low-FPS
        /// budget, tick and draw unless paused. Returns whether the loop
        /// should keep scheduling.
        fn frame(&mut self, time: f64) -> bool {
            if self.last_time.is_none() {
                self.last_time = Some(time);
            }
            let delta = time - self.last_time.unwrap_or(time);

            // Skipped frames leave last_time alone, so the delta keeps
            // accumulating: simulated time granularity is unchanged by
            // frame limiting.
            if delta >= self.settings.frame_budget_ms() {
                if !self.paused {
                    let input = self.keys.snapshot();
                    let result = self.session.tick(delta as f32, &input);
                    self.draw();
                    self.update_hud(result.score);
                }
                self.last_time = Some(time);
            }

            self.session.is_running()
        }

        fn draw(&mut self) {
            let vertices = scene::build(&self.session.state, &mut self.shake_rng);
            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&vertices) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD text in the DOM overlay
        fn update_hud(&self, score: u64) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            set_text(&document, "hud-score", &format!("SCORE: {score}"));
            set_text(&document, "hud-difficulty", self.difficulty.label());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn schedule_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| frame_loop(app, time));
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_running = app.borrow_mut().frame(time);
        if keep_running {
            schedule_frame(app);
        } else {
            finish_game(&app);
        }
    }

    /// The game-over path: stop scheduling, release gameplay listeners,
    /// fold the result into stats and quests, reveal the overlay. The
    /// session yields its event exactly once, so re-entry is harmless.
    fn finish_game(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        a.loop_alive = false;
        a.input_listeners.clear();

        let Some(over) = a.session.take_game_over() else {
            return;
        };
        log::info!("game over: {} points in {} s", over.score, over.survival_secs);

        let new_high = a.stats.record_score(over.score);
        let newly_completed = a.quest_log.apply_game_result(over.score, over.survival_secs);
        a.stats.total_quests_completed += newly_completed;

        let hour = platform::current_hour();
        {
            let App {
                quest_log,
                quest_source,
                rng,
                ..
            } = &mut *a;
            quest_log.refresh(quest_source.as_mut(), hour, rng);
        }

        a.stats.save();
        a.quest_log.save();
        drop(a);

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let a = app.borrow();
            set_text(&document, "final-score", &over.score.to_string());
            set_text(&document, "final-time", &format!("{} s", over.survival_secs));
            set_text(
                &document,
                "high-score",
                &a.stats.high_score.to_string(),
            );
            set_hidden(&document, "new-high-score", !new_high);
            set_hidden(&document, "game-over", false);
        }
    }

    /// Reset the session and bring the loop back up (initial start and
    /// every restart go through here).
    fn start_session(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            let seed = a.rng.random::<u64>();
            let difficulty = a.difficulty;
            a.session = Session::new(difficulty, seed);
            a.last_time = None;
            a.paused = false;
            a.keys.clear();
        }

        let listeners = setup_input_listeners(app);
        let should_schedule = {
            let mut a = app.borrow_mut();
            a.input_listeners = listeners;
            if a.loop_alive {
                false
            } else {
                a.loop_alive = true;
                true
            }
        };

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_hidden(&document, "game-over", true);
            set_hidden(&document, "pause-overlay", true);
        }

        if should_schedule {
            schedule_frame(app.clone());
        }
    }

    fn toggle_pause(app: &Rc<RefCell<App>>) {
        let paused = {
            let mut a = app.borrow_mut();
            if !a.session.is_running() {
                return;
            }
            a.paused = !a.paused;
            a.paused
        };
        log::info!("{}", if paused { "paused" } else { "resumed" });
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_hidden(&document, "pause-overlay", !paused);
        }
    }

    fn pause_if_running(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if !a.session.is_running() || a.paused {
                return;
            }
            a.paused = true;
        }
        log::info!("Auto-paused");
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_hidden(&document, "pause-overlay", false);
        }
    }

    /// Attach all gameplay listeners; dropping the returned guards
    /// deregisters every one of them.
    fn setup_input_listeners(app: &Rc<RefCell<App>>) -> Vec<Listener> {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let mut listeners = Vec::new();

        {
            let app = app.clone();
            listeners.push(Listener::attach(&window, "keydown", move |event| {
                if let Some(kb) = event.dyn_ref::<KeyboardEvent>() {
                    let key = kb.key().to_lowercase();
                    if key == "escape" || key == "p" {
                        toggle_pause(&app);
                    } else {
                        app.borrow_mut().keys.set(&key, true);
                    }
                }
            }));
        }
        {
            let app = app.clone();
            listeners.push(Listener::attach(&window, "keyup", move |event| {
                if let Some(kb) = event.dyn_ref::<KeyboardEvent>() {
                    app.borrow_mut().keys.set(&kb.key().to_lowercase(), false);
                }
            }));
        }

        // On-screen left/right hold zones (mouse and touch)
        for (element_id, key) in [("left-btn", "leftbtn"), ("right-btn", "rightbtn")] {
            let Some(el) = document.get_element_by_id(element_id) else {
                continue;
            };
            for (event, down) in [("mousedown", true), ("mouseup", false), ("mouseleave", false)] {
                let app = app.clone();
                listeners.push(Listener::attach(&el, event, move |_event| {
                    app.borrow_mut().keys.set(key, down);
                }));
            }
            for (event, down) in [("touchstart", true), ("touchend", false)] {
                let app = app.clone();
                listeners.push(Listener::attach(&el, event, move |event| {
                    event.prevent_default();
                    app.borrow_mut().keys.set(key, down);
                }));
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let app = app.clone();
            listeners.push(Listener::attach(&btn, "click", move |_event| {
                toggle_pause(&app);
            }));
        }

        // Auto-pause when the tab hides or the window loses focus
        {
            let app = app.clone();
            listeners.push(Listener::attach(&document, "visibilitychange", move |_event| {
                let hidden = web_sys::window()
                    .and_then(|w| w.document())
                    .map(|d| d.visibility_state() == web_sys::VisibilityState::Hidden)
                    .unwrap_or(false);
                if hidden {
                    pause_if_running(&app);
                }
            }));
        }
        {
            let app = app.clone();
            listeners.push(Listener::attach(&window, "blur", move |_event| {
                pause_if_running(&app);
            }));
        }

        listeners
    }

    /// Restart button survives across sessions; unlike gameplay input it
    /// is part of the permanent page chrome.
    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event| {
                if app.borrow().session.is_running() {
                    return;
                }
                start_session(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pixel Dodge starting...");

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

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = GameSettings::load();
        let stats = PlayerStats::load();
        let mut quest_log = QuestLog::load();
        let mut quest_source: Box<dyn QuestSource> = Box::new(LocalQuestPool);

        let seed = platform::now_ms() as u64;
        let mut rng = Pcg32::seed_from_u64(seed);
        if quest_log.refresh(quest_source.as_mut(), platform::current_hour(), &mut rng) {
            quest_log.save();
        }

        // The menu layer passes the chosen tier via a data attribute; the
        // highest tier stays locked until enough quests are done.
        let requested = canvas
            .get_attribute("data-difficulty")
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default();
        let difficulty = if requested.unlocked(stats.total_quests_completed) {
            requested
        } else {
            log::warn!(
                "{} locked until {VOID_UNLOCK_QUESTS} quests are completed",
                requested.label()
            );
            Difficulty::default()
        };

        let session_seed = rng.random::<u64>();
        let app = Rc::new(RefCell::new(App {
            session: Session::new(difficulty, session_seed),
            render_state: None,
            shake_rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
            rng,
            keys: KeyMap::default(),
            paused: false,
            last_time: None,
            settings,
            stats,
            quest_log,
            quest_source,
            difficulty,
            input_listeners: Vec::new(),
            loop_alive: false,
        }));

        log::info!("App initialized with seed: {seed}");

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
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

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_restart_button(app.clone());
        start_session(&app);

        log::info!("Pixel Dodge running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_dodge::Difficulty;
    use pixel_dodge::sim::{InputSnapshot, Session};

    env_logger::init();
    log::info!("Pixel Dodge (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    // Scripted run: weave left/right/coast so the sim is exercised end to
    // end without a display.
    let mut session = Session::new(Difficulty::Medium, 0xD0D6E);
    let frame_ms = 1000.0 / 60.0;
    let mut elapsed_ms = 0.0_f32;
    let mut frame_index = 0u32;
    while session.is_running() && elapsed_ms < 60_000.0 {
        let input = match (frame_index / 45) % 3 {
            0 => InputSnapshot {
                left: true,
                right: false,
            },
            1 => InputSnapshot {
                left: false,
                right: true,
            },
            _ => InputSnapshot::default(),
        };
        session.tick(frame_ms, &input);
        elapsed_ms += frame_ms;
        frame_index += 1;
    }

    if let Some(over) = session.take_game_over() {
        println!(
            "game over: {} points, survived {} s",
            over.score, over.survival_secs
        );
    } else {
        let result = session.state.result();
        println!(
            "demo cut off while alive: {} points, {:.1} s",
            result.score, result.survival_secs
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
