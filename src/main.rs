//! Flappy Croco entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_croco::assets::{self, Assets, SpriteId};
    use flappy_croco::audio::{AudioManager, SoundEffect};
    use flappy_croco::clock::FrameClock;
    use flappy_croco::persistence::{FallbackStorage, LocalStorage};
    use flappy_croco::platform::{CloudStorage, NullPlatform, YandexPlatform};
    use flappy_croco::renderer::{RenderError, RenderState, scene, shapes};
    use flappy_croco::sim::{Field, GameMode};
    use flappy_croco::{Session, TunableKey, Tunables};

    /// Settings sliders on the page, by element id
    const SLIDERS: [&str; 8] = [
        "birdSize",
        "pipeSize",
        "birdCollisionWidth",
        "birdCollisionHeight",
        "pipeCollisionWidth",
        "pipeCollisionHeight",
        "gameSpeed",
        "pipeGap",
    ];

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        clock: FrameClock,
        assets: Assets,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        /// Mode the screens were last shown for
        shown_mode: Option<GameMode>,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let ticks = self.clock.advance(time);
            for _ in 0..ticks {
                for event in self.session.step() {
                    if let Some(effect) = SoundEffect::for_event(&event) {
                        self.audio.play(effect);
                    }
                }
            }
            self.render();
            self.update_hud();
        }

        fn render(&mut self) {
            if self.session.mode() == GameMode::Loading {
                return;
            }
            if let Some(ref mut render_state) = self.render_state {
                let cmds = scene::build(
                    &self.session.state,
                    &self.session.tunables,
                    &self.assets,
                    self.session.show_collision_boxes,
                );
                let batches = shapes::tessellate(&cmds);
                match render_state.render(&batches) {
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
        fn update_hud(&mut self) {
            let Some(document) = page_document() else { return };
            let score = self.session.state.score.to_string();
            let best = self.session.high_score().to_string();

            set_text(&document, "currentScore", &score);
            set_text(&document, "highScore", &best);

            let mode = self.session.mode();
            if self.shown_mode == Some(mode) {
                return;
            }
            self.shown_mode = Some(mode);

            let active = match mode {
                GameMode::Loading => None,
                GameMode::Menu => Some("menuScreen"),
                GameMode::Playing | GameMode::Paused => Some("gameHUD"),
                GameMode::GameOver => Some("gameOverScreen"),
            };
            for id in ["menuScreen", "gameHUD", "gameOverScreen"] {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if active == Some(id) { "screen active" } else { "screen" };
                    let _ = el.set_attribute("class", class);
                }
            }

            if mode == GameMode::GameOver {
                set_text(&document, "finalScore", &score);
                set_text(&document, "bestScore", &best);
            }
        }

        /// Fit the field to the container and resize everything that
        /// depends on it
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let (container_w, container_h) = window
                .document()
                .and_then(|d| d.get_element_by_id("gameContainer"))
                .map(|el| {
                    let rect = el.get_bounding_client_rect();
                    (rect.width() as f32, rect.height() as f32)
                })
                .unwrap_or_else(|| {
                    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
                    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
                    (w as f32, h as f32)
                });

            let field = Field::fit(container_w, container_h);
            let dpr = window.device_pixel_ratio();
            let width = ((field.width as f64 * dpr) as u32).max(1);
            let height = ((field.height as f64 * dpr) as u32).max(1);

            self.canvas.set_width(width);
            self.canvas.set_height(height);
            let _ = self.canvas.set_attribute(
                "style",
                &format!("width: {}px; height: {}px", field.width, field.height),
            );

            self.session.resize(field);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
                render_state.set_field_size(field.width, field.height);
            }
        }

        /// Jump or confirm, from any input source
        fn jump(&mut self) {
            self.audio.on_user_gesture();
            self.session.press_jump();
        }

        fn refresh_audio_buttons(&self) {
            let Some(document) = page_document() else { return };
            let sound = self.session.save.sound_enabled;
            let music = self.session.save.music_enabled;
            if let Some(btn) = document.get_element_by_id("soundBtn") {
                btn.set_text_content(Some(if sound { "🔊 Sound ON" } else { "🔇 Sound OFF" }));
                let _ = btn.class_list().toggle_with_force("muted", !sound);
            }
            if let Some(btn) = document.get_element_by_id("musicBtn") {
                btn.set_text_content(Some(if music { "🎵 Music ON" } else { "🎵 Music OFF" }));
                let _ = btn.class_list().toggle_with_force("muted", !music);
            }
        }
    }

    fn page_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Slider label text: the gap is whole pixels, multipliers one decimal
    fn format_setting(key: TunableKey, value: f32) -> String {
        match key {
            TunableKey::Gap => format!("{}", value.round() as i32),
            _ => format!("{:.1}", value),
        }
    }

    /// Push current tunables into the sliders and their labels
    fn sync_sliders(tunables: &Tunables) {
        let Some(document) = page_document() else { return };
        for id in SLIDERS {
            let Ok(key) = id.parse::<TunableKey>() else { continue };
            let value = tunables.get(key);
            if let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value(&value.to_string());
            }
            set_text(&document, &format!("{}Value", id), &format_setting(key, value));
        }
    }

    async fn init_gpu(canvas: &HtmlCanvasElement, field: Field) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let result: Result<RenderState, RenderError> = RenderState::new(
            surface,
            &adapter,
            canvas.width(),
            canvas.height(),
            (field.width, field.height),
        )
        .await;
        match result {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Croco starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let tunables = Tunables::load();
        sync_sliders(&tunables);

        let session = Session::new(
            Field::default(),
            seed,
            tunables,
            Box::new(LocalStorage),
            Box::new(NullPlatform),
        );
        let audio = AudioManager::new(session.save.sound_enabled, session.save.music_enabled);

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            clock: FrameClock::new(),
            assets: Assets::new(),
            audio,
            canvas: canvas.clone(),
            shown_mode: None,
        }));
        game.borrow_mut().resize();

        log::info!("Game initialized with seed: {}", seed);

        // WebGPU; without it the game still runs, it just isn't drawn
        let field = game.borrow().session.state.field;
        match init_gpu(&canvas, field).await {
            Some(render_state) => game.borrow_mut().render_state = Some(render_state),
            None => log::warn!("Rendering unavailable, running without drawing"),
        }

        wasm_bindgen_futures::spawn_local(load_sprites(game.clone()));
        wasm_bindgen_futures::spawn_local(connect_platform(game.clone()));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_sliders(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game.clone());

        if let Some(loading) = document.get_element_by_id("loadingScreen") {
            let _ = loading.set_attribute("class", "hidden");
        }
        {
            let mut g = game.borrow_mut();
            g.session.finish_loading();
            g.refresh_audio_buttons();
            g.audio.start_music();
        }

        request_animation_frame(game);

        log::info!("Flappy Croco running!");
    }

    /// Fetch sprites in the background; drawing falls back until each lands
    async fn load_sprites(game: Rc<RefCell<Game>>) {
        for id in SpriteId::ALL {
            let result = assets::load_sprite(id).await;
            let g = &mut *game.borrow_mut();
            match result {
                Ok(image) => {
                    if let Some(ref mut render_state) = g.render_state {
                        render_state.upload_sprite(id, &image);
                    }
                    g.assets.mark_loaded(id, image.width, image.height);
                }
                Err(e) => g.assets.mark_failed(id, &e),
            }
        }
    }

    /// Portal SDK in the background. Once a player is known, saves go to the
    /// cloud first and LocalStorage second.
    async fn connect_platform(game: Rc<RefCell<Game>>) {
        let Some(platform) = YandexPlatform::connect().await else { return };
        let cloud = CloudStorage::fetch(&platform).await;

        let mut g = game.borrow_mut();
        g.session.set_platform(Box::new(platform));
        if let Some(cloud) = cloud {
            g.session.set_storage(Box::new(FallbackStorage::new(cloud, LocalStorage)));
            let (sound, music) = (g.session.save.sound_enabled, g.session.save.music_enabled);
            g.audio.set_sound_enabled(sound);
            g.audio.set_music_enabled(music);
            g.refresh_audio_buttons();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    game.borrow_mut().jump();
                    return;
                }
                match event.key().as_str() {
                    "c" | "C" => {
                        game.borrow_mut().session.toggle_collision_boxes();
                    }
                    "i" | "I" => {
                        game.borrow_mut().session.toggle_autopilot();
                    }
                    _ => {}
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().jump();
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start; not passive so the page doesn't scroll or zoom
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().jump();
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // No context menu on long press
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Any interaction may unblock audio
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow().audio.on_user_gesture();
            });
            if let Some(document) = page_document() {
                let _ = document
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("No #{} element", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = page_document() else { return };

        for id in ["startBtn", "restartBtn"] {
            let game = game.clone();
            on_click(&document, id, move || game.borrow_mut().jump());
        }

        {
            let game = game.clone();
            on_click(&document, "menuBtn", move || {
                game.borrow_mut().session.return_to_menu();
            });
        }

        {
            let game = game.clone();
            on_click(&document, "soundBtn", move || {
                let mut g = game.borrow_mut();
                let enabled = g.session.toggle_sound();
                g.audio.set_sound_enabled(enabled);
                g.refresh_audio_buttons();
            });
        }

        {
            let game = game.clone();
            on_click(&document, "musicBtn", move || {
                let mut g = game.borrow_mut();
                let enabled = g.session.toggle_music();
                g.audio.set_music_enabled(enabled);
                g.refresh_audio_buttons();
            });
        }

        on_click(&document, "resetSettings", move || {
            let mut g = game.borrow_mut();
            g.session.reset_settings();
            sync_sliders(&g.session.tunables);
        });

        on_click(&document, "settingsToggle", || {
            if let Some(content) = page_document().and_then(|d| d.get_element_by_id("settingsContent")) {
                let _ = content.class_list().toggle("active");
            }
        });
    }

    fn setup_sliders(game: Rc<RefCell<Game>>) {
        let Some(document) = page_document() else { return };

        for id in SLIDERS {
            let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };

            let game = game.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                match g.session.apply_setting(id, &input_clone.value()) {
                    Ok(key) => {
                        let value = g.session.tunables.get(key);
                        if let Some(document) = page_document() {
                            set_text(&document, &format!("{}Value", id), &format_setting(key, value));
                        }
                    }
                    // Previous value stays; put the slider back on it
                    Err(_) => sync_sliders(&g.session.tunables),
                }
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = page_document() else { return };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let visible = document_clone.visibility_state() != web_sys::VisibilityState::Hidden;
            let mut g = game.borrow_mut();
            if g.session.set_visible(visible) && visible {
                // Time spent hidden must not turn into catch-up ticks
                g.clock.reset();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
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
    log::info!("Flappy Croco (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    autopilot_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run with the autopilot at the controls
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_demo() {
    use flappy_croco::persistence::MemoryStorage;
    use flappy_croco::platform::NullPlatform;
    use flappy_croco::sim::{Field, GameEvent, GameMode};
    use flappy_croco::{Session, Tunables};

    const DEMO_SEED: u64 = 2024;
    /// One minute of play
    const DEMO_TICKS: u32 = 60 * 60;

    let mut session = Session::new(
        Field::new(800.0, 600.0),
        DEMO_SEED,
        Tunables::default(),
        Box::new(MemoryStorage::new()),
        Box::new(NullPlatform),
    );
    session.finish_loading();
    session.toggle_autopilot();
    session.press_jump();

    let mut jumps = 0u32;
    for _ in 0..DEMO_TICKS {
        for event in session.step() {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::Scored { score } => log::debug!("Score {}", score),
                GameEvent::Crashed { cause } => log::warn!("Crashed: {:?}", cause),
                GameEvent::Started => {}
            }
        }
        if session.mode() == GameMode::GameOver {
            break;
        }
    }

    log::info!(
        "Demo finished in {:?} after {} ticks: score {}, {} jumps, high score {}",
        session.mode(),
        session.state.time_ticks,
        session.state.score,
        jumps,
        session.high_score()
    );
    println!(
        "Autopilot scored {} in {} ticks ({:?})",
        session.state.score,
        session.state.time_ticks,
        session.mode()
    );
}
