//! Bird Dodge entry point
//!
//! Browser front-end on wasm32 (canvas + WebGPU, DOM HUD); terminal
//! front-end everywhere else.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, Response};

    use bird_dodge::assets::{self, AssetError, AssetGate, MANIFEST, SpriteAtlas};
    use bird_dodge::config::GameConfig;
    use bird_dodge::renderer::{RenderState, shapes};
    use bird_dodge::sim::{Command, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        atlas: SpriteAtlas,
        render_state: RenderState,
        canvas: HtmlCanvasElement,
        input: TickInput,
        render_frame: u64,
        // HUD diffing
        shown_score: Option<u64>,
        shown_over: Option<bool>,
    }

    impl Game {
        /// One fixed step; queued commands are consumed by it
        fn on_tick(&mut self) {
            let dt_ms = self.state.config.tick_ms;
            tick(&mut self.state, &self.input, dt_ms);
            self.input.clear();
        }

        fn render(&mut self) {
            let vertices = shapes::scene(&self.state.snapshot(), &self.atlas, self.render_frame);
            self.render_frame += 1;
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h, self.state.playfield);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Rebind the playfield to the canvas client size
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width();
            let client_h = self.canvas.client_height();
            if client_w <= 0 || client_h <= 0 {
                return;
            }
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            self.state.resize(client_w as f32, client_h as f32);
            self.render_state.resize(width, height, self.state.playfield);
            log::debug!("Viewport resized to {}x{}", client_w, client_h);
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.shown_score != Some(self.state.score) {
                if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                self.shown_score = Some(self.state.score);
            }

            let over = self.state.is_over();
            if self.shown_over != Some(over) {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.set_attribute("class", if over { "" } else { "hidden" });
                }
                self.shown_over = Some(over);
            }
        }
    }

    /// Owns the tick interval, the pending animation frame, the input
    /// listeners and their closures
    ///
    /// After `stop()` no callback touches the game again.
    struct GameLoop {
        interval_id: i32,
        frame_id: Rc<Cell<Option<i32>>>,
        stopped: Rc<Cell<bool>>,
        _tick: Closure<dyn FnMut()>,
        frame: FrameSlot,
        listeners: Vec<Listener>,
    }

    /// A DOM event listener that can be detached again
    struct Listener {
        target: web_sys::EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn attach(
            target: web_sys::EventTarget,
            kind: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Result<Self, JsValue> {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            Ok(Self {
                target,
                kind,
                closure,
            })
        }

        fn detach(&self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    fn request_frame(frame: &FrameSlot) -> Option<i32> {
        let window = web_sys::window()?;
        let slot = frame.borrow();
        let closure = slot.as_ref()?;
        window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()
    }

    impl GameLoop {
        fn start(game: Rc<RefCell<Game>>) -> Result<Self, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let tick_ms = game.borrow().state.config.tick_ms;
            let listeners = input_listeners(&window, &game)?;

            let tick = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || game.borrow_mut().on_tick())
            };
            let interval_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                tick_ms as i32,
            )?;

            let frame_id = Rc::new(Cell::new(None));
            let stopped = Rc::new(Cell::new(false));
            let frame: FrameSlot = Rc::new(RefCell::new(None));
            {
                let slot = frame.clone();
                let frame_id = frame_id.clone();
                let stopped = stopped.clone();
                *frame.borrow_mut() = Some(Closure::new(move |_time: f64| {
                    if stopped.get() {
                        return;
                    }
                    {
                        let mut g = game.borrow_mut();
                        g.render();
                        g.update_hud();
                    }
                    frame_id.set(request_frame(&slot));
                }));
            }
            frame_id.set(request_frame(&frame));

            log::info!("Game loop started ({}ms ticks)", tick_ms);
            Ok(Self {
                interval_id,
                frame_id,
                stopped,
                _tick: tick,
                frame,
                listeners,
            })
        }

        fn stop(&mut self) {
            if self.stopped.replace(true) {
                return;
            }
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(self.interval_id);
                if let Some(id) = self.frame_id.take() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            for listener in self.listeners.drain(..) {
                listener.detach();
            }
            // The frame closure holds its own slot; break the cycle
            self.frame.borrow_mut().take();
            log::info!("Game loop stopped");
        }
    }

    impl Drop for GameLoop {
        fn drop(&mut self) {
            self.stop();
        }
    }

    /// Browser key name to a game command
    fn command_for_key(key: &str) -> Option<Command> {
        match key {
            "ArrowUp" | "w" | "k" => Some(Command::MoveUp),
            "ArrowDown" | "s" | "j" => Some(Command::MoveDown),
            " " => Some(Command::Jump),
            "Enter" | "r" => Some(Command::Restart),
            _ => None,
        }
    }

    fn describe(value: JsValue) -> String {
        value.as_string().unwrap_or_else(|| format!("{:?}", value))
    }

    async fn fetch_text(url: &str) -> Result<String, String> {
        let window = web_sys::window().ok_or("no window")?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(describe)?
            .dyn_into()
            .map_err(describe)?;
        if !response.ok() {
            return Err(format!("HTTP {} for {}", response.status(), url));
        }
        let text = JsFuture::from(response.text().map_err(describe)?)
            .await
            .map_err(describe)?;
        text.as_string()
            .ok_or_else(|| format!("{} did not return text", url))
    }

    /// One fetch as a promise; rejects with `[name, reason]`
    fn fetch_promise(name: &'static str, url: String) -> js_sys::Promise {
        wasm_bindgen_futures::future_to_promise(async move {
            match fetch_text(&url).await {
                Ok(text) => Ok(JsValue::from_str(&text)),
                Err(reason) => Err(js_sys::Array::of2(
                    &JsValue::from_str(name),
                    &JsValue::from_str(&reason),
                )
                .into()),
            }
        })
    }

    /// Fetch the whole manifest concurrently and join it with `Promise.all`
    async fn load_assets(base: &str) -> Result<SpriteAtlas, AssetError> {
        let base = base.trim_end_matches('/');
        let promises: js_sys::Array = MANIFEST
            .iter()
            .map(|&name| fetch_promise(name, format!("{}/{}", base, assets::file_name(name))))
            .collect();

        let mut gate = AssetGate::for_manifest();
        match JsFuture::from(js_sys::Promise::all(&promises)).await {
            Ok(texts) => {
                let texts = js_sys::Array::from(&texts);
                for (name, text) in MANIFEST.iter().zip(texts.iter()) {
                    gate.resolve(name, &text.as_string().unwrap_or_default());
                }
            }
            Err(rejection) => {
                let parts = js_sys::Array::from(&rejection);
                gate.fail(AssetError::Unavailable {
                    name: parts.get(0).as_string().unwrap_or_default(),
                    reason: parts.get(1).as_string().unwrap_or_else(|| describe(rejection)),
                });
            }
        }
        gate.finish()
    }

    fn show_fatal(message: &str) {
        log::error!("{}", message);
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(el) = document.get_element_by_id("fatal-error") {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Bird Dodge starting...");

        if let Err(e) = start().await {
            show_fatal(&describe(e));
        }
    }

    async fn start() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = GameConfig::load();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let mut state =
            GameState::new(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        // The canvas only rebinds bounds; a short window is not a config error
        state.resize(client_w as f32, client_h as f32);

        // Nothing ticks until every sprite is in
        let atlas = load_assets(&state.config.asset_base)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, state.playfield)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            atlas,
            render_state,
            canvas,
            input: TickInput::default(),
            render_frame: 0,
            shown_score: None,
            shown_over: None,
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        let game_loop = Rc::new(RefCell::new(Some(GameLoop::start(game)?)));
        setup_teardown(game_loop)?;

        log::info!("Bird Dodge running!");
        Ok(())
    }

    /// Keyboard, viewport and restart-button listeners, owned by the loop
    fn input_listeners(
        window: &web_sys::Window,
        game: &Rc<RefCell<Game>>,
    ) -> Result<Vec<Listener>, JsValue> {
        let mut listeners = Vec::with_capacity(3);

        let keyboard = game.clone();
        listeners.push(Listener::attach(window.clone().into(), "keydown", move |event| {
            let Ok(event) = event.dyn_into::<KeyboardEvent>() else {
                return;
            };
            let Some(command) = command_for_key(&event.key()) else {
                return;
            };
            // Keep arrows and space from scrolling the page
            event.prevent_default();
            let one_shot = matches!(command, Command::Jump | Command::Restart);
            if one_shot && event.repeat() {
                return;
            }
            keyboard.borrow_mut().input.push(command);
        })?);

        let viewport = game.clone();
        listeners.push(Listener::attach(window.clone().into(), "resize", move |_| {
            viewport.borrow_mut().resize();
        })?);

        if let Some(btn) = window.document().and_then(|d| d.get_element_by_id("restart-btn")) {
            let button = game.clone();
            listeners.push(Listener::attach(btn.into(), "click", move |_| {
                button.borrow_mut().input.push(Command::Restart);
            })?);
        }

        Ok(listeners)
    }

    /// Stop all timers when the page goes away
    fn setup_teardown(game_loop: Rc<RefCell<Option<GameLoop>>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(mut game_loop) = game_loop.borrow_mut().take() {
                game_loop.stop();
            }
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use bird_dodge::StartupError;
    use bird_dodge::assets::{self, DirSource};
    use bird_dodge::config::GameConfig;
    use bird_dodge::term;

    /// Environment variable naming a config file when no argument is given
    pub const CONFIG_ENV: &str = "BIRD_DODGE_CONFIG";

    fn config_path(arg: Option<String>, env: Option<String>) -> Option<String> {
        arg.or(env).filter(|p| !p.is_empty())
    }

    /// Load everything, then hand over to the terminal loop
    pub fn run() -> Result<u64, StartupError> {
        let path = config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
        let config = match path {
            Some(path) => GameConfig::load_file(path)?,
            None => GameConfig::default(),
        };
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });

        let atlas = assets::load_all(&DirSource::new(&config.asset_base))?;
        term::run(config, atlas, seed)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_config_path_precedence() {
            assert_eq!(
                config_path(Some("a.json".into()), Some("b.json".into())),
                Some("a.json".to_string())
            );
            assert_eq!(config_path(None, Some("b.json".into())), Some("b.json".to_string()));
            assert_eq!(config_path(None, Some(String::new())), None);
            assert_eq!(config_path(None, None), None);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match native::run() {
        Ok(score) => {
            println!("Final score: {}", score);
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("bird-dodge: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
