//! Break Free entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlButtonElement, HtmlCanvasElement, MouseEvent, TouchEvent};

    use break_free::audio::AudioManager;
    use break_free::engine::{
        frame_params, tick, AmbientTrack, EngineState, PhaseKind, TickInput,
    };
    use break_free::render::Renderer;
    use break_free::Settings;

    /// Animation instance holding all state
    struct Game {
        state: EngineState,
        renderer: Renderer,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        reset_btn: Option<HtmlButtonElement>,
        reset_shown: bool,
        ambient_started: bool,
    }

    impl Game {
        fn new(seed: u64, renderer: Renderer) -> Self {
            Self {
                state: EngineState::new(seed),
                renderer,
                audio: AudioManager::new(),
                settings: Settings::load(),
                input: TickInput::default(),
                reset_btn: None,
                reset_shown: false,
                ambient_started: false,
            }
        }

        /// One display frame: tick, sound, draw.
        fn frame(&mut self, time: f64) {
            self.input.now_ms = time;
            let input = self.input.clone();
            tick(&mut self.state, &input);

            // Clear one-shot inputs after processing
            self.input.press_started = false;
            self.input.reset = false;

            let events = self.state.take_events();
            self.audio.handle_events(&events, &self.settings);

            let mut params = frame_params(&self.state, time);
            if self.settings.reduced_flash && self.state.phase_kind() == PhaseKind::WhiteFlash {
                // Flash-sensitive viewers get the soft freedom tone instead
                params.background = break_free::engine::frame::FREEDOM_BG;
            }
            self.renderer.render(&params, time);

            if params.reset_visible != self.reset_shown {
                self.reset_shown = params.reset_visible;
                if let Some(btn) = &self.reset_btn {
                    let display = if params.reset_visible { "block" } else { "none" };
                    let _ = btn.style().set_property("display", display);
                }
            }
        }

        /// First pointer press unlocks audio (autoplay policy) and starts
        /// the ambient bed for whichever phase we are in.
        fn on_press(&mut self) {
            self.input.pressed = true;
            self.input.press_started = true;
            self.audio.resume();
            if !self.ambient_started {
                self.ambient_started = true;
                let track = match self.state.phase_kind() {
                    PhaseKind::Freedom | PhaseKind::FadeIn => AmbientTrack::Freedom,
                    _ => AmbientTrack::Oppressed,
                };
                self.audio.loop_ambient(track, self.settings.effective_ambient());
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.settings.save();
            if self.settings.muted {
                self.audio.stop_ambient();
            } else if self.ambient_started {
                let track = match self.state.phase_kind() {
                    PhaseKind::Freedom | PhaseKind::FadeIn => AmbientTrack::Freedom,
                    _ => AmbientTrack::Oppressed,
                };
                self.audio.loop_ambient(track, self.settings.effective_ambient());
            }
            log::info!("Muted: {}", self.settings.muted);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Break Free starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Match backing store to CSS size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let Some(renderer) = Renderer::new(&canvas) else {
            log::error!("Failed to acquire 2d canvas context");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer)));
        log::info!("Animation initialized with seed: {}", seed);

        setup_reset_button(&document, game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Break Free running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press / release
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().on_press();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pressed = false;
            });
            let window = web_sys::window().expect("no window");
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch press / release; the press carries no position, so only
        // the down/up edges matter.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().on_press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.pressed = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "m" | "M" => g.toggle_mute(),
                    "r" | "R" => g.input.reset = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut()
                .renderer
                .resize(width as f64, height as f64);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reset_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document
            .get_element_by_id("reset-btn")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            log::warn!("No #reset-btn element - keyboard reset (R) still works");
            return;
        };
        let _ = btn.style().set_property("display", "none");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        game.borrow_mut().reset_btn = Some(btn);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
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
    log::info!("Break Free (native) starting...");
    log::info!("Native mode runs a headless demo - build with trunk for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the engine through one full oppression-to-freedom cycle at a
/// simulated 60 fps, logging phase transitions and events.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use break_free::engine::{tick, EngineEvent, EngineState, PhaseKind, TickInput};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut state = EngineState::new(42);
    let mut input = TickInput::default();
    let mut last_kind = state.phase_kind();
    let mut now = 0.0;

    for frame in 0..2400u32 {
        now += FRAME_MS;
        input.now_ms = now;

        // Hammer the pointer every few frames until the chain gives
        if state.phase_kind() == PhaseKind::Oppressed {
            let press = frame % 4 == 0;
            input.pressed = press;
            input.press_started = press;
        } else {
            input.pressed = false;
            input.press_started = false;
        }

        tick(&mut state, &input);

        for event in state.take_events() {
            match event {
                EngineEvent::Beat { volume } => {
                    log::debug!("[{now:7.0}ms] beat (volume {volume:.2})")
                }
                EngineEvent::ChainShattered => log::info!("[{now:7.0}ms] chain shattered"),
                EngineEvent::TensionCreak => log::debug!("[{now:7.0}ms] creak"),
                EngineEvent::AmbientChanged { track } => {
                    log::info!("[{now:7.0}ms] ambient -> {track:?}")
                }
            }
        }

        let kind = state.phase_kind();
        if kind != last_kind {
            log::info!(
                "[{now:7.0}ms] phase {last_kind:?} -> {kind:?} (tension {:.2})",
                state.tension.value
            );
            last_kind = kind;
        }

        if kind == PhaseKind::Freedom {
            log::info!("[{now:7.0}ms] freedom reached after {frame} frames");
            break;
        }
    }
}
