//! Polyshot entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use polyshot::Config;
    use polyshot::renderer::{RenderState, frame_vertices, hud_style, hud_text};
    use polyshot::sim::{GameState, TickInput, tick};

    /// Sample configuration bundled into the web build
    const CONFIG: &str = include_str!("../config.txt");

    /// Frames simulated per animation frame at most, so a stalled tab catches up gradually
    const MAX_SUBSTEPS: u32 = 5;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f64,
        last_time: f64,
        /// Seconds per simulated frame
        step: f64,
        input: TickInput,
        /// Canvas CSS size, for mapping mouse positions into the window
        canvas_size: (f32, f32),
    }

    impl Game {
        fn new(config: Config, seed: u64) -> Self {
            let limit = config.window.frame_limit.max(1) as f64;
            Self {
                state: GameState::new(config, seed),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                step: 1.0 / limit,
                input: TickInput::default(),
                canvas_size: (1.0, 1.0),
            }
        }

        /// Convert a canvas offset in CSS pixels to window coordinates
        fn to_world(&self, x: f32, y: f32) -> glam::Vec2 {
            let window = &self.state.config.window;
            glam::Vec2::new(
                x / self.canvas_size.0 * window.width as f32,
                y / self.canvas_size.1 * window.height as f32,
            )
        }

        /// Run simulation frames for the elapsed time
        fn update(&mut self, dt: f64) {
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= self.step;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = None;
                self.input.special = false;
                self.input.pause = false;
                self.input.quit = false;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = frame_vertices(&self.state.entities);
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

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&hud_text(&self.state)));
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Polyshot starting...");

        let config = Config::parse(CONFIG)
            .and_then(|c| c.validate().map(|_| c))
            .unwrap_or_else(|e| {
                log::warn!("Bundled config rejected ({e}), using defaults");
                Config::default()
            });

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Canvas backing store matches the configured window
        let width = config.window.width;
        let height = config.window.height;
        canvas.set_width(width);
        canvas.set_height(height);
        let world_size = (width as f32, height as f32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(config, seed)));
        game.borrow_mut().canvas_size = (
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        );

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, world_size)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        if let Some(hud) = document.get_element_by_id("hud-score") {
            hud.set_attribute("style", &hud_style(&game.borrow().state.config.font))?;
        }

        setup_input_handlers(&canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Polyshot running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Movement keys are held; pause, quit and idle toggle are one-shot
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" => g.input.up = pressed,
                    "s" | "S" => g.input.down = pressed,
                    "a" | "A" => g.input.left = pressed,
                    "d" | "D" => g.input.right = pressed,
                    "p" | "P" if pressed && !event.repeat() => g.input.pause = true,
                    "Escape" if pressed => g.input.quit = true,
                    "i" | "I" if pressed && !event.repeat() => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.canvas_size = (
                    canvas_clone.client_width().max(1) as f32,
                    canvas_clone.client_height().max(1) as f32,
                );
                let target = g.to_world(event.offset_x() as f32, event.offset_y() as f32);
                match event.button() {
                    0 => g.input.fire = Some(target),
                    2 => g.input.special = true,
                    _ => {}
                }
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Right click is the special weapon, not a browser menu
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            canvas.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
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
        let running = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (time - g.last_time) / 1000.0
            } else {
                g.step
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
            g.state.running
        };

        if running {
            request_animation_frame(game);
        } else {
            log::info!("Stopped with score {}", game.borrow().state.score);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use polyshot::Config;
    use polyshot::renderer::frame_vertices;
    use polyshot::sim::{GameState, Tag, TickInput, tick};

    env_logger::init();
    log::info!("Polyshot (native) starting...");
    log::info!("Native mode runs headless under the autopilot - run with `trunk serve` for the web version");

    let path = std::env::args().nth(1).unwrap_or_else(|| "config.txt".to_string());
    let config = match Config::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    // About thirty seconds of play at the configured frame rate
    let frames = config.window.frame_limit.max(1) as u64 * 30;
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());

    let mut state = GameState::new(config, seed);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut drawn = 0;
    while state.running && state.current_frame < frames {
        tick(&mut state, &input);
        drawn += frame_vertices(&state.entities).len();
    }

    log::info!(
        "Ran {} frames: score {}, {} entities spawned, {} enemies alive, {} vertices drawn",
        state.current_frame,
        state.score,
        state.entities.total_entities(),
        state.entities.entities_with_tag(Tag::Enemy).count(),
        drawn
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {}
