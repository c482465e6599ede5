use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowId;

use crate::config::GameConfig;
use crate::error::{GameError, UiError};
use crate::input::{InputEvent, InputState, KeyCode, MouseButton};
use crate::renderer::Renderer;
use crate::renderer::draw::DrawList;
use crate::resources::Resources;
use crate::state::{GameState, StateStack};
use crate::window;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const YELLOW: Self = Self([1.0, 1.0, 0.0, 1.0]);

    /// Tint applied to hovered single-texture backgrounds.
    pub const HOVER_TINT: Self = Self::rgb8(100, 100, 100);
    /// Tint applied to the selected member of a single-texture group.
    pub const SELECTED_TINT: Self = Self::rgb8(255, 230, 120);
    /// Tint of the tile under the cursor.
    pub const TILE_HOVER: Self = Self([1.0, 1.0, 1.0, 0.7]);

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// Per-process context handed to every state hook. Holds no GPU objects, so
/// states and their tests can run without a window.
pub struct Engine {
    /// Shared, read-only after start-up.
    pub resources: Rc<Resources>,
    pub input: InputState,
    pub config: GameConfig,
    dt: f32,
    tick: u64,
    quit_requested: bool,
}

impl Engine {
    pub fn new(config: GameConfig, resources: Rc<Resources>) -> Self {
        Self {
            resources,
            input: InputState::new(),
            config,
            dt: 0.0,
            tick: 0,
            quit_requested: false,
        }
    }

    /// Default configuration and placeholder assets.
    pub fn headless() -> Self {
        Self::new(GameConfig::default(), Rc::new(Resources::placeholder()))
    }

    pub fn builder(config: GameConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn dt(&self) -> f32 { self.dt }
    pub fn tick(&self) -> u64 { self.tick }
    pub fn screen_size(&self) -> Vec2 { self.config.screen_size() }
    pub fn mouse_pos(&self) -> Vec2 { self.input.mouse_pos }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.input.is_key_held(key) }
    pub fn is_mouse_held(&self, button: MouseButton) -> bool { self.input.is_mouse_held(button) }

    /// Signal that the application should exit. The event loop exits after
    /// the current frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Advance the fixed-step clock by one update.
    pub fn advance(&mut self, dt: f32) {
        self.dt = dt;
        self.tick += 1;
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    config: GameConfig,
}

impl EngineBuilder {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Load assets, build the first state and run the event loop until the
    /// stack empties or a state asks to quit.
    pub fn run<F>(self, initial: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Engine) -> Result<Box<dyn GameState>, UiError>,
    {
        let resources = Resources::load_dir(&self.config.asset_dir)?;
        let fixed_dt = 1.0 / self.config.target_ups.max(1) as f32;
        let mut engine = Engine::new(self.config, Rc::new(resources));

        let first = initial(&mut engine)?;
        let stack = StateStack::new(first, &mut engine);
        let draw_list = DrawList::new(engine.screen_size());

        let event_loop = EventLoop::new()?;
        let mut app = App {
            engine,
            stack,
            draw_list,
            renderer: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
            error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    engine: Engine,
    stack: StateStack,
    draw_list: DrawList,
    renderer: Option<Renderer>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
    /// First fatal error raised inside a winit callback.
    error: Option<GameError>,
}

impl App {
    /// Stops the loop; `main` reports the error once `run` returns.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: GameError) {
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    /// Physical cursor position to layout pixels. The UI is laid out at the
    /// configured size; fullscreen modes only stretch the surface.
    fn to_layout(&self, x: f64, y: f64) -> Vec2 {
        let p = Vec2::new(x as f32, y as f32);
        let Some(renderer) = &self.renderer else { return p };
        let size = renderer.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return p;
        }
        p * self.engine.screen_size() / Vec2::new(size.width as f32, size.height as f32)
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let elapsed = match self.last_instant {
            Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
            None => self.fixed_dt,
        };
        self.last_instant = Some(now);
        self.accumulator += elapsed;

        for event in self.engine.input.drain_events() {
            self.stack.handle_input(&mut self.engine, &event);
        }

        while self.accumulator >= self.fixed_dt {
            self.engine.advance(self.fixed_dt);
            self.stack.update(&mut self.engine, self.fixed_dt);
            self.accumulator -= self.fixed_dt;
            if self.engine.quit_requested() {
                break;
            }
        }

        if self.engine.quit_requested() || self.stack.is_empty() {
            log::info!("quitting after {} updates", self.engine.tick());
            event_loop.exit();
            return;
        }

        self.draw_list.begin(self.engine.screen_size());
        self.stack.draw(&self.engine, &mut self.draw_list);

        let Some(renderer) = self.renderer.as_mut() else { return };
        match renderer.render(&self.draw_list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.window.inner_size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let attributes = window::window_attributes(&self.engine.config.window);
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        window::apply_window_mode(&window, &self.engine.config.window);

        match pollster::block_on(Renderer::new(window, &self.engine.resources)) {
            Ok(renderer) => {
                log::info!("renderer ready ({:?})", renderer.surface_format());
                self.renderer = Some(renderer);
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
                self.engine.input.push(InputEvent::Resized { width: size.width, height: size.height });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position = self.to_layout(position.x, position.y);
                self.engine.input.push(InputEvent::MouseMoved { position });
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let position = self.engine.input.mouse_pos;
                let event = match state {
                    ElementState::Pressed => InputEvent::MouseButtonPressed { button, position },
                    ElementState::Released => InputEvent::MouseButtonReleased { button, position },
                };
                self.engine.input.push(event);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => InputEvent::KeyPressed(code),
                    ElementState::Released => InputEvent::KeyReleased(code),
                };
                self.engine.input.push(event);
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }
}
