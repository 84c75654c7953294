use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};
use std::sync::Arc;
use std::time::Instant;

// Import from the library crate
use hoopshot::{
    config::GameConfig,
    controller::{FrameClock, FrameLoop, FrameReport, InputEvent, InputProcessor, RapierWorld},
    error::{GameError, Result},
    logging,
    ui::{self, DebugParams},
    view::{GpuContext, Renderer},
};

struct App {
    window: Arc<Window>,
    game: FrameLoop<RapierWorld>,
    renderer: Renderer,
    input_processor: InputProcessor,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
    params: DebugParams,
    report: FrameReport,

    // Frame timing
    started: Instant,
    clock: FrameClock,
}

/// winit `KeyCode` names match `KeyboardEvent.code` ("Space", "KeyA", ...)
fn key_code_name(code: KeyCode) -> String {
    format!("{code:?}")
}

impl App {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuContext::new_native(window.clone()).await?;

        let config = GameConfig::default();
        let physics = RapierWorld::new(&config.physics);
        let game = FrameLoop::new(config, physics, size.width, size.height);
        let renderer = Renderer::new(gpu, game.fixtures(), &game.config.throw);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            input_processor: InputProcessor::default(),
            params: DebugParams::from_config(&game.config),
            report: FrameReport {
                dt: 0.0,
                newly_scored: 0,
                score: 0,
                power_fill: 0.0,
                ball_count: 0,
            },
            clock: FrameClock::new(game.config.physics.max_frame_dt),
            started: Instant::now(),
            egui_state,
            egui_ctx,
            window,
            game,
            renderer,
        })
    }

    fn set_cursor_lock(&mut self, locked: bool) {
        if locked {
            // Locked is unsupported on some platforms, Confined is close enough
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("cursor grab failed: {e}");
                return;
            }
        } else if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("cursor release failed: {e}");
        }
        self.window.set_cursor_visible(!locked);
        self.game
            .input_state
            .process_event(&InputEvent::PointerLockChanged { locked });
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key, .. }, .. } => {
                let PhysicalKey::Code(code) = physical_key else {
                    return false;
                };
                let name = key_code_name(*code);
                let event = match state {
                    ElementState::Pressed => InputEvent::KeyDown(name),
                    ElementState::Released => InputEvent::KeyUp(name),
                };
                if let InputEvent::KeyDown(name) = &event {
                    if self.input_processor.is_escape(name) {
                        self.set_cursor_lock(false);
                    }
                }
                if let Some(action) = self.input_processor.action_for(&event) {
                    self.game.handle_action(action);
                }
                true
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                if !self.game.input_state.pointer_locked {
                    self.set_cursor_lock(true);
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.game.input_state.process_event(&InputEvent::FocusLost);
                false
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size.width, new_size.height);
            self.game.resize(new_size.width, new_size.height);
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.game
            .input_state
            .process_event(&InputEvent::MouseMove { dx: dx as f32, dy: dy as f32 });
    }

    fn frame(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let dt = self.clock.tick(now_ms);

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let output = ui::build_ui(&self.egui_ctx, raw_input, &mut self.params, &self.report, true);
        self.egui_state.handle_platform_output(&self.window, output.platform_output);
        let primitives = self.egui_ctx.tessellate(output.shapes, output.pixels_per_point);
        self.renderer.set_ui(primitives, output.textures_delta, output.pixels_per_point);

        self.report = self.game.tick(dt, &mut self.renderer, self.params.clear_color);
    }
}

fn run() -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| GameError::Window(e.to_string()))?;
    let window_attributes = Window::default_attributes()
        .with_title("hoopshot")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    #[allow(deprecated)]
    let window = event_loop
        .create_window(window_attributes)
        .map_err(|e| GameError::Window(e.to_string()))?;
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window))?;
    tracing::info!("native window ready");

    #[allow(deprecated)]
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { ref event, window_id } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => app.resize(*physical_size),
                        WindowEvent::RedrawRequested => app.frame(),
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => app.window.request_redraw(),
            _ => {}
        })
        .map_err(|e| GameError::Window(e.to_string()))
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
