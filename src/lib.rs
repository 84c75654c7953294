// Re-export all public modules so they can be used from main.rs and tests
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
use {
    controller::input::wasm::{keyboard_event_to_input, mouse_move_to_input},
    controller::{FrameClock, FrameLoop, FrameReport, InputEvent, InputProcessor, RapierWorld},
    error::{GameError, Result},
    std::{cell::RefCell, rc::Rc},
    ui::DebugParams,
    view::{hud::DomHud, GpuContext, Renderer},
    wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue},
    web_sys::{Document, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window},
};

#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "hoop-canvas";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> std::result::Result<(), JsValue> {
    logging::init();
    setup_app().await.map_err(|e| {
        tracing::error!("start-up failed: {e}");
        JsValue::from(e)
    })
}

/// Everything the frame callback and the event listeners share
#[cfg(target_arch = "wasm32")]
struct WebApp {
    game: FrameLoop<RapierWorld>,
    renderer: Renderer,
    hud: DomHud,
    clock: FrameClock,
    params: DebugParams,
    report: FrameReport,
    egui_ctx: egui::Context,
    egui_events: Vec<egui::Event>,
    egui_wants_pointer: bool,
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app() -> Result<()> {
    let (window, document, canvas) = init_canvas()?;
    let (width, height) = (canvas.width(), canvas.height());

    let gpu = GpuContext::new(&canvas, width, height).await?;

    let config = config::GameConfig::default();
    let physics = RapierWorld::new(&config.physics);
    let game = FrameLoop::new(config, physics, width, height);
    let renderer = Renderer::new(gpu, game.fixtures(), &game.config.throw);

    let app = Rc::new(RefCell::new(WebApp {
        hud: DomHud::attach(&document),
        clock: FrameClock::new(game.config.physics.max_frame_dt),
        params: DebugParams::from_config(&game.config),
        report: FrameReport {
            dt: 0.0,
            newly_scored: 0,
            score: 0,
            power_fill: 0.0,
            ball_count: 0,
        },
        egui_ctx: egui::Context::default(),
        egui_events: Vec::new(),
        egui_wants_pointer: false,
        game,
        renderer,
    }));

    setup_input_listeners(&document, &window, &canvas, app.clone())?;

    let f = RcCellCallback::new(window.clone(), {
        let window = window.clone();
        move || {
            let now = window.performance().map(|p| p.now()).unwrap_or_else(js_sys::Date::now);
            let mut app = app.borrow_mut();
            let app = &mut *app;

            let dt = app.clock.tick(now);

            let (w, h) = window_size(&window);
            if (w, h) != app.renderer.size() {
                canvas.set_width(w);
                canvas.set_height(h);
                app.renderer.resize(w, h);
                app.game.resize(w, h);
            }

            let raw_input = ui::raw_input(w as f32, h as f32, now, std::mem::take(&mut app.egui_events));
            let show_hud = !app.hud.is_attached();
            let output = ui::build_ui(&app.egui_ctx, raw_input, &mut app.params, &app.report, show_hud);
            app.egui_wants_pointer = app.egui_ctx.wants_pointer_input();
            let primitives = app.egui_ctx.tessellate(output.shapes, output.pixels_per_point);
            app.renderer.set_ui(primitives, output.textures_delta, output.pixels_per_point);

            let report = app.game.tick(dt, &mut app.renderer, app.params.clear_color);
            app.hud.update(&report);
            app.report = report;
        }
    });
    f.start();

    tracing::info!("hoopshot running on #{CANVAS_ID}");
    Ok(())
}

/// Keyboard, pointer and focus listeners; all feed the shared `WebApp`
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    window: &Window,
    canvas: &HtmlCanvasElement,
    app: Rc<RefCell<WebApp>>,
) -> Result<()> {
    let input_processor = InputProcessor::default();

    // Keyboard down, auto-repeat included: every repeat is one charge tick
    {
        let app = app.clone();
        let document_for_exit = document.clone();
        let input_processor = input_processor.clone();
        let keydown = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let event = keyboard_event_to_input(&e, true);
            if let InputEvent::KeyDown(code) = &event {
                if input_processor.is_escape(code) {
                    document_for_exit.exit_pointer_lock();
                } else if input_processor.is_game_key(code) {
                    e.prevent_default();
                }
            }
            if let Some(action) = input_processor.action_for(&event) {
                app.borrow_mut().game.handle_action(action);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }

    // Keyboard up
    {
        let app = app.clone();
        let input_processor = input_processor.clone();
        let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
            let event = keyboard_event_to_input(&e, false);
            if let Some(action) = input_processor.action_for(&event) {
                e.prevent_default();
                app.borrow_mut().game.handle_action(action);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
        keyup.forget();
    }

    // Focus loss drops pending look input
    {
        let app = app.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            app.borrow_mut().game.input_state.process_event(&InputEvent::FocusLost);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }

    // Pointer lock change
    {
        let app = app.clone();
        let doc_pl = document.clone();
        let plc = Closure::wrap(Box::new(move |_e: Event| {
            let locked = doc_pl.pointer_lock_element().is_some();
            tracing::debug!("pointer lock {}", if locked { "acquired" } else { "released" });
            app.borrow_mut()
                .game
                .input_state
                .process_event(&InputEvent::PointerLockChanged { locked });
        }) as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback("pointerlockchange", plc.as_ref().unchecked_ref())?;
        plc.forget();
    }

    // Canvas click enters pointer lock unless the debug panel has the pointer
    {
        let app = app.clone();
        let canvas_click = canvas.clone();
        let click = Closure::wrap(Box::new(move |_e: MouseEvent| {
            if !app.borrow().egui_wants_pointer {
                canvas_click.request_pointer_lock();
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
    }

    // Mouse move: look while locked, otherwise feed egui
    {
        let app = app.clone();
        let mm = Closure::wrap(Box::new(move |e: MouseEvent| {
            let mut app = app.borrow_mut();
            if app.game.input_state.pointer_locked {
                app.game.input_state.process_event(&mouse_move_to_input(&e));
            } else {
                let pos = egui::pos2(e.client_x() as f32, e.client_y() as f32);
                app.egui_events.push(egui::Event::PointerMoved(pos));
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("mousemove", mm.as_ref().unchecked_ref())?;
        mm.forget();
    }

    // Mouse buttons go to egui only
    for (kind, pressed) in [("mousedown", true), ("mouseup", false)] {
        let app = app.clone();
        let button = Closure::wrap(Box::new(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            let mut app = app.borrow_mut();
            if app.game.input_state.pointer_locked {
                return;
            }
            app.egui_events.push(egui::Event::PointerButton {
                pos: egui::pos2(e.client_x() as f32, e.client_y() as f32),
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::default(),
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback(kind, button.as_ref().unchecked_ref())?;
        button.forget();
    }

    Ok(())
}

/// Use the page's `#hoop-canvas`, or append a fresh one to `<body>`
#[cfg(target_arch = "wasm32")]
fn init_canvas() -> Result<(Window, Document, HtmlCanvasElement)> {
    let window = web_sys::window().ok_or_else(|| GameError::Dom("no global `window`".into()))?;
    let document = window.document().ok_or_else(|| GameError::Dom("no document on window".into()))?;

    let canvas = match document.get_element_by_id(CANVAS_ID) {
        Some(el) => el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GameError::Dom(format!("#{CANVAS_ID} is not a canvas")))?,
        None => {
            let body = document.body().ok_or_else(|| GameError::Dom("no body on document".into()))?;
            let canvas = document
                .create_element("canvas")?
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| GameError::Dom("failed to create canvas".into()))?;
            canvas.set_id(CANVAS_ID);
            body.append_child(&canvas)?;
            tracing::info!("created #{CANVAS_ID}");
            canvas
        }
    };

    let (width, height) = window_size(&window);
    canvas.set_width(width);
    canvas.set_height(height);
    Ok((window, document, canvas))
}

#[cfg(target_arch = "wasm32")]
fn window_size(window: &Window) -> (u32, u32) {
    let dim = |v: std::result::Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).map(|f| f as u32).unwrap_or(1).max(1)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// requestAnimationFrame loop around a shared closure
#[cfg(target_arch = "wasm32")]
struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

#[cfg(target_arch = "wasm32")]
impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn schedule(window: &Window, callback: &Closure<dyn FnMut()>) {
        if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            tracing::error!("requestAnimationFrame failed: {e:?}");
        }
    }

    fn start(self) {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();

            // Recursively schedule next frame
            if let Some(cb) = callback_clone.borrow().as_ref() {
                Self::schedule(&window, cb);
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            Self::schedule(&self.window, cb);
        }

        // Leak the closure to keep it alive
        std::mem::forget(callback);
    }
}
