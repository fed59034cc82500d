//! Application event loop.
//!
//! [`run`] opens a window (the `canvas` element on the web), assembles the
//! scene, creates the GPU context and hands both to an
//! [`AnimationScheduler`]. From then on the loop only forwards events:
//!
//! 1. `RedrawRequested` ticks the frame clock and the scheduler, then asks for
//!    the next redraw
//! 2. `Resized` recomputes the surface size with the pixel ratio cap
//! 3. cursor and touch events go to the [`PointerTracker`]
//!
//! Initialisation is asynchronous. Natively it is driven to completion on a
//! tokio runtime; on the web it is spawned and reports back through a user
//! event, so the first frames may arrive before the scene exists and are
//! simply skipped.
//!
//! On the web the page owns startup: instantiating the module does nothing
//! until the page calls the exported `start` function.

use std::{fmt::Debug, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::{TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    animation::{AnimationScheduler, FrameClock},
    config::SceneConfig,
    context::Context,
    pointer::PointerTracker,
    render::SurfaceSize,
    scene::SceneAssembler,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const CANVAS_ID: &str = "canvas";
#[cfg(target_arch = "wasm32")]
const LOADING_ID: &str = "loading";

/// Everything that exists once initialisation finished.
pub struct AppState {
    scheduler: AnimationScheduler<Context>,
}

impl AppState {
    async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        let size = surface_size(&window, &config);
        let (scene, handles) = SceneAssembler::new(&config).assemble(size.width, size.height);
        let ctx = Context::new(window, size, &scene).await?;
        let scheduler = AnimationScheduler::new(scene, handles, ctx, &config);
        Ok(Self { scheduler })
    }

    fn window(&self) -> &Arc<Window> {
        self.scheduler.renderer().window()
    }
}

impl Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("running", &self.scheduler.is_running())
            .field("ticks", &self.scheduler.ticks())
            .finish()
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(anyhow::Result<AppState>),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(Ok(_)) => f.write_str("Initialized(Ok)"),
            Self::Initialized(Err(e)) => write!(f, "Initialized(Err({e}))"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: SceneConfig,
    state: Option<AppState>,
    clock: FrameClock,
    pointer: PointerTracker,
    window_requested: bool,
    /// Set when startup failed; returned from [`run`] once the loop exits.
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            config,
            state: None,
            clock: FrameClock::new(),
            pointer: PointerTracker::new(),
            window_requested: false,
            init_error: None,
        })
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("App initialization failed: {error:#}");
        self.init_error = Some(error);
        event_loop.exit();
    }

    /// Takes over a freshly initialised state and starts the loop.
    fn on_initialized(&mut self, event_loop: &ActiveEventLoop, state: anyhow::Result<AppState>) {
        let mut state = match state {
            Ok(state) => state,
            Err(e) => {
                self.abort(event_loop, e);
                return;
            }
        };
        #[cfg(target_arch = "wasm32")]
        hide_loading_indicator();

        // the canvas may have been resized while the context was created
        let size = surface_size(state.window(), &self.config);
        state.scheduler.resize(size);
        state.scheduler.start();
        self.clock.reset();
        state.window().request_redraw();
        self.state = Some(state);
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_requested {
            return;
        }
        self.window_requested = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("yeti");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match find_canvas() {
                Some(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                None => {
                    self.abort(event_loop, anyhow::anyhow!("the page has no #{CANVAS_ID} element"));
                    return;
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.abort(event_loop, anyhow::Error::new(e).context("creating the window"));
                return;
            }
        };

        let init_future = AppState::new(window, self.config.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self.async_runtime.block_on(init_future);
            self.on_initialized(event_loop, state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = init_future.await;
                if proxy.send_event(FlowEvent::Initialized(state)).is_err() {
                    log::error!("event loop closed before the scene was ready");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => self.on_initialized(event_loop, state),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let size = surface_size(state.window(), &self.config);
                state.scheduler.resize(size);
            }
            WindowEvent::RedrawRequested => {
                let (delta, elapsed) = self.clock.tick();
                state.scheduler.tick(delta, elapsed);
                state.window().request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = state.window().inner_size();
                self.pointer
                    .on_pointer_move(position.x, position.y, size.width, size.height);
            }
            WindowEvent::Touch(touch) => {
                let size = state.window().inner_size();
                let (x, y) = (touch.location.x, touch.location.y);
                match touch.phase {
                    TouchPhase::Started => {
                        self.pointer.on_touch_start(x, y, size.width, size.height)
                    }
                    TouchPhase::Moved => {
                        // scrolling is already disabled on the canvas via `touch-action`
                        let suppress = self.pointer.on_touch_move(x, y, size.width, size.height);
                        log::trace!("touch move, suppress default: {suppress}");
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => (),
                }
            }
            _ => {}
        }
    }
}

/// Surface size for the window's current physical size, with the pixel ratio capped.
fn surface_size(window: &Window, config: &SceneConfig) -> SurfaceSize {
    let size = window.inner_size();
    SurfaceSize::from_physical(
        (size.width, size.height),
        window.scale_factor(),
        config.render.max_pixel_ratio,
    )
}

#[cfg(target_arch = "wasm32")]
fn find_canvas() -> Option<web_sys::HtmlCanvasElement> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let canvas = document.get_element_by_id(CANVAS_ID)?;
    if let Some(element) = canvas.dyn_ref::<web_sys::HtmlElement>() {
        // touch drags over the scene must not scroll the page
        if let Err(e) = element.style().set_property("touch-action", "none") {
            log::warn!("cannot disable touch scrolling: {e:?}");
        }
    }
    Some(canvas.unchecked_into())
}

/// Hides the page's loading indicator, if it has one.
#[cfg(target_arch = "wasm32")]
fn hide_loading_indicator() {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(loading) = document
        .get_element_by_id(LOADING_ID)
        .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        log::debug!("no #{LOADING_ID} element to hide");
        return;
    };
    if let Err(e) = loading.style().set_property("display", "none") {
        log::warn!("cannot hide #{LOADING_ID}: {e:?}");
    }
}

/// Initialises logging, builds the event loop and runs the scene until the window closes.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    #[cfg(not(target_arch = "wasm32"))]
    {
        event_loop.run_app(&mut app)?;
        if let Some(e) = app.init_error.take() {
            return Err(e);
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
    }

    Ok(())
}

/// Web entry point. Nothing runs when the module is instantiated; the
/// embedding page calls `start()` once its `canvas` (and optional `loading`)
/// elements are in the document.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
