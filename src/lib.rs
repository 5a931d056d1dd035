mod utils;

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod pointer;
pub mod surface;
pub mod trail;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::animation::FrameLoop;
use crate::config::BackgroundConfig;
use crate::error::BackgroundError;
use crate::field::{FrameStats, ParticleField};
use crate::surface::{CanvasSurface, Surface};
use crate::trail::MouseTrail;
use crate::utils::Timer;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::init_logging(log::Level::Info);
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}

/// Creates a background in the element with id `container_id` and starts
/// animating it straight away.
#[wasm_bindgen]
pub fn start_background(container_id: &str) -> Result<ParticleBackground, JsValue> {
    let mut background = ParticleBackground::new(container_id)?;
    background.start()?;
    Ok(background)
}

// Everything a frame touches. Shared between the frame loop and the DOM
// listeners, all of which run on the page's one thread.
struct Scene {
    field: ParticleField,
    trail: Option<MouseTrail>,
    surface: CanvasSurface,
}

impl Scene {
    fn frame(&mut self) -> FrameStats {
        let _timer = Timer::new("ParticleBackground::frame");
        let stats = self.field.tick(&mut self.surface);
        if let Some(trail) = self.trail.as_mut() {
            trail.tick(&mut self.surface);
        }
        stats
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface.set_size(width, height);
        self.field.resize(width as f64, height as f64);
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        self.field.on_pointer_move(x, y);
        if let Some(trail) = self.trail.as_mut() {
            trail.push(x, y);
        }
    }
}

// A DOM event listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(target: EventTarget, kind: &'static str, callback: Closure<dyn FnMut(Event)>) -> Result<Self, BackgroundError> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Listener { target, kind, callback })
    }

    fn window_resize(window: &Window, scene: Rc<RefCell<Scene>>) -> Result<Self, BackgroundError> {
        let callback = Closure::wrap(Box::new(move |_event: Event| {
            let size = web_sys::window()
                .ok_or(BackgroundError::NoWindow)
                .and_then(|window| viewport_size(&window));
            match size {
                Ok((width, height)) => scene.borrow_mut().resize(width, height),
                Err(e) => log::warn!("resize ignored: {}", e),
            }
        }) as Box<dyn FnMut(Event)>);
        Listener::add(window.clone().into(), "resize", callback)
    }

    fn pointer_move(document: &Document, scene: Rc<RefCell<Scene>>) -> Result<Self, BackgroundError> {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                scene
                    .borrow_mut()
                    .pointer_moved(mouse.client_x() as f64, mouse.client_y() as f64);
            }
        }) as Box<dyn FnMut(Event)>);
        Listener::add(document.clone().into(), "mousemove", callback)
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {:?}", self.kind, e);
        }
    }
}

/// Ambient particle animation behind the page content.
///
/// Mounting appends a fixed, full-viewport canvas to the container and
/// follows window resizes and mouse moves. Call `start` to animate, or
/// `tick` to step single frames. Freeing the value stops the loop, detaches
/// the listeners and removes the canvas.
#[wasm_bindgen]
pub struct ParticleBackground {
    scene: Rc<RefCell<Scene>>,
    frame_loop: Option<FrameLoop>,
    listeners: Vec<Listener>,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl ParticleBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> Result<ParticleBackground, JsValue> {
        let config = BackgroundConfig {
            container_id: container_id.to_owned(),
            ..BackgroundConfig::default()
        };
        ParticleBackground::mount(config).map_err(JsValue::from)
    }

    /// Mounts with a JSON `BackgroundConfig`; omitted keys keep their
    /// defaults.
    pub fn with_config(json: &str) -> Result<ParticleBackground, JsValue> {
        let config = BackgroundConfig::from_json(json)?;
        ParticleBackground::mount(config).map_err(JsValue::from)
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }
        let scene = self.scene.clone();
        let frame_loop = FrameLoop::start(move || {
            scene.borrow_mut().frame();
        })?;
        self.frame_loop = Some(frame_loop);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.as_ref().map_or(false, FrameLoop::is_running)
    }

    /// Steps a single frame outside the loop. Returns the number of
    /// connection lines drawn.
    pub fn tick(&mut self) -> usize {
        self.scene.borrow_mut().frame().links
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.borrow_mut().resize(width, height);
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.scene.borrow_mut().pointer_moved(x, y);
    }

    pub fn particle_count(&self) -> usize {
        self.scene.borrow().field.len()
    }

    pub fn width(&self) -> f64 {
        self.scene.borrow().field.width()
    }

    pub fn height(&self) -> f64 {
        self.scene.borrow().field.height()
    }
}

impl ParticleBackground {
    pub fn mount(config: BackgroundConfig) -> Result<ParticleBackground, BackgroundError> {
        let window = web_sys::window().ok_or(BackgroundError::NoWindow)?;
        let document = window.document().ok_or(BackgroundError::NoDocument)?;
        let container = document
            .get_element_by_id(&config.container_id)
            .ok_or_else(|| BackgroundError::MissingContainer(config.container_id.clone()))?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BackgroundError::Dom("created element is not a canvas".to_owned()))?;
        style_as_backdrop(&canvas)?;
        container.append_child(&canvas)?;

        let (width, height) = viewport_size(&window)?;
        let mut surface = CanvasSurface::new(canvas.clone())?;
        surface.set_size(width, height);

        let field = ParticleField::new(width as f64, height as f64, config.field);
        let trail = if config.mouse_trail {
            Some(MouseTrail::new(config.trail))
        } else {
            None
        };
        let scene = Rc::new(RefCell::new(Scene { field, trail, surface }));

        let listeners = vec![
            Listener::window_resize(&window, scene.clone())?,
            Listener::pointer_move(&document, scene.clone())?,
        ];

        Ok(ParticleBackground {
            scene,
            frame_loop: None,
            listeners,
            canvas,
        })
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
        self.listeners.clear();
        self.canvas.remove();
    }
}

fn style_as_backdrop(canvas: &HtmlCanvasElement) -> Result<(), BackgroundError> {
    let style = canvas.style();
    for (property, value) in &[
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("z-index", "-1"),
        ("pointer-events", "none"),
    ] {
        style.set_property(property, value)?;
    }
    Ok(())
}

fn viewport_size(window: &Window) -> Result<(u32, u32), BackgroundError> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width.max(0.0) as u32, height.max(0.0) as u32))
}
