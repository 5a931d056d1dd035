// Drawing surface the field renders into. The page owns the canvas; the field
// only borrows a Surface for the length of a frame, which keeps the physics
// testable against a recording surface on the host.

use vecmath::Vector2;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::BackgroundError;

pub trait Surface {
    /// Resizes the backing store; the previous contents are lost.
    fn set_size(&mut self, width: u32, height: u32);

    fn clear(&mut self, width: f64, height: f64);

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, alpha: f64, fill: &str);

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, alpha: f64, stroke: &str, width: f64);
}

pub struct CanvasSurface {
    pub canvas: HtmlCanvasElement,
    pub context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    // Grabs the 2d context of a canvas that already exists on the page
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, BackgroundError> {
        let context = canvas
            .get_context("2d")?
            .ok_or(BackgroundError::NoContext2d)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackgroundError::NoContext2d)?;
        Ok(CanvasSurface { canvas, context })
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

impl Surface for CanvasSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, alpha: f64, fill: &str) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_fill_style(&JsValue::from_str(fill));
        ctx.begin_path();
        if let Err(e) = ctx.arc(center[0], center[1], radius, 0.0, std::f64::consts::PI * 2.0) {
            log::debug!("arc rejected at {:?} r={}: {:?}", center, radius, e);
        }
        ctx.fill();
        ctx.restore();
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, alpha: f64, stroke: &str, width: f64) {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_stroke_style(&JsValue::from_str(stroke));
        ctx.set_line_width(width);
        ctx.begin_path();
        ctx.move_to(from[0], from[1]);
        ctx.line_to(to[0], to[1]);
        ctx.stroke();
        ctx.restore();
    }
}
