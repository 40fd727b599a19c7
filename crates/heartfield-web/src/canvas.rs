use glam::Vec2;
use heartfield_platform::{DrawSurface, FillStyle, Result, ViewportSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::dom::element_by_id;
use crate::error::WebError;

/// `<canvas>` with its transparent 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_id(document: &Document, id: &str) -> std::result::Result<Self, WebError> {
        let canvas: HtmlCanvasElement = element_by_id(document, id)?;
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::from_bool(true))?;
        let context = canvas
            .get_context_with_context_options("2d", &options)?
            .ok_or_else(|| WebError::NoContext(format!("#{id}")))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| WebError::WrongType(format!("#{id} context")))?;
        Ok(Self { canvas, context })
    }
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> ViewportSize {
        ViewportSize::new(self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, size: ViewportSize) -> Result<()> {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        Ok(())
    }

    fn clear(&mut self) {
        let size = self.size();
        self.context
            .clear_rect(0.0, 0.0, size.width as f64, size.height as f64);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, point: Vec2) {
        self.context.move_to(point.x as f64, point.y as f64);
    }

    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        self.context.bezier_curve_to(
            control1.x as f64,
            control1.y as f64,
            control2.x as f64,
            control2.y as f64,
            end.x as f64,
            end.y as f64,
        );
    }

    fn fill(&mut self, style: &FillStyle) {
        #[allow(deprecated)]
        self.context
            .set_fill_style(&JsValue::from_str(&style.color.to_css()));
        match style.glow {
            Some(glow) => {
                self.context.set_shadow_color(&glow.color.to_css());
                self.context.set_shadow_blur(glow.blur as f64);
            }
            None => self.context.set_shadow_blur(0.0),
        }
        self.context.fill();
        self.context.set_shadow_blur(0.0);
    }
}
