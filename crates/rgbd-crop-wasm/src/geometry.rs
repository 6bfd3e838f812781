//! WASM bindings for the crop rectangle state machine.
//!
//! The shell converts pointer positions from canvas display space to raster
//! pixels before calling in, and redraws whenever a call returns `true`.

use rgbd_crop_core::geometry::{CropGeometry, CropRect, Point, PointerEvent};
use wasm_bindgen::prelude::*;

/// Crop rectangle driven by pointer events.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const geometry = new JsCropGeometry(img.naturalWidth, img.naturalHeight);
/// canvas.onmousedown = (e) => { if (geometry.pointer_down(...toRaster(e))) redraw(); };
/// canvas.onmousemove = (e) => {
///   canvas.style.cursor = geometry.cursor(...toRaster(e));
///   if (geometry.pointer_move(...toRaster(e))) redraw();
/// };
/// canvas.onmouseup = () => geometry.pointer_up();
/// ```
#[wasm_bindgen]
pub struct JsCropGeometry {
    inner: CropGeometry,
}

#[wasm_bindgen]
impl JsCropGeometry {
    /// Create an empty geometry for a raster of the given natural size.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_width: u32, canvas_height: u32) -> JsCropGeometry {
        JsCropGeometry {
            inner: CropGeometry::new(canvas_width, canvas_height),
        }
    }

    /// Press: start moving when inside the rectangle, otherwise start a new
    /// one. Returns whether the rectangle changed.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.inner.handle(PointerEvent::Down(Point::new(x, y)))
    }

    /// Drag. Returns whether the rectangle changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.handle(PointerEvent::Move(Point::new(x, y)))
    }

    /// Release. The rectangle is kept as-is.
    pub fn pointer_up(&mut self) -> bool {
        self.inner.handle(PointerEvent::Up)
    }

    /// Discard the rectangle.
    pub fn reset(&mut self) -> bool {
        self.inner.handle(PointerEvent::Reset)
    }

    /// CSS cursor keyword for the pointer at `(x, y)`.
    pub fn cursor(&self, x: f64, y: f64) -> String {
        self.inner.cursor_hint(Point::new(x, y)).as_css().to_string()
    }

    /// True while a drag is in progress.
    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.mode().is_active()
    }

    #[wasm_bindgen(getter)]
    pub fn has_rect(&self) -> bool {
        self.inner.rect().is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> Option<f64> {
        self.inner.rect().map(|r| r.x)
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> Option<f64> {
        self.inner.rect().map(|r| r.y)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> Option<f64> {
        self.inner.rect().map(|r| r.width)
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> Option<f64> {
        self.inner.rect().map(|r| r.height)
    }
}

impl JsCropGeometry {
    pub(crate) fn rect(&self) -> Option<CropRect> {
        self.inner.rect()
    }
}
