//! WebAssembly entry point and platform-specific code.

use crate::shortcuts::{Action, Modifiers, ShortcutRegistry};
use kurbo::{Affine, BezPath, PathEl};
use peniko::Color;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use steel_core::geometry::{Shadow, TextAlign, WheelFrame};
use steel_core::{
    BoardId, FrameHandle, FrameScheduler, SpinStart, SurfaceError, SurfaceResult, Wheel,
    WheelConfig, WheelSurface,
};
use steel_render::{DrawOp, build_ops, font_css};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

fn css_color(color: Color) -> String {
    let c = color.to_rgba8();
    format!("rgba({}, {}, {}, {:.3})", c.r, c.g, c.b, c.a as f64 / 255.0)
}

fn draw_failed(err: JsValue) -> SurfaceError {
    SurfaceError::DrawFailed(format!("{:?}", err))
}

/// Draws wheel frames onto a `<canvas>` with the 2D context.
pub struct Canvas2dSurface {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    /// Size the canvas to `pixel_size` and grab its 2D context.
    pub fn new(canvas: &HtmlCanvasElement, pixel_size: u32) -> SurfaceResult<Self> {
        canvas.set_width(pixel_size);
        canvas.set_height(pixel_size);
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| SurfaceError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| SurfaceError::Unavailable("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Unavailable("not a 2d context".to_string()))?;
        Ok(Self { ctx })
    }

    fn trace(&self, path: &BezPath) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }

    fn set_transform(&self, transform: Affine) -> SurfaceResult<()> {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        self.ctx.set_transform(a, b, c, d, e, f).map_err(draw_failed)
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &self,
        text: &str,
        transform: Affine,
        anchor: kurbo::Point,
        align: TextAlign,
        font_size: f64,
        bold: bool,
        color: Color,
        shadow: Option<Shadow>,
    ) -> SurfaceResult<()> {
        self.ctx.save();
        self.set_transform(transform)?;
        self.ctx.set_font(&font_css(font_size, bold));
        self.ctx.set_text_align(match align {
            TextAlign::Start => "left",
            TextAlign::Center => "center",
            TextAlign::End => "right",
        });
        self.ctx.set_text_baseline("middle");
        if let Some(shadow) = shadow {
            self.ctx.set_shadow_color(&css_color(shadow.color));
            self.ctx.set_shadow_blur(shadow.blur);
            self.ctx.set_shadow_offset_x(shadow.offset.0);
            self.ctx.set_shadow_offset_y(shadow.offset.1);
        }
        self.ctx.set_fill_style_str(&css_color(color));
        let drawn = self.ctx.fill_text(text, anchor.x, anchor.y).map_err(draw_failed);
        self.ctx.restore();
        drawn
    }
}

impl WheelSurface for Canvas2dSurface {
    fn present(&mut self, frame: &WheelFrame) -> SurfaceResult<()> {
        for op in build_ops(frame) {
            match op {
                DrawOp::Clear { width, height } => {
                    self.set_transform(Affine::IDENTITY)?;
                    self.ctx.clear_rect(0.0, 0.0, width, height);
                }
                DrawOp::Fill { path, color } => {
                    self.trace(&path);
                    self.ctx.set_fill_style_str(&css_color(color));
                    self.ctx.fill();
                }
                DrawOp::Stroke { path, color, width } => {
                    self.trace(&path);
                    self.ctx.set_stroke_style_str(&css_color(color));
                    self.ctx.set_line_width(width);
                    self.ctx.stroke();
                }
                DrawOp::Text {
                    text,
                    transform,
                    anchor,
                    align,
                    font_size,
                    bold,
                    color,
                    shadow,
                } => self.text(&text, transform, anchor, align, font_size, bold, color, shadow)?,
            }
        }
        Ok(())
    }

    fn release(&mut self) {
        if self.set_transform(Affine::IDENTITY).is_ok() {
            if let Some(canvas) = self.ctx.canvas() {
                self.ctx
                    .clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
            }
        }
    }
}

/// `requestAnimationFrame` scheduler.
///
/// Every request reuses one JS callback; the id of the frame in flight is
/// shared with it through `pending`.
pub struct RafScheduler {
    window: Window,
    callback: js_sys::Function,
    pending: Rc<Cell<Option<u64>>>,
}

impl RafScheduler {
    fn new(window: Window, callback: js_sys::Function, pending: Rc<Cell<Option<u64>>>) -> Self {
        Self {
            window,
            callback,
            pending,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn now(&self) -> Duration {
        let ms = self.window.performance().map(|p| p.now()).unwrap_or_default();
        Duration::from_secs_f64(ms / 1000.0)
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        match self.window.request_animation_frame(&self.callback) {
            Ok(id) => {
                self.pending.set(Some(id as u64));
                Some(FrameHandle::new(id as u64))
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending.get() == Some(handle.id()) {
            self.pending.set(None);
        }
        if let Err(e) = self.window.cancel_animation_frame(handle.id() as i32) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

type CanvasWheel = Wheel<Canvas2dSurface, RafScheduler>;
type Results = Rc<RefCell<VecDeque<(String, usize)>>>;

/// Hand queued winners to the JS callback once the wheel is no longer
/// borrowed, so the callback may call back into the wheel.
fn deliver(results: &Results, on_spin_end: &js_sys::Function) {
    loop {
        let Some((label, index)) = results.borrow_mut().pop_front() else {
            break;
        };
        if let Err(e) = on_spin_end.call2(&JsValue::NULL, &JsValue::from_str(&label), &JsValue::from(index as u32)) {
            log::error!("onSpinEnd threw: {:?}", e);
        }
    }
}

/// A wheel on a `<canvas>`, driven by `requestAnimationFrame`.
///
/// `onSpinEnd` runs after every borrow of the wheel is released, so it may
/// call `setNames`, `spin`, `isSpinning` or `destroy` on the same object.
/// The methods take `&self` for that reason. Only `free()` must not be
/// called from inside the callback.
#[wasm_bindgen]
pub struct SteelWheel {
    wheel: Rc<RefCell<Option<CanvasWheel>>>,
    results: Results,
    on_spin_end: js_sys::Function,
    // Kept for the lifetime of the wheel; `destroy` may run inside it.
    _tick: Closure<dyn FnMut(f64)>,
}

#[wasm_bindgen]
impl SteelWheel {
    /// Draw a wheel for `names` on `canvas`, `pixel_size` pixels square.
    ///
    /// `on_spin_end(label, index)` runs once per finished spin.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        names: Vec<String>,
        pixel_size: u32,
        on_spin_end: js_sys::Function,
    ) -> Result<SteelWheel, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let wheel: Rc<RefCell<Option<CanvasWheel>>> = Rc::new(RefCell::new(None));
        let results: Results = Rc::new(RefCell::new(VecDeque::new()));
        let pending = Rc::new(Cell::new(None));

        let tick = {
            let wheel = wheel.clone();
            let results = results.clone();
            let pending = pending.clone();
            let on_spin_end = on_spin_end.clone();
            Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                let Some(id) = pending.take() else {
                    return;
                };
                if let Some(w) = wheel.borrow_mut().as_mut() {
                    if let Err(e) = w.on_frame(FrameHandle::new(id)) {
                        log::error!("Wheel frame failed: {}", e);
                    }
                }
                deliver(&results, &on_spin_end);
            })
        };

        let scheduler = RafScheduler::new(window, tick.as_ref().unchecked_ref::<js_sys::Function>().clone(), pending);
        let surface = Canvas2dSurface::new(&canvas, pixel_size).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let sink = results.clone();
        let created = Wheel::new(
            names,
            WheelConfig::default().with_size(pixel_size),
            surface,
            scheduler,
            move |label, index| sink.borrow_mut().push_back((label.to_string(), index)),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        *wheel.borrow_mut() = Some(created);

        Ok(Self {
            wheel,
            results,
            on_spin_end,
            _tick: tick,
        })
    }

    /// Replace the names. Applied after the current spin, if any.
    #[wasm_bindgen(js_name = setNames)]
    pub fn set_names(&self, names: Vec<String>) -> Result<(), JsValue> {
        if let Some(w) = self.wheel.borrow_mut().as_mut() {
            w.set_roster(names).map_err(|e| JsValue::from_str(&e.to_string()))?;
        }
        Ok(())
    }

    /// Start a spin. Returns whether a pick was made or started.
    pub fn spin(&self) -> bool {
        let started = match self.wheel.borrow_mut().as_mut() {
            Some(w) => w.spin(),
            None => SpinStart::Ignored,
        };
        deliver(&self.results, &self.on_spin_end);
        started != SpinStart::Ignored
    }

    #[wasm_bindgen(js_name = isSpinning)]
    pub fn is_spinning(&self) -> bool {
        self.wheel.borrow().as_ref().is_some_and(|w| w.is_spinning())
    }

    /// Stop animating and release the canvas. No callback fires afterwards.
    pub fn destroy(&self) {
        if let Some(w) = self.wheel.borrow_mut().take() {
            w.destroy();
        }
        self.results.borrow_mut().clear();
    }
}

impl Drop for SteelWheel {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Storage id for the board at `url`.
#[wasm_bindgen(js_name = boardIdFromUrl)]
pub fn board_id_from_url(url: &str) -> Result<String, JsValue> {
    BoardId::from_url(url)
        .map(|id| id.as_str().to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Name of the action bound to a key press, if any.
#[wasm_bindgen(js_name = shortcutAction)]
pub fn shortcut_action(key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> Option<String> {
    let mods = Modifiers { ctrl, alt, shift, meta };
    ShortcutRegistry::action_for(key, mods).map(|action| {
        match action {
            Action::Spin => "spin",
            Action::Close => "close",
            Action::ToggleOverlay => "toggle",
            Action::SaveNames => "save",
        }
        .to_string()
    })
}

/// Initialize logging for the WASM module.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
    }

    log::info!("Starting Steel (WASM)");
    if let Some(location) = web_sys::window().map(|w| w.location()) {
        if let Ok(href) = location.href() {
            match BoardId::from_url(&href) {
                Ok(board) => log::info!("Board from URL: {}", board),
                Err(e) => log::debug!("No board for {}: {}", href, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use js_sys::Reflect;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn canvas() -> HtmlCanvasElement {
        let document = web_sys::window().unwrap().document().unwrap();
        document.create_element("canvas").unwrap().dyn_into().unwrap()
    }

    fn global(name: &str) -> JsValue {
        Reflect::get(&js_sys::global(), &JsValue::from_str(name)).unwrap()
    }

    fn call(target: &JsValue, method: &str) -> JsValue {
        let f: js_sys::Function = Reflect::get(target, &JsValue::from_str(method)).unwrap().unchecked_into();
        f.call0(target).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_set_names_from_spin_callback() {
        let on_end = js_sys::Function::new_with_args(
            "label, index",
            "try { globalThis.__steelWheel.setNames(['Bo', 'Cy']); globalThis.__steelPicked = label; } \
             catch (e) { globalThis.__steelPicked = String(e); }",
        );
        let wheel = SteelWheel::new(canvas(), vec!["Ann".to_string()], 120, on_end).unwrap();
        Reflect::set(&js_sys::global(), &JsValue::from_str("__steelWheel"), &JsValue::from(wheel)).unwrap();

        let handle = global("__steelWheel");
        assert_eq!(call(&handle, "spin"), JsValue::TRUE);
        assert_eq!(global("__steelPicked"), JsValue::from_str("Ann"));
        // The new names are live: a two-name wheel animates instead of resolving.
        assert_eq!(call(&handle, "spin"), JsValue::TRUE);
        assert_eq!(call(&handle, "isSpinning"), JsValue::TRUE);

        call(&handle, "destroy");
        assert_eq!(call(&handle, "isSpinning"), JsValue::FALSE);
    }

    #[wasm_bindgen_test]
    fn test_destroy_from_spin_callback() {
        let on_end = js_sys::Function::new_with_args(
            "label, index",
            "globalThis.__steelDestroyWheel.destroy(); globalThis.__steelDestroyed = true;",
        );
        let wheel = SteelWheel::new(canvas(), vec!["Ann".to_string()], 120, on_end).unwrap();
        Reflect::set(&js_sys::global(), &JsValue::from_str("__steelDestroyWheel"), &JsValue::from(wheel)).unwrap();

        let handle = global("__steelDestroyWheel");
        assert_eq!(call(&handle, "spin"), JsValue::TRUE);
        assert_eq!(global("__steelDestroyed"), JsValue::TRUE);
        assert_eq!(call(&handle, "spin"), JsValue::FALSE);
    }
}
