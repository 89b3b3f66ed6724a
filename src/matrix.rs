use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

pub const CANVAS_ID: &str = "matrix-bg";
const GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()_+-=[]{}|;:,.<>?アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン";
const GLYPH_SIZE: f64 = 14.0;
/// A drop past the bottom edge restarts only when a roll beats this.
const RESET_GATE: f64 = 0.975;
#[cfg(target_arch = "wasm32")]
const TICK_MS: u32 = 60;
#[cfg(target_arch = "wasm32")]
const TRAIL_FILL: &str = "rgba(0, 0, 0, 0.05)";
#[cfg(target_arch = "wasm32")]
const GLYPH_FILL: &str = "#0F0";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Column state for the falling-glyph background.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixRain {
    glyphs: Vec<char>,
    drops: Vec<f64>,
    size: CanvasSize,
}

impl MatrixRain {
    pub fn new(size: CanvasSize) -> Self {
        let columns = (size.width / GLYPH_SIZE).floor().max(0.0) as usize;
        Self {
            glyphs: GLYPHS.chars().collect(),
            drops: vec![1.0; columns],
            size,
        }
    }

    pub fn column_count(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[f64] {
        &self.drops
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Only the surface changes; the column count stays as allocated.
    pub fn resize(&mut self, size: CanvasSize) {
        self.size = size;
    }

    /// Advances every column once, handing each glyph and its pixel position to `draw`.
    pub fn tick(&mut self, random: &mut impl FnMut() -> f64, mut draw: impl FnMut(char, f64, f64)) {
        let last = self.glyphs.len().saturating_sub(1);
        for (column, drop) in self.drops.iter_mut().enumerate() {
            let index = ((random() * self.glyphs.len() as f64).floor() as usize).min(last);
            if let Some(glyph) = self.glyphs.get(index) {
                draw(*glyph, column as f64 * GLYPH_SIZE, *drop * GLYPH_SIZE);
            }
            if *drop * GLYPH_SIZE > self.size.height && random() > RESET_GATE {
                *drop = 0.0;
            }
            *drop += 1.0;
        }
    }
}

#[cfg(target_arch = "wasm32")]
struct ResizeListener {
    closure: Rc<wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>>,
}

#[cfg(target_arch = "wasm32")]
fn viewport_size(window: &web_sys::Window) -> CanvasSize {
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
    };
    CanvasSize {
        width: read(window.inner_width()),
        height: read(window.inner_height()),
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_size(canvas: &web_sys::HtmlCanvasElement, size: CanvasSize) {
    canvas.set_width(size.width as u32);
    canvas.set_height(size.height as u32);
}

#[component]
pub fn MatrixBackground() -> Element {
    #[cfg(target_arch = "wasm32")]
    let mut interval = use_signal(|| None::<gloo_timers::callback::Interval>);
    #[cfg(target_arch = "wasm32")]
    let mut listener = use_signal(|| None::<ResizeListener>);

    #[cfg(target_arch = "wasm32")]
    {
        use_effect(move || {
            use wasm_bindgen::closure::Closure;

            if interval.read().is_some() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(canvas) = window
                .document()
                .and_then(|document| document.get_element_by_id(CANVAS_ID))
                .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            else {
                tracing::warn!("matrix: #{CANVAS_ID} canvas missing");
                return;
            };
            let Some(context) = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|context| context.dyn_into::<web_sys::CanvasRenderingContext2d>().ok())
            else {
                tracing::warn!("matrix: 2d context unavailable");
                return;
            };

            let size = viewport_size(&window);
            apply_size(&canvas, size);
            let rain = Rc::new(RefCell::new(MatrixRain::new(size)));
            tracing::debug!("matrix: start with {} columns", rain.borrow().column_count());

            let resize_rain = rain.clone();
            let resize_canvas = canvas.clone();
            let closure = Rc::new(Closure::wrap(Box::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let size = viewport_size(&window);
                apply_size(&resize_canvas, size);
                resize_rain.borrow_mut().resize(size);
            }) as Box<dyn FnMut(_)>));
            let _ = window.add_event_listener_with_callback(
                "resize",
                closure.as_ref().as_ref().unchecked_ref(),
            );
            listener.set(Some(ResizeListener { closure }));

            let font = format!("{GLYPH_SIZE}px monospace");
            let handle = gloo_timers::callback::Interval::new(TICK_MS, move || {
                let mut rain = rain.borrow_mut();
                let size = rain.size();
                context.set_fill_style_str(TRAIL_FILL);
                context.fill_rect(0.0, 0.0, size.width, size.height);
                context.set_fill_style_str(GLYPH_FILL);
                context.set_font(&font);
                let mut buffer = [0u8; 4];
                rain.tick(&mut js_sys::Math::random, |glyph, x, y| {
                    let _ = context.fill_text(glyph.encode_utf8(&mut buffer), x, y);
                });
            });
            interval.set(Some(handle));
        });

        use_drop(move || {
            if let Some(listener) = listener.read().as_ref() {
                if let Some(window) = web_sys::window() {
                    let _ = window.remove_event_listener_with_callback(
                        "resize",
                        listener.closure.as_ref().as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    rsx! {
        canvas { id: CANVAS_ID, class: "matrix-bg", aria_hidden: "true" }
    }
}
