//! Full-screen image viewer state: wheel zoom, drag-to-pan, keyboard
//! navigation and the navigator inset.
//!
//! The site ships no wasm, so `Lightbox` is the reference model for the
//! modal in `assets/viewer.js` and is exercised by its tests only. The
//! constants below are rendered into the modal's `data-*` attributes and
//! are the one part the browser reads directly; any rule change here has
//! to be mirrored in the JS.

use serde::Serialize;

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 5.0;
pub const ZOOM_STEP: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visible crop as fractions of the full image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavigatorRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    ZoomIn,
    ZoomOut,
    Other,
}

impl Key {
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            "+" | "=" => Key::ZoomIn,
            "-" | "_" => Key::ZoomOut,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct View {
    index: usize,
    scale: f64,
    pan_x: f64,
    pan_y: f64,
}

impl View {
    fn at(index: usize) -> Self {
        Self {
            index,
            scale: MIN_SCALE,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lightbox {
    len: usize,
    viewport: Size,
    // 縮放為 1 時圖片的顯示尺寸
    image: Size,
    view: Option<View>,
}

impl Lightbox {
    pub fn new(len: usize, viewport: Size) -> Self {
        Self {
            len,
            viewport,
            image: viewport,
            view: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.view.map(|v| v.index)
    }

    pub fn scale(&self) -> f64 {
        self.view.map(|v| v.scale).unwrap_or(MIN_SCALE)
    }

    pub fn pan(&self) -> (f64, f64) {
        self.view.map(|v| (v.pan_x, v.pan_y)).unwrap_or((0.0, 0.0))
    }

    pub fn set_image_size(&mut self, image: Size) {
        self.image = image;
        self.clamp_pan();
    }

    pub fn open(&mut self, index: usize) {
        if self.len == 0 {
            return;
        }
        self.view = Some(View::at(index.min(self.len - 1)));
    }

    pub fn close(&mut self) {
        self.view = None;
    }

    pub fn can_prev(&self) -> bool {
        self.view.is_some_and(|v| v.index > 0)
    }

    pub fn can_next(&self) -> bool {
        self.view.is_some_and(|v| v.index + 1 < self.len)
    }

    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        if let Some(v) = self.view {
            self.view = Some(View::at(v.index + 1));
        }
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        if let Some(v) = self.view {
            self.view = Some(View::at(v.index - 1));
        }
        true
    }

    /// Wheel zoom around `focus` (offset from the viewport centre, in pixels).
    /// Negative deltas zoom in, one step per notch.
    pub fn zoom(&mut self, wheel_delta: f64, focus: (f64, f64)) {
        let Some(mut v) = self.view else {
            return;
        };
        if wheel_delta == 0.0 {
            return;
        }
        let factor = if wheel_delta < 0.0 {
            ZOOM_STEP
        } else {
            1.0 / ZOOM_STEP
        };
        let scale = (v.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = scale / v.scale;
        v.pan_x = focus.0 - (focus.0 - v.pan_x) * ratio;
        v.pan_y = focus.1 - (focus.1 - v.pan_y) * ratio;
        v.scale = scale;
        if scale <= MIN_SCALE {
            v.pan_x = 0.0;
            v.pan_y = 0.0;
        }
        self.view = Some(v);
        self.clamp_pan();
    }

    /// 只有放大時才能拖曳
    pub fn drag(&mut self, dx: f64, dy: f64) {
        let Some(mut v) = self.view else {
            return;
        };
        if v.scale <= MIN_SCALE {
            return;
        }
        v.pan_x += dx;
        v.pan_y += dy;
        self.view = Some(v);
        self.clamp_pan();
    }

    pub fn key(&mut self, key: Key) {
        if !self.is_open() {
            return;
        }
        match key {
            Key::ArrowLeft => {
                self.prev();
            }
            Key::ArrowRight => {
                self.next();
            }
            Key::Escape => self.close(),
            Key::ZoomIn => self.zoom(-1.0, (0.0, 0.0)),
            Key::ZoomOut => self.zoom(1.0, (0.0, 0.0)),
            Key::Other => {}
        }
    }

    fn max_pan(&self, scale: f64) -> (f64, f64) {
        (
            ((self.image.width * scale - self.viewport.width) / 2.0).max(0.0),
            ((self.image.height * scale - self.viewport.height) / 2.0).max(0.0),
        )
    }

    fn clamp_pan(&mut self) {
        let Some(mut v) = self.view else {
            return;
        };
        let (mx, my) = self.max_pan(v.scale);
        v.pan_x = v.pan_x.clamp(-mx, mx);
        v.pan_y = v.pan_y.clamp(-my, my);
        self.view = Some(v);
    }

    pub fn navigator(&self) -> Option<NavigatorRect> {
        let v = self.view?;
        let full_w = self.image.width * v.scale;
        let full_h = self.image.height * v.scale;
        if full_w <= 0.0 || full_h <= 0.0 {
            return None;
        }
        let w = (self.viewport.width / full_w).min(1.0);
        let h = (self.viewport.height / full_h).min(1.0);
        let cx = 0.5 - v.pan_x / full_w;
        let cy = 0.5 - v.pan_y / full_h;
        Some(NavigatorRect {
            x: (cx - w / 2.0).clamp(0.0, 1.0 - w),
            y: (cy - h / 2.0).clamp(0.0, 1.0 - h),
            w,
            h,
        })
    }
}
