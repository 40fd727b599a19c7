//! Platform abstraction traits so `heartfield-core` stays host-agnostic.
//!
//! The browser binding and the headless runner each implement these; the
//! simulator and the page controllers only ever talk to the traits.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 8-bit colour channels with a floating point alpha, as CSS writes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Soft shadow drawn around a filled path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Rgba,
    pub glow: Option<Glow>,
}

/// 2D drawing surface with path construction and filled output.
pub trait DrawSurface {
    fn size(&self) -> ViewportSize;
    fn resize(&mut self, size: ViewportSize) -> Result<()>;
    fn clear(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, end: Vec2);
    /// Fills the current path. The glow, if any, applies to this fill only.
    fn fill(&mut self, style: &FillStyle);
}

/// "Call me once before the next repaint." The host later invokes the frame
/// callback with a monotonically increasing timestamp in milliseconds.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Current size of the visible area.
pub trait ViewportSource {
    fn viewport(&self) -> ViewportSize;
}

/// Background audio. `play` may be refused by the host; callers treat that
/// as a warning, never as fatal.
pub trait MediaPlayback {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn is_paused(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}

/// The handful of element operations the page controllers need.
pub trait PageElement {
    fn set_text(&mut self, text: &str);
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()>;
    fn set_style(&mut self, property: &str, value: &str) -> Result<()>;
    fn focus(&mut self) -> Result<()>;
    /// Reads a layout property so the host flushes pending style changes.
    fn force_layout(&self) {}
}

pub trait ImageElement: PageElement {
    fn source(&self) -> String;
    fn alt(&self) -> String;
    fn set_source(&mut self, src: &str, alt: &str);
}

/// Headless scheduler: every granted frame is `interval_ms` after the last.
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    interval_ms: f64,
    now_ms: f64,
    pending: bool,
    frames: u64,
}

impl FixedStepScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.001),
            now_ms: 0.0,
            pending: false,
            frames: 0,
        }
    }

    /// Timestamp for the next frame, or `None` when nobody asked for one.
    pub fn next_frame(&mut self) -> Option<f64> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.now_ms += self.interval_ms;
        self.frames += 1;
        trace!("fixed step frame {} at {:.1} ms", self.frames, self.now_ms);
        Some(self.now_ms)
    }

    pub fn frames_granted(&self) -> u64 {
        self.frames
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
    }
}
