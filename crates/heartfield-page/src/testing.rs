//! Shared fakes for the page tests. Clones share state so a test can keep a
//! handle after boxing one into the page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use heartfield_platform::{
    DrawSurface, FillStyle, ImageElement, MediaPlayback, PageElement, Result, ViewportSize,
    ViewportSource,
};

#[derive(Debug, Default)]
struct ElementState {
    text: String,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    focus_count: u32,
    layout_reads: u32,
    src: String,
    alt: String,
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    state: Rc<RefCell<ElementState>>,
}

impl FakeElement {
    pub fn image(src: &str, alt: &str) -> Self {
        let element = Self::default();
        element.set_image(src, alt);
        element
    }

    fn set_image(&self, src: &str, alt: &str) {
        let mut state = self.state.borrow_mut();
        state.src = src.to_string();
        state.alt = alt.to_string();
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.state.borrow().styles.get(property).cloned()
    }

    pub fn focus_count(&self) -> u32 {
        self.state.borrow().focus_count
    }

    pub fn layout_reads(&self) -> u32 {
        self.state.borrow().layout_reads
    }

    pub fn src(&self) -> String {
        self.state.borrow().src.clone()
    }

    pub fn alt_text(&self) -> String {
        self.state.borrow().alt.clone()
    }
}

impl PageElement for FakeElement {
    fn set_text(&mut self, text: &str) {
        self.state.borrow_mut().text = text.to_string();
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_style(&mut self, property: &str, value: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn focus(&mut self) -> Result<()> {
        self.state.borrow_mut().focus_count += 1;
        Ok(())
    }

    fn force_layout(&self) {
        self.state.borrow_mut().layout_reads += 1;
    }
}

impl ImageElement for FakeElement {
    fn source(&self) -> String {
        self.src()
    }

    fn alt(&self) -> String {
        self.alt_text()
    }

    fn set_source(&mut self, src: &str, alt: &str) {
        self.set_image(src, alt);
    }
}

#[derive(Debug)]
struct MediaState {
    paused: bool,
    refuse: bool,
    volume: f32,
    play_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct FakeMedia {
    state: Rc<RefCell<MediaState>>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(MediaState {
                paused: true,
                refuse: false,
                volume: 1.0,
                play_attempts: 0,
            })),
        }
    }
}

impl FakeMedia {
    pub fn refusing() -> Self {
        let media = Self::default();
        media.state.borrow_mut().refuse = true;
        media
    }

    pub fn paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    pub fn play_attempts(&self) -> u32 {
        self.state.borrow().play_attempts
    }
}

impl MediaPlayback for FakeMedia {
    fn play(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.play_attempts += 1;
        if state.refuse {
            return Err("NotAllowedError: play() requires a user gesture".into());
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.state.borrow_mut().paused = true;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    size: Option<ViewportSize>,
    clears: u32,
    last_frame_fills: u32,
}

/// Counts draw calls; `size` tracks the last resize.
#[derive(Debug, Clone, Default)]
pub struct FakeSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl FakeSurface {
    pub fn current_size(&self) -> Option<ViewportSize> {
        self.state.borrow().size
    }

    pub fn clears(&self) -> u32 {
        self.state.borrow().clears
    }

    pub fn last_frame_fills(&self) -> u32 {
        self.state.borrow().last_frame_fills
    }
}

impl DrawSurface for FakeSurface {
    fn size(&self) -> ViewportSize {
        self.state.borrow().size.unwrap_or(ViewportSize::new(0, 0))
    }

    fn resize(&mut self, size: ViewportSize) -> Result<()> {
        self.state.borrow_mut().size = Some(size);
        Ok(())
    }

    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        state.clears += 1;
        state.last_frame_fills = 0;
    }

    fn begin_path(&mut self) {}

    fn move_to(&mut self, _point: Vec2) {}

    fn bezier_curve_to(&mut self, _control1: Vec2, _control2: Vec2, _end: Vec2) {}

    fn fill(&mut self, _style: &FillStyle) {
        let mut state = self.state.borrow_mut();
        state.last_frame_fills += 1;
    }
}

#[derive(Debug, Clone)]
pub struct FakeViewport {
    size: Rc<RefCell<ViewportSize>>,
}

impl FakeViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Rc::new(RefCell::new(ViewportSize::new(width, height))),
        }
    }

    pub fn set(&self, width: u32, height: u32) {
        *self.size.borrow_mut() = ViewportSize::new(width, height);
    }
}

impl ViewportSource for FakeViewport {
    fn viewport(&self) -> ViewportSize {
        *self.size.borrow()
    }
}
