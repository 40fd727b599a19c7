use std::cell::Cell;
use std::rc::Rc;

use heartfield_platform::{
    ImageElement, MediaPlayback, PageElement, Result, ViewportSize, ViewportSource,
};
use tracing::{debug, info};

/// Element stand-in that only logs what the page does to it.
pub struct LogElement {
    name: String,
    src: String,
    alt: String,
}

impl LogElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: String::new(),
            alt: String::new(),
        }
    }

    pub fn image(name: impl Into<String>, src: &str, alt: &str) -> Self {
        Self {
            src: src.to_string(),
            alt: alt.to_string(),
            ..Self::new(name)
        }
    }
}

impl PageElement for LogElement {
    fn set_text(&mut self, text: &str) {
        info!("{}: text = {text}", self.name);
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        info!("{}: {name} = {value:?}", self.name);
        Ok(())
    }

    fn set_style(&mut self, property: &str, value: &str) -> Result<()> {
        info!("{}: style {property} = {value}", self.name);
        Ok(())
    }

    fn focus(&mut self) -> Result<()> {
        info!("{}: focused", self.name);
        Ok(())
    }

    fn force_layout(&self) {
        debug!("{}: layout flushed", self.name);
    }
}

impl ImageElement for LogElement {
    fn source(&self) -> String {
        self.src.clone()
    }

    fn alt(&self) -> String {
        self.alt.clone()
    }

    fn set_source(&mut self, src: &str, alt: &str) {
        info!("{}: showing {src} ({alt})", self.name);
        self.src = src.to_string();
        self.alt = alt.to_string();
    }
}

/// Player with no audio device behind it. Playback always starts.
pub struct SilentMedia {
    paused: bool,
    volume: f32,
}

impl SilentMedia {
    pub fn new() -> Self {
        Self {
            paused: true,
            volume: 1.0,
        }
    }
}

impl MediaPlayback for SilentMedia {
    fn play(&mut self) -> Result<()> {
        self.paused = false;
        info!("audio: playing at volume {:.2}", self.volume);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.paused = true;
        info!("audio: paused");
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

/// Viewport the run script can change between frames.
#[derive(Clone)]
pub struct SharedViewport {
    size: Rc<Cell<ViewportSize>>,
}

impl SharedViewport {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    pub fn set(&self, size: ViewportSize) {
        self.size.set(size);
    }
}

impl ViewportSource for SharedViewport {
    fn viewport(&self) -> ViewportSize {
        self.size.get()
    }
}
