use heartfield_platform::{ImageElement, MediaPlayback, PageElement, Result, ViewportSize, ViewportSource};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlAudioElement, HtmlElement, HtmlImageElement, Window};

use crate::error::{describe, js_error, WebError};

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> std::result::Result<T, WebError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WebError::MissingElement(format!("#{id}")))?
        .dyn_into::<T>()
        .map_err(|_| WebError::WrongType(format!("#{id}")))
}

pub fn query<T: JsCast>(document: &Document, selector: &str) -> std::result::Result<T, WebError> {
    document
        .query_selector(selector)?
        .ok_or_else(|| WebError::MissingElement(selector.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| WebError::WrongType(selector.to_string()))
}

pub fn query_all<T: JsCast>(
    document: &Document,
    selector: &str,
) -> std::result::Result<Vec<T>, WebError> {
    let nodes = document.query_selector_all(selector)?;
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .map(|node| {
            node.dyn_into::<T>()
                .map_err(|_| WebError::WrongType(selector.to_string()))
        })
        .collect()
}

/// Any HTML element, images included.
pub struct DomElement<E = HtmlElement> {
    element: E,
}

pub type DomImage = DomElement<HtmlImageElement>;

impl<E> DomElement<E> {
    pub fn new(element: E) -> Self {
        Self { element }
    }
}

impl<E: AsRef<HtmlElement>> PageElement for DomElement<E> {
    fn set_text(&mut self, text: &str) {
        self.element.as_ref().set_text_content(Some(text));
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.element
            .as_ref()
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn set_style(&mut self, property: &str, value: &str) -> Result<()> {
        self.element
            .as_ref()
            .style()
            .set_property(property, value)
            .map_err(js_error)
    }

    fn focus(&mut self) -> Result<()> {
        self.element.as_ref().focus().map_err(js_error)
    }

    fn force_layout(&self) {
        let _ = self.element.as_ref().offset_width();
    }
}

impl ImageElement for DomImage {
    fn source(&self) -> String {
        self.element.src()
    }

    fn alt(&self) -> String {
        self.element.alt()
    }

    fn set_source(&mut self, src: &str, alt: &str) {
        self.element.set_src(src);
        self.element.set_alt(alt);
    }
}

/// `<audio>` element. A refused `play()` rejects its promise later; that is
/// logged and otherwise ignored. One rejection handler serves every `play()`.
pub struct DomAudio {
    audio: HtmlAudioElement,
    on_refused: Closure<dyn FnMut(JsValue)>,
}

impl DomAudio {
    pub fn new(audio: HtmlAudioElement) -> Self {
        let on_refused = Closure::<dyn FnMut(JsValue)>::new(|err: JsValue| {
            warn!("playback refused: {}", describe(&err));
        });
        Self { audio, on_refused }
    }
}

impl MediaPlayback for DomAudio {
    fn play(&mut self) -> Result<()> {
        let promise = self.audio.play().map_err(js_error)?;
        let _ = promise.catch(&self.on_refused);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.audio.pause().map_err(js_error)
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume as f64);
    }
}

/// `innerWidth` x `innerHeight`, read fresh on every call.
pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl ViewportSource for WindowViewport {
    fn viewport(&self) -> ViewportSize {
        let read = |value: std::result::Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
        };
        ViewportSize::new(read(self.window.inner_width()), read(self.window.inner_height()))
    }
}
