//! Browser binding: web-sys implementations of the platform traits and the
//! wasm entry point that wires DOM events and animation frames to the page.

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::Sender;
use glam::Vec2;
use heartfield_core::{FieldConfig, SeededRandom};
use heartfield_page::{Key, Page, PageConfig, PageEvent, PageParts};
use heartfield_platform::ImageElement;
use tracing::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Event, EventTarget, HtmlAudioElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    KeyboardEvent, Touch, TouchEvent, Window,
};

pub mod canvas;
pub mod dom;
mod error;
pub mod logging;
pub mod scheduler;

pub use canvas::CanvasSurface;
pub use dom::{DomAudio, DomElement, DomImage, WindowViewport};
pub use error::WebError;
pub use scheduler::AnimationFrames;

use crate::dom::{element_by_id, query, query_all};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init();
    run().map_err(|err| {
        warn!("heartfield failed to start: {err}");
        JsValue::from_str(&err.to_string())
    })
}

/// Looks up every element the page needs, then starts the frame loop. Any
/// missing element aborts before the first frame.
pub fn run() -> Result<(), WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    let surface = CanvasSurface::from_id(&document, "heartsCanvas")?;
    let audio: HtmlAudioElement = element_by_id(&document, "player")?;
    let toggle: HtmlElement = element_by_id(&document, "toggleAudio")?;
    let slider: HtmlInputElement = element_by_id(&document, "volumeSlider")?;
    let cube_large: HtmlElement = query(&document, ".cubo-grande")?;
    let cube_small: HtmlElement = query(&document, ".cubo-pequeno")?;
    let close: HtmlElement = query(&document, ".close-lightbox")?;
    let lightbox: HtmlElement = element_by_id(&document, "lightbox")?;
    let lightbox_image: HtmlImageElement = element_by_id(&document, "lightbox-img")?;
    let faces: Vec<HtmlImageElement> = query_all(&document, ".cara img")?;

    let parts = PageParts {
        surface: Box::new(surface),
        viewport: Box::new(WindowViewport::new(window.clone())),
        media: Box::new(DomAudio::new(audio)),
        audio_button: Box::new(DomElement::new(toggle.clone())),
        initial_volume: slider_volume(&slider),
        cube_large: Box::new(DomElement::new(cube_large.clone())),
        cube_small: Box::new(DomElement::new(cube_small)),
        faces: faces
            .iter()
            .cloned()
            .map(|face| Box::new(DomImage::new(face)) as Box<dyn ImageElement>)
            .collect(),
        lightbox: Box::new(DomElement::new(lightbox.clone())),
        lightbox_image: Box::new(DomImage::new(lightbox_image)),
    };
    let seed = js_sys::Date::now() as u64;
    let page = Page::new(
        FieldConfig::default(),
        &PageConfig::default(),
        parts,
        Box::new(SeededRandom::new(seed)),
    )
    .map_err(|err| WebError::Setup(err.to_string()))?;
    let sender = page.handles().event_sender;

    listen(&window, "resize", post(&sender, |_| Some(PageEvent::Resize)))?;
    listen(&toggle, "click", post(&sender, |_| Some(PageEvent::AudioToggleClicked)))?;
    {
        let slider_input = slider.clone();
        listen(
            &slider,
            "input",
            post(&sender, move |_| {
                Some(PageEvent::VolumeInput(slider_volume(&slider_input)))
            }),
        )?;
    }
    listen(&cube_large, "click", post(&sender, |_| Some(PageEvent::CubeClicked)))?;
    listen(
        &cube_large,
        "keydown",
        post(&sender, |event| activation_key(event).map(PageEvent::CubeKey)),
    )?;
    listen(
        &cube_large,
        "touchstart",
        post(&sender, |event| {
            let touch = event.dyn_ref::<TouchEvent>()?.touches().item(0)?;
            Some(PageEvent::CubeTouchStart(touch_point(&touch)))
        }),
    )?;
    listen(
        &cube_large,
        "touchend",
        post(&sender, |event| {
            let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().item(0)?;
            Some(PageEvent::CubeTouchEnd(touch_point(&touch)))
        }),
    )?;
    for (index, face) in faces.iter().enumerate() {
        listen(face, "click", post(&sender, move |_| Some(PageEvent::FaceClicked(index))))?;
        listen(
            face,
            "keydown",
            post(&sender, move |event| {
                activation_key(event).map(|key| PageEvent::FaceKey(index, key))
            }),
        )?;
    }
    listen(&close, "click", post(&sender, |_| Some(PageEvent::LightboxCloseClicked)))?;
    listen(
        &lightbox,
        "keydown",
        post(&sender, |event| {
            let key = event.dyn_ref::<KeyboardEvent>()?.key();
            Some(PageEvent::LightboxKey(Key::from_dom(&key)))
        }),
    )?;

    let page = Rc::new(RefCell::new(page));
    let mut frames = AnimationFrames::new(window.clone());
    let loop_page = Rc::clone(&page);
    let mut loop_frames = frames.clone();
    frames.install(Closure::new(move |timestamp: f64| {
        loop_page.borrow_mut().frame(timestamp, &mut loop_frames);
    }));
    page.borrow_mut().start(now(&window), &mut frames);
    info!("heartfield running with {} faces", faces.len());
    Ok(())
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), WebError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Turns a DOM event into a queued page event, if `translate` yields one.
fn post(
    sender: &Sender<PageEvent>,
    mut translate: impl FnMut(&Event) -> Option<PageEvent> + 'static,
) -> impl FnMut(Event) + 'static {
    let sender = sender.clone();
    move |event: Event| {
        if let Some(page_event) = translate(&event) {
            if sender.send(page_event).is_err() {
                warn!("page event queue closed");
            }
        }
    }
}

/// Keyboard key for an element that treats Enter/Space as a click; those
/// keys have their default action suppressed.
fn activation_key(event: &Event) -> Option<Key> {
    let key = Key::from_dom(&event.dyn_ref::<KeyboardEvent>()?.key());
    if !key.activates() {
        return None;
    }
    event.prevent_default();
    Some(key)
}

fn touch_point(touch: &Touch) -> Vec2 {
    Vec2::new(touch.client_x() as f32, touch.client_y() as f32)
}

fn slider_volume(slider: &HtmlInputElement) -> f32 {
    slider.value().parse::<f32>().unwrap_or(1.0)
}

fn now(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}
