use crossbeam_channel::{Receiver, Sender};
use heartfield_core::{FieldConfig, ParticleField, RandomSource};
use heartfield_platform::{
    DrawSurface, FrameScheduler, ImageElement, MediaPlayback, PageElement, Result,
    ViewportSource,
};
use tracing::{debug, info, warn};

use crate::audio::AudioToggle;
use crate::config::PageConfig;
use crate::cube::MemoryCube;
use crate::events::{Key, PageEvent};
use crate::lightbox::Lightbox;

/// Host objects the page is built from.
pub struct PageParts {
    pub surface: Box<dyn DrawSurface>,
    pub viewport: Box<dyn ViewportSource>,
    pub media: Box<dyn MediaPlayback>,
    pub audio_button: Box<dyn PageElement>,
    /// Slider position when the page loads.
    pub initial_volume: f32,
    pub cube_large: Box<dyn PageElement>,
    pub cube_small: Box<dyn PageElement>,
    pub faces: Vec<Box<dyn ImageElement>>,
    pub lightbox: Box<dyn PageElement>,
    pub lightbox_image: Box<dyn ImageElement>,
}

/// Cloneable entry point for event producers.
#[derive(Clone)]
pub struct PageHandles {
    pub event_sender: Sender<PageEvent>,
}

pub struct Page {
    field: ParticleField,
    rng: Box<dyn RandomSource>,
    surface: Box<dyn DrawSurface>,
    viewport: Box<dyn ViewportSource>,
    audio: AudioToggle,
    initial_volume: f32,
    cube: MemoryCube,
    faces: Vec<Box<dyn ImageElement>>,
    lightbox: Lightbox,
    event_sender: Sender<PageEvent>,
    event_receiver: Receiver<PageEvent>,
}

impl Page {
    /// Sizes the surface to the viewport and picks the particle profile.
    /// Fails only when the surface cannot be sized.
    pub fn new(
        field_config: FieldConfig,
        page_config: &PageConfig,
        parts: PageParts,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let PageParts {
            mut surface,
            viewport,
            media,
            audio_button,
            initial_volume,
            cube_large,
            cube_small,
            faces,
            lightbox,
            lightbox_image,
        } = parts;

        let size = viewport.viewport();
        surface.resize(size)?;
        let field = ParticleField::new(field_config, size);
        let (event_sender, event_receiver) = crossbeam_channel::unbounded::<PageEvent>();

        Ok(Self {
            field,
            rng,
            surface,
            viewport,
            audio: AudioToggle::new(media, audio_button),
            initial_volume,
            cube: MemoryCube::new(cube_large, cube_small, page_config),
            faces,
            lightbox: Lightbox::new(lightbox, lightbox_image),
            event_sender,
            event_receiver,
        })
    }

    pub fn handles(&self) -> PageHandles {
        PageHandles {
            event_sender: self.event_sender.clone(),
        }
    }

    /// Starts audio, marks the cube running and asks for the first frame.
    pub fn start(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) {
        info!(
            "page starting: {} faces, {} profile",
            self.faces.len(),
            self.field.profile_kind().as_str()
        );
        self.audio.setup(self.initial_volume);
        self.cube.mark_running(now);
        scheduler.request_frame();
    }

    /// One animation-frame callback: apply queued events, then tick the field.
    pub fn frame(&mut self, timestamp: f64, scheduler: &mut dyn FrameScheduler) {
        self.pump_events(timestamp);
        self.field.tick(
            timestamp,
            self.surface.as_mut(),
            self.rng.as_mut(),
            scheduler,
        );
    }

    /// Applies every queued event; returns how many there were.
    pub fn pump_events(&mut self, now: f64) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle(event, now);
            handled += 1;
        }
        handled
    }

    pub fn handle(&mut self, event: PageEvent, now: f64) {
        debug!("page event: {event:?}");
        match event {
            PageEvent::Resize => self.resize(),
            PageEvent::AudioToggleClicked => self.audio.toggle(),
            PageEvent::VolumeInput(volume) => self.audio.set_volume(volume),
            PageEvent::CubeClicked => self.cube.toggle(now),
            PageEvent::CubeKey(key) if key.activates() => self.cube.toggle(now),
            PageEvent::CubeTouchStart(point) => self.cube.touch_start(point),
            PageEvent::CubeTouchEnd(point) => {
                self.cube.touch_end(point, now);
            }
            PageEvent::FaceClicked(index) => self.open_face(index),
            PageEvent::FaceKey(index, key) if key.activates() => self.open_face(index),
            PageEvent::LightboxCloseClicked | PageEvent::LightboxKey(Key::Escape) => {
                self.lightbox.close(&mut self.cube)
            }
            PageEvent::CubeKey(_) | PageEvent::FaceKey(..) | PageEvent::LightboxKey(_) => {}
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn cube(&self) -> &MemoryCube {
        &self.cube
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn audio(&self) -> &AudioToggle {
        &self.audio
    }

    fn resize(&mut self) {
        let size = self.viewport.viewport();
        match self.surface.resize(size) {
            Ok(()) => info!("surface resized to {}x{}", size.width, size.height),
            Err(err) => warn!("failed to resize surface to {}x{}: {err}", size.width, size.height),
        }
    }

    fn open_face(&mut self, index: usize) {
        match self.faces.get(index) {
            Some(face) => self.lightbox.open(face.as_ref(), &mut self.cube),
            None => warn!("no cube face at index {index}"),
        }
    }
}
