use heartfield_platform::{ImageElement, PageElement};
use tracing::{debug, info, warn};

use crate::cube::MemoryCube;

/// Full-size viewer for the cube's face images.
pub struct Lightbox {
    container: Box<dyn PageElement>,
    image: Box<dyn ImageElement>,
    open: bool,
}

impl Lightbox {
    pub fn new(container: Box<dyn PageElement>, image: Box<dyn ImageElement>) -> Self {
        Self {
            container,
            image,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, face: &dyn ImageElement, cube: &mut MemoryCube) {
        let src = face.source();
        self.image.set_source(&src, &face.alt());
        self.set_display("flex");
        self.open = true;
        cube.keep_running();
        if let Err(err) = self.container.focus() {
            warn!("failed to focus lightbox: {err}");
        }
        info!("lightbox opened: {src}");
    }

    pub fn close(&mut self, cube: &mut MemoryCube) {
        if !self.open {
            debug!("lightbox already closed");
            return;
        }
        self.set_display("none");
        self.open = false;
        cube.keep_running();
        cube.focus();
        info!("lightbox closed");
    }

    fn set_display(&mut self, value: &str) {
        if let Err(err) = self.container.set_style("display", value) {
            warn!("failed to set lightbox display: {err}");
        }
    }
}
