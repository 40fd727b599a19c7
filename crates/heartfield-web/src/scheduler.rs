use std::cell::RefCell;
use std::rc::Rc;

use heartfield_platform::FrameScheduler;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub type FrameCallback = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` around a single installed callback. Clones share
/// the callback, so the callback can hold one to re-arm itself.
#[derive(Clone)]
pub struct AnimationFrames {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn install(&self, callback: FrameCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            warn!("frame requested before a callback was installed");
            return;
        };
        if let Err(err) = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            warn!("requestAnimationFrame failed: {}", crate::error::describe(&err));
        }
    }
}
