use heartfield_page::{Key, PageEvent, PageHandles};
use heartfield_platform::ViewportSize;
use tracing::warn;

use crate::headless::SharedViewport;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Event(PageEvent),
    /// Changes the shared viewport, then queues `PageEvent::Resize`.
    Resize(ViewportSize),
}

/// Page interactions keyed by the frame before which they are queued.
#[derive(Debug, Clone, Default)]
pub struct RunScript {
    steps: Vec<(u64, ScriptStep)>,
    next: usize,
}

impl RunScript {
    pub fn new(mut steps: Vec<(u64, ScriptStep)>) -> Self {
        steps.sort_by_key(|(frame, _)| *frame);
        Self { steps, next: 0 }
    }

    /// A short tour: audio off, cube paused, a face opened and closed, a
    /// resize, cube resumed.
    pub fn demo(resized: ViewportSize) -> Self {
        Self::new(vec![
            (60, ScriptStep::Event(PageEvent::AudioToggleClicked)),
            (120, ScriptStep::Event(PageEvent::CubeClicked)),
            (180, ScriptStep::Event(PageEvent::FaceClicked(0))),
            (240, ScriptStep::Event(PageEvent::LightboxKey(Key::Escape))),
            (300, ScriptStep::Resize(resized)),
            (360, ScriptStep::Event(PageEvent::CubeKey(Key::Enter))),
        ])
    }

    /// Queues every step due at or before `frame`; returns how many.
    pub fn dispatch(&mut self, frame: u64, handles: &PageHandles, viewport: &SharedViewport) -> usize {
        let mut sent = 0;
        while let Some((due, step)) = self.steps.get(self.next) {
            if *due > frame {
                break;
            }
            let event = match step {
                ScriptStep::Event(event) => event.clone(),
                ScriptStep::Resize(size) => {
                    viewport.set(*size);
                    PageEvent::Resize
                }
            };
            if handles.event_sender.send(event).is_err() {
                warn!("page event queue closed");
            }
            self.next += 1;
            sent += 1;
        }
        sent
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }
}
