//! Page wiring: the heart field plus the audio toggle, memory cube and lightbox,
//! all driven through `heartfield-platform` traits.

pub mod audio;
pub mod config;
pub mod cube;
pub mod events;
pub mod lightbox;
pub mod page;

#[cfg(test)]
mod testing;

pub use audio::AudioToggle;
pub use config::PageConfig;
pub use cube::{MemoryCube, SwipeTracker};
pub use events::{Key, PageEvent};
pub use lightbox::Lightbox;
pub use page::{Page, PageHandles, PageParts};
