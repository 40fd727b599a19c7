use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }

    /// Enter and Space act like a click; their default action is suppressed.
    pub fn activates(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// Everything the page reacts to. Hosts translate their native events into
/// these and queue them; the page drains the queue at the start of a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The viewport changed; the new size is read from the viewport source.
    Resize,
    AudioToggleClicked,
    VolumeInput(f32),
    CubeClicked,
    CubeKey(Key),
    CubeTouchStart(Vec2),
    CubeTouchEnd(Vec2),
    FaceClicked(usize),
    FaceKey(usize, Key),
    LightboxCloseClicked,
    LightboxKey(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys() {
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Other);
        assert!(Key::Space.activates());
        assert!(!Key::Escape.activates());
    }
}
