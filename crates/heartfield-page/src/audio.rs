use heartfield_platform::{MediaPlayback, PageElement};
use tracing::{debug, warn};

pub const PLAYING_GLYPH: &str = "🔊";
pub const MUTED_GLYPH: &str = "🔇";

/// Background music with a play/pause button and a volume slider.
pub struct AudioToggle {
    media: Box<dyn MediaPlayback>,
    button: Box<dyn PageElement>,
}

impl AudioToggle {
    pub fn new(media: Box<dyn MediaPlayback>, button: Box<dyn PageElement>) -> Self {
        Self { media, button }
    }

    /// Applies the slider's volume and tries to start playback right away.
    pub fn setup(&mut self, volume: f32) {
        self.set_volume(volume);
        self.try_play("autoplay blocked");
        let glyph = if self.media.is_paused() {
            MUTED_GLYPH
        } else {
            PLAYING_GLYPH
        };
        self.button.set_text(glyph);
    }

    pub fn toggle(&mut self) {
        if self.media.is_paused() {
            self.try_play("playback failed");
            self.button.set_text(PLAYING_GLYPH);
        } else {
            if let Err(err) = self.media.pause() {
                warn!("pause failed: {err}");
            }
            self.button.set_text(MUTED_GLYPH);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            warn!("ignoring volume {volume}");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        debug!("volume -> {volume:.2}");
        self.media.set_volume(volume);
    }

    pub fn is_paused(&self) -> bool {
        self.media.is_paused()
    }

    fn try_play(&mut self, context: &str) {
        if let Err(err) = self.media.play() {
            warn!("{context}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, FakeMedia};

    #[test]
    fn autoplay_refusal_is_not_fatal() {
        let media = FakeMedia::refusing();
        let button = FakeElement::default();
        let mut audio = AudioToggle::new(Box::new(media.clone()), Box::new(button.clone()));

        audio.setup(0.3);
        assert!(audio.is_paused());
        assert_eq!(button.text(), MUTED_GLYPH);
        assert_eq!(media.volume(), 0.3);
        assert_eq!(media.play_attempts(), 1);
    }

    #[test]
    fn setup_shows_speaker_when_playing() {
        let media = FakeMedia::default();
        let button = FakeElement::default();
        let mut audio = AudioToggle::new(Box::new(media.clone()), Box::new(button.clone()));
        audio.setup(0.5);
        assert!(!audio.is_paused());
        assert_eq!(button.text(), PLAYING_GLYPH);
    }

    #[test]
    fn toggle_flips_state_and_label() {
        let media = FakeMedia::default();
        let button = FakeElement::default();
        let mut audio = AudioToggle::new(Box::new(media.clone()), Box::new(button.clone()));
        audio.setup(0.5);

        audio.toggle();
        assert!(media.paused());
        assert_eq!(button.text(), MUTED_GLYPH);

        audio.toggle();
        assert!(!media.paused());
        assert_eq!(button.text(), PLAYING_GLYPH);
    }

    #[test]
    fn volume_is_clamped() {
        let media = FakeMedia::default();
        let mut audio = AudioToggle::new(Box::new(media.clone()), Box::new(FakeElement::default()));
        audio.set_volume(1.7);
        assert_eq!(media.volume(), 1.0);
        audio.set_volume(-0.2);
        assert_eq!(media.volume(), 0.0);
        audio.set_volume(f32::NAN);
        assert_eq!(media.volume(), 0.0);
    }
}
