use glam::Vec2;
use heartfield_platform::PageElement;
use tracing::{debug, info, warn};

use crate::config::PageConfig;

const PLAY_STATE: &str = "animation-play-state";

/// Horizontal swipe detection between a touch start and end.
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<Vec2>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn begin(&mut self, point: Vec2) {
        self.start = Some(point);
    }

    /// True when the gesture moved mostly sideways and far enough.
    pub fn finish(&mut self, point: Vec2) -> bool {
        let Some(start) = self.start.take() else {
            return false;
        };
        let delta = point - start;
        delta.x.abs() > delta.y.abs() && delta.x.abs() > self.threshold
    }
}

/// The rotating pair of cubes, paused and resumed together.
pub struct MemoryCube {
    large: Box<dyn PageElement>,
    small: Box<dyn PageElement>,
    pause_label: String,
    resume_label: String,
    paused: bool,
    running_since: Option<f64>,
    swipe: SwipeTracker,
}

impl MemoryCube {
    pub fn new(
        large: Box<dyn PageElement>,
        small: Box<dyn PageElement>,
        config: &PageConfig,
    ) -> Self {
        Self {
            large,
            small,
            pause_label: config.cube_pause_label.clone(),
            resume_label: config.cube_resume_label.clone(),
            paused: false,
            running_since: None,
            swipe: SwipeTracker::new(config.swipe_threshold),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// When the current running stretch began, `None` while paused.
    pub fn running_since(&self) -> Option<f64> {
        self.running_since
    }

    pub fn mark_running(&mut self, now: f64) {
        if !self.paused {
            self.running_since = Some(now);
        }
    }

    pub fn toggle(&mut self, now: f64) {
        self.paused = !self.paused;
        self.apply_play_state();
        let label = if self.paused {
            &self.resume_label
        } else {
            &self.pause_label
        };
        if let Err(err) = self.large.set_attribute("aria-label", label) {
            warn!("failed to update cube label: {err}");
        }
        self.running_since = if self.paused { None } else { Some(now) };
        info!("memory cube {}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn touch_start(&mut self, point: Vec2) {
        self.swipe.begin(point);
    }

    /// Toggles on a completed horizontal swipe; returns whether it did.
    pub fn touch_end(&mut self, point: Vec2, now: f64) -> bool {
        if self.swipe.finish(point) {
            self.toggle(now);
            return true;
        }
        false
    }

    /// Re-asserts the running state and flushes layout so the CSS animation
    /// carries on across overlay changes. No effect while paused.
    pub fn keep_running(&mut self) {
        if self.paused {
            return;
        }
        self.apply_play_state();
        self.large.force_layout();
        debug!("memory cube kept running");
    }

    pub fn focus(&mut self) {
        if let Err(err) = self.large.focus() {
            warn!("failed to focus cube: {err}");
        }
    }

    fn apply_play_state(&mut self) {
        let state = if self.paused { "paused" } else { "running" };
        for cube in [&mut self.large, &mut self.small] {
            if let Err(err) = cube.set_style(PLAY_STATE, state) {
                warn!("failed to set {PLAY_STATE}: {err}");
            }
        }
    }
}
