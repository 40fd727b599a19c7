use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Announced on the large cube while it spins.
    pub cube_pause_label: String,
    /// Announced on the large cube while it is paused.
    pub cube_resume_label: String,
    /// Minimum horizontal travel, in CSS pixels, for a touch to count as a swipe.
    pub swipe_threshold: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            cube_pause_label: "Pause memory cube".into(),
            cube_resume_label: "Resume memory cube".into(),
            swipe_threshold: 50.0,
        }
    }
}
