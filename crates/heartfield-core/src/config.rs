use std::path::{Path, PathBuf};

use heartfield_platform::{Rgba, ViewportSize};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::info;

use crate::rng::RandomSource;

/// Upper bound on `max_particles` for either profile.
pub const MAX_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("{profile} profile: {field} range is inverted ({min} > {max})")]
    InvertedRange {
        profile: &'static str,
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{profile} profile: {field} must start above zero, got {min}")]
    NonPositive {
        profile: &'static str,
        field: &'static str,
        min: f32,
    },
    #[error("{profile} profile: opacity must lie in (0, 1], got {min}..{max}")]
    Opacity {
        profile: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{profile} profile: capacity must be at least 1")]
    ZeroCapacity { profile: &'static str },
    #[error("{profile} profile: capacity {capacity} exceeds {}", MAX_CAPACITY)]
    Capacity {
        profile: &'static str,
        capacity: usize,
    },
    #[error("{profile} profile: {field} must be finite, got {min}..{max}")]
    NonFinite {
        profile: &'static str,
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("spawn chance must lie in [0, 1], got {0}")]
    SpawnChance(f32),
}

/// Half-open `[min, max)` range sampled with a uniform draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut dyn RandomSource) -> f32 {
        self.min + rng.next_unit() * (self.max - self.min)
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Narrow,
    Wide,
}

impl ProfileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileKind::Narrow => "narrow",
            ProfileKind::Wide => "wide",
        }
    }
}

/// Attribute ranges for one class of viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartProfile {
    pub max_particles: usize,
    pub glow_blur: f32,
    pub size: SampleRange,
    pub speed: SampleRange,
    pub opacity: SampleRange,
    pub sway: SampleRange,
}

impl HeartProfile {
    pub fn wide() -> Self {
        Self {
            max_particles: 15,
            glow_blur: 8.0,
            size: SampleRange::new(4.0, 12.0),
            speed: SampleRange::new(0.5, 2.0),
            opacity: SampleRange::new(0.2, 0.6),
            sway: SampleRange::new(0.5, 2.0),
        }
    }

    pub fn narrow() -> Self {
        Self {
            max_particles: 8,
            glow_blur: 3.0,
            size: SampleRange::new(4.0, 10.0),
            speed: SampleRange::new(0.5, 2.0),
            opacity: SampleRange::new(0.2, 0.6),
            sway: SampleRange::new(0.5, 1.5),
        }
    }

    fn validate(&self, profile: &'static str) -> Result<(), ConfigError> {
        if self.max_particles == 0 {
            return Err(ConfigError::ZeroCapacity { profile });
        }
        if self.max_particles > MAX_CAPACITY {
            return Err(ConfigError::Capacity {
                profile,
                capacity: self.max_particles,
            });
        }
        let blur = SampleRange::new(self.glow_blur, self.glow_blur);
        let ranges = [
            ("glow_blur", blur),
            ("size", self.size),
            ("speed", self.speed),
            ("opacity", self.opacity),
            ("sway", self.sway),
        ];
        // NaN compares false against everything, so this has to come first.
        for (field, range) in ranges {
            if !range.is_finite() {
                return Err(ConfigError::NonFinite {
                    profile,
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        for (field, range) in ranges {
            if range.min > range.max {
                return Err(ConfigError::InvertedRange {
                    profile,
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        // y must strictly decrease every frame, and a zero-sized heart is never culled sensibly.
        for (field, range) in [("size", self.size), ("speed", self.speed)] {
            if range.min <= 0.0 {
                return Err(ConfigError::NonPositive {
                    profile,
                    field,
                    min: range.min,
                });
            }
        }
        if self.opacity.min <= 0.0 || self.opacity.max > 1.0 {
            return Err(ConfigError::Opacity {
                profile,
                min: self.opacity.min,
                max: self.opacity.max,
            });
        }
        Ok(())
    }
}

/// A profile table from a config file; missing keys keep the built-in values
/// of the profile it overrides.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileOverrides {
    max_particles: Option<usize>,
    glow_blur: Option<f32>,
    size: Option<SampleRange>,
    speed: Option<SampleRange>,
    opacity: Option<SampleRange>,
    sway: Option<SampleRange>,
}

impl ProfileOverrides {
    fn apply(self, base: HeartProfile) -> HeartProfile {
        HeartProfile {
            max_particles: self.max_particles.unwrap_or(base.max_particles),
            glow_blur: self.glow_blur.unwrap_or(base.glow_blur),
            size: self.size.unwrap_or(base.size),
            speed: self.speed.unwrap_or(base.speed),
            opacity: self.opacity.unwrap_or(base.opacity),
            sway: self.sway.unwrap_or(base.sway),
        }
    }
}

fn wide_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HeartProfile, D::Error> {
    ProfileOverrides::deserialize(deserializer).map(|o| o.apply(HeartProfile::wide()))
}

fn narrow_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HeartProfile, D::Error> {
    ProfileOverrides::deserialize(deserializer).map(|o| o.apply(HeartProfile::narrow()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartStyle {
    /// Fill hue; the alpha channel is replaced by each heart's opacity.
    pub color: Rgba,
    pub glow_color: Rgba,
}

impl Default for HeartStyle {
    fn default() -> Self {
        Self {
            color: Rgba::rgb(255, 105, 180),
            glow_color: Rgba::rgb(255, 105, 180).with_alpha(0.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Chance per frame that a heart is spawned while under capacity.
    pub spawn_chance: f32,
    /// Viewports at most this wide use the narrow profile.
    pub narrow_max_width: u32,
    #[serde(deserialize_with = "wide_profile")]
    pub wide: HeartProfile,
    #[serde(deserialize_with = "narrow_profile")]
    pub narrow: HeartProfile,
    pub style: HeartStyle,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.1,
            narrow_max_width: 768,
            wide: HeartProfile::wide(),
            narrow: HeartProfile::narrow(),
            style: HeartStyle::default(),
        }
    }
}

impl FieldConfig {
    pub fn profile_kind(&self, viewport: ViewportSize) -> ProfileKind {
        if viewport.width <= self.narrow_max_width {
            ProfileKind::Narrow
        } else {
            ProfileKind::Wide
        }
    }

    pub fn profile(&self, kind: ProfileKind) -> &HeartProfile {
        match kind {
            ProfileKind::Narrow => &self.narrow,
            ProfileKind::Wide => &self.wide,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(ConfigError::SpawnChance(self.spawn_chance));
        }
        self.wide.validate("wide")?;
        self.narrow.validate("narrow")
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `.toml` or `.json` by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        info!("loaded field config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_toml() {
        let text = toml::to_string(&FieldConfig::default()).unwrap();
        let parsed = FieldConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, FieldConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let parsed = FieldConfig::from_toml_str("spawn_chance = 0.25\n").unwrap();
        assert_eq!(parsed.spawn_chance, 0.25);
        assert_eq!(parsed.wide, HeartProfile::wide());
        assert_eq!(parsed.narrow_max_width, 768);
    }

    #[test]
    fn json_is_accepted() {
        let parsed = FieldConfig::from_json_str(r#"{ "narrow_max_width": 600 }"#).unwrap();
        assert_eq!(parsed.narrow_max_width, 600);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut config = FieldConfig::default();
        config.narrow.sway = SampleRange::new(2.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                profile: "narrow",
                field: "sway",
                ..
            })
        ));
    }

    #[test]
    fn stationary_hearts_are_rejected() {
        let mut config = FieldConfig::default();
        config.wide.speed = SampleRange::new(0.0, 1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "speed", .. })
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut config = FieldConfig::default();
        config.spawn_chance = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::SpawnChance(_))));

        let mut config = FieldConfig::default();
        config.wide.opacity = SampleRange::new(0.5, 1.5);
        assert!(matches!(config.validate(), Err(ConfigError::Opacity { .. })));

        let mut config = FieldConfig::default();
        config.wide.max_particles = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { profile: "wide" })
        ));
    }

    #[test]
    fn nan_bounds_are_rejected() {
        let text = "[wide]\nspeed = { min = nan, max = 2.0 }\n";
        assert!(matches!(
            FieldConfig::from_toml_str(text),
            Err(ConfigError::NonFinite {
                profile: "wide",
                field: "speed",
                ..
            })
        ));

        let mut config = FieldConfig::default();
        config.narrow.glow_blur = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "glow_blur", .. })
        ));

        let mut config = FieldConfig::default();
        config.spawn_chance = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::SpawnChance(_))));
    }

    #[test]
    fn huge_capacity_is_rejected() {
        let text = "[wide]\nmax_particles = 4611686018427387903\n";
        assert!(matches!(
            FieldConfig::from_toml_str(text),
            Err(ConfigError::Capacity { profile: "wide", .. })
        ));

        let mut config = FieldConfig::default();
        config.narrow.max_particles = MAX_CAPACITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_profile_keeps_its_own_defaults() {
        let text = "[wide]\nmax_particles = 20\n\n[narrow]\nglow_blur = 1.0\n";
        let parsed = FieldConfig::from_toml_str(text).unwrap();
        assert_eq!(parsed.wide.max_particles, 20);
        assert_eq!(parsed.wide.sway, HeartProfile::wide().sway);
        assert_eq!(parsed.narrow.glow_blur, 1.0);
        assert_eq!(parsed.narrow.max_particles, 8);
        assert_eq!(parsed.narrow.size, HeartProfile::narrow().size);

        let parsed = FieldConfig::from_json_str(r#"{ "narrow": { "max_particles": 4 } }"#).unwrap();
        assert_eq!(parsed.narrow.max_particles, 4);
        assert_eq!(parsed.wide, HeartProfile::wide());
    }

    #[test]
    fn breakpoint_picks_profile() {
        let config = FieldConfig::default();
        assert_eq!(config.profile_kind(ViewportSize::new(768, 1024)), ProfileKind::Narrow);
        assert_eq!(config.profile_kind(ViewportSize::new(769, 1024)), ProfileKind::Wide);
        assert_eq!(config.profile(ProfileKind::Narrow).max_particles, 8);
        assert_eq!(config.profile(ProfileKind::Wide).max_particles, 15);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = std::env::temp_dir().join("heartfield-config-test.yaml");
        std::fs::write(&path, "spawn_chance: 0.1").unwrap();
        let result = FieldConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
