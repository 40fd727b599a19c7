//! Heartfield core engine: platform-agnostic heart particles, profiles, and config.

pub mod config;
pub mod field;
pub mod particle;
pub mod rng;

pub use config::{
    ConfigError, FieldConfig, HeartProfile, HeartStyle, ProfileKind, SampleRange, MAX_CAPACITY,
};
pub use field::{FieldStats, ParticleField};
pub use particle::{HeartOutline, Particle};
pub use rng::{RandomSource, SeededRandom};
