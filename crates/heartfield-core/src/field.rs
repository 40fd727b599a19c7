use glam::Vec2;
use heartfield_platform::{DrawSurface, FillStyle, FrameScheduler, Glow, ViewportSize};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{FieldConfig, HeartProfile, ProfileKind, MAX_CAPACITY};
use crate::particle::Particle;
use crate::rng::RandomSource;

/// Counters for logging and the runner's summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub frames: u64,
    pub live: usize,
    pub spawned: u64,
    pub culled: u64,
}

/// Bounded stream of upward-drifting hearts.
///
/// The profile (capacity and attribute ranges) is chosen from the viewport the
/// field is created with. Viewport dimensions are otherwise read from the
/// surface on every tick, so resizes between frames only affect later spawns.
pub struct ParticleField {
    config: FieldConfig,
    kind: ProfileKind,
    particles: Vec<Particle>,
    stats: FieldStats,
}

impl ParticleField {
    pub fn new(config: FieldConfig, viewport: ViewportSize) -> Self {
        let kind = config.profile_kind(viewport);
        let capacity = config.profile(kind).max_particles;
        info!(
            "particle field: {} profile for {}x{}, capacity {}",
            kind.as_str(),
            viewport.width,
            viewport.height,
            capacity
        );
        Self {
            config,
            kind,
            particles: Vec::with_capacity(capacity.min(MAX_CAPACITY)),
            stats: FieldStats::default(),
        }
    }

    pub fn profile_kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn profile(&self) -> &HeartProfile {
        self.config.profile(self.kind)
    }

    pub fn capacity(&self) -> usize {
        self.profile().max_particles
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            live: self.particles.len(),
            ..self.stats
        }
    }

    /// Builds one heart at the bottom of `viewport` without inserting it.
    pub fn spawn(&self, viewport: ViewportSize, rng: &mut dyn RandomSource) -> Particle {
        let profile = self.profile();
        let x = rng.next_unit() * viewport.width as f32;
        let size = profile.size.sample(rng);
        let speed = profile.speed.sample(rng);
        let opacity = profile.opacity.sample(rng);
        let sway = profile.sway.sample(rng);
        Particle::new(
            Vec2::new(x, viewport.height as f32),
            size,
            speed,
            opacity,
            sway,
        )
    }

    /// Spawns a heart if under capacity and the frame's draw succeeds.
    pub fn maybe_spawn(&mut self, viewport: ViewportSize, rng: &mut dyn RandomSource) -> bool {
        if self.particles.len() >= self.capacity() {
            return false;
        }
        if rng.next_unit() >= self.config.spawn_chance {
            return false;
        }
        let heart = self.spawn(viewport, rng);
        self.adopt(heart)
    }

    /// Inserts a prepared heart, assigning it a fresh id. Refused at capacity
    /// or when the heart is not well formed.
    pub fn adopt(&mut self, mut heart: Particle) -> bool {
        if self.particles.len() >= self.capacity() {
            return false;
        }
        if !heart.is_well_formed() {
            warn!(
                "refusing malformed heart: size {} speed {} opacity {}",
                heart.size, heart.speed, heart.opacity
            );
            return false;
        }
        heart.id = self.stats.spawned;
        self.stats.spawned += 1;
        debug!(
            "heart {} at ({:.1}, {:.1}) size {:.1}",
            heart.id, heart.pos.x, heart.pos.y, heart.size
        );
        self.particles.push(heart);
        true
    }

    pub fn advance(&mut self, frame_time: f64) {
        for heart in &mut self.particles {
            heart.advance(frame_time);
        }
    }

    /// Drops every heart past the top edge; survivors keep their order.
    pub fn cull(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_visible);
        let removed = before - self.particles.len();
        self.stats.culled += removed as u64;
        removed
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        surface.clear();
        let style = self.config.style;
        let blur = self.profile().glow_blur;
        let glow = (blur > 0.0).then_some(Glow {
            color: style.glow_color,
            blur,
        });
        for heart in &self.particles {
            heart.outline().trace(surface);
            surface.fill(&FillStyle {
                color: style.color.with_alpha(heart.opacity),
                glow,
            });
        }
    }

    /// One display refresh: spawn, advance, cull, render, then ask for the next.
    pub fn tick(
        &mut self,
        frame_time: f64,
        surface: &mut dyn DrawSurface,
        rng: &mut dyn RandomSource,
        scheduler: &mut dyn FrameScheduler,
    ) {
        let viewport = surface.size();
        self.maybe_spawn(viewport, rng);
        self.advance(frame_time);
        self.cull();
        self.render(surface);
        self.stats.frames += 1;
        scheduler.request_frame();
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
