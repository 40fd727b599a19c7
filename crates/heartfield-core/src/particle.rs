use glam::Vec2;
use heartfield_platform::DrawSurface;
use serde::{Deserialize, Serialize};

/// One floating heart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub pos: Vec2,
    pub size: f32,
    /// Pixels climbed per frame.
    pub speed: f32,
    pub opacity: f32,
    pub sway: f32,
}

impl Particle {
    pub fn new(pos: Vec2, size: f32, speed: f32, opacity: f32, sway: f32) -> Self {
        Self {
            id: 0,
            pos,
            size,
            speed,
            opacity,
            sway,
        }
    }

    /// Climb by `speed`, then drift sideways by a sine of the new height and
    /// the frame time (ms), so neighbouring hearts never move in lockstep.
    pub fn advance(&mut self, frame_time: f64) {
        self.pos.y -= self.speed;
        let phase = self.pos.y as f64 / 30.0 + frame_time / 1000.0;
        self.pos.x += phase.sin() as f32 * self.sway;
    }

    /// Finite position, positive size and speed, opacity in (0, 1] and a
    /// finite sway. Anything else would never climb or never be culled.
    pub fn is_well_formed(&self) -> bool {
        self.pos.is_finite()
            && self.size.is_finite()
            && self.size > 0.0
            && self.speed.is_finite()
            && self.speed > 0.0
            && self.opacity > 0.0
            && self.opacity <= 1.0
            && self.sway.is_finite()
    }

    /// False once the heart has climbed more than its own size past the top.
    pub fn is_visible(&self) -> bool {
        self.pos.y >= -self.size
    }

    pub fn outline(&self) -> HeartOutline {
        let Vec2 { x, y } = self.pos;
        let s = self.size;
        HeartOutline {
            start: Vec2::new(x, y - s / 2.0),
            right: [
                Vec2::new(x + s / 2.0, y - s),
                Vec2::new(x + s, y + s / 2.0),
                Vec2::new(x, y + s),
            ],
            left: [
                Vec2::new(x - s, y + s / 2.0),
                Vec2::new(x - s / 2.0, y - s),
                Vec2::new(x, y - s / 2.0),
            ],
        }
    }
}

/// Heart silhouette: two mirrored cubic lobes meeting at the bottom tip.
/// Each lobe is `[control1, control2, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartOutline {
    pub start: Vec2,
    pub right: [Vec2; 3],
    pub left: [Vec2; 3],
}

impl HeartOutline {
    pub fn trace(&self, surface: &mut dyn DrawSurface) {
        surface.begin_path();
        surface.move_to(self.start);
        let [c1, c2, end] = self.right;
        surface.bezier_curve_to(c1, c2, end);
        let [c1, c2, end] = self.left;
        surface.bezier_curve_to(c1, c2, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_climbs_by_speed() {
        let mut heart = Particle::new(Vec2::new(100.0, 500.0), 8.0, 1.5, 0.4, 1.0);
        heart.advance(0.0);
        assert_eq!(heart.pos.y, 498.5);
        let expected_x = 100.0 + ((498.5f64 / 30.0).sin() as f32);
        assert!((heart.pos.x - expected_x).abs() < 1e-4);
    }

    #[test]
    fn zero_sway_keeps_column() {
        let mut heart = Particle::new(Vec2::new(42.0, 300.0), 6.0, 1.0, 0.3, 0.0);
        for frame in 0..50 {
            heart.advance(frame as f64 * 16.0);
        }
        assert_eq!(heart.pos, Vec2::new(42.0, 250.0));
    }

    #[test]
    fn malformed_hearts_are_detected() {
        let heart = Particle::new(Vec2::new(10.0, 10.0), 6.0, 1.0, 0.5, 1.0);
        assert!(heart.is_well_formed());
        assert!(!Particle { speed: 0.0, ..heart }.is_well_formed());
        assert!(!Particle { size: -1.0, ..heart }.is_well_formed());
        assert!(!Particle { opacity: 1.5, ..heart }.is_well_formed());
        assert!(!Particle { opacity: f32::NAN, ..heart }.is_well_formed());
        assert!(!Particle { sway: f32::INFINITY, ..heart }.is_well_formed());
        assert!(!Particle { pos: Vec2::new(f32::NAN, 0.0), ..heart }.is_well_formed());
    }

    #[test]
    fn visibility_edge() {
        let mut heart = Particle::new(Vec2::new(0.0, -10.0), 10.0, 1.0, 0.3, 0.0);
        assert!(heart.is_visible());
        heart.pos.y = -10.5;
        assert!(!heart.is_visible());
    }

    #[test]
    fn outline_is_mirrored_and_closed() {
        let heart = Particle::new(Vec2::new(50.0, 50.0), 10.0, 1.0, 0.5, 1.0);
        let outline = heart.outline();
        assert_eq!(outline.start, Vec2::new(50.0, 45.0));
        assert_eq!(outline.right[2], Vec2::new(50.0, 60.0));
        assert_eq!(outline.left[2], outline.start);
        assert_eq!(outline.right[0].y, outline.left[1].y);
        assert_eq!(outline.right[0].x - 50.0, 50.0 - outline.left[1].x);
        assert_eq!(outline.right[1].x - 50.0, 50.0 - outline.left[0].x);
    }
}
