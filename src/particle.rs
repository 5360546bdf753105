//! The particle itself: a single short-lived simulated entity.
//!
//! Particles are plain values owned by the [`ParticleSystem`](crate::ParticleSystem)
//! in a contiguous, creation-ordered store. Every particle carries these fields:
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `id` | `u64` | Unique creation index, assigned once at birth |
//! | `pos` | `Vec2` | Current position |
//! | `vel` | `Vec2` | Current velocity |
//! | `origin` | `Vec2` | Birth position (used by return-to-origin) |
//! | `color` | `Vec3` | Birth color (RGB, 0.0-1.0) |
//! | `radius` | `f32` | Base radius before visual aging |
//! | `age` | `f32` | Seconds since birth, monotonically non-decreasing |
//! | `lifetime` | `f32` | Death threshold in seconds |
//! | `alive` | `bool` | false = scheduled for removal this frame |

use glam::{Vec2, Vec3};

/// A single simulated particle.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Unique creation index.
    pub id: u64,
    /// Current position.
    pub pos: Vec2,
    /// Current velocity.
    pub vel: Vec2,
    /// Force accumulator for the current frame, cleared after integration.
    pub force: Vec2,
    /// Birth position.
    pub origin: Vec2,
    /// Birth color (RGB, 0.0-1.0).
    pub color: Vec3,
    /// Base radius before visual aging is applied.
    pub radius: f32,
    /// Seconds since birth.
    pub age: f32,
    /// Death threshold in seconds. Not enforced while the system is immortal.
    pub lifetime: f32,
    /// Liveness flag; dead particles are compacted out at the end of the frame.
    pub alive: bool,
}

impl Particle {
    /// Create a particle at `pos` with the given birth parameters.
    pub fn new(id: u64, pos: Vec2, vel: Vec2, color: Vec3, radius: f32, lifetime: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            force: Vec2::ZERO,
            origin: pos,
            color,
            radius,
            age: 0.0,
            lifetime,
            alive: true,
        }
    }

    /// Fraction of the lifetime already spent, clamped to 0.0-1.0.
    ///
    /// A non-positive lifetime counts as fully spent, so degenerate
    /// configuration degrades to immediate death rather than an error.
    #[inline]
    pub fn age_fraction(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    /// Whether the particle has outlived its lifetime.
    #[inline]
    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }
}
