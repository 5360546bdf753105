//! Spawn context for particle initialization.
//!
//! Provides the RNG and helper methods used when assigning birth parameters,
//! so emission code never sets up randomness by hand:
//!
//! ```ignore
//! let mut ctx = SpawnContext::new(800.0, 600.0);
//! let pos = ctx.random_in_bounds();
//! let vel = ctx.random_direction() * ctx.vary(50.0, 20.0); // 50 +- 20%
//! ```
//!
//! Random sequences are not reproducible across runs by default (only
//! statistical ranges are contractual); tests pin a seed with
//! [`SpawnContext::with_seed`].

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// RNG owner with helpers for common 2D spawn patterns.
pub struct SpawnContext {
    /// Domain width in world units.
    pub width: f32,
    /// Domain height in world units.
    pub height: f32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context for a `width` x `height` domain, seeded from entropy.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a context with a fixed seed. Used by tests that need a stable
    /// (if arbitrary) sequence.
    pub fn with_seed(width: f32, height: f32, seed: u64) -> Self {
        Self {
            width,
            height,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range. Empty ranges collapse to `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// `value` jittered by up to `percent`% in either direction.
    ///
    /// `vary(50.0, 20.0)` returns a value in 40.0..=60.0. This is how all
    /// birth parameters (radius, lifetime, speed) get their randomness.
    #[inline]
    pub fn vary(&mut self, value: f32, percent: f32) -> f32 {
        let spread = value * percent / 100.0;
        value + spread * self.rng.gen_range(-1.0f32..=1.0)
    }

    // ========== Position helpers ==========

    /// Random unit vector, uniformly distributed over the circle.
    pub fn random_direction(&mut self) -> Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Random point within the domain rectangle.
    pub fn random_in_bounds(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(0.0..=self.width),
            self.rng.gen_range(0.0..=self.height),
        )
    }

    /// Random point inside a disk around `center`, uniform over the area.
    pub fn random_in_disk(&mut self, center: Vec2, radius: f32) -> Vec2 {
        if radius <= 0.0 {
            return center;
        }
        let angle = self.rng.gen_range(0.0..TAU);
        let r = radius * self.rng.gen::<f32>().sqrt();
        center + Vec2::new(r * angle.cos(), r * angle.sin())
    }

    /// Random point along the top edge of the domain (y = 0).
    pub fn random_on_top_edge(&mut self) -> Vec2 {
        Vec2::new(self.rng.gen_range(0.0..=self.width), 0.0)
    }

    /// Random point along the left edge of the domain (x = 0).
    pub fn random_on_left_edge(&mut self) -> Vec2 {
        Vec2::new(0.0, self.rng.gen_range(0.0..=self.height))
    }

    /// Random point on a polyline, uniform over its total length.
    ///
    /// Returns `None` for polylines with fewer than two points.
    pub fn random_on_polyline(&mut self, points: &[Vec2]) -> Option<Vec2> {
        if points.len() < 2 {
            return None;
        }
        let total: f32 = points.windows(2).map(|w| (w[1] - w[0]).length()).sum();
        if total <= 0.0 {
            return Some(points[0]);
        }
        let mut target = self.rng.gen_range(0.0..total);
        for w in points.windows(2) {
            let seg = (w[1] - w[0]).length();
            if target <= seg {
                let t = if seg > 0.0 { target / seg } else { 0.0 };
                return Some(w[0] + (w[1] - w[0]) * t);
            }
            target -= seg;
        }
        Some(points[points.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vary_stays_within_percent() {
        let mut ctx = SpawnContext::with_seed(100.0, 100.0, 1);
        for _ in 0..200 {
            let v = ctx.vary(50.0, 20.0);
            assert!((40.0..=60.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn test_random_in_bounds() {
        let mut ctx = SpawnContext::with_seed(800.0, 600.0, 2);
        for _ in 0..200 {
            let p = ctx.random_in_bounds();
            assert!((0.0..=800.0).contains(&p.x));
            assert!((0.0..=600.0).contains(&p.y));
        }
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut ctx = SpawnContext::with_seed(1.0, 1.0, 3);
        for _ in 0..50 {
            assert!((ctx.random_direction().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_on_polyline() {
        let mut ctx = SpawnContext::with_seed(10.0, 10.0, 5);
        let line = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        for _ in 0..50 {
            let p = ctx.random_on_polyline(&line).unwrap();
            assert!((0.0..=10.0).contains(&p.x));
            assert!(p.y.abs() < 1e-6);
        }
        assert!(ctx.random_on_polyline(&[Vec2::ZERO]).is_none());
    }
}
