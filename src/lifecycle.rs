//! Birth and death parameters shared by every spawn path.
//!
//! Whatever the emission policy, a newborn particle draws its radius and
//! lifetime from this bundle: `radius ± radius_rnd%` and
//! `lifetime ± lifetime_rnd%`. With `immortal` set, lifetime is assigned but
//! never enforced - particles age past it without being removed.
//!
//! ```ignore
//! system.lifecycle = Lifecycle::new()
//!     .lifetime(4.0)
//!     .lifetime_jitter(60.0)
//!     .radius(5.0)
//!     .color(Vec3::new(1.0, 0.8, 0.2));
//! ```

use crate::spawn::SpawnContext;
use glam::Vec3;

/// Birth/death parameter bundle.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    /// Exempt particles from age-based removal.
    pub immortal: bool,
    /// Base lifetime in seconds.
    pub lifetime: f32,
    /// Lifetime jitter in percent.
    pub lifetime_rnd: f32,
    /// Base radius of newborn particles.
    pub radius: f32,
    /// Radius jitter in percent.
    pub radius_rnd: f32,
    /// Birth color (RGB, 0.0-1.0).
    pub color: Vec3,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            immortal: false,
            lifetime: 3.0,
            lifetime_rnd: 60.0,
            radius: 5.0,
            radius_rnd: 20.0,
            color: Vec3::ONE,
        }
    }
}

impl Lifecycle {
    /// A fresh bundle with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exempt particles from age-based removal.
    pub fn immortal(mut self, immortal: bool) -> Self {
        self.immortal = immortal;
        self
    }

    /// Set the base lifetime in seconds.
    pub fn lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = seconds;
        self
    }

    /// Set the lifetime jitter in percent.
    pub fn lifetime_jitter(mut self, percent: f32) -> Self {
        self.lifetime_rnd = percent;
        self
    }

    /// Set the base radius.
    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the radius jitter in percent.
    pub fn radius_jitter(mut self, percent: f32) -> Self {
        self.radius_rnd = percent;
        self
    }

    /// Set the birth color.
    pub fn color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Draw the jittered (radius, lifetime) pair for one newborn.
    pub fn birth_params(&self, ctx: &mut SpawnContext) -> (f32, f32) {
        (
            ctx.vary(self.radius, self.radius_rnd),
            ctx.vary(self.lifetime, self.lifetime_rnd),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_params_within_jitter() {
        let lifecycle = Lifecycle::new()
            .radius(10.0)
            .radius_jitter(50.0)
            .lifetime(2.0)
            .lifetime_jitter(25.0);
        let mut ctx = SpawnContext::with_seed(100.0, 100.0, 11);
        for _ in 0..100 {
            let (radius, lifetime) = lifecycle.birth_params(&mut ctx);
            assert!((5.0..=15.0).contains(&radius));
            assert!((1.5..=2.5).contains(&lifetime));
        }
    }

    #[test]
    fn test_builder_chain() {
        let lifecycle = Lifecycle::new().immortal(true).lifetime(8.0).radius(2.0);
        assert!(lifecycle.immortal);
        assert_eq!(lifecycle.lifetime, 8.0);
        assert_eq!(lifecycle.radius, 2.0);
    }
}
