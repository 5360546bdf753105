//! Per-particle physics: friction, gravity, turbulence, boundary handling.
//!
//! Each frame, every live particle goes through the same ordered steps:
//!
//! 1. friction - velocity scaled by a retention factor (0 = full stop,
//!    1 = frictionless)
//! 2. gravity - constant acceleration
//! 3. turbulence - displacement sampled from coherent Perlin noise
//! 4. accumulated interaction forces
//! 5. integration - `position += velocity * dt`
//! 6. boundary resolution against `[0, width] x [0, height]`
//!
//! # Wall Behaviors
//!
//! | Flag | Behavior |
//! |------|----------|
//! | `bounce` | Reflect the perpendicular velocity component, optionally damped |
//! | `steer` | Inside a margin, push velocity back toward the interior |
//! | `infinite_walls` | Wrap position modulo the domain |
//! | none | Clamp position and zero the offending component |
//!
//! Exactly one behavior is authoritative per frame; when several flags are
//! set, precedence is bounce > steer > infinite walls.

use crate::particle::Particle;
use glam::Vec2;
use noise::{NoiseFn, Perlin};

/// Physical constants and wall flags.
///
/// All fields may change between frames; they are read fresh on the next
/// `update`. Out-of-range values are accepted as supplied, with degenerate
/// behavior as the defined outcome.
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Velocity retention per frame: 0.0 stops particles dead, 1.0 is
    /// frictionless.
    pub friction: f32,
    /// Constant acceleration, world units per second squared.
    pub gravity: Vec2,
    /// Strength of the coherent-noise displacement. 0.0 disables sampling.
    pub turbulence: f32,
    /// Reflect off the domain edges.
    pub bounce: bool,
    /// Steer back toward the interior near an edge.
    pub steer: bool,
    /// Wrap around the domain edges.
    pub infinite_walls: bool,
    /// Scale reflected speed by `damping` on each bounce.
    pub bounce_damping: bool,
    /// Speed factor applied to the reflected component when damping.
    pub damping: f32,
    /// Distance from an edge at which steering starts.
    pub steer_margin: f32,
    /// Steering acceleration at full margin penetration.
    pub steer_force: f32,
    /// Push apart any particle pair closer than `repulse_dist`.
    pub repulse: bool,
    /// Inter-particle repulsion distance.
    pub repulse_dist: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 1.0,
            gravity: Vec2::ZERO,
            turbulence: 0.0,
            bounce: false,
            steer: false,
            infinite_walls: false,
            bounce_damping: false,
            damping: 0.8,
            steer_margin: 50.0,
            steer_force: 300.0,
            repulse: false,
            repulse_dist: 10.0,
        }
    }
}

/// The single authoritative wall behavior for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    Bounce,
    Steer,
    Wrap,
    Clamp,
}

impl PhysicsConfig {
    /// Resolve the wall flags into one behavior, bounce > steer > infinite.
    pub fn boundary(&self) -> Boundary {
        if self.bounce {
            Boundary::Bounce
        } else if self.steer {
            Boundary::Steer
        } else if self.infinite_walls {
            Boundary::Wrap
        } else {
            Boundary::Clamp
        }
    }
}

/// Coherent 2D displacement field built from a pair of offset Perlin
/// samples, advanced through time on the noise z axis.
pub struct TurbulenceField {
    noise_x: Perlin,
    noise_y: Perlin,
    /// Spatial frequency of the noise lookup.
    pub scale: f64,
    /// Temporal frequency of the noise lookup.
    pub time_scale: f64,
}

impl TurbulenceField {
    /// Create a field from a seed. Two seeds a step apart decorrelate the
    /// x and y components.
    pub fn new(seed: u32) -> Self {
        Self {
            noise_x: Perlin::new(seed),
            noise_y: Perlin::new(seed.wrapping_add(1)),
            scale: 0.01,
            time_scale: 0.3,
        }
    }

    /// Displacement direction at `pos` and time `t`, each component in -1..1.
    pub fn displacement(&self, pos: Vec2, t: f32) -> Vec2 {
        let (x, y) = (pos.x as f64 * self.scale, pos.y as f64 * self.scale);
        let z = t as f64 * self.time_scale;
        Vec2::new(
            self.noise_x.get([x, y, z]) as f32,
            self.noise_y.get([x + 100.0, y, z]) as f32,
        )
    }
}

/// Advance one particle through the ordered physics steps.
pub fn integrate(
    p: &mut Particle,
    cfg: &PhysicsConfig,
    turbulence: &TurbulenceField,
    time: f32,
    dt: f32,
    width: f32,
    height: f32,
) {
    p.vel *= cfg.friction;
    p.vel += cfg.gravity * dt;
    if cfg.turbulence != 0.0 {
        p.vel += turbulence.displacement(p.pos, time) * cfg.turbulence * dt;
    }
    p.vel += p.force * dt;
    p.force = Vec2::ZERO;

    p.pos += p.vel * dt;

    match cfg.boundary() {
        Boundary::Bounce => {
            let damp = if cfg.bounce_damping { cfg.damping } else { 1.0 };
            if p.pos.x < 0.0 {
                p.pos.x = 0.0;
                p.vel.x = -p.vel.x * damp;
            } else if p.pos.x > width {
                p.pos.x = width;
                p.vel.x = -p.vel.x * damp;
            }
            if p.pos.y < 0.0 {
                p.pos.y = 0.0;
                p.vel.y = -p.vel.y * damp;
            } else if p.pos.y > height {
                p.pos.y = height;
                p.vel.y = -p.vel.y * damp;
            }
        }
        Boundary::Steer => {
            let m = cfg.steer_margin.max(f32::EPSILON);
            if p.pos.x < m {
                p.vel.x += cfg.steer_force * (m - p.pos.x) / m * dt;
            } else if p.pos.x > width - m {
                p.vel.x -= cfg.steer_force * (p.pos.x - (width - m)) / m * dt;
            }
            if p.pos.y < m {
                p.vel.y += cfg.steer_force * (m - p.pos.y) / m * dt;
            } else if p.pos.y > height - m {
                p.vel.y -= cfg.steer_force * (p.pos.y - (height - m)) / m * dt;
            }
        }
        Boundary::Wrap => {
            if width > 0.0 {
                p.pos.x = p.pos.x.rem_euclid(width);
            }
            if height > 0.0 {
                p.pos.y = p.pos.y.rem_euclid(height);
            }
        }
        Boundary::Clamp => {
            if p.pos.x < 0.0 || p.pos.x > width {
                p.pos.x = p.pos.x.clamp(0.0, width);
                p.vel.x = 0.0;
            }
            if p.pos.y < 0.0 || p.pos.y > height {
                p.pos.y = p.pos.y.clamp(0.0, height);
                p.vel.y = 0.0;
            }
        }
    }
}
