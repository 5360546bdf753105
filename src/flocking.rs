//! Flocking and inter-particle repulsion.
//!
//! The flocking solver gives particles emergent group motion from three
//! local rules, selected per neighbor by the distance ratio
//! `distance / radius`:
//!
//! | Band | Rule |
//! |------|------|
//! | ratio < `low_thresh` | Separate: push apart, inversely proportional to distance |
//! | ratio > `high_thresh` | Attract: pull toward the neighbor |
//! | otherwise | Align: nudge velocity toward the neighbor's |
//!
//! After all neighbor contributions the combined velocity is clamped to
//! `max_speed`. Semantics are the O(n²) all-pairs scan; the
//! [`SpatialGrid`] broad-phase only prunes candidates outside the radius,
//! which cannot change results.
//!
//! Both passes read a velocity snapshot and apply their deltas at the end,
//! so the outcome is independent of particle iteration order.

use crate::particle::Particle;
use crate::spatial::SpatialGrid;
use glam::Vec2;

/// Acceleration applied to a pair at zero distance by the repulsion pass.
const REPULSE_STRENGTH: f32 = 500.0;

/// Flocking parameters.
#[derive(Clone, Debug)]
pub struct FlockingConfig {
    /// Master switch; enabled by Boids mode, combinable with any other.
    pub enabled: bool,
    /// Neighbor scan radius. Zero or negative disables flocking entirely.
    pub radius: f32,
    /// Distance ratio below which neighbors separate.
    pub low_thresh: f32,
    /// Distance ratio above which neighbors attract.
    pub high_thresh: f32,
    /// Separation acceleration at unit distance.
    pub separation_strength: f32,
    /// Attraction acceleration toward far neighbors.
    pub attraction_strength: f32,
    /// Velocity-matching gain for the alignment band.
    pub alignment_strength: f32,
    /// Hard speed cap applied after all contributions.
    pub max_speed: f32,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 60.0,
            low_thresh: 0.1333,
            high_thresh: 0.6867,
            separation_strength: 500.0,
            attraction_strength: 50.0,
            alignment_strength: 20.0,
            max_speed: 80.0,
        }
    }
}

/// Run one flocking pass over all live particles.
///
/// `grid` is rebuilt from current positions; its buckets are scratch state
/// owned by the caller so the allocation is reused across frames.
pub fn flock(particles: &mut [Particle], cfg: &FlockingConfig, grid: &mut SpatialGrid, dt: f32) {
    if cfg.radius <= 0.0 || particles.len() < 2 {
        return;
    }
    grid.rebuild(particles.iter().map(|p| p.pos));

    let mut deltas = vec![Vec2::ZERO; particles.len()];
    for (i, p) in particles.iter().enumerate() {
        let mut dv = Vec2::ZERO;
        grid.for_each_candidate(p.pos, cfg.radius, |j| {
            let j = j as usize;
            if j == i {
                return;
            }
            let other = &particles[j];
            let offset = other.pos - p.pos;
            let dist = offset.length();
            if dist > cfg.radius {
                return;
            }
            let ratio = dist / cfg.radius;
            if ratio < cfg.low_thresh {
                // Inverse-distance push apart; coincident pairs get no
                // direction to separate along and are skipped.
                if dist > f32::EPSILON {
                    dv -= offset / dist * (cfg.separation_strength / dist);
                }
            } else if ratio > cfg.high_thresh {
                dv += offset / dist * cfg.attraction_strength;
            } else {
                dv += (other.vel - p.vel) * cfg.alignment_strength;
            }
        });
        deltas[i] = dv;
    }

    for (p, dv) in particles.iter_mut().zip(deltas) {
        p.vel += dv * dt;
        p.vel = p.vel.clamp_length_max(cfg.max_speed);
    }
}

/// Push apart any pair of particles closer than `repulse_dist`, independent
/// of the flocking bands. Strength falls off linearly to zero at the
/// threshold distance.
pub fn repulse(particles: &mut [Particle], repulse_dist: f32, grid: &mut SpatialGrid, dt: f32) {
    if repulse_dist <= 0.0 || particles.len() < 2 {
        return;
    }
    grid.rebuild(particles.iter().map(|p| p.pos));

    let mut deltas = vec![Vec2::ZERO; particles.len()];
    for (i, p) in particles.iter().enumerate() {
        let mut dv = Vec2::ZERO;
        grid.for_each_candidate(p.pos, repulse_dist, |j| {
            let j = j as usize;
            if j == i {
                return;
            }
            let offset = p.pos - particles[j].pos;
            let dist = offset.length();
            if dist < repulse_dist && dist > f32::EPSILON {
                dv += offset / dist * REPULSE_STRENGTH * (1.0 - dist / repulse_dist);
            }
        });
        deltas[i] = dv;
    }

    for (p, dv) in particles.iter_mut().zip(deltas) {
        p.vel += dv * dt;
    }
}
