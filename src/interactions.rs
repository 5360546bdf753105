//! Mapping external signals onto per-particle forces.
//!
//! Each interaction is gated by its own flag and contributes additively; a
//! particle may be affected by several at once. When nothing lies within the
//! relevant radius the interaction contributes zero force - an empty query
//! is a sentinel, never a fault.
//!
//! | Flag | Effect |
//! |------|--------|
//! | `seek` | Steer toward the nearest marker |
//! | `repulse` / `attract` | Inverse-distance push from / pull toward the nearest input point |
//! | `gravity` | Extra downward force while touched by a marker/contour region |
//! | `bounce` | Collide with the depth contour as an extra surface |
//! | `flow` | Nudge velocity by the nearest marker's optical-flow vector |
//! | `fluid` | Nudge velocity by the fluid field sampled at the particle |
//! | `return_to_origin` | Pull back toward the birth position |
//!
//! `markers_input` / `contour_input` select which source feeds the
//! positional interactions; with both set, the nearest candidate wins.

use crate::input::{closest_marker, Contour, Fluid, Marker};
use crate::particle::Particle;
use glam::Vec2;

/// Interaction flags and strengths.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
    /// Master switch for all source-driven interactions. Return-to-origin
    /// needs no source and is not gated by it.
    pub interact: bool,
    /// Markers feed the positional interactions.
    pub markers_input: bool,
    /// The depth contour feeds the positional interactions.
    pub contour_input: bool,
    /// Radius of influence around markers and contour points.
    pub marker_radius: f32,
    /// Steer toward the nearest marker.
    pub seek: bool,
    /// Push away from the nearest input point.
    pub repulse: bool,
    /// Pull toward the nearest input point.
    pub attract: bool,
    /// Downward force while touched by the input.
    pub gravity: bool,
    /// Bounce off the depth contour boundary.
    pub bounce: bool,
    /// Follow the nearest marker's optical flow.
    pub flow: bool,
    /// Follow the fluid velocity field.
    pub fluid: bool,
    /// Pull back toward the birth position.
    pub return_to_origin: bool,
    /// Scale of the inverse-distance repulse/attract force.
    pub interaction_strength: f32,
    /// Proportional gain of the seek steering.
    pub seek_strength: f32,
    /// Downward acceleration applied while touched.
    pub gravity_strength: f32,
    /// Gain on the optical-flow nudge.
    pub flow_strength: f32,
    /// Gain on the fluid-field nudge.
    pub fluid_strength: f32,
    /// Spring constant of the return-to-origin pull.
    pub origin_strength: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interact: false,
            markers_input: true,
            contour_input: false,
            marker_radius: 250.0,
            seek: false,
            repulse: false,
            attract: false,
            gravity: false,
            bounce: false,
            flow: false,
            fluid: false,
            return_to_origin: false,
            interaction_strength: 3000.0,
            seek_strength: 4.0,
            gravity_strength: 500.0,
            flow_strength: 1.0,
            fluid_strength: 1.0,
            origin_strength: 5.0,
        }
    }
}

/// Nearest input point to `pos` among the enabled sources, with its
/// distance. With both sources enabled, the nearest candidate wins.
fn nearest_input(
    cfg: &InteractionConfig,
    pos: Vec2,
    markers: &[Marker],
    contour: &Contour,
) -> Option<(Vec2, f32)> {
    let mut best: Option<(Vec2, f32)> = None;
    if cfg.markers_input {
        if let Some(m) = closest_marker(markers, pos, cfg.marker_radius) {
            let d = m.position.distance(pos);
            best = Some((m.position, d));
        }
    }
    if cfg.contour_input {
        if let Some(hit) = contour.closest_point(pos, cfg.marker_radius) {
            if best.map_or(true, |(_, d)| hit.distance < d) {
                best = Some((hit.point, hit.distance));
            }
        }
    }
    best
}

/// Accumulate all enabled interaction forces for one particle.
///
/// Forces land in the particle's accumulator and are integrated by the
/// physics step; the contour bounce adjusts velocity directly since it is a
/// collision, not a force.
pub fn apply(
    p: &mut Particle,
    cfg: &InteractionConfig,
    markers: &[Marker],
    contour: &Contour,
    fluid: &dyn Fluid,
) {
    if cfg.return_to_origin {
        p.force += (p.origin - p.pos) * cfg.origin_strength;
    }
    if !cfg.interact {
        return;
    }

    if cfg.seek && cfg.markers_input {
        if let Some(m) = closest_marker(markers, p.pos, cfg.marker_radius) {
            // Steer toward the smoothed position so tracking jitter does
            // not whip the particles around.
            p.force += (m.smooth_position - p.pos) * cfg.seek_strength;
        }
    }

    if cfg.repulse || cfg.attract || cfg.gravity {
        if let Some((point, dist)) = nearest_input(cfg, p.pos, markers, contour) {
            let away = (p.pos - point).normalize_or_zero();
            let magnitude = cfg.interaction_strength / dist.max(1.0);
            if cfg.repulse {
                p.force += away * magnitude;
            }
            if cfg.attract {
                p.force -= away * magnitude;
            }
            if cfg.gravity {
                p.force += Vec2::new(0.0, cfg.gravity_strength);
            }
        }
    }

    if cfg.bounce {
        if let Some(hit) = contour.closest_point(p.pos, p.radius) {
            let normal = (p.pos - hit.point).normalize_or_zero();
            let approach = p.vel.dot(normal);
            if normal != Vec2::ZERO && approach < 0.0 {
                p.vel -= 2.0 * approach * normal;
            }
        }
    }

    if cfg.flow && cfg.markers_input {
        if let Some(m) = closest_marker(markers, p.pos, cfg.marker_radius) {
            p.force += m.flow * cfg.flow_strength;
        }
    }

    if cfg.fluid {
        p.force += fluid.velocity_at(p.pos) * cfg.fluid_strength;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Polyline, StillFluid, VelocityGrid};
    use glam::Vec3;

    fn particle_at(pos: Vec2) -> Particle {
        Particle::new(0, pos, Vec2::ZERO, Vec3::ONE, 5.0, 10.0)
    }

    fn enabled() -> InteractionConfig {
        InteractionConfig {
            interact: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_candidate_contributes_zero_force() {
        let cfg = InteractionConfig {
            seek: true,
            repulse: true,
            attract: true,
            gravity: true,
            ..enabled()
        };
        let mut p = particle_at(Vec2::new(0.0, 0.0));
        let markers = [Marker::at(Vec2::new(1000.0, 1000.0), 1)];
        apply(&mut p, &cfg, &markers, &Contour::default(), &StillFluid);
        assert_eq!(p.force, Vec2::ZERO);
    }

    #[test]
    fn test_seek_pulls_toward_marker() {
        let cfg = InteractionConfig {
            seek: true,
            ..enabled()
        };
        let mut p = particle_at(Vec2::new(0.0, 0.0));
        let markers = [Marker::at(Vec2::new(100.0, 0.0), 1)];
        apply(&mut p, &cfg, &markers, &Contour::default(), &StillFluid);
        assert!(p.force.x > 0.0);
        assert_eq!(p.force.y, 0.0);
    }

    #[test]
    fn test_repulse_and_attract_cancel_when_both_set() {
        let cfg = InteractionConfig {
            repulse: true,
            attract: true,
            ..enabled()
        };
        let mut p = particle_at(Vec2::new(0.0, 0.0));
        let markers = [Marker::at(Vec2::new(50.0, 0.0), 1)];
        apply(&mut p, &cfg, &markers, &Contour::default(), &StillFluid);
        assert!(p.force.length() < 1e-4);
    }

    #[test]
    fn test_repulse_points_away_from_marker() {
        let cfg = InteractionConfig {
            repulse: true,
            ..enabled()
        };
        let mut p = particle_at(Vec2::new(0.0, 0.0));
        let markers = [Marker::at(Vec2::new(50.0, 0.0), 1)];
        apply(&mut p, &cfg, &markers, &Contour::default(), &StillFluid);
        assert!(p.force.x < 0.0);
    }

    #[test]
    fn test_touch_gravity_only_within_radius() {
        let cfg = InteractionConfig {
            gravity: true,
            marker_radius: 20.0,
            ..enabled()
        };
        let markers = [Marker::at(Vec2::new(0.0, 0.0), 1)];

        let mut touched = particle_at(Vec2::new(10.0, 0.0));
        apply(&mut touched, &cfg, &markers, &Contour::default(), &StillFluid);
        assert!(touched.force.y > 0.0);

        let mut free = particle_at(Vec2::new(100.0, 0.0));
        apply(&mut free, &cfg, &markers, &Contour::default(), &StillFluid);
        assert_eq!(free.force, Vec2::ZERO);
    }

    #[test]
    fn test_contour_bounce_reflects_velocity() {
        let cfg = InteractionConfig {
            bounce: true,
            ..enabled()
        };
        let contour = Contour::from_polylines(vec![Polyline::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ])]);
        // Approaching the bottom edge from outside, within one radius.
        let mut p = particle_at(Vec2::new(50.0, -3.0));
        p.vel = Vec2::new(0.0, 10.0);
        apply(&mut p, &cfg, &[], &contour, &StillFluid);
        assert!(p.vel.y < 0.0);
    }

    #[test]
    fn test_flow_nudges_with_marker_flow() {
        let cfg = InteractionConfig {
            flow: true,
            ..enabled()
        };
        let mut m = Marker::at(Vec2::new(10.0, 0.0), 1);
        m.flow = Vec2::new(0.0, -30.0);
        let mut p = particle_at(Vec2::new(0.0, 0.0));
        apply(&mut p, &cfg, &[m], &Contour::default(), &StillFluid);
        assert!(p.force.y < 0.0);
    }

    #[test]
    fn test_fluid_advects_from_field() {
        let cfg = InteractionConfig {
            fluid: true,
            ..enabled()
        };
        let mut field = VelocityGrid::new(4, 4, 100.0, 100.0);
        for row in 0..4 {
            for col in 0..4 {
                field.set_velocity(
                    Vec2::new(col as f32 * 25.0 + 12.5, row as f32 * 25.0 + 12.5),
                    Vec2::new(7.0, 0.0),
                );
            }
        }
        let mut p = particle_at(Vec2::new(50.0, 50.0));
        apply(&mut p, &cfg, &[], &Contour::default(), &field);
        assert!((p.force.x - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_return_to_origin_ignores_master_switch() {
        let cfg = InteractionConfig {
            interact: false,
            return_to_origin: true,
            ..Default::default()
        };
        let mut p = particle_at(Vec2::new(0.0, 0.0));
        p.pos = Vec2::new(10.0, 0.0);
        apply(&mut p, &cfg, &[], &Contour::default(), &StillFluid);
        assert!(p.force.x < 0.0);
    }
}
