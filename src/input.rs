//! External signal sources consumed by the simulation.
//!
//! The host feeds three read-only sources into every
//! [`update`](crate::ParticleSystem::update) call:
//!
//! - [`Marker`] - a tracked infrared point-light target
//! - [`Contour`] - closed boundary polylines extracted from a depth image,
//!   optionally carrying per-region velocity and area samples
//! - [`Fluid`] - a velocity field queryable by position; [`VelocityGrid`] is
//!   the provided grid-backed implementation with bilinear sampling
//!
//! Acquisition, filtering and tracking happen upstream; these types only
//! describe the data the simulation reads each frame.

use glam::Vec2;

/// A tracked infrared marker.
///
/// Identity (`label`) is maintained by the upstream tracker and stays stable
/// for the lifetime of the physical target.
#[derive(Clone, Debug)]
pub struct Marker {
    /// Raw position this frame.
    pub position: Vec2,
    /// Temporally smoothed position.
    pub smooth_position: Vec2,
    /// Instantaneous motion estimate (world units per second).
    pub velocity: Vec2,
    /// Stable identity label assigned by the tracker.
    pub label: u32,
    /// Optical-flow vector associated with the marker, zero when the tracker
    /// provides none.
    pub flow: Vec2,
}

impl Marker {
    /// A stationary marker at `position` with the given label.
    pub fn at(position: Vec2, label: u32) -> Self {
        Self {
            position,
            smooth_position: position,
            velocity: Vec2::ZERO,
            label,
            flow: Vec2::ZERO,
        }
    }
}

/// The marker closest to `pos` within `max_dist`, or `None` when nothing is
/// in range. An empty query is a sentinel, never a fault.
pub fn closest_marker(markers: &[Marker], pos: Vec2, max_dist: f32) -> Option<&Marker> {
    let mut best: Option<(&Marker, f32)> = None;
    for m in markers {
        let d = m.position.distance(pos);
        if d <= max_dist && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((m, d));
        }
    }
    best.map(|(m, _)| m)
}

/// A closed boundary curve. The last vertex connects back to the first.
#[derive(Clone, Debug, Default)]
pub struct Polyline {
    /// Vertices in order.
    pub points: Vec<Vec2>,
}

impl Polyline {
    /// Build a closed polyline from vertices.
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Iterate the closing edges, including last -> first.
    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// The closest point on the boundary to `p`, with its distance.
    ///
    /// Returns `None` for degenerate polylines (fewer than two vertices).
    pub fn closest_point(&self, p: Vec2) -> Option<(Vec2, f32)> {
        if self.points.len() < 2 {
            return None;
        }
        let mut best = (Vec2::ZERO, f32::INFINITY);
        for (a, b) in self.edges() {
            let q = closest_point_on_segment(p, a, b);
            let d = q.distance(p);
            if d < best.1 {
                best = (q, d);
            }
        }
        Some(best)
    }

    /// Whether `p` lies inside the closed boundary (even-odd rule).
    pub fn contains(&self, p: Vec2) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Closest point to `p` on the segment `a`-`b`.
fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Result of a nearest-boundary query against a [`Contour`].
#[derive(Clone, Copy, Debug)]
pub struct ContourHit {
    /// Nearest point on the boundary.
    pub point: Vec2,
    /// Index of the region (polyline) the point belongs to.
    pub region: usize,
    /// Distance from the query position.
    pub distance: f32,
}

/// Depth-contour input: one or more closed regions with optional per-region
/// velocity and area metadata.
#[derive(Clone, Debug, Default)]
pub struct Contour {
    /// Closed boundary per detected region.
    pub polylines: Vec<Polyline>,
    /// Average motion per region; empty when the extractor provides none.
    pub velocities: Vec<Vec2>,
    /// Enclosed area per region; empty when the extractor provides none.
    pub areas: Vec<f32>,
}

impl Contour {
    /// A contour with boundaries only, no metadata.
    pub fn from_polylines(polylines: Vec<Polyline>) -> Self {
        Self {
            polylines,
            velocities: Vec::new(),
            areas: Vec::new(),
        }
    }

    /// Whether any region exists this frame.
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// The nearest boundary point across all regions within `max_dist`.
    pub fn closest_point(&self, p: Vec2, max_dist: f32) -> Option<ContourHit> {
        let mut best: Option<ContourHit> = None;
        for (region, poly) in self.polylines.iter().enumerate() {
            if let Some((point, distance)) = poly.closest_point(p) {
                if distance <= max_dist && best.map_or(true, |b| distance < b.distance) {
                    best = Some(ContourHit {
                        point,
                        region,
                        distance,
                    });
                }
            }
        }
        best
    }

    /// Index of the region containing `p`, if any.
    pub fn region_containing(&self, p: Vec2) -> Option<usize> {
        self.polylines.iter().position(|poly| poly.contains(p))
    }

    /// Motion sample for a region, zero when no samples were provided.
    pub fn velocity_of(&self, region: usize) -> Vec2 {
        self.velocities.get(region).copied().unwrap_or(Vec2::ZERO)
    }
}

/// A 2D velocity field queryable by position.
///
/// The trait is the seam between the simulation and whatever produces the
/// field (an external fluid solver, optical flow, a procedural source).
pub trait Fluid {
    /// Velocity at `pos` in world units per second.
    fn velocity_at(&self, pos: Vec2) -> Vec2;
}

/// A fluid field that is zero everywhere. Stand-in when the host has no
/// solver running.
#[derive(Clone, Copy, Debug, Default)]
pub struct StillFluid;

impl Fluid for StillFluid {
    fn velocity_at(&self, _pos: Vec2) -> Vec2 {
        Vec2::ZERO
    }
}

/// Grid-backed velocity field covering `width` x `height` with bilinear
/// sampling between cell centers.
#[derive(Clone, Debug)]
pub struct VelocityGrid {
    cols: usize,
    rows: usize,
    width: f32,
    height: f32,
    cells: Vec<Vec2>,
}

impl VelocityGrid {
    /// An all-zero field with `cols` x `rows` cells over the given extent.
    pub fn new(cols: usize, rows: usize, width: f32, height: f32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            width,
            height,
            cells: vec![Vec2::ZERO; cols * rows],
        }
    }

    /// Set the velocity of the cell containing `pos`. Positions outside the
    /// extent are ignored.
    pub fn set_velocity(&mut self, pos: Vec2, vel: Vec2) {
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > self.width || pos.y > self.height {
            return;
        }
        let col = ((pos.x / self.width * self.cols as f32) as usize).min(self.cols - 1);
        let row = ((pos.y / self.height * self.rows as f32) as usize).min(self.rows - 1);
        self.cells[row * self.cols + col] = vel;
    }

    fn cell(&self, col: usize, row: usize) -> Vec2 {
        self.cells[row.min(self.rows - 1) * self.cols + col.min(self.cols - 1)]
    }
}

impl Fluid for VelocityGrid {
    fn velocity_at(&self, pos: Vec2) -> Vec2 {
        let fx = (pos.x / self.width * self.cols as f32 - 0.5).clamp(0.0, self.cols as f32 - 1.0);
        let fy = (pos.y / self.height * self.rows as f32 - 0.5).clamp(0.0, self.rows as f32 - 1.0);
        let (c0, r0) = (fx as usize, fy as usize);
        let (tx, ty) = (fx - c0 as f32, fy - r0 as f32);
        let top = self.cell(c0, r0).lerp(self.cell(c0 + 1, r0), tx);
        let bottom = self.cell(c0, r0 + 1).lerp(self.cell(c0 + 1, r0 + 1), tx);
        top.lerp(bottom, ty)
    }
}
