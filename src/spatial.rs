//! Spatial hashing for neighbor queries.
//!
//! A uniform 2D bucket grid rebuilt once per frame. Neighbor-based passes
//! (flocking, inter-particle repulsion) use it as a broad-phase: a radius
//! query returns candidate indices from the overlapped cells, and the caller
//! applies the exact distance test. Candidate pruning never changes results
//! versus the brute-force O(n²) scan, because neighbor sets are
//! distance-thresholded.
//!
//! Pick a `cell_size` at least as large as the largest interaction radius so
//! a query touches at most the 3x3 cell neighborhood.

use glam::Vec2;

/// Uniform bucket grid over a `width` x `height` domain.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<u32>>,
}

impl SpatialGrid {
    /// Create a grid covering the domain with the given cell size.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        Self {
            cell_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        }
    }

    fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        let col = (pos.x / self.cell_size).floor().clamp(0.0, self.cols as f32 - 1.0) as usize;
        let row = (pos.y / self.cell_size).floor().clamp(0.0, self.rows as f32 - 1.0) as usize;
        (col, row)
    }

    /// Clear all buckets and re-insert the given positions. Index `i` of the
    /// iterator becomes the candidate index returned by queries.
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for (i, pos) in positions.into_iter().enumerate() {
            let (col, row) = self.cell_of(pos);
            self.buckets[row * self.cols + col].push(i as u32);
        }
    }

    /// Visit every candidate index whose cell overlaps the disk at `pos` with
    /// `radius`. Candidates are a superset of the true neighbors; the caller
    /// must distance-filter.
    pub fn for_each_candidate<F>(&self, pos: Vec2, radius: f32, mut f: F)
    where
        F: FnMut(u32),
    {
        let (c0, r0) = self.cell_of(pos - Vec2::splat(radius));
        let (c1, r1) = self.cell_of(pos + Vec2::splat(radius));
        for row in r0..=r1 {
            for col in c0..=c1 {
                for &i in &self.buckets[row * self.cols + col] {
                    f(i);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_cover_brute_force_neighbors() {
        let mut grid = SpatialGrid::new(100.0, 100.0, 10.0);
        let points: Vec<Vec2> = (0..50)
            .map(|i| {
                let x = (i * 7 % 100) as f32;
                let y = (i * 13 % 100) as f32;
                Vec2::new(x, y)
            })
            .collect();
        grid.rebuild(points.iter().copied());

        let query = Vec2::new(35.0, 42.0);
        let radius = 9.0;

        let mut candidates = Vec::new();
        grid.for_each_candidate(query, radius, |i| candidates.push(i as usize));

        for (i, p) in points.iter().enumerate() {
            if p.distance(query) <= radius {
                assert!(candidates.contains(&i), "missing neighbor {i}");
            }
        }
    }

    #[test]
    fn test_out_of_domain_positions_are_clamped() {
        let mut grid = SpatialGrid::new(50.0, 50.0, 10.0);
        grid.rebuild([Vec2::new(-20.0, -20.0), Vec2::new(500.0, 500.0)]);
        let mut seen = Vec::new();
        grid.for_each_candidate(Vec2::new(0.0, 0.0), 5.0, |i| seen.push(i));
        assert!(seen.contains(&0));
    }

    #[test]
    fn test_rebuild_clears_previous_frame() {
        let mut grid = SpatialGrid::new(50.0, 50.0, 10.0);
        grid.rebuild([Vec2::new(5.0, 5.0)]);
        grid.rebuild(std::iter::empty());
        let mut count = 0;
        grid.for_each_candidate(Vec2::new(5.0, 5.0), 20.0, |_| count += 1);
        assert_eq!(count, 0);
    }
}
