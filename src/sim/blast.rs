//! Expanding blast rings of a detonating alien
//!
//! Each tick emits the next ring: a rasterized circle of radius `r` whose
//! row gaps toward the center column are filled, so that the union of all
//! rings emitted so far covers a solid disc. A single occupancy bitmap spans
//! the whole sequence; no cell is emitted twice.

use std::f32::consts::SQRT_2;

use glam::{IVec2, Vec2};

#[derive(Debug, Clone)]
pub struct BlastRing {
    /// Center of cell the detonation started in
    origin: Vec2,
    max_radius: i32,
    next_radius: i32,
    /// Bitmap edge length: `2 * max_radius + 1`
    side: i32,
    marked: Vec<bool>,
}

impl BlastRing {
    pub fn new(origin: Vec2, max_radius: i32) -> Self {
        let max_radius = max_radius.max(0);
        let side = 2 * max_radius + 1;
        Self {
            origin,
            max_radius,
            next_radius: 0,
            side,
            marked: vec![false; (side * side) as usize],
        }
    }

    pub fn next_radius(&self) -> i32 {
        self.next_radius
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_radius > self.max_radius
    }

    /// World positions of the next ring, or `None` once the last ring is out
    pub fn next_ring(&mut self) -> Option<Vec<Vec2>> {
        if self.is_exhausted() {
            return None;
        }
        let r = self.next_radius;
        self.next_radius += 1;
        let origin = self.origin;
        Some(
            self.ring_offsets(r)
                .into_iter()
                .map(|offset| origin + offset.as_vec2())
                .collect(),
        )
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        let x = cell.x + self.max_radius;
        let y = cell.y + self.max_radius;
        if x < 0 || y < 0 || x >= self.side || y >= self.side {
            return None;
        }
        Some((y * self.side + x) as usize)
    }

    // Out-of-range cells count as marked
    fn is_marked(&self, cell: IVec2) -> bool {
        self.index(cell).is_none_or(|i| self.marked[i])
    }

    /// Marks the cell; false if it was already taken or out of range
    fn mark(&mut self, cell: IVec2) -> bool {
        match self.index(cell) {
            Some(i) if !self.marked[i] => {
                self.marked[i] = true;
                true
            }
            _ => false,
        }
    }

    fn ring_offsets(&mut self, r: i32) -> Vec<IVec2> {
        let mut emitted = Vec::new();
        if r == 0 {
            if self.mark(IVec2::ZERO) {
                emitted.push(IVec2::ZERO);
            }
            return emitted;
        }

        for point in octant_points(r) {
            if self.mark(point) {
                emitted.push(point);
            }
        }

        // Close the gap between each new point and what is already marked
        // on its row, walking toward the center column.
        let seeds = emitted.len();
        for i in 0..seeds {
            let seed = emitted[i];
            if seed.x == 0 {
                continue;
            }
            let step = if seed.x < 0 { 1 } else { -1 };
            let mut x = seed.x + step;
            while x != 0 {
                let cell = IVec2::new(x, seed.y);
                if self.is_marked(cell) {
                    break;
                }
                self.mark(cell);
                emitted.push(cell);
                x += step;
            }
        }
        emitted
    }
}

/// Rasterized circle of radius `r` centered on the origin, 8-fold symmetric
///
/// One octant is sampled column by column for `x` in `0..=floor(r/√2)` with
/// `y = round(sqrt(r² - x²))`, then mirrored and transposed. The result may
/// contain duplicates where octants meet.
pub fn octant_points(r: i32) -> Vec<IVec2> {
    if r <= 0 {
        return vec![IVec2::ZERO];
    }
    let span = (r as f32 / SQRT_2).floor() as i32;
    let r2 = (r * r) as f32;
    let mut points = Vec::with_capacity(8 * (span as usize + 1));
    for x in 0..=span {
        let y = (r2 - (x * x) as f32).sqrt().round() as i32;
        for (px, py) in [(x, y), (-x, y), (x, -y), (-x, -y)] {
            points.push(IVec2::new(px, py));
        }
        for (px, py) in [(y, x), (-y, x), (y, -x), (-y, -x)] {
            points.push(IVec2::new(px, py));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BLAST_MAX_RADIUS;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashSet};

    fn offsets(ring: &[Vec2], origin: Vec2) -> Vec<IVec2> {
        ring.iter().map(|p| (*p - origin).round().as_ivec2()).collect()
    }

    #[test]
    fn test_radius_zero_is_the_origin() {
        let origin = Vec2::new(10.5, 4.5);
        let mut blast = BlastRing::new(origin, 13);
        assert_eq!(blast.next_ring(), Some(vec![origin]));
        assert_eq!(blast.next_radius(), 1);
    }

    #[test]
    fn test_radius_one_is_a_plus_sign() {
        let mut blast = BlastRing::new(Vec2::ZERO, 13);
        blast.next_ring();
        let ring: HashSet<IVec2> = offsets(&blast.next_ring().unwrap(), Vec2::ZERO)
            .into_iter()
            .collect();
        let expected: HashSet<IVec2> = [(0, 1), (0, -1), (1, 0), (-1, 0)]
            .into_iter()
            .map(IVec2::from)
            .collect();
        assert_eq!(ring, expected);
    }

    #[test]
    fn test_radius_two_fills_row_gaps() {
        let mut blast = BlastRing::new(Vec2::ZERO, 13);
        blast.next_ring();
        blast.next_ring();
        let ring = offsets(&blast.next_ring().unwrap(), Vec2::ZERO);
        // The middle row gets (±2, 0) as seeds; the rows at y = ±1 need
        // their (±1, ±1) cells filled on the way in from (±2, ±1).
        for cell in [(2, 0), (-2, 0), (1, 1), (-1, -1), (2, 1), (0, 2)] {
            assert!(ring.contains(&IVec2::from(cell)), "missing {cell:?}");
        }
        assert!(!ring.contains(&IVec2::ZERO));
    }

    #[test]
    fn test_exhausts_after_max_radius() {
        let mut blast = BlastRing::new(Vec2::ZERO, 13);
        for _ in 0..=13 {
            assert!(blast.next_ring().is_some());
        }
        assert!(blast.is_exhausted());
        assert_eq!(blast.next_ring(), None);
    }

    #[test]
    fn test_octant_points_rotation_symmetry() {
        for r in 1..=13 {
            let points: HashSet<IVec2> = octant_points(r).into_iter().collect();
            for p in &points {
                assert!(points.contains(&IVec2::new(-p.y, p.x)), "r={r} p={p}");
            }
        }
    }

    #[test]
    fn test_full_detonation_is_rotation_symmetric() {
        let rotated_away = |cells: &HashSet<IVec2>| {
            cells
                .iter()
                .filter(|c| !cells.contains(&IVec2::new(-c.y, c.x)))
                .count()
        };

        let mut blast = BlastRing::new(Vec2::ZERO, BLAST_MAX_RADIUS);
        let mut disc = HashSet::new();
        let mut lopsided = Vec::new();
        while let Some(ring) = blast.next_ring() {
            disc.extend(offsets(&ring, Vec2::ZERO));
            let broken = rotated_away(&disc);
            if broken > 0 {
                lopsided.push((blast.next_radius() - 1, broken));
            }
        }

        assert_eq!(disc.len(), 569);
        assert_eq!(rotated_away(&disc), 0);
        // Rounding at the octant seam leaves 4 cells for ring 8 to fill
        assert_eq!(lopsided, vec![(7, 4)]);
    }

    proptest! {
        #[test]
        fn prop_rings_never_repeat_a_cell(max_radius in 0i32..=20) {
            let mut blast = BlastRing::new(Vec2::ZERO, max_radius);
            let mut seen = HashSet::new();
            while let Some(ring) = blast.next_ring() {
                for cell in offsets(&ring, Vec2::ZERO) {
                    prop_assert!(seen.insert(cell), "repeated {}", cell);
                }
            }
        }

        #[test]
        fn prop_cumulative_rows_are_contiguous(max_radius in 1i32..=20) {
            let mut blast = BlastRing::new(Vec2::ZERO, max_radius);
            let mut rows: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
            while let Some(ring) = blast.next_ring() {
                for cell in offsets(&ring, Vec2::ZERO) {
                    rows.entry(cell.y).or_default().push(cell.x);
                }
                for (y, xs) in &rows {
                    let min = xs.iter().min().copied().unwrap_or(0);
                    let max = xs.iter().max().copied().unwrap_or(0);
                    prop_assert_eq!((max - min + 1) as usize, xs.len(), "row {} has a hole", y);
                }
            }
        }

        #[test]
        fn prop_each_ring_mirrors_across_both_axes(radius in 0i32..=13) {
            let mut blast = BlastRing::new(Vec2::ZERO, 13);
            let mut ring = Vec::new();
            for _ in 0..=radius {
                ring = offsets(&blast.next_ring().unwrap(), Vec2::ZERO);
            }
            let cells: HashSet<IVec2> = ring.into_iter().collect();
            for c in &cells {
                prop_assert!(cells.contains(&IVec2::new(-c.x, c.y)));
                prop_assert!(cells.contains(&IVec2::new(c.x, -c.y)));
            }
        }
    }
}
