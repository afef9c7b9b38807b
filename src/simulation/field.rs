use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::{
    CENTER_KEEP_PROBABILITY, EDGE_FALLOFF, EDGE_KEEP_BONUS, JITTER_FRACTION,
    OPACITY_BANDS,
};
use crate::simulation::dot::Dot;

/// The dot layout for one viewport size
pub struct DotField {
    pub dots: Vec<Dot>,
    pub width: f32,
    pub height: f32,
}

impl DotField {
    /// Generate a field for the given logical viewport
    pub fn with_rng<R: Rng + ?Sized>(width: f32, height: f32, spacing: f32, rng: &mut R) -> Self {
        Self {
            dots: generate_dots(width, height, spacing, rng),
            width,
            height,
        }
    }

    pub fn empty() -> Self {
        Self {
            dots: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

/// Normalized distance from the viewport center, clamped to [0, 1].
/// Reaches 1 at `EDGE_FALLOFF` of the center-to-corner distance.
pub fn edge_factor(point: Vec2, center: Vec2, max_distance: f32) -> f32 {
    if max_distance <= 0.0 {
        return 0.0;
    }
    (point.distance(center) / (max_distance * EDGE_FALLOFF)).min(1.0)
}

/// Chance a grid point survives: sparse in the middle, dense at the edges
pub fn keep_probability(edge_factor: f32) -> f32 {
    (CENTER_KEEP_PROBABILITY + EDGE_KEEP_BONUS * edge_factor).min(1.0)
}

/// Lay out dots on a `spacing` grid covering `width` x `height`.
///
/// Rows and columns run from 0 to `ceil(extent / spacing)` inclusive so the
/// far edges are covered. Points are randomly dropped toward the center,
/// jittered by up to `spacing * JITTER_FRACTION` per axis, and assigned a
/// banded base opacity and a random pulse phase.
pub fn generate_dots<R: Rng + ?Sized>(width: f32, height: f32, spacing: f32, rng: &mut R) -> Vec<Dot> {
    if !(width > 0.0 && height > 0.0 && spacing > 0.0) {
        return Vec::new();
    }

    let cols = (width / spacing).ceil() as u32;
    let rows = (height / spacing).ceil() as u32;
    let center = Vec2::new(width / 2.0, height / 2.0);
    let max_distance = center.length();
    let jitter = spacing * JITTER_FRACTION;

    let mut dots = Vec::with_capacity(((rows + 1) * (cols + 1)) as usize);

    for row in 0..=rows {
        for col in 0..=cols {
            let grid_point = Vec2::new(col as f32 * spacing, row as f32 * spacing);
            let edge = edge_factor(grid_point, center, max_distance);

            if rng.gen::<f32>() > keep_probability(edge) {
                continue;
            }

            let jitter_offset = Vec2::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * jitter,
                (rng.gen::<f32>() - 0.5) * 2.0 * jitter,
            );

            let band = OPACITY_BANDS[((row + col) % 3) as usize];
            let phase_offset = rng.gen_range(0.0..TAU);

            dots.push(Dot::new(grid_point + jitter_offset, band * edge, phase_offset));
        }
    }

    dots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SPACING: f32 = 12.0;

    fn grid_index(dot: &Dot) -> (u32, u32) {
        let col = (dot.base.x / SPACING).round() as u32;
        let row = (dot.base.y / SPACING).round() as u32;
        (row, col)
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_dots(0.0, 0.0, SPACING, &mut rng).is_empty());
        assert!(generate_dots(800.0, 0.0, SPACING, &mut rng).is_empty());
        assert!(generate_dots(0.0, 600.0, SPACING, &mut rng).is_empty());
    }

    #[test]
    fn test_count_within_grid_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let dots = generate_dots(120.0, 60.0, SPACING, &mut rng);
        // 11 columns x 6 rows including the far edges
        assert!(dots.len() <= 11 * 6);
        assert!(!dots.is_empty());
    }

    #[test]
    fn test_jitter_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        let dots = generate_dots(640.0, 480.0, SPACING, &mut rng);
        let bound = SPACING * JITTER_FRACTION + 1e-3;
        for dot in &dots {
            let (row, col) = grid_index(dot);
            let ideal = Vec2::new(col as f32 * SPACING, row as f32 * SPACING);
            let delta = (dot.base - ideal).abs();
            assert!(delta.x <= bound && delta.y <= bound, "jitter {:?} exceeds {}", delta, bound);
        }
    }

    #[test]
    fn test_opacity_banding() {
        let (width, height) = (300.0, 200.0);
        let mut rng = StdRng::seed_from_u64(4);
        let dots = generate_dots(width, height, SPACING, &mut rng);
        let center = Vec2::new(width / 2.0, height / 2.0);
        for dot in &dots {
            let (row, col) = grid_index(dot);
            let ideal = Vec2::new(col as f32 * SPACING, row as f32 * SPACING);
            let expected = OPACITY_BANDS[((row + col) % 3) as usize]
                * edge_factor(ideal, center, center.length());
            assert!((dot.base_opacity - expected).abs() < 1e-5);
            assert!((0.0..=1.0).contains(&dot.base_opacity));
        }
    }

    #[test]
    fn test_phase_range_and_rest_state() {
        let mut rng = StdRng::seed_from_u64(5);
        for dot in generate_dots(400.0, 400.0, SPACING, &mut rng) {
            assert!(dot.phase_offset >= 0.0 && dot.phase_offset < TAU);
            assert_eq!(dot.offset, Vec2::ZERO);
            assert_eq!(dot.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_density_law() {
        let (width, height) = (1200.0, 1200.0);
        let center = Vec2::new(width / 2.0, height / 2.0);
        let max_distance = center.length();
        let cells = (width / SPACING).ceil() as u32;

        let mut center_cells = 0usize;
        let mut corner_cells = 0usize;
        for row in 0..=cells {
            for col in 0..=cells {
                let p = Vec2::new(col as f32 * SPACING, row as f32 * SPACING);
                let edge = edge_factor(p, center, max_distance);
                if edge < 0.1 {
                    center_cells += 1;
                } else if edge >= 1.0 {
                    corner_cells += 1;
                }
            }
        }

        let generations = 50;
        let mut rng = StdRng::seed_from_u64(6);
        let mut center_kept = 0usize;
        let mut corner_kept = 0usize;
        for _ in 0..generations {
            for dot in generate_dots(width, height, SPACING, &mut rng) {
                let (row, col) = grid_index(&dot);
                let p = Vec2::new(col as f32 * SPACING, row as f32 * SPACING);
                let edge = edge_factor(p, center, max_distance);
                if edge < 0.1 {
                    center_kept += 1;
                } else if edge >= 1.0 {
                    corner_kept += 1;
                }
            }
        }

        let center_fraction = center_kept as f64 / (center_cells * generations) as f64;
        let corner_fraction = corner_kept as f64 / (corner_cells * generations) as f64;
        assert!(
            (0.37..0.52).contains(&center_fraction),
            "center survival {} should be near 0.4",
            center_fraction
        );
        assert_eq!(corner_fraction, 1.0);
    }

    #[test]
    fn test_keep_probability_curve() {
        assert!((keep_probability(0.0) - 0.4).abs() < 1e-6);
        assert!((keep_probability(0.5) - 0.7).abs() < 1e-6);
        assert_eq!(keep_probability(1.0), 1.0);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = DotField::with_rng(200.0, 100.0, SPACING, &mut StdRng::seed_from_u64(7));
        let b = DotField::with_rng(200.0, 100.0, SPACING, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.dots, b.dots);
        assert_eq!(a.len(), b.len());
    }
}
