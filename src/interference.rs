use std::f64::consts::TAU;

use rayon::prelude::*;

use crate::types::InterferometerParams;

/// Upper bound of the two-beam intensity `2 (1 + cos phi)`.
pub const INTENSITY_MAX: f64 = 4.0;

/// Square sampling of the observation plane, built once and never mutated.
///
/// Row `j` holds points at `y = coords[j]`, column `i` points at
/// `x = coords[i]`, so row 0 is the bottom edge of the plane.
pub struct SpatialGrid {
    resolution: usize,
    coords: Vec<f64>,
    radius_sq: Vec<f64>,
}

impl SpatialGrid {
    pub fn new(resolution: usize, half_extent: f64) -> Self {
        debug_assert!(resolution >= 2, "grid needs at least two samples per axis");
        let coords = linspace(-half_extent, half_extent, resolution);

        let mut radius_sq = Vec::with_capacity(resolution * resolution);
        for &y in &coords {
            for &x in &coords {
                radius_sq.push(x * x + y * y);
            }
        }

        Self {
            resolution,
            coords,
            radius_sq,
        }
    }

    pub fn from_params(params: &InterferometerParams) -> Self {
        Self::new(params.resolution, params.half_extent)
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn point_count(&self) -> usize {
        self.radius_sq.len()
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// First and last coordinate along either axis, in metres.
    pub fn bounds(&self) -> (f64, f64) {
        match (self.coords().first(), self.coords().last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 0.0),
        }
    }

    pub fn radius_sq(&self) -> &[f64] {
        &self.radius_sq
    }
}

fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let step = (stop - start) / count.saturating_sub(1).max(1) as f64;
    let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    if let Some(last) = values.last_mut() {
        *last = stop;
    }
    values
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSample {
    pub intensity: f64,
    pub visibility: f64,
}

/// Closed-form two-beam interference with a linear coherence envelope.
///
/// `aperture` and `coherence_length` enter the formula as plain numbers
/// alongside lengths in metres; the model is a toy and keeps them that way.
#[derive(Clone, Copy, Debug)]
pub struct InterferenceModel {
    wavelength: f64,
    aperture: f64,
    coherence_length: f64,
}

impl InterferenceModel {
    pub fn from_params(params: &InterferometerParams) -> Self {
        Self {
            wavelength: params.wavelength,
            aperture: params.aperture,
            coherence_length: params.coherence_length,
        }
    }

    /// Optical path delta `2d (1 - r^2 / D^2)` at squared radius `radius_sq`.
    pub fn optical_delta(&self, d: f64, radius_sq: f64) -> f64 {
        2.0 * d * (1.0 - radius_sq / (self.aperture * self.aperture))
    }

    pub fn base_intensity(&self, delta: f64) -> f64 {
        let delta_phi = (TAU / self.wavelength) * delta;
        2.0 * (1.0 + delta_phi.cos())
    }

    pub fn visibility(&self, delta: f64) -> f64 {
        (1.0 - delta.abs() / self.coherence_length).clamp(0.0, 1.0)
    }

    pub fn sample(&self, d: f64, radius_sq: f64) -> PointSample {
        let delta = self.optical_delta(d, radius_sq);
        let visibility = self.visibility(delta);
        PointSample {
            intensity: visibility * self.base_intensity(delta),
            visibility,
        }
    }

    pub fn compute(&self, d: f64, grid: &SpatialGrid) -> InterferenceField {
        let len = grid.point_count();
        let mut intensity = vec![0.0; len];
        let mut visibility = vec![0.0; len];

        intensity
            .par_iter_mut()
            .zip(visibility.par_iter_mut())
            .zip(grid.radius_sq().par_iter())
            .for_each(|((i, v), &radius_sq)| {
                let sample = self.sample(d, radius_sq);
                *i = sample.intensity;
                *v = sample.visibility;
            });

        InterferenceField {
            resolution: grid.resolution(),
            intensity,
            visibility,
        }
    }

    /// Whole fringes spanned by the total path difference `2d`.
    pub fn fringe_count(&self, d: f64) -> u64 {
        (2.0 * d / self.wavelength).floor().max(0.0) as u64
    }
}

/// Intensity and visibility over one [`SpatialGrid`], row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct InterferenceField {
    resolution: usize,
    intensity: Vec<f64>,
    visibility: Vec<f64>,
}

impl InterferenceField {
    pub fn dimensions(&self) -> [usize; 2] {
        [self.resolution, self.resolution]
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn visibility(&self) -> &[f64] {
        &self.visibility
    }

    pub fn mean_visibility(&self) -> f64 {
        let visibility = self.visibility();
        if visibility.is_empty() {
            return 0.0;
        }
        let sum: f64 = visibility.iter().sum();
        sum / visibility.len() as f64
    }

    /// RGBA pixels over the fixed range `[0, INTENSITY_MAX]`, top row first,
    /// so the image shows the most positive `y` at the top.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let intensity = self.intensity();
        let mut rgba = Vec::with_capacity(intensity.len() * 4);

        for row in intensity.chunks(self.resolution.max(1)).rev() {
            for &value in row {
                let t = (value / INTENSITY_MAX) as f32;
                let [r, g, b] = inferno_color(t);
                rgba.extend_from_slice(&[
                    (r * 255.0) as u8,
                    (g * 255.0) as u8,
                    (b * 255.0) as u8,
                    255,
                ]);
            }
        }

        rgba
    }
}

pub fn inferno_color(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let anchors = [
        (0.00, [0.001, 0.000, 0.014]),
        (0.25, [0.341, 0.062, 0.429]),
        (0.50, [0.735, 0.216, 0.330]),
        (0.75, [0.978, 0.557, 0.035]),
        (1.00, [0.988, 0.998, 0.645]),
    ];

    for pair in anchors.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t >= t0 && t <= t1 {
            let alpha = (t - t0) / (t1 - t0);
            return [
                c0[0] + (c1[0] - c0[0]) * alpha,
                c0[1] + (c1[1] - c0[1]) * alpha,
                c0[2] + (c1[2] - c0[2]) * alpha,
            ];
        }
    }

    anchors[anchors.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_setup() -> (InterferenceModel, SpatialGrid) {
        let params = InterferometerParams {
            resolution: 64,
            ..Default::default()
        };
        (
            InterferenceModel::from_params(&params),
            SpatialGrid::from_params(&params),
        )
    }

    #[test]
    fn grid_spans_symmetric_extent() {
        let grid = SpatialGrid::new(500, 5e-6);
        assert_eq!(grid.coords().len(), 500);
        assert_eq!(grid.point_count(), 500 * 500);
        assert_eq!(grid.bounds(), (-5e-6, 5e-6));

        let coords = grid.coords();
        for i in 0..coords.len() {
            assert!((coords[i] + coords[coords.len() - 1 - i]).abs() < 1e-18);
        }
    }

    #[test]
    fn radius_follows_row_major_layout() {
        let grid = SpatialGrid::new(3, 1.0);
        // Corners sit at (+-1, +-1), the centre at the origin.
        assert_eq!(grid.radius_sq()[0], 2.0);
        assert_eq!(grid.radius_sq()[4], 0.0);
        assert_eq!(grid.radius_sq()[5], 1.0);
    }

    #[test]
    fn visibility_stays_in_unit_interval() {
        let (model, grid) = small_setup();
        for d in [0.0, 1e-9, 0.001, 0.05, 0.149, 0.15, 0.2, 3.0] {
            let field = model.compute(d, &grid);
            assert!(field
                .visibility()
                .iter()
                .all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn intensity_is_visibility_times_base() {
        let (model, grid) = small_setup();
        for d in [0.0, 0.001, 0.037, 0.12] {
            let field = model.compute(d, &grid);
            for (idx, &radius_sq) in grid.radius_sq().iter().enumerate() {
                let base = model.base_intensity(model.optical_delta(d, radius_sq));
                assert!((0.0..=INTENSITY_MAX).contains(&base));
                let expected = field.visibility()[idx] * base;
                assert!((field.intensity()[idx] - expected).abs() < 1e-12);
                assert!(field.intensity()[idx] >= 0.0);
            }
        }
    }

    #[test]
    fn compute_is_repeatable() {
        let (model, grid) = small_setup();
        let first = model.compute(0.0123, &grid);
        let second = model.compute(0.0123, &grid);
        let bits = |values: &[f64]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(first.intensity()), bits(second.intensity()));
        assert_eq!(bits(first.visibility()), bits(second.visibility()));
    }

    #[test]
    fn centre_matches_closed_form() {
        let model = InterferenceModel::from_params(&InterferometerParams::default());
        for d in [0.001, 0.05, 0.0425] {
            let sample = model.sample(d, 0.0);
            let visibility = (1.0 - (2.0 * d) / 0.3_f64).clamp(0.0, 1.0);
            let expected =
                visibility * 2.0 * (1.0 + ((TAU / 6000e-10) * (2.0 * d)).cos());
            assert!((sample.intensity - expected).abs() < 1e-12);
            assert!((sample.visibility - visibility).abs() < 1e-15);
        }
    }

    #[test]
    fn zero_path_difference_is_bright_and_coherent() {
        let (model, grid) = small_setup();
        let field = model.compute(0.0, &grid);
        assert!(field.intensity().iter().all(|&i| i == INTENSITY_MAX));
        assert_eq!(field.mean_visibility(), 1.0);
    }

    #[test]
    fn beyond_coherence_length_fringes_vanish() {
        let (model, grid) = small_setup();
        let field = model.compute(0.2, &grid);
        assert!(field.intensity().iter().all(|&i| i == 0.0));
        assert_eq!(field.mean_visibility(), 0.0);
    }

    #[test]
    fn fringe_count_floors() {
        let model = InterferenceModel::from_params(&InterferometerParams::default());
        assert_eq!(model.fringe_count(0.001), 3333);
        assert_eq!(model.fringe_count(0.0), 0);
        assert_eq!(model.fringe_count(2.9e-7), 0);
        assert_eq!(model.fringe_count(3.1e-7), 1);
    }

    #[test]
    fn rgba_puts_top_row_first() {
        let field = InterferenceField {
            resolution: 2,
            intensity: vec![0.0, 0.0, INTENSITY_MAX, INTENSITY_MAX],
            visibility: vec![1.0; 4],
        };
        let rgba = field.to_rgba8();
        assert_eq!(rgba.len(), 16);
        // Bright row (y > 0) leads; the dark bottom row trails.
        assert!(rgba[0] > 200);
        assert!(rgba[8] < 10);
        assert!(rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn colour_map_is_clamped() {
        assert_eq!(inferno_color(-1.0), inferno_color(0.0));
        assert_eq!(inferno_color(2.0), inferno_color(1.0));
    }
}
