use thiserror::Error;

#[derive(Clone, Copy, Debug)]
pub struct InterferometerParams {
    /// Source wavelength in metres.
    pub wavelength: f64,
    /// Aperture scale `D` in the radial term `1 - r^2 / D^2`.
    pub aperture: f64,
    /// Coherence length `L_c` used for the visibility envelope.
    pub coherence_length: f64,
    /// Samples per axis of the square grid.
    pub resolution: usize,
    /// Grid spans `[-half_extent, half_extent]` metres on both axes.
    pub half_extent: f64,
    pub initial_path_difference: f64,
    pub step: f64,
}

impl Default for InterferometerParams {
    fn default() -> Self {
        Self {
            wavelength: 6000e-10,
            aperture: 0.5,
            coherence_length: 0.3,
            resolution: 500,
            half_extent: 5e-6,
            initial_path_difference: 0.001,
            step: 1e-3,
        }
    }
}

impl InterferometerParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.resolution < 2 {
            return Err(ModelError::GridTooSmall {
                resolution: self.resolution,
            });
        }
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return Err(ModelError::InvalidExtent(self.half_extent));
        }

        for (name, value) in [
            ("wavelength", self.wavelength),
            ("aperture", self.aperture),
            ("coherence length", self.coherence_length),
            ("step", self.step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::NonPositiveConstant { name, value });
            }
        }

        if !(self.initial_path_difference.is_finite() && self.initial_path_difference >= 0.0) {
            return Err(ModelError::InvalidPathDifference(
                self.initial_path_difference,
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("grid needs at least 2 samples per axis, got {resolution}")]
    GridTooSmall { resolution: usize },
    #[error("grid half extent must be positive and finite, got {0}")]
    InvalidExtent(f64),
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveConstant { name: &'static str, value: f64 },
    #[error("initial path difference must be non-negative and finite, got {0}")]
    InvalidPathDifference(f64),
}

/// Derived quantities shown next to the intensity image after a refresh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Readout {
    /// Total path difference `2d`, in millimetres.
    pub path_difference_mm: f64,
    pub fringe_count: u64,
    pub mean_visibility: f64,
}

impl Readout {
    pub fn label(&self) -> String {
        format!(
            "Path Difference: {:.2} mm | Fringes: {}\nVisibility: {:.2}",
            self.path_difference_mm, self.fringe_count, self.mean_visibility
        )
    }
}
