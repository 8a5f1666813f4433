use std::time::Instant;

use crate::interference::{InterferenceField, InterferenceModel, SpatialGrid};
use crate::types::{InterferometerParams, ModelError, Readout};

/// Paired samples of total path difference (mm) and mean visibility.
///
/// Append-only; both sequences always have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityHistory {
    path_differences_mm: Vec<f64>,
    visibilities: Vec<f64>,
}

impl VisibilityHistory {
    pub fn push(&mut self, path_difference_mm: f64, visibility: f64) {
        self.path_differences_mm.push(path_difference_mm);
        self.visibilities.push(visibility);
    }

    pub fn len(&self) -> usize {
        self.path_differences_mm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_differences_mm.is_empty()
    }

    pub fn path_differences_mm(&self) -> &[f64] {
        &self.path_differences_mm
    }

    pub fn visibilities(&self) -> &[f64] {
        &self.visibilities
    }

    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.path_differences_mm()
            .iter()
            .zip(self.visibilities())
            .map(|(&x, &v)| [x, v])
    }

    pub fn max_path_difference_mm(&self) -> f64 {
        self.path_differences_mm
            .iter()
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Owns the path difference and everything derived from it.
///
/// Construction runs one refresh so the field, readout and history are
/// populated before the first user action.
pub struct Session {
    params: InterferometerParams,
    grid: SpatialGrid,
    model: InterferenceModel,
    path_difference: f64,
    field: InterferenceField,
    readout: Readout,
    history: VisibilityHistory,
}

impl Session {
    pub fn new(params: InterferometerParams) -> Result<Self, ModelError> {
        params.validate()?;

        let grid = SpatialGrid::from_params(&params);
        let model = InterferenceModel::from_params(&params);
        let path_difference = params.initial_path_difference;
        let field = model.compute(path_difference, &grid);

        log::info!(
            "interferometer grid {}x{}, initial d = {} m",
            grid.resolution(),
            grid.resolution(),
            path_difference
        );

        let mut session = Self {
            params,
            grid,
            model,
            path_difference,
            field,
            readout: Readout {
                path_difference_mm: 0.0,
                fringe_count: 0,
                mean_visibility: 0.0,
            },
            history: VisibilityHistory::default(),
        };
        session.record();
        Ok(session)
    }

    pub fn increase_path_difference(&mut self) -> Readout {
        self.path_difference += self.params.step;
        self.refresh()
    }

    pub fn decrease_path_difference(&mut self) -> Readout {
        self.path_difference = (self.path_difference - self.params.step).max(0.0);
        self.refresh()
    }

    /// Recomputes the field for the current path difference and appends one
    /// history sample.
    pub fn refresh(&mut self) -> Readout {
        let started = Instant::now();
        self.field = self.model.compute(self.path_difference, &self.grid);
        let readout = self.record();

        log::debug!(
            "refresh d={:e} m fringes={} visibility={:.4} in {:?}",
            self.path_difference,
            readout.fringe_count,
            readout.mean_visibility,
            started.elapsed()
        );

        readout
    }

    /// Derives the readout from the current field and appends it to history.
    fn record(&mut self) -> Readout {
        let d = self.path_difference;
        let readout = Readout {
            path_difference_mm: 2.0 * d * 1e3,
            fringe_count: self.model.fringe_count(d),
            mean_visibility: self.field.mean_visibility(),
        };

        self.history
            .push(readout.path_difference_mm, readout.mean_visibility);
        self.readout = readout;
        readout
    }

    pub fn path_difference(&self) -> f64 {
        self.path_difference
    }

    pub fn field(&self) -> &InterferenceField {
        &self.field
    }

    pub fn readout(&self) -> Readout {
        self.readout
    }

    pub fn history(&self) -> &VisibilityHistory {
        &self.history
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }
}
