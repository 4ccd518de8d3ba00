use crate::{
    error::TransportError,
    mechanism::ScatteringMechanism,
    optimizer::{FittedProperties, TemperatureOptimization, TemperatureRange},
    point::{MeasurementPoint, PointSolution, TransportState},
    settings::SolverSettings,
    sweep::{ConcentrationRange, SweepResult},
};

/// Entry point carrying the numerical settings used by every solve
///
/// The free functions at the crate root run with [`SolverSettings::default`], construct an
/// `SpbSolver` when tolerances need to be changed.
#[derive(Clone, Debug, Default)]
pub struct SpbSolver {
    settings: SolverSettings,
}

impl SpbSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(self, settings: SolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }
}

/// Recover the band parameters and derived transport at a single measurement
pub fn solve_point(
    point: &MeasurementPoint,
    mechanism: ScatteringMechanism,
) -> Result<PointSolution, TransportError> {
    SpbSolver::default().solve_point(point, mechanism)
}

/// Solve many independent measurements in parallel, one result per point in input order
pub fn solve_points(
    points: &[MeasurementPoint],
    mechanism: ScatteringMechanism,
) -> Vec<Result<PointSolution, TransportError>> {
    SpbSolver::default().solve_points(points, mechanism)
}

/// Re-solve a fixed band across a logarithmic carrier concentration grid
pub fn sweep_concentration(
    temperature: f64,
    state: &TransportState,
    minimum_concentration: f64,
    maximum_concentration: f64,
    mechanism: ScatteringMechanism,
) -> Result<SweepResult, TransportError> {
    SpbSolver::default().sweep_concentration(
        temperature,
        state,
        minimum_concentration,
        maximum_concentration,
        mechanism,
    )
}

/// Locate the optimal carrier concentration at every temperature of `temperatures`
pub fn optimize_over_temperature(
    temperatures: &TemperatureRange,
    concentrations: &ConcentrationRange,
    mechanism: ScatteringMechanism,
    fits: &FittedProperties,
    dielectric_constant: Option<f64>,
) -> Result<TemperatureOptimization, TransportError> {
    SpbSolver::default().optimize_over_temperature(
        temperatures,
        concentrations,
        mechanism,
        fits,
        dielectric_constant,
    )
}
