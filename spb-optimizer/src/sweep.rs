//! # Sweep
//!
//! Holds the band parameters recovered at a reference point fixed and re-solves the chemical
//! potential across a logarithmic carrier concentration grid, predicting how the Seebeck
//! coefficient, Lorenz number, mobility and figure of merit respond to doping.

use crate::{
    constants::{conductivity_prefactor, SEEBECK_UNIT},
    error::{Quantity, SolveContext, TransportError},
    integrals::{ScatteringModel, Screening, TransportIntegrals},
    mechanism::ScatteringMechanism,
    point::{carrier_density, TransportState, MINIMUM_REDUCED_CHEMICAL_POTENTIAL},
    roots::{find_root, Bracketing},
    SpbSolver,
};
use itertools::Itertools;
use ndarray::Array1;
use rayon::prelude::*;
use serde::Deserialize;

/// Half-decade steps of the concentration grid, `j / 2` for `j` in `2..=19`
const STEPS_PER_DECADE: std::ops::RangeInclusive<u32> = 2..=19;

/// Bounds of the concentration grid in m^-3
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct ConcentrationRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl ConcentrationRange {
    pub fn new(minimum: f64, maximum: f64) -> Result<Self, TransportError> {
        let range = Self { minimum, maximum };
        range.validate()?;
        Ok(range)
    }

    pub(crate) fn validate(&self) -> Result<(), TransportError> {
        if !(self.minimum.is_finite() && self.maximum.is_finite())
            || self.minimum <= 0.
            || self.minimum >= self.maximum
        {
            return Err(TransportError::DomainPrecondition(format!(
                "the concentration range must satisfy 0 < minimum < maximum, found [{:e}, {:e}]",
                self.minimum, self.maximum
            )));
        }
        Ok(())
    }

    /// Number of complete decades spanned by the range
    fn decades(&self) -> u32 {
        ((self.maximum / self.minimum).log10() + 1e-9).floor() as u32
    }

    /// The grid `j / 2 · min · 10^i` for each complete decade `i`, closed by `max`
    pub fn grid(&self) -> Vec<f64> {
        (0..self.decades())
            .cartesian_product(STEPS_PER_DECADE)
            .map(|(decade, step)| step as f64 / 2. * self.minimum * 10_f64.powi(decade as i32))
            .chain(std::iter::once(self.maximum))
            .collect()
    }
}

/// The grid point with the largest figure of merit
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Optimum {
    pub index: usize,
    /// m^-3
    pub concentration: f64,
    pub figure_of_merit: f64,
}

/// Transport across the concentration grid, all arrays index aligned with `concentration`
#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    /// m^-3
    pub concentration: Array1<f64>,
    pub reduced_chemical_potential: Array1<f64>,
    /// V / K
    pub seebeck: Array1<f64>,
    /// V^2 / K^2
    pub lorenz_number: Array1<f64>,
    /// m^2 / V s, only when the reference intrinsic mobility is known
    pub mobility: Option<Array1<f64>>,
    /// Only when the reference quality factor is known
    pub figure_of_merit: Option<Array1<f64>>,
}

impl SweepResult {
    /// A band without an effective mass predicts nothing, every array but the grid is zero
    fn unresolved(grid: Vec<f64>) -> Self {
        let zeros = Array1::zeros(grid.len());
        Self {
            concentration: Array1::from(grid),
            reduced_chemical_potential: zeros.clone(),
            seebeck: zeros.clone(),
            lorenz_number: zeros,
            mobility: None,
            figure_of_merit: None,
        }
    }

    /// The grid point with the largest figure of merit, ties resolve to the lowest concentration
    pub fn optimum(&self) -> Option<Optimum> {
        let figure_of_merit = self.figure_of_merit.as_ref()?;
        let (index, &best) = figure_of_merit
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, &f64)>, (index, value)| match best {
                Some((_, current)) if current >= value => best,
                _ => Some((index, value)),
            })?;
        Some(Optimum {
            index,
            concentration: self.concentration[index],
            figure_of_merit: best,
        })
    }
}

struct SweepCell {
    reduced_chemical_potential: f64,
    seebeck: f64,
    lorenz_number: f64,
    mobility: f64,
    figure_of_merit: f64,
}

impl SpbSolver {
    /// Re-solve a fixed band across a logarithmic carrier concentration grid
    ///
    /// A reference state solved without a carrier concentration has `m* = 0`, the sweep then runs
    /// over the grid but every concentration-dependent output is zero.
    #[tracing::instrument(name = "Concentration sweep", level = "info", skip(self, state))]
    pub fn sweep_concentration(
        &self,
        temperature: f64,
        state: &TransportState,
        minimum_concentration: f64,
        maximum_concentration: f64,
        mechanism: ScatteringMechanism,
    ) -> Result<SweepResult, TransportError> {
        let range = ConcentrationRange::new(minimum_concentration, maximum_concentration)?;
        if !(temperature.is_finite() && temperature > 0.) {
            return Err(TransportError::DomainPrecondition(format!(
                "the temperature must be positive, found {temperature} K"
            )));
        }
        if state.effective_mass == 0. {
            tracing::warn!(
                "The reference state has no effective mass, the sweep predicts zero transport"
            );
            return Ok(SweepResult::unresolved(range.grid()));
        }
        if !(state.effective_mass > 0.) {
            return Err(TransportError::DomainPrecondition(format!(
                "the effective mass must be positive, found {}",
                state.effective_mass
            )));
        }
        if mechanism.is_screened() && !matches!(state.dielectric_constant, Some(value) if value > 0.)
        {
            return Err(TransportError::DomainPrecondition(
                "ionized impurity scattering requires a positive dielectric constant".into(),
            ));
        }

        let grid = range.grid();
        tracing::info!("Sweeping {} concentrations at {temperature} K", grid.len());
        let cells = grid
            .par_iter()
            .map(|&concentration| self.sweep_cell(temperature, state, concentration, mechanism))
            .collect::<Result<Vec<_>, _>>()?;

        let column = |value: fn(&SweepCell) -> f64| cells.iter().map(value).collect::<Array1<f64>>();
        Ok(SweepResult {
            concentration: Array1::from(grid),
            reduced_chemical_potential: column(|cell| cell.reduced_chemical_potential),
            seebeck: column(|cell| cell.seebeck),
            lorenz_number: column(|cell| cell.lorenz_number),
            mobility: (state.intrinsic_mobility != 0.).then(|| column(|cell| cell.mobility)),
            figure_of_merit: (state.quality_factor != 0.).then(|| column(|cell| cell.figure_of_merit)),
        })
    }

    fn sweep_cell(
        &self,
        temperature: f64,
        state: &TransportState,
        concentration: f64,
        mechanism: ScatteringMechanism,
    ) -> Result<SweepCell, TransportError> {
        let settings = self.settings();
        let context = SolveContext::new(mechanism, temperature, concentration);
        let effective_mass = state.effective_mass;
        let screening = match (mechanism.is_screened(), state.dielectric_constant) {
            (true, Some(dielectric_constant)) => Some(Screening::new(
                effective_mass,
                dielectric_constant,
                temperature,
                concentration,
            )),
            _ => None,
        };
        let model = ScatteringModel::new(mechanism, settings, screening)?;

        let eta = find_root(
            |eta| Ok(carrier_density(&model, eta, effective_mass, temperature)? / concentration - 1.),
            Bracketing::new(
                1.,
                MINIMUM_REDUCED_CHEMICAL_POTENTIAL,
                model.maximum_reduced_chemical_potential(),
            ),
            &settings.roots,
        )
        .map_err(|error| context.root(Quantity::ReducedChemicalPotential, error))?;

        let integration = |error| context.integration(error);
        let seebeck = SEEBECK_UNIT * model.reduced_seebeck(eta).map_err(integration)?;
        let lorenz_number = SEEBECK_UNIT.powi(2) * model.reduced_lorenz(eta).map_err(integration)?;
        let conductivity = model.conductivity_integral(eta).map_err(integration)?;
        let hall = model.hall_integral(eta).map_err(integration)?;

        let mobility = state.intrinsic_mobility * hall / conductivity;
        let figure_of_merit = if state.quality_factor != 0. {
            let omega = conductivity_prefactor() * conductivity;
            seebeck.powi(2) / (lorenz_number + 1. / (state.quality_factor * omega))
        } else {
            0.
        };

        Ok(SweepCell {
            reduced_chemical_potential: eta,
            seebeck,
            lorenz_number,
            mobility,
            figure_of_merit,
        })
    }
}
