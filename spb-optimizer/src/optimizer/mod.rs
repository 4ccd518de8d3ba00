//! # Optimizer
//!
//! Drives the point solve and the concentration sweep across a temperature grid. Measured
//! properties enter as polynomial fits in temperature, which are validated over the whole grid
//! before anything is solved. Every temperature is independent and solved in parallel.

mod validation;

pub(crate) use validation::SEEBECK_BOUNDS;

use crate::{
    error::TransportError,
    mechanism::ScatteringMechanism,
    point::MeasurementPoint,
    sweep::ConcentrationRange,
    SpbSolver,
};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::Deserialize;
use validation::{
    CONCENTRATION_BOUNDS, MOBILITY_BOUNDS, THERMAL_CONDUCTIVITY_BOUNDS,
};

/// Highest supported polynomial degree
const MAXIMUM_DEGREE: usize = 5;

/// A polynomial in temperature with ascending coefficients `c₀ + c₁ T + … + c₅ T⁵`
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Result<Self, TransportError> {
        if coefficients.is_empty() || coefficients.len() > MAXIMUM_DEGREE + 1 {
            return Err(TransportError::DomainPrecondition(format!(
                "a fit needs between 1 and {} coefficients, found {}",
                MAXIMUM_DEGREE + 1,
                coefficients.len()
            )));
        }
        Ok(Self { coefficients })
    }

    pub fn constant(value: f64) -> Self {
        Self {
            coefficients: vec![value],
        }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Horner evaluation
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0., |accumulator, &coefficient| accumulator * x + coefficient)
    }

    /// The same polynomial with every coefficient multiplied by `factor`, used for unit changes
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            coefficients: self.coefficients.iter().map(|c| c * factor).collect(),
        }
    }
}

impl TryFrom<Vec<f64>> for Polynomial {
    type Error = TransportError;

    fn try_from(coefficients: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(coefficients)
    }
}

/// Temperatures `minimum, minimum + step, …` up to and including `maximum`
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct TemperatureRange {
    pub minimum: f64,
    pub maximum: f64,
    pub step: f64,
}

impl TemperatureRange {
    pub fn new(minimum: f64, maximum: f64, step: f64) -> Result<Self, TransportError> {
        let range = Self {
            minimum,
            maximum,
            step,
        };
        range.validate()?;
        Ok(range)
    }

    fn validate(&self) -> Result<(), TransportError> {
        if !(self.minimum > 0. && self.maximum >= self.minimum && self.step > 0.)
            || !self.maximum.is_finite()
        {
            return Err(TransportError::DomainPrecondition(format!(
                "the temperature range needs 0 < minimum <= maximum and a positive step, found [{}, {}] by {}",
                self.minimum, self.maximum, self.step
            )));
        }
        Ok(())
    }

    pub fn temperatures(&self) -> Vec<f64> {
        let count = ((self.maximum - self.minimum) / self.step + 1e-9).floor() as usize;
        (0..=count)
            .map(|index| self.minimum + index as f64 * self.step)
            .collect()
    }
}

/// Measured properties as fits in temperature, all in SI units
#[derive(Clone, Debug, PartialEq)]
pub struct FittedProperties {
    /// V / K
    pub seebeck: Polynomial,
    /// m^-3
    pub carrier_concentration: Polynomial,
    /// m^2 / V s
    pub mobility: Polynomial,
    /// W / m K
    pub thermal_conductivity: Polynomial,
}

/// The figure of merit over temperature and carrier concentration
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureOptimization {
    /// K
    pub temperatures: Array1<f64>,
    /// The concentration grid in m^-3, shared by every temperature
    pub concentrations: Array1<f64>,
    /// Rows follow `temperatures`, columns follow `concentrations`
    pub figure_of_merit: Array2<f64>,
    pub measured_figure_of_merit: Array1<f64>,
    /// m^-3
    pub measured_concentration: Array1<f64>,
    pub optimal_figure_of_merit: Array1<f64>,
    /// m^-3, zero where the figure of merit could not be predicted
    pub optimal_concentration: Array1<f64>,
}

struct TemperatureRow {
    measured_figure_of_merit: f64,
    figure_of_merit: Array1<f64>,
    optimal_figure_of_merit: f64,
    optimal_concentration: f64,
}

impl SpbSolver {
    /// Locate the optimal carrier concentration at every temperature of `temperatures`
    #[tracing::instrument(name = "Temperature optimisation", level = "info", skip_all, fields(mechanism = %mechanism))]
    pub fn optimize_over_temperature(
        &self,
        temperatures: &TemperatureRange,
        concentrations: &ConcentrationRange,
        mechanism: ScatteringMechanism,
        fits: &FittedProperties,
        dielectric_constant: Option<f64>,
    ) -> Result<TemperatureOptimization, TransportError> {
        temperatures.validate()?;
        concentrations.validate()?;
        let grid = concentrations.grid();
        let temperatures = temperatures.temperatures();

        let seebeck = SEEBECK_BOUNDS.evaluate(&fits.seebeck, &temperatures)?;
        let carrier_concentration =
            CONCENTRATION_BOUNDS.evaluate(&fits.carrier_concentration, &temperatures)?;
        let mobility = MOBILITY_BOUNDS.evaluate(&fits.mobility, &temperatures)?;
        let thermal_conductivity =
            THERMAL_CONDUCTIVITY_BOUNDS.evaluate(&fits.thermal_conductivity, &temperatures)?;

        tracing::info!(
            "Optimising over {} temperatures and {} concentrations",
            temperatures.len(),
            grid.len()
        );

        let rows = (0..temperatures.len())
            .into_par_iter()
            .map(|index| {
                let mut point = MeasurementPoint::new(temperatures[index], seebeck[index])
                    .with_carrier_concentration(carrier_concentration[index])
                    .with_mobility(mobility[index])
                    .with_thermal_conductivity(thermal_conductivity[index]);
                point.dielectric_constant = dielectric_constant;
                self.temperature_row(&point, concentrations, mechanism, grid.len())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut figure_of_merit = Array2::zeros((temperatures.len(), grid.len()));
        for (mut target, row) in figure_of_merit.rows_mut().into_iter().zip(rows.iter()) {
            target.assign(&row.figure_of_merit);
        }

        Ok(TemperatureOptimization {
            temperatures: Array1::from(temperatures),
            concentrations: Array1::from(grid),
            figure_of_merit,
            measured_figure_of_merit: rows.iter().map(|row| row.measured_figure_of_merit).collect(),
            measured_concentration: Array1::from(carrier_concentration),
            optimal_figure_of_merit: rows.iter().map(|row| row.optimal_figure_of_merit).collect(),
            optimal_concentration: rows.iter().map(|row| row.optimal_concentration).collect(),
        })
    }

    fn temperature_row(
        &self,
        point: &MeasurementPoint,
        concentrations: &ConcentrationRange,
        mechanism: ScatteringMechanism,
        grid_length: usize,
    ) -> Result<TemperatureRow, TransportError> {
        let solution = self.solve_point(point, mechanism)?;
        let measured_figure_of_merit = solution.derived.figure_of_merit;
        if solution.state.quality_factor == 0. {
            return Ok(TemperatureRow {
                measured_figure_of_merit,
                figure_of_merit: Array1::zeros(grid_length),
                optimal_figure_of_merit: 0.,
                optimal_concentration: 0.,
            });
        }

        let sweep = self.sweep_concentration(
            point.temperature,
            &solution.state,
            concentrations.minimum,
            concentrations.maximum,
            mechanism,
        )?;
        let optimum = sweep.optimum();
        Ok(TemperatureRow {
            measured_figure_of_merit,
            figure_of_merit: sweep
                .figure_of_merit
                .unwrap_or_else(|| Array1::zeros(grid_length)),
            optimal_figure_of_merit: optimum.map(|o| o.figure_of_merit).unwrap_or(0.),
            optimal_concentration: optimum.map(|o| o.concentration).unwrap_or(0.),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{FittedProperties, Polynomial, TemperatureRange};
    use crate::{
        error::{Quantity, TransportError},
        mechanism::ScatteringMechanism,
        optimize_over_temperature,
        point::MeasurementPoint,
        solve_point,
        sweep::ConcentrationRange,
    };
    use approx::assert_relative_eq;

    fn fits() -> FittedProperties {
        FittedProperties {
            // 150 μV/K at 300 K rising to 250 μV/K at 400 K
            seebeck: Polynomial::new(vec![-150e-6, 1e-6]).unwrap(),
            carrier_concentration: Polynomial::constant(1e25),
            mobility: Polynomial::new(vec![2e-2, -2.5e-5]).unwrap(),
            thermal_conductivity: Polynomial::constant(1.5),
        }
    }

    #[test]
    fn horner_evaluation_matches_the_expanded_form() {
        let polynomial = Polynomial::new(vec![1., -2., 0.5, 0., 0., 1e-3]).unwrap();
        let x = 3_f64;
        let expanded = 1. - 2. * x + 0.5 * x.powi(2) + 1e-3 * x.powi(5);
        assert_relative_eq!(polynomial.evaluate(x), expanded, max_relative = 1e-14);
        assert_eq!(polynomial.degree(), 5);
        assert_relative_eq!(polynomial.scaled(2.).evaluate(x), 2. * expanded, max_relative = 1e-14);
    }

    #[test]
    fn polynomials_of_unsupported_degree_are_rejected() {
        assert!(Polynomial::new(vec![]).is_err());
        assert!(Polynomial::new(vec![1.; 7]).is_err());
    }

    #[test]
    fn temperature_grid_includes_the_upper_bound() {
        let range = TemperatureRange::new(300., 400., 50.).unwrap();
        assert_eq!(range.temperatures(), vec![300., 350., 400.]);
        let range = TemperatureRange::new(300., 390., 50.).unwrap();
        assert_eq!(range.temperatures(), vec![300., 350.]);
        let range = TemperatureRange::new(0.1, 0.3, 0.1).unwrap();
        assert_eq!(range.temperatures().len(), 3);
        assert!(TemperatureRange::new(300., 200., 10.).is_err());
    }

    #[test]
    fn out_of_range_fits_are_rejected_before_solving() {
        let mut fits = fits();
        fits.seebeck = Polynomial::constant(2000e-6);
        let result = optimize_over_temperature(
            &TemperatureRange::new(300., 400., 50.).unwrap(),
            &ConcentrationRange::new(1e24, 1e26).unwrap(),
            ScatteringMechanism::AcousticDeformationPotential,
            &fits,
            None,
        );
        assert!(matches!(
            result,
            Err(TransportError::Range {
                quantity: Quantity::Seebeck,
                temperature,
                ..
            }) if temperature == 300.
        ));
    }

    #[test]
    fn optimisation_grid_is_consistent_with_point_solves() {
        let mechanism = ScatteringMechanism::AcousticDeformationPotential;
        let fits = fits();
        let optimisation = optimize_over_temperature(
            &TemperatureRange::new(300., 400., 100.).unwrap(),
            &ConcentrationRange::new(1e24, 1e26).unwrap(),
            mechanism,
            &fits,
            None,
        )
        .unwrap();

        assert_eq!(optimisation.figure_of_merit.dim(), (2, 37));
        for (index, &temperature) in optimisation.temperatures.iter().enumerate() {
            let point = MeasurementPoint::new(temperature, fits.seebeck.evaluate(temperature))
                .with_carrier_concentration(1e25)
                .with_mobility(fits.mobility.evaluate(temperature))
                .with_thermal_conductivity(1.5);
            let solution = solve_point(&point, mechanism).unwrap();
            assert_relative_eq!(
                optimisation.measured_figure_of_merit[index],
                solution.derived.figure_of_merit,
                max_relative = 1e-12
            );
            assert_eq!(optimisation.measured_concentration[index], 1e25);
            // the measured concentration lies on the grid, so the optimum can only improve on it
            assert!(
                optimisation.optimal_figure_of_merit[index]
                    >= solution.derived.figure_of_merit * (1. - 1e-6)
            );
            let row = optimisation.figure_of_merit.row(index);
            let best = row.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(best, optimisation.optimal_figure_of_merit[index]);
        }
    }

    #[test]
    fn vanishing_thermal_conductivity_gives_zero_rows() {
        let mut fits = fits();
        fits.thermal_conductivity = Polynomial::constant(0.);
        let optimisation = optimize_over_temperature(
            &TemperatureRange::new(300., 300., 10.).unwrap(),
            &ConcentrationRange::new(1e24, 1e25).unwrap(),
            ScatteringMechanism::PolarOpticalPhonon,
            &fits,
            None,
        )
        .unwrap();
        assert_eq!(optimisation.figure_of_merit.dim(), (1, 19));
        assert!(optimisation.figure_of_merit.iter().all(|&value| value == 0.));
        assert_eq!(optimisation.optimal_figure_of_merit[0], 0.);
        assert_eq!(optimisation.optimal_concentration[0], 0.);
        assert_eq!(optimisation.measured_figure_of_merit[0], 0.);
    }
}
