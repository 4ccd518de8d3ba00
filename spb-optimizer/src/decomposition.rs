//! # Decomposition
//!
//! Splits a measured total thermal conductivity into its electronic and lattice parts. The Lorenz
//! number follows from the Seebeck coefficient alone, so no Hall measurement is needed.

use crate::{
    error::{Quantity, TransportError},
    mechanism::ScatteringMechanism,
    optimizer::{Polynomial, SEEBECK_BOUNDS},
    point::MeasurementPoint,
    SpbSolver,
};
use ndarray::Array1;
use rayon::prelude::*;
use serde::Deserialize;

/// The electrical transport fit, as either the conductivity or the resistivity
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectricalTransport {
    /// S / m
    Conductivity(Polynomial),
    /// Ω m
    Resistivity(Polynomial),
}

impl ElectricalTransport {
    /// The electrical conductivity in S / m at `temperature`
    pub fn conductivity(&self, temperature: f64) -> Result<f64, TransportError> {
        let conductivity = match self {
            ElectricalTransport::Conductivity(fit) => fit.evaluate(temperature),
            ElectricalTransport::Resistivity(fit) => 1. / fit.evaluate(temperature),
        };
        if conductivity.is_finite() && conductivity > 0. {
            Ok(conductivity)
        } else {
            Err(TransportError::Range {
                quantity: Quantity::ElectricalConductivity,
                value: conductivity,
                temperature,
                minimum: 0.,
                maximum: f64::INFINITY,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThermalDecomposition {
    /// K
    pub temperatures: Array1<f64>,
    /// V^2 / K^2
    pub lorenz_number: Array1<f64>,
    /// W / m K
    pub electronic: Array1<f64>,
    /// W / m K
    pub lattice: Array1<f64>,
}

impl SpbSolver {
    /// Split `thermal_conductivity`, measured at `temperatures`, into `κ_el = L σ T` and the
    /// lattice remainder
    #[tracing::instrument(name = "Thermal decomposition", level = "info", skip_all)]
    pub fn decompose_thermal_conductivity(
        &self,
        temperatures: &[f64],
        thermal_conductivity: &[f64],
        seebeck: &Polynomial,
        electrical: &ElectricalTransport,
        mechanism: ScatteringMechanism,
    ) -> Result<ThermalDecomposition, TransportError> {
        if mechanism.is_screened() {
            return Err(TransportError::DomainPrecondition(format!(
                "{mechanism} scattering needs the carrier concentration, which the decomposition does not use"
            )));
        }
        if temperatures.len() != thermal_conductivity.len() {
            return Err(TransportError::DomainPrecondition(format!(
                "{} temperatures were given for {} thermal conductivities",
                temperatures.len(),
                thermal_conductivity.len()
            )));
        }
        let seebeck = SEEBECK_BOUNDS.evaluate(seebeck, temperatures)?;
        let conductivity = temperatures
            .iter()
            .map(|&temperature| electrical.conductivity(temperature))
            .collect::<Result<Vec<_>, _>>()?;

        let lorenz_number = temperatures
            .par_iter()
            .zip(seebeck.par_iter())
            .map(|(&temperature, &seebeck)| {
                self.solve_point(&MeasurementPoint::new(temperature, seebeck), mechanism)
                    .map(|solution| solution.state.lorenz_number)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let electronic = temperatures
            .iter()
            .zip(lorenz_number.iter())
            .zip(conductivity.iter())
            .map(|((&temperature, &lorenz), &sigma)| temperature * lorenz * sigma)
            .collect::<Array1<f64>>();
        let lattice = Array1::from(thermal_conductivity.to_vec()) - &electronic;

        Ok(ThermalDecomposition {
            temperatures: Array1::from(temperatures.to_vec()),
            lorenz_number: Array1::from(lorenz_number),
            electronic,
            lattice,
        })
    }
}

/// Split a measured total thermal conductivity with default solver settings
pub fn decompose_thermal_conductivity(
    temperatures: &[f64],
    thermal_conductivity: &[f64],
    seebeck: &Polynomial,
    electrical: &ElectricalTransport,
    mechanism: ScatteringMechanism,
) -> Result<ThermalDecomposition, TransportError> {
    SpbSolver::default().decompose_thermal_conductivity(
        temperatures,
        thermal_conductivity,
        seebeck,
        electrical,
        mechanism,
    )
}
