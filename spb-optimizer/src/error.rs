// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Error
//! The error type returned by every solve in the library

use crate::integrals::QuadratureError;
use crate::mechanism::ScatteringMechanism;
use crate::roots::RootError;
use miette::Diagnostic;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Physical quantities which can fail to converge or fall out of range
pub enum Quantity {
    ReducedChemicalPotential,
    EffectiveMass,
    Seebeck,
    CarrierConcentration,
    Mobility,
    ThermalConductivity,
    ElectricalConductivity,
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Quantity::ReducedChemicalPotential => write!(f, "reduced chemical potential"),
            Quantity::EffectiveMass => write!(f, "density-of-states effective mass"),
            Quantity::Seebeck => write!(f, "Seebeck coefficient"),
            Quantity::CarrierConcentration => write!(f, "carrier concentration"),
            Quantity::Mobility => write!(f, "mobility"),
            Quantity::ThermalConductivity => write!(f, "thermal conductivity"),
            Quantity::ElectricalConductivity => write!(f, "electrical conductivity"),
        }
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum TransportError {
    /// A root search or the impurity scan terminated without a solution
    #[error("the {quantity} did not converge for {mechanism} scattering at {temperature} K and {concentration:e} m^-3: {reason}")]
    #[diagnostic(code(spb::convergence))]
    Convergence {
        quantity: Quantity,
        mechanism: ScatteringMechanism,
        temperature: f64,
        concentration: f64,
        reason: String,
    },
    /// A transport integral could not be evaluated to the requested tolerance
    #[error("transport integral failed for {mechanism} scattering at {temperature} K and {concentration:e} m^-3")]
    #[diagnostic(code(spb::numeric_integration))]
    NumericIntegration {
        mechanism: ScatteringMechanism,
        temperature: f64,
        concentration: f64,
        source: QuadratureError,
    },
    /// A fitted input evaluates outside of the physically sensible window
    #[error("the {quantity} evaluates to {value:e} at {temperature} K, outside of [{minimum:e}, {maximum:e}]")]
    #[diagnostic(
        code(spb::range),
        help("check the fitted polynomial over the whole temperature range")
    )]
    Range {
        quantity: Quantity,
        value: f64,
        temperature: f64,
        minimum: f64,
        maximum: f64,
    },
    #[error("{0}")]
    #[diagnostic(code(spb::precondition))]
    DomainPrecondition(String),
}

/// Where a solve is happening, used to decorate errors raised deep in the numerics
#[derive(Copy, Clone, Debug)]
pub(crate) struct SolveContext {
    pub(crate) mechanism: ScatteringMechanism,
    pub(crate) temperature: f64,
    pub(crate) concentration: f64,
}

impl SolveContext {
    pub(crate) fn new(mechanism: ScatteringMechanism, temperature: f64, concentration: f64) -> Self {
        Self {
            mechanism,
            temperature,
            concentration,
        }
    }

    pub(crate) fn integration(&self, source: QuadratureError) -> TransportError {
        TransportError::NumericIntegration {
            mechanism: self.mechanism,
            temperature: self.temperature,
            concentration: self.concentration,
            source,
        }
    }

    pub(crate) fn convergence(&self, quantity: Quantity, reason: impl Into<String>) -> TransportError {
        TransportError::Convergence {
            quantity,
            mechanism: self.mechanism,
            temperature: self.temperature,
            concentration: self.concentration,
            reason: reason.into(),
        }
    }

    /// Lift a root-finding failure for `quantity` into a `TransportError`
    pub(crate) fn root(&self, quantity: Quantity, error: RootError) -> TransportError {
        match error {
            RootError::Integration(source) => self.integration(source),
            other => self.convergence(quantity, other.to_string()),
        }
    }
}
