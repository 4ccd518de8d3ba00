// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Constants
//!
//! Defines the CODATA 2018 physical constants used by the transport model

pub const BOLTZMANN: f64 = 1.380649e-23; // The Boltzmann constant in J / K
pub const ELECTRON_CHARGE: f64 = 1.602176634e-19; // Single electron charge in C
pub const ELECTRON_MASS: f64 = 9.1093837015e-31; // Single electron mass in kg
pub const EPSILON_0: f64 = 8.8541878128e-12; // Permitivitty of free space in F / m
pub const PLANCK: f64 = 6.62607015e-34; // Planck constant in J s
pub const HBAR: f64 = 1.054571817e-34; // Reduced Planck constant in J s

/// k / e, the natural unit of the Seebeck coefficient in V / K
pub const SEEBECK_UNIT: f64 = BOLTZMANN / ELECTRON_CHARGE;

/// Prefactor of the carrier concentration, `8π (2 mₑ k)^{3/2} / (3 h³)`.
///
/// Multiply by `(m* T)^{3/2}` to obtain a density in m⁻³.
pub(crate) fn density_prefactor() -> f64 {
    8. * std::f64::consts::PI * (2. * ELECTRON_MASS * BOLTZMANN).powf(1.5) / (3. * PLANCK.powi(3))
}

/// Prefactor of the transport coefficient, `8πe/3 (2 mₑ k / h²)^{3/2}`
pub(crate) fn conductivity_prefactor() -> f64 {
    8. * std::f64::consts::PI * ELECTRON_CHARGE / 3.
        * (2. * ELECTRON_MASS * BOLTZMANN / PLANCK.powi(2)).powf(1.5)
}
