// Copyright 2022 Chris Gubbin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! SPB Optimizer recovers band parameters from thermoelectric measurements in the single
//! parabolic band model, and uses them to predict the optimal doping of the material.
//!
//! # Overview
//! In the single parabolic band (SPB) model every transport coefficient of a degenerate or
//! non-degenerate semiconductor is a function of the reduced chemical potential `η` and a
//! scattering-specific relaxation time. The Seebeck coefficient alone fixes `η`; adding the Hall
//! carrier concentration fixes the density-of-states effective mass, the Hall mobility fixes the
//! intrinsic mobility and the thermal conductivity fixes the lattice contribution. From these the
//! thermoelectric quality factor `β` follows, and holding the band fixed while varying the carrier
//! concentration predicts the figure of merit `zT` across doping.
//!
//! Five scattering mechanisms are modelled: acoustic deformation potential (`ADP`), polar optical
//! phonon in the high temperature limit (`POP`) and as a power law (`POP2`), and ionized impurity
//! with Brooks-Herring screening (`IMP`) and as a power law (`IMP2`).
//!
//! # Usage
//! ```no_run
//! use spb_optimizer::{point::MeasurementPoint, solve_point, ScatteringMechanism};
//!
//! // 300 K, 200 μV/K, 1e19 cm^-3, 100 cm^2/Vs and 2 W/mK, in SI units
//! let point = MeasurementPoint::new(300., 200e-6)
//!     .with_carrier_concentration(1e25)
//!     .with_mobility(1e-2)
//!     .with_thermal_conductivity(2.);
//! let solution = solve_point(&point, ScatteringMechanism::AcousticDeformationPotential)?;
//! println!("zT = {}", solution.derived.figure_of_merit);
//! # Ok::<(), spb_optimizer::TransportError>(())
//! ```
//!
//! The binary wraps the same operations in a command line interface reading laboratory units.

/// The command line application, configuration and tracing
pub mod app;

/// Physical constants
mod constants;

/// Splitting the total thermal conductivity into electronic and lattice parts
pub mod decomposition;

/// Error handling
mod error;

/// Generalised Fermi-Dirac transport integrals for each scattering mechanism
pub mod integrals;

/// The scattering mechanisms
pub mod mechanism;

/// Optimisation of the carrier concentration over a temperature range
pub mod optimizer;

/// Single measurement solves
pub mod point;

/// Scalar root finding
mod roots;

/// Numerical settings
pub mod settings;

mod solver;

/// Carrier concentration sweeps
pub mod sweep;

pub use decomposition::decompose_thermal_conductivity;
pub use error::{Quantity, TransportError};
pub use mechanism::ScatteringMechanism;
pub use settings::SolverSettings;
pub use solver::{
    optimize_over_temperature, solve_point, solve_points, sweep_concentration, SpbSolver,
};
