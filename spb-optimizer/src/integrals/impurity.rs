use super::RelaxationTime;
use crate::constants::{BOLTZMANN, ELECTRON_CHARGE, ELECTRON_MASS, EPSILON_0, HBAR};

/// Below this the Brooks-Herring screening function is replaced by its series
const SERIES_THRESHOLD: f64 = 1e-3;

/// The Brooks-Herring screening function `g(b) = ln(1 + b) - b / (1 + b)`
pub(crate) fn screening_function(b: f64) -> f64 {
    if b < SERIES_THRESHOLD {
        let b2 = b * b;
        b2 / 2. - 2. * b2 * b / 3. + 3. * b2 * b2 / 4.
    } else {
        b.ln_1p() - b / (1. + b)
    }
}

/// Free-carrier screening of ionized impurities, fixed by the effective mass, dielectric constant,
/// temperature and carrier concentration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Screening {
    /// `b(x) = prefactor * x`
    prefactor: f64,
}

impl Screening {
    /// `effective_mass` in units of the free electron mass, `concentration` in m^-3
    pub fn new(
        effective_mass: f64,
        dielectric_constant: f64,
        temperature: f64,
        concentration: f64,
    ) -> Self {
        let prefactor = 8.
            * effective_mass
            * ELECTRON_MASS
            * dielectric_constant
            * EPSILON_0
            * BOLTZMANN
            * temperature
            / (HBAR.powi(2) * concentration * ELECTRON_CHARGE);
        Self { prefactor }
    }

    /// The Brooks-Herring parameter at reduced energy `x`
    pub fn parameter(&self, reduced_energy: f64) -> f64 {
        self.prefactor * reduced_energy
    }
}

/// Screened ionized impurity scattering, `τ ∝ x³ / g(b(x))`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BrooksHerring {
    screening: Screening,
}

impl BrooksHerring {
    pub fn new(screening: Screening) -> Self {
        Self { screening }
    }
}

impl RelaxationTime for BrooksHerring {
    fn relaxation_time(&self, reduced_energy: f64) -> f64 {
        if reduced_energy <= 0. {
            return 0.;
        }
        let g = screening_function(self.screening.parameter(reduced_energy));
        if g <= 0. {
            return 0.;
        }
        reduced_energy.powi(3) / g
    }
}
