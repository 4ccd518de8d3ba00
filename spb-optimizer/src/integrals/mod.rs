//! # Transport integrals
//!
//! Scattering-specific generalised Fermi-Dirac integrals in the single parabolic band model. All
//! quantities are functions of the reduced chemical potential `η` and are dimensionless:
//!
//! - the reduced Seebeck coefficient `s(η)`, with `S = (k / e) s`,
//! - the conductivity integral `G(η)` and Hall integral `H(η)`, which give the Hall factor
//!   `G² / H` relating the Hall concentration to the density of states,
//! - the reduced Lorenz number `ℓ(η)`, with `L = (k / e)² ℓ`.
//!
//! Power-law mechanisms are closed forms in complete Fermi-Dirac integrals. Polar optical phonon and
//! screened impurity scattering have no power law and are integrated against the window
//! `-∂f/∂x` directly.

mod fermi;
mod impurity;
mod polar;
mod quadrature;
mod window;

pub use fermi::{fermi_dirac_integral, PowerLaw};
pub use impurity::{BrooksHerring, Screening};
pub use polar::PolarOpticalPhonon;
pub use quadrature::{Quadrature, QuadratureError};
pub use window::{RelaxationTime, WindowedIntegrals};

use crate::{error::TransportError, mechanism::ScatteringMechanism, settings::SolverSettings};

/// The combinations of transport integrals needed by the solver
pub trait TransportIntegrals {
    fn reduced_seebeck(&self, eta: f64) -> Result<f64, QuadratureError>;
    fn conductivity_integral(&self, eta: f64) -> Result<f64, QuadratureError>;
    fn hall_integral(&self, eta: f64) -> Result<f64, QuadratureError>;
    fn reduced_lorenz(&self, eta: f64) -> Result<f64, QuadratureError>;

    /// `G² / H`, relating the Hall carrier concentration to the density of states
    fn density_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        let conductivity = self.conductivity_integral(eta)?;
        Ok(conductivity.powi(2) / self.hall_integral(eta)?)
    }
}

/// A scattering mechanism resolved into its transport integrals
#[derive(Clone, Debug)]
pub enum ScatteringModel {
    PowerLaw(PowerLaw),
    PolarOptical(WindowedIntegrals<PolarOpticalPhonon>),
    IonizedImpurity(WindowedIntegrals<BrooksHerring>),
}

impl ScatteringModel {
    /// Resolve `mechanism`. Only screened impurity scattering consumes `screening`, for which it is
    /// mandatory.
    pub fn new(
        mechanism: ScatteringMechanism,
        settings: &SolverSettings,
        screening: Option<Screening>,
    ) -> Result<Self, TransportError> {
        let quadrature = settings.quadrature.quadrature();
        match (mechanism, mechanism.scattering_exponent()) {
            (_, Some(exponent)) => Ok(ScatteringModel::PowerLaw(PowerLaw::new(exponent, quadrature))),
            (ScatteringMechanism::IonizedImpurity, None) => {
                let screening = screening.ok_or_else(|| {
                    TransportError::DomainPrecondition(
                        "ionized impurity scattering requires carrier screening".into(),
                    )
                })?;
                Ok(ScatteringModel::IonizedImpurity(WindowedIntegrals::new(
                    BrooksHerring::new(screening),
                    settings.window_cutoff,
                    quadrature,
                )))
            }
            (_, None) => Ok(ScatteringModel::PolarOptical(WindowedIntegrals::new(
                PolarOpticalPhonon,
                settings.window_cutoff,
                quadrature,
            ))),
        }
    }

    /// Upper limit for root searches in η, windowed integrals lose the window beyond the cutoff
    pub(crate) fn maximum_reduced_chemical_potential(&self) -> f64 {
        match self {
            ScatteringModel::PowerLaw(_) => 1e4,
            ScatteringModel::PolarOptical(integrals) => 0.95 * integrals.cutoff(),
            ScatteringModel::IonizedImpurity(integrals) => 0.95 * integrals.cutoff(),
        }
    }
}

impl TransportIntegrals for ScatteringModel {
    fn reduced_seebeck(&self, eta: f64) -> Result<f64, QuadratureError> {
        match self {
            ScatteringModel::PowerLaw(model) => model.reduced_seebeck(eta),
            ScatteringModel::PolarOptical(model) => model.reduced_seebeck(eta),
            ScatteringModel::IonizedImpurity(model) => model.reduced_seebeck(eta),
        }
    }

    fn conductivity_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        match self {
            ScatteringModel::PowerLaw(model) => model.conductivity_integral(eta),
            ScatteringModel::PolarOptical(model) => model.conductivity_integral(eta),
            ScatteringModel::IonizedImpurity(model) => model.conductivity_integral(eta),
        }
    }

    fn hall_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        match self {
            ScatteringModel::PowerLaw(model) => model.hall_integral(eta),
            ScatteringModel::PolarOptical(model) => model.hall_integral(eta),
            ScatteringModel::IonizedImpurity(model) => model.hall_integral(eta),
        }
    }

    fn reduced_lorenz(&self, eta: f64) -> Result<f64, QuadratureError> {
        match self {
            ScatteringModel::PowerLaw(model) => model.reduced_lorenz(eta),
            ScatteringModel::PolarOptical(model) => model.reduced_lorenz(eta),
            ScatteringModel::IonizedImpurity(model) => model.reduced_lorenz(eta),
        }
    }
}
