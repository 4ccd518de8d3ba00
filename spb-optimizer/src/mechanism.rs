//! # Scattering mechanisms
//!
//! The closed set of carrier scattering mechanisms understood by the solver. Each variant selects
//! the family of transport integrals used downstream, see [`crate::integrals::ScatteringModel`].

use serde::Deserialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
/// The dominant charge-carrier scattering mechanism
pub enum ScatteringMechanism {
    /// Acoustic deformation potential scattering, `τ ∝ E^{-1/2}`
    #[serde(rename = "ADP")]
    AcousticDeformationPotential,
    /// Polar optical phonon scattering with the full `arcsinh` energy dependence
    #[serde(rename = "POP")]
    PolarOpticalPhonon,
    /// Polar optical phonon scattering in the power-law approximation
    #[serde(rename = "POP2")]
    PolarOpticalPhononPowerLaw,
    /// Ionized impurity scattering in the Brooks-Herring treatment
    #[serde(rename = "IMP")]
    IonizedImpurity,
    /// Ionized impurity scattering in the power-law approximation
    #[serde(rename = "IMP2")]
    IonizedImpurityPowerLaw,
}

impl ScatteringMechanism {
    /// All implemented mechanisms
    pub const ALL: [ScatteringMechanism; 5] = [
        ScatteringMechanism::AcousticDeformationPotential,
        ScatteringMechanism::PolarOpticalPhonon,
        ScatteringMechanism::PolarOpticalPhononPowerLaw,
        ScatteringMechanism::IonizedImpurity,
        ScatteringMechanism::IonizedImpurityPowerLaw,
    ];

    /// The scattering exponent λ of power-law mechanisms, `None` for the full treatments
    pub fn scattering_exponent(&self) -> Option<f64> {
        match self {
            ScatteringMechanism::AcousticDeformationPotential => Some(0.),
            ScatteringMechanism::PolarOpticalPhononPowerLaw => Some(1.),
            ScatteringMechanism::IonizedImpurityPowerLaw => Some(2.),
            ScatteringMechanism::PolarOpticalPhonon | ScatteringMechanism::IonizedImpurity => None,
        }
    }

    /// Whether the transport integrals depend on the effective mass and carrier density
    /// through carrier screening
    pub fn is_screened(&self) -> bool {
        matches!(self, ScatteringMechanism::IonizedImpurity)
    }
}

impl std::fmt::Display for ScatteringMechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ScatteringMechanism::AcousticDeformationPotential => write!(f, "ADP"),
            ScatteringMechanism::PolarOpticalPhonon => write!(f, "POP"),
            ScatteringMechanism::PolarOpticalPhononPowerLaw => write!(f, "POP2"),
            ScatteringMechanism::IonizedImpurity => write!(f, "IMP"),
            ScatteringMechanism::IonizedImpurityPowerLaw => write!(f, "IMP2"),
        }
    }
}
