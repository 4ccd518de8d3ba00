use super::RelaxationTime;

/// Polar optical phonon scattering above the Debye temperature, `τ ∝ x² / arcsinh(√x)` up to
/// the factor shared by every moment
#[derive(Copy, Clone, Debug, Default)]
pub struct PolarOpticalPhonon;

impl RelaxationTime for PolarOpticalPhonon {
    fn relaxation_time(&self, reduced_energy: f64) -> f64 {
        if reduced_energy <= 0. {
            return 0.;
        }
        reduced_energy.powi(2) / reduced_energy.sqrt().asinh()
    }
}
