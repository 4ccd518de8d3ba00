//! Synthetic measurements generated from bands with known parameters, used to check that the
//! solver recovers what went in.

use rand::Rng;
use spb_optimizer::{
    point::{MeasurementPoint, TransportState},
    ScatteringMechanism, SpbSolver, TransportError,
};

/// A band with a known effective mass, probed at a chosen carrier concentration
#[derive(Clone, Debug)]
pub struct SyntheticBand {
    pub mechanism: ScatteringMechanism,
    /// K
    pub temperature: f64,
    /// In units of the free electron mass
    pub effective_mass: f64,
    /// Only used for `IMP`
    pub dielectric_constant: Option<f64>,
}

/// A generated measurement and the chemical potential it was generated at
#[derive(Clone, Debug)]
pub struct Synthetic {
    pub point: MeasurementPoint,
    pub reduced_chemical_potential: f64,
}

impl SyntheticBand {
    /// The Seebeck coefficient the band shows at `concentration` in m^-3
    ///
    /// The forward model is the first cell of a concentration sweep with the band held fixed.
    pub fn measurement(&self, concentration: f64) -> Result<Synthetic, TransportError> {
        let state = TransportState {
            reduced_chemical_potential: 0.,
            effective_mass: self.effective_mass,
            intrinsic_mobility: 0.,
            lorenz_number: 0.,
            quality_factor: 0.,
            dielectric_constant: self.dielectric_constant,
        };
        let sweep = SpbSolver::default().sweep_concentration(
            self.temperature,
            &state,
            concentration,
            10. * concentration,
            self.mechanism,
        )?;
        let point = MeasurementPoint::new(self.temperature, sweep.seebeck[0])
            .with_carrier_concentration(concentration);
        let point = match self.dielectric_constant {
            Some(dielectric_constant) => point.with_dielectric_constant(dielectric_constant),
            None => point,
        };
        Ok(Synthetic {
            point,
            reduced_chemical_potential: sweep.reduced_chemical_potential[0],
        })
    }
}

/// A random band and concentration in the range typical of thermoelectrics: 300 to 800 K,
/// `m*` from 0.3 to 3 and 1e18 to 3e20 cm^-3
pub fn random_band<R: Rng>(rng: &mut R, mechanism: ScatteringMechanism) -> (SyntheticBand, f64) {
    let band = SyntheticBand {
        mechanism,
        temperature: rng.gen_range(300.0..800.0),
        effective_mass: rng.gen_range(0.3..3.0),
        dielectric_constant: mechanism
            .is_screened()
            .then(|| rng.gen_range(5.0..50.0)),
    };
    let concentration = 10_f64.powf(rng.gen_range(24.0..26.5));
    (band, concentration)
}
