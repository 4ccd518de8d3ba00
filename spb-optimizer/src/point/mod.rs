//! # Point
//!
//! Recovers the reduced chemical potential and density-of-states effective mass from a single
//! measurement, and from them the intrinsic mobility, Lorenz number, thermal conductivity split,
//! quality factor and figure of merit.
//!
//! The Seebeck coefficient alone fixes `η`. The Hall carrier concentration then fixes the effective
//! mass, for screened impurity scattering the two are coupled and the effective mass is located by
//! a bracket-and-refine scan instead.

mod effective_mass;

use crate::{
    constants::{density_prefactor, ELECTRON_CHARGE, SEEBECK_UNIT},
    error::{Quantity, SolveContext, TransportError},
    integrals::{QuadratureError, ScatteringModel, Screening, TransportIntegrals},
    mechanism::ScatteringMechanism,
    roots::{find_root, Bracketing},
    settings::RootSettings,
    SpbSolver,
};
use effective_mass::{solve_effective_mass, ImpurityScan};
use rayon::prelude::*;

/// Lowest reduced chemical potential considered by root searches
pub(crate) const MINIMUM_REDUCED_CHEMICAL_POTENTIAL: f64 = -100.;

/// A measurement at one temperature, in SI units
///
/// Optional quantities which are absent, or explicitly zero, switch off the outputs which depend on
/// them.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementPoint {
    /// Temperature in K
    pub temperature: f64,
    /// Magnitude of the Seebeck coefficient in V/K
    pub seebeck: f64,
    /// Hall carrier concentration in m^-3
    pub carrier_concentration: Option<f64>,
    /// Hall mobility in m^2 / V s
    pub mobility: Option<f64>,
    /// Total thermal conductivity in W / m K
    pub thermal_conductivity: Option<f64>,
    /// Static relative dielectric constant, required for screened impurity scattering
    pub dielectric_constant: Option<f64>,
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|&value| value != 0.)
}

impl MeasurementPoint {
    pub fn new(temperature: f64, seebeck: f64) -> Self {
        Self {
            temperature,
            seebeck,
            carrier_concentration: None,
            mobility: None,
            thermal_conductivity: None,
            dielectric_constant: None,
        }
    }

    pub fn with_carrier_concentration(self, carrier_concentration: f64) -> Self {
        Self {
            carrier_concentration: Some(carrier_concentration),
            ..self
        }
    }

    pub fn with_mobility(self, mobility: f64) -> Self {
        Self {
            mobility: Some(mobility),
            ..self
        }
    }

    pub fn with_thermal_conductivity(self, thermal_conductivity: f64) -> Self {
        Self {
            thermal_conductivity: Some(thermal_conductivity),
            ..self
        }
    }

    pub fn with_dielectric_constant(self, dielectric_constant: f64) -> Self {
        Self {
            dielectric_constant: Some(dielectric_constant),
            ..self
        }
    }

    pub fn carrier_concentration(&self) -> Option<f64> {
        present(self.carrier_concentration)
    }

    pub fn mobility(&self) -> Option<f64> {
        present(self.mobility)
    }

    pub fn thermal_conductivity(&self) -> Option<f64> {
        present(self.thermal_conductivity)
    }

    pub fn dielectric_constant(&self) -> Option<f64> {
        present(self.dielectric_constant)
    }

    /// The cheap checks made before any numerics run
    fn validate(&self, mechanism: ScatteringMechanism) -> Result<(), TransportError> {
        if !(self.temperature.is_finite() && self.temperature > 0.) {
            return Err(TransportError::DomainPrecondition(format!(
                "the temperature must be positive, found {} K",
                self.temperature
            )));
        }
        if !(self.seebeck.is_finite() && self.seebeck > 0.) {
            return Err(TransportError::DomainPrecondition(format!(
                "the Seebeck coefficient magnitude must be positive, found {} V/K",
                self.seebeck
            )));
        }
        if let Some(concentration) = self.carrier_concentration() {
            if concentration < 0. {
                return Err(TransportError::DomainPrecondition(format!(
                    "the carrier concentration must be positive, found {concentration:e} m^-3"
                )));
            }
        }
        if mechanism == ScatteringMechanism::IonizedImpurity {
            if !matches!(self.dielectric_constant(), Some(value) if value > 0.) {
                return Err(TransportError::DomainPrecondition(
                    "ionized impurity scattering requires a positive dielectric constant".into(),
                ));
            }
            if self.carrier_concentration().is_none() {
                return Err(TransportError::DomainPrecondition(
                    "ionized impurity scattering requires the carrier concentration".into(),
                ));
            }
        }
        Ok(())
    }
}

/// The band parameters recovered from a measurement
#[derive(Clone, Debug, PartialEq)]
pub struct TransportState {
    pub reduced_chemical_potential: f64,
    /// Density-of-states effective mass in units of the free electron mass, zero when the carrier
    /// concentration was not measured
    pub effective_mass: f64,
    /// Intrinsic mobility in m^2 / V s
    pub intrinsic_mobility: f64,
    /// Lorenz number in V^2 / K^2
    pub lorenz_number: f64,
    pub quality_factor: f64,
    /// The dielectric constant the state was solved with, needed to rebuild impurity screening
    pub dielectric_constant: Option<f64>,
}

/// Thermal transport derived from a measurement, zero where the inputs are missing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedProperties {
    /// W / m K
    pub electronic_thermal_conductivity: f64,
    /// W / m K
    pub lattice_thermal_conductivity: f64,
    pub figure_of_merit: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointSolution {
    pub state: TransportState,
    pub derived: DerivedProperties,
}

impl PointSolution {
    /// `(η, m*, μ₀, L, κ_el, κ_L, β, zT)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64, f64, f64, f64) {
        (
            self.state.reduced_chemical_potential,
            self.state.effective_mass,
            self.state.intrinsic_mobility,
            self.state.lorenz_number,
            self.derived.electronic_thermal_conductivity,
            self.derived.lattice_thermal_conductivity,
            self.state.quality_factor,
            self.derived.figure_of_merit,
        )
    }
}

/// Solve `S = (k / e) s(η)` for `η`
pub(crate) fn solve_reduced_chemical_potential(
    model: &ScatteringModel,
    seebeck: f64,
    settings: &RootSettings,
    context: &SolveContext,
) -> Result<f64, TransportError> {
    let target = seebeck / SEEBECK_UNIT;
    find_root(
        |eta| Ok(model.reduced_seebeck(eta)? - target),
        Bracketing::new(
            1.,
            MINIMUM_REDUCED_CHEMICAL_POTENTIAL,
            model.maximum_reduced_chemical_potential(),
        ),
        settings,
    )
    .map_err(|error| context.root(Quantity::ReducedChemicalPotential, error))
}

/// The Hall carrier concentration in m^-3 of a band with effective mass `effective_mass` in units
/// of the free electron mass
pub(crate) fn carrier_density(
    model: &ScatteringModel,
    eta: f64,
    effective_mass: f64,
    temperature: f64,
) -> Result<f64, QuadratureError> {
    Ok(density_prefactor() * (effective_mass * temperature).powf(1.5) * model.density_integral(eta)?)
}

impl SpbSolver {
    /// Recover the band parameters and derived transport at a single measurement
    #[tracing::instrument(name = "Point solve", level = "debug", skip(self, point), fields(temperature = point.temperature))]
    pub fn solve_point(
        &self,
        point: &MeasurementPoint,
        mechanism: ScatteringMechanism,
    ) -> Result<PointSolution, TransportError> {
        point.validate(mechanism)?;
        let settings = self.settings();
        let concentration = point.carrier_concentration();
        let context = SolveContext::new(mechanism, point.temperature, concentration.unwrap_or(0.));

        let (model, eta, effective_mass) = match (mechanism, concentration, point.dielectric_constant()) {
            (ScatteringMechanism::IonizedImpurity, Some(concentration), Some(dielectric_constant)) => {
                let outcome = ImpurityScan::new(
                    settings,
                    point.seebeck,
                    point.temperature,
                    concentration,
                    dielectric_constant,
                    context,
                )
                .run()?;
                let screening = Screening::new(
                    outcome.effective_mass,
                    dielectric_constant,
                    point.temperature,
                    concentration,
                );
                let model = ScatteringModel::new(mechanism, settings, Some(screening))?;
                (model, outcome.reduced_chemical_potential, outcome.effective_mass)
            }
            _ => {
                let model = ScatteringModel::new(mechanism, settings, None)?;
                let eta = solve_reduced_chemical_potential(&model, point.seebeck, &settings.roots, &context)?;
                let effective_mass = match concentration {
                    Some(concentration) => solve_effective_mass(
                        &model,
                        eta,
                        point.temperature,
                        concentration,
                        &settings.roots,
                        &context,
                    )?,
                    None => 0.,
                };
                (model, eta, effective_mass)
            }
        };
        tracing::debug!(eta, effective_mass, "Recovered band parameters");

        self.derive_transport(point, &model, eta, effective_mass, &context)
    }

    /// Solve many independent measurements in parallel, one result per point in input order
    pub fn solve_points(
        &self,
        points: &[MeasurementPoint],
        mechanism: ScatteringMechanism,
    ) -> Vec<Result<PointSolution, TransportError>> {
        tracing::info!("Solving {} measurements for {mechanism} scattering", points.len());
        points
            .par_iter()
            .map(|point| self.solve_point(point, mechanism))
            .collect()
    }

    fn derive_transport(
        &self,
        point: &MeasurementPoint,
        model: &ScatteringModel,
        eta: f64,
        effective_mass: f64,
        context: &SolveContext,
    ) -> Result<PointSolution, TransportError> {
        let temperature = point.temperature;
        let conductivity = model
            .conductivity_integral(eta)
            .map_err(|e| context.integration(e))?;
        let hall = model.hall_integral(eta).map_err(|e| context.integration(e))?;
        let reduced_lorenz = model.reduced_lorenz(eta).map_err(|e| context.integration(e))?;

        let intrinsic_mobility = point
            .mobility()
            .map(|mobility| mobility * conductivity / hall)
            .unwrap_or(0.);
        let lorenz_number = SEEBECK_UNIT.powi(2) * reduced_lorenz;

        let mut derived = DerivedProperties::default();
        let mut quality_factor = 0.;
        if let (Some(concentration), Some(mobility)) = (point.carrier_concentration(), point.mobility()) {
            derived.electronic_thermal_conductivity =
                temperature * lorenz_number * ELECTRON_CHARGE * concentration * mobility;
            if let Some(thermal_conductivity) = point.thermal_conductivity() {
                derived.lattice_thermal_conductivity =
                    thermal_conductivity - derived.electronic_thermal_conductivity;
                derived.figure_of_merit = temperature * point.seebeck.powi(2) * concentration
                    * ELECTRON_CHARGE
                    * mobility
                    / thermal_conductivity;
                quality_factor = intrinsic_mobility * effective_mass.powf(1.5) * temperature.powf(2.5)
                    / derived.lattice_thermal_conductivity;
            }
        }

        Ok(PointSolution {
            state: TransportState {
                reduced_chemical_potential: eta,
                effective_mass,
                intrinsic_mobility,
                lorenz_number,
                quality_factor,
                dielectric_constant: point.dielectric_constant(),
            },
            derived,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{carrier_density, MeasurementPoint};
    use crate::{
        constants::{ELECTRON_CHARGE, SEEBECK_UNIT},
        error::TransportError,
        integrals::{ScatteringModel, TransportIntegrals},
        mechanism::ScatteringMechanism,
        settings::SolverSettings,
        solve_point, solve_points,
    };
    use approx::assert_relative_eq;

    /// 300 K, 200 μV/K, 1e19 cm^-3, 100 cm^2/Vs, 2 W/mK
    fn measurement() -> MeasurementPoint {
        MeasurementPoint::new(300., 200e-6)
            .with_carrier_concentration(1e25)
            .with_mobility(1e-2)
            .with_thermal_conductivity(2.)
    }

    #[test]
    fn acoustic_measurement_gives_a_plausible_band() {
        let solution =
            solve_point(&measurement(), ScatteringMechanism::AcousticDeformationPotential).unwrap();
        let (eta, mass, intrinsic_mobility, lorenz, electronic, lattice, beta, zt) =
            solution.as_tuple();
        assert!(eta > -0.5 && eta < 1., "η = {eta}");
        assert!(mass > 0.1 && mass < 1., "m* = {mass}");
        assert!(zt > 0.05 && zt < 1., "zT = {zt}");
        assert!(intrinsic_mobility > 1e-2);
        assert!(lorenz > 1.4e-8 && lorenz < 2.44e-8);
        assert_relative_eq!(electronic + lattice, 2., max_relative = 1e-12);
        assert!(beta > 0.);
    }

    #[test]
    fn recovered_parameters_reproduce_the_measurement() {
        let point = measurement();
        let settings = SolverSettings::default();
        for mechanism in [
            ScatteringMechanism::AcousticDeformationPotential,
            ScatteringMechanism::PolarOpticalPhonon,
            ScatteringMechanism::PolarOpticalPhononPowerLaw,
            ScatteringMechanism::IonizedImpurityPowerLaw,
        ] {
            let solution = solve_point(&point, mechanism).unwrap();
            let model = ScatteringModel::new(mechanism, &settings, None).unwrap();
            let eta = solution.state.reduced_chemical_potential;
            assert_relative_eq!(
                SEEBECK_UNIT * model.reduced_seebeck(eta).unwrap(),
                point.seebeck,
                max_relative = 1e-8
            );
            let density =
                carrier_density(&model, eta, solution.state.effective_mass, point.temperature)
                    .unwrap();
            assert_relative_eq!(density, 1e25, max_relative = 1e-8);
        }
    }

    #[test]
    fn wiedemann_franz_relation_holds() {
        let point = measurement();
        let solution = solve_point(&point, ScatteringMechanism::PolarOpticalPhononPowerLaw).unwrap();
        let conductivity = 1e25 * ELECTRON_CHARGE * 1e-2;
        assert_relative_eq!(
            solution.derived.electronic_thermal_conductivity / (conductivity * point.temperature),
            solution.state.lorenz_number,
            max_relative = 1e-12
        );
    }

    #[test]
    fn missing_thermal_conductivity_zeroes_the_thermal_outputs() {
        let point = MeasurementPoint {
            thermal_conductivity: Some(0.),
            ..measurement()
        };
        let solution = solve_point(&point, ScatteringMechanism::AcousticDeformationPotential).unwrap();
        assert_eq!(solution.derived.lattice_thermal_conductivity, 0.);
        assert_eq!(solution.derived.figure_of_merit, 0.);
        assert_eq!(solution.state.quality_factor, 0.);
        assert!(solution.derived.electronic_thermal_conductivity > 0.);
    }

    #[test]
    fn seebeck_only_measurement_still_gives_the_lorenz_number() {
        let point = MeasurementPoint::new(300., 200e-6);
        let solution = solve_point(&point, ScatteringMechanism::AcousticDeformationPotential).unwrap();
        assert_eq!(solution.state.effective_mass, 0.);
        assert_eq!(solution.state.intrinsic_mobility, 0.);
        assert_eq!(solution.derived, Default::default());
        assert!(solution.state.lorenz_number > 0.);
    }

    #[test]
    fn larger_seebeck_means_a_lower_chemical_potential() {
        let mut previous = f64::INFINITY;
        for seebeck in [50e-6, 100e-6, 200e-6, 400e-6] {
            let point = MeasurementPoint::new(300., seebeck);
            let eta = solve_point(&point, ScatteringMechanism::PolarOpticalPhonon)
                .unwrap()
                .state
                .reduced_chemical_potential;
            assert!(eta < previous);
            previous = eta;
        }
    }

    #[test]
    fn power_law_seebeck_solves_across_the_measurable_range() {
        let settings = SolverSettings::default();
        // μV/K, from deeply degenerate to strongly non-degenerate
        let seebecks = [0.11, 1., 10., 100., 500., 1000., 1499.];
        for mechanism in [
            ScatteringMechanism::AcousticDeformationPotential,
            ScatteringMechanism::PolarOpticalPhononPowerLaw,
            ScatteringMechanism::IonizedImpurityPowerLaw,
        ] {
            let model = ScatteringModel::new(mechanism, &settings, None).unwrap();
            let etas = seebecks
                .map(|s| s * 1e-6)
                .map(|seebeck| {
                    let point = MeasurementPoint::new(300., seebeck);
                    let eta = solve_point(&point, mechanism)
                        .unwrap_or_else(|e| panic!("{mechanism} at {seebeck:e} V/K: {e}"))
                        .state
                        .reduced_chemical_potential;
                    assert_relative_eq!(
                        SEEBECK_UNIT * model.reduced_seebeck(eta).unwrap(),
                        seebeck,
                        max_relative = 1e-3
                    );
                    eta
                });
            for pair in etas.windows(2) {
                assert!(pair[1] < pair[0], "{mechanism}: {etas:?}");
            }
            // s ≈ π² (λ + 1) / 3η when degenerate, s ≈ (2 + λ) - η when not
            assert!(etas[0] > 2000., "{mechanism}: {etas:?}");
            assert!(etas[6] < -10., "{mechanism}: {etas:?}");
        }
    }

    #[test]
    fn preconditions_are_checked_before_solving() {
        let cold = MeasurementPoint::new(0., 200e-6);
        assert!(matches!(
            solve_point(&cold, ScatteringMechanism::AcousticDeformationPotential),
            Err(TransportError::DomainPrecondition(_))
        ));
        let negative = MeasurementPoint::new(300., -200e-6);
        assert!(matches!(
            solve_point(&negative, ScatteringMechanism::AcousticDeformationPotential),
            Err(TransportError::DomainPrecondition(_))
        ));
        assert!(matches!(
            solve_point(&measurement(), ScatteringMechanism::IonizedImpurity),
            Err(TransportError::DomainPrecondition(_))
        ));
        let no_concentration = MeasurementPoint::new(300., 200e-6).with_dielectric_constant(10.);
        assert!(matches!(
            solve_point(&no_concentration, ScatteringMechanism::IonizedImpurity),
            Err(TransportError::DomainPrecondition(_))
        ));
    }

    #[test]
    fn batch_results_follow_input_order() {
        let points = vec![
            MeasurementPoint::new(300., 100e-6),
            MeasurementPoint::new(0., 100e-6),
            MeasurementPoint::new(300., 300e-6),
        ];
        let results = solve_points(&points, ScatteringMechanism::AcousticDeformationPotential);
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());
        let first = results[0].as_ref().unwrap().state.reduced_chemical_potential;
        let last = results[2].as_ref().unwrap().state.reduced_chemical_potential;
        assert!(first > last);
    }
}
