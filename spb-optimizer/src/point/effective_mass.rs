use super::{carrier_density, solve_reduced_chemical_potential};
use crate::{
    constants::density_prefactor,
    error::{Quantity, SolveContext, TransportError},
    integrals::{QuadratureError, ScatteringModel, Screening, TransportIntegrals},
    mechanism::ScatteringMechanism,
    roots::{find_root, Bracketing},
    settings::{RootSettings, SolverSettings},
};

const MINIMUM_EFFECTIVE_MASS: f64 = 1e-4;
const MAXIMUM_EFFECTIVE_MASS: f64 = 1e4;

/// Solve `n = N(m*) G² / H` for the effective mass at fixed `η`. The search runs in `ln m*` from
/// `m* = 1`, on the relative residual so that the tolerance is independent of the concentration.
pub(super) fn solve_effective_mass(
    model: &ScatteringModel,
    eta: f64,
    temperature: f64,
    concentration: f64,
    settings: &RootSettings,
    context: &SolveContext,
) -> Result<f64, TransportError> {
    let density_integral = model
        .density_integral(eta)
        .map_err(|e| context.integration(e))?;
    let scale = density_prefactor() * temperature.powf(1.5) * density_integral / concentration;
    find_root(
        |log_mass: f64| Ok::<_, QuadratureError>(scale * (1.5 * log_mass).exp() - 1.),
        Bracketing::new(
            0.,
            MINIMUM_EFFECTIVE_MASS.ln(),
            MAXIMUM_EFFECTIVE_MASS.ln(),
        ),
        settings,
    )
    .map(f64::exp)
    .map_err(|error| context.root(Quantity::EffectiveMass, error))
}

/// The outcome of the impurity scan, taken at the first trial mass which over-predicts the
/// concentration
#[derive(Copy, Clone, Debug)]
pub(super) struct ScanOutcome {
    pub(super) effective_mass: f64,
    pub(super) reduced_chemical_potential: f64,
    /// Residual `n - n(m*)` of the last trial which under-predicted the concentration
    pub(super) residual: f64,
}

struct Pass {
    outcome: ScanOutcome,
    step: f64,
}

/// Bracket-and-refine search for the effective mass under screened impurity scattering
///
/// Screening depends on the effective mass, so `η` has to be re-solved for every trial mass. Each
/// pass scans trial masses `k / step` on an integer lattice, stopping at the first one whose
/// predicted concentration exceeds the measurement. The next pass refines the lattice tenfold
/// about that crossing.
pub(super) struct ImpurityScan<'a> {
    settings: &'a SolverSettings,
    seebeck: f64,
    temperature: f64,
    concentration: f64,
    dielectric_constant: f64,
    context: SolveContext,
}

impl<'a> ImpurityScan<'a> {
    pub(super) fn new(
        settings: &'a SolverSettings,
        seebeck: f64,
        temperature: f64,
        concentration: f64,
        dielectric_constant: f64,
        context: SolveContext,
    ) -> Self {
        Self {
            settings,
            seebeck,
            temperature,
            concentration,
            dielectric_constant,
            context,
        }
    }

    /// Residual `n - n(m*)` and the `η` solved at the trial mass
    fn trial(&self, effective_mass: f64) -> Result<(f64, f64), TransportError> {
        let screening = Screening::new(
            effective_mass,
            self.dielectric_constant,
            self.temperature,
            self.concentration,
        );
        let model = ScatteringModel::new(
            ScatteringMechanism::IonizedImpurity,
            self.settings,
            Some(screening),
        )?;
        let eta = solve_reduced_chemical_potential(
            &model,
            self.seebeck,
            &self.settings.roots,
            &self.context,
        )?;
        let density = carrier_density(&model, eta, effective_mass, self.temperature)
            .map_err(|e| self.context.integration(e))?;
        Ok((eta, self.concentration - density))
    }

    fn pass(&self, start: f64, end: f64, step: f64) -> Result<Pass, TransportError> {
        let step = step * 10.;
        let first = (start * 10.).floor() as i64;
        let last = (end * 10.).floor() as i64;

        let mut last_positive = None;
        for k in first.max(1)..last {
            let effective_mass = k as f64 / step;
            let (eta, residual) = self.trial(effective_mass)?;
            if residual < 0. {
                let residual = last_positive.ok_or_else(|| {
                    self.context.convergence(
                        Quantity::EffectiveMass,
                        format!(
                            "the first trial mass {effective_mass} already exceeds the measured concentration"
                        ),
                    )
                })?;
                return Ok(Pass {
                    outcome: ScanOutcome {
                        effective_mass,
                        reduced_chemical_potential: eta,
                        residual,
                    },
                    step,
                });
            }
            last_positive = Some(residual);
        }
        Err(self.context.convergence(
            Quantity::EffectiveMass,
            format!(
                "no crossing of the measured concentration between {} and {}",
                first as f64 / step,
                last as f64 / step
            ),
        ))
    }

    pub(super) fn run(&self) -> Result<ScanOutcome, TransportError> {
        let search = &self.settings.impurity_search;
        let accepted = search.accepted_residual(self.concentration);
        let mut step = search.resolution / (self.seebeck * 1e6);
        let (mut start, mut end) = (search.start, search.end);

        for pass in 0..search.maximum_passes {
            let Pass { outcome, step: refined } = self.pass(start, end, step)?;
            tracing::debug!(
                pass,
                effective_mass = outcome.effective_mass,
                residual = outcome.residual,
                "Impurity scan pass"
            );
            if outcome.residual <= accepted {
                return Ok(outcome);
            }
            step = refined;
            start = ((outcome.effective_mass - 1. / step) * step).round();
            end = ((outcome.effective_mass + 1. / step) * step).round();
        }

        Err(self.context.convergence(
            Quantity::EffectiveMass,
            format!(
                "the concentration residual stayed above {accepted:e} m^-3 after {} passes",
                search.maximum_passes
            ),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::{solve_effective_mass, ImpurityScan};
    use crate::{
        error::{SolveContext, TransportError},
        integrals::ScatteringModel,
        mechanism::ScatteringMechanism,
        point::carrier_density,
        settings::SolverSettings,
    };
    use approx::assert_relative_eq;

    #[test]
    fn effective_mass_matches_the_closed_form_inversion() {
        let settings = SolverSettings::default();
        let mechanism = ScatteringMechanism::AcousticDeformationPotential;
        let model = ScatteringModel::new(mechanism, &settings, None).unwrap();
        let context = SolveContext::new(mechanism, 300., 1e25);
        let mass = solve_effective_mass(&model, 0.3, 300., 1e25, &settings.roots, &context).unwrap();
        // n ∝ m*^{3/2}
        let unit_mass_density = carrier_density(&model, 0.3, 1., 300.).unwrap();
        assert_relative_eq!(mass, (1e25 / unit_mass_density).powf(2. / 3.), max_relative = 1e-10);
    }

    #[test]
    fn scan_meets_the_absolute_residual_under_default_settings() {
        let settings = SolverSettings::default();
        let context = SolveContext::new(ScatteringMechanism::IonizedImpurity, 300., 1e25);
        let outcome = ImpurityScan::new(&settings, 200e-6, 300., 1e25, 12., context)
            .run()
            .unwrap();
        assert!(outcome.residual >= 0.);
        assert!(outcome.residual <= 1e12, "residual {:e}", outcome.residual);
        assert_relative_eq!(outcome.effective_mass, 0.258_577_405_948, max_relative = 1e-6);
    }

    #[test]
    fn scan_without_a_crossing_is_a_convergence_error() {
        let settings = SolverSettings::default();
        let context = SolveContext::new(ScatteringMechanism::IonizedImpurity, 300., 1e10);
        // a vanishing concentration is over-predicted by every trial mass
        let scan = ImpurityScan::new(&settings, 200e-6, 300., 1e10, 10., context);
        assert!(matches!(
            scan.run(),
            Err(TransportError::Convergence { .. })
        ));
    }
}
