use super::{
    quadrature::{edge_breakpoints, Quadrature, QuadratureError},
    TransportIntegrals,
};

/// Distance in units of `k T` above the Fermi edge at which the integrals are truncated, the
/// neglected tail is below `e^{-100}` of the whole
const TAIL: f64 = 100.;

/// Occupation `1 / (1 + e^y)` without overflow for large `|y|`
pub(crate) fn occupation(y: f64) -> f64 {
    if y > 0. {
        let decay = (-y).exp();
        decay / (1. + decay)
    } else {
        1. / (1. + y.exp())
    }
}

/// The complete Fermi-Dirac integral `F_ν(η) = ∫₀^∞ x^ν / (1 + e^{x - η}) dx`
///
/// The integral is evaluated in `u = √x`, which removes the integrable singularity at the origin
/// for `ν > -1`. It is split at the Fermi edge `u = √η` and 40 `k T` either side of it, so the
/// adaptive rule never has to find a step of width `1 / √η` inside a wide interval.
pub fn fermi_dirac_integral(
    order: f64,
    reduced_chemical_potential: f64,
    quadrature: &Quadrature,
) -> Result<f64, QuadratureError> {
    if order <= -1. {
        return Err(QuadratureError::Domain(format!(
            "the Fermi-Dirac integral of order {order} diverges"
        )));
    }
    let eta = reduced_chemical_potential;
    let power = 2. * order + 1.;
    let integrand = |u: f64| {
        let occupied = occupation(u * u - eta);
        if occupied == 0. {
            0.
        } else {
            2. * u.powf(power) * occupied
        }
    };

    let breakpoints = edge_breakpoints(eta, eta.max(0.) + TAIL).map(f64::sqrt);
    quadrature.integrate(integrand, &breakpoints)
}

/// Transport integrals for a relaxation time `τ ∝ E^{λ - 1/2}`, expressed through complete
/// Fermi-Dirac integrals
#[derive(Clone, Debug)]
pub struct PowerLaw {
    exponent: f64,
    quadrature: Quadrature,
}

impl PowerLaw {
    pub fn new(exponent: f64, quadrature: Quadrature) -> Self {
        Self {
            exponent,
            quadrature,
        }
    }

    fn fermi(&self, order: f64, eta: f64) -> Result<f64, QuadratureError> {
        fermi_dirac_integral(order, eta, &self.quadrature)
    }
}

impl TransportIntegrals for PowerLaw {
    fn reduced_seebeck(&self, eta: f64) -> Result<f64, QuadratureError> {
        let lambda = self.exponent;
        let f_lambda = self.fermi(lambda, eta)?;
        let f_lambda_1 = self.fermi(lambda + 1., eta)?;
        Ok((2. + lambda) * f_lambda_1 / ((1. + lambda) * f_lambda) - eta)
    }

    fn conductivity_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        Ok((1. + self.exponent) * self.fermi(self.exponent, eta)?)
    }

    fn hall_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        let lambda = self.exponent;
        Ok((0.5 + 2. * lambda) * self.fermi(2. * lambda - 0.5, eta)?)
    }

    fn reduced_lorenz(&self, eta: f64) -> Result<f64, QuadratureError> {
        let lambda = self.exponent;
        let f_lambda = self.fermi(lambda, eta)?;
        let f_lambda_1 = self.fermi(lambda + 1., eta)?;
        let f_lambda_2 = self.fermi(lambda + 2., eta)?;
        let conductivity = (1. + lambda) * f_lambda;
        Ok(((1. + lambda) * (3. + lambda) * f_lambda * f_lambda_2
            - (2. + lambda).powi(2) * f_lambda_1.powi(2))
            / conductivity.powi(2))
    }
}

#[cfg(test)]
mod test {
    use super::{fermi_dirac_integral, PowerLaw};
    use crate::integrals::TransportIntegrals;
    use approx::assert_relative_eq;
    use crate::integrals::Quadrature;
    use proptest::prelude::*;

    fn quadrature() -> Quadrature {
        Quadrature::default()
            .with_relative_tolerance(1e-12)
            .with_maximum_iterations(1000)
    }

    #[test]
    fn zeroth_order_matches_closed_form() {
        for eta in [-20_f64, -3., 0., 2.5, 15., 40.] {
            let value = fermi_dirac_integral(0., eta, &quadrature()).unwrap();
            let exact = if eta > 0. {
                eta + (-eta).exp().ln_1p()
            } else {
                eta.exp().ln_1p()
            };
            assert_relative_eq!(value, exact, max_relative = 1e-10);
        }
    }

    #[test]
    fn deeply_degenerate_integrals_keep_their_fermi_edge() {
        for eta in [2500_f64, 5000., 9000.] {
            let value = fermi_dirac_integral(0., eta, &quadrature()).unwrap();
            assert_relative_eq!(value, eta, max_relative = 1e-10);
            // η^{3/2} / (3/2) (1 + π² / (8 η²))
            let value = fermi_dirac_integral(0.5, eta, &quadrature()).unwrap();
            let sommerfeld =
                eta.powf(1.5) / 1.5 * (1. + std::f64::consts::PI.powi(2) / (8. * eta * eta));
            assert_relative_eq!(value, sommerfeld, max_relative = 1e-9);
        }
    }

    #[test]
    fn degenerate_reduced_seebeck_follows_the_sommerfeld_limit() {
        // s → π² (λ + 1) / (3 η)
        for exponent in [0_f64, 1., 2.] {
            let model = PowerLaw::new(exponent, quadrature());
            for eta in [2500_f64, 5000.] {
                let expected = std::f64::consts::PI.powi(2) * (exponent + 1.) / (3. * eta);
                assert_relative_eq!(
                    model.reduced_seebeck(eta).unwrap(),
                    expected,
                    max_relative = 1e-2
                );
            }
        }
    }

    #[test]
    fn first_and_second_order_at_the_band_edge() {
        let first = fermi_dirac_integral(1., 0., &quadrature()).unwrap();
        assert_relative_eq!(
            first,
            std::f64::consts::PI.powi(2) / 12.,
            max_relative = 1e-10
        );
        let second = fermi_dirac_integral(2., 0., &quadrature()).unwrap();
        // 3 ζ(3) / 2
        assert_relative_eq!(second, 1.803_085_354_739_391_4, max_relative = 1e-10);
    }

    #[test]
    fn non_degenerate_limit_is_boltzmann() {
        // Γ(ν + 1) e^η for η << 0
        let eta = -30_f64;
        let gamma_half = std::f64::consts::PI.sqrt() / 2.;
        let value = fermi_dirac_integral(-0.5, eta, &quadrature()).unwrap();
        assert_relative_eq!(
            value,
            2. * gamma_half * eta.exp(),
            max_relative = 1e-9
        );
        let value = fermi_dirac_integral(1.5, eta, &quadrature()).unwrap();
        assert_relative_eq!(value, 3. / 2. * gamma_half * eta.exp(), max_relative = 1e-9);
    }

    #[test]
    fn divergent_orders_are_rejected() {
        assert!(fermi_dirac_integral(-1.5, 0., &quadrature()).is_err());
    }

    #[test]
    fn acoustic_reduced_seebeck_is_positive_and_decreasing() {
        let model = PowerLaw::new(0., quadrature());
        let mut previous = f64::INFINITY;
        for eta in [-10_f64, -5., -1., 0., 1., 5., 10., 30.] {
            let s = model.reduced_seebeck(eta).unwrap();
            assert!(s > 0.);
            assert!(s < previous);
            previous = s;
        }
    }

    #[test]
    fn acoustic_lorenz_number_spans_classical_and_degenerate_limits() {
        let model = PowerLaw::new(0., quadrature());
        // 2 (k/e)^2 in the non-degenerate limit, π²/3 (k/e)^2 in the degenerate limit
        assert_relative_eq!(model.reduced_lorenz(-20.).unwrap(), 2., max_relative = 1e-6);
        let degenerate = model.reduced_lorenz(200.).unwrap();
        assert_relative_eq!(
            degenerate,
            std::f64::consts::PI.powi(2) / 3.,
            max_relative = 1e-3
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn power_law_lorenz_lies_between_its_limits(
            eta in -30_f64..60.,
            exponent in prop::sample::select(vec![0_f64, 1., 2.]),
        ) {
            let model = PowerLaw::new(exponent, quadrature());
            let lorenz = model.reduced_lorenz(eta).unwrap();
            let degenerate = std::f64::consts::PI.powi(2) / 3.;
            let classical = 2. + exponent;
            prop_assert!(lorenz >= classical.min(degenerate) - 1e-5);
            prop_assert!(lorenz <= classical.max(degenerate) + 1e-5);
        }
    }
}
