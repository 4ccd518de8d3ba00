//! Adaptive Gauss-Kronrod quadrature of the transport integrands
//!
//! Every integral is split into pieces at caller-supplied breakpoints, each piece is handed to
//! `quad_rs` and the pieces are summed.

use miette::Diagnostic;
use quad_rs::{EvaluationError, Integrable, Integrator};

/// Width in units of `k T` either side of the Fermi level beyond which the occupation is
/// indistinguishable from a step in double precision
pub(crate) const EDGE_HALF_WIDTH: f64 = 40.;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Diagnostic)]
/// Failures of the adaptive integrator
pub enum QuadratureError {
    #[error("adaptive quadrature failed on [{lower}, {upper}]: {reason}")]
    #[diagnostic(code(spb::quadrature::integration))]
    Integration { lower: f64, upper: f64, reason: String },
    #[error("the integrand evaluated to a non-finite value")]
    #[diagnostic(code(spb::quadrature::non_finite))]
    NonFinite,
    #[error("invalid integration domain: {0}")]
    Domain(String),
}

struct Integrand<'a, F> {
    function: &'a F,
}

impl<'a, F> Integrable for Integrand<'a, F>
where
    F: Fn(f64) -> f64 + Sync,
{
    type Input = f64;
    type Output = f64;

    fn integrand(&self, input: &f64) -> Result<f64, EvaluationError<f64>> {
        Ok((self.function)(*input))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quadrature {
    relative_tolerance: f64,
    maximum_iterations: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-10,
            maximum_iterations: 1000,
        }
    }
}

impl Quadrature {
    pub fn with_relative_tolerance(mut self, relative_tolerance: f64) -> Self {
        self.relative_tolerance = relative_tolerance;
        self
    }

    pub fn with_maximum_iterations(mut self, maximum_iterations: usize) -> Self {
        self.maximum_iterations = maximum_iterations;
        self
    }

    /// `∫ f` from the first to the last of `breakpoints`, which must be ascending. Empty pieces
    /// between repeated breakpoints are skipped.
    pub(crate) fn integrate<F>(
        &self,
        integrand: F,
        breakpoints: &[f64],
    ) -> Result<f64, QuadratureError>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        let integrator = Integrator::default()
            .with_maximum_iter(self.maximum_iterations)
            .relative_tolerance(self.relative_tolerance);

        breakpoints
            .windows(2)
            .filter(|piece| piece[1] > piece[0])
            .try_fold(0., |total, piece| {
                let (lower, upper) = (piece[0], piece[1]);
                let failure = |reason: String| QuadratureError::Integration {
                    lower,
                    upper,
                    reason,
                };
                let solution = integrator
                    .integrate(
                        Integrand {
                            function: &integrand,
                        },
                        lower..upper,
                    )
                    .map_err(|error| failure(format!("{error:?}")))?;
                let value = solution
                    .result
                    .result
                    .ok_or_else(|| failure("no result was recorded".into()))?;
                if value.is_finite() {
                    Ok(total + value)
                } else {
                    Err(QuadratureError::NonFinite)
                }
            })
    }
}

/// Breakpoints on `[0, upper]` bracketing the Fermi edge at `η`: the edge itself and the points
/// `EDGE_HALF_WIDTH` either side of it, where they fall inside the interval
pub(crate) fn edge_breakpoints(eta: f64, upper: f64) -> [f64; 5] {
    let clamp = |x: f64| x.clamp(0., upper);
    [
        0.,
        clamp(eta - EDGE_HALF_WIDTH),
        clamp(eta),
        clamp(eta + EDGE_HALF_WIDTH),
        upper,
    ]
}

#[cfg(test)]
mod test {
    use super::{edge_breakpoints, Quadrature};
    use approx::assert_relative_eq;

    #[test]
    fn pieces_are_summed() {
        let quadrature = Quadrature::default().with_relative_tolerance(1e-12);
        let value = quadrature
            .integrate(|x: f64| x.cos(), &[0., 0.5, 0.5, 1., std::f64::consts::FRAC_PI_2])
            .unwrap();
        assert_relative_eq!(value, 1., max_relative = 1e-11);
    }

    #[test]
    fn a_single_breakpoint_integrates_to_nothing() {
        let value = Quadrature::default().integrate(|x: f64| x, &[3.]).unwrap();
        assert_eq!(value, 0.);
    }

    #[test]
    fn edge_breakpoints_are_clamped_and_ascending() {
        assert_eq!(edge_breakpoints(-60., 300.), [0., 0., 0., 0., 300.]);
        assert_eq!(edge_breakpoints(10., 300.), [0., 0., 10., 50., 300.]);
        assert_eq!(edge_breakpoints(280., 300.), [0., 240., 280., 300., 300.]);
    }
}
