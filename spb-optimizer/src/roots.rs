//! # Roots
//!
//! One-dimensional root finding for the monotone residuals of the transport solve. A sign change
//! is first located by expanding a bracket about the initial guess, the bracket is then refined
//! with Brent's method.

use crate::integrals::QuadratureError;
use crate::settings::RootSettings;
use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;

#[derive(thiserror::Error, Debug)]
pub(crate) enum RootError {
    #[error("no sign change found in [{lower}, {upper}]")]
    NotBracketed { lower: f64, upper: f64 },
    #[error("Brent's method did not converge within {iterations} iterations")]
    NotConverged { iterations: u64 },
    #[error(transparent)]
    Integration(#[from] QuadratureError),
    #[error("root solver failed: {0}")]
    Solver(String),
}

/// Search parameters for a single root
#[derive(Copy, Clone, Debug)]
pub(crate) struct Bracketing {
    pub(crate) initial: f64,
    pub(crate) lower_limit: f64,
    pub(crate) upper_limit: f64,
}

impl Bracketing {
    pub(crate) fn new(initial: f64, lower_limit: f64, upper_limit: f64) -> Self {
        Self {
            initial: initial.clamp(lower_limit, upper_limit),
            lower_limit,
            upper_limit,
        }
    }
}

/// Adapter exposing a fallible residual to argmin
struct Residual<F> {
    function: F,
}

impl<F> CostFunction for Residual<F>
where
    F: Fn(f64) -> Result<f64, QuadratureError>,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        Ok((self.function)(*param)?)
    }
}

fn opposite_signs(a: f64, b: f64) -> bool {
    (a <= 0. && b >= 0.) || (a >= 0. && b <= 0.)
}

/// Walk outwards from the initial guess, doubling the step, until the residual changes sign.
/// Returns the tightest bracket found, or the exact root if one is hit on the way.
fn expand_bracket<F>(
    residual: &F,
    bracketing: &Bracketing,
    settings: &RootSettings,
) -> Result<Bracket, RootError>
where
    F: Fn(f64) -> Result<f64, QuadratureError>,
{
    let x0 = bracketing.initial;
    let f0 = residual(x0)?;
    if f0 == 0. {
        return Ok(Bracket::Exact(x0));
    }

    let (mut lower, mut f_lower) = (x0, f0);
    let (mut upper, mut f_upper) = (x0, f0);
    let mut step = settings.initial_step;

    for _ in 0..settings.maximum_expansions {
        let lower_exhausted = lower <= bracketing.lower_limit;
        let upper_exhausted = upper >= bracketing.upper_limit;
        if lower_exhausted && upper_exhausted {
            break;
        }

        if !lower_exhausted {
            let candidate = (x0 - step).max(bracketing.lower_limit);
            let f_candidate = residual(candidate)?;
            if opposite_signs(f_candidate, f_lower) {
                return Ok(Bracket::Interval(candidate, lower));
            }
            lower = candidate;
            f_lower = f_candidate;
        }
        if !upper_exhausted {
            let candidate = (x0 + step).min(bracketing.upper_limit);
            let f_candidate = residual(candidate)?;
            if opposite_signs(f_upper, f_candidate) {
                return Ok(Bracket::Interval(upper, candidate));
            }
            upper = candidate;
            f_upper = f_candidate;
        }
        step *= 2.;
    }

    Err(RootError::NotBracketed { lower, upper })
}

enum Bracket {
    Exact(f64),
    Interval(f64, f64),
}

/// Find a root of `residual` near `bracketing.initial`
pub(crate) fn find_root<F>(
    residual: F,
    bracketing: Bracketing,
    settings: &RootSettings,
) -> Result<f64, RootError>
where
    F: Fn(f64) -> Result<f64, QuadratureError>,
{
    let (lower, upper) = match expand_bracket(&residual, &bracketing, settings)? {
        Bracket::Exact(root) => return Ok(root),
        Bracket::Interval(lower, upper) => (lower, upper),
    };

    let solver = BrentRoot::new(lower, upper, settings.tolerance);
    let result = Executor::new(Residual { function: residual }, solver)
        .configure(|state| state.max_iters(settings.maximum_iterations))
        .run()
        .map_err(|error| match error.downcast::<QuadratureError>() {
            Ok(source) => RootError::Integration(source),
            Err(error) => RootError::Solver(error.to_string()),
        })?;

    let state = result.state();
    if *state.get_termination_status()
        != TerminationStatus::Terminated(TerminationReason::SolverConverged)
    {
        return Err(RootError::NotConverged {
            iterations: state.get_iter(),
        });
    }
    state
        .get_best_param()
        .copied()
        .ok_or_else(|| RootError::Solver("no parameter was recorded".into()))
}

#[cfg(test)]
mod test {
    use super::{find_root, Bracketing, RootError};
    use crate::settings::RootSettings;
    use crate::integrals::QuadratureError;
    use approx::assert_relative_eq;

    #[test]
    fn cubic_root_is_found_far_from_the_guess() {
        let root = find_root(
            |x: f64| Ok::<_, QuadratureError>(x * x * x - 1000.),
            Bracketing::new(1., -100., 100.),
            &RootSettings::default(),
        )
        .unwrap();
        assert_relative_eq!(root, 10., epsilon = 1e-10);
    }

    #[test]
    fn decreasing_residual_is_bracketed_below_the_guess() {
        let root = find_root(
            |x: f64| Ok::<_, QuadratureError>((-x).exp() - 20.),
            Bracketing::new(1., -100., 100.),
            &RootSettings::default(),
        )
        .unwrap();
        assert_relative_eq!(root, -(20_f64.ln()), epsilon = 1e-10);
    }

    #[test]
    fn residual_without_sign_change_is_reported() {
        let result = find_root(
            |x: f64| Ok::<_, QuadratureError>(x * x + 1.),
            Bracketing::new(0., -10., 10.),
            &RootSettings::default(),
        );
        assert!(matches!(result, Err(RootError::NotBracketed { .. })));
    }

    #[test]
    fn quadrature_failures_are_not_swallowed() {
        let result = find_root(
            |_: f64| Err(QuadratureError::NonFinite),
            Bracketing::new(0., -10., 10.),
            &RootSettings::default(),
        );
        assert!(matches!(
            result,
            Err(RootError::Integration(QuadratureError::NonFinite))
        ));
    }
}
