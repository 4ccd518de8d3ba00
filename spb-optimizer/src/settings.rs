//! Numerical settings shared by every solve
//!
//! All fields carry defaults, so a partial configuration file only needs to name the values it
//! overrides.

use crate::integrals::Quadrature;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverSettings {
    /// Adaptive quadrature used for every transport integral
    pub quadrature: QuadratureSettings,
    /// Bracketing and Brent refinement of one-dimensional roots
    pub roots: RootSettings,
    /// Upper limit of the windowed polar-optical and impurity integrals in units of `k T`
    pub window_cutoff: f64,
    /// The bracket-and-refine effective mass search used for screened impurity scattering
    pub impurity_search: ImpuritySearch,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            quadrature: QuadratureSettings::default(),
            roots: RootSettings::default(),
            window_cutoff: 300.,
            impurity_search: ImpuritySearch::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuadratureSettings {
    pub relative_tolerance: f64,
    /// Bisections allowed for each piece of an integral
    pub maximum_iterations: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-10,
            maximum_iterations: 1000,
        }
    }
}

impl QuadratureSettings {
    pub(crate) fn quadrature(&self) -> Quadrature {
        Quadrature::default()
            .with_relative_tolerance(self.relative_tolerance)
            .with_maximum_iterations(self.maximum_iterations)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RootSettings {
    /// Absolute tolerance on the root passed to Brent's method
    pub tolerance: f64,
    pub maximum_iterations: u64,
    /// Number of step doublings attempted when searching for a sign change
    pub maximum_expansions: usize,
    /// Initial half width of the bracket search
    pub initial_step: f64,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-13,
            maximum_iterations: 200,
            maximum_expansions: 60,
            initial_step: 0.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpuritySearch {
    /// Absolute residual in m^-3 below which the scan is accepted
    pub tolerance: f64,
    /// Optional relative floor on the accepted residual, off unless set
    pub relative_tolerance: f64,
    /// Resolution numerator, the first pass uses a step of `resolution / S[μV/K]`
    pub resolution: f64,
    /// Initial scan window in units of the step
    pub start: f64,
    pub end: f64,
    pub maximum_passes: usize,
}

impl Default for ImpuritySearch {
    fn default() -> Self {
        Self {
            tolerance: 1e12,
            relative_tolerance: 0.,
            resolution: 5000.,
            start: 1.,
            end: 1500.,
            maximum_passes: 24,
        }
    }
}

impl ImpuritySearch {
    /// The accepted residual for a measured concentration `n`
    pub(crate) fn accepted_residual(&self, concentration: f64) -> f64 {
        self.tolerance.max(self.relative_tolerance * concentration.abs())
    }
}

#[cfg(test)]
mod test {
    use super::SolverSettings;

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let settings: SolverSettings = config::Config::builder()
            .add_source(config::File::from_str(
                "window_cutoff = 400.0\n[roots]\ntolerance = 1e-10\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.window_cutoff, 400.);
        assert_eq!(settings.roots.tolerance, 1e-10);
        assert_eq!(settings.roots.maximum_iterations, 200);
        assert_eq!(settings.impurity_search.maximum_passes, 24);
    }

    #[test]
    fn impurity_residual_is_absolute_unless_a_relative_floor_is_set() {
        let mut search = super::ImpuritySearch::default();
        assert_eq!(search.accepted_residual(1e27), 1e12);
        search.relative_tolerance = 1e-9;
        assert_eq!(search.accepted_residual(1e27), 1e18);
        assert_eq!(search.accepted_residual(1e19), 1e12);
    }
}
