use super::{
    quadrature::{edge_breakpoints, Quadrature, QuadratureError},
    TransportIntegrals,
};

/// Energy dependence of a relaxation time in reduced energy `x = E / k T`
pub trait RelaxationTime: Sync {
    fn relaxation_time(&self, reduced_energy: f64) -> f64;
}

/// `-∂f/∂x = e^{x - η} / (1 + e^{x - η})^2`, evaluated in the symmetric form which never overflows
pub(crate) fn window(reduced_energy: f64, eta: f64) -> f64 {
    let decay = (-(reduced_energy - eta).abs()).exp();
    decay / (1. + decay).powi(2)
}

/// Transport integrals of a tabulated relaxation time, truncated at `cutoff` in units of `k T`
#[derive(Clone, Debug)]
pub struct WindowedIntegrals<R> {
    relaxation: R,
    cutoff: f64,
    quadrature: Quadrature,
}

impl<R: RelaxationTime> WindowedIntegrals<R> {
    pub fn new(relaxation: R, cutoff: f64, quadrature: Quadrature) -> Self {
        Self {
            relaxation,
            cutoff,
            quadrature,
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// `∫₀^X weight(x) W(x; η) dx`, split at the peak of the window so that odd moments about η
    /// are integrated piecewise with a single sign, and where the window has decayed to nothing
    /// either side of it
    fn integrate<F>(&self, eta: f64, weight: F) -> Result<f64, QuadratureError>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        let integrand = |x: f64| {
            if x <= 0. {
                return 0.;
            }
            let w = window(x, eta);
            if w == 0. {
                0.
            } else {
                weight(x) * w
            }
        };
        self.quadrature.integrate(integrand, &edge_breakpoints(eta, self.cutoff))
    }

    /// `∫ τ W`
    pub fn tau(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.integrate(eta, |x| self.relaxation.relaxation_time(x))
    }

    /// `∫ x τ W`
    pub fn tau_energy(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.integrate(eta, |x| x * self.relaxation.relaxation_time(x))
    }

    /// `∫ x² τ W`
    pub fn tau_energy_squared(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.integrate(eta, |x| x * x * self.relaxation.relaxation_time(x))
    }

    /// `∫ (x - η) τ W`
    pub fn tau_seebeck(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.integrate(eta, |x| (x - eta) * self.relaxation.relaxation_time(x))
    }

    /// `∫ τ² x^{-3/2} W`
    pub fn tau_squared(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.integrate(eta, |x| {
            self.relaxation.relaxation_time(x).powi(2) / x.powf(1.5)
        })
    }
}

impl<R: RelaxationTime> TransportIntegrals for WindowedIntegrals<R> {
    fn reduced_seebeck(&self, eta: f64) -> Result<f64, QuadratureError> {
        Ok(self.tau_seebeck(eta)? / self.tau(eta)?)
    }

    fn conductivity_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.tau(eta)
    }

    fn hall_integral(&self, eta: f64) -> Result<f64, QuadratureError> {
        self.tau_squared(eta)
    }

    fn reduced_lorenz(&self, eta: f64) -> Result<f64, QuadratureError> {
        let tau = self.tau(eta)?;
        let tau_energy = self.tau_energy(eta)?;
        let tau_energy_squared = self.tau_energy_squared(eta)?;
        Ok((tau * tau_energy_squared - tau_energy.powi(2)) / tau.powi(2))
    }
}
