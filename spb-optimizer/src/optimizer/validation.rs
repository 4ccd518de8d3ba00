use super::Polynomial;
use crate::error::{Quantity, TransportError};

/// Closed interval a fitted property has to stay within, in SI units
#[derive(Copy, Clone, Debug)]
pub(crate) struct PropertyBounds {
    pub(crate) quantity: Quantity,
    pub(crate) minimum: f64,
    pub(crate) maximum: f64,
}

/// 1 to 1500 μV/K
pub(crate) const SEEBECK_BOUNDS: PropertyBounds = PropertyBounds {
    quantity: Quantity::Seebeck,
    minimum: 1e-6,
    maximum: 1.5e-3,
};

/// 1e12 to 1e24 cm^-3
pub(crate) const CONCENTRATION_BOUNDS: PropertyBounds = PropertyBounds {
    quantity: Quantity::CarrierConcentration,
    minimum: 1e18,
    maximum: 1e30,
};

/// 0.01 to 1e4 cm^2 / V s
pub(crate) const MOBILITY_BOUNDS: PropertyBounds = PropertyBounds {
    quantity: Quantity::Mobility,
    minimum: 1e-6,
    maximum: 1.,
};

pub(crate) const THERMAL_CONDUCTIVITY_BOUNDS: PropertyBounds = PropertyBounds {
    quantity: Quantity::ThermalConductivity,
    minimum: 0.,
    maximum: 1e4,
};

impl PropertyBounds {
    pub(crate) fn check(&self, value: f64, temperature: f64) -> Result<f64, TransportError> {
        if value.is_finite() && value >= self.minimum && value <= self.maximum {
            Ok(value)
        } else {
            Err(TransportError::Range {
                quantity: self.quantity,
                value,
                temperature,
                minimum: self.minimum,
                maximum: self.maximum,
            })
        }
    }

    /// Evaluate `fit` at every temperature, failing on the first value out of bounds
    pub(crate) fn evaluate(
        &self,
        fit: &Polynomial,
        temperatures: &[f64],
    ) -> Result<Vec<f64>, TransportError> {
        temperatures
            .iter()
            .map(|&temperature| self.check(fit.evaluate(temperature), temperature))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{MOBILITY_BOUNDS, SEEBECK_BOUNDS};
    use crate::{
        error::{Quantity, TransportError},
        optimizer::Polynomial,
    };

    #[test]
    fn first_violation_names_the_quantity_and_temperature() {
        // 100 μV/K rising by 1 μV/K per kelvin
        let fit = Polynomial::new(vec![-200e-6, 1e-6]).unwrap();
        let temperatures = [300., 1000., 1800., 2000.];
        match SEEBECK_BOUNDS.evaluate(&fit, &temperatures) {
            Err(TransportError::Range {
                quantity,
                temperature,
                ..
            }) => {
                assert_eq!(quantity, Quantity::Seebeck);
                assert_eq!(temperature, 1800.);
            }
            other => panic!("expected a range error, found {other:?}"),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(MOBILITY_BOUNDS.check(1., 300.).is_ok());
        assert!(MOBILITY_BOUNDS.check(1e-6, 300.).is_ok());
        assert!(MOBILITY_BOUNDS.check(f64::NAN, 300.).is_err());
    }
}
