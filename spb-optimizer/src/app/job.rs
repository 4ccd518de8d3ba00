//! TOML job files in laboratory units
//!
//! ```toml
//! scattering = "ADP"
//!
//! [temperature]
//! minimum = 300.0
//! maximum = 600.0
//! step = 50.0
//!
//! # cm^-3
//! [concentration]
//! minimum = 1e18
//! maximum = 1e21
//!
//! # Ascending coefficients in μV/K, cm^-3, cm^2/Vs and W/mK
//! [fits]
//! seebeck = [100.0, 0.2]
//! carrier_concentration = [1e19]
//! mobility = [150.0, -0.15]
//! thermal_conductivity = [3.0, -0.002]
//! ```

use crate::{
    decomposition::ElectricalTransport,
    optimizer::{FittedProperties, Polynomial, TemperatureRange},
    sweep::ConcentrationRange,
    ScatteringMechanism, TransportError,
};
use color_eyre::eyre::eyre;
use config::{Config, File, FileFormat};
use serde::{de::DeserializeOwned, Deserialize};
use std::path::Path;

/// Factors taking laboratory units to SI
pub(crate) mod units {
    /// μV/K to V/K
    pub(crate) const SEEBECK: f64 = 1e-6;
    /// cm^-3 to m^-3
    pub(crate) const CONCENTRATION: f64 = 1e6;
    /// cm^2/Vs to m^2/Vs
    pub(crate) const MOBILITY: f64 = 1e-4;
    /// S/cm to S/m
    pub(crate) const CONDUCTIVITY: f64 = 1e2;
    /// mΩ cm to Ω m
    pub(crate) const RESISTIVITY: f64 = 1e-5;
}

fn read<T: DeserializeOwned>(path: &Path) -> color_eyre::Result<T> {
    Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml))
        .build()?
        .try_deserialize()
        .map_err(|e| {
            eyre!(format!(
                "Failed to deserialize the job file {}: {:?}",
                path.display(),
                e
            ))
        })
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptimizationJob {
    pub(crate) scattering: ScatteringMechanism,
    /// Required for `IMP`
    pub(crate) dielectric_constant: Option<f64>,
    /// K
    temperature: TemperatureRange,
    /// cm^-3
    concentration: ConcentrationRange,
    fits: LaboratoryFits,
}

#[derive(Debug, Deserialize)]
struct LaboratoryFits {
    /// μV/K
    seebeck: Polynomial,
    /// cm^-3
    carrier_concentration: Polynomial,
    /// cm^2/Vs
    mobility: Polynomial,
    /// W/mK
    thermal_conductivity: Polynomial,
}

impl OptimizationJob {
    pub(crate) fn read(path: &Path) -> color_eyre::Result<Self> {
        read(path)
    }

    pub(crate) fn to_si(
        &self,
    ) -> Result<(TemperatureRange, ConcentrationRange, FittedProperties), TransportError> {
        let temperatures = TemperatureRange::new(
            self.temperature.minimum,
            self.temperature.maximum,
            self.temperature.step,
        )?;
        let concentrations = ConcentrationRange::new(
            self.concentration.minimum * units::CONCENTRATION,
            self.concentration.maximum * units::CONCENTRATION,
        )?;
        let fits = FittedProperties {
            seebeck: self.fits.seebeck.scaled(units::SEEBECK),
            carrier_concentration: self.fits.carrier_concentration.scaled(units::CONCENTRATION),
            mobility: self.fits.mobility.scaled(units::MOBILITY),
            thermal_conductivity: self.fits.thermal_conductivity.clone(),
        };
        Ok((temperatures, concentrations, fits))
    }
}

/// Thermal conductivity decomposition, with exactly one of `conductivity` in S/cm or
/// `resistivity` in mΩ cm
#[derive(Debug, Deserialize)]
pub(crate) struct DecompositionJob {
    pub(crate) scattering: ScatteringMechanism,
    /// K
    pub(crate) temperatures: Vec<f64>,
    /// W/mK, one per temperature
    pub(crate) thermal_conductivity: Vec<f64>,
    /// μV/K
    seebeck: Polynomial,
    conductivity: Option<Polynomial>,
    resistivity: Option<Polynomial>,
}

impl DecompositionJob {
    pub(crate) fn read(path: &Path) -> color_eyre::Result<Self> {
        read(path)
    }

    pub(crate) fn to_si(&self) -> color_eyre::Result<(Polynomial, ElectricalTransport)> {
        let electrical = match (&self.conductivity, &self.resistivity) {
            (Some(conductivity), None) => {
                ElectricalTransport::Conductivity(conductivity.scaled(units::CONDUCTIVITY))
            }
            (None, Some(resistivity)) => {
                ElectricalTransport::Resistivity(resistivity.scaled(units::RESISTIVITY))
            }
            _ => {
                return Err(eyre!(
                    "A decomposition job needs exactly one of `conductivity` or `resistivity`"
                ))
            }
        };
        Ok((self.seebeck.scaled(units::SEEBECK), electrical))
    }
}
