use crate::settings::SolverSettings;
use color_eyre::eyre::eyre;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Configuration {
    #[serde(default)]
    pub(crate) solver: SolverSettings,
}

impl Configuration {
    pub(crate) fn build() -> color_eyre::Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // The default numerical settings, every value also has a compiled default
            .add_source(File::with_name(".config/default").required(false))
            // The override settings which may be set by the user, optional
            .add_source(File::with_name(&format!(".config/{}", run_mode)).required(false))
            // `SPB` prefixed environment variables, nested keys separated by `__`
            .add_source(Environment::with_prefix("SPB").separator("__"))
            .build()?;

        s.try_deserialize()
            .map_err(|e| eyre!(format!("Failed to deserialize the config file: {:?}", e)))
    }
}
