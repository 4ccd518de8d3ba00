//! The command line front end
//!
//! Measurements are entered in laboratory units (μV/K, cm^-3, cm^2/Vs) and converted to SI before
//! reaching the solver. Temperature optimisations and thermal decompositions take enough input
//! that they are described in TOML job files instead of flags.
mod configuration;
mod job;
mod report;
mod telemetry;

pub(crate) use configuration::Configuration;

use crate::{point::MeasurementPoint, ScatteringMechanism, SpbSolver};
use clap::{ArgEnum, Args, Parser, Subcommand};
use job::{units, DecompositionJob, OptimizationJob};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    #[clap(arg_enum, short, long, default_value = "info", global = true)]
    log_level: LogLevel,
    /// Also write a JSON log to `spb.log` in this directory
    #[clap(long, global = true)]
    log_directory: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recover the band parameters from a single measurement
    Point(PointArgs),
    /// Solve a measurement, then sweep the carrier concentration with the band held fixed
    Sweep(SweepArgs),
    /// Optimise the carrier concentration over a temperature range described by a job file
    Optimize { job: PathBuf },
    /// Split a measured thermal conductivity into electronic and lattice parts
    Decompose { job: PathBuf },
}

#[derive(Args)]
struct PointArgs {
    #[clap(arg_enum, short, long)]
    scattering: Scattering,
    /// K
    #[clap(short, long)]
    temperature: f64,
    /// μV/K, the sign is discarded
    #[clap(long, allow_hyphen_values = true)]
    seebeck: f64,
    /// Hall carrier concentration in cm^-3
    #[clap(short = 'n', long)]
    carrier_concentration: Option<f64>,
    /// Hall mobility in cm^2/Vs
    #[clap(short, long)]
    mobility: Option<f64>,
    /// W/mK
    #[clap(short = 'k', long)]
    thermal_conductivity: Option<f64>,
    /// Relative permittivity, required for IMP scattering
    #[clap(short, long)]
    dielectric_constant: Option<f64>,
}

impl PointArgs {
    fn measurement(&self) -> MeasurementPoint {
        let point = MeasurementPoint::new(self.temperature, self.seebeck.abs() * units::SEEBECK);
        let point = match self.carrier_concentration {
            Some(value) => point.with_carrier_concentration(value * units::CONCENTRATION),
            None => point,
        };
        let point = match self.mobility {
            Some(value) => point.with_mobility(value * units::MOBILITY),
            None => point,
        };
        let point = match self.thermal_conductivity {
            Some(value) => point.with_thermal_conductivity(value),
            None => point,
        };
        match self.dielectric_constant {
            Some(value) => point.with_dielectric_constant(value),
            None => point,
        }
    }
}

#[derive(Args)]
struct SweepArgs {
    #[clap(flatten)]
    point: PointArgs,
    /// Lowest concentration of the sweep in cm^-3
    #[clap(long, default_value = "1e18")]
    minimum_concentration: f64,
    /// Highest concentration of the sweep in cm^-3
    #[clap(long, default_value = "1e21")]
    maximum_concentration: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum Scattering {
    Adp,
    Pop,
    Pop2,
    Imp,
    Imp2,
}

impl From<Scattering> for ScatteringMechanism {
    fn from(scattering: Scattering) -> Self {
        match scattering {
            Scattering::Adp => ScatteringMechanism::AcousticDeformationPotential,
            Scattering::Pop => ScatteringMechanism::PolarOpticalPhonon,
            Scattering::Pop2 => ScatteringMechanism::PolarOpticalPhononPowerLaw,
            Scattering::Imp => ScatteringMechanism::IonizedImpurity,
            Scattering::Imp2 => ScatteringMechanism::IonizedImpurityPowerLaw,
        }
    }
}

pub fn run() -> color_eyre::Result<()> {
    let cli = App::parse();

    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, cli.log_directory.as_deref());
    telemetry::init_subscriber(subscriber)?;

    let config = Configuration::build()?;
    let solver = SpbSolver::new().with_settings(config.solver);
    let term = console::Term::stdout();

    match cli.command {
        Command::Point(args) => {
            let mechanism = args.scattering.into();
            let solution = solver.solve_point(&args.measurement(), mechanism)?;
            report::point(&term, mechanism, &solution)?;
        }
        Command::Sweep(args) => {
            let mechanism = args.point.scattering.into();
            let point = args.point.measurement();
            let solution = solver.solve_point(&point, mechanism)?;
            report::point(&term, mechanism, &solution)?;
            let sweep = solver.sweep_concentration(
                point.temperature,
                &solution.state,
                args.minimum_concentration * units::CONCENTRATION,
                args.maximum_concentration * units::CONCENTRATION,
                mechanism,
            )?;
            report::sweep(&term, &sweep)?;
        }
        Command::Optimize { job } => {
            let job = OptimizationJob::read(&job)?;
            let (temperatures, concentrations, fits) = job.to_si()?;
            tracing::info!(
                "Optimising {} scattering over {} temperatures",
                job.scattering,
                temperatures.temperatures().len()
            );
            let optimization = solver.optimize_over_temperature(
                &temperatures,
                &concentrations,
                job.scattering,
                &fits,
                job.dielectric_constant,
            )?;
            report::optimization(&term, &optimization)?;
        }
        Command::Decompose { job } => {
            let job = DecompositionJob::read(&job)?;
            let (seebeck, electrical) = job.to_si()?;
            let decomposition = solver.decompose_thermal_conductivity(
                &job.temperatures,
                &job.thermal_conductivity,
                &seebeck,
                &electrical,
                job.scattering,
            )?;
            report::decomposition(&term, &decomposition)?;
        }
    }

    Ok(())
}
