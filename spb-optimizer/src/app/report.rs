//! Console tables in laboratory units

use super::job::units;
use crate::{
    decomposition::ThermalDecomposition, optimizer::TemperatureOptimization,
    point::PointSolution, sweep::SweepResult, ScatteringMechanism,
};
use console::{style, Term};
use std::io;

/// Lorenz numbers are shown in units of 1e-8 V^2/K^2
const LORENZ: f64 = 1e-8;

fn header(term: &Term, columns: &[&str]) -> io::Result<()> {
    let line = columns
        .iter()
        .map(|column| format!("{column:>14}"))
        .collect::<String>();
    term.write_line(&style(line).bold().to_string())
}

fn row(term: &Term, values: &[String]) -> io::Result<()> {
    let line = values
        .iter()
        .map(|value| format!("{value:>14}"))
        .collect::<String>();
    term.write_line(&line)
}

fn optional(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| "-".into())
}

pub(crate) fn point(
    term: &Term,
    mechanism: ScatteringMechanism,
    solution: &PointSolution,
) -> io::Result<()> {
    let (eta, mass, mobility, lorenz, electronic, lattice, quality, figure_of_merit) =
        solution.as_tuple();
    term.write_line(&format!(
        "{} {}",
        style("Point solution for").cyan(),
        style(mechanism).cyan().bold()
    ))?;
    let lines = [
        ("η", format!("{eta:.6}")),
        ("m* / mₑ", format!("{mass:.6}")),
        ("μ₀ [cm²/Vs]", format!("{:.4}", mobility / units::MOBILITY)),
        ("L [1e-8 V²/K²]", format!("{:.6}", lorenz / LORENZ)),
        ("κ_el [W/mK]", format!("{electronic:.6}")),
        ("κ_L [W/mK]", format!("{lattice:.6}")),
        ("β", format!("{quality:.6}")),
        ("zT", format!("{figure_of_merit:.6}")),
    ];
    for (label, value) in lines {
        term.write_line(&format!("{label:>16}  {value}"))?;
    }
    Ok(())
}

pub(crate) fn sweep(term: &Term, sweep: &SweepResult) -> io::Result<()> {
    term.write_line(&style("Concentration sweep").cyan().to_string())?;
    header(
        term,
        &["n [cm^-3]", "η", "S [μV/K]", "L [1e-8]", "μ [cm²/Vs]", "zT"],
    )?;
    for index in 0..sweep.concentration.len() {
        row(
            term,
            &[
                format!("{:.3e}", sweep.concentration[index] / units::CONCENTRATION),
                format!("{:.4}", sweep.reduced_chemical_potential[index]),
                format!("{:.2}", sweep.seebeck[index] / units::SEEBECK),
                format!("{:.4}", sweep.lorenz_number[index] / LORENZ),
                optional(sweep.mobility.as_ref().map(|m| m[index]), |m| {
                    format!("{:.3}", m / units::MOBILITY)
                }),
                optional(sweep.figure_of_merit.as_ref().map(|z| z[index]), |z| {
                    format!("{z:.4}")
                }),
            ],
        )?;
    }
    if let Some(optimum) = sweep.optimum() {
        term.write_line(&format!(
            "{} zT = {:.4} at {:.3e} cm^-3",
            style("Optimum").green().bold(),
            optimum.figure_of_merit,
            optimum.concentration / units::CONCENTRATION
        ))?;
    }
    Ok(())
}

pub(crate) fn optimization(term: &Term, optimization: &TemperatureOptimization) -> io::Result<()> {
    term.write_line(&style("Temperature optimisation").cyan().to_string())?;
    header(
        term,
        &["T [K]", "n [cm^-3]", "zT", "n_opt [cm^-3]", "zT_opt"],
    )?;
    for (index, temperature) in optimization.temperatures.iter().enumerate() {
        row(
            term,
            &[
                format!("{temperature:.1}"),
                format!(
                    "{:.3e}",
                    optimization.measured_concentration[index] / units::CONCENTRATION
                ),
                format!("{:.4}", optimization.measured_figure_of_merit[index]),
                format!(
                    "{:.3e}",
                    optimization.optimal_concentration[index] / units::CONCENTRATION
                ),
                format!("{:.4}", optimization.optimal_figure_of_merit[index]),
            ],
        )?;
    }
    Ok(())
}

pub(crate) fn decomposition(term: &Term, decomposition: &ThermalDecomposition) -> io::Result<()> {
    term.write_line(&style("Thermal conductivity decomposition").cyan().to_string())?;
    header(term, &["T [K]", "L [1e-8]", "κ_el [W/mK]", "κ_L [W/mK]"])?;
    for (index, temperature) in decomposition.temperatures.iter().enumerate() {
        row(
            term,
            &[
                format!("{temperature:.1}"),
                format!("{:.4}", decomposition.lorenz_number[index] / LORENZ),
                format!("{:.4}", decomposition.electronic[index]),
                format!("{:.4}", decomposition.lattice[index]),
            ],
        )?;
    }
    Ok(())
}
