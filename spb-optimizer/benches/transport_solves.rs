use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spb_optimizer::{solve_point, sweep_concentration, ScatteringMechanism};
use utilities::SyntheticBand;

const MECHANISMS: [ScatteringMechanism; 3] = [
    ScatteringMechanism::AcousticDeformationPotential,
    ScatteringMechanism::PolarOpticalPhonon,
    ScatteringMechanism::PolarOpticalPhononPowerLaw,
];

fn band(mechanism: ScatteringMechanism) -> SyntheticBand {
    SyntheticBand {
        mechanism,
        temperature: 300.,
        effective_mass: 1.5,
        dielectric_constant: None,
    }
}

pub fn bench_point_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_solve");

    for mechanism in MECHANISMS.iter() {
        let point = band(*mechanism)
            .measurement(1e25)
            .expect("the synthetic measurement is solvable")
            .point
            .with_mobility(1e-2)
            .with_thermal_conductivity(2.);
        group.bench_with_input(
            BenchmarkId::from_parameter(mechanism),
            mechanism,
            |b, &mechanism| b.iter(|| solve_point(black_box(&point), mechanism)),
        );
    }
}

pub fn bench_concentration_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("concentration_sweep");
    group.sample_size(10);

    for mechanism in MECHANISMS.iter() {
        let point = band(*mechanism)
            .measurement(1e25)
            .expect("the synthetic measurement is solvable")
            .point
            .with_mobility(1e-2)
            .with_thermal_conductivity(2.);
        let state = solve_point(&point, *mechanism)
            .expect("the synthetic measurement is solvable")
            .state;
        group.bench_with_input(
            BenchmarkId::from_parameter(mechanism),
            mechanism,
            |b, &mechanism| {
                b.iter(|| sweep_concentration(300., black_box(&state), 1e24, 1e27, mechanism))
            },
        );
    }
}

criterion_group!(
    transport_solves,
    bench_point_solve,
    bench_concentration_sweep
);
criterion_main!(transport_solves);
