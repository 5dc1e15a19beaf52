use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grade_confidence::{
    AnalyticInterval, BootstrapInterval, GradeIntervalEstimator, GradeSampler, SimulationConfig,
};
use grade_subject::SubjectRecord;
use rand::prelude::*;

fn seven_point_subject() -> SubjectRecord {
    SubjectRecord::new(
        11,
        "Business Management",
        "HL",
        "{'1': (0, 14), '2': (15, 26), '3': (27, 37), '4': (38, 49), \
          '5': (50, 56), '6': (57, 67), '7': (68, 100)}",
        "{'1': 0.002, '2': 0.021, '3': 0.073, '4': 0.212, \
          '5': 0.201, '6': 0.308, '7': 0.183}",
    )
    .unwrap()
}

fn bench_sampler(c: &mut Criterion) {
    let subject = seven_point_subject();
    let mut sampler = GradeSampler::new(&subject, StdRng::seed_from_u64(42));

    c.bench_function("sample_one", |b| b.iter(|| black_box(sampler.sample_one())));
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("BootstrapInterval");
    group.sample_size(20);
    let subject = seven_point_subject();

    for cohort in [10, 20, 100] {
        let estimator = BootstrapInterval::new(SimulationConfig::fast().with_seed(42));
        group.bench_with_input(BenchmarkId::new("fast", cohort), &cohort, |b, &n| {
            b.iter(|| estimator.interval(black_box(&subject), n, 0.95))
        });
    }

    #[cfg(feature = "parallel")]
    {
        use grade_confidence::ExecutionStrategy;
        let estimator = BootstrapInterval::new(
            SimulationConfig::default()
                .with_seed(42)
                .with_strategy(ExecutionStrategy::Parallel),
        );
        group.bench_function("parallel_default", |b| {
            b.iter(|| estimator.interval(black_box(&subject), 20, 0.95))
        });
    }

    group.finish();
}

fn bench_analytic(c: &mut Criterion) {
    let subject = seven_point_subject();
    c.bench_function("analytic_interval", |b| {
        b.iter(|| AnalyticInterval.interval(black_box(&subject), 20, 0.95))
    });
}

criterion_group!(benches, bench_sampler, bench_bootstrap, bench_analytic);
criterion_main!(benches);
