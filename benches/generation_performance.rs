use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pitwall::{
    Compound, DerivedFeatures, LabeledSample, RiskProfileClassifier, RuleClassifier,
    SensorEstimator, StrategyClassifier, TelemetryGenerator, TireState, VisionObservation,
    WearPattern, strategy,
};
use std::time::Duration;

fn create_sample_state() -> TireState {
    TireState {
        compound: Compound::Medium,
        lap_number: 18,
        wear_pattern: WearPattern::Inner,
        sidewall_deformation: false,
        tyre_pressure: 20.3,
        is_graining: false,
        tyre_temperature: 104,
        track_temperature: 31,
    }
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    let generator = TelemetryGenerator::new(42);

    group.bench_function("generate_single_sample", |b| {
        b.iter(|| black_box(generator.generate_sample(black_box(17))));
    });

    group.bench_function("generate_100_samples", |b| {
        b.iter(|| black_box(generator.generate(100)));
    });

    group.bench_function("generate_1000_samples", |b| {
        b.iter(|| black_box(generator.generate(1000)));
    });

    group.finish();
}

fn bench_labeling(c: &mut Criterion) {
    let mut group = c.benchmark_group("labeling");

    let state = create_sample_state();

    group.bench_function("derive_features", |b| {
        b.iter(|| black_box(DerivedFeatures::from_state(black_box(&state))));
    });

    group.bench_function("decide_strategy", |b| {
        b.iter(|| black_box(strategy::decide(black_box(&state))));
    });

    group.bench_function("predict_exact", |b| {
        b.iter(|| black_box(RuleClassifier.predict(black_box(&state)).unwrap()));
    });

    group.bench_function("predict_approximate", |b| {
        b.iter(|| black_box(RiskProfileClassifier.predict(black_box(&state)).unwrap()));
    });

    group.finish();
}

fn bench_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimation");

    let observation = VisionObservation {
        compound: "soft".to_string(),
        wear_pattern: "inner".to_string(),
        sidewall_deformation: false,
        is_graining: false,
    };

    group.bench_function("estimate_sensors", |b| {
        let mut estimator = SensorEstimator::new(42);
        b.iter(|| black_box(estimator.estimate(black_box(&observation), 9).unwrap()));
    });

    group.bench_function("complete_record", |b| {
        let mut estimator = SensorEstimator::new(42);
        b.iter(|| black_box(estimator.complete(black_box(&observation), 9).unwrap()));
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let sample = LabeledSample::labeled(create_sample_state());

    group.bench_function("serialize_sample", |b| {
        b.iter(|| black_box(serde_json::to_string(&sample).unwrap()));
    });

    let json = serde_json::to_string(&sample).unwrap();
    group.bench_function("deserialize_sample", |b| {
        b.iter(|| black_box(serde_json::from_str::<LabeledSample>(&json).unwrap()));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_generation, bench_labeling, bench_estimation, bench_serialization
}
criterion_main!(benches);
