use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urania::saju::{build_daeun_sequence, DaeunDirection};
use urania::sync::{DaeunTransitSynchronizer, SyncOptions};

fn bench_sync_analysis(c: &mut Criterion) {
    let month = "辛巳".parse().unwrap();
    let list = build_daeun_sequence(month, DaeunDirection::Forward, 4, 10);
    let sync = DaeunTransitSynchronizer::new();
    let plain = SyncOptions::default();
    let tier5 = SyncOptions { enable_tier5: true };

    c.bench_function("daeun_transit_sync", |b| {
        b.iter(|| sync.analyze(black_box(&list), black_box(1990), black_box(34), &plain))
    });
    c.bench_function("daeun_transit_sync_tier5", |b| {
        b.iter(|| sync.analyze(black_box(&list), black_box(1990), black_box(34), &tier5))
    });
}

criterion_group!(benches, bench_sync_analysis);
criterion_main!(benches);
