use crace::{Generator, Pos, Race, RaceConfig, Size};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SIZE: Size = Size(101, 201);

pub fn generate(c: &mut Criterion) {
    c.bench_function("generate_101x201", |b| {
        b.iter(|| {
            Generator::default()
                .generate(black_box(SIZE), Pos(0, 0), Pos(100, 200), Some(1))
                .unwrap()
        })
    });
}

pub fn full_race(c: &mut Criterion) {
    let config = RaceConfig::new()
        .size(SIZE)
        .end(Pos(100, 200))
        .seed(Some(1));

    c.bench_function("race_101x201", |b| {
        b.iter(|| {
            let mut race = Race::new(black_box(config.clone())).unwrap();
            race.start();
            race.run_to_end()
        })
    });
}

criterion_group! {name = benches; config = Criterion::default().sample_size(10); targets = generate, full_race}
criterion_main!(benches);
