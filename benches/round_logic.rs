use criterion::{black_box, criterion_group, criterion_main, Criterion};

use deck_mole::core::scoring::strike_points;
use deck_mole::core::{GameRng, TileBag};
use deck_mole::types::TileKind;

fn bench_bag_round(c: &mut Criterion) {
    let mut rng = GameRng::new(12345);

    c.bench_function("bag_reset_and_drain_10", |b| {
        b.iter(|| {
            let mut bag = TileBag::new();
            bag.reset(black_box(7), black_box(3), &mut rng);
            while bag.draw_random(&mut rng).is_ok() {}
        })
    });
}

fn bench_strike_scoring(c: &mut Criterion) {
    c.bench_function("strike_points", |b| {
        b.iter(|| {
            strike_points(black_box(TileKind::Mole), black_box(740))
                + strike_points(black_box(TileKind::Decoy), black_box(740))
        })
    });
}

fn bench_rng_between(c: &mut Criterion) {
    let mut rng = GameRng::new(12345);

    c.bench_function("rng_reveal_window", |b| {
        b.iter(|| rng.between(black_box(500), black_box(1500)))
    });
}

criterion_group!(benches, bench_bag_round, bench_strike_scoring, bench_rng_between);
criterion_main!(benches);
