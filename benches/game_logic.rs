use criterion::{black_box, criterion_group, criterion_main, Criterion};
use make_it_12::core::{evaluate, find_combination, generate, has_valid_combination, Game, GameConfig, SimpleRng};
use make_it_12::types::{GameAction, GameMode};

fn bench_generate(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_8x8_math", |b| {
        b.iter(|| generate(black_box(20), GameMode::MathOperations, &mut rng))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate_ternary", |b| {
        b.iter(|| evaluate(black_box(&[7u32, 19, 13][..]), GameMode::MathOperations))
    });
    c.bench_function("evaluate_binary_hit", |b| {
        b.iter(|| evaluate(black_box(&[24u32, 2][..]), GameMode::MathOperations))
    });
}

fn bench_search(c: &mut Criterion) {
    let mut rng = SimpleRng::new(7);
    let math = generate(20, GameMode::MathOperations, &mut rng);
    let addition = generate(20, GameMode::Addition, &mut rng);
    let math_values = math.values();
    let math_tiles: Vec<_> = math.tiles().map(|t| (t.id, t.value)).collect();
    let addition_values = addition.values();

    c.bench_function("has_valid_combination_8x8_math", |b| {
        b.iter(|| has_valid_combination(black_box(&math_values), GameMode::MathOperations))
    });
    c.bench_function("has_valid_combination_8x8_addition", |b| {
        b.iter(|| has_valid_combination(black_box(&addition_values), GameMode::Addition))
    });
    c.bench_function("find_combination_8x8_math", |b| {
        b.iter(|| find_combination(black_box(&math_tiles), GameMode::MathOperations))
    });
}

fn bench_select(c: &mut Criterion) {
    let mut game = Game::new(GameConfig::default(), 12345);
    game.start();

    c.bench_function("select_toggle", |b| {
        b.iter(|| {
            game.apply_action(black_box(GameAction::Select { row: 0, col: 0 }));
            game.apply_action(black_box(GameAction::Select { row: 0, col: 0 }));
            game.take_events();
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut game = Game::new(GameConfig::default(), 12345);
    game.start();
    let mut snap = game.snapshot();

    c.bench_function("snapshot_into", |b| b.iter(|| game.snapshot_into(black_box(&mut snap))));
}

criterion_group!(
    benches,
    bench_generate,
    bench_evaluate,
    bench_search,
    bench_select,
    bench_snapshot
);
criterion_main!(benches);
