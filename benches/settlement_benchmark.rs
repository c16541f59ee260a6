use criterion::{black_box, criterion_group, criterion_main, Criterion};
use split_ledger::optimization::balance::BalanceCalculator;
use split_ledger::optimization::settlement::SettlementPlanner;
use split_ledger::simulation::history::{generate_random_history, HistoryConfig};

fn bench_group(c: &mut Criterion, people: usize, expenses: usize) {
    let config = HistoryConfig {
        people,
        expenses,
        ..Default::default()
    };
    let (roster, history) = generate_random_history(&config).unwrap();
    let balances = BalanceCalculator::compute_balances(&history, &roster);
    let planner = SettlementPlanner::default();

    c.bench_function(&format!("balances_{}_people", people), |b| {
        b.iter(|| BalanceCalculator::compute_balances(black_box(&history), black_box(&roster)))
    });
    c.bench_function(&format!("settlement_{}_people", people), |b| {
        b.iter(|| planner.plan(black_box(&balances)))
    });
}

fn bench_10_people(c: &mut Criterion) {
    bench_group(c, 10, 50);
}

fn bench_100_people(c: &mut Criterion) {
    bench_group(c, 100, 1_000);
}

fn bench_1000_people(c: &mut Criterion) {
    bench_group(c, 1000, 10_000);
}

criterion_group!(benches, bench_10_people, bench_100_people, bench_1000_people);
criterion_main!(benches);
