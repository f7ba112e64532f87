use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ferric_sabr::calibration::{AnnealingOptions, anneal_seeded, global_calibration_error};
use ferric_sabr::market::{MarketContext, MarketQuote, MaturityGroup, QuoteBook};
use ferric_sabr::vol::{SabrParams, sabr_vol};
use std::hint::black_box;

fn benchmark_groups(per_maturity: usize) -> Vec<MaturityGroup> {
    let market = MarketContext::builder()
        .spot(448.5)
        .rate(0.0435)
        .collection_date(NaiveDate::from_ymd_opt(2025, 1, 28).expect("valid date"))
        .build()
        .expect("benchmark market should be valid");
    let truth = SabrParams::new(2.0, 0.5, -0.4, 0.8).expect("valid params");

    let mut quotes = Vec::new();
    for (y, m, d) in [(2025, 3, 21), (2025, 6, 20), (2025, 12, 19)] {
        let maturity = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        let fwd = market.implied_forward(market.time_to(maturity));
        for i in 0..per_maturity {
            let k = fwd * (0.8 + 0.4 * i as f64 / per_maturity as f64);
            quotes.push(MarketQuote::new(maturity, k, truth.implied_vol(fwd, k)));
        }
    }
    QuoteBook::from_quotes(quotes)
        .and_then(|b| b.resolve(&market))
        .expect("benchmark quotes should resolve")
}

fn bench_sabr_vol(c: &mut Criterion) {
    let mut group = c.benchmark_group("sabr_vol");
    for strike in [80.0, 100.0, 100.000_000_01, 120.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(strike), strike, |b, &k| {
            b.iter(|| black_box(sabr_vol(black_box(100.0), k, 0.3, 0.5, -0.4, 0.8)))
        });
    }
    group.finish();
}

fn bench_objective(c: &mut Criterion) {
    let params = SabrParams::default();
    let mut group = c.benchmark_group("calibration_objective");
    for per_maturity in [7, 25, 100].iter() {
        let groups = benchmark_groups(*per_maturity);
        group.bench_with_input(
            BenchmarkId::from_parameter(per_maturity),
            per_maturity,
            |b, _| b.iter(|| black_box(global_calibration_error(black_box(&params), &groups))),
        );
    }
    group.finish();
}

fn bench_annealing(c: &mut Criterion) {
    let groups = benchmark_groups(7);
    let options = AnnealingOptions::default();
    c.bench_function("anneal_2000_iterations", |b| {
        b.iter(|| {
            let res = anneal_seeded(
                |p: &SabrParams| global_calibration_error(p, &groups),
                SabrParams::default(),
                &options,
            )
            .expect("annealing should succeed");
            black_box(res.error)
        })
    });
}

criterion_group!(benches, bench_sabr_vol, bench_objective, bench_annealing);
criterion_main!(benches);
