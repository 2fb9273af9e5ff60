use chrono::{Days, NaiveDate};
use fxcarry::core::CarryTradeConfig;
use fxcarry::market::{PriceTable, VolatilitySeries};
use fxcarry::strategy::CarryTradeEngine;

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
    (0..n)
        .map(|i| start.checked_add_days(Days::new(i as u64)).unwrap())
        .collect()
}

/// Deterministic four-asset table; `shift` rotates which asset carries the lowest premium.
fn table(n: usize, shift: usize) -> PriceTable {
    let mut table = PriceTable::new(dates(n)).unwrap();
    for (a, name) in ["AUD", "CHF", "GBP", "JPY"].iter().enumerate() {
        let premium = 0.001 * ((a + shift) % 4) as f64 - 0.0015;
        let spot: Vec<f64> = (0..n)
            .map(|t| (1.0 + 0.1 * a as f64) * (1.0 + 0.01 * ((t * (a + 1)) as f64).sin()))
            .collect();
        let forward = spot.iter().map(|s| s * (1.0 + premium)).collect();
        table = table.with_asset(name, spot, forward).unwrap();
    }
    table
}

#[cfg(feature = "parallel")]
fn vix(n: usize) -> VolatilitySeries {
    VolatilitySeries::new(
        dates(n),
        (0..n).map(|t| 18.0 + 4.0 * (t as f64 * 0.7).cos()).collect(),
    )
    .unwrap()
}

#[test]
fn batch_reports_each_input_independently() {
    let engine = CarryTradeEngine::new(CarryTradeConfig::with_n_trade(1)).unwrap();
    let good = table(12, 0);
    let too_small = PriceTable::new(dates(3)).unwrap();
    let results = engine.compute_batch(&[(&good, None), (&too_small, None)]);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().len(), 11);
    assert!(results[1].as_ref().unwrap_err().is_shape_error());
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_batch_matches_sequential_batch() {
    let engine = CarryTradeEngine::new(
        CarryTradeConfig::builder()
            .n_trade(1)
            .volatility_index("VIX")
            .volatility_quantile(0.6)
            .build()
            .unwrap(),
    )
    .unwrap();
    let tables: Vec<PriceTable> = (0..8).map(|k| table(40 + k, k)).collect();
    let series: Vec<VolatilitySeries> = (0..8).map(|k| vix(40 + k)).collect();
    let inputs: Vec<(&PriceTable, Option<&VolatilitySeries>)> =
        tables.iter().zip(&series).map(|(t, v)| (t, Some(v))).collect();

    let sequential = engine.compute_batch(&inputs);
    let parallel = engine.compute_batch_parallel(&inputs);
    assert_eq!(sequential, parallel);
    assert!(parallel.iter().all(Result::is_ok));
}
