//! 분석 파이프라인 통합 테스트.
//!
//! 스텁 시장 데이터 소스를 사용하여 조회 → 정규화 → 집계 → 리포트
//! 전체 흐름과 부분 실패 시의 우아한 저하를 검증합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_analytics::{run_analysis, AnalysisOptions, HedgeStatus};
use folio_core::{Holding, Kline, PortfolioError, Symbol, Timeframe, WeightMap};
use folio_exchange::{ExchangeError, ExchangeResult, MarketDataSource};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

const T0: i64 = 1_700_000_000;

fn daily_klines(ticker: &str, closes: &[Decimal]) -> Vec<Kline> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let open_time =
                DateTime::<Utc>::from_timestamp(T0 + i as i64 * 86400, 0).unwrap();
            Kline {
                ticker: ticker.to_string(),
                timeframe: Timeframe::D1,
                open_time,
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: dec!(1),
                close_time: open_time + chrono::Duration::seconds(86400),
                quote_volume: None,
            }
        })
        .collect()
}

fn ts(day: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(T0 + day * 86400, 0).unwrap()
}

/// 테스트용 스텁 시장 데이터 소스.
struct StubSource {
    markets: HashSet<String>,
    candles: BTreeMap<String, Vec<Decimal>>,
    fail: HashSet<String>,
}

impl StubSource {
    fn new() -> Self {
        Self {
            markets: HashSet::new(),
            candles: BTreeMap::new(),
            fail: HashSet::new(),
        }
    }

    fn with_pair(mut self, pair: &str, closes: &[Decimal]) -> Self {
        self.markets.insert(pair.to_string());
        self.candles.insert(pair.to_string(), closes.to_vec());
        self
    }

    fn with_failing_pair(mut self, pair: &str) -> Self {
        self.markets.insert(pair.to_string());
        self.fail.insert(pair.to_string());
        self
    }
}

#[async_trait]
impl MarketDataSource for StubSource {
    async fn load_markets(&self) -> ExchangeResult<HashSet<String>> {
        Ok(self.markets.clone())
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        _timeframe: Timeframe,
        _limit: u32,
    ) -> ExchangeResult<Vec<Kline>> {
        let pair = symbol.to_pair_id();
        if self.fail.contains(&pair) {
            return Err(ExchangeError::Network("connection reset".to_string()));
        }

        self.candles
            .get(&pair)
            .map(|closes| daily_klines(&symbol.to_standard_string(), closes))
            .ok_or(ExchangeError::SymbolNotFound(pair))
    }

    fn min_request_interval(&self) -> Duration {
        Duration::ZERO
    }
}

fn holding(token: &str) -> Holding {
    Holding::try_new(token, dec!(100), dec!(1), dec!(1.2), Symbol::usdt(token)).unwrap()
}

#[tokio::test]
async fn test_full_run_equal_weights() {
    let source = StubSource::new()
        .with_pair("A_USDT", &[dec!(100), dec!(110)]) // +10%
        .with_pair("B_USDT", &[dec!(100), dec!(90)]); // -10%

    let holdings = vec![holding("A"), holding("B")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A", "B"]));

    let report = run_analysis(&source, &holdings, &options, |_, _, _| {})
        .await
        .unwrap();

    assert!(report.skipped.is_empty());
    assert_eq!(report.hedge_status, HedgeStatus::Disabled);

    let portfolio = report
        .returns
        .columns
        .iter()
        .find(|c| c.name == "Portfolio")
        .unwrap();
    // ±10%가 상쇄되어 전 구간 0
    assert!(portfolio.values.iter().all(|v| *v == Some(dec!(0))));

    // 가중 평가액: A = 110*100*0.5 = 5500, B = 90*100*0.5 = 4500
    assert_eq!(report.total_value, dec!(10000));
}

#[tokio::test]
async fn test_one_fetch_failure_degrades_without_renormalizing() {
    let source = StubSource::new()
        .with_pair("A_USDT", &[dec!(100), dec!(130)]) // +30%
        .with_pair("B_USDT", &[dec!(100), dec!(115)]) // +15%
        .with_failing_pair("C_USDT");

    let holdings = vec![holding("A"), holding("B"), holding("C")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A", "B", "C"]));

    let report = run_analysis(&source, &holdings, &options, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].token, "C");
    assert!(matches!(
        report.skipped[0].reason,
        PortfolioError::FetchFailed(_)
    ));

    let portfolio = report
        .returns
        .columns
        .iter()
        .find(|c| c.name == "Portfolio")
        .unwrap();
    // (1/3)*30 + (1/3)*15 = 15; 생존 토큰으로 재정규화하지 않음
    let idx = report.returns.timestamps.iter().position(|t| *t == ts(1)).unwrap();
    let value = portfolio.values[idx].unwrap();
    assert!((value - dec!(15)).abs() < dec!(0.0000001));
}

#[tokio::test]
async fn test_unlisted_symbol_skipped_with_reason() {
    let source = StubSource::new().with_pair("A_USDT", &[dec!(100), dec!(110)]);

    let holdings = vec![holding("A"), holding("GHOST")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A", "GHOST"]));

    let report = run_analysis(&source, &holdings, &options, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].symbol, "GHOST_USDT");
    assert!(matches!(
        report.skipped[0].reason,
        PortfolioError::SymbolNotListed(_)
    ));
}

#[tokio::test]
async fn test_all_failures_abort_with_empty_result() {
    let source = StubSource::new()
        .with_failing_pair("A_USDT")
        .with_failing_pair("B_USDT");

    let holdings = vec![holding("A"), holding("B")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A", "B"]));

    let result = run_analysis(&source, &holdings, &options, |_, _, _| {}).await;
    assert!(matches!(result, Err(PortfolioError::EmptyResult)));
}

#[tokio::test]
async fn test_hedge_full() {
    let source = StubSource::new()
        .with_pair("A_USDT", &[dec!(100), dec!(120)]) // +20%
        .with_pair("BTC_USDT", &[dec!(100), dec!(110)]) // +10%
        .with_pair("ETH_USDT", &[dec!(100), dec!(102)]); // +2%

    let holdings = vec![holding("A")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A"]))
        .with_hedge(vec![Symbol::usdt("BTC"), Symbol::usdt("ETH")]);

    let report = run_analysis(&source, &holdings, &options, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(report.hedge_status, HedgeStatus::Full);

    let hedged = report
        .returns
        .columns
        .iter()
        .find(|c| c.name == "Portfolio (Hedged)")
        .unwrap();
    // 20 - (10+2)/2 = 14
    let idx = report.returns.timestamps.iter().position(|t| *t == ts(1)).unwrap();
    assert_eq!(hedged.values[idx], Some(dec!(14)));
}

#[tokio::test]
async fn test_hedge_partial_when_member_fails() {
    let source = StubSource::new()
        .with_pair("A_USDT", &[dec!(100), dec!(120)]) // +20%
        .with_pair("BTC_USDT", &[dec!(100), dec!(110)]) // +10%
        .with_failing_pair("ETH_USDT");

    let holdings = vec![holding("A")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A"]))
        .with_hedge(vec![Symbol::usdt("BTC"), Symbol::usdt("ETH")]);

    let report = run_analysis(&source, &holdings, &options, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(report.hedge_status, HedgeStatus::Partial);

    let hedged = report
        .returns
        .columns
        .iter()
        .find(|c| c.name == "Portfolio (Hedged)")
        .unwrap();
    // 생존한 BTC만으로 평균: 20 - 10 = 10
    let idx = report.returns.timestamps.iter().position(|t| *t == ts(1)).unwrap();
    assert_eq!(hedged.values[idx], Some(dec!(10)));
}

#[tokio::test]
async fn test_hedge_failed_when_all_members_fail() {
    let source = StubSource::new()
        .with_pair("A_USDT", &[dec!(100), dec!(120)])
        .with_failing_pair("BTC_USDT")
        .with_failing_pair("ETH_USDT");

    let holdings = vec![holding("A")];
    let options = AnalysisOptions::new(30, WeightMap::equal(&["A"]))
        .with_hedge(vec![Symbol::usdt("BTC"), Symbol::usdt("ETH")]);

    let report = run_analysis(&source, &holdings, &options, |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(report.hedge_status, HedgeStatus::Failed);
    assert!(report
        .returns
        .columns
        .iter()
        .all(|c| c.name != "Portfolio (Hedged)"));
}

#[tokio::test]
async fn test_progress_callback_counts_steps() {
    let source = StubSource::new()
        .with_pair("A_USDT", &[dec!(100), dec!(110)])
        .with_pair("BTC_USDT", &[dec!(100), dec!(105)]);

    let holdings = vec![holding("A")];
    let options =
        AnalysisOptions::new(30, WeightMap::equal(&["A"])).with_hedge(vec![Symbol::usdt("BTC")]);

    let mut steps = Vec::new();
    let report = run_analysis(&source, &holdings, &options, |current, total, name| {
        steps.push((current, total, name.to_string()));
    })
    .await
    .unwrap();

    assert_eq!(report.hedge_status, HedgeStatus::Full);
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0], (1, 2, "A".to_string()));
    assert_eq!(steps[1], (2, 2, "BTC".to_string()));
}
