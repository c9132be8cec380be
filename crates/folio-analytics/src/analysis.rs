//! 분석 파이프라인.
//!
//! (보유 자산, 해석된 설정) → 결과 리포트의 순수한 계산 흐름입니다.
//! 실행마다 모든 시계열을 처음부터 다시 계산하며, 실행 간에 공유되는
//! 가변 상태는 없습니다.
//!
//! 심볼 조회는 순차적으로 수행되고 요청 사이에 데이터 소스의 최소
//! 간격을 지킵니다. 심볼 하나의 실패는 경고와 함께 해당 토큰만
//! 탈락시키고, 전 종목이 실패한 경우에만 분석을 중단합니다.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{info, warn};

use folio_core::{Holding, PortfolioError, PortfolioResult, Symbol, Timeframe, WeightMap};
use folio_exchange::{MarketDataSource, RequestPacer};

use crate::aggregate::{
    aggregate, apply_hedge, hedge_basket_mean, latest_snapshot, weighted_values,
};
use crate::report::{AnalysisReport, HedgeStatus, ReturnTable, SkippedToken};
use crate::series::ReturnSeries;

/// 분석 실행 옵션.
///
/// 가중치는 이미 정규화된 [`WeightMap`]으로 전달됩니다. 세션
/// 가중치 상태의 저장 방식은 파이프라인과 무관합니다.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// 조회 기간 (일 단위, 캔들 수)
    pub lookback_days: u32,
    /// 캔들 타임프레임
    pub timeframe: Timeframe,
    /// 헤지 성과 계산 여부
    pub hedge: bool,
    /// 헤지 바스켓 심볼 목록
    pub hedge_symbols: Vec<Symbol>,
    /// 정규화된 토큰 가중치
    pub weights: WeightMap,
}

impl AnalysisOptions {
    /// 일봉 기준 기본 옵션을 생성합니다.
    pub fn new(lookback_days: u32, weights: WeightMap) -> Self {
        Self {
            lookback_days,
            timeframe: Timeframe::D1,
            hedge: false,
            hedge_symbols: Vec::new(),
            weights,
        }
    }

    /// 헤지 바스켓을 설정합니다.
    pub fn with_hedge(mut self, symbols: Vec<Symbol>) -> Self {
        self.hedge = true;
        self.hedge_symbols = symbols;
        self
    }

    /// 전체 조회 단계 수 (진행률 표시용).
    pub fn total_steps(&self, holdings_count: usize) -> usize {
        holdings_count + if self.hedge { self.hedge_symbols.len() } else { 0 }
    }
}

/// 포트폴리오 수익률 분석을 실행합니다.
///
/// `progress`는 조회 단계마다 `(현재 단계, 전체 단계, 대상 이름)`으로
/// 호출됩니다.
///
/// # Errors
/// 시장 목록 조회가 실패하면 `Exchange`, 모든 토큰 조회가 실패하면
/// `EmptyResult`를 반환합니다.
pub async fn run_analysis<S: MarketDataSource>(
    source: &S,
    holdings: &[Holding],
    options: &AnalysisOptions,
    mut progress: impl FnMut(usize, usize, &str) + Send,
) -> PortfolioResult<AnalysisReport> {
    let pacer = RequestPacer::new(source.min_request_interval());
    let total_steps = options.total_steps(holdings.len());
    let mut step = 0usize;

    let markets = source
        .load_markets()
        .await
        .map_err(|e| PortfolioError::Exchange(e.to_string()))?;

    // 토큰별 조회 및 정규화
    let mut series_by_token: BTreeMap<String, ReturnSeries> = BTreeMap::new();
    let mut latest_values: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut skipped: Vec<SkippedToken> = Vec::new();

    for holding in holdings {
        step += 1;
        progress(step, total_steps, &holding.token);

        let pair = holding.symbol.to_pair_id();
        if !markets.contains(&pair) {
            let reason = PortfolioError::SymbolNotListed(holding.symbol.to_standard_string());
            warn!(token = %holding.token, symbol = %pair, "미상장 심볼, 건너뜀");
            skipped.push(SkippedToken {
                token: holding.token.clone(),
                symbol: pair,
                reason,
            });
            continue;
        }

        pacer.pace().await;

        let klines = match source
            .fetch_ohlcv(&holding.symbol, options.timeframe, options.lookback_days)
            .await
        {
            Ok(klines) => klines,
            Err(e) => {
                let reason = PortfolioError::FetchFailed(format!("{}: {}", pair, e));
                warn!(token = %holding.token, symbol = %pair, error = %e, "캔들 조회 실패, 건너뜀");
                skipped.push(SkippedToken {
                    token: holding.token.clone(),
                    symbol: pair,
                    reason,
                });
                continue;
            }
        };

        match ReturnSeries::from_klines(&klines, holding.quantity) {
            Ok(series) => {
                if let Some(last) = klines.last() {
                    latest_values.insert(holding.token.clone(), last.close * holding.quantity);
                }
                series_by_token.insert(holding.token.clone(), series);
            }
            Err(reason) => {
                warn!(token = %holding.token, symbol = %pair, error = %reason, "시계열 정규화 실패, 건너뜀");
                skipped.push(SkippedToken {
                    token: holding.token.clone(),
                    symbol: pair,
                    reason,
                });
            }
        }
    }

    if series_by_token.is_empty() {
        warn!("모든 토큰의 조회가 실패했습니다");
        return Err(PortfolioError::EmptyResult);
    }

    info!(
        fetched = series_by_token.len(),
        skipped = skipped.len(),
        "토큰 시계열 수집 완료"
    );

    let portfolio = aggregate(&series_by_token, &options.weights)?;

    // 헤지 바스켓 (선택)
    let mut hedge_status = HedgeStatus::Disabled;
    let mut hedged: Option<ReturnSeries> = None;

    if options.hedge {
        let mut basket: BTreeMap<String, ReturnSeries> = BTreeMap::new();
        let mut failures = 0usize;

        for symbol in &options.hedge_symbols {
            step += 1;
            progress(step, total_steps, &symbol.base);
            pacer.pace().await;

            let result = source
                .fetch_ohlcv(symbol, options.timeframe, options.lookback_days)
                .await;

            match result {
                Ok(klines) => match ReturnSeries::from_klines(&klines, Decimal::ONE) {
                    Ok(series) => {
                        basket.insert(symbol.base.clone(), series);
                    }
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "헤지 종목 정규화 실패");
                        failures += 1;
                    }
                },
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "헤지 종목 조회 실패");
                    failures += 1;
                }
            }
        }

        if basket.is_empty() {
            warn!("헤지 바스켓 조회가 전부 실패했습니다");
            hedge_status = HedgeStatus::Failed;
        } else {
            hedge_status = if failures == 0 {
                HedgeStatus::Full
            } else {
                HedgeStatus::Partial
            };

            let hedge = hedge_basket_mean(&basket)?;
            hedged = Some(apply_hedge(&portfolio, &hedge));
        }
    }

    // 리포트 구성
    let mut columns: Vec<(String, &ReturnSeries)> = series_by_token
        .iter()
        .map(|(token, series)| (token.clone(), series))
        .collect();
    columns.push(("Portfolio".to_string(), &portfolio));
    if let Some(hedged_series) = &hedged {
        columns.push(("Portfolio (Hedged)".to_string(), hedged_series));
    }

    let returns = ReturnTable::from_series(&columns);
    let snapshot = latest_snapshot(&columns);
    let (weighted, total_value) = weighted_values(&latest_values, &options.weights);

    Ok(AnalysisReport {
        returns,
        snapshot,
        weighted,
        total_value,
        skipped,
        hedge_status,
    })
}
