//! 가중 집계 및 헤지 조정.
//!
//! 토큰별 정규화 시계열을 하나의 가중 포트폴리오 시계열로 결합하고,
//! 선택적으로 헤지 바스켓 평균을 차감합니다.
//!
//! # 가중치 탈락 정책
//!
//! 가중치 맵에 없는 토큰(예: 조회 실패로 탈락)은 합산에서 완전히
//! 제외되며, 남은 토큰의 가중치를 재정규화하지 않습니다. 탈락한
//! 가중치만큼 포트폴리오 노출이 줄어든 것으로 간주하는, 원래
//! 동작을 그대로 따르는 단순화입니다.

use crate::report::{SnapshotRow, WeightedValueRow};
use crate::series::{aligned_timestamps, ReturnSeries};
use folio_core::{PortfolioError, PortfolioResult, WeightMap};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// 토큰별 시계열을 가중 합산하여 포트폴리오 시계열을 만듭니다.
///
/// 모든 입력 시계열의 정렬 교집합 위에서, 시계열 맵과 가중치 맵에
/// 모두 존재하는 토큰의 `가중치 × 수익률`을 합산합니다.
///
/// # Errors
/// 시계열 맵이 비어있으면 `EmptyResult`를 반환합니다.
pub fn aggregate(
    series_by_token: &BTreeMap<String, ReturnSeries>,
    weights: &WeightMap,
) -> PortfolioResult<ReturnSeries> {
    if series_by_token.is_empty() {
        return Err(PortfolioError::EmptyResult);
    }

    let refs: Vec<&ReturnSeries> = series_by_token.values().collect();
    let aligned = aligned_timestamps(&refs);

    let points = aligned
        .into_iter()
        .map(|ts| {
            let value: Decimal = series_by_token
                .iter()
                .filter_map(|(token, series)| {
                    let weight = weights.get(token)?;
                    series.get(&ts).map(|v| weight * v)
                })
                .sum();
            (ts, value)
        })
        .collect();

    Ok(ReturnSeries::from_points(points))
}

/// 헤지 바스켓 구성원들의 균등 가중 산술 평균 시계열을 만듭니다.
///
/// # Errors
/// 바스켓이 비어있으면 `EmptyResult`를 반환합니다.
pub fn hedge_basket_mean(
    basket: &BTreeMap<String, ReturnSeries>,
) -> PortfolioResult<ReturnSeries> {
    if basket.is_empty() {
        return Err(PortfolioError::EmptyResult);
    }

    let refs: Vec<&ReturnSeries> = basket.values().collect();
    let aligned = aligned_timestamps(&refs);
    let count = Decimal::from(basket.len());

    let points = aligned
        .into_iter()
        .map(|ts| {
            let sum: Decimal = basket.values().filter_map(|s| s.get(&ts)).sum();
            (ts, sum / count)
        })
        .collect();

    Ok(ReturnSeries::from_points(points))
}

/// 포트폴리오 시계열에서 헤지 시계열을 차감합니다.
///
/// 두 시계열의 정렬 교집합 위에서 `portfolio[t] - hedge[t]`를
/// 정확히 계산합니다.
pub fn apply_hedge(portfolio: &ReturnSeries, hedge: &ReturnSeries) -> ReturnSeries {
    let aligned = aligned_timestamps(&[portfolio, hedge]);

    let points = aligned
        .into_iter()
        .filter_map(|ts| {
            let p = portfolio.get(&ts)?;
            let h = hedge.get(&ts)?;
            Some((ts, p - h))
        })
        .collect();

    ReturnSeries::from_points(points)
}

/// 이름 붙은 시계열들의 최근 수익률 스냅샷을 만듭니다.
///
/// 모든 컬럼에 공통인 가장 최근 타임스탬프의 값을 추출하여
/// 내림차순으로 정렬합니다.
pub fn latest_snapshot(columns: &[(String, &ReturnSeries)]) -> Vec<SnapshotRow> {
    let refs: Vec<&ReturnSeries> = columns.iter().map(|(_, s)| *s).collect();
    let aligned = aligned_timestamps(&refs);

    let Some(last) = aligned.last() else {
        return Vec::new();
    };

    let mut rows: Vec<SnapshotRow> = columns
        .iter()
        .filter_map(|(name, series)| {
            series.get(last).map(|latest_pct| SnapshotRow {
                name: name.clone(),
                latest_pct,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.latest_pct.cmp(&a.latest_pct));
    rows
}

/// 토큰별 가중 평가액과 합계를 계산합니다.
///
/// `가중 평가액 = 최근 포지션 평가액 × 정규화 가중치`. 수익률
/// 스냅샷과 달리 절대 달러 금액을 다룹니다. 결과는 평가액
/// 내림차순으로 정렬됩니다.
pub fn weighted_values(
    latest_values: &BTreeMap<String, Decimal>,
    weights: &WeightMap,
) -> (Vec<WeightedValueRow>, Decimal) {
    let mut rows: Vec<WeightedValueRow> = latest_values
        .iter()
        .filter_map(|(token, value)| {
            let weight = weights.get(token)?;
            Some(WeightedValueRow {
                token: token.clone(),
                value: value * weight,
                weight_pct: weight * dec!(100),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.value.cmp(&a.value));
    let total = rows.iter().map(|r| r.value).sum();

    (rows, total)
}
