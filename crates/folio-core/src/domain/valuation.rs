//! 정적 평가 지표 계산.
//!
//! 시계열 데이터와 무관하게 보유 자산 테이블만으로 계산되는
//! 평가 지표(취득 원가, 평가액, 손익)를 제공합니다.

use crate::domain::holding::Holding;
use crate::types::Percent;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 토큰 하나의 평가 결과 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRow {
    /// 토큰 이름 ("TOTAL"은 합계 행)
    pub token: String,
    /// 보유 수량
    pub quantity: Decimal,
    /// 취득 원가
    pub cost_basis: Decimal,
    /// 현재 평가액
    pub current_value: Decimal,
    /// 달러 손익
    pub dollar_return: Decimal,
    /// 수익률 (%)
    pub percent_return: Percent,
}

/// 수익률 계산 (백분율).
///
/// 취득 원가가 0이면 0을 반환합니다. 수량이 있는데 원가가 0인
/// 설정은 실제로 존재할 수 있으므로 에러 대신 정의된 값을 씁니다.
pub fn return_pct(dollar_return: Decimal, cost_basis: Decimal) -> Percent {
    if cost_basis.is_zero() {
        Decimal::ZERO
    } else {
        dollar_return / cost_basis * dec!(100)
    }
}

/// 보유 자산별 평가 행을 계산합니다.
pub fn compute_valuation(holdings: &[Holding]) -> Vec<ValuationRow> {
    holdings
        .iter()
        .map(|h| {
            let cost_basis = h.cost_basis();
            let current_value = h.current_value();
            let dollar_return = current_value - cost_basis;

            ValuationRow {
                token: h.token.clone(),
                quantity: h.quantity,
                cost_basis,
                current_value,
                dollar_return,
                percent_return: return_pct(dollar_return, cost_basis),
            }
        })
        .collect()
}

/// 평가 행들의 합계 행을 계산합니다.
///
/// 수량/원가/평가액/손익은 단순 합산하고, 합계 수익률은
/// `합계 손익 / 합계 원가`로 계산합니다.
pub fn compute_total(rows: &[ValuationRow]) -> ValuationRow {
    let quantity: Decimal = rows.iter().map(|r| r.quantity).sum();
    let cost_basis: Decimal = rows.iter().map(|r| r.cost_basis).sum();
    let current_value: Decimal = rows.iter().map(|r| r.current_value).sum();
    let dollar_return: Decimal = rows.iter().map(|r| r.dollar_return).sum();

    ValuationRow {
        token: "TOTAL".to_string(),
        quantity,
        cost_basis,
        current_value,
        dollar_return,
        percent_return: return_pct(dollar_return, cost_basis),
    }
}

/// 토큰별 수익률의 분포 요약 (평균/표준편차).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnDistribution {
    /// 수익률 평균 (%)
    pub mean_pct: Percent,
    /// 수익률 표본 표준편차 (%)
    pub std_dev_pct: Percent,
}

impl ReturnDistribution {
    /// 평가 행들(합계 행 제외)에서 분포 요약을 계산합니다.
    ///
    /// 행이 2개 미만이면 표준편차는 0입니다.
    pub fn from_rows(rows: &[ValuationRow]) -> Self {
        if rows.is_empty() {
            return Self {
                mean_pct: Decimal::ZERO,
                std_dev_pct: Decimal::ZERO,
            };
        }

        let n = Decimal::from(rows.len());
        let sum: Decimal = rows.iter().map(|r| r.percent_return).sum();
        let mean = sum / n;

        if rows.len() < 2 {
            return Self {
                mean_pct: mean,
                std_dev_pct: Decimal::ZERO,
            };
        }

        // 표본 분산은 제곱합이 커질 수 있어 f64로 계산
        let mean_f = mean.to_f64().unwrap_or(0.0);
        let var: f64 = rows
            .iter()
            .map(|r| {
                let d = r.percent_return.to_f64().unwrap_or(0.0) - mean_f;
                d * d
            })
            .sum::<f64>()
            / (rows.len() as f64 - 1.0);

        Self {
            mean_pct: mean,
            std_dev_pct: Decimal::from_f64(var.sqrt()).unwrap_or(Decimal::ZERO),
        }
    }
}
