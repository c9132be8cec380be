//! 정규화 수익률 시계열.
//!
//! 캔들 시계열을 첫 관측값 대비 % 변화 시계열로 변환합니다.
//! 정의상 첫 타임스탬프의 값은 정확히 0입니다.
//!
//! 서로 다른 심볼의 시계열은 타임스탬프 키의 교집합(inner join)
//! 위에서만 결합됩니다. 일부 시계열에만 존재하는 타임스탬프는
//! 결합 결과에서 빠집니다. 전진 채움이나 보간은 하지 않습니다.

use chrono::{DateTime, Utc};
use folio_core::{Kline, PortfolioError, PortfolioResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 타임스탬프별 수익률(%) 시계열.
///
/// 토큰 하나의 정규화 시계열과 집계된 포트폴리오 시계열 모두
/// 이 타입으로 표현됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnSeries {
    points: BTreeMap<DateTime<Utc>, Decimal>,
}

impl ReturnSeries {
    /// 타임스탬프별 값 맵에서 시계열을 생성합니다.
    pub fn from_points(points: BTreeMap<DateTime<Utc>, Decimal>) -> Self {
        Self { points }
    }

    /// 캔들 시계열을 첫 관측 대비 % 변화 시계열로 정규화합니다.
    ///
    /// 각 캔들의 값은 `close * scale`이며, 결과는
    /// `(value / value_0 - 1) * 100`입니다. `scale`로 보유 수량을
    /// 넘기면 달러 평가액 기준 시계열이 되지만, 비율 계산이므로
    /// 수익률 자체는 스케일과 무관합니다.
    ///
    /// # Errors
    /// 캔들이 없거나 첫 관측값이 0이면 `InsufficientData`를 반환합니다.
    pub fn from_klines(klines: &[Kline], scale: Decimal) -> PortfolioResult<Self> {
        let first = klines.first().ok_or_else(|| {
            PortfolioError::InsufficientData("빈 캔들 시계열".to_string())
        })?;

        let base = first.close * scale;
        if base.is_zero() {
            return Err(PortfolioError::InsufficientData(format!(
                "{}: 첫 관측값이 0이라 정규화할 수 없습니다",
                first.ticker
            )));
        }

        let points = klines
            .iter()
            .map(|k| {
                let value = k.close * scale;
                (k.open_time, (value / base - Decimal::ONE) * dec!(100))
            })
            .collect();

        Ok(Self { points })
    }

    /// 타임스탬프의 값을 반환합니다.
    pub fn get(&self, timestamp: &DateTime<Utc>) -> Option<Decimal> {
        self.points.get(timestamp).copied()
    }

    /// 타임스탬프가 존재하는지 확인합니다.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.points.contains_key(timestamp)
    }

    /// 첫 (타임스탬프, 값) 쌍을 반환합니다.
    pub fn first(&self) -> Option<(DateTime<Utc>, Decimal)> {
        self.points.iter().next().map(|(t, v)| (*t, *v))
    }

    /// 마지막 (타임스탬프, 값) 쌍을 반환합니다.
    pub fn latest(&self) -> Option<(DateTime<Utc>, Decimal)> {
        self.points.iter().next_back().map(|(t, v)| (*t, *v))
    }

    /// 포인트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 타임스탬프 순회 이터레이터를 반환합니다.
    pub fn timestamps(&self) -> impl Iterator<Item = &DateTime<Utc>> {
        self.points.keys()
    }

    /// (타임스탬프, 값) 순회 이터레이터를 반환합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Utc>, &Decimal)> {
        self.points.iter()
    }
}

/// 여러 시계열에 모두 존재하는 타임스탬프의 교집합을 반환합니다.
///
/// 결합 정책은 inner join입니다. 입력이 비어있으면 빈 벡터를
/// 반환합니다.
pub fn aligned_timestamps(series: &[&ReturnSeries]) -> Vec<DateTime<Utc>> {
    let Some((head, rest)) = series.split_first() else {
        return Vec::new();
    };

    head.timestamps()
        .filter(|ts| rest.iter().all(|s| s.contains(ts)))
        .copied()
        .collect()
}
