//! 프레젠테이션 계층에 넘기는 분석 결과 타입.
//!
//! 테이블/차트 렌더러는 이 타입들만 소비합니다. 핵심 계산은
//! 렌더링 방식과 무관합니다.

use crate::series::ReturnSeries;
use chrono::{DateTime, Utc};
use folio_core::PortfolioError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 헤지 계산 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HedgeStatus {
    /// 헤지 미요청
    Disabled,
    /// 바스켓 전 종목 조회 성공
    Full,
    /// 일부 종목만 조회 성공 (나머지는 제외하고 평균)
    Partial,
    /// 바스켓 전 종목 조회 실패 (헤지 시계열 없음)
    Failed,
}

impl HedgeStatus {
    /// 사용자에게 보여줄 상태 설명.
    pub fn description(&self) -> &'static str {
        match self {
            HedgeStatus::Disabled => "헤지 미적용",
            HedgeStatus::Full => "헤지 바스켓 전체 반영",
            HedgeStatus::Partial => "헤지 바스켓 일부만 반영 (조회 실패 종목 제외)",
            HedgeStatus::Failed => "헤지 계산 실패 (바스켓 조회 전체 실패)",
        }
    }
}

/// 분석에서 제외된 토큰과 그 사유.
#[derive(Debug, Clone)]
pub struct SkippedToken {
    /// 토큰 이름
    pub token: String,
    /// 거래쌍 ID
    pub symbol: String,
    /// 제외 사유
    pub reason: PortfolioError,
}

/// 최근 수익률 스냅샷 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// 컬럼 이름 (토큰 또는 "Portfolio")
    pub name: String,
    /// 가장 최근 정렬 타임스탬프의 수익률 (%)
    pub latest_pct: Decimal,
}

/// 가중 평가액 스냅샷 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedValueRow {
    /// 토큰 이름
    pub token: String,
    /// 가중 평가액 (USDT)
    pub value: Decimal,
    /// 적용된 가중치 (%)
    pub weight_pct: Decimal,
}

/// 시간 인덱스 수익률 테이블의 컬럼 하나.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnColumn {
    /// 컬럼 이름
    pub name: String,
    /// 타임스탬프별 값 (해당 시점에 값이 없으면 None)
    pub values: Vec<Option<Decimal>>,
}

/// 시간 인덱스 수익률 테이블.
///
/// 행은 모든 컬럼의 타임스탬프 합집합이며, 특정 컬럼에 없는
/// 시점의 셀은 비어 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnTable {
    /// 행 타임스탬프 (오름차순)
    pub timestamps: Vec<DateTime<Utc>>,
    /// 컬럼 목록
    pub columns: Vec<ReturnColumn>,
}

impl ReturnTable {
    /// 이름 붙은 시계열들로 테이블을 만듭니다.
    pub fn from_series(columns: &[(String, &ReturnSeries)]) -> Self {
        let timestamps: Vec<DateTime<Utc>> = columns
            .iter()
            .flat_map(|(_, s)| s.timestamps().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = columns
            .iter()
            .map(|(name, series)| ReturnColumn {
                name: name.clone(),
                values: timestamps.iter().map(|ts| series.get(ts)).collect(),
            })
            .collect();

        Self {
            timestamps,
            columns,
        }
    }

    /// 행 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// 테이블이 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// 분석 실행 한 번의 전체 결과.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// 토큰별 + 포트폴리오(+ 헤지) 수익률 테이블
    pub returns: ReturnTable,
    /// 최근 수익률 스냅샷 (내림차순 정렬)
    pub snapshot: Vec<SnapshotRow>,
    /// 토큰별 가중 평가액 (내림차순 정렬)
    pub weighted: Vec<WeightedValueRow>,
    /// 가중 평가액 합계 (USDT)
    pub total_value: Decimal,
    /// 제외된 토큰 목록
    pub skipped: Vec<SkippedToken>,
    /// 헤지 계산 상태
    pub hedge_status: HedgeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::daily_klines;
    use rust_decimal_macros::dec;

    #[test]
    fn test_return_table_union_rows() {
        let a = ReturnSeries::from_klines(
            &daily_klines("A/USDT", 1_700_000_000, &[dec!(1), dec!(2)]),
            Decimal::ONE,
        )
        .unwrap();
        let b = ReturnSeries::from_klines(
            &daily_klines("B/USDT", 1_700_000_000 + 86400, &[dec!(1), dec!(2)]),
            Decimal::ONE,
        )
        .unwrap();

        let table = ReturnTable::from_series(&[("A".to_string(), &a), ("B".to_string(), &b)]);

        // 합집합: 3개 타임스탬프, 겹치는 구간은 가운데 하나
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].values[2], None); // A의 마지막 행 없음
        assert_eq!(table.columns[1].values[0], None); // B의 첫 행 없음
    }

    #[test]
    fn test_hedge_status_description() {
        assert!(HedgeStatus::Partial.description().contains("일부"));
        assert!(HedgeStatus::Failed.description().contains("실패"));
    }
}
