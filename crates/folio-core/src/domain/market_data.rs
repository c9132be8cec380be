//! 시장 데이터 타입 및 구조체.

use crate::types::{Price, Quantity, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들스틱 데이터.
///
/// 하나의 시계열 내에서 `open_time`은 엄격히 증가하며, 버킷 간격은
/// 타임프레임과 일치합니다. 누락된 버킷은 채우지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    /// 거래쌍 티커 (예: "SQD/USDT")
    pub ticker: String,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (기준 자산 단위)
    pub volume: Quantity,
    /// 캔들 종료 시간
    pub close_time: DateTime<Utc>,
    /// 거래대금 (호가 자산 단위)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_volume: Option<Decimal>,
}

impl Kline {
    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}
