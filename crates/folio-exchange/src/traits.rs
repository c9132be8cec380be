//! 시장 데이터 소스 trait 정의.

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use folio_core::{Kline, Symbol, Timeframe};

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 과거 캔들 데이터를 제공하는 시장 데이터 소스.
///
/// 호출자는 연속 요청 사이에 `min_request_interval` 이상의 간격을
/// 두어야 합니다. 이는 데이터 소스의 스로틀링 계약이며, 보통
/// [`crate::RequestPacer`]로 지킵니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 거래 가능한 거래쌍 ID 집합을 조회합니다 (예: "SQD_USDT").
    async fn load_markets(&self) -> ExchangeResult<HashSet<String>>;

    /// 과거 캔들(OHLCV) 데이터를 조회합니다.
    ///
    /// 반환되는 캔들은 시간 오름차순으로 정렬됩니다.
    ///
    /// # Errors
    /// 미상장 심볼이면 `SymbolNotFound`, 네트워크/한도 문제면
    /// 재시도 가능한 에러를 반환합니다.
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: u32,
    ) -> ExchangeResult<Vec<Kline>>;

    /// 연속 요청 사이에 보장해야 하는 최소 간격.
    fn min_request_interval(&self) -> Duration;
}
