//! Gate.io 거래소 커넥터.
//!
//! Gate.io 현물 공개 REST API(v4) 구현. 시장 데이터 조회만 지원하며
//! 인증이 필요한 엔드포인트는 사용하지 않습니다.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info};

use folio_core::{ExchangeConfig, Kline, Symbol, Timeframe};

use crate::traits::{ExchangeResult, MarketDataSource};
use crate::ExchangeError;

// ============================================================================
// 설정
// ============================================================================

/// Gate.io 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct GateioConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 연속 요청 사이 최소 간격 (밀리초)
    pub min_request_interval_ms: u64,
}

impl Default for GateioConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gateio.ws/api/v4".to_string(),
            timeout_secs: 30,
            min_request_interval_ms: 200,
        }
    }
}

impl From<&ExchangeConfig> for GateioConfig {
    fn from(config: &ExchangeConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
            min_request_interval_ms: config.min_request_interval_ms,
        }
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

/// 거래쌍 정보 (/spot/currency_pairs).
#[derive(Debug, Deserialize)]
struct GateCurrencyPair {
    id: String,
    #[serde(default)]
    trade_status: Option<String>,
}

/// 캔들 데이터 (/spot/candlesticks).
///
/// 문자열 배열로 반환됩니다:
/// - 0: 타임스탬프 (초)
/// - 1: 거래대금 (호가 자산 단위)
/// - 2: 종가
/// - 3: 고가
/// - 4: 저가
/// - 5: 시가
/// - 6: 거래량 (기준 자산 단위, 구버전 응답에는 없음)
/// - 7: 캔들 마감 여부 (구버전 응답에는 없음)
type GateCandlestick = Vec<String>;

/// API 에러 응답.
#[derive(Debug, Deserialize)]
struct GateApiError {
    label: String,
    message: String,
}

// ============================================================================
// Gate.io 클라이언트
// ============================================================================

/// Gate.io 현물 공개 API 클라이언트.
pub struct GateioClient {
    config: GateioConfig,
    client: Client,
}

impl GateioClient {
    /// 새 Gate.io 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::Network`를 반환합니다.
    pub fn new(config: GateioConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExchangeError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, client })
    }

    /// 공개 API GET 요청.
    async fn public_get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ExchangeResult<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(ExchangeError::from)?;

        self.handle_response(response).await
    }

    /// API 응답 처리.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> ExchangeResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse response: {} - Body: {}", e, body);
                ExchangeError::Parse(e.to_string())
            })
        } else if status.as_u16() == 429 {
            Err(ExchangeError::RateLimited)
        } else if let Ok(err) = serde_json::from_str::<GateApiError>(&body) {
            Err(Self::map_error_label(err))
        } else {
            Err(ExchangeError::Api {
                label: status.as_u16().to_string(),
                message: body,
            })
        }
    }

    /// Gate.io 에러 label을 ExchangeError로 매핑.
    fn map_error_label(err: GateApiError) -> ExchangeError {
        match err.label.as_str() {
            "INVALID_CURRENCY" | "INVALID_CURRENCY_PAIR" | "CURRENCY_PAIR_NOT_FOUND" => {
                ExchangeError::SymbolNotFound(err.message)
            }
            "TOO_MANY_REQUESTS" => ExchangeError::RateLimited,
            _ => ExchangeError::Api {
                label: err.label,
                message: err.message,
            },
        }
    }

    /// 문자열에서 Decimal 파싱.
    fn parse_decimal(s: &str) -> Decimal {
        s.parse().unwrap_or(Decimal::ZERO)
    }

    /// 캔들 응답 배열을 Kline으로 변환.
    fn candlestick_to_kline(
        symbol: &Symbol,
        timeframe: Timeframe,
        candle: &GateCandlestick,
    ) -> ExchangeResult<Kline> {
        if candle.len() < 6 {
            return Err(ExchangeError::Parse(format!(
                "캔들 필드 부족: {} (기대: 6 이상)",
                candle.len()
            )));
        }

        let secs: i64 = candle[0]
            .parse()
            .map_err(|_| ExchangeError::Parse(format!("잘못된 타임스탬프: {}", candle[0])))?;
        let open_time = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| ExchangeError::Parse(format!("범위 밖 타임스탬프: {}", secs)))?;
        let close_time = open_time + ChronoDuration::seconds(timeframe.as_secs() as i64);

        Ok(Kline {
            ticker: symbol.to_standard_string(),
            timeframe,
            open_time,
            open: Self::parse_decimal(&candle[5]),
            high: Self::parse_decimal(&candle[3]),
            low: Self::parse_decimal(&candle[4]),
            close: Self::parse_decimal(&candle[2]),
            volume: candle
                .get(6)
                .map(|v| Self::parse_decimal(v))
                .unwrap_or(Decimal::ZERO),
            close_time,
            quote_volume: Some(Self::parse_decimal(&candle[1])),
        })
    }
}

#[async_trait]
impl MarketDataSource for GateioClient {
    async fn load_markets(&self) -> ExchangeResult<HashSet<String>> {
        let pairs: Vec<GateCurrencyPair> = self.public_get("/spot/currency_pairs", &[]).await?;

        let markets: HashSet<String> = pairs
            .into_iter()
            .filter(|p| {
                p.trade_status
                    .as_deref()
                    .map(|s| s != "delisted")
                    .unwrap_or(true)
            })
            .map(|p| p.id)
            .collect();

        info!("Loaded {} currency pairs from Gate.io", markets.len());
        Ok(markets)
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: u32,
    ) -> ExchangeResult<Vec<Kline>> {
        let candles: Vec<GateCandlestick> = self
            .public_get(
                "/spot/candlesticks",
                &[
                    ("currency_pair", symbol.to_pair_id()),
                    ("interval", timeframe.to_gate_interval().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let mut klines = candles
            .iter()
            .map(|c| Self::candlestick_to_kline(symbol, timeframe, c))
            .collect::<ExchangeResult<Vec<_>>>()?;

        // 오름차순 정렬 계약 보장
        klines.sort_by_key(|k| k.open_time);

        debug!("Fetched {} klines for {}", klines.len(), symbol);
        Ok(klines)
    }

    fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.config.min_request_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candle(fields: &[&str]) -> GateCandlestick {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candlestick_to_kline() {
        let symbol = Symbol::usdt("SQD");
        let raw = candle(&[
            "1717200000",
            "228374.234",
            "0.24",
            "0.26",
            "0.22",
            "0.23",
            "951559.3",
            "true",
        ]);

        let kline = GateioClient::candlestick_to_kline(&symbol, Timeframe::D1, &raw).unwrap();
        assert_eq!(kline.ticker, "SQD/USDT");
        assert_eq!(kline.open, dec!(0.23));
        assert_eq!(kline.high, dec!(0.26));
        assert_eq!(kline.low, dec!(0.22));
        assert_eq!(kline.close, dec!(0.24));
        assert_eq!(kline.volume, dec!(951559.3));
        assert_eq!(kline.quote_volume, Some(dec!(228374.234)));
        assert_eq!(kline.open_time.timestamp(), 1717200000);
        assert_eq!(
            kline.close_time - kline.open_time,
            ChronoDuration::seconds(86400)
        );
    }

    #[test]
    fn test_candlestick_without_base_volume() {
        let symbol = Symbol::usdt("SQD");
        let raw = candle(&["1717200000", "228374.234", "0.24", "0.26", "0.22", "0.23"]);

        let kline = GateioClient::candlestick_to_kline(&symbol, Timeframe::D1, &raw).unwrap();
        assert_eq!(kline.volume, Decimal::ZERO);
    }

    #[test]
    fn test_candlestick_too_short() {
        let symbol = Symbol::usdt("SQD");
        let raw = candle(&["1717200000", "228374.234"]);

        let result = GateioClient::candlestick_to_kline(&symbol, Timeframe::D1, &raw);
        assert!(matches!(result, Err(ExchangeError::Parse(_))));
    }

    #[test]
    fn test_map_error_label() {
        let err = GateioClient::map_error_label(GateApiError {
            label: "INVALID_CURRENCY_PAIR".to_string(),
            message: "Invalid currency pair NOPE_USDT".to_string(),
        });
        assert!(matches!(err, ExchangeError::SymbolNotFound(_)));

        let err = GateioClient::map_error_label(GateApiError {
            label: "TOO_MANY_REQUESTS".to_string(),
            message: "slow down".to_string(),
        });
        assert!(matches!(err, ExchangeError::RateLimited));

        let err = GateioClient::map_error_label(GateApiError {
            label: "SERVER_ERROR".to_string(),
            message: "oops".to_string(),
        });
        assert!(matches!(err, ExchangeError::Api { .. }));
    }
}
