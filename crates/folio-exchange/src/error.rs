//! 거래소 에러 타입.

use thiserror::Error;

/// 거래소 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded")]
    RateLimited,

    /// API 에러 (Gate.io label 포함)
    #[error("API error {label}: {message}")]
    Api { label: String, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 심볼을 찾을 수 없음
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 지원되지 않는 작업
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// 알 수 없는 에러
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ExchangeError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::Network(_) | ExchangeError::Timeout(_) | ExchangeError::RateLimited
        )
    }

    /// 권장 재시도 대기 시간(밀리초) 반환.
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            ExchangeError::RateLimited => Some(60000),
            ExchangeError::Network(_) => Some(1000),
            ExchangeError::Timeout(_) => Some(500),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_connect() {
            ExchangeError::Network(err.to_string())
        } else {
            ExchangeError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Parse(err.to_string())
    }
}
