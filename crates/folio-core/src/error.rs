//! 포트폴리오 분석 시스템의 에러 타입.

use thiserror::Error;

/// 핵심 포트폴리오 에러.
#[derive(Debug, Clone, Error)]
pub enum PortfolioError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 거래소/데이터 소스 에러
    #[error("거래소 에러: {0}")]
    Exchange(String),

    /// 심볼이 거래소에 상장되어 있지 않음
    #[error("미상장 심볼: {0}")]
    SymbolNotListed(String),

    /// 심볼별 데이터 조회 실패 (네트워크/API)
    #[error("데이터 조회 실패: {0}")]
    FetchFailed(String),

    /// 캔들 데이터 부족 (빈 시계열)
    #[error("데이터 부족: {0}")]
    InsufficientData(String),

    /// 모든 토큰의 조회가 실패하여 결과 없음
    #[error("집계할 데이터가 없습니다")]
    EmptyResult,

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 포트폴리오 작업을 위한 Result 타입.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

impl PortfolioError {
    /// 심볼 단위로 국소적인 에러인지 확인합니다.
    ///
    /// 국소 에러는 해당 토큰만 건너뛰고 분석을 계속합니다.
    /// `EmptyResult`만이 분석 전체를 중단시킵니다.
    pub fn is_symbol_local(&self) -> bool {
        matches!(
            self,
            PortfolioError::SymbolNotListed(_)
                | PortfolioError::FetchFailed(_)
                | PortfolioError::InsufficientData(_)
        )
    }

    /// 분석 전체를 중단시키는 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        !self.is_symbol_local()
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(err: serde_json::Error) -> Self {
        PortfolioError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PortfolioError {
    fn from(err: config::ConfigError) -> Self {
        PortfolioError::Config(err.to_string())
    }
}
