//! 설정 관리.
//!
//! TOML 파일과 `FOLIO__` 접두사 환경 변수에서 애플리케이션 설정을
//! 로드합니다.

use crate::domain::{Holding, WeightMode};
use crate::error::{PortfolioError, PortfolioResult};
use crate::types::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 거래소 데이터 소스 설정
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// 분석 설정
    #[serde(default)]
    pub analysis: AnalysisSettings,
    /// 헤지 바스켓 설정
    #[serde(default)]
    pub hedge: HedgeConfig,
    /// 보유 자산 테이블
    #[serde(default)]
    pub portfolio: Vec<HoldingConfig>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 거래소 데이터 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 연속 요청 사이 최소 간격 (밀리초)
    pub min_request_interval_ms: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gateio.ws/api/v4".to_string(),
            timeout_secs: 30,
            min_request_interval_ms: 200,
        }
    }
}

/// 분석 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisSettings {
    /// 조회 기간 (일)
    pub lookback_days: u32,
    /// 헤지 성과 계산 여부
    pub hedge: bool,
    /// 가중치 구성 방식
    pub weight_mode: WeightMode,
    /// 토큰별 수동 원시 가중치 (weight_mode = manual일 때 사용)
    #[serde(default)]
    pub manual_weights: HashMap<String, Decimal>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            hedge: false,
            weight_mode: WeightMode::Equal,
            manual_weights: HashMap::new(),
        }
    }
}

/// 헤지 바스켓 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HedgeConfig {
    /// 바스켓 심볼 목록 ("BASE/QUOTE" 형식)
    pub symbols: Vec<String>,
}

impl Default for HedgeConfig {
    fn default() -> Self {
        Self {
            symbols: vec![
                "BTC/USDT".to_string(),
                "ETH/USDT".to_string(),
                "SOL/USDT".to_string(),
                "BNB/USDT".to_string(),
                "XRP/USDT".to_string(),
            ],
        }
    }
}

/// 보유 자산 설정 항목.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HoldingConfig {
    /// 토큰 이름
    pub token: String,
    /// 보유 수량
    pub quantity: Decimal,
    /// 평균 매입가
    pub avg_entry_price: Decimal,
    /// 기준(현재) 가격
    pub reference_price: Decimal,
    /// 거래쌍 ("BASE/QUOTE" 형식)
    pub pair: String,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 설정된 보유 자산 테이블을 도메인 타입으로 변환합니다.
    ///
    /// # Errors
    /// 거래쌍 형식이 잘못되었거나 수량이 0 이하면 에러를 반환합니다.
    pub fn holdings(&self) -> PortfolioResult<Vec<Holding>> {
        self.portfolio
            .iter()
            .map(|entry| {
                let symbol = Symbol::from_pair(&entry.pair).ok_or_else(|| {
                    PortfolioError::Config(format!(
                        "{}: 잘못된 거래쌍 형식: {}",
                        entry.token, entry.pair
                    ))
                })?;

                Holding::try_new(
                    entry.token.clone(),
                    entry.quantity,
                    entry.avg_entry_price,
                    entry.reference_price,
                    symbol,
                )
            })
            .collect()
    }

    /// 헤지 바스켓 심볼 목록을 파싱합니다.
    pub fn hedge_symbols(&self) -> PortfolioResult<Vec<Symbol>> {
        self.hedge
            .symbols
            .iter()
            .map(|pair| {
                Symbol::from_pair(pair).ok_or_else(|| {
                    PortfolioError::Config(format!("잘못된 헤지 심볼 형식: {}", pair))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let analysis = AnalysisSettings::default();
        assert_eq!(analysis.lookback_days, 30);
        assert!(!analysis.hedge);
        assert_eq!(analysis.weight_mode, WeightMode::Equal);

        let hedge = HedgeConfig::default();
        assert_eq!(hedge.symbols.len(), 5);
        assert_eq!(hedge.symbols[0], "BTC/USDT");
    }

    #[test]
    fn test_holdings_conversion() {
        let config = AppConfig {
            logging: LoggingConfig::default(),
            exchange: ExchangeConfig::default(),
            analysis: AnalysisSettings::default(),
            hedge: HedgeConfig::default(),
            portfolio: vec![HoldingConfig {
                token: "SQD".to_string(),
                quantity: dec!(91343),
                avg_entry_price: dec!(0.16),
                reference_price: dec!(0.24),
                pair: "SQD/USDT".to_string(),
            }],
        };

        let holdings = config.holdings().unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].symbol.to_pair_id(), "SQD_USDT");
    }

    #[test]
    fn test_invalid_pair_rejected() {
        let config = AppConfig {
            logging: LoggingConfig::default(),
            exchange: ExchangeConfig::default(),
            analysis: AnalysisSettings::default(),
            hedge: HedgeConfig::default(),
            portfolio: vec![HoldingConfig {
                token: "SQD".to_string(),
                quantity: dec!(1),
                avg_entry_price: dec!(0.16),
                reference_price: dec!(0.24),
                pair: "SQDUSDT".to_string(),
            }],
        };

        assert!(matches!(
            config.holdings(),
            Err(PortfolioError::Config(_))
        ));
    }

    #[test]
    fn test_config_from_toml() {
        let raw = r#"
            [analysis]
            lookback_days = 60
            hedge = true
            weight_mode = "manual"

            [analysis.manual_weights]
            SQD = 30

            [[portfolio]]
            token = "SQD"
            quantity = 91343
            avg_entry_price = 0.16
            reference_price = 0.24
            pair = "SQD/USDT"
        "#;

        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.analysis.lookback_days, 60);
        assert!(config.analysis.hedge);
        assert_eq!(config.analysis.weight_mode, WeightMode::Manual);
        assert_eq!(config.analysis.manual_weights.get("SQD"), Some(&dec!(30)));
        assert_eq!(config.portfolio.len(), 1);
    }
}
