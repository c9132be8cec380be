//! 포트폴리오 가중치 맵 및 세션 가중치 상태.
//!
//! 가중치는 두 가지 방식으로 구성됩니다:
//! - 균등 가중: 토큰당 1/N
//! - 수동 가중: 사용자 지정 원시 가중치를 합으로 정규화
//!
//! 원시 가중치의 합이 0이면 정규화 결과는 전부 0입니다 (0으로
//! 나누지 않음). 이는 수동 가중치를 모두 0으로 둔 설정 상태를
//! 그대로 표현하기 위한 정의된 동작입니다.

use crate::error::{PortfolioError, PortfolioResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 가중치 구성 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// 토큰당 1/N 균등 가중
    Equal,
    /// 사용자 지정 원시 가중치를 정규화
    Manual,
}

/// 토큰별 정규화된 가중치 맵.
///
/// 양수 합의 원시 입력에 대해 가중치 합은 1입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightMap {
    weights: BTreeMap<String, Decimal>,
}

impl WeightMap {
    /// 토큰 목록에 대한 균등 가중치 맵을 생성합니다.
    pub fn equal<S: AsRef<str>>(tokens: &[S]) -> Self {
        if tokens.is_empty() {
            return Self::default();
        }

        let each = Decimal::ONE / Decimal::from(tokens.len());
        Self {
            weights: tokens
                .iter()
                .map(|t| (t.as_ref().to_string(), each))
                .collect(),
        }
    }

    /// 원시 가중치를 합으로 정규화하여 맵을 생성합니다.
    ///
    /// # Errors
    /// 음수 가중치가 있으면 `InvalidInput`을 반환합니다.
    pub fn from_raw(raw: &BTreeMap<String, Decimal>) -> PortfolioResult<Self> {
        if let Some((token, w)) = raw.iter().find(|(_, w)| **w < Decimal::ZERO) {
            return Err(PortfolioError::InvalidInput(format!(
                "{}: 가중치는 음수일 수 없습니다 (입력값: {})",
                token, w
            )));
        }

        let total: Decimal = raw.values().sum();
        let weights = raw
            .iter()
            .map(|(token, w)| {
                let normalized = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    w / total
                };
                (token.clone(), normalized)
            })
            .collect();

        Ok(Self { weights })
    }

    /// 토큰의 정규화된 가중치를 반환합니다.
    pub fn get(&self, token: &str) -> Option<Decimal> {
        self.weights.get(token).copied()
    }

    /// 가중치 합을 반환합니다.
    pub fn sum(&self) -> Decimal {
        self.weights.values().sum()
    }

    /// 포함된 토큰 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// (토큰, 가중치) 순회 이터레이터를 반환합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Decimal)> {
        self.weights.iter()
    }
}

/// 수동 가중치의 세션 상태.
///
/// 원시 가중치 값을 실행 사이에 들고 있는 명시적 홀더입니다.
/// 최초 사용 시 토큰당 기본값 10으로 초기화되며, 언제든 기본값으로
/// 되돌릴 수 있습니다. 핵심 계산은 이 상태의 저장 방식과 무관하게
/// `resolve`가 돌려주는 `WeightMap`만을 입력으로 받습니다.
#[derive(Debug, Clone)]
pub struct WeightSession {
    tokens: Vec<String>,
    raw: BTreeMap<String, Decimal>,
    default_raw: Decimal,
}

impl WeightSession {
    /// 기본 원시 가중치 (원시값 10, 정규화 전).
    pub const DEFAULT_RAW: Decimal = Decimal::TEN;

    /// 토큰 목록으로 세션을 초기화합니다.
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Self {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        let raw = tokens
            .iter()
            .map(|t| (t.clone(), Self::DEFAULT_RAW))
            .collect();

        Self {
            tokens,
            raw,
            default_raw: Self::DEFAULT_RAW,
        }
    }

    /// 토큰의 원시 가중치를 설정합니다.
    ///
    /// 세션에 없는 토큰은 무시합니다.
    pub fn set(&mut self, token: &str, raw: Decimal) {
        if let Some(entry) = self.raw.get_mut(token) {
            *entry = raw;
        }
    }

    /// 모든 원시 가중치를 기본값으로 되돌립니다.
    pub fn reset_to_default(&mut self) {
        for value in self.raw.values_mut() {
            *value = self.default_raw;
        }
    }

    /// 현재 원시 가중치를 반환합니다.
    pub fn raw_weights(&self) -> &BTreeMap<String, Decimal> {
        &self.raw
    }

    /// 구성 방식에 따라 정규화된 가중치 맵을 만듭니다.
    pub fn resolve(&self, mode: WeightMode) -> PortfolioResult<WeightMap> {
        match mode {
            WeightMode::Equal => Ok(WeightMap::equal(&self.tokens)),
            WeightMode::Manual => WeightMap::from_raw(&self.raw),
        }
    }
}
