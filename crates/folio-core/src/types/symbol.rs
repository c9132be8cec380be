//! 거래 심볼 정의.
//!
//! 심볼은 기준 자산과 호가 자산의 쌍으로 구성됩니다.
//! 표준 표기는 `BASE/QUOTE`(예: SQD/USDT), Gate.io 거래쌍 ID는
//! `BASE_QUOTE`(예: SQD_USDT) 형식을 사용합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 현물 거래쌍을 나타내는 심볼.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: SQD, BTC)
    pub base: String,
    /// 호가 자산 (예: USDT)
    pub quote: String,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// USDT 호가 심볼을 생성합니다.
    pub fn usdt(base: impl Into<String>) -> Self {
        Self::new(base, "USDT")
    }

    /// "BASE/QUOTE" 형식 문자열에서 심볼을 파싱합니다.
    pub fn from_pair(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [base, quote] if !base.is_empty() && !quote.is_empty() => {
                Some(Self::new(*base, *quote))
            }
            _ => None,
        }
    }

    /// Gate.io 거래쌍 ID를 반환합니다 (예: "SQD_USDT").
    pub fn to_pair_id(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }

    /// 표준 심볼 문자열 형식을 반환합니다 (예: "SQD/USDT").
    pub fn to_standard_string(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
