//! 보유 자산(Holding) 정의.

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{Price, Quantity, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 추적 대상 보유 포지션.
///
/// 시작 시 설정에서 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// 토큰 이름 (예: "SQD")
    pub token: String,
    /// 보유 수량
    pub quantity: Quantity,
    /// 평균 매입가
    pub avg_entry_price: Price,
    /// 기준(현재) 가격
    pub reference_price: Price,
    /// 거래소 심볼
    pub symbol: Symbol,
}

impl Holding {
    /// 새 보유 자산을 생성합니다.
    ///
    /// # Errors
    /// 수량이 0 이하이면 `InvalidInput`을 반환합니다.
    pub fn try_new(
        token: impl Into<String>,
        quantity: Quantity,
        avg_entry_price: Price,
        reference_price: Price,
        symbol: Symbol,
    ) -> PortfolioResult<Self> {
        let token = token.into();
        if quantity <= Decimal::ZERO {
            return Err(PortfolioError::InvalidInput(format!(
                "{}: 보유 수량은 0보다 커야 합니다 (입력값: {})",
                token, quantity
            )));
        }

        Ok(Self {
            token,
            quantity,
            avg_entry_price,
            reference_price,
            symbol,
        })
    }

    /// 취득 원가 (수량 × 평균 매입가).
    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.avg_entry_price
    }

    /// 현재 평가액 (수량 × 기준 가격).
    pub fn current_value(&self) -> Decimal {
        self.quantity * self.reference_price
    }
}
