//! 정밀한 금융 계산을 위한 Decimal 타입 별칭.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 보유/거래 수량을 위한 타입.
pub type Quantity = Decimal;

/// 백분율 타입 (5.25 = 5.25%).
pub type Percent = Decimal;
