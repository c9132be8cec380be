//! 포트폴리오 도메인 모델.

pub mod holding;
pub mod market_data;
pub mod valuation;
pub mod weights;

pub use holding::*;
pub use market_data::*;
pub use valuation::*;
pub use weights::*;
