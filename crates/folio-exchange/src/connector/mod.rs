//! 거래소별 커넥터 구현.

pub mod gateio;

pub use gateio::{GateioClient, GateioConfig};
