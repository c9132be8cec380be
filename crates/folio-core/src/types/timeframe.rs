//! 캔들스틱 데이터를 위한 타임프레임 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들스틱 타임프레임.
///
/// 분석 파이프라인은 일봉(`D1`)을 사용하지만, 커넥터는 Gate.io가
/// 지원하는 간격이라면 모두 조회할 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 5분봉
    M5,
    /// 15분봉
    M15,
    /// 30분봉
    M30,
    /// 1시간봉
    H1,
    /// 4시간봉
    H4,
    /// 8시간봉
    H8,
    /// 일봉
    D1,
    /// 주봉
    W1,
}

impl Timeframe {
    /// 이 타임프레임의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::M5 => Duration::from_secs(5 * 60),
            Timeframe::M15 => Duration::from_secs(15 * 60),
            Timeframe::M30 => Duration::from_secs(30 * 60),
            Timeframe::H1 => Duration::from_secs(60 * 60),
            Timeframe::H4 => Duration::from_secs(4 * 60 * 60),
            Timeframe::H8 => Duration::from_secs(8 * 60 * 60),
            Timeframe::D1 => Duration::from_secs(24 * 60 * 60),
            Timeframe::W1 => Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    /// 이 타임프레임의 초 단위 값을 반환합니다.
    pub fn as_secs(&self) -> u64 {
        self.duration().as_secs()
    }

    /// Gate.io 간격 문자열로 변환합니다.
    pub fn to_gate_interval(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::H8 => "8h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "7d",
        }
    }

    /// Gate.io 간격 문자열에서 파싱합니다.
    pub fn from_gate_interval(s: &str) -> Option<Self> {
        match s {
            "5m" => Some(Timeframe::M5),
            "15m" => Some(Timeframe::M15),
            "30m" => Some(Timeframe::M30),
            "1h" => Some(Timeframe::H1),
            "4h" => Some(Timeframe::H4),
            "8h" => Some(Timeframe::H8),
            "1d" => Some(Timeframe::D1),
            "7d" => Some(Timeframe::W1),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_gate_interval())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_gate_interval(s).ok_or_else(|| format!("Invalid timeframe: {}", s))
    }
}
