//! 요청 간격 제어.
//!
//! 데이터 소스의 최소 요청 간격 계약을 지키기 위한 단순한 페이서.
//! 공유 인스턴스 하나가 전체 조회 호출의 전역 간격 상한을 담당하므로,
//! 호출자가 조회를 병렬화하더라도 요청 간격은 유지됩니다.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// 연속 요청 사이 최소 간격을 강제하는 페이서.
#[derive(Debug)]
pub struct RequestPacer {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    /// 지정한 최소 간격의 페이서를 생성합니다.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// 설정된 최소 간격을 반환합니다.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 직전 요청 이후 최소 간격이 지날 때까지 대기합니다.
    ///
    /// 반환 시점이 곧 다음 요청 시점으로 기록됩니다.
    pub async fn pace(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pace_enforces_interval() {
        let pacer = RequestPacer::new(Duration::from_millis(200));

        let start = Instant::now();
        pacer.pace().await; // 첫 요청은 즉시
        pacer.pace().await;
        pacer.pace().await;

        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_request_immediate() {
        let pacer = RequestPacer::new(Duration::from_secs(10));

        let start = Instant::now();
        pacer.pace().await;

        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
