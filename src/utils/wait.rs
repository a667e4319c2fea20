//! 条件等待
//!
//! 用显式的轮询等待替代裸 sleep，挂起点和超时都是可见、可测的。

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// 以固定间隔轮询探测条件，直到成立或超时
///
/// 返回 true 表示条件在超时前成立。最后一次探测完成后若已过期，
/// 立即返回，整体耗时不超过 timeout 加一个轮询间隔。
pub async fn poll_until<F, Fut>(interval: Duration, timeout: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn returns_true_when_probe_succeeds() {
        let calls = AtomicU32::new(0);
        let ok = poll_until(Duration::from_secs(2), Duration::from_secs(60), || {
            let calls = &calls;
            async move { calls.fetch_add(1, Ordering::SeqCst) >= 2 }
        })
        .await;
        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_false_within_timeout_plus_one_interval() {
        let start = Instant::now();
        let ok = poll_until(Duration::from_secs(2), Duration::from_secs(10), || async {
            false
        })
        .await;
        assert!(!ok);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed <= Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_skips_sleep() {
        let start = Instant::now();
        let ok = poll_until(Duration::from_secs(2), Duration::from_secs(10), || async {
            true
        })
        .await;
        assert!(ok);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
