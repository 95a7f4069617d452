use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Shared budget for Binance REST call weight, reset each wall-clock minute.
#[derive(Clone)]
pub struct GlobalRateLimiter {
    inner: Arc<Mutex<WeightWindow>>,
}

struct WeightWindow {
    used_weight: u32,
    // The specific minute since epoch this window is counting for
    minute_idx: u64,
    limit: u32,
}

impl GlobalRateLimiter {
    pub fn new(limit: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WeightWindow {
                used_weight: 0,
                minute_idx: current_minute_idx(),
                limit,
            })),
        }
    }

    /// Acquires permission to spend `cost` weight, sleeping across minute
    /// boundaries until the budget allows it.
    pub async fn acquire(&self, cost: u32, context: &str) {
        loop {
            let wait = {
                let mut guard = self.inner.lock().await;
                let now_idx = current_minute_idx();

                // 1. New wall-clock minute resets the window
                if now_idx > guard.minute_idx {
                    guard.used_weight = 0;
                    guard.minute_idx = now_idx;
                }

                // 2. Capacity check
                if guard.used_weight + cost <= guard.limit {
                    guard.used_weight += cost;
                    return;
                }

                // 3. Saturated: wait until the next :00 (plus a small buffer so
                //    we land inside the next minute)
                let now_secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or(Duration::ZERO)
                    .as_secs();
                Duration::from_secs(60 - now_secs % 60) + Duration::from_millis(100)
            };

            log::warn!(
                "🛑 Rate limit saturated for [{}]. Waiting {:.1}s (until :00)...",
                context,
                wait.as_secs_f64()
            );
            tokio::time::sleep(wait).await;
        }
    }
}

fn current_minute_idx() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        / 60
}
