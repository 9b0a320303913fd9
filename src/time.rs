//! Timestamps, nonces and default expirations.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Lifetime of an order when the caller does not set an expiration.
pub const DEFAULT_ORDER_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

fn since_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

pub fn current_timestamp_millis() -> u64 {
    since_epoch().as_millis() as u64
}

/// Microsecond-resolution nonce, strictly increasing within the process.
pub fn nonce() -> u64 {
    let now = since_epoch().as_micros() as u64;
    let prev = LAST_NONCE
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_default();
    now.max(prev + 1)
}

/// Current time plus [`DEFAULT_ORDER_LIFETIME`], in milliseconds.
pub fn default_expiration() -> u64 {
    current_timestamp_millis() + DEFAULT_ORDER_LIFETIME.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_nonce_strictly_increasing() {
        let mut last = 0;
        for _ in 0..10_000 {
            let n = nonce();
            assert!(n > last);
            last = n;
        }
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let handles = (0..4)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| nonce()).collect::<Vec<_>>()))
            .collect::<Vec<_>>();
        let mut seen = HashSet::new();
        for h in handles {
            for n in h.join().unwrap() {
                assert!(seen.insert(n), "duplicate nonce {n}");
            }
        }
    }

    #[test]
    fn test_nonce_has_sub_millisecond_resolution() {
        let n = nonce();
        let ms = current_timestamp_millis();
        assert!(n / 1000 <= ms + 1000);
        assert!(n / 1000 + 1000 >= ms);
    }

    #[test]
    fn test_default_expiration_is_thirty_days_ahead() {
        let before = current_timestamp_millis();
        let exp = default_expiration();
        let after = current_timestamp_millis();
        let lifetime = 30 * 24 * 60 * 60 * 1000;
        assert!(exp >= before + lifetime);
        assert!(exp <= after + lifetime);
    }
}
