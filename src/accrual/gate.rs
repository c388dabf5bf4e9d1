//! Process-wide cooperative rate-limit throttle.
//!
//! A single atomically-published deadline, consulted by every enrichment
//! worker before each outbound call. No mutex: `observe_429` only ever raises
//! the deadline via `fetch_max`, and `pause_if_needed` is a single atomic load
//! on the happy path.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;

#[derive(Debug, Default)]
pub struct RateLimitGate {
    resume_at_millis: AtomicI64,
}

const DEFAULT_PAUSE: Duration = Duration::from_secs(5);

impl RateLimitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `429` observation. `retry_after` is the raw `Retry-After`
    /// header value, if present; an unparseable or absent value falls back to
    /// a 5 second pause.
    pub fn observe_429(&self, retry_after: Option<&str>) {
        let wait = retry_after
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PAUSE);

        let candidate = Utc::now().timestamp_millis() + wait.as_millis() as i64;

        // Monotonic: never shortens a pause already published by another worker.
        self.resume_at_millis.fetch_max(candidate, Ordering::SeqCst);
    }

    pub async fn pause_if_needed(&self) {
        let resume_at = self.resume_at_millis.load(Ordering::SeqCst);
        let now = Utc::now().timestamp_millis();

        if resume_at > now {
            tokio::time::sleep(Duration::from_millis((resume_at - now) as u64)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_429_without_header_pauses_for_default() {
        let gate = RateLimitGate::new();
        let before = Utc::now().timestamp_millis();

        gate.observe_429(None);

        let resume_at = gate.resume_at_millis.load(Ordering::SeqCst);
        assert!(resume_at >= before + DEFAULT_PAUSE.as_millis() as i64);
    }

    #[test]
    fn observe_429_parses_retry_after_seconds() {
        let gate = RateLimitGate::new();
        let before = Utc::now().timestamp_millis();

        gate.observe_429(Some("2"));

        let resume_at = gate.resume_at_millis.load(Ordering::SeqCst);
        assert!(resume_at >= before + 2_000);
        assert!(resume_at < before + DEFAULT_PAUSE.as_millis() as i64);
    }

    #[test]
    fn later_observation_never_shortens_an_in_flight_pause() {
        let gate = RateLimitGate::new();

        gate.observe_429(Some("30"));
        let first = gate.resume_at_millis.load(Ordering::SeqCst);

        gate.observe_429(Some("1"));
        let second = gate.resume_at_millis.load(Ordering::SeqCst);

        assert_eq!(first, second);
    }
}
