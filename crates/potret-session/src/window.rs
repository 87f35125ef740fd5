//! Revision window timeout policy.
//!
//! The deadline is computed once when a result is delivered and stored in
//! the session, so a single expiry check never straddles a clock read.
//! Expiry is evaluated lazily on the next text event; the store's own
//! TTL is the independent (strictly longer) second expiry mechanism.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy)]
pub struct RevisionWindow {
    window: Duration,
}

impl RevisionWindow {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Absolute deadline for a revision window opening at `now`.
    pub fn deadline_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let delta = TimeDelta::from_std(self.window).unwrap_or(TimeDelta::MAX);
        now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Strict comparison: text arriving at exactly the deadline is still
    /// accepted.
    pub fn is_expired(&self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now > deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_now_plus_window() {
        let window = RevisionWindow::new(Duration::from_secs(60));
        let now = Utc::now();
        assert_eq!(window.deadline_after(now), now + TimeDelta::seconds(60));
    }

    #[test]
    fn exactly_at_deadline_is_not_expired() {
        let window = RevisionWindow::new(Duration::from_secs(60));
        let now = Utc::now();
        let deadline = window.deadline_after(now);
        assert!(!window.is_expired(deadline, deadline));
    }

    #[test]
    fn one_millisecond_past_deadline_is_expired() {
        let window = RevisionWindow::new(Duration::from_secs(60));
        let deadline = window.deadline_after(Utc::now());
        assert!(window.is_expired(deadline, deadline + TimeDelta::milliseconds(1)));
    }
}
