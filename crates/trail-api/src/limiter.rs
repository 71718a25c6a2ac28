//! Fixed-rate admission control.
//!
//! [`TokenBucket`] hands out permits no closer together than `1 / rate`.
//! Callers that arrive early are suspended until their slot comes up; nobody
//! is ever turned away.

use std::{num::NonZeroU32, time::Duration};

use tokio::{
  sync::Mutex,
  time::{Instant, sleep_until},
};
use tracing::debug;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A token bucket with capacity one, refilled at a fixed rate.
///
/// Each call to [`TokenBucket::acquire`] reserves the next free slot under a
/// short-lived lock and then sleeps until that slot without holding the lock,
/// so waiting callers queue up in reservation order.
#[derive(Debug)]
pub struct TokenBucket {
  interval:   Duration,
  last_issue: Mutex<Option<Instant>>,
}

impl TokenBucket {
  /// A bucket issuing `rate` permits per second.
  pub fn new(rate: NonZeroU32) -> Self {
    Self {
      interval:   interval_for(rate),
      last_issue: Mutex::new(None),
    }
  }

  /// Minimum spacing between two issued permits.
  pub fn interval(&self) -> Duration { self.interval }

  /// Wait for a permit and return the instant it was issued at.
  pub async fn acquire(&self) -> Instant {
    let (slot, since_previous) = {
      let mut last = self.last_issue.lock().await;
      let now = Instant::now();
      let slot = match *last {
        Some(previous) => now.max(previous + self.interval),
        None => now,
      };
      let since_previous = last.map(|previous| slot - previous);
      *last = Some(slot);
      (slot, since_previous)
    };

    sleep_until(slot).await;
    debug!(?since_previous, "permit issued");
    slot
  }
}

/// `1 / rate` seconds, rounded up to the next whole nanosecond.
fn interval_for(rate: NonZeroU32) -> Duration {
  Duration::from_nanos(NANOS_PER_SEC.div_ceil(u64::from(rate.get())))
}
