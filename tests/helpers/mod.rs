#![allow(dead_code)]
pub mod mock_observer;
pub mod mock_strategy;

use chrono::{Local, TimeZone};
use notifier::clock::FixedClock;
use notifier::core::Clock;
use std::sync::Arc;

/// A clock frozen at 2025-07-08 21:03:52 local time.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(
        Local.with_ymd_and_hms(2025, 7, 8, 21, 3, 52).unwrap(),
    ))
}
