//! System clock adapter.
//!
//! Real blocking sleeps for production runs; tests substitute a recording
//! clock so the node's fixed waits can be asserted without waiting.

use core::time::Duration;

use crate::app::ports::Clock;

/// Clock backed by the OS scheduler.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn sleep(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}
