//! One-shot generation guard

use std::sync::atomic::{AtomicBool, Ordering};

/// A latch that lets exactly one caller through until it is reset
///
/// The view arms it when generation starts for a loaded record. Every
/// later trigger for the same record sees it already armed and does
/// nothing. Loading a new record resets it.
#[derive(Debug, Default)]
pub struct OneShotLatch {
    armed: AtomicBool,
}

impl OneShotLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the latch, returning `true` only for the first caller
    pub fn try_arm(&self) -> bool {
        self.armed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.armed.store(false, Ordering::Release);
    }
}
