//! Time sources for issuance and verification

use chrono::Utc;

/// Source of the current unix time in seconds.
pub trait Clock: Send + Sync {
    /// Current unix timestamp
    fn now(&self) -> i64;
}

/// Wall clock backed by [`chrono::Utc`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock frozen at a fixed instant, for deterministic tokens in tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> i64 {
        self.0
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> i64 {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> i64 {
        (**self).now()
    }
}
