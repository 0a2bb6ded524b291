use crate::time::{now, DateTime};
use std::fmt::Debug;

/// Clock provides the point in time a signature is computed at.
///
/// The clock is a capability carried by [`Context`](crate::Context) rather
/// than a hidden call to the system time, so tests can supply a
/// deterministic reading without global mocking.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Return the current time.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now()
    }
}

/// FixedClock always returns the wrapped time.
///
/// This is useful for testing or for re-signing a request at a known time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(
    /// The time every reading returns.
    pub DateTime,
);

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        self.0
    }
}
