//! The discrete time model: all quantities are processor cycle counts
//! as read from the target's cycle counter.

use derive_more::{Add, Display, From, Into, Mul, Sub};
use serde::{Deserialize, Serialize};

/// A length of time (or amount of processor service), measured in
/// cycles.
///
/// Timestamps in a trace are offsets from the start of a task's run
/// and thus also represented as a `Duration`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Add,
    Sub,
    Mul,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Duration(u64);

impl Duration {
    /// The empty interval.
    pub const fn zero() -> Duration {
        Duration(0)
    }

    pub const fn from_cycles(cycles: u64) -> Duration {
        Duration(cycles)
    }

    pub const fn cycles(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_non_zero(self) -> bool {
        self.0 > 0
    }

    /// Addition that clamps at the largest representable duration.
    pub fn saturating_add(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_mul(self, n: u64) -> Duration {
        Duration(self.0.saturating_mul(n))
    }
}

/// Exact integer ceiling division `⌈a / b⌉`.
///
/// `b` must be non-zero; task periods are validated on construction.
pub fn divide_with_ceil(a: Duration, b: Duration) -> u64 {
    a.0 / b.0 + (a.0 % b.0 > 0) as u64
}
