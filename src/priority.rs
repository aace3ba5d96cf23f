//! Static priorities and SRP resource ceilings.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// A static task priority, or the ceiling of a shared resource.
///
/// Priorities form a total order in which a **larger numeric value
/// denotes strictly higher scheduling priority** (the convention of
/// Cortex-M RTFM/RTIC task priorities). The derived `Ord` follows this
/// convention, so `a > b` reads as "`a` is a higher priority than `b`".
///
/// Resource ceilings live on the same scale: holding a resource with
/// ceiling `c` raises the holder's effective priority to at least `c`,
/// and can thus stall any task whose priority is at most `c`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const fn new(level: u8) -> Priority {
        Priority(level)
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// Does `self` denote strictly higher scheduling priority than `other`?
    pub fn is_higher_than(self, other: Priority) -> bool {
        self.0 > other.0
    }

    /// Can a resource with ceiling `self` block a task of priority `task`?
    pub fn can_block(self, task: Priority) -> bool {
        self.0 >= task.0
    }
}
