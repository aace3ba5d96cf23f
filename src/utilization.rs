/*! Processor utilization as an exact rational quantity.

`U = Σ Ci / Ti` is accumulated without rounding; an `f64` view is
available for display and for comparing against the Liu & Layland
bound. A sum whose common denominator does not fit into 128 bits is
reported as [UtilizationOverflow] rather than rounded.
*/

use std::cmp::Ordering;
use std::fmt;

use log::{info, warn};
use thiserror::Error;

use crate::task::TaskTable;
use crate::time::Duration;

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Error type returned when an exact utilization sum cannot be represented.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("utilization sum {lhs} + {rhs} exceeds 128-bit precision")]
pub struct UtilizationOverflow {
    pub lhs: Utilization,
    pub rhs: Utilization,
}

/// A non-negative fraction of processor capacity, kept in lowest terms.
///
/// Sums over many tasks keep the least common multiple of all periods
/// as denominator, which must fit into 128 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Utilization {
    numerator: u128,
    denominator: u128,
}

impl Utilization {
    /// The fraction `numerator / denominator`; `denominator` must be non-zero.
    pub fn new(numerator: u128, denominator: u128) -> Self {
        assert!(denominator > 0, "utilization with zero denominator");
        let g = gcd(numerator, denominator).max(1);
        Utilization {
            numerator: numerator / g,
            denominator: denominator / g,
        }
    }

    pub fn zero() -> Self {
        Utilization {
            numerator: 0,
            denominator: 1,
        }
    }

    /// The share of the processor used by a task with the given WCET and period.
    pub fn of(wcet: Duration, period: Duration) -> Self {
        Utilization::new(wcet.cycles() as u128, period.cycles() as u128)
    }

    pub fn numerator(&self) -> u128 {
        self.numerator
    }

    pub fn denominator(&self) -> u128 {
        self.denominator
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// More than the processor can supply.
    pub fn is_overloaded(&self) -> bool {
        self.numerator > self.denominator
    }
}

impl Default for Utilization {
    fn default() -> Self {
        Utilization::zero()
    }
}

impl Utilization {
    /// The exact sum `self + rhs`, or an error if the common
    /// denominator (or the scaled numerator) exceeds `u128`.
    pub fn checked_add(self, rhs: Utilization) -> Result<Utilization, UtilizationOverflow> {
        let overflow = UtilizationOverflow { lhs: self, rhs };
        let g = gcd(self.denominator, rhs.denominator);
        let lhs_scale = rhs.denominator / g;
        let rhs_scale = self.denominator / g;
        let denominator = self
            .denominator
            .checked_mul(lhs_scale)
            .ok_or(overflow)?;
        let numerator = self
            .numerator
            .checked_mul(lhs_scale)
            .zip(rhs.numerator.checked_mul(rhs_scale))
            .and_then(|(a, b)| a.checked_add(b))
            .ok_or(overflow)?;
        Ok(Utilization::new(numerator, denominator))
    }

    /// The exact sum of all `shares`.
    pub fn checked_sum<I>(shares: I) -> Result<Utilization, UtilizationOverflow>
    where
        I: IntoIterator<Item = Utilization>,
    {
        shares
            .into_iter()
            .try_fold(Utilization::zero(), Utilization::checked_add)
    }
}

/// Compare `a/b` with `c/d` (`b`, `d` non-zero) by expanding both
/// into continued fractions, which needs no multiplication.
fn cmp_fractions(mut a: u128, mut b: u128, mut c: u128, mut d: u128) -> Ordering {
    loop {
        let (q1, r1) = (a / b, a % b);
        let (q2, r2) = (c / d, c % d);
        if q1 != q2 {
            return q1.cmp(&q2);
        }
        match (r1 == 0, r2 == 0) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            // r1/b vs. r2/d has the same outcome as d/r2 vs. b/r1
            (false, false) => {
                (a, b, c, d) = (d, r2, b, r1);
            }
        }
    }
}

impl PartialOrd for Utilization {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Utilization {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_fractions(
            self.numerator,
            self.denominator,
            other.numerator,
            other.denominator,
        )
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The utilization bound of Liu & Layland (1973): `n (2^(1/n) - 1)`.
///
/// Under rate-monotonic priorities, independent periodic tasks whose
/// total utilization does not exceed this bound are schedulable. The
/// test is sufficient but not necessary, and it does not account for
/// blocking.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    n * (2.0_f64.powf(1.0 / n) - 1.0)
}

/// Per-task and total processor demand of a task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandSummary {
    /// `Ci / Ti`, indexed by [TaskId][crate::task::TaskId].
    pub per_task: Vec<Utilization>,
    pub total: Utilization,
}

impl DemandSummary {
    /// Summarize the demand of `table` given each task's WCET
    /// (indexed by [TaskId][crate::task::TaskId]).
    pub fn new(table: &TaskTable, wcets: &[Duration]) -> Result<Self, UtilizationOverflow> {
        let per_task: Vec<Utilization> = table
            .iter()
            .zip(wcets)
            .map(|(task, wcet)| Utilization::of(*wcet, task.period()))
            .collect();
        let total = Utilization::checked_sum(per_task.iter().copied())?;

        info!("total utilization {} ({:.4})", total, total.as_f64());
        if total.is_overloaded() {
            warn!("task set is overloaded: utilization {:.4} exceeds 1", total.as_f64());
        }
        Ok(DemandSummary { per_task, total })
    }

    /// The sufficient Liu & Layland test. Only meaningful for
    /// rate-monotonic priority assignments; `false` otherwise.
    pub fn passes_liu_layland(&self, table: &TaskTable) -> bool {
        table.is_rate_monotonic() && self.total.as_f64() <= liu_layland_bound(table.len())
    }
}
