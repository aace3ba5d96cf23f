/*! Models of task activations.

Interrupt handlers are released at most once per minimum
inter-arrival time, so the only model needed here is the
jitter-free [Periodic] bound.
*/

use auto_impl::auto_impl;

use crate::time::{divide_with_ceil, Duration};

/// The main interface for models describing arrival processes.
#[auto_impl(&, Box, Rc)]
pub trait ArrivalBound {
    /// Bound the number of jobs released in any interval of length `delta`.
    fn number_arrivals(&self, delta: Duration) -> usize;
}

/// Classic jitter-free periodic arrival process as introduced by Liu & Layland.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Periodic {
    /// The minimum separation between two job releases.
    pub period: Duration,
}

impl Periodic {
    pub fn new(period: Duration) -> Self {
        Periodic { period }
    }
}

impl ArrivalBound for Periodic {
    fn number_arrivals(&self, delta: Duration) -> usize {
        divide_with_ceil(delta, self.period) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrivalBound, Periodic};
    use crate::tests::d;

    #[test]
    fn periodic_arrivals() {
        let a = Periodic::new(d(10));
        assert_eq!(a.number_arrivals(d(0)), 0);
        assert_eq!(a.number_arrivals(d(1)), 1);
        assert_eq!(a.number_arrivals(d(8)), 1);
        assert_eq!(a.number_arrivals(d(10)), 1);
        assert_eq!(a.number_arrivals(d(11)), 2);
        assert_eq!(a.number_arrivals(d(100)), 10);
        assert_eq!(a.number_arrivals(d(105)), 11);
    }
}
