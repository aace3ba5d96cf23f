use log::debug;
use thiserror::Error;

use crate::time::Duration;

/// Error type returned when a fixed point search fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum SearchFailure {
    /// Neither a fixed point nor a deadline miss within the iteration limit.
    #[error("no fixed point found within {limit} iterations (last iterate {last})")]
    IterationLimitExceeded { limit: usize, last: Duration },
}

/// How a deadline-bounded search terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `R(s) = R(s-1)`: the exact worst-case response time.
    Fixed,
    /// Some iterate exceeded the deadline; the last iterate is a
    /// lower bound on the response time.
    Missed,
}

/// The outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub verdict: Verdict,
    /// The final iterate.
    pub response_time: Duration,
    /// All iterates `R(0), R(1), ...`, in order.
    pub iterates: Vec<Duration>,
}

pub type SearchResult = Result<Solution, SearchFailure>;

/// The states of the search.
#[derive(Debug, Clone, Copy)]
enum State {
    Initializing,
    Iterating { previous: Duration },
    Fixed(Duration),
    Missed(Duration),
}

/// Iterate `R(s) = rhs(R(s-1))` starting from `R(0) = initial` until
/// either a fixed point is reached or an iterate exceeds `deadline`.
///
/// `rhs` must be monotonically non-decreasing and satisfy
/// `rhs(x) >= initial`; the iterates are then non-decreasing and the
/// search terminates. At most `limit` evaluations of `rhs` are
/// performed before giving up with a [SearchFailure].
pub fn search_with_deadline<RHS>(
    initial: Duration,
    deadline: Duration,
    limit: usize,
    rhs: RHS,
) -> SearchResult
where
    RHS: Fn(Duration) -> Duration,
{
    let mut iterates = Vec::new();
    let mut state = State::Initializing;
    loop {
        state = match state {
            State::Initializing => {
                iterates.push(initial);
                if initial > deadline {
                    State::Missed(initial)
                } else {
                    State::Iterating { previous: initial }
                }
            }
            State::Iterating { previous } => {
                // iterates[0] is R(0), which costs no evaluation
                if iterates.len() > limit {
                    return Err(SearchFailure::IterationLimitExceeded {
                        limit,
                        last: previous,
                    });
                }
                let next = rhs(previous);
                debug!("R({}) = {}", iterates.len(), next);
                debug_assert!(next >= previous, "non-monotonic right-hand side");
                iterates.push(next);
                if next > deadline {
                    State::Missed(next)
                } else if next == previous {
                    State::Fixed(next)
                } else {
                    State::Iterating { previous: next }
                }
            }
            State::Fixed(response_time) => {
                return Ok(Solution {
                    verdict: Verdict::Fixed,
                    response_time,
                    iterates,
                })
            }
            State::Missed(response_time) => {
                return Ok(Solution {
                    verdict: Verdict::Missed,
                    response_time,
                    iterates,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::d;

    #[test]
    fn converges() {
        // R = 5 + ceil(R / 10) * 3
        let rhs = |r: Duration| d(5) + d(3) * crate::time::divide_with_ceil(r, d(10));
        let s = search_with_deadline(d(5), d(20), 100, rhs).unwrap();
        assert_eq!(s.verdict, Verdict::Fixed);
        assert_eq!(s.response_time, d(8));
        assert_eq!(s.iterates, vec![d(5), d(8), d(8)]);
    }

    #[test]
    fn initial_value_already_late() {
        let s = search_with_deadline(d(25), d(20), 100, |r| r + d(1)).unwrap();
        assert_eq!(s.verdict, Verdict::Missed);
        assert_eq!(s.response_time, d(25));
        assert_eq!(s.iterates, vec![d(25)]);
    }

    #[test]
    fn stops_at_first_late_iterate() {
        let s = search_with_deadline(d(1), d(20), 100, |r| r * 2u64).unwrap();
        assert_eq!(s.verdict, Verdict::Missed);
        assert_eq!(s.iterates, vec![d(1), d(2), d(4), d(8), d(16), d(32)]);
    }

    #[test]
    fn iteration_limit() {
        assert_eq!(
            search_with_deadline(d(1), d(1000), 3, |r| r + d(1)),
            Err(SearchFailure::IterationLimitExceeded {
                limit: 3,
                last: d(4)
            })
        );
        // a zero limit still reports a late R(0)
        assert_eq!(
            search_with_deadline(d(5), d(1), 0, |r| r).map(|s| s.verdict),
            Ok(Verdict::Missed)
        );
    }
}
