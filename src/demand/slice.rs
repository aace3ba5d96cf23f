use super::RequestBound;
use crate::time::Duration;

/// A wrapper type for representing the total demand of individual
/// demand sources held in a slice, e.g., the request-bound functions
/// of all tasks with higher priority than the task under analysis.
#[derive(Clone, Debug)]
pub struct Slice<'a, T> {
    slice: &'a [T],
}

impl<'a, T> Slice<'a, T> {
    pub fn of(slice: &'a [T]) -> Self {
        Slice { slice }
    }
}

impl<'a, T: RequestBound> RequestBound for Slice<'a, T> {
    fn service_needed(&self, delta: Duration) -> Duration {
        self.slice
            .iter()
            .map(|rbf| rbf.service_needed(delta))
            .fold(Duration::zero(), Duration::saturating_add)
    }
}
