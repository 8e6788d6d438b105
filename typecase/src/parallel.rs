//! Parallel reduction over a value array.
//!
//! The one concession to concurrency in the benchmark model: split the array
//! into contiguous chunks, dispatch each chunk on its own scoped worker, and
//! fold the per-chunk sums into a shared atomic accumulator. The join at the
//! end of the scope is the only blocking point.
//!
//! Workers share the dispatcher's cache; racing cold resolutions of the same
//! identity are idempotent (see [`crate::cache`]).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatch::{Dispatcher, HandlerTable};
use crate::shape::Shape;

/// Dispatches every value and sums the handler results across `workers`
/// threads. A `workers` of 0 or 1, or a short input, degrades to the
/// sequential loop.
pub fn dispatch_sum(
    dispatcher: &Dispatcher<'_>,
    table: &HandlerTable,
    values: &[Box<dyn Shape>],
    workers: usize,
) -> u64 {
    if workers <= 1 || values.len() <= 1 {
        return values
            .iter()
            .map(|v| dispatcher.dispatch_with(v.as_ref(), table))
            .sum();
    }

    let chunk_len = values.len().div_ceil(workers);
    let total = AtomicU64::new(0);

    std::thread::scope(|scope| {
        for chunk in values.chunks(chunk_len) {
            let total = &total;
            scope.spawn(move || {
                let partial: u64 = chunk
                    .iter()
                    .map(|v| dispatcher.dispatch_with(v.as_ref(), table))
                    .sum();
                total.fetch_add(partial, Ordering::Relaxed);
            });
        }
    });

    total.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{KindId, Registry};

    fn values(reg: &Registry, len: usize) -> Vec<Box<dyn Shape>> {
        (0..len)
            .map(|i| reg.make_value_with(KindId((i % reg.len()) as u32), i as u64))
            .collect()
    }

    #[test]
    fn parallel_sum_matches_sequential() {
        let reg = Registry::new(8);
        let table = HandlerTable::uniform(8, |p| p + 1);
        let vals = values(&reg, 1000);

        let sequential = {
            let d = Dispatcher::new(&reg);
            dispatch_sum(&d, &table, &vals, 1)
        };
        let parallel = {
            let d = Dispatcher::new(&reg);
            dispatch_sum(&d, &table, &vals, 4)
        };

        assert_eq!(sequential, parallel);
        assert_eq!(sequential, (0..1000u64).map(|i| i + 1).sum::<u64>());
    }

    #[test]
    fn shared_cache_resolves_each_kind_once_or_redundantly_but_consistently() {
        let reg = Registry::new(4);
        let table = HandlerTable::uniform(4, |p| p);
        let vals = values(&reg, 400);
        let d = Dispatcher::new(&reg);

        dispatch_sum(&d, &table, &vals, 4);
        // Racing workers may each resolve a kind cold, but the cache ends up
        // with exactly one consistent entry per kind.
        assert_eq!(d.cache().len(), 4);
        assert!(d.cache().cold_resolutions() >= 4);
        assert_eq!(d.dispatch(vals[2].as_ref()), KindId(2));
    }
}
