//! The hot path: memoized type-switch dispatch.
//!
//! A [`Dispatcher`] is a lazily built jump table keyed by dynamic type: the
//! first value of each concrete kind pays one cold resolution, every later
//! value of that kind takes the cached branch with zero type tests. This is
//! the inline-cache technique of dynamic-language runtimes, applied to a
//! closed hierarchy in a static language.
//!
//! The cache lives inside the dispatcher, not in process-global state; own a
//! `Dispatcher` wherever dispatch is driven and the amortization follows the
//! owner's lifetime.

use crate::cache::{DispatchCache, Entry};
use crate::identity::identity;
use crate::kind::{KindId, Registry};
use crate::resolver::Resolver;
use crate::shape::Shape;

/// Per-kind handler invoked with the kind-specific payload.
pub type Handler = fn(u64) -> u64;

/// One handler per registered kind, plus the handler taken when dispatch
/// resolves to the sentinel.
pub struct HandlerTable {
    handlers: Vec<Handler>,
    miss: fn() -> u64,
}

impl HandlerTable {
    /// A table with one handler per kind; the miss handler defaults to
    /// `u64::MAX`, which no payload-echoing handler produces in the tests.
    pub fn new(handlers: Vec<Handler>) -> HandlerTable {
        HandlerTable {
            handlers,
            miss: || u64::MAX,
        }
    }

    /// The same handler for every one of `n` kinds.
    pub fn uniform(n: usize, handler: Handler) -> HandlerTable {
        HandlerTable::new(vec![handler; n])
    }

    /// Replaces the sentinel-dispatch handler.
    pub fn with_miss(mut self, miss: fn() -> u64) -> HandlerTable {
        self.miss = miss;
        self
    }

    #[inline]
    fn invoke(&self, entry: Entry, value: &dyn Shape) -> u64 {
        if !entry.ordinal.is_valid() {
            return (self.miss)();
        }
        match (entry.payload)(value) {
            Some(payload) => self.handlers[entry.ordinal.index()](payload),
            // A subtree-resolved ancestor entry reads no payload.
            None => (self.miss)(),
        }
    }
}

/// The memoizing type switch: resolver + cache behind one entry point.
pub struct Dispatcher<'r> {
    resolver: Resolver<'r>,
    cache: DispatchCache,
}

impl<'r> Dispatcher<'r> {
    /// A dispatcher with the default resolver policy and an empty cache.
    pub fn new(registry: &'r Registry) -> Dispatcher<'r> {
        Dispatcher::with_resolver(Resolver::new(registry))
    }

    /// A dispatcher over a non-default probe order or test primitive.
    pub fn with_resolver(resolver: Resolver<'r>) -> Dispatcher<'r> {
        Dispatcher {
            resolver,
            cache: DispatchCache::new(),
        }
    }

    /// The registry dispatch resolves against.
    #[inline]
    pub fn registry(&self) -> &'r Registry {
        self.resolver.registry()
    }

    /// The cache, exposed for instrumentation (cold-path counting).
    #[inline]
    pub fn cache(&self) -> &DispatchCache {
        &self.cache
    }

    #[inline]
    fn entry(&self, value: &dyn Shape) -> Entry {
        match self.cache.lookup(identity(value)) {
            Some(entry) => entry,
            None => self.resolver.resolve_cold(&self.cache, value),
        }
    }

    /// Resolves the kind of `value`, amortized O(1).
    ///
    /// Returns [`KindId::INVALID`] when no registered kind matches; never
    /// panics on the dispatch path.
    #[inline]
    pub fn dispatch(&self, value: &dyn Shape) -> KindId {
        self.entry(value).ordinal
    }

    /// Resolves `value` and invokes the matching handler on its payload.
    #[inline]
    pub fn dispatch_with(&self, value: &dyn Shape, table: &HandlerTable) -> u64 {
        let entry = self.entry(value);
        table.invoke(entry, value)
    }
}
