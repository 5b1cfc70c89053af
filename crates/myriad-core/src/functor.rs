//! Per-index body traits for the dispatch entry points
//!
//! Closures of the matching shape implement these via blanket impls, and
//! hand-written functor structs can implement them directly when the body
//! carries enough state to deserve a name. Bodies are moved into the
//! dispatch and may outlive the call on asynchronous spaces, hence the
//! owning bounds.

/// Body of `parallel_for`: runs once per index.
pub trait ForFunctor: Send + Sync + 'static {
    fn apply(&self, index: usize);
}

impl<F> ForFunctor for F
where
    F: Fn(usize) + Send + Sync + 'static,
{
    fn apply(&self, index: usize) {
        self(index)
    }
}

/// Body of `parallel_reduce`: folds one index into a thread-private
/// accumulator. The accumulator arrives initialized; contributions combine
/// with the value already there.
pub trait ReduceFunctor<V>: Send + Sync + 'static {
    fn apply(&self, index: usize, acc: &mut V);
}

impl<V, F> ReduceFunctor<V> for F
where
    F: Fn(usize, &mut V) + Send + Sync + 'static,
{
    fn apply(&self, index: usize, acc: &mut V) {
        self(index, acc)
    }
}

/// Body of `parallel_scan`: sees the running prefix for its index and
/// folds its own contribution in afterwards. `is_final` is false during
/// the preparatory pass on spaces that need one; side effects belong in
/// the final pass only.
pub trait ScanFunctor<V>: Send + Sync + 'static {
    fn apply(&self, index: usize, acc: &mut V, is_final: bool);
}

impl<V, F> ScanFunctor<V> for F
where
    F: Fn(usize, &mut V, bool) + Send + Sync + 'static,
{
    fn apply(&self, index: usize, acc: &mut V, is_final: bool) {
        self(index, acc, is_final)
    }
}
