//! Shared result handle for asynchronous reductions
//!
//! A [`ResultView`] is the container-style destination: the dispatch writes
//! the final value through one clone while the caller keeps another. Reads
//! are racy with respect to an in-flight dispatch in the sense that they
//! may still observe the previous value; callers fence the execution space
//! before trusting the contents.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable handle to a single reduction result slot.
///
/// Clones alias the same slot, so a view can be handed to a dispatch and
/// polled from the caller side later.
pub struct ResultView<V> {
    slot: Arc<Mutex<V>>,
}

impl<V> ResultView<V> {
    pub fn new(initial: V) -> Self {
        Self {
            slot: Arc::new(Mutex::new(initial)),
        }
    }

    /// Copies the current contents out of the slot.
    pub fn get(&self) -> V
    where
        V: Copy,
    {
        *self.slot.lock()
    }

    /// Overwrites the slot.
    pub fn set(&self, value: V) {
        *self.slot.lock() = value;
    }
}

impl<V> Clone for ResultView<V> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<V: Copy + fmt::Debug> fmt::Debug for ResultView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultView").field(&self.get()).finish()
    }
}

impl<V: Default> Default for ResultView<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}
