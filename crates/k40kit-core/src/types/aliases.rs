//! Type aliases for the shared-state and iterator patterns used across k40kit.
//!
//! Transports and the spooler hand interpreters and pipes between tasks, so
//! the thread-safe wrappers are built on `parking_lot` mutexes.

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, reference-counted mutable value.
///
/// Used for the pipe slot shared between a server task and its owner.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A boxed iterator whose concrete type is chosen at runtime.
///
/// Command generation chains different iterator shapes per operation kind
/// (cut, engrave, raster), which this alias erases.
pub type BoxedIterator<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}
