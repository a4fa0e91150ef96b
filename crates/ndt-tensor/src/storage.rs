use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to a flat element buffer.
///
/// Cloning a `Storage` clones the handle, not the data: every tensor holding a
/// clone reads and writes the same buffer. The buffer is freed when the last
/// handle is dropped.
pub struct Storage<T> {
    buf: Arc<RwLock<Vec<T>>>,
}

impl<T> Storage<T> {
    /// Take ownership of `data` as a new buffer.
    pub fn from_vec(data: Vec<T>) -> Self {
        Storage {
            buf: Arc::new(RwLock::new(data)),
        }
    }

    /// Number of elements in the buffer (may exceed the size of a view over it).
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the buffer contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if both handles point at the same buffer.
    pub fn ptr_eq(&self, other: &Storage<T>) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf)
    }

    /// Number of live handles to this buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.buf)
    }

    // A writer that panicked cannot leave a cell half-written, so poisoning
    // is ignored.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.buf.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.buf.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Storage<T> {
    /// Copy the elements at `offsets`, in order, into a new vector.
    pub(crate) fn gather(&self, offsets: &[usize]) -> Vec<T> {
        let buf = self.read();
        offsets.iter().map(|&o| buf[o].clone()).collect()
    }
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Storage {
            buf: Arc::clone(&self.buf),
        }
    }
}

impl<T> fmt::Debug for Storage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("len", &self.len())
            .field("handles", &self.handle_count())
            .finish()
    }
}
