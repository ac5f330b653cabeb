use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::thread::{self, ThreadId};
use parking_lot::{Condvar, Mutex};
use crate::core::error::{Error, Result};

/// Shared state of the lock. A writer is active exactly when `writer` holds
/// the id of the thread that acquired it.
#[derive(Debug, Default)]
struct LockState {
    readers: usize,
    writer: Option<ThreadId>,
}

/// Many-readers / one-writer lock with writer-identity tracking.
///
/// The lock does not own any data; callers pair `acquire()` and `release()`
/// on the handles returned by [`read_lock`](Self::read_lock) and
/// [`write_lock`](Self::write_lock). Releasing the write lock from a thread
/// that does not hold it is reported as [`ErrorKind::LockMisuse`].
/// The lock is not reentrant: acquiring the write lock twice on one thread
/// deadlocks.
///
/// [`ErrorKind::LockMisuse`]: crate::core::error::ErrorKind::LockMisuse
pub struct RawReadWriteLock {
    state: Mutex<LockState>,
    changed: Condvar,
}

impl RawReadWriteLock {
    pub fn new() -> Self {
        RawReadWriteLock {
            state: Mutex::new(LockState::default()),
            changed: Condvar::new(),
        }
    }

    pub fn read_lock(&self) -> ReadLock<'_> {
        ReadLock { lock: self }
    }

    pub fn write_lock(&self) -> WriteLock<'_> {
        WriteLock { lock: self }
    }

    /// Number of threads currently holding the read lock.
    pub fn readers(&self) -> usize {
        self.state.lock().readers
    }

    pub fn is_write_locked(&self) -> bool {
        self.state.lock().writer.is_some()
    }

    /// True when the calling thread holds the write lock.
    pub fn holds_write_lock(&self) -> bool {
        self.state.lock().writer == Some(thread::current().id())
    }

    fn acquire_read(&self) {
        let mut state = self.state.lock();
        while state.writer.is_some() {
            self.changed.wait(&mut state);
        }
        state.readers += 1;
    }

    fn release_read(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.readers == 0 {
            return Err(Error::lock_misuse("read lock released without a matching acquire"));
        }
        state.readers -= 1;
        if state.readers == 0 {
            self.changed.notify_all();
        }
        Ok(())
    }

    fn acquire_write(&self) {
        let mut state = self.state.lock();
        while state.readers > 0 || state.writer.is_some() {
            self.changed.wait(&mut state);
        }
        state.writer = Some(thread::current().id());
    }

    fn release_write(&self) -> Result<()> {
        let current = thread::current().id();
        let mut state = self.state.lock();
        match state.writer {
            Some(holder) if holder == current => {
                state.writer = None;
                self.changed.notify_all();
                Ok(())
            }
            Some(holder) => Err(Error::lock_misuse(format!(
                "write lock held by {:?} released by {:?}",
                holder, current
            ))),
            None => Err(Error::lock_misuse("write lock released without a matching acquire")),
        }
    }
}

impl Default for RawReadWriteLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawReadWriteLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RawReadWriteLock")
            .field("readers", &state.readers)
            .field("writer", &state.writer)
            .finish()
    }
}

/// Shared (reader) side of a [`RawReadWriteLock`].
#[derive(Clone, Copy)]
pub struct ReadLock<'a> {
    lock: &'a RawReadWriteLock,
}

impl ReadLock<'_> {
    /// Blocks while a writer is active.
    pub fn acquire(&self) {
        self.lock.acquire_read();
    }

    pub fn release(&self) -> Result<()> {
        self.lock.release_read()
    }
}

/// Exclusive (writer) side of a [`RawReadWriteLock`].
#[derive(Clone, Copy)]
pub struct WriteLock<'a> {
    lock: &'a RawReadWriteLock,
}

impl WriteLock<'_> {
    /// Blocks while there are readers or another writer.
    pub fn acquire(&self) {
        self.lock.acquire_write();
    }

    /// Fails with `LockMisuse` unless the calling thread acquired the lock.
    pub fn release(&self) -> Result<()> {
        self.lock.release_write()
    }
}

/// A value protected by a [`RawReadWriteLock`].
///
/// Access goes through RAII guards, which release on drop from the thread
/// that acquired them.
pub struct ReadWriteLock<T> {
    raw: RawReadWriteLock,
    data: UnsafeCell<T>,
}

// Guards hand out `&T` to many readers at once and `&mut T` to one writer,
// the same contract as `std::sync::RwLock`.
unsafe impl<T: Send> Send for ReadWriteLock<T> {}
unsafe impl<T: Send + Sync> Sync for ReadWriteLock<T> {}

impl<T> ReadWriteLock<T> {
    pub fn new(value: T) -> Self {
        ReadWriteLock {
            raw: RawReadWriteLock::new(),
            data: UnsafeCell::new(value),
        }
    }

    pub fn read(&self) -> ReadGuard<'_, T> {
        self.raw.read_lock().acquire();
        ReadGuard { lock: self, _not_send: PhantomData }
    }

    pub fn write(&self) -> WriteGuard<'_, T> {
        self.raw.write_lock().acquire();
        WriteGuard { lock: self, _not_send: PhantomData }
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: Default> Default for ReadWriteLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for ReadWriteLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadWriteLock").field("raw", &self.raw).finish_non_exhaustive()
    }
}

pub struct ReadGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
    _not_send: PhantomData<*const ()>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the read lock is held, so no writer can hold `&mut T`.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.raw.read_lock().release() {
            tracing::error!("read guard release failed: {}", e);
        }
    }
}

pub struct WriteGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
    _not_send: PhantomData<*const ()>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the write lock is held exclusively by this thread.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the write lock is held exclusively by this thread.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.raw.write_lock().release() {
            tracing::error!("write guard release failed: {}", e);
        }
    }
}
