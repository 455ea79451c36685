//! Per-machine mutual exclusion.
//!
//! [`Guard`] wraps a blocking [`Mutex`] and remembers which thread holds
//! it. A second acquisition from the holding thread is refused with
//! [`GuardError::Reentrant`] instead of deadlocking; acquisitions from other
//! threads block until the holder releases.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Token 0 means "nobody".
static NEXT_THREAD_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TOKEN: u64 = NEXT_THREAD_TOKEN.fetch_add(1, Ordering::Relaxed);
}

fn thread_token() -> u64 {
    THREAD_TOKEN.with(|token| *token)
}

/// Why a guard could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardError {
    /// The calling thread already holds this guard.
    Reentrant,
    /// A previous holder panicked.
    Poisoned,
}

/// Mutual-exclusion primitive scoped to one machine instance.
#[derive(Debug)]
pub struct Guard<T> {
    inner: Mutex<T>,
    owner: AtomicU64,
}

impl<T> Guard<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            owner: AtomicU64::new(0),
        }
    }

    /// Block until the guard is available.
    ///
    /// Only the holding thread ever stores its own token in `owner`, so
    /// seeing our token means we are the holder.
    pub fn acquire(&self) -> Result<Held<'_, T>, GuardError> {
        let me = thread_token();
        if self.owner.load(Ordering::Acquire) == me {
            return Err(GuardError::Reentrant);
        }

        let lock = self.inner.lock().map_err(|_| GuardError::Poisoned)?;
        self.owner.store(me, Ordering::Release);
        Ok(Held {
            lock,
            owner: &self.owner,
        })
    }

    /// Whether a previous holder panicked. Does not block.
    pub fn is_poisoned(&self) -> bool {
        self.inner.is_poisoned()
    }

    /// Whether the calling thread currently holds the guard.
    pub fn held_by_current_thread(&self) -> bool {
        self.owner.load(Ordering::Acquire) == thread_token()
    }
}

/// Exclusive access to the guarded value; released on drop.
pub struct Held<'a, T> {
    lock: MutexGuard<'a, T>,
    owner: &'a AtomicU64,
}

impl<T> Deref for Held<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.lock
    }
}

impl<T> DerefMut for Held<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.lock
    }
}

impl<T> Drop for Held<'_, T> {
    fn drop(&mut self) {
        // Cleared before the mutex itself unlocks (fields drop after this).
        self.owner.store(0, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn acquire_gives_exclusive_access() {
        let guard = Guard::new(0u32);
        {
            let mut held = guard.acquire().unwrap();
            *held += 1;
            assert!(guard.held_by_current_thread());
        }
        assert!(!guard.held_by_current_thread());
        assert!(!guard.is_poisoned());
        assert_eq!(*guard.acquire().unwrap(), 1);
    }

    #[test]
    fn reacquire_on_same_thread_is_rejected() {
        let guard = Guard::new(());
        let _held = guard.acquire().unwrap();

        assert_eq!(guard.acquire().err(), Some(GuardError::Reentrant));
    }

    #[test]
    fn other_threads_block_until_release() {
        let guard = Arc::new(Guard::new(Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let guard = Arc::clone(&guard);
                thread::spawn(move || {
                    for _ in 0..100 {
                        guard.acquire().unwrap().push(i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(guard.acquire().unwrap().len(), 800);
    }

    #[test]
    fn panic_while_held_poisons() {
        let guard = Arc::new(Guard::new(()));
        let clone = Arc::clone(&guard);

        let result = thread::spawn(move || {
            let _held = clone.acquire().unwrap();
            panic!("callback blew up");
        })
        .join();

        assert!(result.is_err());
        assert!(guard.is_poisoned());
        assert_eq!(guard.acquire().err(), Some(GuardError::Poisoned));
        assert!(!guard.held_by_current_thread());
    }
}
