//! Poison recovery for the store's locks
//!
//! A thread that panics while holding the store lock must not make the
//! configuration unreadable for every other thread. The cache is rebuilt from
//! disk on the next refresh anyway, so recovering the guard is safe.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Extension trait for `Mutex` with poison recovery
pub(crate) trait MutexExt<T> {
    fn lock_recovered(&self) -> MutexGuard<'_, T>;
}

/// Extension trait for `RwLock` with poison recovery
pub(crate) trait RwLockExt<T> {
    fn read_recovered(&self) -> RwLockReadGuard<'_, T>;

    fn write_recovered(&self) -> RwLockWriteGuard<'_, T>;
}

fn recover<G>(what: &str, poisoned: PoisonError<G>) -> G {
    log::warn!("Store {what} was poisoned by a panicking thread, recovering");
    poisoned.into_inner()
}

impl<T> MutexExt<T> for Mutex<T> {
    fn lock_recovered(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|e| recover("lock", e))
    }
}

impl<T> RwLockExt<T> for RwLock<T> {
    fn read_recovered(&self) -> RwLockReadGuard<'_, T> {
        self.read().unwrap_or_else(|e| recover("cache (read)", e))
    }

    fn write_recovered(&self) -> RwLockWriteGuard<'_, T> {
        self.write().unwrap_or_else(|e| recover("cache (write)", e))
    }
}
