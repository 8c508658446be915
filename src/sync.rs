//! Lock helpers for relation builders
//!
//! Poison recovery for `Mutex`, plus ordered acquisition of two locks so that
//! builders merging into each other from different threads cannot deadlock.

use crate::error::Result;
use std::sync::{Mutex, MutexGuard};

/// Extension trait for Mutex with poison recovery
pub(crate) trait MutexExt<T> {
    /// Lock the mutex, recovering from poison errors
    fn lock_recovered(&self) -> Result<MutexGuard<'_, T>>;
}

impl<T> MutexExt<T> for Mutex<T> {
    fn lock_recovered(&self) -> Result<MutexGuard<'_, T>> {
        match self.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => {
                log::warn!("Relation builder lock was poisoned, recovering");
                Ok(poisoned.into_inner())
            }
        }
    }
}

/// Lock two mutexes in ascending order of their owners' ids.
///
/// Guards are returned in argument order regardless of acquisition order.
/// The ids must differ; locking the same mutex twice would block forever.
pub(crate) fn lock_ordered<'a, T>(
    first: (u64, &'a Mutex<T>),
    second: (u64, &'a Mutex<T>),
) -> Result<(MutexGuard<'a, T>, MutexGuard<'a, T>)> {
    debug_assert_ne!(first.0, second.0, "lock_ordered called with one owner");

    if first.0 < second.0 {
        let a = first.1.lock_recovered()?;
        let b = second.1.lock_recovered()?;
        Ok((a, b))
    } else {
        let b = second.1.lock_recovered()?;
        let a = first.1.lock_recovered()?;
        Ok((a, b))
    }
}
