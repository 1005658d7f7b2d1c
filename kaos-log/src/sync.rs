//! Lock + condition variable abstraction.
//!
//! The pipeline only talks to [`Monitor`]; a [`Backend`] picks the concrete
//! mutex/condvar pair. `ParkingLotBackend` is the default.

use std::time::Duration;

/// A value guarded by one lock and one condition variable.
pub trait Monitor<T>: Send + Sync + Sized {
    fn new(value: T) -> Self;

    /// Run `f` with the lock held.
    fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;

    /// Lock; if `idle` holds, wait once for a notification or `timeout`;
    /// then run `f` under the same lock. Spurious wakeups are allowed.
    fn wait_timeout_then<R>(
        &self,
        timeout: Duration,
        idle: impl FnOnce(&T) -> bool,
        f: impl FnOnce(&mut T) -> R,
    ) -> R;

    /// Block until `cond` turns false.
    fn wait_while(&self, cond: impl FnMut(&T) -> bool);

    fn notify_all(&self);
}

/// Selects the mutex/condvar implementation.
pub trait Backend: Send + Sync + 'static {
    type Monitor<T: Send>: Monitor<T>;
}

/// `parking_lot::Mutex` + `parking_lot::Condvar`.
pub struct ParkingLotBackend;

impl Backend for ParkingLotBackend {
    type Monitor<T: Send> = ParkingLotMonitor<T>;
}

pub struct ParkingLotMonitor<T> {
    value: parking_lot::Mutex<T>,
    cond: parking_lot::Condvar,
}

impl<T: Send> Monitor<T> for ParkingLotMonitor<T> {
    fn new(value: T) -> Self {
        Self {
            value: parking_lot::Mutex::new(value),
            cond: parking_lot::Condvar::new(),
        }
    }

    #[inline]
    fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.lock())
    }

    fn wait_timeout_then<R>(
        &self,
        timeout: Duration,
        idle: impl FnOnce(&T) -> bool,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let mut guard = self.value.lock();
        if idle(&guard) {
            let _ = self.cond.wait_for(&mut guard, timeout);
        }
        f(&mut guard)
    }

    fn wait_while(&self, mut cond: impl FnMut(&T) -> bool) {
        let mut guard = self.value.lock();
        while cond(&guard) {
            self.cond.wait(&mut guard);
        }
    }

    #[inline]
    fn notify_all(&self) {
        self.cond.notify_all();
    }
}

/// `std::sync::Mutex` + `std::sync::Condvar`. Poisoning is ignored: a
/// panicking producer must not take the writer thread down with it.
pub struct StdBackend;

impl Backend for StdBackend {
    type Monitor<T: Send> = StdMonitor<T>;
}

pub struct StdMonitor<T> {
    value: std::sync::Mutex<T>,
    cond: std::sync::Condvar,
}

impl<T> StdMonitor<T> {
    fn guard(&self) -> std::sync::MutexGuard<'_, T> {
        self.value
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T: Send> Monitor<T> for StdMonitor<T> {
    fn new(value: T) -> Self {
        Self {
            value: std::sync::Mutex::new(value),
            cond: std::sync::Condvar::new(),
        }
    }

    #[inline]
    fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.guard())
    }

    fn wait_timeout_then<R>(
        &self,
        timeout: Duration,
        idle: impl FnOnce(&T) -> bool,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let mut guard = self.guard();
        if idle(&guard) {
            guard = match self.cond.wait_timeout(guard, timeout) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        f(&mut guard)
    }

    fn wait_while(&self, mut cond: impl FnMut(&T) -> bool) {
        let guard = self.guard();
        let _guard = self
            .cond
            .wait_while(guard, |v| cond(v))
            .unwrap_or_else(std::sync::PoisonError::into_inner);
    }

    #[inline]
    fn notify_all(&self) {
        self.cond.notify_all();
    }
}
