//! Interrupt-safe mutual exclusion for driver state.
//!
//! Commit-path code and the vsync interrupt handler touch the same shadow
//! registers, so the lock has to mask interrupts for as long as it is held;
//! the interrupt context cannot block. How interrupts are masked is a host
//! property, so the kernel registers a save/restore hook pair once at
//! bring-up. Without hooks (host test harness) the mutex degrades to a plain
//! spinlock.

use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use spin::Once;

/// Host interrupt-masking capability.
#[derive(Clone, Copy)]
pub struct IrqHooks {
    /// Disable local interrupt delivery; returns the flags to restore.
    pub save: fn() -> u64,
    /// Restore interrupt delivery from previously saved flags.
    pub restore: fn(u64),
}

static IRQ_HOOKS: Once<IrqHooks> = Once::new();

/// Register the host interrupt hooks. Only the first registration wins.
pub fn irq_attach_hooks(hooks: IrqHooks) {
    IRQ_HOOKS.call_once(|| hooks);
}

#[inline]
fn irq_save() -> u64 {
    match IRQ_HOOKS.get() {
        Some(hooks) => (hooks.save)(),
        None => 0,
    }
}

#[inline]
fn irq_restore(flags: u64) {
    if let Some(hooks) = IRQ_HOOKS.get() {
        (hooks.restore)(flags);
    }
}

/// Mutex that masks interrupts while held.
///
/// Essential for state accessed from both driver-call and interrupt
/// contexts. Non-reentrant: acquiring it twice on one CPU deadlocks.
pub struct IrqMutex<T> {
    lock: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: IrqMutex provides exclusive access through atomic locking with
// interrupts masked, making it safe to share across contexts.
unsafe impl<T: Send> Send for IrqMutex<T> {}
unsafe impl<T: Send> Sync for IrqMutex<T> {}

pub struct IrqMutexGuard<'a, T> {
    mutex: &'a IrqMutex<T>,
    saved_flags: u64,
}

impl<T> IrqMutex<T> {
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            lock: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    #[inline]
    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let saved_flags = irq_save();

        while self
            .lock
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            spin_loop();
        }

        IrqMutexGuard {
            mutex: self,
            saved_flags,
        }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<IrqMutexGuard<'_, T>> {
        let saved_flags = irq_save();

        if self
            .lock
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(IrqMutexGuard {
                mutex: self,
                saved_flags,
            })
        } else {
            irq_restore(saved_flags);
            None
        }
    }
}

impl<'a, T> Deref for IrqMutexGuard<'a, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<'a, T> DerefMut for IrqMutexGuard<'a, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<'a, T> Drop for IrqMutexGuard<'a, T> {
    #[inline]
    fn drop(&mut self) {
        self.mutex.lock.store(false, Ordering::Release);
        irq_restore(self.saved_flags);
    }
}
