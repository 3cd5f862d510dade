//! Ambient support for the glint driver core.
//!
//! The driver core is host-agnostic: the embedding kernel wires in the few
//! environment capabilities it needs (interrupt masking, a monotonic clock,
//! a log byte sink) through the registration hooks in this crate. On a host
//! without hooks attached everything degrades to a harmless no-op, which is
//! what lets the register-level logic run under an ordinary test harness.

#![no_std]

pub mod clock;
pub mod klog;
pub mod spinlock;

pub use clock::{clock_attach, now_ns};
pub use klog::{klog_attach_output, klog_get_level, klog_set_level, KlogLevel};
pub use spinlock::{irq_attach_hooks, IrqHooks, IrqMutex, IrqMutexGuard};
