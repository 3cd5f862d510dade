//! Vsync interrupt gating.
//!
//! Double-buffered overlay registers only latch into the live pipeline at a
//! vsync boundary, so committing while the interrupt is suppressed would
//! silently produce no visible effect. The gate tracks one pipeline-wide
//! "currently suppressed" flag, distinct from any individual plane's
//! enablement: the commit path raises the signal before marking a plane
//! enabled, and the disable path drops it once no active plane needs it.
//!
//! Both entry points are idempotent and must only be called while holding
//! the pipeline lock.

use glint_lib::klog_debug;

use crate::hw::osd_regs::{SYNC_INT_CTRL, SYNC_INT_VSYNC_EN};
use crate::regio::RegisterFile;

/// Raise the vsync interrupt at the sync generator.
fn enable_signal<R: RegisterFile>(regs: &R) {
    regs.write_bits(SYNC_INT_CTRL, SYNC_INT_VSYNC_EN, SYNC_INT_VSYNC_EN);
}

/// Suppress the vsync interrupt at the sync generator.
fn disable_signal<R: RegisterFile>(regs: &R) {
    regs.write_bits(SYNC_INT_CTRL, SYNC_INT_VSYNC_EN, 0);
}

/// Pipeline-wide vsync gate state.
pub(crate) struct VsyncGate {
    suppressed: bool,
}

impl VsyncGate {
    /// Gate starts suppressed; the first commit raises the signal.
    pub(crate) const fn new() -> Self {
        Self { suppressed: true }
    }

    #[inline]
    pub(crate) fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// Make sure the vsync signal is being delivered.
    pub(crate) fn ensure_enabled<R: RegisterFile>(&mut self, regs: &R) {
        if self.suppressed {
            enable_signal(regs);
            self.suppressed = false;
            klog_debug!("vsync: signal enabled");
        }
    }

    /// Make sure the vsync signal is suppressed.
    pub(crate) fn ensure_disabled<R: RegisterFile>(&mut self, regs: &R) {
        if !self.suppressed {
            disable_signal(regs);
            self.suppressed = true;
            klog_debug!("vsync: signal suppressed");
        }
    }
}
