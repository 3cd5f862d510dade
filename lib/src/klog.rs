//! Leveled kernel-style logging with an attachable byte sink.
//!
//! The driver core logs through these macros; the embedding kernel attaches
//! whatever output it has (serial, ring buffer) once at bring-up. Until a
//! sink is attached, formatting is skipped entirely and log calls cost one
//! atomic load.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use spin::Once;

/// Log severity, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KlogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl KlogLevel {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => KlogLevel::Error,
            1 => KlogLevel::Warn,
            2 => KlogLevel::Info,
            _ => KlogLevel::Debug,
        }
    }
}

/// Byte sink receiving formatted log output.
pub type KlogOutput = fn(&[u8]);

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(KlogLevel::Info as u8);
static OUTPUT: Once<KlogOutput> = Once::new();

#[inline]
fn is_enabled(level: KlogLevel) -> bool {
    level as u8 <= CURRENT_LEVEL.load(Ordering::Relaxed)
}

/// Attach the log output sink. Only the first registration wins.
pub fn klog_attach_output(output: KlogOutput) {
    OUTPUT.call_once(|| output);
}

/// Set the maximum level that gets emitted.
pub fn klog_set_level(level: KlogLevel) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Current maximum emitted level.
pub fn klog_get_level() -> KlogLevel {
    KlogLevel::from_raw(CURRENT_LEVEL.load(Ordering::Relaxed))
}

/// Returns true if a message at `level` would be emitted.
pub fn klog_is_enabled(level: KlogLevel) -> bool {
    is_enabled(level) && OUTPUT.get().is_some()
}

pub fn log_args(level: KlogLevel, args: fmt::Arguments<'_>) {
    if !is_enabled(level) {
        return;
    }
    let Some(output) = OUTPUT.get() else {
        return;
    };
    struct KlogWriter(KlogOutput);
    impl fmt::Write for KlogWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            (self.0)(s.as_bytes());
            Ok(())
        }
    }
    let _ = fmt::write(&mut KlogWriter(*output), args);
    output(b"\n");
}

#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {{
        $crate::klog::log_args($level, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! klog_error {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Error, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_warn {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Warn, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_info {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Info, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_debug {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Debug, ::core::format_args!($($arg)*))
    };
}
