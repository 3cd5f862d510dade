//! Error types surfaced to the compositor collaborator.

use core::ffi::c_int;

/// Rejection reasons produced by overlay validation.
///
/// All variants are local and non-fatal: no register write has happened when
/// one is returned, and the caller decides whether to hold the previous
/// placement or submit a corrected request. The commit paths themselves are
/// infallible once validation has passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidateError {
    /// The plane has no destination target; there is nothing to show
    NoTarget,
    /// Source and destination sizes differ; the block cannot scale
    UnsupportedScaling,
    /// The destination rectangle lies fully outside the output bounds
    OutOfBounds,
    /// The request does not qualify for the fast update path
    FastPathIneligible,
}

impl ValidateError {
    /// Convert to a C-style return code for syscall-boundary callers.
    #[inline]
    pub const fn as_c_int(self) -> c_int {
        match self {
            ValidateError::NoTarget => -1,
            ValidateError::UnsupportedScaling => -2,
            ValidateError::OutOfBounds => -3,
            ValidateError::FastPathIneligible => -4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_distinct() {
        let codes = [
            ValidateError::NoTarget.as_c_int(),
            ValidateError::UnsupportedScaling.as_c_int(),
            ValidateError::OutOfBounds.as_c_int(),
            ValidateError::FastPathIneligible.as_c_int(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(*a < 0);
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
