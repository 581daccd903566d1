//! Call-site stack snapshots for diagnostics.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

/// A captured stack, cheap to clone.
///
/// Capturing follows the standard library rules: frames are only resolved
/// when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables them. A disabled
/// snapshot still records that a stack was requested at this point, so the
/// attachment policy of [`Error`](crate::Error) behaves the same either way.
#[derive(Clone)]
pub struct Stack(Arc<Backtrace>);

impl Stack {
    /// Capture the stack of the caller.
    #[inline(never)]
    pub fn capture() -> Self {
        Self(Arc::new(Backtrace::capture()))
    }

    /// Capture the stack regardless of environment variables.
    #[inline(never)]
    pub fn force_capture() -> Self {
        Self(Arc::new(Backtrace::force_capture()))
    }

    /// Whether frames were actually recorded.
    pub fn is_captured(&self) -> bool {
        self.0.status() == BacktraceStatus::Captured
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.0
    }

    /// Whether both handles point at the same snapshot.
    pub fn ptr_eq(&self, other: &Stack) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.status() {
            BacktraceStatus::Captured => write!(f, "{}", self.0),
            _ => write!(f, "<stack not captured; set RUST_BACKTRACE=1>"),
        }
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Stack").field(&self.0.status()).finish()
    }
}
