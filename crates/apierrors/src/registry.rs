//! Lookup from reason to canonical error.
//!
//! A wire status only carries code, reason, message and metadata. The
//! registry restores everything else (today: the pretty text) from the
//! canonical error registered under the same reason.
//!
//! Build it once at startup, typically with the `register` functions
//! emitted by `apierrors-gen`, then share it (`Arc<Registry>` or a
//! `&'static`) with whatever decodes errors. Registration needs
//! `&mut Registry`, so it cannot overlap with lookups.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::convert::{code_in, decode, decode_status};
use crate::error::{BoxError, Error};

/// Canonical errors keyed by reason.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    errors: HashMap<String, Error>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `err` under its reason. A previous entry with the same
    /// reason is replaced.
    pub fn register(&mut self, err: Error) {
        let reason = err.reason().to_string();
        if let Some(previous) = self.errors.insert(reason, err) {
            tracing::debug!(
                reason = previous.reason(),
                code = previous.code(),
                "replaced registered error"
            );
        }
    }

    /// Get the canonical error registered for `reason`
    pub fn get(&self, reason: &str) -> Option<&Error> {
        self.errors.get(reason)
    }

    pub fn contains(&self, reason: &str) -> bool {
        self.errors.contains_key(reason)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.errors.values()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Like [`crate::from_error`], but a decoded status whose reason is
    /// registered comes back as the canonical error with the wire message
    /// and metadata.
    pub fn from_error(&self, err: impl Into<BoxError>) -> Error {
        decode(err.into(), Some(self))
    }

    /// Decode a status held by reference. The status is kept as the cause.
    pub fn from_status(&self, status: &tonic::Status) -> Error {
        decode_status(status, Some(self), Arc::new(status.clone()))
    }

    /// Like [`crate::code`], but a status with a registered reason yields the
    /// registered code. Agrees with `self.from_error(err).code()`.
    pub fn code(&self, err: Option<&(dyn StdError + 'static)>) -> i32 {
        code_in(err, Some(self))
    }

    /// Same as [`crate::reason`]; registration never changes a reason.
    pub fn reason(&self, err: Option<&(dyn StdError + 'static)>) -> String {
        crate::reason(err)
    }
}

impl FromIterator<Error> for Registry {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        let mut registry = Registry::new();
        registry.extend(iter);
        registry
    }
}

impl Extend<Error> for Registry {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        for err in iter {
            self.register(err);
        }
    }
}
