// Code generated by apierrors-gen. DO NOT EDIT.
// source: errors.toml

use std::sync::LazyLock;

use apierrors::{Error, Registry};

// ErrorReason
static USER_NOT_FOUND: LazyLock<Error> = LazyLock::new(|| {
    Error::new(404, "USER_NOT_FOUND", "user not found", "User not found")
});
static CONTENT_MISSING: LazyLock<Error> = LazyLock::new(|| {
    Error::new(400, "CONTENT_MISSING", "content missing", "")
});
static STORAGE_FAILURE: LazyLock<Error> = LazyLock::new(|| {
    Error::new(500, "STORAGE_FAILURE", "", "Something went wrong")
});

/// The requested user does not exist.
pub fn user_not_found() -> Error {
    USER_NOT_FOUND.clone()
}

/// Whether `err` is, or wraps, a `USER_NOT_FOUND` error.
pub fn is_user_not_found(err: &(dyn std::error::Error + 'static)) -> bool {
    USER_NOT_FOUND.is(err)
}

pub fn content_missing() -> Error {
    CONTENT_MISSING.clone()
}

/// Whether `err` is, or wraps, a `CONTENT_MISSING` error.
pub fn is_content_missing(err: &(dyn std::error::Error + 'static)) -> bool {
    CONTENT_MISSING.is(err)
}

/// Storage backend failed.
///
/// Retrying may help.
pub fn storage_failure() -> Error {
    STORAGE_FAILURE.clone()
}

/// Whether `err` is, or wraps, a `STORAGE_FAILURE` error.
pub fn is_storage_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    STORAGE_FAILURE.is(err)
}

/// Register every canonical error of this catalog.
pub fn register(registry: &mut Registry) {
    registry.register(user_not_found());
    registry.register(content_missing());
    registry.register(storage_failure());
}
