//! # apierrors
//!
//! Structured errors for services that speak HTTP and gRPC.
//!
//! ## Design Philosophy
//!
//! - **Code + reason**: what kind of error this is. Matching only ever
//!   looks at these two.
//! - **Message, metadata, pretty**: what happened this time, and how to
//!   show it to a user.
//! - **Cause and stack**: where it came from, for diagnostics.
//! - **Registry**: canonical errors keyed by reason, used to restore the
//!   fields a wire status does not carry.
//!
//! ## Usage
//!
//! ```rust
//! use apierrors::{Error, Registry};
//!
//! let user_not_found = Error::new(404, "USER_NOT_FOUND", "user not found", "User not found");
//!
//! let mut registry = Registry::new();
//! registry.register(user_not_found.clone());
//!
//! // Server side.
//! let status = user_not_found
//!     .with_message("user 42 not found")
//!     .with_metadata([("user_id", "42")])
//!     .to_status();
//!
//! // Client side.
//! let err = registry.from_error(status);
//! assert!(user_not_found.is(&err));
//! assert_eq!(err.pretty(), "User not found");
//! assert!(apierrors::is_not_found(&err));
//! ```
//!
//! ## Principles
//!
//! - `with_*` never mutates: canonical errors are templates
//! - Conversions keep the original error as the cause
//! - Classify with `code`/`reason`/`is`, never by parsing messages

pub mod chain;
mod class;
pub mod code;
mod convert;
mod error;
mod registry;
mod stack;
mod status;

pub use class::{
    ErrorClass, bad_request, client_closed, conflict, forbidden, gateway_timeout,
    internal_server, is_bad_request, is_client_closed, is_conflict, is_forbidden,
    is_gateway_timeout, is_internal_server, is_not_found, is_service_unavailable,
    is_unauthorized, not_found, service_unavailable, unauthorized,
};
pub use code::{CLIENT_CLOSED, SUCCESS_CODE, UNKNOWN_CODE, UNKNOWN_REASON};
pub use convert::{code, from_error, from_option, reason};
pub use error::{BoxError, Error};
pub use registry::Registry;
pub use stack::Stack;
pub use status::{Metadata, Status, StatusLike};

/// Result type alias using apierrors Error
pub type Result<T> = std::result::Result<T, Error>;
