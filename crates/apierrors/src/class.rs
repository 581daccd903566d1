//! The common HTTP-like error classes, with constructors and classifiers.

use std::error::Error as StdError;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::{Error, Registry};
use crate::code::CLIENT_CLOSED;

/// A broad error class, identified by its status code.
///
/// Classes only look at the code. Use [`Error::is`] to match a specific
/// code and reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display, EnumIter)]
pub enum ErrorClass {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 499, the client went away before the response
    ClientClosed,
    /// 500
    InternalServer,
    /// 503
    ServiceUnavailable,
    /// 504
    GatewayTimeout,
}

impl ErrorClass {
    pub const fn code(self) -> i32 {
        match self {
            ErrorClass::BadRequest => 400,
            ErrorClass::Unauthorized => 401,
            ErrorClass::Forbidden => 403,
            ErrorClass::NotFound => 404,
            ErrorClass::Conflict => 409,
            ErrorClass::ClientClosed => CLIENT_CLOSED,
            ErrorClass::InternalServer => 500,
            ErrorClass::ServiceUnavailable => 503,
            ErrorClass::GatewayTimeout => 504,
        }
    }

    /// The class whose code is `code`, if any.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::iter().find(|class| class.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Build an error of this class.
    pub fn error(
        self,
        reason: impl Into<String>,
        message: impl Into<String>,
        pretty: impl Into<String>,
    ) -> Error {
        Error::new(self.code(), reason, message, pretty)
    }

    /// Whether `err` classifies as this class. See [`crate::code`].
    pub fn matches(self, err: &(dyn StdError + 'static)) -> bool {
        crate::code(Some(err)) == self.code()
    }

    /// Like [`ErrorClass::matches`], but classifies by [`Registry::code`], so
    /// a status with a registered reason uses the registered code.
    pub fn matches_in(self, registry: &Registry, err: &(dyn StdError + 'static)) -> bool {
        registry.code(Some(err)) == self.code()
    }
}

macro_rules! define_classes {
    ($(($class:ident, $new:ident, $is:ident)),* $(,)?) => {
        $(
            #[doc = concat!("New `", stringify!($class), "` error.")]
            pub fn $new(
                reason: impl Into<String>,
                message: impl Into<String>,
                pretty: impl Into<String>,
            ) -> Error {
                ErrorClass::$class.error(reason, message, pretty)
            }

            #[doc = concat!("Whether `err` is a `", stringify!($class), "` error. Looks through wrapped errors.")]
            pub fn $is(err: &(dyn StdError + 'static)) -> bool {
                ErrorClass::$class.matches(err)
            }
        )*
    };
}

define_classes! {
    (BadRequest, bad_request, is_bad_request),
    (Unauthorized, unauthorized, is_unauthorized),
    (Forbidden, forbidden, is_forbidden),
    (NotFound, not_found, is_not_found),
    (Conflict, conflict, is_conflict),
    (ClientClosed, client_closed, is_client_closed),
    (InternalServer, internal_server, is_internal_server),
    (ServiceUnavailable, service_unavailable, is_service_unavailable),
    (GatewayTimeout, gateway_timeout, is_gateway_timeout),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_class_display() {
        assert_eq!(ErrorClass::NotFound.to_string(), "NotFound");
        assert_eq!(ErrorClass::ClientClosed.as_str(), "ClientClosed");
    }

    #[test]
    fn test_from_code() {
        for class in ErrorClass::iter() {
            assert_eq!(ErrorClass::from_code(class.code()), Some(class));
        }
        assert_eq!(ErrorClass::from_code(418), None);
    }

    #[test]
    fn test_constructors_keep_pretty() {
        let err = not_found("user_not_found", "no user 7", "User not found");
        assert_eq!(err.code(), 404);
        assert_eq!(err.reason(), "user_not_found");
        assert_eq!(err.pretty(), "User not found");
    }

    #[test]
    fn test_classifiers() {
        assert!(is_not_found(&not_found("r", "m", "")));
        assert!(!is_not_found(&bad_request("r", "m", "")));
        assert!(is_client_closed(&client_closed("r", "m", "")));
        assert!(is_gateway_timeout(&gateway_timeout("r", "m", "")));

        let opaque = io::Error::new(io::ErrorKind::Other, "boom");
        assert!(is_internal_server(&opaque));
        assert!(!is_service_unavailable(&opaque));
    }

    #[test]
    fn test_matches_in_uses_registered_code() {
        use tonic_types::{ErrorDetails, StatusExt};

        let mut registry = Registry::new();
        registry.register(conflict("duplicate_user", "user exists", ""));

        // A peer that reports every failure as Unknown, with the reason intact.
        let status = tonic::Status::with_error_details(
            tonic::Code::Unknown,
            "user 7 exists",
            ErrorDetails::with_error_info("duplicate_user", "", std::collections::HashMap::new()),
        );
        assert!(!is_conflict(&status));
        assert!(is_internal_server(&status));
        assert!(ErrorClass::Conflict.matches_in(&registry, &status));
        assert!(!ErrorClass::InternalServer.matches_in(&registry, &status));

        let unregistered = internal_server("other", "m", "").to_status();
        assert!(ErrorClass::InternalServer.matches_in(&registry, &unregistered));
    }

    #[test]
    fn test_classifier_sees_wrapped_error() {
        let err = internal_server("wrap", "outer", "").with_cause(conflict("dup", "inner", ""));
        // The outermost error decides.
        assert!(is_internal_server(&err));
        assert!(!is_conflict(&err));
    }
}
