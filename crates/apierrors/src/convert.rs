//! Conversions between arbitrary errors, [`Error`] and gRPC statuses.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Arc;

use tonic_types::{ErrorDetails, StatusExt};

use crate::Registry;
use crate::chain;
use crate::code::{SUCCESS_CODE, UNKNOWN_CODE, UNKNOWN_REASON, from_grpc_code, to_grpc_code};
use crate::error::{BoxError, Error, SharedError};

impl Error {
    /// Encode as a gRPC status.
    ///
    /// The code goes through [`to_grpc_code`]; reason and metadata travel in
    /// an `ErrorInfo` detail. Pretty text and stack stay local.
    pub fn to_status(&self) -> tonic::Status {
        let metadata: HashMap<String, String> = self
            .metadata()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        tonic::Status::with_error_details(
            to_grpc_code(self.code()),
            self.message(),
            ErrorDetails::with_error_info(self.reason(), "", metadata),
        )
    }
}

impl From<Error> for tonic::Status {
    fn from(err: Error) -> Self {
        err.to_status()
    }
}

impl From<&Error> for tonic::Status {
    fn from(err: &Error) -> Self {
        err.to_status()
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        from_error(status)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        from_error(err)
    }
}

/// Recover an [`Error`] from any error value, without registry lookups.
///
/// - an [`Error`] is returned as is; one found deeper in the chain is
///   returned as a copy;
/// - a [`tonic::Status`] is decoded (code, `ErrorInfo` reason and metadata)
///   and kept as the cause;
/// - anything else becomes an unknown error (500, empty reason) with the
///   original as the cause.
///
/// Use [`Registry::from_error`] to also recover registered pretty text.
pub fn from_error(err: impl Into<BoxError>) -> Error {
    decode(err.into(), None)
}

/// [`from_error`] for an optional error. `None` stays `None`.
pub fn from_option<E>(err: Option<E>) -> Option<Error>
where
    E: Into<BoxError>,
{
    err.map(from_error)
}

/// Status code of `err`. `None` means success and yields 200.
///
/// Agrees with `from_error(err).code()` without building the error. Use
/// [`Registry::code`] when registered codes must win over the wire code.
pub fn code(err: Option<&(dyn StdError + 'static)>) -> i32 {
    code_in(err, None)
}

/// Reason of `err`. `None` yields the empty unknown reason.
pub fn reason(err: Option<&(dyn StdError + 'static)>) -> String {
    let Some(err) = err else {
        return UNKNOWN_REASON.to_string();
    };
    if let Some(err) = chain::find::<Error>(err) {
        return err.reason().to_string();
    }
    if let Some(status) = chain::find::<tonic::Status>(err) {
        return status
            .get_details_error_info()
            .map(|info| info.reason)
            .unwrap_or_else(|| UNKNOWN_REASON.to_string());
    }
    UNKNOWN_REASON.to_string()
}

pub(crate) fn code_in(err: Option<&(dyn StdError + 'static)>, registry: Option<&Registry>) -> i32 {
    let Some(err) = err else {
        return SUCCESS_CODE;
    };
    if let Some(err) = chain::find::<Error>(err) {
        return err.code();
    }
    if let Some(status) = chain::find::<tonic::Status>(err) {
        let registered = status
            .get_details_error_info()
            .and_then(|info| lookup(registry, &info.reason).map(Error::code));
        return registered.unwrap_or_else(|| from_grpc_code(status.code()));
    }
    UNKNOWN_CODE
}

/// Registered error for a wire reason. The unknown reason never matches.
fn lookup<'a>(registry: Option<&'a Registry>, reason: &str) -> Option<&'a Error> {
    if reason == UNKNOWN_REASON {
        return None;
    }
    registry.and_then(|registry| registry.get(reason))
}

pub(crate) fn decode(err: BoxError, registry: Option<&Registry>) -> Error {
    let err = match err.downcast::<Error>() {
        Ok(err) => return *err,
        Err(err) => err,
    };
    let err: SharedError = Arc::from(err);

    if let Some(found) = chain::find::<Error>(&*err) {
        return found.clone();
    }

    if let Some(status) = chain::find::<tonic::Status>(&*err) {
        return decode_status(status, registry, err.clone());
    }

    tracing::trace!(error = %err, "wrapping opaque error");
    Error::new(UNKNOWN_CODE, UNKNOWN_REASON, err.to_string(), "").attach_cause(err)
}

pub(crate) fn decode_status(
    status: &tonic::Status,
    registry: Option<&Registry>,
    cause: SharedError,
) -> Error {
    let code = from_grpc_code(status.code());

    let Some(info) = status.get_details_error_info() else {
        tracing::trace!(code, "status without error info");
        return Error::new(code, UNKNOWN_REASON, status.message(), "").attach_cause(cause);
    };

    if let Some(canonical) = lookup(registry, &info.reason) {
        tracing::trace!(reason = %info.reason, "status matched registered error");
        return canonical
            .with_message(status.message())
            .with_metadata(info.metadata)
            .attach_cause(cause);
    }

    tracing::trace!(reason = %info.reason, "status with unregistered reason");
    Error::new(code, info.reason, status.message(), "")
        .with_metadata(info.metadata)
        .attach_cause(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_to_status() {
        let err = Error::new(404, "user_not_found", "no user 7", "User not found")
            .with_metadata([("user_id", "7")]);
        let status = err.to_status();

        assert_eq!(status.code(), tonic::Code::NotFound);
        assert_eq!(status.message(), "no user 7");

        let info = status.get_details_error_info().unwrap();
        assert_eq!(info.reason, "user_not_found");
        assert_eq!(info.metadata.get("user_id").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_from_error_returns_structured_as_is() {
        let err = Error::new(409, "conflict", "dup", "").with_stack();
        let back = from_error(err.clone());
        assert!(back.is_same_kind(&err));
        assert_eq!(back.message(), "dup");
        // No cause was added by the conversion.
        assert!(back.cause().is_none());
        assert!(back.stack().unwrap().ptr_eq(err.stack().unwrap()));
    }

    #[test]
    fn test_from_error_finds_nested() {
        #[derive(Debug)]
        struct Wrapper(Error);

        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "wrapped")
            }
        }

        impl StdError for Wrapper {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let err = from_error(Wrapper(Error::new(403, "denied", "no", "")));
        assert_eq!(err.code(), 403);
        assert_eq!(err.reason(), "denied");
    }

    #[test]
    fn test_from_error_opaque() {
        let err = from_error(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert_eq!(err.code(), UNKNOWN_CODE);
        assert_eq!(err.reason(), UNKNOWN_REASON);
        assert_eq!(err.message(), "disk on fire");
        assert!(err.cause().unwrap().downcast_ref::<io::Error>().is_some());

        let err = from_error("plain text");
        assert_eq!(err.message(), "plain text");
    }

    #[test]
    fn test_from_error_status_without_details() {
        let err = from_error(tonic::Status::unavailable("try later"));
        assert_eq!(err.code(), 503);
        assert_eq!(err.reason(), UNKNOWN_REASON);
        assert_eq!(err.message(), "try later");
        assert!(err.cause().unwrap().downcast_ref::<tonic::Status>().is_some());
    }

    #[test]
    fn test_from_error_status_unregistered_reason() {
        let sent = Error::new(400, "bad_input", "field x missing", "Bad input")
            .with_metadata([("field", "x")]);
        let err = from_error(sent.to_status());
        assert_eq!(err.code(), 400);
        assert_eq!(err.reason(), "bad_input");
        assert_eq!(err.message(), "field x missing");
        assert_eq!(err.metadata(), sent.metadata());
        assert_eq!(err.pretty(), "");
        assert!(err.cause().unwrap().downcast_ref::<tonic::Status>().is_some());
    }

    #[test]
    fn test_from_option() {
        assert!(from_option(None::<io::Error>).is_none());
        let err = from_option(Some(io::Error::new(io::ErrorKind::Other, "x"))).unwrap();
        assert_eq!(err.code(), UNKNOWN_CODE);
    }

    #[test]
    fn test_code_and_reason() {
        assert_eq!(code(None), SUCCESS_CODE);
        assert_eq!(reason(None), UNKNOWN_REASON);

        let err = Error::new(404, "user_not_found", "m", "");
        assert_eq!(code(Some(&err)), 404);
        assert_eq!(reason(Some(&err)), "user_not_found");

        let status = err.to_status();
        assert_eq!(code(Some(&status)), 404);
        assert_eq!(reason(Some(&status)), "user_not_found");

        let opaque = io::Error::new(io::ErrorKind::Other, "x");
        assert_eq!(code(Some(&opaque)), UNKNOWN_CODE);
        assert_eq!(reason(Some(&opaque)), UNKNOWN_REASON);
    }

    #[test]
    fn test_from_impls() {
        let status: tonic::Status = Error::new(504, "slow", "too slow", "").into();
        assert_eq!(status.code(), tonic::Code::DeadlineExceeded);

        let err: Error = status.into();
        assert_eq!(err.code(), 504);
        assert_eq!(err.reason(), "slow");

        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.code(), UNKNOWN_CODE);
    }
}
