//! Mapping between HTTP-like status codes and gRPC codes.

use tonic::Code;

/// Code used when an error cannot be classified.
pub const UNKNOWN_CODE: i32 = 500;

/// Reason used when an error cannot be classified.
pub const UNKNOWN_REASON: &str = "";

/// Code reported for "no error".
pub const SUCCESS_CODE: i32 = 200;

/// Non-standard HTTP code for a client that closed the connection
/// before the server responded.
pub const CLIENT_CLOSED: i32 = 499;

/// Convert an HTTP-like code into a gRPC code.
pub fn to_grpc_code(code: i32) -> Code {
    match code {
        200 => Code::Ok,
        400 => Code::InvalidArgument,
        401 => Code::Unauthenticated,
        403 => Code::PermissionDenied,
        404 => Code::NotFound,
        409 => Code::Aborted,
        429 => Code::ResourceExhausted,
        CLIENT_CLOSED => Code::Cancelled,
        500 => Code::Internal,
        501 => Code::Unimplemented,
        503 => Code::Unavailable,
        504 => Code::DeadlineExceeded,
        _ => Code::Unknown,
    }
}

/// Convert a gRPC code into an HTTP-like code.
pub fn from_grpc_code(code: Code) -> i32 {
    match code {
        Code::Ok => 200,
        Code::Cancelled => CLIENT_CLOSED,
        Code::Unknown => 500,
        Code::InvalidArgument => 400,
        Code::DeadlineExceeded => 504,
        Code::NotFound => 404,
        Code::AlreadyExists => 409,
        Code::PermissionDenied => 403,
        Code::Unauthenticated => 401,
        Code::ResourceExhausted => 429,
        Code::FailedPrecondition => 400,
        Code::Aborted => 409,
        Code::OutOfRange => 400,
        Code::Unimplemented => 501,
        Code::Internal => 500,
        Code::Unavailable => 503,
        Code::DataLoss => 500,
    }
}
