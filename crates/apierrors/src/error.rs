//! The structured error value.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::chain;
use crate::stack::Stack;
use crate::status::{DisplayMetadata, Metadata, Status, StatusLike};

/// Boxed error accepted as a cause or as input to conversions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub(crate) type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// A classified, chainable error that converts to and from a gRPC status.
///
/// Every `with_*` method leaves `self` untouched and returns a modified
/// copy, so a canonical error can be used as a template from many call
/// sites:
///
/// ```rust
/// use apierrors::Error;
///
/// let user_not_found = Error::new(404, "USER_NOT_FOUND", "user not found", "User not found");
/// let err = user_not_found
///     .with_message("user 42 not found")
///     .with_metadata_entry("user_id", "42");
///
/// assert!(user_not_found.is(&err));
/// assert_eq!(user_not_found.message(), "user not found");
/// ```
#[derive(Clone)]
pub struct Error {
    status: Status,
    cause: Option<SharedError>,
    stack: Option<Stack>,
}

impl Error {
    /// Create an error without cause, stack or metadata.
    pub fn new(
        code: i32,
        reason: impl Into<String>,
        message: impl Into<String>,
        pretty: impl Into<String>,
    ) -> Self {
        Self::from_status(Status::new(code, reason, message, pretty))
    }

    pub fn from_status(status: Status) -> Self {
        Self {
            status,
            cause: None,
            stack: None,
        }
    }

    /// Copy a status-shaped value. No stack is attached.
    pub fn from_status_like(status: &impl StatusLike) -> Self {
        Self::from_status(Status {
            code: status.code(),
            reason: status.reason().to_string(),
            message: status.message().to_string(),
            metadata: status.metadata(),
            pretty: status.pretty().to_string(),
        })
    }

    /// Same as [`Error::from_status_like`], then attach a stack.
    pub fn from_status_like_with_stack(status: &impl StatusLike) -> Self {
        let mut err = Self::from_status_like(status);
        err.stack = Some(Stack::capture());
        err
    }

    pub fn code(&self) -> i32 {
        self.status.code
    }

    pub fn reason(&self) -> &str {
        &self.status.reason
    }

    pub fn message(&self) -> &str {
        &self.status.message
    }

    pub fn pretty(&self) -> &str {
        &self.status.pretty
    }

    pub fn metadata(&self) -> &Metadata {
        &self.status.metadata
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn into_status(self) -> Status {
        self.status
    }

    /// The underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The stack attached to this error, if any.
    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    /// Set the underlying cause.
    ///
    /// A stack is captured here unless this error already has one or the
    /// cause chain holds an [`Error`] that does. In both cases the existing
    /// stack already points at the failure.
    pub fn with_cause(&self, cause: impl Into<BoxError>) -> Self {
        self.attach_cause(Arc::from(cause.into()))
    }

    pub(crate) fn attach_cause(&self, cause: SharedError) -> Self {
        let mut err = self.clone();
        if err.stack.is_none() && !carries_stack(&*cause) {
            err.stack = Some(Stack::capture());
        }
        err.cause = Some(cause);
        err
    }

    /// Attach a stack captured at the caller.
    ///
    /// Does nothing when a stack is already attached.
    pub fn with_stack(&self) -> Self {
        let mut err = self.clone();
        if err.stack.is_none() {
            err.stack = Some(Stack::capture());
        }
        err
    }

    pub fn with_message(&self, message: impl Into<String>) -> Self {
        let mut err = self.clone();
        err.status.message = message.into();
        err
    }

    /// Replace the metadata.
    pub fn with_metadata<I, K, V>(&self, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut err = self.clone();
        err.status.metadata = metadata
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        err
    }

    /// Insert a single metadata entry, keeping the others.
    pub fn with_metadata_entry(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut err = self.clone();
        err.status.metadata.insert(key.into(), value.into());
        err
    }

    pub fn with_pretty(&self, pretty: impl Into<String>) -> Self {
        let mut err = self.clone();
        err.status.pretty = pretty.into();
        err
    }

    /// Append formatted text after the current message.
    ///
    /// `err.with_append(format_args!("id={}", 7))` turns `"load failed"`
    /// into `"load failed. id=7"`.
    pub fn with_append(&self, args: fmt::Arguments<'_>) -> Self {
        let message = format!("{}. {}", self.status.message, args);
        self.with_message(message)
    }

    /// Put formatted text in front of the current message.
    ///
    /// `err.with_tail(format_args!("retry {}", 3))` turns `"load failed"`
    /// into `"retry 3. err=load failed"`.
    pub fn with_tail(&self, args: fmt::Arguments<'_>) -> Self {
        let message = format!("{}. err={}", args, self.status.message);
        self.with_message(message)
    }

    /// Whether `err` or anything in its cause chain is an [`Error`] of the
    /// same kind (same code and reason) as `self`.
    pub fn is(&self, err: &(dyn StdError + 'static)) -> bool {
        chain::iter(err)
            .filter_map(|e| e.downcast_ref::<Error>())
            .any(|e| self.is_same_kind(e))
    }

    /// Compare code and reason only.
    pub fn is_same_kind(&self, other: &Error) -> bool {
        self.status.code == other.status.code && self.status.reason == other.status.reason
    }

    /// Plain rendering followed by every stack found along the chain.
    pub fn to_verbose_string(&self) -> String {
        format!("{self:#}")
    }

    /// Plain rendering as a quoted string literal.
    pub fn to_quoted_string(&self) -> String {
        format!("{:?}", self.to_string())
    }
}

fn carries_stack(err: &(dyn StdError + 'static)) -> bool {
    chain::iter(err)
        .filter_map(|e| e.downcast_ref::<Error>())
        .any(|e| e.stack.is_some())
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code={},reason={},message={},metadata={}",
            self.status.code,
            self.status.reason,
            self.status.message,
            DisplayMetadata(&self.status.metadata)
        )?;

        if let Some(cause) = &self.cause {
            write!(f, ",cause={}", cause)?;
        }

        if f.alternate() {
            for err in chain::iter(self) {
                if let Some(err) = err.downcast_ref::<Error>()
                    && let Some(stack) = &err.stack
                {
                    write!(f, "\n\nstack ({}):\n{}", err.status.reason, stack)?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.status.code, self.status.reason)?;

        if !self.status.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.status.message)?;
        }

        if !self.status.pretty.is_empty() {
            writeln!(f, "    Pretty: {}", self.status.pretty)?;
        }

        if !self.status.metadata.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Metadata:")?;
            for (key, value) in &self.status.metadata {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Cause: {:?}", cause)?;
        }

        if let Some(stack) = &self.stack {
            writeln!(f)?;
            writeln!(f, "    Stack: {}", stack)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl StatusLike for Error {
    fn code(&self) -> i32 {
        self.status.code
    }

    fn reason(&self) -> &str {
        &self.status.reason
    }

    fn message(&self) -> &str {
        &self.status.message
    }

    fn metadata(&self) -> Metadata {
        self.status.metadata.clone()
    }

    fn pretty(&self) -> &str {
        &self.status.pretty
    }
}
