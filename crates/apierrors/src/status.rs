//! The plain status record carried by every [`Error`](crate::Error).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key/value metadata attached to an error.
///
/// Kept sorted so that rendered errors are stable across runs.
pub type Metadata = BTreeMap<String, String>;

/// Plain data describing an error: what kind it is and how to show it.
///
/// `code` and `reason` identify the kind of error. `message`, `metadata`
/// and `pretty` only describe a particular occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// HTTP-like status code.
    pub code: i32,
    /// Machine-readable reason, the registry key.
    #[serde(default)]
    pub reason: String,
    /// Human message for logs and API consumers.
    #[serde(default)]
    pub message: String,
    /// Arbitrary key/value pairs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// Display text for end users. Never sent over the wire.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pretty: String,
}

impl Status {
    pub fn new(
        code: i32,
        reason: impl Into<String>,
        message: impl Into<String>,
        pretty: impl Into<String>,
    ) -> Self {
        Self {
            code,
            reason: reason.into(),
            message: message.into(),
            metadata: Metadata::new(),
            pretty: pretty.into(),
        }
    }
}

/// Anything shaped like a [`Status`].
///
/// Implement this for generated protobuf messages (or any other transport
/// type) to convert them with [`Error::from_status_like`](crate::Error::from_status_like).
pub trait StatusLike {
    fn code(&self) -> i32;

    fn reason(&self) -> &str;

    fn message(&self) -> &str;

    fn metadata(&self) -> Metadata;

    fn pretty(&self) -> &str;
}

impl StatusLike for Status {
    fn code(&self) -> i32 {
        self.code
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn pretty(&self) -> &str {
        &self.pretty
    }
}

/// Renders metadata as `{k1: v1, k2: v2}` in key order.
pub(crate) struct DisplayMetadata<'a>(pub(crate) &'a Metadata);

impl fmt::Display for DisplayMetadata<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}
