use alloc::string::String;

use ogs_codec::CodecError;
use thiserror::Error;

/// Failure while encoding or decoding an object graph.
///
/// Errors are fatal for the call that produced them: partial output is not
/// rolled back, and a partially decoded graph is dropped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerialError {
    /// The type cannot be described, for example an opaque type without a
    /// registered surrogate.
    #[error("cannot describe `{type_path}`: {reason}")]
    UnsupportedTypeKind {
        type_path: String,
        reason: &'static str,
    },
    /// No binding strategy accepted a schema read from the stream.
    #[error("cannot bind schema `{name}`: {reason}")]
    UnboundType { name: String, reason: &'static str },
    #[error("corrupt stream: {reason}")]
    CorruptStream { reason: String },
    /// A wire member has no counterpart in the target type and the
    /// configuration forbids dropping it.
    #[error("`{type_path}` has no member `{member}`")]
    MissingMember { type_path: String, member: String },
    /// A decoded value does not fit the slot it is read into.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("object graph nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl SerialError {
    #[inline]
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptStream {
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    #[inline]
    pub(crate) fn unsupported(type_path: impl Into<String>, reason: &'static str) -> Self {
        Self::UnsupportedTypeKind {
            type_path: type_path.into(),
            reason,
        }
    }

    #[inline]
    pub(crate) fn unbound(name: impl Into<String>, reason: &'static str) -> Self {
        Self::UnboundType {
            name: name.into(),
            reason,
        }
    }
}
