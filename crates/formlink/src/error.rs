use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use param_tree::TreeError;
use param_xml::CodecError;
use thiserror::Error;

/// Error type produced by the invocation contract and the form handlers.
///
/// Every variant is fatal: both ends of the protocol ship together, so any
/// of these means they are out of sync.
#[derive(Debug, Error)]
pub enum FormError {
    /// A mandatory attribute or child was missing from a tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// A document could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The dialog was launched with the wrong number of arguments.
    #[error(
        "expected exactly {expected} arguments (form, request path, response path, \
         build hash, build kind), got {found}"
    )]
    ArgumentCountMismatch { expected: usize, found: usize },
    /// Host and dialog binaries were built from different sources or configurations.
    #[error("{field} mismatch: dialog is '{actual}', host expects '{expected}'")]
    HandshakeMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },
    #[error("form type '{0}' is not defined")]
    UnknownFormType(String),
    /// The response discriminator holds a value outside the closed set.
    #[error("unknown form result '{0}'")]
    UnknownResult(String),
    #[error("attribute '{key}' has invalid {kind} '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        kind: &'static str,
    },
    /// The frontend chose an outcome the request does not offer.
    #[error("invalid {form} decision: {reason}")]
    InvalidDecision { form: &'static str, reason: String },
    #[error("request file {} does not exist", .0.display())]
    RequestMissing(PathBuf),
    /// The dialog exited without leaving a response file behind.
    #[error("dialog wrote no response file at {}", .0.display())]
    ResponseMissing(PathBuf),
    #[error("dialog did not exit within {0:?}")]
    Timeout(Duration),
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("frontend: {0}")]
    Frontend(String),
}

impl FormError {
    pub(crate) fn io(context: &'static str, path: &Path, source: io::Error) -> Self {
        FormError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn decision<S: Into<String>>(form: &'static str, reason: S) -> Self {
        FormError::InvalidDecision {
            form,
            reason: reason.into(),
        }
    }

    /// Build a frontend failure from any displayable error.
    pub fn frontend<E: std::fmt::Display>(err: E) -> Self {
        FormError::Frontend(err.to_string())
    }
}
