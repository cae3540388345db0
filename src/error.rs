use serde::Serialize;
use thiserror::Error;

use crate::syntax::SourceSpan;

/// An index (or partial index) was rejected by a constructor's validator,
/// or a type was requested through a route the indexing protocol forbids.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("type formation error: {message}")]
pub struct TypeFormationError {
    pub message: String,
}

impl TypeFormationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A function body failed analysis or synthesis, or a decoration was
/// attempted with a constructor/value combination the protocol disallows.
///
/// Carries the source location of the offending part of the body when the
/// hook knows it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("type error: {message}")]
pub struct TypeError {
    pub message: String,
    pub location: Option<SourceSpan>,
}

impl TypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Attach the span of the offending node.
    pub fn at(message: impl Into<String>, location: SourceSpan) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }

    pub(crate) fn not_implemented(tycon: &str, hook: &str) -> Self {
        Self::new(format!("{}: {} hook not implemented", tycon, hook))
    }
}

/// API misuse unrelated to checking a specific program, e.g. asking for
/// the constructor of a non-type binding or looking up an unresolved name
/// in a static environment.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("usage error: {message}")]
pub struct UsageError {
    pub message: String,
}

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything a decoration run can fail with. The pipeline never catches,
/// retries or downgrades; each variant propagates from the step that
/// detected it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum DecorateError {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Formation(#[from] TypeFormationError),
}

impl DecorateError {
    /// The location attached to the underlying type error, if any.
    pub fn location(&self) -> Option<&SourceSpan> {
        match self {
            DecorateError::Type(err) => err.location.as_ref(),
            DecorateError::Formation(_) => None,
        }
    }
}
