use serde::Serialize;
use std::fmt;

use crate::error::TypeFormationError;
use crate::index::Index;
use crate::tycon::Tycon;

/// A complete, validated type instance.
///
/// A `Ty` exists only through the indexing protocol (or through the
/// pipeline's synthesis branch, which re-enters full validation); there
/// is deliberately no public constructor, so an unvalidated instance
/// cannot be formed. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct Ty {
    tycon: Tycon,
    idx: Index,
}

impl Ty {
    pub(crate) fn formed(tycon: Tycon, idx: Index) -> Self {
        debug_assert!(idx.is_complete());
        Self { tycon, idx }
    }

    /// The originating family.
    pub fn tycon(&self) -> &Tycon {
        &self.tycon
    }

    pub fn idx(&self) -> &Index {
        &self.idx
    }
}

// Equal iff same family identity and structurally equal index
impl PartialEq for Ty {
    fn eq(&self, other: &Self) -> bool {
        self.tycon == other.tycon && self.idx == other.idx
    }
}

impl Eq for Ty {}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tycon.name(), self.idx)
    }
}

/// A partially applied type: its index contains at least one hole and
/// awaits synthesis at decoration time. Never compares equal to a `Ty`.
#[derive(Debug, Clone, Serialize)]
pub struct IncompleteTy {
    tycon: Tycon,
    idx: Index,
}

impl IncompleteTy {
    pub(crate) fn formed(tycon: Tycon, idx: Index) -> Self {
        debug_assert!(!idx.is_complete());
        Self { tycon, idx }
    }

    /// The originating family.
    pub fn tycon(&self) -> &Tycon {
        &self.tycon
    }

    pub fn idx(&self) -> &Index {
        &self.idx
    }
}

impl PartialEq for IncompleteTy {
    fn eq(&self, other: &Self) -> bool {
        self.tycon == other.tycon && self.idx == other.idx
    }
}

impl Eq for IncompleteTy {}

impl fmt::Display for IncompleteTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tycon.name(), self.idx)
    }
}

/// Result of evaluating an index expression. The completeness decision
/// lives in the type system: a complete and an incomplete application are
/// different variants and never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Indexed {
    Complete(Ty),
    Incomplete(IncompleteTy),
}

impl Indexed {
    /// The originating family, whichever variant this is.
    pub fn tycon(&self) -> &Tycon {
        match self {
            Indexed::Complete(ty) => ty.tycon(),
            Indexed::Incomplete(inc) => inc.tycon(),
        }
    }

    pub fn idx(&self) -> &Index {
        match self {
            Indexed::Complete(ty) => ty.idx(),
            Indexed::Incomplete(inc) => inc.idx(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Indexed::Complete(_))
    }

    pub fn as_complete(&self) -> Option<&Ty> {
        match self {
            Indexed::Complete(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_incomplete(&self) -> Option<&IncompleteTy> {
        match self {
            Indexed::Incomplete(inc) => Some(inc),
            _ => None,
        }
    }

    /// Require the complete variant, failing where a plain type was
    /// syntactically expected.
    pub fn into_complete(self) -> Result<Ty, TypeFormationError> {
        match self {
            Indexed::Complete(ty) => Ok(ty),
            Indexed::Incomplete(inc) => Err(TypeFormationError::new(format!(
                "{} is incomplete where a complete type was expected",
                inc
            ))),
        }
    }
}

impl fmt::Display for Indexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indexed::Complete(ty) => write!(f, "{}", ty),
            Indexed::Incomplete(inc) => write!(f, "{}", inc),
        }
    }
}
