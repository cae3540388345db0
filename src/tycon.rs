use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::debug_debug;
use crate::env::StaticEnv;
use crate::error::{TypeError, TypeFormationError};
use crate::index::Index;
use crate::syntax::SyntaxNode;
use crate::ty::{IncompleteTy, Indexed, Ty};

/// Capability bundle implemented by each concrete type family.
///
/// A family defines its own index semantics through `validate` /
/// `validate_partial`, and (for function-shaped families) how a function
/// body is checked against an index (`ana`) or how an index is inferred
/// from a body (`syn`). Families supporting only one decoration form
/// simply leave the unused hook at its default.
pub trait TypeConstructor {
    /// Family name used in diagnostics and serialized output.
    fn name(&self) -> &str;

    /// Validate a complete index. The default accepts anything.
    fn validate(&self, idx: &Index) -> Result<(), TypeFormationError> {
        let _ = idx;
        Ok(())
    }

    /// Validate a partial index (one containing at least one hole).
    /// The default accepts anything.
    fn validate_partial(&self, idx: &Index) -> Result<(), TypeFormationError> {
        let _ = idx;
        Ok(())
    }

    /// Whether this family describes function-shaped types. Only
    /// function-shaped families may decorate a function.
    fn is_fn(&self) -> bool {
        false
    }

    /// Analysis hook: check a body against an already-known index.
    /// Returning `Ok(())` accepts the body.
    fn ana(&self, tree: &SyntaxNode, env: &StaticEnv) -> Result<(), TypeError> {
        let _ = (tree, env);
        Err(TypeError::not_implemented(self.name(), "analysis"))
    }

    /// Synthesis hook: produce a complete index from a body. The result
    /// is re-validated by the pipeline before a type is formed.
    fn syn(&self, tree: &SyntaxNode, env: &StaticEnv) -> Result<Index, TypeError> {
        let _ = (tree, env);
        Err(TypeError::not_implemented(self.name(), "synthesis"))
    }
}

/// Shared handle to a type family. The identity of the handle is the
/// identity of the family: clones of a `Tycon` compare equal, while two
/// separately built constructors never do, even when their names and
/// index semantics coincide.
#[derive(Clone)]
pub struct Tycon(Arc<dyn TypeConstructor>);

impl Tycon {
    pub fn new(constructor: impl TypeConstructor + 'static) -> Self {
        Self(Arc::new(constructor))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn is_fn(&self) -> bool {
        self.0.is_fn()
    }

    /// Evaluate an index expression against this family.
    pub fn index(&self, idx: Index) -> Result<Indexed, TypeFormationError> {
        index(self, idx)
    }

    /// Evaluate an index expression that is required to be complete.
    pub fn ty(&self, idx: Index) -> Result<Ty, TypeFormationError> {
        self.index(idx)?.into_complete()
    }

    pub fn validate(&self, idx: &Index) -> Result<(), TypeFormationError> {
        self.0.validate(idx)
    }

    pub fn validate_partial(&self, idx: &Index) -> Result<(), TypeFormationError> {
        self.0.validate_partial(idx)
    }

    pub fn ana(&self, tree: &SyntaxNode, env: &StaticEnv) -> Result<(), TypeError> {
        self.0.ana(tree, env)
    }

    pub fn syn(&self, tree: &SyntaxNode, env: &StaticEnv) -> Result<Index, TypeError> {
        self.0.syn(tree, env)
    }
}

impl PartialEq for Tycon {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Tycon {}

impl fmt::Debug for Tycon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tycon({})", self.name())
    }
}

impl fmt::Display for Tycon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Identity is not serializable; the name is a one-way label
impl Serialize for Tycon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Evaluate an index expression against a family, deciding completeness.
///
/// An incomplete index (one containing a hole anywhere) goes through
/// `validate_partial` and yields an `Indexed::Incomplete`; a complete one
/// goes through `validate` and yields an `Indexed::Complete`. On a
/// validator failure no object is produced. This is the only route by
/// which a `Ty` comes into existence, which is what keeps "every `Ty`
/// passed its validator" true.
pub fn index(tycon: &Tycon, idx: Index) -> Result<Indexed, TypeFormationError> {
    if idx.is_complete() {
        debug_debug!("index", "{}[{}] complete path", tycon.name(), idx);
        tycon.validate(&idx)?;
        Ok(Indexed::Complete(Ty::formed(tycon.clone(), idx)))
    } else {
        debug_debug!(
            "index",
            "{}[{}] incomplete path ({} holes)",
            tycon.name(),
            idx,
            idx.hole_count()
        );
        tycon.validate_partial(&idx)?;
        Ok(Indexed::Incomplete(IncompleteTy::formed(tycon.clone(), idx)))
    }
}
