//! Decoration pipeline
//!
//! A `Ty` or `IncompleteTy` applied to a function value runs
//! `Unapplied -> Reflecting -> Checking -> Bound | Rejected`. Analysis
//! (complete type) and synthesis (incomplete type) are the two checking
//! branches; a successful run yields the `TypedFn` wrapper and a failed
//! one leaves no artifact behind.

use std::fmt;

use crate::debug::DebugUtils;
use crate::env::StaticEnv;
use crate::error::{DecorateError, TypeError, TypeFormationError};
use crate::reflect::Reflected;
use crate::syntax::SyntaxNode;
use crate::ty::{IncompleteTy, Indexed, Ty};
use crate::{debug_debug, debug_info, debug_trace};

/// Pipeline stages, named for trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unapplied,
    Reflecting,
    Checking,
    Bound,
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Unapplied => write!(f, "unapplied"),
            Stage::Reflecting => write!(f, "reflecting"),
            Stage::Checking => write!(f, "checking"),
            Stage::Bound => write!(f, "bound"),
            Stage::Rejected => write!(f, "rejected"),
        }
    }
}

/// A decorated function: body tree, captured environment and resolved
/// type. Created only by a successful pipeline run; immutable after.
#[derive(Debug, Clone)]
pub struct TypedFn {
    tree: SyntaxNode,
    env: StaticEnv,
    ty: Ty,
}

impl TypedFn {
    fn bound(tree: SyntaxNode, env: StaticEnv, ty: Ty) -> Self {
        debug_info!("decorate", "{} {} for {}", Stage::Bound, ty, DebugUtils::node_summary(&tree));
        Self { tree, env, ty }
    }

    pub fn tree(&self) -> &SyntaxNode {
        &self.tree
    }

    pub fn env(&self) -> &StaticEnv {
        &self.env
    }

    /// The resolved type; shared, since the same `Ty` value may be
    /// reused across many functions.
    pub fn ty(&self) -> &Ty {
        &self.ty
    }
}

impl fmt::Display for TypedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn : {}", self.ty)
    }
}

// Entry guard shared by both branches: only function-shaped families may
// decorate, and the check happens before any reflection.
fn reject_non_fn(tycon_name: &str, is_fn: bool, form: &str) -> Result<(), DecorateError> {
    if is_fn {
        return Ok(());
    }
    debug_info!(
        "decorate",
        "{}: {} is not function-shaped ({} form)",
        Stage::Rejected,
        tycon_name,
        form
    );
    Err(TypeError::new(format!(
        "{} is not a function type constructor and cannot decorate a function",
        tycon_name
    ))
    .into())
}

fn reflect(f: &dyn Reflected) -> (SyntaxNode, StaticEnv) {
    debug_debug!("decorate", "{}", Stage::Reflecting);
    let tree = f.syntax_tree();
    let env = StaticEnv::capture(f.closure_bindings(), f.global_bindings());
    debug_trace!("decorate", "captured environment:\n{}", env.dump());
    (tree, env)
}

impl Ty {
    /// Decorate a function with an already-complete type: the analysis
    /// branch. The hook either accepts the body or raises a `TypeError`
    /// carrying a message and the offending location; on acceptance the
    /// wrapper is bound with this type as-is.
    pub fn decorate(&self, f: &dyn Reflected) -> Result<TypedFn, DecorateError> {
        debug_debug!("decorate", "{} {} (analysis)", Stage::Unapplied, self);
        reject_non_fn(self.tycon().name(), self.tycon().is_fn(), "complete")?;
        let (tree, env) = reflect(f);
        debug_debug!("decorate", "{} ana against {}", Stage::Checking, self);
        self.tycon().ana(&tree, &env)?;
        Ok(TypedFn::bound(tree, env, self.clone()))
    }
}

impl IncompleteTy {
    /// Decorate a function with a partially applied type: the synthesis
    /// branch. The hook must return a complete index, which is then
    /// passed back through the family's full-index validation; the hook
    /// is not trusted to enforce the structural invariants itself.
    pub fn decorate(&self, f: &dyn Reflected) -> Result<TypedFn, DecorateError> {
        debug_debug!("decorate", "{} {} (synthesis)", Stage::Unapplied, self);
        reject_non_fn(self.tycon().name(), self.tycon().is_fn(), "incomplete")?;
        let (tree, env) = reflect(f);
        debug_debug!("decorate", "{} syn for {}", Stage::Checking, self);
        let idx = self.tycon().syn(&tree, &env)?;
        if !idx.is_complete() {
            return Err(TypeFormationError::new(format!(
                "synthesis for {} returned an incomplete index {}",
                self.tycon().name(),
                idx
            ))
            .into());
        }
        // second gate: synthesized indices go through the same validator
        // as explicitly written ones
        self.tycon().validate(&idx)?;
        let ty = Ty::formed(self.tycon().clone(), idx);
        Ok(TypedFn::bound(tree, env, ty))
    }
}

impl Indexed {
    /// Apply whichever form this is to a function value.
    pub fn decorate(&self, f: &dyn Reflected) -> Result<TypedFn, DecorateError> {
        match self {
            Indexed::Complete(ty) => ty.decorate(f),
            Indexed::Incomplete(inc) => inc.decorate(f),
        }
    }
}
