pub mod debug;
pub mod decorate;
pub mod env;
pub mod error;
pub mod index;
pub mod reflect;
pub mod syntax;
pub mod ty;
pub mod tycon;

#[macro_use]
mod utils;

#[cfg(test)]
mod tests;

pub use decorate::{Stage, TypedFn};
pub use env::{Binding, Globals, StaticEnv};
pub use error::{DecorateError, TypeError, TypeFormationError, UsageError};
pub use index::Index;
pub use reflect::{Reflected, ReflectedFn};
pub use syntax::{Branch, Leaf, SourceSpan, SyntaxNode};
pub use ty::{IncompleteTy, Indexed, Ty};
pub use tycon::{index, Tycon, TypeConstructor};

// Re-export debug helpers at crate level
pub use debug::*;
