use std::collections::HashMap;

use crate::env::{Binding, Globals};
use crate::syntax::SyntaxNode;

/// Reflection boundary: given a function value, produce the tree-shaped
/// syntax of its body and the two flat name->value maps (closure snapshot
/// and live module globals).
///
/// How these are obtained (parsing source, introspecting closures) is
/// the caller's concern; this crate only consumes the result. The methods
/// are assumed total for any syntactically valid function value.
pub trait Reflected {
    fn syntax_tree(&self) -> SyntaxNode;
    fn closure_bindings(&self) -> HashMap<String, Binding>;
    fn global_bindings(&self) -> Globals;
}

/// Plain-record adapter for callers that already hold all three parts.
#[derive(Debug, Clone)]
pub struct ReflectedFn {
    pub tree: SyntaxNode,
    pub closure: HashMap<String, Binding>,
    pub globals: Globals,
}

impl ReflectedFn {
    /// A function capturing nothing, in a module with no globals.
    pub fn new(tree: SyntaxNode) -> Self {
        Self {
            tree,
            closure: HashMap::new(),
            globals: crate::env::globals(Vec::new()),
        }
    }

    pub fn with_closure(mut self, closure: HashMap<String, Binding>) -> Self {
        self.closure = closure;
        self
    }

    pub fn with_globals(mut self, globals: Globals) -> Self {
        self.globals = globals;
        self
    }
}

impl Reflected for ReflectedFn {
    fn syntax_tree(&self) -> SyntaxNode {
        self.tree.clone()
    }

    fn closure_bindings(&self) -> HashMap<String, Binding> {
        self.closure.clone()
    }

    fn global_bindings(&self) -> Globals {
        self.globals.clone()
    }
}
