use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::debug_trace;
use crate::error::UsageError;
use crate::ty::{IncompleteTy, Ty};
use crate::tycon::Tycon;

/// A value a name can resolve to during checking.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Ty(Ty),
    Incomplete(IncompleteTy),
    Tycon(Tycon),
    Str(String),
    Int(i64),
}

impl Binding {
    /// The originating family of a type-valued binding. Anything else is
    /// an API misuse by the calling hook.
    pub fn tycon_of(&self) -> Result<&Tycon, UsageError> {
        match self {
            Binding::Ty(ty) => Ok(ty.tycon()),
            Binding::Incomplete(inc) => Ok(inc.tycon()),
            other => Err(UsageError::new(format!(
                "tycon_of: expected a type or incomplete type, got {:?}",
                other
            ))),
        }
    }

    pub fn as_ty(&self) -> Option<&Ty> {
        match self {
            Binding::Ty(ty) => Some(ty),
            _ => None,
        }
    }
}

/// Live shared global bindings of a defining module. Mutations through
/// any handle are visible to every environment holding it.
pub type Globals = Rc<RefCell<HashMap<String, Binding>>>;

/// Build a globals handle from an iterator of name/binding pairs.
pub fn globals<I: IntoIterator<Item = (String, Binding)>>(iter: I) -> Globals {
    Rc::new(RefCell::new(iter.into_iter().collect()))
}

/// Snapshot of a function's captured lexical bindings plus a live
/// reference to its module's globals.
///
/// The closure tier is frozen at capture time; the globals tier is shared
/// and read through at every lookup. Hooks are expected to treat globals
/// as read-only during checking.
#[derive(Debug, Clone)]
pub struct StaticEnv {
    closure: HashMap<String, Binding>,
    globals: Globals,
}

impl StaticEnv {
    pub fn capture(closure: HashMap<String, Binding>, globals: Globals) -> Self {
        Self { closure, globals }
    }

    /// Look up a name: closure bindings first, then globals. An
    /// unresolved name is a usage error, not a type error.
    pub fn lookup(&self, name: &str) -> Result<Binding, UsageError> {
        if let Some(binding) = self.closure.get(name) {
            debug_trace!("env", "'{}' resolved in closure tier", name);
            return Ok(binding.clone());
        }
        if let Some(binding) = self.globals.borrow().get(name) {
            debug_trace!("env", "'{}' resolved in globals tier", name);
            return Ok(binding.clone());
        }
        Err(UsageError::new(format!(
            "unresolved name '{}' in static environment",
            name
        )))
    }

    pub fn closure(&self) -> &HashMap<String, Binding> {
        &self.closure
    }

    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Dump both tiers (closure first) suitable for TRACE level
    pub fn dump(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        let _ = writeln!(out, "closure {{");
        if self.closure.is_empty() {
            let _ = writeln!(out, "  <empty>");
        } else {
            for (k, v) in self.closure.iter() {
                let _ = writeln!(out, "  {} : {:?}", k, v);
            }
        }
        let _ = writeln!(out, "}}");
        let _ = writeln!(out, "globals {{");
        let globals = self.globals.borrow();
        if globals.is_empty() {
            let _ = writeln!(out, "  <empty>");
        } else {
            for (k, v) in globals.iter() {
                let _ = writeln!(out, "  {} : {:?}", k, v);
            }
        }
        let _ = writeln!(out, "}}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings;

    #[test]
    fn test_closure_shadows_globals() {
        let globals = globals(bindings! { "x" => Binding::Int(1) });
        let env = StaticEnv::capture(bindings! { "x" => Binding::Int(2) }, globals);
        assert_eq!(env.lookup("x").unwrap(), Binding::Int(2));
    }

    #[test]
    fn test_globals_are_live() {
        let shared = globals(bindings! {});
        let env = StaticEnv::capture(bindings! {}, shared.clone());
        assert!(env.lookup("later").is_err());

        // a module-level rebind after capture is visible through the env
        shared
            .borrow_mut()
            .insert("later".to_string(), Binding::Str("here".to_string()));
        assert_eq!(
            env.lookup("later").unwrap(),
            Binding::Str("here".to_string())
        );
    }

    #[test]
    fn test_unresolved_name_is_usage_error() {
        let env = StaticEnv::capture(bindings! {}, globals(bindings! {}));
        let err = env.lookup("missing").unwrap_err();
        assert!(err.message.contains("missing"));
    }
}
