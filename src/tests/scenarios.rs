use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::utils::*;
use crate::bindings;
use crate::env::{globals, Binding, Globals, StaticEnv};
use crate::error::{DecorateError, TypeError, TypeFormationError};
use crate::index::Index;
use crate::reflect::{Reflected, ReflectedFn};
use crate::syntax::{SourceSpan, SyntaxNode};
use crate::ty::Indexed;
use crate::tycon::{index, Tycon, TypeConstructor};

// ---------------------------------------------------------------------------
// Indexing protocol & equality
// ---------------------------------------------------------------------------

#[test]
fn test_unit_construction() {
    let unit_ = unit_();
    let unit = unit_.index(Index::unit()).unwrap();
    assert!(unit.is_complete());
    assert_eq!(unit.tycon(), &unit_);
    assert_eq!(unit.idx(), &Index::unit());
}

#[test]
fn test_unit_construction_bad_idx() {
    let unit_ = unit_();
    let err = unit_.index(Index::seq([Index::Int(0)])).unwrap_err();
    assert!(err.message.contains("()"));
}

#[test]
fn test_unit_eq() {
    let unit_ = unit_();
    let a = unit_.index(Index::unit()).unwrap();
    let b = unit_.index(Index::unit()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, a);
}

#[test]
fn test_eq_iff_idx_structurally_equal() {
    let t = opaque("t_");
    let a = t.index(Index::seq([Index::atom("int")])).unwrap();
    let b = t.index(Index::seq([Index::atom("int")])).unwrap();
    let c = t.index(Index::seq([Index::atom("bool")])).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_ne!(a, c);
}

#[test]
fn test_distinct_tycons_never_equal() {
    // same name, same index semantics, still two different families
    let a_ = opaque("a_");
    let b_ = opaque("b_");
    let a = a_.index(Index::unit()).unwrap();
    let b = b_.index(Index::unit()).unwrap();
    assert_ne!(a, b);
    assert_ne!(a_, b_);
}

#[test]
fn test_tycon_clone_is_same_family() {
    let a_ = opaque("a_");
    let alias = a_.clone();
    assert_eq!(a_, alias);
    assert_eq!(
        a_.index(Index::unit()).unwrap(),
        alias.index(Index::unit()).unwrap()
    );
}

#[test]
fn test_hole_always_yields_incomplete() {
    // unit_'s complete-path validator would reject anything but (); a
    // hole bypasses it entirely and takes the partial path
    let unit_ = unit_();
    let inc = unit_.index(Index::Hole).unwrap();
    assert!(!inc.is_complete());
    assert!(inc.as_incomplete().is_some());
}

#[test]
fn test_incomplete_never_equals_complete() {
    let t = opaque("t_");
    let complete = t.index(Index::unit()).unwrap();
    let incomplete = t.index(Index::seq([Index::Hole])).unwrap();
    assert_ne!(complete, incomplete);
}

#[test]
fn test_partial_validator_can_reject() {
    struct NoPartial;
    impl TypeConstructor for NoPartial {
        fn name(&self) -> &str {
            "nopartial_"
        }
        fn validate_partial(&self, _idx: &Index) -> Result<(), TypeFormationError> {
            Err(TypeFormationError::new("nopartial_ has no literal forms"))
        }
    }
    let t = Tycon::new(NoPartial);
    assert!(t.index(Index::unit()).is_ok());
    assert!(t.index(Index::Hole).is_err());
}

#[test]
fn test_into_complete_rejects_partial_application() {
    let t = opaque("t_");
    let err = t.ty(Index::seq([Index::Hole])).unwrap_err();
    assert!(err.message.contains("incomplete"));
}

#[test]
fn test_free_index_fn_matches_method() {
    let t = opaque("t_");
    let via_fn = index(&t, Index::atom("x")).unwrap();
    let via_method = t.index(Index::atom("x")).unwrap();
    assert_eq!(via_fn, via_method);
}

// ---------------------------------------------------------------------------
// Decoration pipeline
// ---------------------------------------------------------------------------

/// Function-shaped family whose hooks count their invocations.
struct CountingFn {
    ana_calls: Rc<Cell<usize>>,
    syn_calls: Rc<Cell<usize>>,
    ana_result: Result<(), TypeError>,
    syn_result: Result<Index, TypeError>,
    validate_rejects: bool,
}

impl CountingFn {
    fn accepting() -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let ana_calls = Rc::new(Cell::new(0));
        let syn_calls = Rc::new(Cell::new(0));
        let tycon = Self {
            ana_calls: ana_calls.clone(),
            syn_calls: syn_calls.clone(),
            ana_result: Ok(()),
            syn_result: Ok(Index::seq([Index::atom("int"), Index::atom("int")])),
            validate_rejects: false,
        };
        (tycon, ana_calls, syn_calls)
    }
}

impl TypeConstructor for CountingFn {
    fn name(&self) -> &str {
        "fn_"
    }

    fn is_fn(&self) -> bool {
        true
    }

    fn validate(&self, idx: &Index) -> Result<(), TypeFormationError> {
        if self.validate_rejects {
            return Err(TypeFormationError::new(format!(
                "fn_ rejects index {}",
                idx
            )));
        }
        Ok(())
    }

    fn ana(&self, _tree: &SyntaxNode, _env: &StaticEnv) -> Result<(), TypeError> {
        self.ana_calls.set(self.ana_calls.get() + 1);
        self.ana_result.clone()
    }

    fn syn(&self, _tree: &SyntaxNode, _env: &StaticEnv) -> Result<Index, TypeError> {
        self.syn_calls.set(self.syn_calls.get() + 1);
        self.syn_result.clone()
    }
}

fn body() -> SyntaxNode {
    load_body("(B body (B return (L \"x\")))")
}

#[test]
fn test_analysis_invoked_exactly_once() {
    let (tycon, ana_calls, syn_calls) = CountingFn::accepting();
    let fn_ = Tycon::new(tycon);
    let ty = fn_.ty(Index::seq([Index::atom("int")])).unwrap();

    let decorated = ty.decorate(&ReflectedFn::new(body())).unwrap();
    assert_eq!(ana_calls.get(), 1);
    assert_eq!(syn_calls.get(), 0);
    assert_eq!(decorated.ty(), &ty);
    assert!(decorated.tree().syneq(&body()));
}

#[test]
fn test_analysis_failure_propagates_with_location() {
    let span = SourceSpan::new(3, 7);
    let (mut tycon, ana_calls, _) = CountingFn::accepting();
    tycon.ana_result = Err(TypeError::at("body does not have type fn_[(int)]", span.clone()));
    let fn_ = Tycon::new(tycon);
    let ty = fn_.ty(Index::seq([Index::atom("int")])).unwrap();

    let err = ty.decorate(&ReflectedFn::new(body())).unwrap_err();
    assert_eq!(ana_calls.get(), 1);
    match err {
        DecorateError::Type(type_err) => {
            assert_eq!(type_err.location, Some(span));
        }
        other => panic!("expected a type error, got {:?}", other),
    }
}

#[test]
fn test_synthesis_invoked_exactly_once() {
    let (tycon, ana_calls, syn_calls) = CountingFn::accepting();
    let fn_ = Tycon::new(tycon);
    let inc = match fn_.index(Index::Hole).unwrap() {
        Indexed::Incomplete(inc) => inc,
        other => panic!("expected incomplete, got {:?}", other),
    };

    let decorated = inc.decorate(&ReflectedFn::new(body())).unwrap();
    assert_eq!(syn_calls.get(), 1);
    assert_eq!(ana_calls.get(), 0);

    // synthesized type equals the explicitly indexed one
    let expected = fn_
        .ty(Index::seq([Index::atom("int"), Index::atom("int")]))
        .unwrap();
    assert_eq!(decorated.ty(), &expected);
}

#[test]
fn test_synthesized_index_is_revalidated() {
    let (mut tycon, _, syn_calls) = CountingFn::accepting();
    tycon.validate_rejects = true;
    let fn_ = Tycon::new(tycon);
    // partial path does not hit the rejecting complete-path validator
    let inc = fn_.index(Index::Hole).unwrap();

    let err = inc.decorate(&ReflectedFn::new(body())).unwrap_err();
    assert_eq!(syn_calls.get(), 1);
    assert!(matches!(err, DecorateError::Formation(_)));
}

#[test]
fn test_synthesis_must_return_complete_index() {
    let (mut tycon, _, _) = CountingFn::accepting();
    tycon.syn_result = Ok(Index::seq([Index::atom("int"), Index::Hole]));
    let fn_ = Tycon::new(tycon);
    let inc = fn_.index(Index::Hole).unwrap();

    let err = inc.decorate(&ReflectedFn::new(body())).unwrap_err();
    match err {
        DecorateError::Formation(formation) => {
            assert!(formation.message.contains("incomplete"));
        }
        other => panic!("expected a formation error, got {:?}", other),
    }
}

/// Adapter that counts reflection requests.
struct CountingReflect {
    inner: ReflectedFn,
    reflections: Rc<Cell<usize>>,
}

impl Reflected for CountingReflect {
    fn syntax_tree(&self) -> SyntaxNode {
        self.reflections.set(self.reflections.get() + 1);
        self.inner.syntax_tree()
    }

    fn closure_bindings(&self) -> HashMap<String, Binding> {
        self.inner.closure_bindings()
    }

    fn global_bindings(&self) -> Globals {
        self.inner.global_bindings()
    }
}

#[test]
fn test_non_fn_tycon_rejected_before_reflection() {
    let plain = opaque("plain_");
    let ty = plain.ty(Index::unit()).unwrap();
    let reflections = Rc::new(Cell::new(0));
    let adapter = CountingReflect {
        inner: ReflectedFn::new(body()),
        reflections: reflections.clone(),
    };

    let err = ty.decorate(&adapter).unwrap_err();
    assert!(matches!(err, DecorateError::Type(_)));
    assert_eq!(reflections.get(), 0, "rejection must precede reflection");
}

#[test]
fn test_non_fn_incomplete_rejected_before_reflection() {
    let plain = opaque("plain_");
    let inc = match plain.index(Index::Hole).unwrap() {
        Indexed::Incomplete(inc) => inc,
        other => panic!("expected incomplete, got {:?}", other),
    };
    let reflections = Rc::new(Cell::new(0));
    let adapter = CountingReflect {
        inner: ReflectedFn::new(body()),
        reflections: reflections.clone(),
    };

    let err = inc.decorate(&adapter).unwrap_err();
    assert!(matches!(err, DecorateError::Type(_)));
    assert_eq!(reflections.get(), 0);
}

#[test]
fn test_default_hooks_are_not_implemented() {
    struct BareFn;
    impl TypeConstructor for BareFn {
        fn name(&self) -> &str {
            "bare_"
        }
        fn is_fn(&self) -> bool {
            true
        }
    }
    let bare = Tycon::new(BareFn);

    let ty = bare.ty(Index::unit()).unwrap();
    let err = ty.decorate(&ReflectedFn::new(body())).unwrap_err();
    assert!(err.to_string().contains("analysis"));

    let inc = bare.index(Index::Hole).unwrap();
    let err = inc.decorate(&ReflectedFn::new(body())).unwrap_err();
    assert!(err.to_string().contains("synthesis"));
}

// ---------------------------------------------------------------------------
// Static environment through the pipeline
// ---------------------------------------------------------------------------

/// Synthesizes the type named by the body's single leaf, resolved through
/// the static environment.
struct EnvDrivenFn;

impl TypeConstructor for EnvDrivenFn {
    fn name(&self) -> &str {
        "envfn_"
    }

    fn is_fn(&self) -> bool {
        true
    }

    fn syn(&self, tree: &SyntaxNode, env: &StaticEnv) -> Result<Index, TypeError> {
        let leaf = tree
            .as_branch()
            .map(|b| b.leaf_children())
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| TypeError::new("envfn_ expects a single-leaf body"))?;
        let binding = env
            .lookup(&leaf.value)
            .map_err(|usage| TypeError::new(usage.message))?;
        match binding {
            Binding::Str(name) => Ok(Index::atom(name)),
            other => Err(TypeError::new(format!(
                "'{}' is not a type name: {:?}",
                leaf.value, other
            ))),
        }
    }
}

#[test]
fn test_hook_resolves_names_via_env() {
    let envfn_ = Tycon::new(EnvDrivenFn);
    let inc = envfn_.index(Index::Hole).unwrap();

    let tree = load_body("(B body (L \"alias\"))");
    let shared = globals(bindings! { "alias" => Binding::Str("int".to_string()) });
    let adapter = ReflectedFn::new(tree).with_globals(shared);

    let decorated = inc.decorate(&adapter).unwrap();
    assert_eq!(decorated.ty().idx(), &Index::atom("int"));
}

#[test]
fn test_closure_tier_wins_inside_hook() {
    let envfn_ = Tycon::new(EnvDrivenFn);
    let inc = envfn_.index(Index::Hole).unwrap();

    let tree = load_body("(B body (L \"alias\"))");
    let shared = globals(bindings! { "alias" => Binding::Str("int".to_string()) });
    let adapter = ReflectedFn::new(tree)
        .with_closure(bindings! { "alias" => Binding::Str("bool".to_string()) })
        .with_globals(shared);

    let decorated = inc.decorate(&adapter).unwrap();
    assert_eq!(decorated.ty().idx(), &Index::atom("bool"));
}

#[test]
fn test_unresolved_name_fails_decoration() {
    let envfn_ = Tycon::new(EnvDrivenFn);
    let inc = envfn_.index(Index::Hole).unwrap();

    let tree = load_body("(B body (L \"nowhere\"))");
    let err = inc.decorate(&ReflectedFn::new(tree)).unwrap_err();
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn test_binding_tycon_of() {
    let a_ = opaque("a_");
    let ty = a_.ty(Index::unit()).unwrap();
    assert_eq!(Binding::Ty(ty).tycon_of().unwrap(), &a_);
    assert!(Binding::Int(3).tycon_of().is_err());
}

// ---------------------------------------------------------------------------
// Serialized shapes
// ---------------------------------------------------------------------------

#[test]
fn test_serialized_ty_shape() {
    let unit_ = unit_();
    let ty = unit_.ty(Index::unit()).unwrap();
    let value = serde_json::to_value(&ty).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "tycon": "unit_", "idx": { "seq": [] } })
    );
}

#[test]
fn test_serialized_index_hole() {
    let idx = Index::seq([Index::atom("int"), Index::Hole]);
    let value = serde_json::to_value(&idx).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "seq": [ { "atom": "int" }, "hole" ] })
    );
}
