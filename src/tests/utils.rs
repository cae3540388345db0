use once_cell::sync::Lazy;
use std::collections::{hash_map::DefaultHasher, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::error::TypeFormationError;
use crate::index::Index;
use crate::syntax::SyntaxNode;
use crate::tycon::{Tycon, TypeConstructor};

static BODY_CACHE: Lazy<Mutex<HashMap<u64, SyntaxNode>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Parse (and cache) a function body given in S-expression form.
pub fn load_body(src: &str) -> SyntaxNode {
    // compute a hash key for the source
    let mut hasher = DefaultHasher::new();
    src.hash(&mut hasher);
    let key = hasher.finish();
    let mut cache = BODY_CACHE.lock().unwrap();
    cache
        .entry(key)
        .or_insert_with(|| SyntaxNode::parse(src).unwrap())
        .clone()
}

/// A family that accepts any index; handy for identity tests.
pub struct Opaque {
    pub name: &'static str,
}

impl TypeConstructor for Opaque {
    fn name(&self) -> &str {
        self.name
    }
}

pub fn opaque(name: &'static str) -> Tycon {
    Tycon::new(Opaque { name })
}

/// The unit family from the core test suite: its only index is `()`.
pub struct UnitTycon;

impl TypeConstructor for UnitTycon {
    fn name(&self) -> &str {
        "unit_"
    }

    fn validate(&self, idx: &Index) -> Result<(), TypeFormationError> {
        if !idx.is_unit() {
            return Err(TypeFormationError::new("index of unit_ must be ()"));
        }
        Ok(())
    }
}

pub fn unit_() -> Tycon {
    Tycon::new(UnitTycon)
}
