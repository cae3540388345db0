use serde::Serialize;
use std::fmt;

/// A structural index value parametrizing a type instance.
///
/// Completeness is a per-position distinction: `Hole` marks a position
/// still awaiting synthesis. An index is complete iff no `Hole` occurs
/// anywhere in it, including inside nested sequences. The empty sequence
/// is the unit index `()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Index {
    /// Placeholder for a position to be filled in by synthesis.
    Hole,
    Atom(String),
    Int(i64),
    Seq(Vec<Index>),
}

impl Index {
    /// The unit index `()`.
    pub fn unit() -> Self {
        Index::Seq(Vec::new())
    }

    pub fn atom(value: impl Into<String>) -> Self {
        Index::Atom(value.into())
    }

    pub fn seq<I: IntoIterator<Item = Index>>(items: I) -> Self {
        Index::Seq(items.into_iter().collect())
    }

    /// True iff no hole occurs anywhere in this index.
    pub fn is_complete(&self) -> bool {
        match self {
            Index::Hole => false,
            Index::Seq(items) => items.iter().all(|item| item.is_complete()),
            Index::Atom(_) | Index::Int(_) => true,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Index::Seq(items) if items.is_empty())
    }

    /// Number of holes, counting nested sequences.
    pub fn hole_count(&self) -> usize {
        match self {
            Index::Hole => 1,
            Index::Seq(items) => items.iter().map(|item| item.hole_count()).sum(),
            Index::Atom(_) | Index::Int(_) => 0,
        }
    }

    pub fn as_seq(&self) -> Option<&[Index]> {
        match self {
            Index::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Index::Atom(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Hole => write!(f, "_"),
            Index::Atom(value) => write!(f, "{}", value),
            Index::Int(value) => write!(f, "{}", value),
            Index::Seq(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<&str> for Index {
    fn from(value: &str) -> Self {
        Index::Atom(value.to_string())
    }
}

impl From<i64> for Index {
    fn from(value: i64) -> Self {
        Index::Int(value)
    }
}

impl From<Vec<Index>> for Index {
    fn from(items: Vec<Index>) -> Self {
        Index::Seq(items)
    }
}
