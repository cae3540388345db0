use serde::Serialize;
use std::path::Path;
use std::{fs, io};

pub mod serialize;
use self::serialize::*;


/// Byte range into the original source of a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Interior node of a function-body tree
#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    pub label: String,
    pub span: Option<SourceSpan>,
    pub children: Vec<SyntaxNode>,
}

impl Branch {
    /// Leaf children of this branch
    pub fn leaf_children(&self) -> Vec<Leaf> {
        self.children
            .iter()
            .filter_map(|c| {
                if let SyntaxNode::Leaf(leaf) = c {
                    Some(leaf.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Branch children of this branch
    pub fn branch_children(&self) -> Vec<Branch> {
        self.children
            .iter()
            .filter_map(|c| {
                if let SyntaxNode::Branch(branch) = c {
                    Some(branch.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn as_node(&self) -> SyntaxNode {
        SyntaxNode::Branch(self.clone())
    }
}

/// Leaf node of a function-body tree
#[derive(Debug, Clone, Serialize)]
pub struct Leaf {
    pub value: String,
    pub span: Option<SourceSpan>,
}

impl Leaf {
    pub fn as_node(&self) -> SyntaxNode {
        SyntaxNode::Leaf(self.clone())
    }
}

/// Tree-shaped abstract syntax of a function body. The shape is opaque to
/// the decoration pipeline itself; only constructors' ana/syn hooks
/// interpret it.
#[derive(Debug, Clone, Serialize)]
pub enum SyntaxNode {
    Leaf(Leaf),
    Branch(Branch),
}

impl SyntaxNode {
    pub fn leaf(value: impl Into<String>) -> Self {
        SyntaxNode::Leaf(Leaf {
            value: value.into(),
            span: None,
        })
    }

    pub fn branch(label: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode::Branch(Branch {
            label: label.into(),
            span: None,
            children,
        })
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            SyntaxNode::Leaf(leaf) => leaf.span.as_ref(),
            SyntaxNode::Branch(branch) => branch.span.as_ref(),
        }
    }

    pub fn set_span(&mut self, new_span: SourceSpan) {
        match self {
            SyntaxNode::Leaf(leaf) => leaf.span = Some(new_span),
            SyntaxNode::Branch(branch) => branch.span = Some(new_span),
        }
    }

    pub fn with_span(mut self, new_span: SourceSpan) -> Self {
        self.set_span(new_span);
        self
    }

    /// Get a reference to this node as a Leaf if it is one
    pub fn as_leaf(&self) -> Option<&Leaf> {
        if let SyntaxNode::Leaf(leaf) = self {
            Some(leaf)
        } else {
            None
        }
    }

    /// Get a reference to this node as a Branch if it is one
    pub fn as_branch(&self) -> Option<&Branch> {
        if let SyntaxNode::Branch(branch) = self {
            Some(branch)
        } else {
            None
        }
    }

    /// Access children directly; leaves have none
    pub fn children(&self) -> Option<&Vec<SyntaxNode>> {
        match self {
            SyntaxNode::Branch(branch) => Some(&branch.children),
            _ => None,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SyntaxNode::Leaf(leaf) => &leaf.value,
            SyntaxNode::Branch(branch) => &branch.label,
        }
    }

    /// Calculate the depth of this node (maximum depth of any subtree)
    pub fn depth(&self) -> usize {
        match self {
            SyntaxNode::Leaf(_) => 1,
            SyntaxNode::Branch(branch) => {
                if branch.children.is_empty() {
                    1
                } else {
                    1 + branch
                        .children
                        .iter()
                        .map(|child| child.depth())
                        .max()
                        .unwrap_or(0)
                }
            }
        }
    }

    /// Count the total number of nodes in this tree (including this node)
    pub fn node_count(&self) -> usize {
        match self {
            SyntaxNode::Leaf(_) => 1,
            SyntaxNode::Branch(branch) => {
                1 + branch
                    .children
                    .iter()
                    .map(|child| child.node_count())
                    .sum::<usize>()
            }
        }
    }

    // ---- Lisp-style serialization API as methods ----
    pub fn serialize(&self) -> String {
        fn esc(s: &str) -> String {
            s.replace('\\', "\\\\").replace('"', "\\\"")
        }
        fn go(node: &SyntaxNode, out: &mut String) {
            match node {
                SyntaxNode::Leaf(leaf) => {
                    out.push_str(&format!("(L \"{}\")", esc(&leaf.value)));
                }
                SyntaxNode::Branch(branch) => {
                    out.push_str(&format!("(B {}", branch.label));
                    for ch in &branch.children {
                        go(ch, out);
                    }
                    out.push(')');
                }
            }
        }
        let mut s = String::new();
        go(self, &mut s);
        s
    }

    /// Pretty-print the tree as an indented S-expression for debugging
    pub fn pretty(&self) -> String {
        fn esc(s: &str) -> String {
            s.replace('\\', "\\\\").replace('"', "\\\"")
        }
        fn go(node: &SyntaxNode, indent: usize, out: &mut String) {
            let pad = "  ".repeat(indent);
            match node {
                SyntaxNode::Leaf(leaf) => {
                    out.push_str(&format!("{}(L \"{}\")", pad, esc(&leaf.value)));
                }
                SyntaxNode::Branch(branch) => {
                    out.push_str(&format!("{}(B {}", pad, branch.label));
                    if branch.children.is_empty() {
                        out.push(')');
                    } else {
                        out.push('\n');
                        for (i, ch) in branch.children.iter().enumerate() {
                            go(ch, indent + 1, out);
                            if i + 1 < branch.children.len() {
                                out.push('\n');
                            }
                        }
                        out.push_str(&format!("\n{})", pad));
                    }
                }
            }
        }
        let mut s = String::new();
        go(self, 0, &mut s);
        s
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let header = ";!body 1\n\n";
        let body = self.serialize();
        fs::write(path, format!("{}{}\n", header, body))
    }

    /// Parse a tree from its S-expression form.
    pub fn parse(input: &str) -> Result<SyntaxNode, String> {
        let body = strip_headers(input);
        let sexpr = parse_sexpr(body)?;
        sexpr_to_node(&sexpr)
    }

    /// Load a tree from a file that may include `;`-prefixed headers.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SyntaxNode, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&content)
    }

    // Syntactic equality (spans are ignored)
    pub fn syneq(&self, other: &SyntaxNode) -> bool {
        match (self, other) {
            (SyntaxNode::Leaf(l1), SyntaxNode::Leaf(l2)) => l1.value == l2.value,
            (SyntaxNode::Branch(b1), SyntaxNode::Branch(b2)) => {
                b1.label == b2.label
                    && b1.children.len() == b2.children.len()
                    && b1
                        .children
                        .iter()
                        .zip(b2.children.iter())
                        .all(|(a, b)| a.syneq(b))
            }
            _ => false,
        }
    }
}
