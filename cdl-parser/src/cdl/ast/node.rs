//! The closed set of AST node variants.

use crate::cdl::token::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators, lowest to highest precedence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        f.write_str(symbol)
    }
}

/// An AST node. Every variant carries the source span it covers.
///
/// The serialized form is tagged with `"kind"` so downstream tooling can
/// dispatch on node type without knowing the Rust enum layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Node {
    /// The whole-script node; children are titles, aliases and entities.
    Root { span: Span, children: Vec<Node> },
    /// A `title "…"` directive.
    Title { span: Span, text: String },
    /// A `table alias = target` declaration.
    TableAlias {
        span: Span,
        alias: String,
        target: Box<Node>,
    },
    /// An entity block: `terms… "label"? @ref? #id? { children… }`.
    Entity {
        span: Span,
        terms: Vec<String>,
        label: Option<String>,
        reference: Option<String>,
        entity_id: Option<String>,
        children: Vec<Node>,
    },
    /// A `name: value` property.
    Property {
        span: Span,
        name: String,
        value: Box<Node>,
    },
    /// A comma-separated value list with two or more items.
    List { span: Span, items: Vec<Node> },
    Identifier {
        span: Span,
        name: String,
    },
    Number {
        span: Span,
        value: f64,
        text: String,
    },
    #[serde(rename = "string")]
    Str {
        span: Span,
        value: String,
    },
    Boolean {
        span: Span,
        value: bool,
    },
    /// A hex color literal such as `#82D854`.
    Color {
        span: Span,
        value: String,
    },
    /// A `@path.to.property` reference. `resolved` is filled in by the
    /// `resolve-references` pipeline stage.
    Reference {
        span: Span,
        path: String,
        resolved: Option<String>,
    },
    /// A `table:field` value path; the field part may be absent.
    #[serde(rename = "vpath")]
    VPath {
        span: Span,
        table: String,
        field: Option<String>,
    },
    Binary {
        span: Span,
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Function {
        span: Span,
        name: String,
        args: Vec<Node>,
    },
    /// Input the parser could not fit into any production; covers the
    /// offending tokens so the tree stays complete over the source.
    Error { span: Span, message: String },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Root { span, .. }
            | Node::Title { span, .. }
            | Node::TableAlias { span, .. }
            | Node::Entity { span, .. }
            | Node::Property { span, .. }
            | Node::List { span, .. }
            | Node::Identifier { span, .. }
            | Node::Number { span, .. }
            | Node::Str { span, .. }
            | Node::Boolean { span, .. }
            | Node::Color { span, .. }
            | Node::Reference { span, .. }
            | Node::VPath { span, .. }
            | Node::Binary { span, .. }
            | Node::Function { span, .. }
            | Node::Error { span, .. } => *span,
        }
    }

    /// Total number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        let children: usize = match self {
            Node::Root { children, .. } | Node::Entity { children, .. } => {
                children.iter().map(Node::node_count).sum()
            }
            Node::List { items, .. } => items_count(items),
            Node::Function { args, .. } => items_count(args),
            Node::TableAlias { target, .. } => target.node_count(),
            Node::Property { value, .. } => value.node_count(),
            Node::Binary { lhs, rhs, .. } => lhs.node_count() + rhs.node_count(),
            _ => 0,
        };
        1 + children
    }
}

fn items_count(items: &[Node]) -> usize {
    items.iter().map(Node::node_count).sum()
}
