//! Property validation stage.
//!
//! Warns on duplicate property names within one entity body; later
//! declarations silently shadowing earlier ones is the most common authoring
//! mistake in large CDL configurations. The tree passes through unchanged.

use crate::cdl::ast::{Diagnostic, Node};
use crate::cdl::pipeline::StageError;
use std::collections::BTreeMap;

pub(crate) fn run(ast: &Node, diagnostics: &mut Vec<Diagnostic>) -> Result<Node, StageError> {
    walk(ast, diagnostics);
    Ok(ast.clone())
}

fn walk(node: &Node, diagnostics: &mut Vec<Diagnostic>) {
    let children = match node {
        Node::Root { children, .. } | Node::Entity { children, .. } => children,
        _ => return,
    };

    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for child in children {
        if let Node::Property { name, span, .. } = child {
            let count = seen.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                diagnostics.push(Diagnostic::warning(
                    format!("duplicate property `{}` in entity", name),
                    *span,
                    "validate-properties",
                ));
            }
        }
    }

    for child in children {
        walk(child, diagnostics);
    }
}
