//! Reference resolution stage.
//!
//! CDL values can point at properties declared elsewhere with `@path`
//! references, e.g. `value: @cr.ltrValue` against
//! `custom properties #cr { ltrValue: … }`.
//!
//! The stage runs in two passes. The first indexes every property under all
//! the paths that can address it: its bare name, then the name prefixed by
//! each enclosing entity id walking outward. The second rebuilds the tree
//! with each `Reference` node annotated: `resolved` is set to the matched
//! path, and unresolved references get a warning diagnostic. The input tree
//! is left untouched.

use crate::cdl::ast::{Diagnostic, Node};
use crate::cdl::pipeline::StageError;
use std::collections::BTreeSet;

pub(crate) fn run(ast: &Node, diagnostics: &mut Vec<Diagnostic>) -> Result<Node, StageError> {
    let mut targets = BTreeSet::new();
    index(ast, &mut Vec::new(), &mut targets);
    Ok(annotate(ast, &targets, diagnostics))
}

fn index(node: &Node, scope: &mut Vec<String>, targets: &mut BTreeSet<String>) {
    match node {
        Node::Root { children, .. } => {
            for child in children {
                index(child, scope, targets);
            }
        }
        Node::Entity {
            entity_id,
            children,
            ..
        } => {
            if let Some(id) = entity_id {
                scope.push(id.clone());
            }
            for child in children {
                index(child, scope, targets);
            }
            if entity_id.is_some() {
                scope.pop();
            }
        }
        Node::Property { name, .. } => {
            let mut key = name.clone();
            targets.insert(key.clone());
            for ancestor in scope.iter().rev() {
                key = format!("{}.{}", ancestor, key);
                targets.insert(key.clone());
            }
        }
        _ => {}
    }
}

fn annotate(node: &Node, targets: &BTreeSet<String>, diagnostics: &mut Vec<Diagnostic>) -> Node {
    match node {
        Node::Root { span, children } => Node::Root {
            span: *span,
            children: children
                .iter()
                .map(|c| annotate(c, targets, diagnostics))
                .collect(),
        },
        Node::Entity {
            span,
            terms,
            label,
            reference,
            entity_id,
            children,
        } => Node::Entity {
            span: *span,
            terms: terms.clone(),
            label: label.clone(),
            reference: reference.clone(),
            entity_id: entity_id.clone(),
            children: children
                .iter()
                .map(|c| annotate(c, targets, diagnostics))
                .collect(),
        },
        Node::Property { span, name, value } => Node::Property {
            span: *span,
            name: name.clone(),
            value: Box::new(annotate(value, targets, diagnostics)),
        },
        Node::TableAlias {
            span,
            alias,
            target,
        } => Node::TableAlias {
            span: *span,
            alias: alias.clone(),
            target: Box::new(annotate(target, targets, diagnostics)),
        },
        Node::List { span, items } => Node::List {
            span: *span,
            items: items
                .iter()
                .map(|i| annotate(i, targets, diagnostics))
                .collect(),
        },
        Node::Function { span, name, args } => Node::Function {
            span: *span,
            name: name.clone(),
            args: args
                .iter()
                .map(|a| annotate(a, targets, diagnostics))
                .collect(),
        },
        Node::Binary { span, op, lhs, rhs } => Node::Binary {
            span: *span,
            op: *op,
            lhs: Box::new(annotate(lhs, targets, diagnostics)),
            rhs: Box::new(annotate(rhs, targets, diagnostics)),
        },
        Node::Reference { span, path, .. } => {
            if targets.contains(path) {
                Node::Reference {
                    span: *span,
                    path: path.clone(),
                    resolved: Some(path.clone()),
                }
            } else {
                diagnostics.push(Diagnostic::warning(
                    format!("unresolved reference `@{}`", path),
                    *span,
                    "resolve-references",
                ));
                Node::Reference {
                    span: *span,
                    path: path.clone(),
                    resolved: None,
                }
            }
        }
        other => other.clone(),
    }
}
