//! Target propagation.
//!
//! A single post-parse traversal attaching each target's identifier to the
//! nearest following addressable node. Phrasing containers are not entered:
//! targets cannot appear inside them. Invisible siblings (other targets,
//! comments) are skipped. When the receiving sibling is a role or directive
//! container the identifier lands on its first descendant that is not
//! itself a role/directive; when no eligible sibling exists the orphaned
//! label is reported as a warning and the target stays unresolved.
//!
//! Attachment accumulates: one node can receive identifiers from several
//! preceding targets, in order, without duplicates. The pass is idempotent
//! in effect; already-warned orphans are remembered in the parse state so a
//! second run reports nothing new.

use weft_ast::{Node, Visit, visit_mut};

use crate::logger::{LogProps, Logger};
use crate::registry::{State, Transform};

/// State key recording orphaned labels that have already been reported.
const WARNED_KEY: &str = "propagateTargets.warned";

/// The target propagation transform.
pub struct PropagateTargets;

impl Transform for PropagateTargets {
    fn run(&self, tree: &mut Node, state: &mut State, logger: &Logger) {
        let mut warned: Vec<serde_json::Value> = state
            .get(WARNED_KEY)
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();
        propagate(tree, logger, &mut warned);
        state.insert(WARNED_KEY.to_owned(), serde_json::Value::Array(warned));
    }
}

fn propagate(node: &mut Node, logger: &Logger, warned: &mut Vec<serde_json::Value>) {
    if node.is_phrasing_container() {
        return;
    }
    let Some(children) = node.children_mut() else {
        return;
    };
    for index in 0..children.len() {
        let Node::Target(target) = &children[index] else {
            continue;
        };
        let label = target.label.clone();
        let identifier = target.identifier.clone();
        let position = target.position;

        // scan forward for the first visible sibling
        let receiver = children[index + 1..]
            .iter_mut()
            .find(|sibling| !sibling.is_invisible());
        match receiver {
            Some(sibling) => attach(sibling, &identifier),
            None => {
                let key = serde_json::Value::String(format!(
                    "{identifier}@{}",
                    position.map_or_else(String::new, |p| format!(
                        "{}:{}",
                        p.start.line, p.start.column
                    ))
                ));
                if !warned.contains(&key) {
                    logger.warning(
                        format!("No node found to propagate target label to: {label}"),
                        LogProps::at(position).category("propagate-targets"),
                    );
                    warned.push(key);
                }
            }
        }
    }
    for child in node.children_mut().expect("checked above") {
        propagate(child, logger, warned);
    }
}

/// Attach an identifier to a sibling; for role/directive containers, to the
/// first descendant that is not itself a role/directive.
fn attach(sibling: &mut Node, identifier: &str) {
    if matches!(sibling, Node::Role(_) | Node::Directive(_)) {
        visit_mut(sibling, &mut |node| match node {
            Node::Role(_) | Node::Directive(_) => Visit::Continue,
            other => {
                other.add_identifier(identifier);
                Visit::Exit
            }
        });
    } else {
        sibling.add_identifier(identifier);
    }
}
