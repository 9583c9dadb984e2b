//! Depth-first tree traversal.

use crate::node::Node;

/// Control value returned by a visitor callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// Do not descend; continue with the next sibling.
    Skip,
    /// Stop the whole traversal.
    Exit,
}

/// Visit `node` and its descendants depth-first, pre-order.
///
/// Returns [`Visit::Exit`] if the callback ended the traversal early.
pub fn visit<F>(node: &Node, f: &mut F) -> Visit
where
    F: FnMut(&Node) -> Visit,
{
    match f(node) {
        Visit::Continue => {}
        action => return action,
    }
    if let Some(children) = node.children() {
        for child in children {
            if visit(child, f) == Visit::Exit {
                return Visit::Exit;
            }
        }
    }
    Visit::Continue
}

/// Mutable variant of [`visit`].
pub fn visit_mut<F>(node: &mut Node, f: &mut F) -> Visit
where
    F: FnMut(&mut Node) -> Visit,
{
    match f(node) {
        Visit::Continue => {}
        action => return action,
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            if visit_mut(child, f) == Visit::Exit {
                return Visit::Exit;
            }
        }
    }
    Visit::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Paragraph, Root, Text};

    fn tree() -> Node {
        Node::Root(Root {
            children: vec![
                Node::Paragraph(Paragraph {
                    children: vec![Node::Text(Text {
                        value: "a".to_owned(),
                        ..Default::default()
                    })],
                    ..Default::default()
                }),
                Node::Text(Text {
                    value: "b".to_owned(),
                    ..Default::default()
                }),
            ],
            position: None,
        })
    }

    #[test]
    fn test_visit_preorder() {
        let mut seen = Vec::new();
        visit(&tree(), &mut |node| {
            seen.push(node.name());
            Visit::Continue
        });
        assert_eq!(seen, vec!["root", "paragraph", "text", "text"]);
    }

    #[test]
    fn test_visit_skip() {
        let mut seen = Vec::new();
        visit(&tree(), &mut |node| {
            seen.push(node.name());
            if node.name() == "paragraph" {
                Visit::Skip
            } else {
                Visit::Continue
            }
        });
        assert_eq!(seen, vec!["root", "paragraph", "text"]);
    }

    #[test]
    fn test_visit_exit_stops_everything() {
        let mut seen = Vec::new();
        let action = visit(&tree(), &mut |node| {
            seen.push(node.name());
            if node.name() == "text" {
                Visit::Exit
            } else {
                Visit::Continue
            }
        });
        assert_eq!(action, Visit::Exit);
        assert_eq!(seen, vec!["root", "paragraph", "text"]);
    }
}
