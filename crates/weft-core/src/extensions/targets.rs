//! Target propagation, registered as a post-parse transform.

use crate::propagate::PropagateTargets;
use crate::registry::Extension;

/// Priority slot in the transform order; reference resolution passes, when
/// present, should run after this.
const PROPAGATE_PRIORITY: i32 = 260;

/// The target propagation extension.
#[must_use]
pub fn targets() -> Extension {
    Extension::new("targets").transform(PROPAGATE_PRIORITY, PropagateTargets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use weft_ast::Node;

    #[test]
    fn test_target_propagates_through_full_parse() {
        let parser = Parser::builder().extension(targets()).unwrap().build();
        let parsed = parser.parse("(alpha)=\n(beta)=\ncontent here\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let children = parsed.tree.children().unwrap();
        let Node::Paragraph(paragraph) = &children[2] else {
            panic!("expected paragraph, got {:?}", children[2].name());
        };
        assert_eq!(paragraph.identifiers, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_orphan_target_warns() {
        let parser = Parser::builder().extension(targets()).unwrap().build();
        let parsed = parser.parse("some text\n\n(lost)=\n");
        assert_eq!(parsed.diagnostics.len(), 1);
        assert!(parsed.diagnostics[0].message.contains("lost"));
        // the target stays in the tree, unresolved
        let children = parsed.tree.children().unwrap();
        assert!(matches!(children.last(), Some(Node::Target(_))));
    }
}
