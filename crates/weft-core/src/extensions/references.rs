//! Standard cross-reference roles.

use std::sync::LazyLock;

use regex::Regex;
use weft_ast::{CrossReference, Node, Text, normalize_id};

use crate::registry::{Extension, RawRole, ResolveContext, Role};

/// `Labeled Reference <ref>` — explicit display text before the target.
static EXPLICIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)<([^<>]+)>$").unwrap());

struct XRefRole {
    domain: &'static str,
    kind: &'static str,
}

impl Role for XRefRole {
    fn run(&self, role: &RawRole, _ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let node = match EXPLICIT_PATTERN.captures(&role.value) {
            Some(captures) => CrossReference {
                target: normalize_id(&captures[2]),
                explicit: true,
                domain: self.domain.to_owned(),
                kind: self.kind.to_owned(),
                children: vec![Node::Text(Text {
                    value: captures[1].trim().to_owned(),
                    ..Default::default()
                })],
                position: role.position,
                ..Default::default()
            },
            None => CrossReference {
                target: normalize_id(&role.value),
                explicit: false,
                domain: self.domain.to_owned(),
                kind: self.kind.to_owned(),
                position: role.position,
                ..Default::default()
            },
        };
        vec![Node::CrossReference(node)]
    }
}

/// The `ref`/`numref` cross-reference roles, plus their `std:`-qualified
/// aliases.
#[must_use]
pub fn references() -> Extension {
    Extension::new("references")
        .role(
            "ref",
            XRefRole {
                domain: "std",
                kind: "ref",
            },
        )
        .role(
            "std:ref",
            XRefRole {
                domain: "std",
                kind: "ref",
            },
        )
        .role(
            "numref",
            XRefRole {
                domain: "std",
                kind: "numref",
            },
        )
        .role(
            "std:numref",
            XRefRole {
                domain: "std",
                kind: "numref",
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    fn first_reference(source: &str) -> CrossReference {
        let parsed = Parser::builder()
            .extension(references())
            .unwrap()
            .build()
            .parse(source);
        let Node::Paragraph(paragraph) = &parsed.tree.children().unwrap()[0] else {
            panic!("expected paragraph");
        };
        let Node::Role(role) = &paragraph.children[0] else {
            panic!("expected role");
        };
        let Some([Node::CrossReference(reference)]) = role.children.as_deref() else {
            panic!("expected cross reference, got {:?}", role.children);
        };
        reference.clone()
    }

    #[test]
    fn test_implicit_reference() {
        let reference = first_reference("{ref}`My Section`\n");
        assert_eq!(reference.target, "my section");
        assert!(!reference.explicit);
        assert!(reference.children.is_empty());
    }

    #[test]
    fn test_explicit_reference() {
        let reference = first_reference("{ref}`see here <My Section>`\n");
        assert_eq!(reference.target, "my section");
        assert!(reference.explicit);
        let [Node::Text(text)] = reference.children.as_slice() else {
            panic!("expected display text");
        };
        assert_eq!(text.value, "see here");
    }

    #[test]
    fn test_qualified_alias() {
        let reference = first_reference("{std:numref}`fig-1`\n");
        assert_eq!(reference.kind, "numref");
        assert_eq!(reference.domain, "std");
    }
}
