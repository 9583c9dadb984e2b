//! Nested parsing of embedded text.
//!
//! Directive bodies and role content re-parse as their own documents, each
//! with a fresh tokenizer restricted by a construct set (frontmatter and
//! headings stay off inside nested contexts). Positions in the result are
//! either stripped or shifted by whole lines/columns so they line up with
//! the enclosing document.

use weft_ast::Node;
use weft_compile::{compile, compile_inline};
use weft_syntax::{Constructs, Source, tokenize, tokenize_inline};

/// What to do with positions produced by a nested parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionAdjustment {
    /// Remove positions entirely.
    Strip,
    /// Shift by whole lines/columns, dropping character offsets.
    Offset { lines: usize, columns: usize },
}

/// A parser for text embedded in directives and roles.
#[derive(Clone, Debug)]
pub struct NestedParser {
    constructs: Constructs,
}

impl NestedParser {
    #[must_use]
    pub fn new(constructs: Constructs) -> Self {
        Self { constructs }
    }

    /// Parse `text` as flow content, returning the root's children.
    #[must_use]
    pub fn parse(&self, text: &str, adjustment: &PositionAdjustment) -> Vec<Node> {
        if text.is_empty() {
            return Vec::new();
        }
        let source = Source::new(text);
        let events = tokenize(&source, &self.constructs);
        let root = compile(&events, &source);
        let Node::Root(root) = root else {
            unreachable!("compiler always produces a root");
        };
        adjust(root.children, adjustment)
    }

    /// Parse `text` as phrasing content only.
    #[must_use]
    pub fn parse_inline(&self, text: &str, adjustment: &PositionAdjustment) -> Vec<Node> {
        if text.is_empty() {
            return Vec::new();
        }
        let source = Source::new(text);
        let events = tokenize_inline(&source, &self.constructs);
        adjust(compile_inline(&events, &source), adjustment)
    }
}

impl Default for NestedParser {
    fn default() -> Self {
        Self::new(Constructs::nested())
    }
}

fn adjust(mut nodes: Vec<Node>, adjustment: &PositionAdjustment) -> Vec<Node> {
    for node in &mut nodes {
        match adjustment {
            PositionAdjustment::Strip => node.strip_positions(),
            PositionAdjustment::Offset { lines, columns } => {
                node.offset_positions(*lines, *columns);
            }
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_positions() {
        let parser = NestedParser::default();
        let nodes = parser.parse("some *text*\n", &PositionAdjustment::Strip);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].position(), None);
    }

    #[test]
    fn test_parse_offsets_lines() {
        let parser = NestedParser::default();
        let nodes = parser.parse(
            "body line\n",
            &PositionAdjustment::Offset {
                lines: 3,
                columns: 0,
            },
        );
        let position = nodes[0].position().unwrap();
        assert_eq!(position.start.line, 4);
        assert_eq!(position.start.offset, None);
    }

    #[test]
    fn test_headings_disabled_in_nested_context() {
        let parser = NestedParser::default();
        let nodes = parser.parse("# not a heading\n", &PositionAdjustment::Strip);
        assert!(matches!(nodes[0], Node::Paragraph(_)));
    }

    #[test]
    fn test_empty_text() {
        let parser = NestedParser::default();
        assert!(parser.parse("", &PositionAdjustment::Strip).is_empty());
        assert!(
            parser
                .parse_inline("", &PositionAdjustment::Strip)
                .is_empty()
        );
    }

    #[test]
    fn test_inline_keeps_phrasing_sequence() {
        let parser = NestedParser::default();
        let nodes = parser.parse_inline("a `b` c", &PositionAdjustment::Strip);
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[1], Node::InlineCode(_)));
    }
}
