//! The document parser: an immutable configuration built once, then used
//! for any number of parses.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;
use weft_ast::Node;
use weft_compile::compile;
use weft_syntax::{Constructs, Source, tokenize};

use crate::extensions;
use crate::logger::{Diagnostic, Logger};
use crate::nested::NestedParser;
use crate::processor::Resolver;
use crate::registry::{Directive, Extension, Role, State, Transform};

/// Duplicate registration during builder assembly.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("role `{name}` already registered by extension `{existing}`")]
    DuplicateRole {
        name: String,
        existing: &'static str,
    },
    #[error("directive `{name}` already registered by extension `{existing}`")]
    DuplicateDirective {
        name: String,
        existing: &'static str,
    },
}

/// Result of one parse: the tree plus collected diagnostics.
///
/// Parse problems never abort the run — failed constructs surface as
/// in-tree `error` nodes and as diagnostics.
#[derive(Debug)]
pub struct Parsed {
    pub tree: Node,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assembles a [`Parser`] from extensions.
///
/// Registration happens only here: once built, the parser's role/directive
/// tables and transform list are frozen.
pub struct ParserBuilder {
    roles: HashMap<String, Arc<dyn Role>>,
    role_sources: HashMap<String, &'static str>,
    directives: HashMap<String, Arc<dyn Directive>>,
    directive_sources: HashMap<String, &'static str>,
    transforms: Vec<(i32, Arc<dyn Transform>)>,
    max_resolve_depth: usize,
}

impl std::fmt::Debug for ParserBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserBuilder")
            .field("roles", &self.roles.keys().collect::<Vec<_>>())
            .field("directives", &self.directives.keys().collect::<Vec<_>>())
            .field("transforms", &self.transforms.len())
            .field("max_resolve_depth", &self.max_resolve_depth)
            .finish()
    }
}

/// Default bound on nested directive/role resolution.
const DEFAULT_MAX_RESOLVE_DEPTH: usize = 64;

impl Default for ParserBuilder {
    fn default() -> Self {
        Self {
            roles: HashMap::new(),
            role_sources: HashMap::new(),
            directives: HashMap::new(),
            directive_sources: HashMap::new(),
            transforms: Vec::new(),
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
        }
    }
}

impl ParserBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an extension's roles, directives and transforms.
    ///
    /// A name already registered by an earlier extension errors unless the
    /// new registration is explicitly overriding.
    pub fn extension(mut self, extension: Extension) -> Result<Self, BuildError> {
        let extension_name = extension.name;
        for (name, registration) in extension.roles {
            if !registration.overriding
                && let Some(&existing) = self.role_sources.get(&name)
            {
                return Err(BuildError::DuplicateRole { name, existing });
            }
            self.roles.insert(name.clone(), registration.implementation);
            self.role_sources.insert(name, extension_name);
        }
        for (name, registration) in extension.directives {
            if !registration.overriding
                && let Some(&existing) = self.directive_sources.get(&name)
            {
                return Err(BuildError::DuplicateDirective { name, existing });
            }
            self.directives
                .insert(name.clone(), registration.implementation);
            self.directive_sources.insert(name, extension_name);
        }
        self.transforms.extend(extension.transforms);
        Ok(self)
    }

    /// Bound the nested directive/role resolution depth.
    #[must_use]
    pub fn max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = depth;
        self
    }

    /// Freeze the configuration.
    #[must_use]
    pub fn build(mut self) -> Parser {
        self.transforms.sort_by_key(|(priority, _)| *priority);
        Parser {
            roles: self.roles,
            directives: self.directives,
            transforms: self.transforms,
            max_resolve_depth: self.max_resolve_depth,
            constructs: Constructs::default(),
            nested: NestedParser::new(Constructs::nested()),
        }
    }
}

/// The document parser.
pub struct Parser {
    roles: HashMap<String, Arc<dyn Role>>,
    directives: HashMap<String, Arc<dyn Directive>>,
    transforms: Vec<(i32, Arc<dyn Transform>)>,
    max_resolve_depth: usize,
    constructs: Constructs,
    nested: NestedParser,
}

impl Parser {
    #[must_use]
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// A parser with every built-in extension registered.
    pub fn with_defaults() -> Result<Self, BuildError> {
        Ok(Self::builder()
            .extension(extensions::admonitions())?
            .extension(extensions::images())?
            .extension(extensions::code())?
            .extension(extensions::math())?
            .extension(extensions::inline_markup())?
            .extension(extensions::references())?
            .extension(extensions::targets())?
            .build())
    }

    /// Parse a document with a fresh state.
    #[must_use]
    pub fn parse(&self, text: &str) -> Parsed {
        let mut state = State::new();
        self.parse_with_state(text, &mut state)
    }

    /// Parse a document, threading a caller-supplied state through role and
    /// directive resolution and the transforms.
    #[must_use]
    pub fn parse_with_state(&self, text: &str, state: &mut State) -> Parsed {
        let logger = Logger::new();
        let source = Source::new(text);
        let events = tokenize(&source, &self.constructs);
        let mut tree = compile(&events, &source);

        let resolver = Resolver {
            roles: &self.roles,
            directives: &self.directives,
            nested: &self.nested,
            max_depth: self.max_resolve_depth,
        };
        resolver.process(
            &mut tree,
            state,
            &logger,
            BTreeSet::new(),
            BTreeSet::new(),
            0,
        );

        for (_, transform) in &self.transforms {
            transform.run(&mut tree, state, &logger);
        }

        Parsed {
            tree,
            diagnostics: logger.into_diagnostics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deconstruct::DirectiveSpec;
    use crate::registry::{RawRole, ResolveContext};
    use pretty_assertions::assert_eq;
    use weft_ast::{Code, ErrorNode, Text};

    fn children(node: &Node) -> &[Node] {
        node.children().expect("container")
    }

    #[test]
    fn test_default_pipeline() {
        let parser = Parser::with_defaults().unwrap();
        let parsed = parser.parse("(sec)=\n# Title\n\n```{note}\nBe careful.\n```\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let top = children(&parsed.tree);
        assert!(matches!(top[0], Node::Target(_)));
        let Node::Heading(heading) = &top[1] else {
            panic!("expected heading, got {:?}", top[1].name());
        };
        assert_eq!(heading.identifiers, vec!["sec".to_owned()]);
        let Node::Directive(directive) = &top[2] else {
            panic!("expected directive, got {:?}", top[2].name());
        };
        assert_eq!(directive.name, "note");
        let Node::Admonition(admonition) = &directive.children[0] else {
            panic!("expected admonition");
        };
        assert_eq!(admonition.kind, "note");
    }

    #[test]
    fn test_unknown_role_becomes_error_node() {
        let parser = Parser::builder().build();
        let parsed = parser.parse("{mystery}`x`\n");
        let Node::Paragraph(paragraph) = &children(&parsed.tree)[0] else {
            panic!("expected paragraph");
        };
        let Node::Role(role) = &paragraph.children[0] else {
            panic!("expected role");
        };
        let Some([Node::Error(error)]) = role.children.as_deref() else {
            panic!("expected error child, got {:?}", role.children);
        };
        assert_eq!(error.value, "Unknown role: mystery");
        assert_eq!(parsed.diagnostics.len(), 1);
    }

    #[test]
    fn test_unknown_directive_becomes_error_node() {
        let parser = Parser::builder().build();
        let parsed = parser.parse("```{mystery}\nx\n```\n");
        let Node::Error(error) = &children(&parsed.tree)[0] else {
            panic!("expected error node, got {:?}", parsed.tree);
        };
        assert_eq!(error.value, "Unknown directive: mystery");
    }

    #[test]
    fn test_directive_parse_error_recovers() {
        let parser = Parser::with_defaults().unwrap();
        let parsed = parser.parse("```{image}\nno required argument\n```\n\nstill here\n");
        let top = children(&parsed.tree);
        assert!(matches!(&top[0], Node::Error(_)));
        // the rest of the document still processed
        assert!(matches!(&top[1], Node::Paragraph(_)));
    }

    #[test]
    fn test_plain_code_untouched() {
        let parser = Parser::with_defaults().unwrap();
        let parsed = parser.parse("```rust\nlet x = 1;\n```\n");
        let Node::Code(code) = &children(&parsed.tree)[0] else {
            panic!("expected code");
        };
        assert_eq!(code.lang.as_deref(), Some("rust"));
    }

    /// A directive whose body re-emits itself, for the depth cap.
    struct Recursive;

    impl crate::Directive for Recursive {
        fn spec(&self) -> DirectiveSpec {
            DirectiveSpec {
                has_content: true,
                ..Default::default()
            }
        }

        fn run(&self, _: &weft_ast::Directive, _: &mut ResolveContext<'_>) -> Vec<Node> {
            vec![Node::Code(Code {
                lang: Some("{loop}".to_owned()),
                value: String::new(),
                ..Default::default()
            })]
        }
    }

    #[test]
    fn test_self_referential_directive_hits_depth_cap() {
        let parser = Parser::builder()
            .extension(Extension::new("test").directive("loop", Recursive))
            .unwrap()
            .max_resolve_depth(10)
            .build();
        let parsed = parser.parse("```{loop}\n```\n");
        assert!(
            parsed
                .diagnostics
                .iter()
                .any(|d| d.message.contains("maximum resolution depth"))
        );
        // the tree is finite and carries an error node at the cap
        let mut found = false;
        weft_ast::visit(&parsed.tree, &mut |node| {
            if matches!(node, Node::Error(_)) {
                found = true;
            }
            weft_ast::Visit::Continue
        });
        assert!(found);
    }

    /// A role that records whether it observed an in-scope definition.
    struct SeesDefinitions;

    impl crate::Role for SeesDefinitions {
        fn run(&self, role: &RawRole, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
            let seen = ctx.definitions.contains(&role.value);
            ctx.state.insert(
                format!("seen:{}", role.value),
                serde_json::Value::Bool(seen),
            );
            vec![Node::Text(Text {
                value: role.value.clone(),
                ..Default::default()
            })]
        }
    }

    #[test]
    fn test_definitions_visible_to_roles() {
        let parser = Parser::builder()
            .extension(Extension::new("test").role("sees", SeesDefinitions))
            .unwrap()
            .build();
        let mut state = State::new();
        let _ = parser.parse_with_state("[known]: https://example.com\n\n{sees}`known`\n", &mut state);
        assert_eq!(state["seen:known"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_duplicate_directive_registration_errors() {
        let first = Extension::new("one").directive("loop", Recursive);
        let second = Extension::new("two").directive("loop", Recursive);
        let err = Parser::builder()
            .extension(first)
            .unwrap()
            .extension(second)
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateDirective {
                name: "loop".to_owned(),
                existing: "one",
            }
        );
    }

    #[test]
    fn test_override_registration_allowed() {
        let first = Extension::new("one").directive("loop", Recursive);
        let second = Extension::new("two").directive_overriding("loop", Recursive);
        assert!(
            Parser::builder()
                .extension(first)
                .unwrap()
                .extension(second)
                .is_ok()
        );
    }

    /// Scope isolation: a definition created inside a directive body must
    /// not be visible to a sibling role after it.
    struct Wrapper;

    impl crate::Directive for Wrapper {
        fn spec(&self) -> DirectiveSpec {
            DirectiveSpec {
                has_content: true,
                ..Default::default()
            }
        }

        fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
            ctx.nested_parse(&directive.value, directive.body_offset)
        }
    }

    #[test]
    fn test_nested_definitions_do_not_leak_to_siblings() {
        let parser = Parser::builder()
            .extension(
                Extension::new("test")
                    .directive("wrap", Wrapper)
                    .role("sees", SeesDefinitions),
            )
            .unwrap()
            .build();
        let mut state = State::new();
        let source = "```{wrap}\n[inner]: https://example.com\n\n{sees}`inner`\n```\n\n{sees}`inner`\n";
        let parsed = parser.parse_with_state(source, &mut state);
        // an error node would mean the wrap directive itself failed
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(state["seen:inner"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_nested_definition_visible_inside_scope() {
        let parser = Parser::builder()
            .extension(
                Extension::new("test")
                    .directive("wrap", Wrapper)
                    .role("sees", SeesDefinitions),
            )
            .unwrap()
            .build();
        let mut state = State::new();
        // the role inside the directive body sees the inner definition
        let source = "```{wrap}\n[inner]: https://example.com\n\n{sees}`inner`\n```\n";
        let _ = parser.parse_with_state(source, &mut state);
        assert_eq!(state["seen:inner"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_outer_definitions_visible_inside_directive() {
        let parser = Parser::builder()
            .extension(
                Extension::new("test")
                    .directive("wrap", Wrapper)
                    .role("sees", SeesDefinitions),
            )
            .unwrap()
            .build();
        let mut state = State::new();
        let source = "[outer]: https://example.com\n\n```{wrap}\n{sees}`outer`\n```\n";
        let _ = parser.parse_with_state(source, &mut state);
        assert_eq!(state["seen:outer"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_resolved_role_skipped_on_revisit() {
        // a role already carrying children must not resolve again
        let parser = Parser::builder().build();
        let mut root = Node::Root(weft_ast::Root {
            children: vec![Node::Role(weft_ast::Role {
                name: "mystery".to_owned(),
                value: "x".to_owned(),
                children: Some(vec![Node::Text(Text {
                    value: "already".to_owned(),
                    ..Default::default()
                })]),
                ..Default::default()
            })],
            position: None,
        });
        let logger = Logger::new();
        let mut state = State::new();
        let resolver = Resolver {
            roles: &parser.roles,
            directives: &parser.directives,
            nested: &parser.nested,
            max_depth: parser.max_resolve_depth,
        };
        resolver.process(
            &mut root,
            &mut state,
            &logger,
            BTreeSet::new(),
            BTreeSet::new(),
            0,
        );
        let Node::Role(role) = &children(&root)[0] else {
            panic!("expected role");
        };
        let Some([Node::Text(text)]) = role.children.as_deref() else {
            panic!("expected preserved children");
        };
        assert_eq!(text.value, "already");
        assert!(logger.into_diagnostics().is_empty());
    }

    #[test]
    fn test_error_node_shape() {
        let node = Node::Error(ErrorNode {
            value: "boom".to_owned(),
            ..Default::default()
        });
        assert_eq!(node.name(), "error");
    }
}
