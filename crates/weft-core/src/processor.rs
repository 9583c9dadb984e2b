//! The role/directive resolution pass.
//!
//! Two traversals per scope. The first collects every definition and
//! footnote-definition identifier visible at this level (not descending
//! into paragraphs, headings, roles or directives — none of which can hold
//! definitions belonging to this scope). The second resolves: an unresolved
//! role gets its children from the role table; a fenced code node whose
//! language tag matches `{name}` is replaced by the directive resolution
//! result, and the replacement subtree is reprocessed recursively with
//! copies of the identifier sets, so identifiers defined inside it stay
//! invisible to its siblings while everything visible at entry remains
//! visible inside.
//!
//! Resolution can synthesize nodes that are themselves roles or directives;
//! a depth counter bounds that recursion, substituting an error node when
//! the cap is hit so a self-referential directive cannot exhaust the stack.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use weft_ast::{ErrorNode, Node, Visit, visit};

use crate::deconstruct::{RawDirective, deconstruct};
use crate::logger::{LogProps, Logger};
use crate::nested::NestedParser;
use crate::registry::{Directive, RawRole, ResolveContext, Role, State};

/// A fenced code language tag naming a directive: `{name}`.
static DIRECTIVE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\{([^\s}]+)\}$").unwrap());

/// Shared tables and limits for one resolution run.
pub(crate) struct Resolver<'a> {
    pub roles: &'a HashMap<String, Arc<dyn Role>>,
    pub directives: &'a HashMap<String, Arc<dyn Directive>>,
    pub nested: &'a NestedParser,
    pub max_depth: usize,
}

impl Resolver<'_> {
    /// Process one scope: collect identifiers, then resolve.
    pub(crate) fn process(
        &self,
        tree: &mut Node,
        state: &mut State,
        logger: &Logger,
        mut definitions: BTreeSet<String>,
        mut footnotes: BTreeSet<String>,
        depth: usize,
    ) {
        collect_identifiers(tree, &mut definitions, &mut footnotes, logger);
        self.resolve_children(tree, state, logger, &definitions, &footnotes, depth);
    }

    fn resolve_children(
        &self,
        parent: &mut Node,
        state: &mut State,
        logger: &Logger,
        definitions: &BTreeSet<String>,
        footnotes: &BTreeSet<String>,
        depth: usize,
    ) {
        let Some(len) = parent.children().map(<[Node]>::len) else {
            return;
        };
        for index in 0..len {
            let children = parent
                .children_mut()
                .expect("children length was just read");
            let child = &mut children[index];
            match &mut *child {
                Node::Role(role) => {
                    if role.children.is_some() {
                        // already resolved, possibly by the resolution that
                        // synthesized it
                        continue;
                    }
                    if depth >= self.max_depth {
                        let message = format!(
                            "maximum resolution depth ({}) exceeded",
                            self.max_depth
                        );
                        logger.error(&message, LogProps::at(role.position));
                        role.children = Some(vec![Node::Error(ErrorNode {
                            value: message,
                            position: role.position,
                            ..Default::default()
                        })]);
                        continue;
                    }
                    let raw = RawRole {
                        name: role.name.clone(),
                        value: role.value.clone(),
                        position: role.position,
                    };
                    let resolved =
                        self.run_role(&raw, state, logger, definitions, footnotes);
                    role.children = Some(resolved);
                    // descend into the fresh children: resolution may have
                    // produced further roles, which must converge, not loop
                    self.resolve_children(child, state, logger, definitions, footnotes, depth + 1);
                }
                Node::Code(code) => {
                    let Some(name) = code
                        .lang
                        .as_deref()
                        .and_then(|lang| DIRECTIVE_NAME.captures(lang))
                        .map(|captures| captures[1].to_owned())
                    else {
                        continue;
                    };
                    let raw = RawDirective {
                        name,
                        meta: code.meta.clone(),
                        value: code.value.clone(),
                        position: code.position,
                    };
                    let replacement = if depth >= self.max_depth {
                        let message = format!(
                            "maximum resolution depth ({}) exceeded",
                            self.max_depth
                        );
                        logger.error(&message, LogProps::at(raw.position));
                        Node::Error(ErrorNode {
                            value: message,
                            position: raw.position,
                            ..Default::default()
                        })
                    } else {
                        let mut node =
                            self.run_directive(&raw, state, logger, definitions, footnotes);
                        // fresh copies: identifiers defined inside must not
                        // leak to siblings
                        self.process(
                            &mut node,
                            state,
                            logger,
                            definitions.clone(),
                            footnotes.clone(),
                            depth + 1,
                        );
                        node
                    };
                    *child = replacement;
                }
                _ => {
                    self.resolve_children(child, state, logger, definitions, footnotes, depth);
                }
            }
        }
    }

    fn run_role(
        &self,
        raw: &RawRole,
        state: &mut State,
        logger: &Logger,
        definitions: &BTreeSet<String>,
        footnotes: &BTreeSet<String>,
    ) -> Vec<Node> {
        let Some(role) = self.roles.get(&raw.name) else {
            let message = format!("Unknown role: {}", raw.name);
            logger.error(&message, LogProps::at(raw.position));
            return vec![Node::Error(ErrorNode {
                value: message,
                position: raw.position,
                ..Default::default()
            })];
        };
        tracing::debug!(name = %raw.name, "resolving role");
        let mut ctx = ResolveContext {
            state,
            logger,
            definitions,
            footnotes,
            nested: self.nested,
        };
        role.run(raw, &mut ctx)
    }

    fn run_directive(
        &self,
        raw: &RawDirective,
        state: &mut State,
        logger: &Logger,
        definitions: &BTreeSet<String>,
        footnotes: &BTreeSet<String>,
    ) -> Node {
        let Some(directive) = self.directives.get(&raw.name) else {
            let message = format!("Unknown directive: {}", raw.name);
            logger.error(&message, LogProps::at(raw.position));
            return Node::Error(ErrorNode {
                value: message,
                position: raw.position,
                ..Default::default()
            });
        };
        tracing::debug!(name = %raw.name, "resolving directive");
        let data = match deconstruct(raw, &directive.spec()) {
            Ok(data) => data,
            Err(error) => {
                let message = format!("Parsing directive: {error}");
                logger.error(&message, LogProps::at(raw.position));
                return Node::Error(ErrorNode {
                    value: message,
                    position: raw.position,
                    ..Default::default()
                });
            }
        };
        let mut node = weft_ast::Directive {
            name: raw.name.clone(),
            args: data.args,
            options: data.options,
            value: data.body,
            body_offset: data.body_offset,
            position: raw.position,
            ..Default::default()
        };
        let mut ctx = ResolveContext {
            state,
            logger,
            definitions,
            footnotes,
            nested: self.nested,
        };
        node.children = directive.run(&node, &mut ctx);
        Node::Directive(node)
    }
}

/// Collect definition/footnote identifiers visible at this scope.
///
/// The scope root is always entered (it may itself be the directive being
/// reprocessed); the role/directive skip applies to interior nodes, which
/// belong to their own scopes.
fn collect_identifiers(
    tree: &Node,
    definitions: &mut BTreeSet<String>,
    footnotes: &mut BTreeSet<String>,
    logger: &Logger,
) {
    let Some(children) = tree.children() else {
        return;
    };
    for child in children {
        collect_from(child, definitions, footnotes, logger);
    }
}

fn collect_from(
    tree: &Node,
    definitions: &mut BTreeSet<String>,
    footnotes: &mut BTreeSet<String>,
    logger: &Logger,
) {
    visit(tree, &mut |node| match node {
        // these cannot hold definitions belonging to this scope
        Node::Paragraph(_) | Node::Heading(_) | Node::Role(_) | Node::Directive(_) => Visit::Skip,
        Node::Definition(definition) => {
            if !definitions.insert(definition.identifier.clone()) {
                logger.warning(
                    format!(
                        "duplicate definition identifier: {}",
                        definition.identifier
                    ),
                    LogProps::at(definition.position),
                );
            }
            Visit::Skip
        }
        Node::FootnoteDefinition(definition) => {
            if !footnotes.insert(definition.identifier.clone()) {
                logger.warning(
                    format!("duplicate footnote identifier: {}", definition.identifier),
                    LogProps::at(definition.position),
                );
            }
            Visit::Skip
        }
        _ => Visit::Continue,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_ast::{Definition, Root};

    #[test]
    fn test_directive_name_pattern() {
        assert_eq!(&DIRECTIVE_NAME.captures("{note}").unwrap()[1], "note");
        assert_eq!(
            &DIRECTIVE_NAME.captures("{code-block}").unwrap()[1],
            "code-block"
        );
        assert!(DIRECTIVE_NAME.captures("rust").is_none());
        assert!(DIRECTIVE_NAME.captures("{a b}").is_none());
        assert!(DIRECTIVE_NAME.captures("{}").is_none());
        assert!(DIRECTIVE_NAME.captures("{note} x").is_none());
    }

    #[test]
    fn test_collect_identifiers_warns_on_duplicates() {
        let definition = |label: &str| {
            Node::Definition(Definition {
                identifier: label.to_owned(),
                label: label.to_owned(),
                url: "x".to_owned(),
                ..Default::default()
            })
        };
        let tree = Node::Root(Root {
            children: vec![definition("a"), definition("a")],
            position: None,
        });
        let logger = Logger::new();
        let mut definitions = BTreeSet::new();
        let mut footnotes = BTreeSet::new();
        collect_identifiers(&tree, &mut definitions, &mut footnotes, &logger);
        assert_eq!(definitions.len(), 1);
        assert_eq!(logger.diagnostics().len(), 1);
    }
}
