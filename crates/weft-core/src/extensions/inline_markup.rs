//! Roles wrapping inline text in containers with semantic meaning.

use std::sync::LazyLock;

use regex::Regex;
use weft_ast::{
    Abbreviation, Acronym, Emphasis, Literal, Node, Strong, Subscript, Superscript, Text,
};

use crate::registry::{Extension, RawRole, ResolveContext, Role};

#[derive(Clone, Copy)]
enum Wrap {
    Abbreviation,
    Acronym,
    Literal,
    Emphasis,
    Strong,
    Subscript,
    Superscript,
}

struct WrapRole(Wrap);

impl Role for WrapRole {
    fn run(&self, role: &RawRole, _ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let children = vec![Node::Text(Text {
            value: role.value.clone(),
            ..Default::default()
        })];
        let node = match self.0 {
            Wrap::Abbreviation => Node::Abbreviation(Abbreviation {
                children,
                ..Default::default()
            }),
            Wrap::Acronym => Node::Acronym(Acronym {
                children,
                ..Default::default()
            }),
            Wrap::Literal => Node::Literal(Literal {
                children,
                ..Default::default()
            }),
            Wrap::Emphasis => Node::Emphasis(Emphasis {
                children,
                ..Default::default()
            }),
            Wrap::Strong => Node::Strong(Strong {
                children,
                ..Default::default()
            }),
            Wrap::Subscript => Node::Subscript(Subscript {
                children,
                ..Default::default()
            }),
            Wrap::Superscript => Node::Superscript(Superscript {
                children,
                ..Default::default()
            }),
        };
        vec![node]
    }
}

/// `CSS (Cascading Style Sheets)` — text with a parenthesized expansion.
static ABBR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\(([^()]+)\)$").unwrap());

struct AbbrRole;

impl Role for AbbrRole {
    fn run(&self, role: &RawRole, _ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let (content, title) = match ABBR_PATTERN.captures(&role.value) {
            Some(captures) => (
                captures[1].trim().to_owned(),
                Some(captures[2].trim().to_owned()),
            ),
            None => (role.value.trim().to_owned(), None),
        };
        vec![Node::Abbreviation(Abbreviation {
            title,
            children: vec![Node::Text(Text {
                value: content,
                ..Default::default()
            })],
            ..Default::default()
        })]
    }
}

/// The inline markup roles.
#[must_use]
pub fn inline_markup() -> Extension {
    Extension::new("inline-markup")
        .role("abbreviation", WrapRole(Wrap::Abbreviation))
        .role("acronym", WrapRole(Wrap::Acronym))
        .role("literal", WrapRole(Wrap::Literal))
        .role("emphasis", WrapRole(Wrap::Emphasis))
        .role("strong", WrapRole(Wrap::Strong))
        .role("subscript", WrapRole(Wrap::Subscript))
        .role("superscript", WrapRole(Wrap::Superscript))
        .role("abbr", AbbrRole)
}
