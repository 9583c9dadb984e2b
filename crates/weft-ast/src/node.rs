//! The closed set of tree node variants.
//!
//! Variants mirror the document vocabulary: CommonMark-style leaf and
//! container nodes, the extension constructs (comment, target, role,
//! thematic break with metadata), the resolved directive/role containers and
//! the node kinds produced by the built-in roles and directives.
//!
//! Every variant carries an optional [`Position`]; addressable variants also
//! carry an `identifiers` list, populated by target propagation and by the
//! `name` directive option. The only variants without identifier support are
//! the structural root and the invisible ones (comments, targets) plus
//! frontmatter, which nothing can label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_id;
use crate::position::Position;

/// A node in the document tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Root(Root),
    Text(Text),
    Paragraph(Paragraph),
    Heading(Heading),
    Code(Code),
    InlineCode(InlineCode),
    Comment(Comment),
    ThematicBreak(ThematicBreak),
    Target(Target),
    Role(Role),
    Directive(Directive),
    Definition(Definition),
    FootnoteDefinition(FootnoteDefinition),
    Frontmatter(Frontmatter),
    Link(Link),
    LinkReference(LinkReference),
    Image(Image),
    ImageReference(ImageReference),
    Footnote(Footnote),
    TableCell(TableCell),
    Admonition(Admonition),
    Title(Title),
    Container(Container),
    Caption(Caption),
    Math(Math),
    InlineMath(InlineMath),
    CrossReference(CrossReference),
    Error(ErrorNode),
    Emphasis(Emphasis),
    Strong(Strong),
    Literal(Literal),
    Subscript(Subscript),
    Superscript(Superscript),
    Abbreviation(Abbreviation),
    Acronym(Acronym),
}

/// Document root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Plain text run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// ATX heading, depth 1..=6.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub depth: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Fenced code block.
///
/// `lang` is the first word of the info string, `meta` the remainder. The
/// code directive additionally populates the display fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_line_numbers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_line_number: Option<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Inline code span.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineCode {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A `%`-prefixed comment, invisible to rendering and target propagation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A `+++` break; trailing content on the marker line is kept as `meta`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThematicBreak {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A `(label)=` target definition.
///
/// Left in the tree after propagation (classified invisible); the normalized
/// `identifier` is what propagates to the next addressable node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub label: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A `{name}`content`` role.
///
/// `children` is `None` until the resolution pass runs; a role with children
/// set is terminal and skipped on re-visit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A resolved directive container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_yaml::Value>,
    pub value: String,
    pub body_offset: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Link reference definition: `[label]: url`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub identifier: String,
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Footnote definition: `[^label]: content`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FootnoteDefinition {
    pub identifier: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Raw YAML frontmatter block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkReference {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// An image, including the docutils-style sizing options the image and
/// figure directives accept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Inline footnote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Admonition box (note, warning, ...); first child is its [`Title`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Admonition {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Title of an admonition, phrasing children only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Title {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Generic block container (figure, captioned code).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Caption of a figure or code container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Display math block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Math {
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nowrap: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineMath {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A deferred reference to a target elsewhere in the document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossReference {
    /// Normalized identifier of the referenced target.
    pub target: String,
    /// Whether display text was given explicitly (`text <target>` form).
    pub explicit: bool,
    pub domain: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// In-tree recovery node replacing a construct that failed to resolve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorNode {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Strong {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Superscript {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Abbreviation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Acronym {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    /// The serialized type tag of this variant.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Node::Root(_) => "root",
            Node::Text(_) => "text",
            Node::Paragraph(_) => "paragraph",
            Node::Heading(_) => "heading",
            Node::Code(_) => "code",
            Node::InlineCode(_) => "inlineCode",
            Node::Comment(_) => "comment",
            Node::ThematicBreak(_) => "thematicBreak",
            Node::Target(_) => "target",
            Node::Role(_) => "role",
            Node::Directive(_) => "directive",
            Node::Definition(_) => "definition",
            Node::FootnoteDefinition(_) => "footnoteDefinition",
            Node::Frontmatter(_) => "frontmatter",
            Node::Link(_) => "link",
            Node::LinkReference(_) => "linkReference",
            Node::Image(_) => "image",
            Node::ImageReference(_) => "imageReference",
            Node::Footnote(_) => "footnote",
            Node::TableCell(_) => "tableCell",
            Node::Admonition(_) => "admonition",
            Node::Title(_) => "title",
            Node::Container(_) => "container",
            Node::Caption(_) => "caption",
            Node::Math(_) => "math",
            Node::InlineMath(_) => "inlineMath",
            Node::CrossReference(_) => "crossReference",
            Node::Error(_) => "error",
            Node::Emphasis(_) => "emphasis",
            Node::Strong(_) => "strong",
            Node::Literal(_) => "literal",
            Node::Subscript(_) => "subscript",
            Node::Superscript(_) => "superscript",
            Node::Abbreviation(_) => "abbreviation",
            Node::Acronym(_) => "acronym",
        }
    }

    /// The source span, if the node carries one.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        self.position_slot().as_ref()
    }

    /// Mutable access to the position slot.
    pub fn position_mut(&mut self) -> &mut Option<Position> {
        match self {
            Node::Root(n) => &mut n.position,
            Node::Text(n) => &mut n.position,
            Node::Paragraph(n) => &mut n.position,
            Node::Heading(n) => &mut n.position,
            Node::Code(n) => &mut n.position,
            Node::InlineCode(n) => &mut n.position,
            Node::Comment(n) => &mut n.position,
            Node::ThematicBreak(n) => &mut n.position,
            Node::Target(n) => &mut n.position,
            Node::Role(n) => &mut n.position,
            Node::Directive(n) => &mut n.position,
            Node::Definition(n) => &mut n.position,
            Node::FootnoteDefinition(n) => &mut n.position,
            Node::Frontmatter(n) => &mut n.position,
            Node::Link(n) => &mut n.position,
            Node::LinkReference(n) => &mut n.position,
            Node::Image(n) => &mut n.position,
            Node::ImageReference(n) => &mut n.position,
            Node::Footnote(n) => &mut n.position,
            Node::TableCell(n) => &mut n.position,
            Node::Admonition(n) => &mut n.position,
            Node::Title(n) => &mut n.position,
            Node::Container(n) => &mut n.position,
            Node::Caption(n) => &mut n.position,
            Node::Math(n) => &mut n.position,
            Node::InlineMath(n) => &mut n.position,
            Node::CrossReference(n) => &mut n.position,
            Node::Error(n) => &mut n.position,
            Node::Emphasis(n) => &mut n.position,
            Node::Strong(n) => &mut n.position,
            Node::Literal(n) => &mut n.position,
            Node::Subscript(n) => &mut n.position,
            Node::Superscript(n) => &mut n.position,
            Node::Abbreviation(n) => &mut n.position,
            Node::Acronym(n) => &mut n.position,
        }
    }

    fn position_slot(&self) -> &Option<Position> {
        match self {
            Node::Root(n) => &n.position,
            Node::Text(n) => &n.position,
            Node::Paragraph(n) => &n.position,
            Node::Heading(n) => &n.position,
            Node::Code(n) => &n.position,
            Node::InlineCode(n) => &n.position,
            Node::Comment(n) => &n.position,
            Node::ThematicBreak(n) => &n.position,
            Node::Target(n) => &n.position,
            Node::Role(n) => &n.position,
            Node::Directive(n) => &n.position,
            Node::Definition(n) => &n.position,
            Node::FootnoteDefinition(n) => &n.position,
            Node::Frontmatter(n) => &n.position,
            Node::Link(n) => &n.position,
            Node::LinkReference(n) => &n.position,
            Node::Image(n) => &n.position,
            Node::ImageReference(n) => &n.position,
            Node::Footnote(n) => &n.position,
            Node::TableCell(n) => &n.position,
            Node::Admonition(n) => &n.position,
            Node::Title(n) => &n.position,
            Node::Container(n) => &n.position,
            Node::Caption(n) => &n.position,
            Node::Math(n) => &n.position,
            Node::InlineMath(n) => &n.position,
            Node::CrossReference(n) => &n.position,
            Node::Error(n) => &n.position,
            Node::Emphasis(n) => &n.position,
            Node::Strong(n) => &n.position,
            Node::Literal(n) => &n.position,
            Node::Subscript(n) => &n.position,
            Node::Superscript(n) => &n.position,
            Node::Abbreviation(n) => &n.position,
            Node::Acronym(n) => &n.position,
        }
    }

    /// Child nodes of a container variant.
    ///
    /// Returns `None` for leaves and for an unresolved role.
    #[must_use]
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(n) => Some(&n.children),
            Node::Paragraph(n) => Some(&n.children),
            Node::Heading(n) => Some(&n.children),
            Node::Role(n) => n.children.as_deref(),
            Node::Directive(n) => Some(&n.children),
            Node::FootnoteDefinition(n) => Some(&n.children),
            Node::Link(n) => Some(&n.children),
            Node::LinkReference(n) => Some(&n.children),
            Node::Footnote(n) => Some(&n.children),
            Node::TableCell(n) => Some(&n.children),
            Node::Admonition(n) => Some(&n.children),
            Node::Title(n) => Some(&n.children),
            Node::Container(n) => Some(&n.children),
            Node::Caption(n) => Some(&n.children),
            Node::CrossReference(n) => Some(&n.children),
            Node::Emphasis(n) => Some(&n.children),
            Node::Strong(n) => Some(&n.children),
            Node::Literal(n) => Some(&n.children),
            Node::Subscript(n) => Some(&n.children),
            Node::Superscript(n) => Some(&n.children),
            Node::Abbreviation(n) => Some(&n.children),
            Node::Acronym(n) => Some(&n.children),
            _ => None,
        }
    }

    /// Mutable child access; same variants as [`Node::children`].
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(n) => Some(&mut n.children),
            Node::Paragraph(n) => Some(&mut n.children),
            Node::Heading(n) => Some(&mut n.children),
            Node::Role(n) => n.children.as_mut(),
            Node::Directive(n) => Some(&mut n.children),
            Node::FootnoteDefinition(n) => Some(&mut n.children),
            Node::Link(n) => Some(&mut n.children),
            Node::LinkReference(n) => Some(&mut n.children),
            Node::Footnote(n) => Some(&mut n.children),
            Node::TableCell(n) => Some(&mut n.children),
            Node::Admonition(n) => Some(&mut n.children),
            Node::Title(n) => Some(&mut n.children),
            Node::Container(n) => Some(&mut n.children),
            Node::Caption(n) => Some(&mut n.children),
            Node::CrossReference(n) => Some(&mut n.children),
            Node::Emphasis(n) => Some(&mut n.children),
            Node::Strong(n) => Some(&mut n.children),
            Node::Literal(n) => Some(&mut n.children),
            Node::Subscript(n) => Some(&mut n.children),
            Node::Superscript(n) => Some(&mut n.children),
            Node::Abbreviation(n) => Some(&mut n.children),
            Node::Acronym(n) => Some(&mut n.children),
            _ => None,
        }
    }

    /// Mutable access to the identifier list of an addressable node.
    pub fn identifiers_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Node::Root(_) | Node::Comment(_) | Node::Target(_) | Node::Frontmatter(_) => None,
            Node::Text(n) => Some(&mut n.identifiers),
            Node::Paragraph(n) => Some(&mut n.identifiers),
            Node::Heading(n) => Some(&mut n.identifiers),
            Node::Code(n) => Some(&mut n.identifiers),
            Node::InlineCode(n) => Some(&mut n.identifiers),
            Node::ThematicBreak(n) => Some(&mut n.identifiers),
            Node::Role(n) => Some(&mut n.identifiers),
            Node::Directive(n) => Some(&mut n.identifiers),
            Node::Definition(n) => Some(&mut n.identifiers),
            Node::FootnoteDefinition(n) => Some(&mut n.identifiers),
            Node::Link(n) => Some(&mut n.identifiers),
            Node::LinkReference(n) => Some(&mut n.identifiers),
            Node::Image(n) => Some(&mut n.identifiers),
            Node::ImageReference(n) => Some(&mut n.identifiers),
            Node::Footnote(n) => Some(&mut n.identifiers),
            Node::TableCell(n) => Some(&mut n.identifiers),
            Node::Admonition(n) => Some(&mut n.identifiers),
            Node::Title(n) => Some(&mut n.identifiers),
            Node::Container(n) => Some(&mut n.identifiers),
            Node::Caption(n) => Some(&mut n.identifiers),
            Node::Math(n) => Some(&mut n.identifiers),
            Node::InlineMath(n) => Some(&mut n.identifiers),
            Node::CrossReference(n) => Some(&mut n.identifiers),
            Node::Error(n) => Some(&mut n.identifiers),
            Node::Emphasis(n) => Some(&mut n.identifiers),
            Node::Strong(n) => Some(&mut n.identifiers),
            Node::Literal(n) => Some(&mut n.identifiers),
            Node::Subscript(n) => Some(&mut n.identifiers),
            Node::Superscript(n) => Some(&mut n.identifiers),
            Node::Abbreviation(n) => Some(&mut n.identifiers),
            Node::Acronym(n) => Some(&mut n.identifiers),
        }
    }

    /// Attach a normalized identifier to this node.
    ///
    /// Duplicate identifiers are dropped; distinct identifiers accumulate in
    /// attachment order. Returns `false` when the variant does not support
    /// identifiers.
    pub fn add_identifier(&mut self, label: &str) -> bool {
        let id = normalize_id(label);
        match self.identifiers_mut() {
            Some(ids) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
                true
            }
            None => false,
        }
    }

    /// Whether the node's children are phrasing content only.
    ///
    /// Block constructs (targets, definitions) cannot appear inside these,
    /// so tree passes skip descending into them.
    #[must_use]
    pub fn is_phrasing_container(&self) -> bool {
        matches!(
            self,
            Node::Paragraph(_)
                | Node::Heading(_)
                | Node::Footnote(_)
                | Node::TableCell(_)
                | Node::Link(_)
                | Node::LinkReference(_)
        )
    }

    /// Whether the node is invisible to target propagation.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        matches!(self, Node::Target(_) | Node::Comment(_))
    }

    /// Strip every position in this subtree.
    pub fn strip_positions(&mut self) {
        crate::visit::visit_mut(self, &mut |node| {
            *node.position_mut() = None;
            crate::visit::Visit::Continue
        });
    }

    /// Shift every position in this subtree by whole lines/columns.
    ///
    /// Character offsets are dropped: they index the embedded text a nested
    /// parse consumed, not the enclosing document.
    pub fn offset_positions(&mut self, lines: usize, columns: usize) {
        crate::visit::visit_mut(self, &mut |node| {
            if let Some(position) = node.position_mut() {
                position.shift(lines, columns);
            }
            crate::visit::Visit::Continue
        });
    }
}
