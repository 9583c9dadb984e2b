//! Token types and enter/exit events.

use weft_ast::Point;

/// The closed set of token type tags.
///
/// Tokens nest: composite tokens (e.g. [`TokenType::Role`]) contain marker
/// and content sub-tokens whose spans partition the composite span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A run of plain inline text.
    Data,
    /// One normalized line ending.
    LineEnding,
    /// A run of spaces/tabs carrying no meaning of its own.
    Whitespace,
    /// Raw content span inside a composite token (comment line, break
    /// metadata, footnote content).
    ChunkString,

    Paragraph,

    AtxHeading,
    AtxHeadingSequence,

    CodeText,
    CodeTextSequence,
    CodeTextData,

    CodeFenced,
    CodeFencedFence,
    CodeFencedFenceSequence,
    CodeFencedFenceInfo,
    CodeFencedFenceMeta,
    CodeFlowValue,

    Definition,
    DefinitionMarker,
    DefinitionLabel,
    DefinitionDestination,

    FootnoteDefinition,
    FootnoteDefinitionMarker,
    FootnoteDefinitionLabel,

    Frontmatter,
    FrontmatterFence,
    FrontmatterChunk,

    Comment,
    CommentMarker,

    Role,
    RoleMarker,
    RoleName,

    Target,
    TargetMarker,
    TargetLabel,

    ThematicBreak,
    ThematicBreakSequence,
}

/// Whether an event opens or closes a token span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Enter,
    Exit,
}

/// One enter or exit event.
///
/// An `Enter` carries the start point of the token; the matching `Exit`
/// carries its end point. For every enter there is a later exit of the same
/// type with no unmatched overlap — the engine enforces this stack
/// discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub ty: TokenType,
    pub point: Point,
}
