//! Token event to syntax tree conversion.
//!
//! Replays an enter/exit event stream in order through stateless per-type
//! handlers. Enter handlers push container nodes; exit handlers finalize
//! them: buffered raw text collapses into fields (a comment's content, a
//! target's label, an inline code span's value) and derived fields are
//! normalized (a target's identifier from its raw label).
//!
//! Shape mismatches between tokenizer output and the converters — an exit
//! without its enter, a role without exactly one inline code child — are
//! tokenizer/converter contract violations and panic; they are not
//! user-facing parse errors.

use weft_ast::{
    Code, Comment, Definition, FootnoteDefinition, Frontmatter, Heading, InlineCode, Node,
    Paragraph, Point, Position, Role, Root, Target, Text, ThematicBreak, normalize_id,
};
use weft_syntax::{Event, EventKind, Source, TokenType};

/// Compile a document event stream into a [`Node::Root`] tree.
#[must_use]
pub fn compile(events: &[Event], source: &Source) -> Node {
    Compiler::new(source, false).run(events)
}

/// Compile a phrasing-only event stream into a node sequence.
///
/// Line endings at the top level become text, matching their meaning inside
/// a paragraph.
#[must_use]
pub fn compile_inline(events: &[Event], source: &Source) -> Vec<Node> {
    let root = Compiler::new(source, true).run(events);
    match root {
        Node::Root(root) => root.children,
        _ => unreachable!("compiler always produces a root"),
    }
}

/// Pending plain-text run, merged across adjacent data tokens.
struct TextBuffer {
    value: String,
    start: Point,
    end: Point,
}

/// Line-oriented raw content assembly for fenced and multi-line tokens.
#[derive(Default)]
struct RawBuffer {
    lines: Vec<String>,
    current: String,
    started: bool,
    fences: usize,
}

impl RawBuffer {
    fn push_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    /// Value for fence-delimited content (code, frontmatter): the first
    /// line ending only starts the body, and a closed fence has already
    /// pushed the final line.
    fn fenced_value(mut self) -> String {
        if self.fences < 2 {
            self.push_line();
        }
        self.lines.join("\n")
    }

    /// Value for marker-continued content (comments): every line ending
    /// separates lines and the final line is still pending.
    fn continued_value(mut self) -> String {
        self.push_line();
        self.lines.join("\n")
    }
}

/// Fields sliced out of fence and definition sub-tokens, pending the exit
/// of their composite token.
#[derive(Default)]
struct Pending {
    code_lang: Option<String>,
    code_meta: Option<String>,
    definition_label: Option<String>,
    definition_destination: Option<String>,
    target_label: Option<String>,
    chunk_span: Option<Position>,
}

struct Compiler<'a> {
    source: &'a Source,
    inline: bool,
    /// Open container nodes; the root sits at the bottom.
    stack: Vec<Node>,
    /// Open tokens mirroring the tokenizer's nesting, with start points.
    tokens: Vec<(TokenType, Point)>,
    text: Option<TextBuffer>,
    raw: Option<RawBuffer>,
    inline_code: Option<String>,
    role_names: Vec<String>,
    pending: Pending,
}

impl<'a> Compiler<'a> {
    fn new(source: &'a Source, inline: bool) -> Self {
        Self {
            source,
            inline,
            stack: vec![Node::Root(Root::default())],
            tokens: Vec::new(),
            text: None,
            raw: None,
            inline_code: None,
            role_names: Vec::new(),
            pending: Pending::default(),
        }
    }

    fn run(mut self, events: &[Event]) -> Node {
        for event in events {
            match event.kind {
                EventKind::Enter => self.enter(event),
                EventKind::Exit => self.exit(event),
            }
        }
        self.flush_text();
        assert!(
            self.tokens.is_empty(),
            "event stream ended with open tokens"
        );
        let root = self.stack.pop().expect("root must remain on the stack");
        assert!(self.stack.is_empty(), "unclosed container nodes");
        root
    }

    fn enter(&mut self, event: &Event) {
        self.tokens.push((event.ty, event.point));
        match event.ty {
            TokenType::Paragraph => {
                self.flush_text();
                self.stack.push(Node::Paragraph(Paragraph::default()));
            }
            TokenType::AtxHeading => {
                self.flush_text();
                self.stack.push(Node::Heading(Heading::default()));
            }
            TokenType::Role => {
                self.flush_text();
                self.stack.push(Node::Role(Role {
                    children: Some(Vec::new()),
                    ..Default::default()
                }));
            }
            TokenType::Comment
            | TokenType::ThematicBreak
            | TokenType::CodeFenced
            | TokenType::Frontmatter
            | TokenType::FootnoteDefinition => {
                self.raw = Some(RawBuffer::default());
            }
            TokenType::CodeText => {
                self.inline_code = Some(String::new());
            }
            _ => {}
        }
    }

    fn exit(&mut self, event: &Event) {
        let (ty, start) = self.tokens.pop().expect("exit without a matching enter");
        assert_eq!(ty, event.ty, "event stream must nest");
        let span = Position::new(start, event.point);
        match event.ty {
            TokenType::Data => {
                let text = self.slice(&span);
                self.append_text(span, &text);
            }
            TokenType::LineEnding => self.line_ending(span),
            TokenType::Paragraph | TokenType::AtxHeading => self.close_container(span),
            TokenType::AtxHeadingSequence => {
                let depth = u8::try_from(self.span_len(&span)).expect("at most six markers");
                match self.stack.last_mut() {
                    Some(Node::Heading(heading)) => heading.depth = depth,
                    _ => unreachable!("heading sequence outside a heading"),
                }
            }
            TokenType::ChunkString | TokenType::FrontmatterChunk | TokenType::CodeFlowValue => {
                let text = self.slice(&span);
                let raw = self.raw.as_mut().expect("raw content outside its token");
                raw.current.push_str(&text);
                self.pending.chunk_span = Some(span);
            }
            TokenType::Comment => {
                let raw = self.raw.take().expect("comment without raw buffer");
                self.push_node(Node::Comment(Comment {
                    value: raw.continued_value(),
                    position: Some(span),
                }));
            }
            TokenType::ThematicBreak => {
                let raw = self.raw.take().expect("break without raw buffer");
                let meta = (!raw.current.is_empty()).then_some(raw.current);
                self.push_node(Node::ThematicBreak(ThematicBreak {
                    meta,
                    position: Some(span),
                    ..Default::default()
                }));
            }
            TokenType::Frontmatter => {
                let raw = self.raw.take().expect("frontmatter without raw buffer");
                self.push_node(Node::Frontmatter(Frontmatter {
                    value: raw.fenced_value(),
                    position: Some(span),
                }));
            }
            TokenType::CodeFencedFence | TokenType::FrontmatterFence => {
                if let Some(raw) = self.raw.as_mut() {
                    raw.fences += 1;
                }
            }
            TokenType::CodeFencedFenceInfo => {
                self.pending.code_lang = Some(self.slice(&span));
            }
            TokenType::CodeFencedFenceMeta => {
                self.pending.code_meta = Some(self.slice(&span));
            }
            TokenType::CodeFenced => {
                let raw = self.raw.take().expect("fenced code without raw buffer");
                let lang = self.pending.code_lang.take();
                let meta = self.pending.code_meta.take();
                self.push_node(Node::Code(Code {
                    lang,
                    meta,
                    value: raw.fenced_value(),
                    position: Some(span),
                    ..Default::default()
                }));
            }
            TokenType::CodeTextData => {
                let text = self.slice(&span);
                self.inline_code
                    .as_mut()
                    .expect("code text data outside a code span")
                    .push_str(&text);
            }
            TokenType::CodeText => {
                let value = strip_code_padding(
                    self.inline_code.take().expect("code span without buffer"),
                );
                self.push_node(Node::InlineCode(InlineCode {
                    value,
                    position: Some(span),
                    ..Default::default()
                }));
            }
            TokenType::RoleName => {
                self.role_names.push(self.slice(&span));
            }
            TokenType::Role => self.close_role(span),
            TokenType::TargetLabel => {
                self.pending.target_label = Some(self.slice(&span));
            }
            TokenType::Target => {
                let label = unescape_label(
                    &self
                        .pending
                        .target_label
                        .take()
                        .expect("target without a label token"),
                );
                self.push_node(Node::Target(Target {
                    identifier: normalize_id(&label),
                    label,
                    position: Some(span),
                }));
            }
            TokenType::DefinitionLabel => {
                self.pending.definition_label = Some(self.slice(&span));
            }
            TokenType::DefinitionDestination => {
                self.pending.definition_destination = Some(self.slice(&span));
            }
            TokenType::Definition => {
                let label = self
                    .pending
                    .definition_label
                    .take()
                    .expect("definition without a label token");
                let url = self
                    .pending
                    .definition_destination
                    .take()
                    .expect("definition without a destination token");
                self.push_node(Node::Definition(Definition {
                    identifier: normalize_id(&label),
                    label,
                    url,
                    position: Some(span),
                    ..Default::default()
                }));
            }
            TokenType::FootnoteDefinitionLabel => {
                self.pending.definition_label = Some(self.slice(&span));
            }
            TokenType::FootnoteDefinition => {
                let label = self
                    .pending
                    .definition_label
                    .take()
                    .expect("footnote definition without a label token");
                let raw = self.raw.take().expect("footnote without raw buffer");
                let content_span = self.pending.chunk_span.take();
                let children = if raw.current.is_empty() {
                    Vec::new()
                } else {
                    vec![Node::Paragraph(Paragraph {
                        children: vec![Node::Text(Text {
                            value: raw.current,
                            position: content_span,
                            ..Default::default()
                        })],
                        position: content_span,
                        ..Default::default()
                    })]
                };
                self.push_node(Node::FootnoteDefinition(FootnoteDefinition {
                    identifier: normalize_id(&label),
                    label,
                    children,
                    position: Some(span),
                    ..Default::default()
                }));
            }
            _ => {}
        }
    }

    /// Dispatch a line ending on its enclosing token.
    fn line_ending(&mut self, span: Position) {
        match self.tokens.last().map(|(ty, _)| *ty) {
            Some(TokenType::CodeText) => {
                self.inline_code
                    .as_mut()
                    .expect("code span without buffer")
                    .push(' ');
            }
            Some(ty @ (TokenType::Comment | TokenType::CodeFenced | TokenType::Frontmatter)) => {
                let continued = ty == TokenType::Comment;
                let raw = self.raw.as_mut().expect("raw content outside its token");
                if raw.started || continued {
                    raw.push_line();
                }
                raw.started = true;
            }
            Some(TokenType::Paragraph) => self.append_text(span, "\n"),
            None if self.inline => self.append_text(span, "\n"),
            _ => {}
        }
    }

    fn close_container(&mut self, span: Position) {
        self.flush_text();
        let mut node = self.stack.pop().expect("container exit without a node");
        *node.position_mut() = Some(span);
        self.push_node(node);
    }

    fn close_role(&mut self, span: Position) {
        self.flush_text();
        let node = self.stack.pop().expect("role exit without a node");
        let Node::Role(mut role) = node else {
            unreachable!("role exit must close a role node");
        };
        let children = role.children.take().expect("open role keeps children");
        let name = self
            .role_names
            .pop()
            .expect("role token must contain a name token");
        assert_eq!(
            children.len(),
            1,
            "role token must contain exactly one inline code span"
        );
        let Node::InlineCode(code) = &children[0] else {
            panic!("role content must be an inline code span");
        };
        role.name = name;
        role.value = code.value.clone();
        role.children = None;
        role.position = Some(span);
        self.push_node(Node::Role(role));
    }

    fn append_text(&mut self, span: Position, text: &str) {
        match &mut self.text {
            Some(buffer) => {
                buffer.value.push_str(text);
                buffer.end = span.end;
            }
            None => {
                self.text = Some(TextBuffer {
                    value: text.to_owned(),
                    start: span.start,
                    end: span.end,
                });
            }
        }
    }

    fn flush_text(&mut self) {
        if let Some(buffer) = self.text.take() {
            let node = Node::Text(Text {
                value: buffer.value,
                position: Some(Position::new(buffer.start, buffer.end)),
                ..Default::default()
            });
            self.append(node);
        }
    }

    fn push_node(&mut self, node: Node) {
        self.flush_text();
        self.append(node);
    }

    fn append(&mut self, node: Node) {
        self.stack
            .last_mut()
            .expect("a container is always open")
            .children_mut()
            .expect("top of stack must be a container")
            .push(node);
    }

    fn slice(&self, span: &Position) -> String {
        let start = span.start.offset.expect("tokenizer points carry offsets");
        let end = span.end.offset.expect("tokenizer points carry offsets");
        self.source.slice(start, end)
    }

    fn span_len(&self, span: &Position) -> usize {
        span.end.offset.expect("tokenizer points carry offsets")
            - span.start.offset.expect("tokenizer points carry offsets")
    }
}

/// Strip one space of padding from each side when both sides are padded and
/// the content is not all spaces.
fn strip_code_padding(value: String) -> String {
    if value.len() >= 2
        && value.starts_with(' ')
        && value.ends_with(' ')
        && value.chars().any(|c| c != ' ')
    {
        value[1..value.len() - 1].to_owned()
    } else {
        value
    }
}

/// Resolve the `\\` and `\)` escapes a target label admits.
fn unescape_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && matches!(chars.peek(), Some('\\' | ')')) {
            out.push(chars.next().expect("peeked"));
        } else {
            out.push(ch);
        }
    }
    out
}
