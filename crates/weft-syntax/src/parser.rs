//! Flow and text dispatch.
//!
//! The flow driver walks the document line by line: blank lines are
//! consumed structurally, then every enabled flow construct is attempted at
//! the line start (after up to three spaces of indentation); if none
//! matches, the line opens or continues a paragraph. Paragraph content is
//! tokenized in the text context, where roles and code spans are attempted
//! at their trigger characters and everything else becomes data.

use crate::constructs::code_fenced::code_fenced;
use crate::constructs::code_text::code_text;
use crate::constructs::comment::comment;
use crate::constructs::definition::{definition, footnote_definition};
use crate::constructs::frontmatter::frontmatter;
use crate::constructs::heading::heading;
use crate::constructs::role::role;
use crate::constructs::target::target;
use crate::constructs::thematic_break::thematic_break;
use crate::event::{Event, TokenType};
use crate::source::Source;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

/// The set of enabled constructs.
///
/// The flow/text tables are assembled from this; a disabled construct's
/// trigger character falls through to paragraph or data content.
#[derive(Clone, Debug)]
pub struct Constructs {
    pub comment: bool,
    pub role: bool,
    pub target: bool,
    pub thematic_break: bool,
    pub heading: bool,
    pub code_fenced: bool,
    pub code_text: bool,
    pub definition: bool,
    pub footnote_definition: bool,
    pub frontmatter: bool,
}

impl Default for Constructs {
    fn default() -> Self {
        Self {
            comment: true,
            role: true,
            target: true,
            thematic_break: true,
            heading: true,
            code_fenced: true,
            code_text: true,
            definition: true,
            footnote_definition: true,
            frontmatter: true,
        }
    }
}

impl Constructs {
    /// The restricted set used for parses embedded in directive bodies and
    /// role content: no frontmatter, no headings.
    #[must_use]
    pub fn nested() -> Self {
        Self {
            frontmatter: false,
            heading: false,
            ..Self::default()
        }
    }
}

/// Tokenize a document in the flow context.
#[must_use]
pub fn tokenize(source: &Source, constructs: &Constructs) -> Vec<Event> {
    tracing::trace!(chars = source.len(), "tokenizing document");
    let mut tk = Tokenizer::new(source);
    if constructs.frontmatter && tk.current() == Some('-') {
        let _ = tk.attempt(frontmatter);
    }
    document(&mut tk, constructs);
    tk.finish()
}

/// Tokenize phrasing content only (no block structure, no paragraph wrap).
#[must_use]
pub fn tokenize_inline(source: &Source, constructs: &Constructs) -> Vec<Event> {
    let mut tk = Tokenizer::new(source);
    loop {
        match tk.current() {
            None => break,
            Some('\n') => line_ending(&mut tk),
            Some(_) => text_line(&mut tk, constructs),
        }
    }
    tk.finish()
}

fn document(tk: &mut Tokenizer, constructs: &Constructs) {
    loop {
        match tk.current() {
            None => break,
            Some('\n') => line_ending(tk),
            Some(_) => {
                if tk.check(blank_rest) {
                    tk.eat_whitespace(TokenType::Whitespace, None);
                } else if tk.attempt(|tk| flow_construct(tk, constructs)).is_err() {
                    paragraph(tk, constructs);
                }
            }
        }
    }
}

/// One flow construct at a line start, behind up to three spaces of indent.
///
/// The whole thing runs inside one attempt, so a rejection also rolls the
/// indentation back and the paragraph sees the raw line.
fn flow_construct(tk: &mut Tokenizer, constructs: &Constructs) -> ConstructResult {
    tk.eat_whitespace(TokenType::Whitespace, Some(3));
    match tk.current() {
        Some('%') if constructs.comment => comment(tk),
        Some('(') if constructs.target => target(tk),
        Some('+') if constructs.thematic_break => thematic_break(tk),
        Some('#') if constructs.heading => heading(tk, constructs),
        Some('`' | '~') if constructs.code_fenced => code_fenced(tk),
        Some('[') => {
            if constructs.footnote_definition && tk.peek(1) == Some('^') {
                footnote_definition(tk)
            } else if constructs.definition {
                definition(tk)
            } else {
                Err(Reject)
            }
        }
        _ => Err(Reject),
    }
}

fn paragraph(tk: &mut Tokenizer, constructs: &Constructs) {
    tracing::trace!(line = tk.point().line, "paragraph");
    tk.enter(TokenType::Paragraph);
    loop {
        tk.eat_whitespace(TokenType::Whitespace, None);
        text_line(tk, constructs);
        if tk.is_eof() || next_line_ends_paragraph(tk, constructs) {
            break;
        }
        line_ending(tk);
    }
    tk.exit(TokenType::Paragraph);
}

/// Whether the line after the current line ending is blank or starts a flow
/// construct (which interrupts the paragraph). Pure lookahead.
fn next_line_ends_paragraph(tk: &mut Tokenizer, constructs: &Constructs) -> bool {
    tk.check(|tk| {
        tk.consume();
        blank_rest(tk)
    }) || tk.check(|tk| {
        tk.consume();
        flow_construct(tk, constructs)
    })
}

/// Whitespace only until the end of the line.
fn blank_rest(tk: &mut Tokenizer) -> ConstructResult {
    tk.eat_whitespace(TokenType::Whitespace, None);
    match tk.current() {
        None | Some('\n') => Ok(()),
        Some(_) => Err(Reject),
    }
}

/// Text context: roles and code spans at their triggers, data in between,
/// up to (not including) the end of the line.
pub(crate) fn text_line(tk: &mut Tokenizer, constructs: &Constructs) {
    loop {
        match tk.current() {
            None | Some('\n') => break,
            Some('{') if constructs.role => {
                if tk.attempt(role).is_err() {
                    data(tk, constructs, true);
                }
            }
            Some('`') if constructs.code_text => {
                if tk.attempt(code_text).is_err() {
                    data(tk, constructs, true);
                }
            }
            Some(_) => data(tk, constructs, false),
        }
    }
}

/// A run of plain text.
///
/// `force_first` consumes the current character unconditionally — used when
/// a trigger character just failed its construct and is literal text.
fn data(tk: &mut Tokenizer, constructs: &Constructs, force_first: bool) {
    tk.enter(TokenType::Data);
    if force_first {
        tk.consume();
    }
    loop {
        match tk.current() {
            None | Some('\n') => break,
            Some('{') if constructs.role => break,
            Some('`') if constructs.code_text => break,
            Some(_) => tk.consume(),
        }
    }
    tk.exit(TokenType::Data);
}

fn line_ending(tk: &mut Tokenizer) {
    tk.enter(TokenType::LineEnding);
    tk.consume();
    tk.exit(TokenType::LineEnding);
}
