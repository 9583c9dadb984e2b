//! The scanning engine: position tracking, event emission, attempt/rollback.

use weft_ast::Point;

use crate::event::{Event, EventKind, TokenType};
use crate::source::Source;

/// Rejection of a construct attempt.
///
/// This is a control-flow signal, not an error: the dispatcher catches it
/// and tries the trigger character as something else (usually plain text).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reject;

/// Result of running a construct tokenizer to completion.
pub type ConstructResult = Result<(), Reject>;

/// The character-level scanner.
///
/// Holds the normalized source, the current point (line/column/offset) and
/// the events emitted so far. Construct tokenizers drive it through
/// [`enter`](Self::enter)/[`exit`](Self::exit)/[`consume`](Self::consume)
/// and compose through [`attempt`](Self::attempt), which guarantees that a
/// rejected sub-computation leaves no observable side effect.
pub struct Tokenizer<'a> {
    source: &'a Source,
    offset: usize,
    line: usize,
    column: usize,
    events: Vec<Event>,
    open: Vec<TokenType>,
}

/// Scanner state captured before a speculative attempt.
struct Snapshot {
    offset: usize,
    line: usize,
    column: usize,
    events: usize,
    open: usize,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(source: &'a Source) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            events: Vec::new(),
            open: Vec::new(),
        }
    }

    /// The character code at the scanner position; `None` at end of input.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.source.get(self.offset)
    }

    /// Look ahead `n` characters past the current one.
    #[must_use]
    pub fn peek(&self, n: usize) -> Option<char> {
        self.source.get(self.offset + n)
    }

    /// The current point in the source.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.line, self.column, self.offset)
    }

    /// The current character offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the scanner sits at end of input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Commit the current character code.
    ///
    /// # Panics
    ///
    /// Consuming past end of input is an engine-contract violation.
    pub fn consume(&mut self) {
        let code = self
            .current()
            .expect("tokenizer must not consume past end of input");
        self.offset += 1;
        if code == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Open a token span at the current point.
    pub fn enter(&mut self, ty: TokenType) {
        self.events.push(Event {
            kind: EventKind::Enter,
            ty,
            point: self.point(),
        });
        self.open.push(ty);
    }

    /// Close the innermost open token span.
    ///
    /// # Panics
    ///
    /// A type mismatch with the innermost open token is an
    /// engine-contract violation: events must nest.
    pub fn exit(&mut self, ty: TokenType) {
        let top = self
            .open
            .pop()
            .expect("exit without a matching open token");
        assert_eq!(top, ty, "exit type must match the innermost open token");
        self.events.push(Event {
            kind: EventKind::Exit,
            ty,
            point: self.point(),
        });
    }

    /// Run `construct` speculatively.
    ///
    /// On rejection the scanner position, the event stream and the
    /// open-token stack are restored to their state before the call — the
    /// attempt leaves no observable side effect. On success all effects are
    /// kept.
    pub fn attempt(
        &mut self,
        construct: impl FnOnce(&mut Self) -> ConstructResult,
    ) -> ConstructResult {
        let snapshot = self.snapshot();
        match construct(self) {
            Ok(()) => {
                debug_assert_eq!(
                    self.open.len(),
                    snapshot.open,
                    "construct must balance its enters and exits"
                );
                Ok(())
            }
            Err(Reject) => {
                self.restore(&snapshot);
                Err(Reject)
            }
        }
    }

    /// Run `construct` speculatively and roll back regardless of outcome.
    ///
    /// Used by the flow dispatcher to decide whether a line interrupts a
    /// paragraph before re-running the construct for real.
    pub fn check(&mut self, construct: impl FnOnce(&mut Self) -> ConstructResult) -> bool {
        let snapshot = self.snapshot();
        let outcome = construct(self);
        self.restore(&snapshot);
        outcome.is_ok()
    }

    /// Consume a run of spaces/tabs into a token of type `ty`.
    ///
    /// Consumes at most `max` characters when given. Emits no token for an
    /// empty run. Returns the number of characters consumed.
    pub fn eat_whitespace(&mut self, ty: TokenType, max: Option<usize>) -> usize {
        let mut eaten = 0;
        if matches!(self.current(), Some(' ' | '\t')) {
            self.enter(ty);
            while matches!(self.current(), Some(' ' | '\t')) {
                if max.is_some_and(|m| eaten >= m) {
                    break;
                }
                self.consume();
                eaten += 1;
            }
            self.exit(ty);
        }
        eaten
    }

    /// The events emitted so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Finish tokenizing and take the event stream.
    ///
    /// # Panics
    ///
    /// Unclosed tokens at end of input are an engine-contract violation.
    #[must_use]
    pub fn finish(self) -> Vec<Event> {
        assert!(
            self.open.is_empty(),
            "tokenizer finished with unclosed tokens: {:?}",
            self.open
        );
        self.events
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            offset: self.offset,
            line: self.line,
            column: self.column,
            events: self.events.len(),
            open: self.open.len(),
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.offset = snapshot.offset;
        self.line = snapshot.line;
        self.column = snapshot.column;
        self.events.truncate(snapshot.events);
        self.open.truncate(snapshot.open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_tracks_lines_and_columns() {
        let source = Source::new("ab\nc");
        let mut tk = Tokenizer::new(&source);
        assert_eq!(tk.point(), Point::new(1, 1, 0));
        tk.consume();
        tk.consume();
        assert_eq!(tk.point(), Point::new(1, 3, 2));
        tk.consume(); // line ending
        assert_eq!(tk.point(), Point::new(2, 1, 3));
    }

    #[test]
    fn test_attempt_rolls_back_on_reject() {
        let source = Source::new("abc");
        let mut tk = Tokenizer::new(&source);
        tk.consume();
        let before = tk.point();
        let result = tk.attempt(|tk| {
            tk.enter(TokenType::Data);
            tk.consume();
            tk.consume();
            Err(Reject)
        });
        assert_eq!(result, Err(Reject));
        assert_eq!(tk.point(), before);
        assert!(tk.events().is_empty());
    }

    #[test]
    fn test_attempt_keeps_effects_on_ok() {
        let source = Source::new("ab");
        let mut tk = Tokenizer::new(&source);
        let result = tk.attempt(|tk| {
            tk.enter(TokenType::Data);
            tk.consume();
            tk.exit(TokenType::Data);
            Ok(())
        });
        assert_eq!(result, Ok(()));
        assert_eq!(tk.events().len(), 2);
        assert_eq!(tk.point().offset, Some(1));
    }

    #[test]
    fn test_check_always_restores() {
        let source = Source::new("ab");
        let mut tk = Tokenizer::new(&source);
        let ok = tk.check(|tk| {
            tk.consume();
            Ok(())
        });
        assert!(ok);
        assert_eq!(tk.point().offset, Some(0));
    }

    #[test]
    #[should_panic(expected = "exit type must match")]
    fn test_mismatched_exit_panics() {
        let source = Source::new("a");
        let mut tk = Tokenizer::new(&source);
        tk.enter(TokenType::Data);
        tk.exit(TokenType::Paragraph);
    }

    #[test]
    fn test_eat_whitespace_respects_max() {
        let source = Source::new("     x");
        let mut tk = Tokenizer::new(&source);
        let eaten = tk.eat_whitespace(TokenType::Whitespace, Some(3));
        assert_eq!(eaten, 3);
        assert_eq!(tk.point().offset, Some(3));
    }

    #[test]
    fn test_eat_whitespace_empty_run_emits_nothing() {
        let source = Source::new("x");
        let mut tk = Tokenizer::new(&source);
        assert_eq!(tk.eat_whitespace(TokenType::Whitespace, None), 0);
        assert!(tk.events().is_empty());
    }
}
