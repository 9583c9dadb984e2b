//! The `%` comment construct (flow).
//!
//! A comment runs from the marker to the end of the line and continues onto
//! the next line when, after the line ending and at most three spaces of
//! indentation, another `%` marker appears. The whole comment is one token
//! spanning all continuation lines; each continuation is validated
//! independently by a partial construct, so a line that does not continue
//! the comment is left entirely unconsumed.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

enum State {
    AfterMarker,
    Content,
}

/// Tokenize a comment. Never rejects: a lone `%` is already a comment.
pub(crate) fn comment(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(tk.current(), Some('%'), "comment requires a `%` trigger");
    tk.enter(TokenType::Comment);
    marker(tk);
    let mut state = State::AfterMarker;
    loop {
        state = match state {
            State::AfterMarker => match tk.current() {
                None => {
                    tk.exit(TokenType::Comment);
                    return Ok(());
                }
                Some('\n') => {
                    if tk.attempt(next_line).is_ok() {
                        State::AfterMarker
                    } else {
                        tk.exit(TokenType::Comment);
                        return Ok(());
                    }
                }
                Some(_) => {
                    tk.enter(TokenType::ChunkString);
                    State::Content
                }
            },
            State::Content => match tk.current() {
                None => {
                    tk.exit(TokenType::ChunkString);
                    tk.exit(TokenType::Comment);
                    return Ok(());
                }
                Some('\n') => {
                    tk.exit(TokenType::ChunkString);
                    if tk.attempt(next_line).is_ok() {
                        State::AfterMarker
                    } else {
                        tk.exit(TokenType::Comment);
                        return Ok(());
                    }
                }
                Some(_) => {
                    tk.consume();
                    State::Content
                }
            },
        };
    }
}

fn marker(tk: &mut Tokenizer) {
    tk.enter(TokenType::CommentMarker);
    tk.consume();
    tk.exit(TokenType::CommentMarker);
}

/// Partial construct: a line ending followed by an indented `%` marker.
fn next_line(tk: &mut Tokenizer) -> ConstructResult {
    tk.enter(TokenType::LineEnding);
    tk.consume();
    tk.exit(TokenType::LineEnding);
    tk.eat_whitespace(TokenType::Whitespace, Some(3));
    if tk.current() == Some('%') {
        marker(tk);
        Ok(())
    } else {
        Err(Reject)
    }
}
