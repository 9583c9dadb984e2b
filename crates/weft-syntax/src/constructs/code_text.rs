//! The inline code span construct (text).
//!
//! A run of backticks, content, and a closing run of exactly the same
//! length. Backtick runs of a different length inside the span are content.
//! Line endings are allowed inside the span; end of input before the
//! closing run rejects the whole span.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

pub(crate) fn code_text(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(
        tk.current(),
        Some('`'),
        "code span requires a backtick trigger"
    );
    tk.enter(TokenType::CodeText);
    tk.enter(TokenType::CodeTextSequence);
    let mut open = 0;
    while tk.current() == Some('`') {
        tk.consume();
        open += 1;
    }
    tk.exit(TokenType::CodeTextSequence);

    loop {
        match tk.current() {
            None => return Err(Reject),
            Some('\n') => {
                tk.enter(TokenType::LineEnding);
                tk.consume();
                tk.exit(TokenType::LineEnding);
            }
            Some('`') => {
                if tk.attempt(|tk| closing_sequence(tk, open)).is_ok() {
                    tk.exit(TokenType::CodeText);
                    return Ok(());
                }
                // a run of the wrong length is literal content
                tk.enter(TokenType::CodeTextData);
                while tk.current() == Some('`') {
                    tk.consume();
                }
                tk.exit(TokenType::CodeTextData);
            }
            Some(_) => {
                tk.enter(TokenType::CodeTextData);
                while !matches!(tk.current(), None | Some('`' | '\n')) {
                    tk.consume();
                }
                tk.exit(TokenType::CodeTextData);
            }
        }
    }
}

fn closing_sequence(tk: &mut Tokenizer, open: usize) -> ConstructResult {
    tk.enter(TokenType::CodeTextSequence);
    let mut size = 0;
    while tk.current() == Some('`') {
        tk.consume();
        size += 1;
    }
    if size == open {
        tk.exit(TokenType::CodeTextSequence);
        Ok(())
    } else {
        Err(Reject)
    }
}
