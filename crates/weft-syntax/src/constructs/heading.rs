//! The ATX heading construct (flow).
//!
//! One to six `#` characters followed by a space or the end of the line.
//! The rest of the line is inline content, so roles and code spans inside
//! headings tokenize normally. Disabled for nested parses.

use crate::event::TokenType;
use crate::parser::{Constructs, text_line};
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

pub(crate) fn heading(tk: &mut Tokenizer, constructs: &Constructs) -> ConstructResult {
    debug_assert_eq!(tk.current(), Some('#'), "heading requires a `#` trigger");
    tk.enter(TokenType::AtxHeading);
    tk.enter(TokenType::AtxHeadingSequence);
    let mut depth = 0;
    while tk.current() == Some('#') {
        if depth == 6 {
            return Err(Reject);
        }
        tk.consume();
        depth += 1;
    }
    tk.exit(TokenType::AtxHeadingSequence);
    match tk.current() {
        None | Some('\n') => {
            tk.exit(TokenType::AtxHeading);
            Ok(())
        }
        Some(' ' | '\t') => {
            tk.eat_whitespace(TokenType::Whitespace, None);
            text_line(tk, constructs);
            tk.exit(TokenType::AtxHeading);
            Ok(())
        }
        // `#word` is paragraph text, not a heading
        Some(_) => Err(Reject),
    }
}
