//! The `{name}`content`` role construct (text).
//!
//! A marker `{`, one or more name characters, a marker `}`, then an inline
//! code span that must parse successfully — if the code span attempt fails
//! the whole role rejects and the `{` falls through to plain text.

use crate::constructs::code_text::code_text;
use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

fn is_name_char(code: char) -> bool {
    code.is_ascii_alphanumeric() || matches!(code, '_' | '.' | '-' | '+' | ':')
}

enum State {
    AfterOpen,
    Name,
}

pub(crate) fn role(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(tk.current(), Some('{'), "role requires a `{{` trigger");
    tk.enter(TokenType::Role);
    marker(tk);
    let mut state = State::AfterOpen;
    loop {
        state = match state {
            // The name needs at least one character; `{}` and `{ }` reject
            // here before any name token is opened.
            State::AfterOpen => match tk.current() {
                Some(code) if is_name_char(code) => {
                    tk.enter(TokenType::RoleName);
                    State::Name
                }
                _ => return Err(Reject),
            },
            State::Name => match tk.current() {
                Some('}') => {
                    tk.exit(TokenType::RoleName);
                    marker(tk);
                    return if tk.current() == Some('`') && tk.attempt(code_text).is_ok() {
                        tk.exit(TokenType::Role);
                        Ok(())
                    } else {
                        Err(Reject)
                    };
                }
                Some(code) if is_name_char(code) => {
                    tk.consume();
                    State::Name
                }
                _ => return Err(Reject),
            },
        };
    }
}

fn marker(tk: &mut Tokenizer) {
    tk.enter(TokenType::RoleMarker);
    tk.consume();
    tk.exit(TokenType::RoleMarker);
}
