//! The `+++` thematic break construct (flow).
//!
//! Three or more `+` characters, optionally interspersed with spaces (which
//! do not count toward the minimum), optionally followed by free-form
//! trailing content captured as a metadata span.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

const MARKER_COUNT_MIN: usize = 3;

enum State {
    Marker,
    Sequence,
    Content,
}

pub(crate) fn thematic_break(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(
        tk.current(),
        Some('+'),
        "thematic break requires a `+` trigger"
    );
    let mut size = 0;
    tk.enter(TokenType::ThematicBreak);
    let mut state = State::Marker;
    loop {
        state = match state {
            State::Marker => match tk.current() {
                Some('+') => {
                    tk.enter(TokenType::ThematicBreakSequence);
                    State::Sequence
                }
                Some(' ' | '\t') => {
                    tk.eat_whitespace(TokenType::Whitespace, None);
                    State::Marker
                }
                _ if size < MARKER_COUNT_MIN => return Err(Reject),
                None | Some('\n') => {
                    tk.exit(TokenType::ThematicBreak);
                    return Ok(());
                }
                Some(_) => {
                    tk.enter(TokenType::ChunkString);
                    State::Content
                }
            },
            State::Sequence => match tk.current() {
                Some('+') => {
                    tk.consume();
                    size += 1;
                    State::Sequence
                }
                _ => {
                    tk.exit(TokenType::ThematicBreakSequence);
                    State::Marker
                }
            },
            State::Content => match tk.current() {
                None | Some('\n') => {
                    tk.exit(TokenType::ChunkString);
                    tk.exit(TokenType::ThematicBreak);
                    return Ok(());
                }
                Some(_) => {
                    tk.consume();
                    State::Content
                }
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::source::Source;

    fn run(text: &str) -> Result<Vec<(EventKind, TokenType)>, Reject> {
        let source = Source::new(text);
        let mut tk = Tokenizer::new(&source);
        tk.attempt(thematic_break)?;
        Ok(tk.finish().iter().map(|e| (e.kind, e.ty)).collect())
    }

    #[test]
    fn test_three_markers() {
        assert!(run("+++\n").is_ok());
        assert!(run("+++").is_ok());
    }

    #[test]
    fn test_two_markers_reject() {
        assert_eq!(run("++\n"), Err(Reject));
        assert_eq!(run("++"), Err(Reject));
    }

    #[test]
    fn test_spaces_do_not_count_toward_minimum() {
        assert_eq!(run("+ + \n"), Err(Reject));
        assert!(run("+ + +\n").is_ok());
    }

    #[test]
    fn test_trailing_content_captured() {
        let events = run("+++ chapter two").unwrap();
        assert!(events.contains(&(EventKind::Enter, TokenType::ChunkString)));
    }

    #[test]
    fn test_more_than_three_markers() {
        assert!(run("++++++\n").is_ok());
    }
}
