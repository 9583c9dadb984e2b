//! The `(label)=` target construct (flow).
//!
//! A marker `(`, a label excluding unescaped `)` and line endings (with
//! `\\` and `\)` escapes), a `)=` marker, then nothing but whitespace until
//! the end of the line. A label with no non-space character rejects.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

enum State {
    AfterOpen,
    Label,
    LabelEscape,
    ClosingEquals,
    End,
}

pub(crate) fn target(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(tk.current(), Some('('), "target requires a `(` trigger");
    // Whether a non-whitespace label character has been seen.
    let mut has_content = false;
    tk.enter(TokenType::Target);
    tk.enter(TokenType::TargetMarker);
    tk.consume();
    tk.exit(TokenType::TargetMarker);
    tk.enter(TokenType::TargetLabel);
    let mut state = State::AfterOpen;
    loop {
        state = match state {
            State::AfterOpen => match tk.current() {
                None | Some('\n') => return Err(Reject),
                Some(')') if !has_content => return Err(Reject),
                Some(')') => {
                    tk.exit(TokenType::TargetLabel);
                    tk.enter(TokenType::TargetMarker);
                    tk.consume();
                    State::ClosingEquals
                }
                Some(_) => State::Label,
            },
            State::Label => match tk.current() {
                None | Some(')' | '\n') => State::AfterOpen,
                Some('\\') => {
                    tk.consume();
                    has_content = true;
                    State::LabelEscape
                }
                Some(code) => {
                    tk.consume();
                    has_content = has_content || !matches!(code, ' ' | '\t');
                    State::Label
                }
            },
            State::LabelEscape => match tk.current() {
                Some('\\' | ')') => {
                    tk.consume();
                    State::Label
                }
                _ => State::Label,
            },
            State::ClosingEquals => {
                if tk.current() == Some('=') {
                    tk.consume();
                    tk.exit(TokenType::TargetMarker);
                    tk.exit(TokenType::Target);
                    tk.eat_whitespace(TokenType::Whitespace, None);
                    State::End
                } else {
                    return Err(Reject);
                }
            }
            State::End => match tk.current() {
                None | Some('\n') => return Ok(()),
                Some(_) => return Err(Reject),
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::source::Source;

    fn label_span(text: &str) -> Result<String, Reject> {
        let source = Source::new(text);
        let mut tk = Tokenizer::new(&source);
        tk.attempt(target)?;
        let events = tk.finish();
        let start = events
            .iter()
            .find(|e| e.kind == EventKind::Enter && e.ty == TokenType::TargetLabel)
            .unwrap()
            .point
            .offset
            .unwrap();
        let end = events
            .iter()
            .find(|e| e.kind == EventKind::Exit && e.ty == TokenType::TargetLabel)
            .unwrap()
            .point
            .offset
            .unwrap();
        Ok(source.slice(start, end))
    }

    #[test]
    fn test_simple_label() {
        assert_eq!(label_span("(abc)=").unwrap(), "abc");
    }

    #[test]
    fn test_label_with_space() {
        assert_eq!(label_span("(a bc)=").unwrap(), "a bc");
    }

    #[test]
    fn test_empty_label_rejects() {
        assert_eq!(label_span("()="), Err(Reject));
        assert_eq!(label_span("(  )="), Err(Reject));
    }

    #[test]
    fn test_missing_equals_rejects() {
        assert_eq!(label_span("(abc)"), Err(Reject));
    }

    #[test]
    fn test_trailing_content_rejects() {
        assert_eq!(label_span("(abc)= d"), Err(Reject));
    }

    #[test]
    fn test_trailing_whitespace_accepted() {
        assert_eq!(label_span("(abc)=  ").unwrap(), "abc");
        assert_eq!(label_span("(abc)=\t\nrest").unwrap(), "abc");
    }

    #[test]
    fn test_escaped_paren_stays_in_label() {
        assert_eq!(label_span("(ab\\)c)=").unwrap(), "ab\\)c");
        assert_eq!(label_span("(ab\\\\c)=").unwrap(), "ab\\\\c");
    }

    #[test]
    fn test_line_ending_in_label_rejects() {
        assert_eq!(label_span("(ab\nc)="), Err(Reject));
    }

    #[test]
    fn test_rejection_restores_position() {
        let source = Source::new("(abc)");
        let mut tk = Tokenizer::new(&source);
        assert!(tk.attempt(target).is_err());
        assert_eq!(tk.point().offset, Some(0));
        assert!(tk.events().is_empty());
    }
}
