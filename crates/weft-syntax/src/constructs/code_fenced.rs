//! The fenced code construct (flow).
//!
//! A fence of three or more backticks or tildes, an info string (first word)
//! and metadata (remainder of the fence line), raw body lines, and a closing
//! fence of at least the opening length. An unclosed fence runs to end of
//! input. Backticks inside the info or meta of a backtick fence reject.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

pub(crate) fn code_fenced(tk: &mut Tokenizer) -> ConstructResult {
    let marker = match tk.current() {
        Some(code @ ('`' | '~')) => code,
        other => unreachable!("fenced code requires a fence trigger, got {other:?}"),
    };
    tk.enter(TokenType::CodeFenced);
    tk.enter(TokenType::CodeFencedFence);
    tk.enter(TokenType::CodeFencedFenceSequence);
    let mut size = 0;
    while tk.current() == Some(marker) {
        tk.consume();
        size += 1;
    }
    if size < 3 {
        return Err(Reject);
    }
    tk.exit(TokenType::CodeFencedFenceSequence);
    tk.eat_whitespace(TokenType::Whitespace, None);

    if !matches!(tk.current(), None | Some('\n')) {
        tk.enter(TokenType::CodeFencedFenceInfo);
        while !matches!(tk.current(), None | Some('\n' | ' ' | '\t')) {
            if marker == '`' && tk.current() == Some('`') {
                return Err(Reject);
            }
            tk.consume();
        }
        tk.exit(TokenType::CodeFencedFenceInfo);
        tk.eat_whitespace(TokenType::Whitespace, None);
        if !matches!(tk.current(), None | Some('\n')) {
            tk.enter(TokenType::CodeFencedFenceMeta);
            while !matches!(tk.current(), None | Some('\n')) {
                if marker == '`' && tk.current() == Some('`') {
                    return Err(Reject);
                }
                tk.consume();
            }
            tk.exit(TokenType::CodeFencedFenceMeta);
        }
    }
    tk.exit(TokenType::CodeFencedFence);

    loop {
        match tk.current() {
            None => {
                tk.exit(TokenType::CodeFenced);
                return Ok(());
            }
            Some('\n') => {
                tk.enter(TokenType::LineEnding);
                tk.consume();
                tk.exit(TokenType::LineEnding);
                if tk.attempt(|tk| closing_fence(tk, marker, size)).is_ok() {
                    tk.exit(TokenType::CodeFenced);
                    return Ok(());
                }
                if !matches!(tk.current(), None | Some('\n')) {
                    tk.enter(TokenType::CodeFlowValue);
                    while !matches!(tk.current(), None | Some('\n')) {
                        tk.consume();
                    }
                    tk.exit(TokenType::CodeFlowValue);
                }
            }
            Some(other) => unreachable!("fence body scanning stopped at {other:?}"),
        }
    }
}

fn closing_fence(tk: &mut Tokenizer, marker: char, min: usize) -> ConstructResult {
    tk.enter(TokenType::CodeFencedFence);
    tk.eat_whitespace(TokenType::Whitespace, Some(3));
    if tk.current() != Some(marker) {
        return Err(Reject);
    }
    tk.enter(TokenType::CodeFencedFenceSequence);
    let mut size = 0;
    while tk.current() == Some(marker) {
        tk.consume();
        size += 1;
    }
    if size < min {
        return Err(Reject);
    }
    tk.exit(TokenType::CodeFencedFenceSequence);
    tk.eat_whitespace(TokenType::Whitespace, None);
    match tk.current() {
        None | Some('\n') => {
            tk.exit(TokenType::CodeFencedFence);
            Ok(())
        }
        Some(_) => Err(Reject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::source::Source;

    fn run(text: &str) -> Result<(Vec<(EventKind, TokenType)>, usize), Reject> {
        let source = Source::new(text);
        let mut tk = Tokenizer::new(&source);
        tk.attempt(code_fenced)?;
        let end = tk.point().offset.unwrap();
        Ok((tk.finish().iter().map(|e| (e.kind, e.ty)).collect(), end))
    }

    #[test]
    fn test_fence_with_info_and_meta() {
        let (events, _) = run("```{note} Title text\nbody\n```").unwrap();
        assert!(events.contains(&(EventKind::Enter, TokenType::CodeFencedFenceInfo)));
        assert!(events.contains(&(EventKind::Enter, TokenType::CodeFencedFenceMeta)));
        assert!(events.contains(&(EventKind::Enter, TokenType::CodeFlowValue)));
    }

    #[test]
    fn test_two_char_fence_rejects() {
        assert!(run("``\nx\n``").is_err());
    }

    #[test]
    fn test_unclosed_runs_to_eof() {
        let (_, end) = run("```\nabc").unwrap();
        assert_eq!(end, 7);
    }

    #[test]
    fn test_closing_fence_may_be_longer() {
        assert!(run("```\nx\n````").is_ok());
    }

    #[test]
    fn test_shorter_closing_run_is_body() {
        let (_, end) = run("````\n```\n````").unwrap();
        assert_eq!(end, 13);
    }

    #[test]
    fn test_backtick_in_info_rejects() {
        assert!(run("``` a`b\nx\n```").is_err());
        assert!(run("~~~ a`b\nx\n~~~").is_ok());
    }
}
