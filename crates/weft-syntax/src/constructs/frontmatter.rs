//! The YAML frontmatter construct (flow, document start only).
//!
//! A `---` fence on the very first line, raw lines, and a closing `---`
//! fence. Rejects when unclosed or anywhere but offset zero. Disabled for
//! nested parses.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

pub(crate) fn frontmatter(tk: &mut Tokenizer) -> ConstructResult {
    if tk.offset() != 0 {
        return Err(Reject);
    }
    tk.enter(TokenType::Frontmatter);
    fence(tk)?;
    loop {
        match tk.current() {
            None => return Err(Reject),
            Some('\n') => {
                tk.enter(TokenType::LineEnding);
                tk.consume();
                tk.exit(TokenType::LineEnding);
                if tk.attempt(fence).is_ok() {
                    tk.exit(TokenType::Frontmatter);
                    return Ok(());
                }
                if !matches!(tk.current(), None | Some('\n')) {
                    tk.enter(TokenType::FrontmatterChunk);
                    while !matches!(tk.current(), None | Some('\n')) {
                        tk.consume();
                    }
                    tk.exit(TokenType::FrontmatterChunk);
                }
            }
            Some(other) => unreachable!("frontmatter scanning stopped at {other:?}"),
        }
    }
}

/// A `---` line, allowing trailing whitespace.
fn fence(tk: &mut Tokenizer) -> ConstructResult {
    tk.enter(TokenType::FrontmatterFence);
    for _ in 0..3 {
        if tk.current() != Some('-') {
            return Err(Reject);
        }
        tk.consume();
    }
    if tk.current() == Some('-') {
        return Err(Reject);
    }
    tk.eat_whitespace(TokenType::Whitespace, None);
    match tk.current() {
        None | Some('\n') => {
            tk.exit(TokenType::FrontmatterFence);
            Ok(())
        }
        Some(_) => Err(Reject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    fn accepts(text: &str) -> bool {
        let source = Source::new(text);
        let mut tk = Tokenizer::new(&source);
        tk.attempt(frontmatter).is_ok()
    }

    #[test]
    fn test_frontmatter_block() {
        assert!(accepts("---\ntitle: x\n---\n"));
        assert!(accepts("---\n---"));
    }

    #[test]
    fn test_unclosed_rejects() {
        assert!(!accepts("---\ntitle: x\n"));
    }

    #[test]
    fn test_four_dashes_reject() {
        assert!(!accepts("----\nx\n---\n"));
    }

    #[test]
    fn test_not_at_start_rejects() {
        let source = Source::new("x---\n---\n");
        let mut tk = Tokenizer::new(&source);
        tk.consume();
        assert!(tk.attempt(frontmatter).is_err());
    }
}
