//! Link and footnote definition constructs (flow).
//!
//! Single-line forms only: `[label]: destination` and `[^label]: content`.
//! These exist so the resolution layer can collect definition identifiers
//! into its scope sets; multi-line destinations and titles are out of scope
//! with the rest of base CommonMark compliance.

use crate::event::TokenType;
use crate::tokenizer::{ConstructResult, Reject, Tokenizer};

pub(crate) fn definition(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(tk.current(), Some('['), "definition requires a `[` trigger");
    tk.enter(TokenType::Definition);
    tk.enter(TokenType::DefinitionMarker);
    tk.consume();
    tk.exit(TokenType::DefinitionMarker);

    tk.enter(TokenType::DefinitionLabel);
    let mut empty = true;
    loop {
        match tk.current() {
            Some(']') if empty => return Err(Reject),
            Some(']') => break,
            None | Some('\n' | '[') => return Err(Reject),
            Some(code) => {
                tk.consume();
                if !code.is_whitespace() {
                    empty = false;
                }
            }
        }
    }
    tk.exit(TokenType::DefinitionLabel);

    tk.enter(TokenType::DefinitionMarker);
    tk.consume();
    if tk.current() != Some(':') {
        return Err(Reject);
    }
    tk.consume();
    tk.exit(TokenType::DefinitionMarker);
    tk.eat_whitespace(TokenType::Whitespace, None);

    if matches!(tk.current(), None | Some('\n')) {
        return Err(Reject);
    }
    tk.enter(TokenType::DefinitionDestination);
    while !matches!(tk.current(), None | Some('\n' | ' ' | '\t')) {
        tk.consume();
    }
    tk.exit(TokenType::DefinitionDestination);
    tk.eat_whitespace(TokenType::Whitespace, None);

    match tk.current() {
        None | Some('\n') => {
            tk.exit(TokenType::Definition);
            Ok(())
        }
        Some(_) => Err(Reject),
    }
}

pub(crate) fn footnote_definition(tk: &mut Tokenizer) -> ConstructResult {
    debug_assert_eq!(
        tk.current(),
        Some('['),
        "footnote definition requires a `[` trigger"
    );
    tk.enter(TokenType::FootnoteDefinition);
    tk.enter(TokenType::FootnoteDefinitionMarker);
    tk.consume();
    if tk.current() != Some('^') {
        return Err(Reject);
    }
    tk.consume();
    tk.exit(TokenType::FootnoteDefinitionMarker);

    tk.enter(TokenType::FootnoteDefinitionLabel);
    let mut empty = true;
    loop {
        match tk.current() {
            Some(']') if empty => return Err(Reject),
            Some(']') => break,
            None | Some('\n' | '[' | '^') => return Err(Reject),
            Some(_) => {
                tk.consume();
                empty = false;
            }
        }
    }
    tk.exit(TokenType::FootnoteDefinitionLabel);

    tk.enter(TokenType::FootnoteDefinitionMarker);
    tk.consume();
    if tk.current() != Some(':') {
        return Err(Reject);
    }
    tk.consume();
    tk.exit(TokenType::FootnoteDefinitionMarker);
    tk.eat_whitespace(TokenType::Whitespace, None);

    if !matches!(tk.current(), None | Some('\n')) {
        tk.enter(TokenType::ChunkString);
        while !matches!(tk.current(), None | Some('\n')) {
            tk.consume();
        }
        tk.exit(TokenType::ChunkString);
    }
    tk.exit(TokenType::FootnoteDefinition);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    fn accepts(f: fn(&mut Tokenizer) -> ConstructResult, text: &str) -> bool {
        let source = Source::new(text);
        let mut tk = Tokenizer::new(&source);
        tk.attempt(f).is_ok()
    }

    #[test]
    fn test_definition() {
        assert!(accepts(definition, "[label]: https://example.com\n"));
        assert!(accepts(definition, "[a b]: ./path"));
    }

    #[test]
    fn test_definition_rejects() {
        assert!(!accepts(definition, "[]: url"));
        assert!(!accepts(definition, "[label] missing colon"));
        assert!(!accepts(definition, "[label]:\n"));
        assert!(!accepts(definition, "[label]: url extra words"));
    }

    #[test]
    fn test_footnote_definition() {
        assert!(accepts(footnote_definition, "[^1]: the footnote\n"));
        assert!(accepts(footnote_definition, "[^note]:"));
    }

    #[test]
    fn test_footnote_definition_rejects() {
        assert!(!accepts(footnote_definition, "[1]: not a footnote"));
        assert!(!accepts(footnote_definition, "[^]: empty label"));
    }
}
