//! Character-level state-machine tokenizer for the weft document syntax.
//!
//! The tokenizer consumes a source buffer one character code at a time and
//! emits a well-nested stream of enter/exit [`Event`]s delimiting token
//! spans. Each syntactic construct is a deterministic finite-state machine —
//! an explicit state enum plus a step loop — driven by the [`Tokenizer`]
//! engine, which supplies four primitives:
//!
//! - `enter(type)` / `exit(type)`: open and close a token span,
//! - `consume()`: commit one character code,
//! - `attempt(construct)`: run a construct speculatively; on rejection the
//!   scanner position and every event emitted since the attempt are rolled
//!   back, leaving no observable side effect.
//!
//! Constructs are dispatched from two entry points: **flow** (block-level,
//! tried at the left margin of each line) and **text** (inline, tried at
//! trigger characters inside paragraph-like content). The enabled set is
//! controlled by [`Constructs`]; nested parses disable the frontmatter and
//! heading constructs.
//!
//! # Example
//!
//! ```
//! use weft_syntax::{Constructs, EventKind, Source, TokenType, tokenize};
//!
//! let source = Source::new("(section)=\n");
//! let events = tokenize(&source, &Constructs::default());
//! assert!(
//!     events
//!         .iter()
//!         .any(|e| e.kind == EventKind::Enter && e.ty == TokenType::Target)
//! );
//! ```

mod constructs;
mod event;
mod parser;
mod source;
mod tokenizer;

pub use event::{Event, EventKind, TokenType};
pub use parser::{Constructs, tokenize, tokenize_inline};
pub use source::Source;
pub use tokenizer::{ConstructResult, Reject, Tokenizer};
