//! Role and directive resolution layer for the weft document parser.
//!
//! Builds on the tokenizer ([`weft_syntax`]) and compiler ([`weft_compile`])
//! to provide the full pipeline: parse a document to a tree, resolve roles
//! and directives through registered implementations (re-parsing embedded
//! text as nested documents scoped to the enclosing definition/footnote
//! namespace), then run post-parse transforms such as target propagation.
//!
//! The entry point is [`Parser`], an immutable value constructed once via
//! [`ParserBuilder`]: extensions register their roles, directives and
//! transforms before the first parse, never after.
//!
//! # Example
//!
//! ```
//! use weft_core::Parser;
//!
//! let parser = Parser::with_defaults().unwrap();
//! let parsed = parser.parse("(intro)=\n# Introduction {math}`x^2`\n");
//! assert!(parsed.diagnostics.is_empty());
//! ```

mod deconstruct;
mod logger;
mod nested;
pub mod options;
mod parser;
mod processor;
mod propagate;
mod registry;

pub mod extensions;

pub use deconstruct::{DirectiveData, DirectiveParseError, DirectiveSpec, RawDirective, deconstruct};
pub use logger::{Diagnostic, Level, LogProps, Logger};
pub use nested::{NestedParser, PositionAdjustment};
pub use options::{Converter, OptionError, OptionSpec};
pub use parser::{BuildError, Parsed, Parser, ParserBuilder};
pub use propagate::PropagateTargets;
pub use registry::{Directive, Extension, RawRole, ResolveContext, Role, State, Transform};
