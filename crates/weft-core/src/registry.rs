//! Role, directive and transform capability traits, and the extension
//! bundles that register them.
//!
//! Implementations are a closed set dispatched through name tables built
//! once by the parser builder; there is no subclass hierarchy and no
//! registration after the first parse.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use weft_ast::{Node, Position};

use crate::deconstruct::DirectiveSpec;
use crate::logger::Logger;
use crate::nested::{NestedParser, PositionAdjustment};

/// Caller-suppliable mutable scratch shared across one parse.
///
/// Extensions use it to pass information between hooks; the parser itself
/// attaches nothing beyond what transforms record.
pub type State = BTreeMap<String, serde_json::Value>;

/// A role before resolution: raw name and backtick content.
#[derive(Clone, Debug)]
pub struct RawRole {
    pub name: String,
    pub value: String,
    pub position: Option<Position>,
}

/// Context handed to role and directive implementations.
///
/// Carries the shared state, the diagnostics logger, the identifier sets
/// visible at this scope, and the nested parser for embedded content.
pub struct ResolveContext<'p> {
    pub state: &'p mut State,
    pub logger: &'p Logger,
    /// Link definition identifiers visible at this scope.
    pub definitions: &'p BTreeSet<String>,
    /// Footnote definition identifiers visible at this scope.
    pub footnotes: &'p BTreeSet<String>,
    pub(crate) nested: &'p NestedParser,
}

impl ResolveContext<'_> {
    /// Parse embedded text as a nested document.
    ///
    /// Positions are shifted down by `offset_lines` so diagnostics for
    /// directive bodies point at real source lines.
    #[must_use]
    pub fn nested_parse(&self, text: &str, offset_lines: usize) -> Vec<Node> {
        self.nested.parse(
            text,
            &PositionAdjustment::Offset {
                lines: offset_lines,
                columns: 0,
            },
        )
    }

    /// Parse embedded text as phrasing content, stripping positions (the
    /// embedded text has no meaningful column mapping).
    #[must_use]
    pub fn nested_inline_parse(&self, text: &str) -> Vec<Node> {
        self.nested.parse_inline(text, &PositionAdjustment::Strip)
    }

    /// Attach the `name` option, if present, as a normalized identifier.
    pub fn add_name(&self, node: &mut Node, options: &BTreeMap<String, serde_yaml::Value>) {
        if let Some(serde_yaml::Value::String(name)) = options.get("name") {
            node.add_identifier(name);
        }
    }
}

/// A named inline role implementation.
pub trait Role: Send + Sync {
    /// Resolve the role into its children.
    fn run(&self, role: &RawRole, ctx: &mut ResolveContext<'_>) -> Vec<Node>;
}

/// A named block directive implementation.
pub trait Directive: Send + Sync {
    /// The argument/option/content shape this directive deconstructs
    /// against.
    fn spec(&self) -> DirectiveSpec;

    /// Resolve the deconstructed directive into its children.
    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node>;
}

/// A whole-tree pass run after roles and directives are resolved.
pub trait Transform: Send + Sync {
    fn run(&self, tree: &mut Node, state: &mut State, logger: &Logger);
}

/// Registration entry with its override flag.
pub(crate) struct Registration<T: ?Sized> {
    pub implementation: Arc<T>,
    pub overriding: bool,
}

/// A bundle of roles, directives and transforms registered under one name.
///
/// Built by extension constructors and merged into a parser via
/// [`crate::ParserBuilder::extension`].
#[derive(Default)]
pub struct Extension {
    pub(crate) name: &'static str,
    pub(crate) roles: Vec<(String, Registration<dyn Role>)>,
    pub(crate) directives: Vec<(String, Registration<dyn Directive>)>,
    pub(crate) transforms: Vec<(i32, Arc<dyn Transform>)>,
}

impl Extension {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// The extension's name, used in duplicate-registration errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a role under `name`.
    #[must_use]
    pub fn role(mut self, name: impl Into<String>, role: impl Role + 'static) -> Self {
        self.roles.push((
            name.into(),
            Registration {
                implementation: Arc::new(role),
                overriding: false,
            },
        ));
        self
    }

    /// Register a directive under `name`.
    #[must_use]
    pub fn directive(
        mut self,
        name: impl Into<String>,
        directive: impl Directive + 'static,
    ) -> Self {
        self.directives.push((
            name.into(),
            Registration {
                implementation: Arc::new(directive),
                overriding: false,
            },
        ));
        self
    }

    /// Register a directive that may replace an earlier registration of the
    /// same name.
    #[must_use]
    pub fn directive_overriding(
        mut self,
        name: impl Into<String>,
        directive: impl Directive + 'static,
    ) -> Self {
        self.directives.push((
            name.into(),
            Registration {
                implementation: Arc::new(directive),
                overriding: true,
            },
        ));
        self
    }

    /// Register a role that may replace an earlier registration of the same
    /// name.
    #[must_use]
    pub fn role_overriding(
        mut self,
        name: impl Into<String>,
        role: impl Role + 'static,
    ) -> Self {
        self.roles.push((
            name.into(),
            Registration {
                implementation: Arc::new(role),
                overriding: true,
            },
        ));
        self
    }

    /// Register a post-parse transform. Transforms run sorted by ascending
    /// priority.
    #[must_use]
    pub fn transform(mut self, priority: i32, transform: impl Transform + 'static) -> Self {
        self.transforms.push((priority, Arc::new(transform)));
        self
    }
}
