//! Admonition directives: side content called out from the document flow.

use weft_ast::{Admonition, Node, Title};

use crate::deconstruct::DirectiveSpec;
use crate::extensions::class_list;
use crate::options::{OptionSpec, class_option};
use crate::registry::{Directive, Extension, ResolveContext};

struct AdmonitionDirective {
    kind: &'static str,
    title: &'static str,
    /// The generic form takes its title as a required argument.
    generic: bool,
}

impl Directive for AdmonitionDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec {
            required_arguments: usize::from(self.generic),
            final_argument_whitespace: true,
            has_content: true,
            option_spec: OptionSpec::new().convert("class", class_option).raw("name"),
            ..Default::default()
        }
    }

    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let mut classes = class_list(&directive.options);
        classes.push("admonition".to_owned());
        let title_text = directive
            .args
            .first()
            .cloned()
            .unwrap_or_else(|| self.title.to_owned());
        let mut children = vec![Node::Title(Title {
            children: ctx.nested_inline_parse(&title_text),
            ..Default::default()
        })];
        children.extend(ctx.nested_parse(&directive.value, directive.body_offset));
        let mut node = Node::Admonition(Admonition {
            kind: self.kind.to_owned(),
            classes,
            children,
            position: directive.position,
            ..Default::default()
        });
        ctx.add_name(&mut node, &directive.options);
        vec![node]
    }
}

/// The admonition directive family.
#[must_use]
pub fn admonitions() -> Extension {
    let specific = [
        ("attention", "Attention"),
        ("caution", "Caution"),
        ("danger", "Danger"),
        ("error", "Error"),
        ("important", "Important"),
        ("hint", "Hint"),
        ("note", "Note"),
        ("seealso", "See Also"),
        ("tip", "Tip"),
        ("warning", "Warning"),
    ];
    let mut extension = Extension::new("admonitions").directive(
        "admonition",
        AdmonitionDirective {
            kind: "admonition",
            title: "",
            generic: true,
        },
    );
    for (kind, title) in specific {
        extension = extension.directive(
            kind,
            AdmonitionDirective {
                kind,
                title,
                generic: false,
            },
        );
    }
    extension
}
