//! Math role and directive.

use weft_ast::{InlineMath, Math, Node};

use crate::deconstruct::DirectiveSpec;
use crate::extensions::{class_list, option_string};
use crate::logger::LogProps;
use crate::options::{OptionSpec, class_option, flag};
use crate::registry::{Directive, Extension, RawRole, ResolveContext, Role};

struct MathRole;

impl Role for MathRole {
    fn run(&self, role: &RawRole, _ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        vec![Node::InlineMath(InlineMath {
            value: role.value.clone(),
            position: role.position,
            ..Default::default()
        })]
    }
}

struct MathDirective;

impl Directive for MathDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec {
            has_content: true,
            option_spec: OptionSpec::new()
                .raw("name")
                .convert("class", class_option)
                .convert("nowrap", flag)
                .raw("label"),
            ..Default::default()
        }
    }

    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let mut node = Node::Math(Math {
            value: directive.value.clone(),
            nowrap: directive.options.contains_key("nowrap"),
            classes: class_list(&directive.options),
            position: directive.position,
            ..Default::default()
        });
        // `label` duplicates `name` and wins when both are set
        if let Some(label) = option_string(&directive.options, "label") {
            if directive.options.contains_key("name") {
                ctx.logger.warning(
                    "name and label are both set, name will be ignored",
                    LogProps::at(directive.position).category("math"),
                );
            }
            node.add_identifier(&label);
        } else {
            ctx.add_name(&mut node, &directive.options);
        }
        vec![node]
    }
}

/// The math role and directive.
#[must_use]
pub fn math() -> Extension {
    Extension::new("math")
        .role("math", MathRole)
        .directive("math", MathDirective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Level, Parser};

    fn parser() -> Parser {
        Parser::builder().extension(math()).unwrap().build()
    }

    #[test]
    fn test_math_role() {
        let parsed = parser().parse("inline {math}`x^2` here\n");
        let Node::Paragraph(paragraph) = &parsed.tree.children().unwrap()[0] else {
            panic!("expected paragraph");
        };
        let Node::Role(role) = &paragraph.children[1] else {
            panic!("expected role");
        };
        let Some([Node::InlineMath(inline)]) = role.children.as_deref() else {
            panic!("expected inline math child");
        };
        assert_eq!(inline.value, "x^2");
    }

    #[test]
    fn test_math_directive_nowrap() {
        let parsed = parser().parse("```{math}\n:nowrap:\n\nE = mc^2\n```\n");
        let Node::Directive(directive) = &parsed.tree.children().unwrap()[0] else {
            panic!("expected directive");
        };
        let Node::Math(math_node) = &directive.children[0] else {
            panic!("expected math, got {:?}", directive.children);
        };
        assert!(math_node.nowrap);
        assert_eq!(math_node.value, "E = mc^2");
    }

    #[test]
    fn test_label_wins_over_name_with_warning() {
        let parsed = parser().parse("```{math}\n:label: Eq One\n:name: ignored\n\nx\n```\n");
        let Node::Directive(directive) = &parsed.tree.children().unwrap()[0] else {
            panic!("expected directive");
        };
        let Node::Math(math_node) = &directive.children[0] else {
            panic!("expected math");
        };
        assert_eq!(math_node.identifiers, vec!["eq one"]);
        assert!(
            parsed
                .diagnostics
                .iter()
                .any(|d| d.level == Level::Warning && d.message.contains("label"))
        );
    }
}
