//! Code and code-block directives: fenced code with display settings.

use weft_ast::{Caption, Code, Container, Node};

use crate::deconstruct::DirectiveSpec;
use crate::extensions::{class_list, option_i64, option_string};
use crate::options::{OptionSpec, class_option, flag, int, optional_int};
use crate::registry::{Directive, Extension, ResolveContext};

/// Docutils-style `code` directive.
struct CodeDirective;

impl Directive for CodeDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec {
            optional_arguments: 1,
            has_content: true,
            option_spec: OptionSpec::new()
                .convert("number-lines", optional_int)
                .convert("force", flag)
                .raw("name")
                .convert("class", class_option),
            ..Default::default()
        }
    }

    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let starting = option_i64(&directive.options, "number-lines");
        let mut node = Node::Code(Code {
            value: directive.value.clone(),
            lang: directive.args.first().cloned(),
            classes: class_list(&directive.options),
            show_line_numbers: starting.is_some(),
            starting_line_number: starting,
            force: directive.options.contains_key("force"),
            position: directive.position,
            ..Default::default()
        });
        ctx.add_name(&mut node, &directive.options);
        vec![node]
    }
}

/// Sphinx-style `code-block` directive, with caption support.
struct CodeBlockDirective;

impl Directive for CodeBlockDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec {
            optional_arguments: 1,
            has_content: true,
            option_spec: OptionSpec::new()
                .convert("linenos", flag)
                .convert("lineno-start", int)
                .convert("dedent", optional_int)
                .raw("emphasize-lines")
                .raw("caption")
                .convert("force", flag)
                .raw("name")
                .convert("class", class_option),
            ..Default::default()
        }
    }

    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let starting = option_i64(&directive.options, "lineno-start");
        let code = Code {
            value: directive.value.clone(),
            lang: directive.args.first().cloned(),
            classes: class_list(&directive.options),
            show_line_numbers: starting.is_some()
                || directive.options.contains_key("linenos"),
            starting_line_number: starting,
            force: directive.options.contains_key("force"),
            position: directive.position,
            ..Default::default()
        };
        let mut node = if let Some(caption) = option_string(&directive.options, "caption") {
            // a captioned block wraps code and caption in a container; the
            // name identifier then belongs to the container
            Node::Container(Container {
                kind: "code".to_owned(),
                children: vec![
                    Node::Caption(Caption {
                        children: ctx.nested_parse(&caption, 0),
                        ..Default::default()
                    }),
                    Node::Code(code),
                ],
                position: directive.position,
                ..Default::default()
            })
        } else {
            Node::Code(code)
        };
        ctx.add_name(&mut node, &directive.options);
        vec![node]
    }
}

/// The code and code-block directives.
#[must_use]
pub fn code() -> Extension {
    Extension::new("code")
        .directive("code", CodeDirective)
        .directive("code-block", CodeBlockDirective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    fn parse(source: &str) -> Node {
        Parser::builder()
            .extension(code())
            .unwrap()
            .build()
            .parse(source)
            .tree
    }

    #[test]
    fn test_code_with_language_and_numbering() {
        let tree = parse("```{code} python\n:number-lines: 10\n\nprint(1)\n```\n");
        let Node::Directive(directive) = &tree.children().unwrap()[0] else {
            panic!("expected directive");
        };
        let Node::Code(code) = &directive.children[0] else {
            panic!("expected code, got {:?}", directive.children);
        };
        assert_eq!(code.lang.as_deref(), Some("python"));
        assert!(code.show_line_numbers);
        assert_eq!(code.starting_line_number, Some(10));
        assert_eq!(code.value, "print(1)");
    }

    #[test]
    fn test_code_block_linenos_flag() {
        let tree = parse("```{code-block} rust\n:linenos:\n\nlet x = 1;\n```\n");
        let Node::Directive(directive) = &tree.children().unwrap()[0] else {
            panic!("expected directive");
        };
        let Node::Code(code) = &directive.children[0] else {
            panic!("expected code");
        };
        assert!(code.show_line_numbers);
        assert_eq!(code.starting_line_number, None);
    }

    #[test]
    fn test_code_block_caption_wraps_in_container() {
        let tree = parse("```{code-block} rust\n:caption: Listing one\n\nlet x = 1;\n```\n");
        let Node::Directive(directive) = &tree.children().unwrap()[0] else {
            panic!("expected directive");
        };
        let Node::Container(container) = &directive.children[0] else {
            panic!("expected container, got {:?}", directive.children);
        };
        assert_eq!(container.kind, "code");
        assert!(matches!(container.children[0], Node::Caption(_)));
        assert!(matches!(container.children[1], Node::Code(_)));
    }
}
