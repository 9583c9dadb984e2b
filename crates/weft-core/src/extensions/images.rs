//! Image and figure directives.

use std::collections::BTreeMap;

use serde_yaml::Value;
use weft_ast::{Caption, Container, Image, Node};

use crate::deconstruct::DirectiveSpec;
use crate::extensions::{class_list, option_i64, option_string};
use crate::options::{
    OptionSpec, choice, class_option, length_or_percentage_or_unitless,
    length_or_percentage_or_unitless_figure, length_or_unitless, percentage,
};
use crate::registry::{Directive, Extension, ResolveContext};

fn shared_options() -> OptionSpec {
    OptionSpec::new()
        .raw("alt")
        .with("align", choice(&["left", "center", "right"]))
        .convert("height", length_or_unitless)
        .convert("width", length_or_percentage_or_unitless)
        .convert("scale", percentage)
        .convert("class", class_option)
        .raw("name")
        .raw("target")
}

fn build_image(url: &str, options: &BTreeMap<String, Value>) -> Image {
    Image {
        url: url.to_owned(),
        alt: option_string(options, "alt"),
        height: option_string(options, "height"),
        width: option_string(options, "width"),
        scale: option_i64(options, "scale"),
        align: option_string(options, "align"),
        classes: class_list(options),
        ..Default::default()
    }
}

/// A single image.
struct ImageDirective;

impl Directive for ImageDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec {
            required_arguments: 1,
            final_argument_whitespace: true,
            option_spec: shared_options(),
            ..Default::default()
        }
    }

    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let mut image = build_image(&directive.args[0], &directive.options);
        image.position = directive.position;
        let mut node = Node::Image(image);
        ctx.add_name(&mut node, &directive.options);
        vec![node]
    }
}

/// A figure: an image with a caption, wrapped in a container.
struct FigureDirective;

impl Directive for FigureDirective {
    fn spec(&self) -> DirectiveSpec {
        DirectiveSpec {
            required_arguments: 1,
            final_argument_whitespace: true,
            has_content: true,
            option_spec: shared_options()
                .convert("figwidth", length_or_percentage_or_unitless_figure)
                .convert("figclass", class_option),
            ..Default::default()
        }
    }

    fn run(&self, directive: &weft_ast::Directive, ctx: &mut ResolveContext<'_>) -> Vec<Node> {
        let mut image = build_image(&directive.args[0], &directive.options);
        image.position = directive.position;
        let caption = Caption {
            children: ctx.nested_parse(&directive.value, directive.body_offset),
            position: directive.position,
            ..Default::default()
        };
        let figclass = match directive.options.get("figclass") {
            Some(Value::Sequence(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        };
        let mut container = Node::Container(Container {
            kind: "figure".to_owned(),
            width: option_string(&directive.options, "figwidth"),
            classes: figclass,
            children: vec![Node::Image(image), Node::Caption(caption)],
            position: directive.position,
            ..Default::default()
        });
        ctx.add_name(&mut container, &directive.options);
        vec![container]
    }
}

/// The image and figure directives.
#[must_use]
pub fn images() -> Extension {
    Extension::new("images")
        .directive("image", ImageDirective)
        .directive("figure", FigureDirective)
}
