//! Directive deconstruction.
//!
//! Takes a raw directive — the first line (the fence info-string remainder)
//! and the body text — and splits it against the directive's spec into
//! positional arguments, a converted option mapping, body text, and the
//! count of consumed header lines (`body_offset`), which keeps nested-parse
//! diagnostics pointing at the correct source lines.

use std::collections::BTreeMap;

use serde_yaml::Value;
use thiserror::Error;
use weft_ast::Position;

use crate::options::{OptionError, OptionSpec};

/// Shape of a directive: argument counts, option table, content policy.
#[derive(Clone, Debug, Default)]
pub struct DirectiveSpec {
    pub required_arguments: usize,
    pub optional_arguments: usize,
    /// The final argument slot absorbs all remaining whitespace-joined text.
    pub final_argument_whitespace: bool,
    /// Whether body content is allowed.
    pub has_content: bool,
    /// Skip option validation/conversion, keeping raw parsed values.
    pub raw_options: bool,
    pub option_spec: OptionSpec,
}

/// A directive before deconstruction, as recognized from a fenced code node.
#[derive(Clone, Debug)]
pub struct RawDirective {
    pub name: String,
    /// The info-string remainder: the directive's first line.
    pub meta: Option<String>,
    /// The fence body.
    pub value: String,
    pub position: Option<Position>,
}

/// The deconstructed parts of a directive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectiveData {
    pub args: Vec<String>,
    pub options: BTreeMap<String, Value>,
    pub body: String,
    /// Count of header lines consumed before the body.
    pub body_offset: usize,
}

/// A directive failed to deconstruct against its spec.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DirectiveParseError {
    #[error("{required} argument(s) required, {supplied} supplied")]
    MissingArguments { required: usize, supplied: usize },
    #[error("maximum {allowed} argument(s) allowed, {supplied} supplied")]
    TooManyArguments { allowed: usize, supplied: usize },
    #[error("invalid options YAML: {0}")]
    InvalidYaml(String),
    #[error("options must be a mapping, got: {0}")]
    NotAMapping(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid option value (option: '{name}'; value: {value}): {source}")]
    InvalidOptionValue {
        name: String,
        value: String,
        source: OptionError,
    },
    #[error("has content but content not allowed")]
    UnexpectedContent,
}

/// Split a raw directive into arguments, options, body and body offset.
pub fn deconstruct(
    raw: &RawDirective,
    spec: &DirectiveSpec,
) -> Result<DirectiveData, DirectiveParseError> {
    let first_line = raw.meta.clone().unwrap_or_default();
    let mut body: Vec<String> = if raw.value.trim().is_empty() {
        Vec::new()
    } else {
        raw.value.split('\n').map(str::to_owned).collect()
    };
    let mut body_offset = 0;
    let mut options = BTreeMap::new();
    if !spec.option_spec.is_empty() || spec.raw_options {
        (body, options, body_offset) = parse_options(body, spec)?;
    }

    let mut args = Vec::new();
    if spec.required_arguments == 0 && spec.optional_arguments == 0 {
        // With no argument slots the first line is content, not arguments.
        if !first_line.is_empty() {
            body_offset = 0;
            body.insert(0, first_line);
        }
    } else {
        args = parse_arguments(&first_line, spec)?;
    }

    // A single blank line may separate the options/arguments from the body.
    if body.first().is_some_and(|line| line.trim().is_empty()) {
        body.remove(0);
        body_offset += 1;
    }

    if !body.is_empty() && !spec.has_content {
        return Err(DirectiveParseError::UnexpectedContent);
    }

    Ok(DirectiveData {
        args,
        options,
        body: body.join("\n"),
        body_offset,
    })
}

type OptionsOutcome = (Vec<String>, BTreeMap<String, Value>, usize);

/// Scan the body for an options block: a `---`-delimited YAML block or a run
/// of `:`-prefixed lines. Returns the remaining body, the converted options
/// and the number of consumed lines.
fn parse_options(
    content: Vec<String>,
    spec: &DirectiveSpec,
) -> Result<OptionsOutcome, DirectiveParseError> {
    let mut body_offset = 0;
    let mut yaml_block: Option<Vec<String>> = None;
    let mut content = content;

    if content.first().is_some_and(|line| line.starts_with("---")) {
        // options in a YAML block terminated by a matching `---` line
        body_offset += 1;
        let mut remaining = Vec::new();
        let mut block = Vec::new();
        let mut found_divider = false;
        for line in content.drain(..).skip(1) {
            if line.starts_with("---") {
                body_offset += 1;
                found_divider = true;
                continue;
            }
            if found_divider {
                remaining.push(line);
            } else {
                body_offset += 1;
                block.push(line);
            }
        }
        yaml_block = Some(block);
        content = remaining;
    } else if content.first().is_some_and(|line| line.starts_with(':')) {
        // options as a run of `:key: value` lines
        let mut remaining = Vec::new();
        let mut block = Vec::new();
        let mut found_divider = false;
        for line in content.drain(..) {
            if !found_divider && !line.starts_with(':') {
                found_divider = true;
                remaining.push(line);
                continue;
            }
            if found_divider {
                remaining.push(line);
            } else {
                body_offset += 1;
                block.push(line[1..].to_owned());
            }
        }
        yaml_block = Some(block);
        content = remaining;
    }

    let mut options = BTreeMap::new();
    if let Some(block) = yaml_block {
        let text = block.join("\n");
        let parsed: Value = serde_yaml::from_str(&text)
            .map_err(|e| DirectiveParseError::InvalidYaml(e.to_string()))?;
        match parsed {
            Value::Mapping(mapping) => {
                for (key, value) in mapping {
                    options.insert(scalar_to_string(&key), value);
                }
            }
            other => {
                return Err(DirectiveParseError::NotAMapping(scalar_to_string(&other)));
            }
        }
    }

    if spec.raw_options {
        return Ok((content, options, body_offset));
    }

    let mut converted_options = BTreeMap::new();
    for (name, value) in options {
        let Some(converter) = spec.option_spec.get(&name) else {
            return Err(DirectiveParseError::UnknownOption(name));
        };
        // Options are strings in the source; YAML typing is undone before
        // conversion, with null/false reading as an absent value.
        let raw_value = match &value {
            Value::Null | Value::Bool(false) => String::new(),
            other => scalar_to_string(other),
        };
        let converted = match converter {
            None => Value::String(raw_value),
            Some(f) => f(&raw_value).map_err(|source| {
                DirectiveParseError::InvalidOptionValue {
                    name: name.clone(),
                    value: scalar_to_string(&value),
                    source,
                }
            })?,
        };
        converted_options.insert(name, converted);
    }

    Ok((content, converted_options, body_offset))
}

/// Split the first line into positional arguments against the spec's counts.
fn parse_arguments(
    first_line: &str,
    spec: &DirectiveSpec,
) -> Result<Vec<String>, DirectiveParseError> {
    let mut args: Vec<String> = first_line.split_whitespace().map(str::to_owned).collect();
    let total = spec.required_arguments + spec.optional_arguments;
    if args.len() < spec.required_arguments {
        return Err(DirectiveParseError::MissingArguments {
            required: spec.required_arguments,
            supplied: args.len(),
        });
    }
    if args.len() > total {
        if spec.final_argument_whitespace {
            // the final slot absorbs the rest, collapsing whitespace runs
            let tail = args.split_off(total - 1).join(" ");
            args.push(tail);
        } else {
            return Err(DirectiveParseError::TooManyArguments {
                allowed: total,
                supplied: args.len(),
            });
        }
    }
    Ok(args)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{class_option, flag};
    use pretty_assertions::assert_eq;

    fn raw(meta: &str, value: &str) -> RawDirective {
        RawDirective {
            name: "test".to_owned(),
            meta: (!meta.is_empty()).then(|| meta.to_owned()),
            value: value.to_owned(),
            position: None,
        }
    }

    fn spec(required: usize, optional: usize) -> DirectiveSpec {
        DirectiveSpec {
            required_arguments: required,
            optional_arguments: optional,
            has_content: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_required_plus_optional_arguments() {
        let data = deconstruct(&raw("3 4", ""), &spec(1, 1)).unwrap();
        assert_eq!(data.args, vec!["3", "4"]);
    }

    #[test]
    fn test_too_many_arguments() {
        let err = deconstruct(&raw("3 4 5", ""), &spec(2, 0)).unwrap_err();
        assert_eq!(
            err,
            DirectiveParseError::TooManyArguments {
                allowed: 2,
                supplied: 3
            }
        );
    }

    #[test]
    fn test_missing_arguments() {
        let err = deconstruct(&raw("", ""), &spec(1, 0)).unwrap_err();
        assert_eq!(
            err,
            DirectiveParseError::MissingArguments {
                required: 1,
                supplied: 0
            }
        );
    }

    #[test]
    fn test_exactly_at_boundary_never_errors() {
        assert!(deconstruct(&raw("a", ""), &spec(1, 0)).is_ok());
        assert!(deconstruct(&raw("a b c", ""), &spec(1, 2)).is_ok());
    }

    #[test]
    fn test_final_argument_whitespace_absorbs() {
        let mut directive_spec = spec(1, 1);
        directive_spec.final_argument_whitespace = true;
        let data = deconstruct(&raw("one two  three   four", ""), &directive_spec).unwrap();
        assert_eq!(data.args, vec!["one", "two three four"]);
    }

    #[test]
    fn test_zero_arguments_first_line_prepended_to_body() {
        let mut directive_spec = spec(0, 0);
        directive_spec.has_content = true;
        let data = deconstruct(&raw("leading line", "body line"), &directive_spec).unwrap();
        assert_eq!(data.args, Vec::<String>::new());
        assert_eq!(data.body, "leading line\nbody line");
        assert_eq!(data.body_offset, 0);
    }

    #[test]
    fn test_colon_options() {
        let mut directive_spec = spec(0, 0);
        directive_spec.option_spec = OptionSpec::new().raw("width").convert("class", class_option);
        let data = deconstruct(
            &raw("", ":width: 50\n:class: Big Box\n\ncontent"),
            &directive_spec,
        )
        .unwrap();
        assert_eq!(data.options["width"], Value::String("50".to_owned()));
        assert_eq!(
            data.options["class"],
            Value::Sequence(vec![
                Value::String("big".to_owned()),
                Value::String("box".to_owned())
            ])
        );
        assert_eq!(data.body, "content");
        // two option lines, then the separating blank line
        assert_eq!(data.body_offset, 3);
    }

    #[test]
    fn test_yaml_options_block() {
        let mut directive_spec = spec(0, 0);
        directive_spec.option_spec = OptionSpec::new().raw("width").raw("height");
        let data = deconstruct(
            &raw("", "---\nwidth: 50\nheight: 9\n---\ncontent"),
            &directive_spec,
        )
        .unwrap();
        assert_eq!(data.options["width"], Value::String("50".to_owned()));
        assert_eq!(data.options["height"], Value::String("9".to_owned()));
        assert_eq!(data.body, "content");
        assert_eq!(data.body_offset, 4);
    }

    #[test]
    fn test_unknown_option() {
        let mut directive_spec = spec(0, 0);
        directive_spec.option_spec = OptionSpec::new().raw("width");
        let err = deconstruct(&raw("", ":depth: 2"), &directive_spec).unwrap_err();
        assert_eq!(err, DirectiveParseError::UnknownOption("depth".to_owned()));
    }

    #[test]
    fn test_raw_options_skip_validation() {
        let mut directive_spec = spec(0, 0);
        directive_spec.raw_options = true;
        let data = deconstruct(&raw("", ":anything: goes"), &directive_spec).unwrap();
        assert_eq!(data.options["anything"], Value::String("goes".to_owned()));
    }

    #[test]
    fn test_flag_option_from_null() {
        let mut directive_spec = spec(0, 0);
        directive_spec.option_spec = OptionSpec::new().convert("nowrap", flag);
        let data = deconstruct(&raw("", ":nowrap:"), &directive_spec).unwrap();
        assert_eq!(data.options["nowrap"], Value::Null);
    }

    #[test]
    fn test_conversion_failure_identifies_option() {
        let mut directive_spec = spec(0, 0);
        directive_spec.option_spec = OptionSpec::new().convert("nowrap", flag);
        let err = deconstruct(&raw("", ":nowrap: yes"), &directive_spec).unwrap_err();
        match err {
            DirectiveParseError::InvalidOptionValue { name, value, .. } => {
                assert_eq!(name, "nowrap");
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_mapping_options_error() {
        let mut directive_spec = spec(0, 0);
        directive_spec.raw_options = true;
        let err = deconstruct(&raw("", "---\n- a\n- b\n---"), &directive_spec).unwrap_err();
        assert!(matches!(err, DirectiveParseError::NotAMapping(_)));
    }

    #[test]
    fn test_content_not_allowed() {
        let mut directive_spec = spec(1, 0);
        directive_spec.has_content = false;
        let err = deconstruct(&raw("arg", "content"), &directive_spec).unwrap_err();
        assert_eq!(err, DirectiveParseError::UnexpectedContent);
    }

    #[test]
    fn test_blank_separator_line_consumed() {
        let data = deconstruct(&raw("arg", "\nbody"), &spec(1, 0)).unwrap();
        assert_eq!(data.body, "body");
        assert_eq!(data.body_offset, 1);
    }
}
