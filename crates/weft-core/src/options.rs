//! Directive option conversion functions.
//!
//! Each directive declares an [`OptionSpec`] mapping option names to
//! conversion functions; deconstruction applies the named function to the
//! stringified raw value and stores the result. A conversion failing is a
//! user-facing directive parsing error, wrapped with the option name and
//! raw value by the caller.
//!
//! The converter set follows the docutils vocabulary: flags, identifier
//! class lists, integers, percentages, and CSS-style measures.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_yaml::Value;
use thiserror::Error;

/// A conversion function failed for the supplied raw value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct OptionError(pub String);

/// A named conversion function.
pub type Converter = Arc<dyn Fn(&str) -> Result<Value, OptionError> + Send + Sync>;

/// The option table of a directive: option name to conversion function.
///
/// A `None` entry accepts the raw string unchanged.
#[derive(Clone, Default)]
pub struct OptionSpec {
    converters: BTreeMap<String, Option<Converter>>,
}

impl OptionSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option that keeps its raw string value.
    #[must_use]
    pub fn raw(mut self, name: impl Into<String>) -> Self {
        self.converters.insert(name.into(), None);
        self
    }

    /// Declare an option converted by `f`.
    #[must_use]
    pub fn convert(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&str) -> Result<Value, OptionError> + Send + Sync + 'static,
    ) -> Self {
        self.converters.insert(name.into(), Some(Arc::new(f)));
        self
    }

    /// Declare an option with a prebuilt converter (e.g. [`choice`]).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, converter: Converter) -> Self {
        self.converters.insert(name.into(), Some(converter));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Option<Converter>> {
        self.converters.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl std::fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.converters.keys()).finish()
    }
}

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static ID_TRIM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-0-9]+|-+$").unwrap());

/// Normalize a string to an HTML4-style id: lowercase, non-alphanumeric runs
/// collapsed to `-`, leading digits/dashes and trailing dashes trimmed.
#[must_use]
pub fn make_id(name: &str) -> String {
    let lowered = name.to_lowercase();
    let dashed = NON_ALNUM.replace_all(&lowered, "-");
    ID_TRIM.replace_all(&dashed, "").into_owned()
}

/// Keep the value unchanged.
pub fn unchanged(value: &str) -> Result<Value, OptionError> {
    Ok(Value::String(value.to_owned()))
}

/// Keep the value unchanged, but require it to be non-empty.
pub fn unchanged_required(value: &str) -> Result<Value, OptionError> {
    if value.is_empty() {
        return Err(OptionError("argument required but none supplied".to_owned()));
    }
    Ok(Value::String(value.to_owned()))
}

/// A flag option: no argument allowed.
pub fn flag(value: &str) -> Result<Value, OptionError> {
    if value.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Err(OptionError(format!(
            "no argument is allowed: \"{value}\" supplied"
        )))
    }
}

/// Split on whitespace and normalize each word to an id.
pub fn class_option(value: &str) -> Result<Value, OptionError> {
    Ok(Value::Sequence(
        value
            .split_whitespace()
            .map(|name| Value::String(make_id(name)))
            .collect(),
    ))
}

/// An integer argument.
pub fn int(value: &str) -> Result<Value, OptionError> {
    if value.is_empty() {
        return Err(OptionError("value is not set".to_owned()));
    }
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| OptionError(format!("value \"{value}\" is not an integer")))?;
    if number.fract() != 0.0 {
        return Err(OptionError(format!("value \"{value}\" is not an integer")));
    }
    #[allow(clippy::cast_possible_truncation)]
    let integer = number as i64;
    Ok(Value::Number(integer.into()))
}

/// A non-negative integer argument.
pub fn nonnegative_int(value: &str) -> Result<Value, OptionError> {
    let converted = int(value)?;
    if converted.as_i64().is_some_and(|n| n < 0) {
        return Err(OptionError(format!(
            "value \"{value}\" must be positive or zero"
        )));
    }
    Ok(converted)
}

/// A non-negative integer or nothing.
pub fn optional_int(value: &str) -> Result<Value, OptionError> {
    if value.is_empty() {
        Ok(Value::Null)
    } else {
        nonnegative_int(value)
    }
}

static PERCENT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*%$").unwrap());

/// An integer percentage, with an optional percent sign.
pub fn percentage(value: &str) -> Result<Value, OptionError> {
    nonnegative_int(&PERCENT_SUFFIX.replace(value, ""))
}

const LENGTH_UNITS: &[&str] = &["em", "ex", "px", "in", "cm", "mm", "pt", "pc"];

/// A positive measure in one of `units`, returned as `"<value><unit>"`.
fn measure(value: &str, units: &[&str]) -> Result<Value, OptionError> {
    let trimmed = value.trim();
    for unit in units {
        if let Some(number) = trimmed.strip_suffix(unit) {
            let number = number.trim_end();
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit() || c == '.') {
                return Ok(Value::String(format!("{number}{unit}")));
            }
        }
    }
    Err(OptionError(format!(
        "not a positive measure of one of the following units: {}",
        units.join("|")
    )))
}

/// A positive length, allowing no unit.
pub fn length_or_unitless(value: &str) -> Result<Value, OptionError> {
    let mut units: Vec<&str> = LENGTH_UNITS.to_vec();
    units.push("");
    measure(value, &units)
}

/// A positive length or percentage, allowing no unit.
pub fn length_or_percentage_or_unitless(value: &str) -> Result<Value, OptionError> {
    let mut units: Vec<&str> = LENGTH_UNITS.to_vec();
    units.push("%");
    measure(value, &units).or_else(|_| length_or_unitless(value))
}

/// Like [`length_or_percentage_or_unitless`], additionally accepting the
/// literal `image`.
pub fn length_or_percentage_or_unitless_figure(value: &str) -> Result<Value, OptionError> {
    if value.eq_ignore_ascii_case("image") {
        return Ok(Value::String("image".to_owned()));
    }
    length_or_percentage_or_unitless(value)
}

/// A converter asserting the lowercased, trimmed value is one of `choices`.
pub fn choice(choices: &'static [&'static str]) -> Converter {
    Arc::new(move |value: &str| {
        let value = value.trim().to_lowercase();
        if choices.contains(&value.as_str()) {
            Ok(Value::String(value))
        } else {
            Err(OptionError(format!("must be in: {}", choices.join("|"))))
        }
    })
}

/// A URI value, kept as supplied.
pub fn uri(value: &str) -> Result<Value, OptionError> {
    Ok(Value::String(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_id() {
        assert_eq!(make_id("My Heading"), "my-heading");
        assert_eq!(make_id("  a  b  "), "a-b");
        assert_eq!(make_id("123abc"), "abc");
        assert_eq!(make_id("x--"), "x");
    }

    #[test]
    fn test_flag() {
        assert_eq!(flag(""), Ok(Value::Null));
        assert_eq!(flag("  "), Ok(Value::Null));
        assert!(flag("yes").is_err());
    }

    #[test]
    fn test_class_option() {
        assert_eq!(
            class_option("Foo  Bar").unwrap(),
            Value::Sequence(vec![
                Value::String("foo".to_owned()),
                Value::String("bar".to_owned())
            ])
        );
    }

    #[test]
    fn test_int() {
        assert_eq!(int("3").unwrap(), Value::Number(3.into()));
        assert_eq!(int("-2").unwrap(), Value::Number((-2).into()));
        assert!(int("3.5").is_err());
        assert!(int("abc").is_err());
        assert!(int("").is_err());
    }

    #[test]
    fn test_nonnegative_and_optional_int() {
        assert!(nonnegative_int("-1").is_err());
        assert_eq!(optional_int("").unwrap(), Value::Null);
        assert_eq!(optional_int("4").unwrap(), Value::Number(4.into()));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage("50 %").unwrap(), Value::Number(50.into()));
        assert_eq!(percentage("50").unwrap(), Value::Number(50.into()));
    }

    #[test]
    fn test_measures() {
        assert_eq!(
            length_or_unitless("3 pt").unwrap(),
            Value::String("3pt".to_owned())
        );
        assert_eq!(
            length_or_unitless("3").unwrap(),
            Value::String("3".to_owned())
        );
        assert_eq!(
            length_or_percentage_or_unitless("3%").unwrap(),
            Value::String("3%".to_owned())
        );
        assert!(length_or_unitless("wide").is_err());
        assert_eq!(
            length_or_percentage_or_unitless_figure("Image").unwrap(),
            Value::String("image".to_owned())
        );
    }

    #[test]
    fn test_choice() {
        let align = choice(&["left", "center", "right"]);
        assert_eq!(align(" Left ").unwrap(), Value::String("left".to_owned()));
        assert!(align("middle").is_err());
    }

    #[test]
    fn test_unchanged_required() {
        assert!(unchanged_required("").is_err());
        assert_eq!(
            unchanged_required("x").unwrap(),
            Value::String("x".to_owned())
        );
    }
}
