//! Built-in role and directive extensions.
//!
//! Each function returns an [`Extension`](crate::Extension) value to merge
//! via [`crate::ParserBuilder::extension`]; `Parser::with_defaults`
//! registers them all.

mod admonitions;
mod code;
mod images;
mod inline_markup;
mod math;
mod references;
mod targets;

pub use admonitions::admonitions;
pub use code::code;
pub use images::images;
pub use inline_markup::inline_markup;
pub use math::math;
pub use references::references;
pub use targets::targets;

use std::collections::BTreeMap;

use serde_yaml::Value;

/// The converted `class` option as a string list.
pub(crate) fn class_list(options: &BTreeMap<String, Value>) -> Vec<String> {
    match options.get("class") {
        Some(Value::Sequence(values)) => values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn option_string(options: &BTreeMap<String, Value>, name: &str) -> Option<String> {
    match options.get(name) {
        Some(Value::String(value)) => Some(value.clone()),
        _ => None,
    }
}

pub(crate) fn option_i64(options: &BTreeMap<String, Value>, name: &str) -> Option<i64> {
    options.get(name).and_then(Value::as_i64)
}
