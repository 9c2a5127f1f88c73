//! Name formatting for renderers.
//!
//! Database names are snake_case; generated code wants Pascal, camel,
//! kebab or human-readable forms of them.

mod inflection;

pub use inflection::{pluralize, singularize};

use inflector::Inflector;

use crate::model::FieldWalker;

const ID_SUFFIX: &str = " Id";

/// `customer_address` to `CustomerAddress`. Each part keeps its own casing
/// after the first letter.
pub fn class_name(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

/// `customer_address` to `customerAddress`.
///
/// Names without underscores lower-case their leading run of capitals,
/// leaving the last capital of a run that starts a new word: `ABC` gives
/// `abc`, `ABcDefg` gives `aBcDefg`.
pub fn camel_case(name: &str) -> String {
    if name.contains('_') {
        let mut parts = name.split('_');
        let first = parts.next().unwrap_or_default().to_lowercase();
        return first + &parts.map(capitalize).collect::<String>();
    }

    let chars: Vec<char> = name.chars().collect();
    let mut out = chars.clone();
    for i in 0..chars.len() {
        if i == 1 && !chars[i].is_uppercase() {
            break;
        }
        let next_is_lower = chars.get(i + 1).is_some_and(|c| !c.is_uppercase());
        if i > 0 && next_is_lower {
            break;
        }
        out[i] = chars[i].to_lowercase().next().unwrap_or(chars[i]);
    }
    out.into_iter().collect()
}

/// `CustomerAddress` or `customer_address` to `customer-address`.
pub fn kebab_case(name: &str) -> String {
    if name.chars().next().is_some_and(char::is_uppercase) {
        name.to_kebab_case()
    } else {
        name.replace('_', "-")
    }
}

/// `customer_address` to `Customer Address`.
pub fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|p| !p.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`humanize`], dropping a trailing ` Id` from reference fields:
/// `customer_id` reads as `Customer`.
pub fn humanize_field(field: &FieldWalker<'_>) -> String {
    let name = humanize(field.name());
    match name.strip_suffix(ID_SUFFIX) {
        Some(stripped) if field.get().has_reference_type() => stripped.to_string(),
        _ => name,
    }
}

/// `item_name` without `type_name` in it, trimmed of underscores:
/// `customer_select_by_id` on `customer` gives `select_by_id`.
pub fn bare_name(item_name: &str, type_name: &str) -> String {
    if type_name.is_empty() {
        return item_name.to_string();
    }
    item_name
        .replace(type_name, "")
        .trim_matches('_')
        .replace("__", "_")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
