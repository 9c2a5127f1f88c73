//! Routine signature parsing: argument lists and return expressions.

use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::sanitize_name;

static TABLE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^TABLE\s*\((.*)\)$").unwrap());

static SETOF_RETURN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^SETOF\s+(.+)$").unwrap());

const ARGUMENT_MODES: &[&str] = &["IN", "OUT", "INOUT", "VARIADIC"];

/// A name and provider type, as written in an argument or column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub provider_type: String,
}

/// A classified return expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnExpression {
    Void,
    Table(Vec<Argument>),
    SetOf {
        schema: Option<String>,
        name: String,
    },
    Scalar(String),
}

/// Split on commas that are not inside parentheses or quotes.
pub fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quoted = false;
    let mut start = 0;

    for (i, ch) in list.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth -= 1,
            ',' if !quoted && depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = list[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts.retain(|p| !p.is_empty());
    parts
}

/// Parse one `name type` entry. Modes and defaults are dropped; an entry
/// with only a type gets the name `arg{position}`.
pub fn parse_argument(entry: &str, position: usize) -> Option<Argument> {
    let mut rest = strip_default(entry.trim());

    if let Some((first, tail)) = split_word(rest) {
        if ARGUMENT_MODES.iter().any(|m| first.eq_ignore_ascii_case(m)) && !tail.is_empty() {
            rest = tail;
        }
    }

    if rest.is_empty() {
        return None;
    }

    let (name, provider_type) = match rest.strip_prefix('"') {
        Some(quoted) => match quoted.find('"') {
            Some(end) => (&quoted[..end], quoted[end + 1..].trim()),
            None => (quoted, ""),
        },
        None => split_word(rest).unwrap_or((rest, "")),
    };

    if provider_type.is_empty() {
        return Some(Argument {
            name: format!("arg{position}"),
            provider_type: rest.to_string(),
        });
    }

    Some(Argument {
        name: sanitize_name(name),
        provider_type: provider_type.to_string(),
    })
}

/// Parse a full argument list, in order.
pub fn parse_arguments(list: &str) -> Vec<Argument> {
    split_top_level(list)
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| parse_argument(entry, i))
        .collect()
}

/// Classify a return expression such as `SETOF customer`.
pub fn parse_return(expression: &str) -> ReturnExpression {
    let expression = expression.trim();

    if expression.eq_ignore_ascii_case("void") {
        return ReturnExpression::Void;
    }

    if let Some(caps) = TABLE_RETURN.captures(expression) {
        return ReturnExpression::Table(parse_arguments(&caps[1]));
    }

    if let Some(caps) = SETOF_RETURN.captures(expression) {
        let target = caps[1].trim();
        let (schema, name) = match split_qualified(target) {
            Some((schema, name)) => (Some(sanitize_name(schema)), sanitize_name(name)),
            None => (None, sanitize_name(target)),
        };
        return ReturnExpression::SetOf { schema, name };
    }

    ReturnExpression::Scalar(expression.to_string())
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    let end = text.find(char::is_whitespace)?;
    Some((&text[..end], text[end..].trim()))
}

fn strip_default(entry: &str) -> &str {
    let lower = entry.to_ascii_lowercase();
    let cut = [" default ", "="]
        .iter()
        .filter_map(|marker| lower.find(marker))
        .min();
    match cut {
        Some(index) => entry[..index].trim(),
        None => entry,
    }
}

/// `schema.name`, where the dot is outside quotes.
fn split_qualified(target: &str) -> Option<(&str, &str)> {
    let mut quoted = false;
    for (i, ch) in target.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '.' if !quoted => return Some((&target[..i], &target[i + 1..])),
            _ => {}
        }
    }
    None
}
