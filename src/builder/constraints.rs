//! Unique-constraint definition parsing.

use crate::metadata::sanitize_name;

/// Member column names of a constraint definition such as
/// `UNIQUE (customer_id, "order")`, in definition order.
///
/// Returns an empty list when the definition has no parenthesised part.
pub fn constraint_columns(definition: &str) -> Vec<String> {
    let Some(open) = definition.find('(') else {
        return Vec::new();
    };

    let mut depth = 0usize;
    let mut close = None;
    for (offset, ch) in definition[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + offset);
                    break;
                }
            }
            _ => {}
        }
    }

    let Some(close) = close else {
        return Vec::new();
    };

    definition[open + 1..close]
        .split(',')
        .map(sanitize_name)
        .filter(|name| !name.is_empty())
        .collect()
}
