//! Plural and singular forms of names.
//!
//! Only the last word of a phrase or snake_case name is inflected, so
//! `customer_address` becomes `customer_addresses` and `the cat` becomes
//! `the cats`.

use inflector::Inflector;

/// Irregular forms that show up in table names and that `inflector`
/// gets wrong or leaves alone.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("staff", "staff"),
    ("status", "statuses"),
    ("address", "addresses"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("medium", "media"),
    ("leaf", "leaves"),
    ("life", "lives"),
];

/// Pluralize the last word. Already-plural words are kept.
pub fn pluralize(name: &str) -> String {
    inflect_last_word(name, |word| {
        let lower = word.to_lowercase();
        for (singular, plural) in IRREGULAR_PLURALS {
            if lower == *singular || lower == *plural {
                return plural.to_string();
            }
        }
        word.to_plural()
    })
}

/// Singularize the last word. Already-singular words are kept.
pub fn singularize(name: &str) -> String {
    inflect_last_word(name, |word| {
        let lower = word.to_lowercase();
        for (singular, plural) in IRREGULAR_PLURALS {
            if lower == *plural || lower == *singular {
                return singular.to_string();
            }
        }
        word.to_singular()
    })
}

fn inflect_last_word(name: &str, inflect: impl Fn(&str) -> String) -> String {
    match name.rfind([' ', '_']) {
        Some(index) if index + 1 < name.len() => {
            format!("{}{}", &name[..=index], inflect(&name[index + 1..]))
        }
        Some(_) => name.to_string(),
        None if name.is_empty() => String::new(),
        None => inflect(name),
    }
}
