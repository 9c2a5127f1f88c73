//! Provider type names to semantic types.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::scalar::{ScalarType, SemanticType};

static POSTGRES: LazyLock<TypeMapper> = LazyLock::new(|| {
    use ScalarType::*;

    TypeMapper::new([
        ("boolean", Bool),
        ("bit(1)", Bool),
        ("smallint", Int16),
        ("integer", Int32),
        ("bigint", Int64),
        ("real", Float32),
        ("double precision", Float64),
        ("numeric", Decimal),
        ("money", Decimal),
        ("text", Text),
        ("character varying", Text),
        ("character", Text),
        ("citext", Text),
        ("json", Text),
        ("jsonb", Text),
        ("xml", Text),
        ("point", Point),
        ("lseg", LineSegment),
        ("path", Path),
        ("polygon", Polygon),
        ("line", Line),
        ("circle", Circle),
        ("box", Box),
        ("bit(n)", BitArray),
        ("bit varying", BitArray),
        ("hstore", Dictionary),
        ("uuid", Uuid),
        ("cidr", IpNetwork),
        ("inet", IpAddress),
        ("macaddr", MacAddress),
        ("tsquery", TsQuery),
        ("tsvector", TsVector),
        ("date", DateTime),
        ("interval", TimeSpan),
        ("timestamp", DateTime),
        ("timestamp without time zone", DateTime),
        ("timestamp with time zone", DateTime),
        ("time", TimeSpan),
        ("time with time zone", DateTimeOffset),
        ("bytea", Binary),
        ("oid", UInt32),
        ("xid", UInt32),
        ("cid", UInt32),
        ("oidvector", UInt32Array),
    ])
});

static TYPE_AND_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^()]+?)\s*\(\s*(\d+)\s*(?:,\s*\d+\s*)?\)\s*$").unwrap());

/// Immutable lookup table from provider type names to scalar types.
///
/// Components receive a `&TypeMapper` instead of reaching for a global, so
/// tests can build their own table.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    table: HashMap<String, ScalarType>,
}

impl TypeMapper {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ScalarType)>,
        S: Into<String>,
    {
        Self {
            table: entries
                .into_iter()
                .map(|(name, scalar)| (normalize(&name.into()), scalar))
                .collect(),
        }
    }

    /// The Postgres table, built on first use.
    pub fn postgres() -> &'static TypeMapper {
        &POSTGRES
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, provider_name: &str, scalar: ScalarType) -> Self {
        self.table.insert(normalize(provider_name), scalar);
        self
    }

    /// Look up a provider name without logging.
    pub fn lookup(&self, provider_name: &str) -> Option<ScalarType> {
        self.table.get(&normalize(provider_name)).copied()
    }

    /// Resolve a provider name to a non-nullable semantic type.
    ///
    /// Unknown names are logged and yield `None`; callers treat that as
    /// "cannot auto-map".
    pub fn resolve(&self, provider_name: &str) -> Option<SemanticType> {
        match self.lookup(provider_name) {
            Some(scalar) => Some(SemanticType::new(scalar)),
            None => {
                warn!(
                    provider_type = provider_name,
                    "unable to determine semantic type for provider type"
                );
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Split `character varying(100)` into its name and size.
///
/// Precision/scale pairs keep the precision as the size. Anything without a
/// trailing parenthesised size is returned whole with no size.
pub fn parse_type_and_size(raw: &str) -> (String, Option<u32>) {
    match TYPE_AND_SIZE.captures(raw) {
        Some(caps) => {
            let size = caps[2].parse().ok();
            (caps[1].to_string(), size)
        }
        None => (raw.trim().to_string(), None),
    }
}
