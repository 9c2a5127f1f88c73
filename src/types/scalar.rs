//! Canonical semantic scalar types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical scalar type, independent of the provider's spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    /// Any character data, including json and xml documents.
    Text,
    Uuid,
    /// Dates and timestamps, with or without zone.
    DateTime,
    /// Time of day with zone.
    DateTimeOffset,
    /// Intervals and time of day.
    TimeSpan,
    Binary,
    UInt32,
    UInt32Array,
    BitArray,
    Dictionary,
    IpAddress,
    IpNetwork,
    MacAddress,
    TsQuery,
    TsVector,
    Point,
    LineSegment,
    Path,
    Polygon,
    Line,
    Circle,
    Box,
}

impl ScalarType {
    /// Reference-like scalars have no separate non-null representation, so
    /// they are always nullable.
    pub fn is_reference_like(self) -> bool {
        matches!(
            self,
            ScalarType::Text
                | ScalarType::Binary
                | ScalarType::BitArray
                | ScalarType::Dictionary
                | ScalarType::IpAddress
                | ScalarType::MacAddress
                | ScalarType::TsQuery
                | ScalarType::TsVector
                | ScalarType::Path
                | ScalarType::Polygon
                | ScalarType::UInt32Array
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ScalarType::Int16 | ScalarType::Int32 | ScalarType::Int64 | ScalarType::UInt32
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer()
            || matches!(
                self,
                ScalarType::Float32 | ScalarType::Float64 | ScalarType::Decimal
            )
    }

    /// C# spelling of the non-nullable type.
    pub fn csharp_name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int16 => "short",
            ScalarType::Int32 => "int",
            ScalarType::Int64 => "long",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
            ScalarType::Decimal => "decimal",
            ScalarType::Text => "string",
            ScalarType::Uuid => "Guid",
            ScalarType::DateTime => "DateTime",
            ScalarType::DateTimeOffset => "DateTimeOffset",
            ScalarType::TimeSpan => "TimeSpan",
            ScalarType::Binary => "byte[]",
            ScalarType::UInt32 => "uint",
            ScalarType::UInt32Array => "uint[]",
            ScalarType::BitArray => "BitArray",
            ScalarType::Dictionary => "IDictionary<string, string>",
            ScalarType::IpAddress => "IPAddress",
            ScalarType::IpNetwork => "(IPAddress, int)",
            ScalarType::MacAddress => "PhysicalAddress",
            ScalarType::TsQuery => "NpgsqlTsQuery",
            ScalarType::TsVector => "NpgsqlTsVector",
            ScalarType::Point => "NpgsqlPoint",
            ScalarType::LineSegment => "NpgsqlLSeg",
            ScalarType::Path => "NpgsqlPath",
            ScalarType::Polygon => "NpgsqlPolygon",
            ScalarType::Line => "NpgsqlLine",
            ScalarType::Circle => "NpgsqlCircle",
            ScalarType::Box => "NpgsqlBox",
        }
    }

    /// TypeScript spelling; anything without a natural mapping is `any`.
    pub fn typescript_name(self) -> &'static str {
        match self {
            ScalarType::Text => "string",
            ScalarType::Bool => "boolean",
            ScalarType::DateTime => "Date",
            ScalarType::Binary => "File",
            s if s.is_numeric() => "number",
            _ => "any",
        }
    }
}

/// A scalar plus nullability.
///
/// Nullability is tracked independently of the scalar so a nullable column
/// can be expressed without a second scalar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemanticType {
    pub scalar: ScalarType,
    /// Explicitly wrapped as nullable.
    pub nullable: bool,
}

impl SemanticType {
    pub fn new(scalar: ScalarType) -> Self {
        Self {
            scalar,
            nullable: false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable || self.scalar.is_reference_like()
    }

    /// Nullable variant; already-nullable types are returned unchanged.
    pub fn to_nullable(self) -> Self {
        if self.is_nullable() {
            self
        } else {
            Self {
                nullable: true,
                ..self
            }
        }
    }

    /// True when `self` is the wrapped form of the non-nullable `other`.
    pub fn is_nullable_variant_of(&self, other: &SemanticType) -> bool {
        self.scalar == other.scalar
            && self.nullable
            && !other.nullable
            && !other.scalar.is_reference_like()
    }

    pub fn csharp_name(&self) -> String {
        if self.nullable && !self.scalar.is_reference_like() {
            format!("{}?", self.scalar.csharp_name())
        } else {
            self.scalar.csharp_name().to_string()
        }
    }

    pub fn typescript_name(&self) -> &'static str {
        self.scalar.typescript_name()
    }
}

impl From<ScalarType> for SemanticType {
    fn from(scalar: ScalarType) -> Self {
        Self::new(scalar)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.csharp_name())
    }
}
