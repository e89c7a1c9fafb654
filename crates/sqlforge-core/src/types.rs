//! Declared SQL column types.

use serde::{Deserialize, Serialize};

/// The declared type of a schema column.
///
/// This is the normalized type tag; the raw vendor spelling is preserved
/// separately on the field descriptor as `database_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    /// BOOLEAN.
    Boolean,
    /// SMALLINT.
    SmallInt,
    /// INTEGER.
    Integer,
    /// BIGINT.
    BigInt,
    /// REAL / FLOAT.
    Float,
    /// DOUBLE PRECISION.
    Double,
    /// DECIMAL / NUMERIC with precision and scale.
    Decimal,
    /// CHAR / VARCHAR / TEXT.
    Text,
    /// BLOB / BYTEA.
    Bytes,
    /// DATE.
    Date,
    /// TIME.
    Time,
    /// TIMESTAMP.
    Timestamp,
    /// TIMESTAMP WITH TIME ZONE.
    TimestampTz,
    /// UUID.
    Uuid,
    /// JSON / JSONB.
    Json,
    /// A type this layer does not recognize; carried through untouched.
    Other,
}

impl SqlType {
    /// The canonical SQL spelling of this type.
    #[must_use]
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "REAL",
            SqlType::Double => "DOUBLE PRECISION",
            SqlType::Decimal => "DECIMAL",
            SqlType::Text => "TEXT",
            SqlType::Bytes => "BYTEA",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::TimestampTz => "TIMESTAMPTZ",
            SqlType::Uuid => "UUID",
            SqlType::Json => "JSON",
            SqlType::Other => "OTHER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_name() {
        assert_eq!(SqlType::BigInt.sql_name(), "BIGINT");
        assert_eq!(SqlType::TimestampTz.sql_name(), "TIMESTAMPTZ");
    }
}
