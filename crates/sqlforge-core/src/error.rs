//! Error types for SQLForge.

use crate::dialect::Dialect;

/// Convenience alias for results produced by this crate family.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving metadata or generating command text.
///
/// Validation errors are raised at the point of first detection; no partial
/// SQL text is ever cached or returned once validation has failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// One or more order-by fields do not exist in the live schema.
    ///
    /// The `fields` list names every unmatched field, batched, so the caller
    /// sees the full extent of the mismatch in one error.
    MissingFields {
        /// Target table or view name.
        table: String,
        /// All requested field names with no schema counterpart.
        fields: Vec<String>,
    },
    /// A write operation that requires key fields resolved an empty key list.
    KeyFieldsNotFound {
        /// Target table or view name.
        table: String,
    },
    /// A write operation resolved zero usable fields against the schema.
    EmptyFields {
        /// Target table or view name.
        table: String,
    },
    /// A paged operation (batch or skip query) was requested without ordering.
    ///
    /// Paging without a deterministic order silently shuffles batches, so
    /// this is surfaced as an error rather than defaulting to any column.
    OrderByRequired {
        /// Target table or view name.
        table: String,
    },
    /// Query hints were supplied to a dialect that has no hint syntax.
    HintsNotSupported {
        /// The dialect that rejected the hints.
        dialect: Dialect,
    },
    /// No statement builder is registered for the requested dialect.
    NoBuilder {
        /// The dialect the request targeted.
        dialect: Dialect,
    },
    /// An identifier failed validation before being rendered into SQL text.
    InvalidIdentifier {
        /// The offending identifier.
        name: String,
    },
    /// A schema or attribute metadata provider failed.
    ///
    /// Provider failures propagate unchanged; this layer adds no retry logic.
    Provider(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingFields { table, fields } => {
                write!(
                    f,
                    "fields ({}) are not present in table '{}'",
                    fields.join(", "),
                    table
                )
            }
            Error::KeyFieldsNotFound { table } => {
                write!(f, "no key field could be resolved for table '{}'", table)
            }
            Error::EmptyFields { table } => {
                write!(f, "no usable fields resolved for table '{}'", table)
            }
            Error::OrderByRequired { table } => {
                write!(f, "an order-by specification is required to page table '{}'", table)
            }
            Error::HintsNotSupported { dialect } => {
                write!(f, "query hints are not supported by the {} dialect", dialect)
            }
            Error::NoBuilder { dialect } => {
                write!(f, "no statement builder registered for the {} dialect", dialect)
            }
            Error::InvalidIdentifier { name } => {
                write!(f, "'{}' is not a valid SQL identifier", name)
            }
            Error::Provider(message) => write!(f, "metadata provider error: {}", message),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_names_every_field() {
        let err = Error::MissingFields {
            table: "heroes".to_string(),
            fields: vec!["Ghost".to_string(), "Phantom".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("Ghost"));
        assert!(text.contains("Phantom"));
        assert!(text.contains("heroes"));
    }

    #[test]
    fn test_display_key_fields_not_found() {
        let err = Error::KeyFieldsNotFound {
            table: "audit_log".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no key field could be resolved for table 'audit_log'"
        );
    }

    #[test]
    fn test_display_hints_not_supported() {
        let err = Error::HintsNotSupported {
            dialect: Dialect::Postgres,
        };
        assert!(err.to_string().contains("postgres"));
    }
}
