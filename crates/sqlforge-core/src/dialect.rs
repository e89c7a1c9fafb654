//! SQL dialect tags and their lexical conventions.

use serde::{Deserialize, Serialize};

/// The SQL dialect a connection, schema field, or statement builder targets.
///
/// The dialect decides placeholder syntax and identifier quoting; everything
/// else dialect-specific lives in the statement builder for that dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL: `$1` placeholders, double-quoted identifiers.
    #[default]
    Postgres,
    /// SQLite: `?1` placeholders, double-quoted identifiers.
    Sqlite,
    /// MySQL: `?` placeholders, backtick-quoted identifiers.
    Mysql,
}

impl Dialect {
    /// Render the parameter placeholder for a 1-based position.
    #[must_use]
    pub fn placeholder(&self, position: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", position),
            Dialect::Sqlite => format!("?{}", position),
            Dialect::Mysql => "?".to_string(),
        }
    }

    /// The quote character pair used for identifiers in this dialect.
    #[must_use]
    pub const fn quote_chars(&self) -> (char, char) {
        match self {
            Dialect::Postgres | Dialect::Sqlite => ('"', '"'),
            Dialect::Mysql => ('`', '`'),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_postgres() {
        assert_eq!(Dialect::Postgres.placeholder(1), "$1");
        assert_eq!(Dialect::Postgres.placeholder(12), "$12");
    }

    #[test]
    fn test_placeholder_sqlite() {
        assert_eq!(Dialect::Sqlite.placeholder(3), "?3");
    }

    #[test]
    fn test_placeholder_mysql_is_positionless() {
        assert_eq!(Dialect::Mysql.placeholder(1), "?");
        assert_eq!(Dialect::Mysql.placeholder(7), "?");
    }

    #[test]
    fn test_default_dialect() {
        assert_eq!(Dialect::default(), Dialect::Postgres);
    }

    #[test]
    fn test_display() {
        assert_eq!(Dialect::Sqlite.to_string(), "sqlite");
    }
}
