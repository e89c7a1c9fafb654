//! PostgreSQL statement builder.

use sqlforge_core::{DbField, Dialect, Error, Result, quote_ident, quote_table};

use crate::ansi;
use crate::builder::{CommandKind, ResolvedCommand, StatementBuilder};

/// Renders command text in the PostgreSQL dialect.
///
/// Generated values come back through `RETURNING`; merges are emitted as
/// `INSERT ... ON CONFLICT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresStatementBuilder;

impl PostgresStatementBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn insert(&self, cmd: &ResolvedCommand<'_>, rows: usize) -> Result<String> {
        let cols = ansi::writable_fields(cmd);
        if cols.is_empty() {
            return Err(Error::EmptyFields {
                table: cmd.table.to_string(),
            });
        }
        let table = quote_table(cmd.table, self.dialect())?;
        let names: Vec<String> = cols
            .iter()
            .map(|f| quote_ident(&f.name, self.dialect()))
            .collect();
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            names.join(", "),
            ansi::values_rows(cols.len(), rows, self.dialect()),
        );
        if let Some(key) = cmd.key_fields.first() {
            sql.push_str(&format!(" RETURNING {}", quote_ident(&key.name, self.dialect())));
        }
        Ok(sql)
    }

    fn merge(&self, cmd: &ResolvedCommand<'_>, rows: usize) -> Result<String> {
        let conflict: Vec<String> = if cmd.qualifiers.is_empty() {
            cmd.key_fields.iter().map(|k| k.name.clone()).collect()
        } else {
            cmd.qualifiers.to_vec()
        };
        if conflict.is_empty() {
            return Err(Error::KeyFieldsNotFound {
                table: cmd.table.to_string(),
            });
        }

        // Qualifier columns are inserted even when server-generated: a merge
        // matching on identity carries the caller-supplied key value.
        let cols: Vec<&DbField> = cmd
            .fields
            .iter()
            .filter(|f| f.is_writable() || ansi::name_in(&f.name, &conflict))
            .collect();
        if cols.is_empty() {
            return Err(Error::EmptyFields {
                table: cmd.table.to_string(),
            });
        }

        let table = quote_table(cmd.table, self.dialect())?;
        let names: Vec<String> = cols
            .iter()
            .map(|f| quote_ident(&f.name, self.dialect()))
            .collect();
        let targets: Vec<String> = conflict
            .iter()
            .map(|q| quote_ident(q, self.dialect()))
            .collect();
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {} ON CONFLICT ({})",
            table,
            names.join(", "),
            ansi::values_rows(cols.len(), rows, self.dialect()),
            targets.join(", "),
        );

        let updates: Vec<String> = cols
            .iter()
            .filter(|f| !ansi::name_in(&f.name, &conflict))
            .map(|f| {
                let name = quote_ident(&f.name, self.dialect());
                format!("{} = EXCLUDED.{}", name, name)
            })
            .collect();
        if updates.is_empty() {
            sql.push_str(" DO NOTHING");
        } else {
            sql.push_str(&format!(" DO UPDATE SET {}", updates.join(", ")));
        }

        if let Some(key) = cmd.key_fields.first() {
            sql.push_str(&format!(" RETURNING {}", quote_ident(&key.name, self.dialect())));
        }
        Ok(sql)
    }

    fn truncate(&self, cmd: &ResolvedCommand<'_>) -> Result<String> {
        Ok(format!(
            "TRUNCATE TABLE {}",
            quote_table(cmd.table, self.dialect())?
        ))
    }
}

impl StatementBuilder for PostgresStatementBuilder {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn build(&self, kind: CommandKind, cmd: &ResolvedCommand<'_>) -> Result<String> {
        ansi::reject_hints(cmd, self.dialect())?;
        let batch = cmd.batch_size.unwrap_or(1).max(1);
        match kind {
            CommandKind::Query | CommandKind::QueryAll | CommandKind::QueryMultiple => {
                ansi::build_query(cmd, self.dialect())
            }
            CommandKind::BatchQuery => ansi::build_batch_query(cmd, self.dialect()),
            CommandKind::SkipQuery => ansi::build_skip_query(cmd, self.dialect(), None),
            CommandKind::Insert => self.insert(cmd, 1),
            CommandKind::InsertAll => self.insert(cmd, batch),
            CommandKind::Update => ansi::build_update(cmd, self.dialect()),
            CommandKind::UpdateAll => ansi::build_update_all(cmd, self.dialect()),
            CommandKind::Merge => self.merge(cmd, 1),
            CommandKind::MergeAll => self.merge(cmd, batch),
            CommandKind::Delete | CommandKind::DeleteAll => ansi::build_delete(cmd, self.dialect()),
            CommandKind::Count | CommandKind::CountAll => ansi::build_count(cmd, self.dialect()),
            CommandKind::Exists => ansi::build_exists(cmd, self.dialect()),
            CommandKind::Average | CommandKind::AverageAll => {
                ansi::build_aggregate(cmd, self.dialect(), "AVG", "AverageValue")
            }
            CommandKind::Max | CommandKind::MaxAll => {
                ansi::build_aggregate(cmd, self.dialect(), "MAX", "MaxValue")
            }
            CommandKind::Min | CommandKind::MinAll => {
                ansi::build_aggregate(cmd, self.dialect(), "MIN", "MinValue")
            }
            CommandKind::Sum | CommandKind::SumAll => {
                ansi::build_aggregate(cmd, self.dialect(), "SUM", "SumValue")
            }
            CommandKind::Truncate => self.truncate(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Operation, OrderField, QueryField, QueryGroup};
    use sqlforge_core::SqlType;

    fn schema() -> Vec<DbField> {
        vec![
            DbField::new("Id", SqlType::BigInt).primary(true).identity(true),
            DbField::new("Name", SqlType::Text),
            DbField::new("Age", SqlType::Integer),
        ]
    }

    fn keys(fields: &[DbField]) -> Vec<DbField> {
        fields.iter().filter(|f| f.is_key()).cloned().collect()
    }

    #[test]
    fn test_query() {
        let fields = schema();
        let where_group = QueryGroup::all(vec![QueryField::new("Name", Operation::Equal, "x")]);
        let order = [OrderField::ascending("Id")];
        let cmd = ResolvedCommand {
            fields: &fields,
            where_group: Some(&where_group),
            order_by: &order,
            top: Some(5),
            ..ResolvedCommand::new("heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::Query, &cmd)
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"Id\", \"Name\", \"Age\" FROM \"heroes\" WHERE \"Name\" = $1 ORDER BY \"Id\" ASC LIMIT 5"
        );
    }

    #[test]
    fn test_batch_query_requires_order() {
        let fields = schema();
        let cmd = ResolvedCommand {
            fields: &fields,
            rows_per_batch: Some(20),
            ..ResolvedCommand::new("heroes")
        };
        let err = PostgresStatementBuilder::new()
            .build(CommandKind::BatchQuery, &cmd)
            .unwrap_err();
        assert!(matches!(err, Error::OrderByRequired { .. }));
    }

    #[test]
    fn test_batch_query_paging() {
        let fields = schema();
        let order = [OrderField::ascending("Id")];
        let cmd = ResolvedCommand {
            fields: &fields,
            order_by: &order,
            page: Some(2),
            rows_per_batch: Some(20),
            ..ResolvedCommand::new("heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::BatchQuery, &cmd)
            .unwrap();
        assert!(sql.ends_with("ORDER BY \"Id\" ASC LIMIT 20 OFFSET 40"));
    }

    #[test]
    fn test_insert_skips_generated_and_returns_key() {
        let fields = schema();
        let key_fields = keys(&fields);
        let cmd = ResolvedCommand {
            fields: &fields,
            key_fields: &key_fields,
            ..ResolvedCommand::new("heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::Insert, &cmd)
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"heroes\" (\"Name\", \"Age\") VALUES ($1, $2) RETURNING \"Id\""
        );
    }

    #[test]
    fn test_insert_all_numbers_rows_continuously() {
        let fields = schema();
        let key_fields = keys(&fields);
        let cmd = ResolvedCommand {
            fields: &fields,
            key_fields: &key_fields,
            batch_size: Some(3),
            ..ResolvedCommand::new("heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::InsertAll, &cmd)
            .unwrap();
        assert!(sql.contains("VALUES ($1, $2), ($3, $4), ($5, $6)"));
    }

    #[test]
    fn test_update_falls_back_to_key_match() {
        let fields = schema();
        let key_fields = keys(&fields);
        let cmd = ResolvedCommand {
            fields: &fields,
            key_fields: &key_fields,
            ..ResolvedCommand::new("heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::Update, &cmd)
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"heroes\" SET \"Name\" = $1, \"Age\" = $2 WHERE \"Id\" = $3"
        );
    }

    #[test]
    fn test_update_without_keys_or_filter_fails() {
        let fields = vec![DbField::new("Name", SqlType::Text)];
        let cmd = ResolvedCommand {
            fields: &fields,
            ..ResolvedCommand::new("notes")
        };
        let err = PostgresStatementBuilder::new()
            .build(CommandKind::Update, &cmd)
            .unwrap_err();
        assert!(matches!(err, Error::KeyFieldsNotFound { .. }));
    }

    #[test]
    fn test_merge_on_conflict() {
        let fields = schema();
        let key_fields = keys(&fields);
        let qualifiers = vec!["Id".to_string()];
        let cmd = ResolvedCommand {
            fields: &fields,
            key_fields: &key_fields,
            qualifiers: &qualifiers,
            ..ResolvedCommand::new("heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::Merge, &cmd)
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"heroes\" (\"Id\", \"Name\", \"Age\") VALUES ($1, $2, $3) \
             ON CONFLICT (\"Id\") DO UPDATE SET \"Name\" = EXCLUDED.\"Name\", \
             \"Age\" = EXCLUDED.\"Age\" RETURNING \"Id\""
        );
    }

    #[test]
    fn test_merge_without_qualifiers_or_keys_fails() {
        let fields = vec![DbField::new("Name", SqlType::Text)];
        let cmd = ResolvedCommand {
            fields: &fields,
            ..ResolvedCommand::new("notes")
        };
        let err = PostgresStatementBuilder::new()
            .build(CommandKind::Merge, &cmd)
            .unwrap_err();
        assert!(matches!(err, Error::KeyFieldsNotFound { .. }));
    }

    #[test]
    fn test_count_and_exists() {
        let fields = schema();
        let cmd = ResolvedCommand {
            fields: &fields,
            ..ResolvedCommand::new("heroes")
        };
        let builder = PostgresStatementBuilder::new();
        assert_eq!(
            builder.build(CommandKind::CountAll, &cmd).unwrap(),
            "SELECT COUNT(*) AS \"CountValue\" FROM \"heroes\""
        );
        assert_eq!(
            builder.build(CommandKind::Exists, &cmd).unwrap(),
            "SELECT 1 AS \"ExistsValue\" FROM \"heroes\" LIMIT 1"
        );
    }

    #[test]
    fn test_aggregates() {
        let age = vec![DbField::new("Age", SqlType::Integer)];
        let cmd = ResolvedCommand {
            fields: &age,
            ..ResolvedCommand::new("heroes")
        };
        let builder = PostgresStatementBuilder::new();
        assert_eq!(
            builder.build(CommandKind::AverageAll, &cmd).unwrap(),
            "SELECT AVG(\"Age\") AS \"AverageValue\" FROM \"heroes\""
        );
        assert_eq!(
            builder.build(CommandKind::SumAll, &cmd).unwrap(),
            "SELECT SUM(\"Age\") AS \"SumValue\" FROM \"heroes\""
        );
    }

    #[test]
    fn test_truncate() {
        let cmd = ResolvedCommand::new("heroes");
        assert_eq!(
            PostgresStatementBuilder::new()
                .build(CommandKind::Truncate, &cmd)
                .unwrap(),
            "TRUNCATE TABLE \"heroes\""
        );
    }

    #[test]
    fn test_hints_rejected() {
        let fields = schema();
        let cmd = ResolvedCommand {
            fields: &fields,
            hints: Some("WITH (NOLOCK)"),
            ..ResolvedCommand::new("heroes")
        };
        let err = PostgresStatementBuilder::new()
            .build(CommandKind::Query, &cmd)
            .unwrap_err();
        assert!(matches!(err, Error::HintsNotSupported { .. }));
    }

    #[test]
    fn test_schema_qualified_table() {
        let fields = schema();
        let cmd = ResolvedCommand {
            fields: &fields,
            ..ResolvedCommand::new("public.heroes")
        };
        let sql = PostgresStatementBuilder::new()
            .build(CommandKind::QueryAll, &cmd)
            .unwrap();
        assert!(sql.contains("FROM \"public\".\"heroes\""));
    }
}
