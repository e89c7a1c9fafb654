//! SQLite statement builder.

use sqlforge_core::{DbField, Dialect, Error, Result, quote_ident, quote_table};

use crate::ansi;
use crate::builder::{CommandKind, ResolvedCommand, StatementBuilder};

/// Renders command text in the SQLite dialect.
///
/// Generated values come back via `last_insert_rowid()` appended as a second
/// statement; merges are emitted as `INSERT OR REPLACE`; truncation is a
/// delete-plus-vacuum since SQLite has no TRUNCATE.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteStatementBuilder;

impl SqliteStatementBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Append the identity read-back when the return key is server-assigned.
    fn append_identity_select(&self, sql: &mut String, key_fields: &[DbField]) {
        if let Some(key) = key_fields.first() {
            if key.is_identity {
                sql.push_str(&format!(
                    " ; SELECT last_insert_rowid() AS {}",
                    quote_ident(&key.name, self.dialect())
                ));
            }
        }
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
        self.append_identity_select(&mut sql, cmd.key_fields);
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

        // OR REPLACE matches on the stored key, so the conflict columns ride
        // along in the insert list even when server-generated.
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
        let mut sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES {}",
            table,
            names.join(", "),
            ansi::values_rows(cols.len(), rows, self.dialect()),
        );
        self.append_identity_select(&mut sql, cmd.key_fields);
        Ok(sql)
    }

    fn truncate(&self, cmd: &ResolvedCommand<'_>) -> Result<String> {
        let table = quote_table(cmd.table, self.dialect())?;
        Ok(format!("DELETE FROM {} ; VACUUM", table))
    }
}

impl StatementBuilder for SqliteStatementBuilder {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn build(&self, kind: CommandKind, cmd: &ResolvedCommand<'_>) -> Result<String> {
        ansi::reject_hints(cmd, self.dialect())?;
        let batch = cmd.batch_size.unwrap_or(1).max(1);
        match kind {
            CommandKind::Query | CommandKind::QueryAll | CommandKind::QueryMultiple => {
                ansi::build_query(cmd, self.dialect())
            }
            CommandKind::BatchQuery => ansi::build_batch_query(cmd, self.dialect()),
            CommandKind::SkipQuery => ansi::build_skip_query(cmd, self.dialect(), Some("-1")),
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
