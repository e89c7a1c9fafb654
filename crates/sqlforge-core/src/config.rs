//! Reconciliation configuration.

use serde::{Deserialize, Serialize};

/// Which key field is reported back to the caller after an insert or merge.
///
/// When reconciliation yields more than one key field, the underlying
/// statement can report only one generated value; this option selects which
/// field is moved to the front of the resolved key list to play that role.
/// The remaining key fields stay in the list for WHERE-clause matching.
///
/// Passed explicitly into the reconciler at call time; callers wanting a
/// process-wide default simply pass the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyColumnReturnBehavior {
    /// Prefer the identity field; the database assigns it, so it is the value
    /// a caller most often needs back.
    #[default]
    PreferIdentity,
    /// Prefer the primary-key field.
    PreferPrimary,
    /// Keep schema declaration order; the first qualifying field wins.
    FirstDeclared,
}
