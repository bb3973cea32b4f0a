//! Partial-update SET clause generation.
//!
//! A [`PartialUpdate`] collects the fields a caller actually supplied and
//! renders them as `"column"=$N` assignments with positionally-matched bound
//! values, ready to splice into `UPDATE ... SET <clause> WHERE key = $N+1`.

use crate::error::{Error, Result};
use crate::sql::Sql;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// External field name → storage column name, one table per call site.
///
/// Field names absent from the table are used unchanged as the column name.
///
/// Tables must be `static`, developer-authored constants. Column names are
/// interpolated into the statement text (Postgres cannot parameterize
/// identifiers), so they must never be derived from request input; only the
/// *values* are bound parameters. Callers are expected to pass field keys
/// drawn from a known schema, validated upstream.
pub type ColumnOverrides = &'static [(&'static str, &'static str)];

/// Builder for the SET clause of a partial UPDATE.
///
/// Fields are rendered in the order they were set, with 1-based placeholder
/// positions assigned in that same order.
///
/// # Example
///
/// ```ignore
/// let set = PartialUpdate::new(&[("numEmployees", "num_employees")])
///     .set("name", "Acme".to_string())
///     .set("numEmployees", 42_i32)
///     .into_set_clause()?;
/// assert_eq!(set.to_sql(), r#""name"=$1, "num_employees"=$2"#);
/// ```
#[must_use]
pub struct PartialUpdate {
    overrides: ColumnOverrides,
    assignments: Vec<(&'static str, Arc<dyn ToSql + Sync + Send>)>,
}

impl PartialUpdate {
    /// Create a builder with the given column-name override table.
    pub fn new(overrides: ColumnOverrides) -> Self {
        Self {
            overrides,
            assignments: Vec::new(),
        }
    }

    fn resolve(&self, field: &'static str) -> &'static str {
        self.overrides
            .iter()
            .find(|(external, _)| *external == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }

    /// Record a field update. `field` is the external field name; the column
    /// it writes to is resolved through the override table.
    pub fn set<T>(mut self, field: &'static str, value: T) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        let column = self.resolve(field);
        self.assignments.push((column, Arc::new(value)));
        self
    }

    /// Record a field update only when a value was supplied.
    ///
    /// `None` means "field not present in the request" and contributes
    /// nothing, keeping the input sparse.
    pub fn set_opt<T>(self, field: &'static str, value: Option<T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        match value {
            Some(value) => self.set(field, value),
            None => self,
        }
    }

    /// Whether no fields have been set.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Render the `"column"=$N, ...` fragment with its bound values.
    ///
    /// Zero recorded fields is a caller error, not a no-op: it fails with
    /// [`Error::BadRequest`] regardless of the override table.
    pub fn into_set_clause(self) -> Result<Sql> {
        if self.assignments.is_empty() {
            return Err(Error::bad_request("No data to update"));
        }

        let mut clause = Sql::empty();
        for (i, (column, value)) in self.assignments.into_iter().enumerate() {
            if i > 0 {
                clause.push(", ");
            }
            clause.push("\"");
            clause.push(column);
            clause.push("\"=");
            clause.push_bind_value(value);
        }
        Ok(clause)
    }
}
