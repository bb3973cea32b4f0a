//! Dynamic WHERE clause generation for list filters.
//!
//! A [`WhereClause`] turns optional filter criteria into predicate fragments
//! joined with ` AND `. Criteria that were not supplied contribute nothing;
//! zero predicates yield the empty clause and the query runs unfiltered.
//!
//! Call sites apply criteria in a fixed, hard-coded order (never the order a
//! caller happened to construct its filter in), which keeps placeholder
//! numbering deterministic. Numbering is global across the whole clause and
//! composes with parameters already bound in the surrounding statement.
//!
//! Column names are interpolated into the fragment text and must be
//! developer-authored constants, never request input.

use crate::sql::Sql;
use tokio_postgres::types::ToSql;

/// Builder for an optional `WHERE` clause.
///
/// # Example
///
/// ```ignore
/// let clause = WhereClause::new()
///     .contains("name", Some("net"))
///     .at_least("num_employees", Some(10));
/// assert_eq!(
///     clause.clause(),
///     "LOWER(name) LIKE LOWER($1) AND num_employees >= $2"
/// );
/// ```
#[must_use]
pub struct WhereClause {
    sql: Sql,
    predicates: usize,
}

impl Default for WhereClause {
    fn default() -> Self {
        Self::new()
    }
}

impl WhereClause {
    /// Create an empty clause.
    pub fn new() -> Self {
        Self {
            sql: Sql::empty(),
            predicates: 0,
        }
    }

    fn next_predicate(&mut self) {
        if self.predicates > 0 {
            self.sql.push(" AND ");
        }
        self.predicates += 1;
    }

    /// Case-insensitive substring match: `LOWER(column) LIKE LOWER($N)` with
    /// the value wrapped in `%...%`. One parameter.
    pub fn contains(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(needle) = value {
            self.next_predicate();
            self.sql.push("LOWER(");
            self.sql.push(column);
            self.sql.push(") LIKE LOWER(");
            self.sql.push_bind(format!("%{needle}%"));
            self.sql.push(")");
        }
        self
    }

    /// Minimum bound: `column >= $N`. One parameter.
    pub fn at_least<T>(mut self, column: &str, value: Option<T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(value) = value {
            self.next_predicate();
            self.sql.push(column);
            self.sql.push(" >= ");
            self.sql.push_bind(value);
        }
        self
    }

    /// Maximum bound: `column <= $N`. One parameter.
    pub fn at_most<T>(mut self, column: &str, value: Option<T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(value) = value {
            self.next_predicate();
            self.sql.push(column);
            self.sql.push(" <= ");
            self.sql.push_bind(value);
        }
        self
    }

    /// Exact match: `column = $N`. One parameter.
    pub fn equals<T>(mut self, column: &str, value: Option<T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(value) = value {
            self.next_predicate();
            self.sql.push(column);
            self.sql.push(" = ");
            self.sql.push_bind(value);
        }
        self
    }

    /// Boolean presence flag: `column > 0` when true, `column = 0` when
    /// false, nothing when absent. Binds no parameter either way.
    pub fn nonzero(mut self, column: &str, value: Option<bool>) -> Self {
        if let Some(flag) = value {
            self.next_predicate();
            self.sql.push(column);
            self.sql.push(if flag { " > 0" } else { " = 0" });
        }
        self
    }

    /// Whether no predicates were produced.
    pub fn is_empty(&self) -> bool {
        self.predicates == 0
    }

    /// Render the predicate fragment (without the `WHERE` keyword).
    ///
    /// Empty when no criteria were supplied.
    pub fn clause(&self) -> String {
        self.sql.to_sql()
    }

    /// Parameter refs for the rendered fragment.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.sql.params_ref()
    }

    /// Splice this clause into `query`, prefixing ` WHERE ` when non-empty.
    ///
    /// Placeholders are renumbered to continue after parameters already
    /// bound in `query`.
    pub fn apply_to(self, query: &mut Sql) {
        if self.predicates > 0 {
            query.push(" WHERE ");
            query.push_sql(self.sql);
        }
    }

    /// Consume the clause as a bare [`Sql`] fragment (no `WHERE` keyword).
    pub fn into_sql(self) -> Sql {
        self.sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::sql;

    #[test]
    fn no_criteria_yields_empty_clause() {
        let clause = WhereClause::new()
            .contains("name", None)
            .at_least("num_employees", None::<i32>)
            .at_most("num_employees", None::<i32>);

        assert!(clause.is_empty());
        assert_eq!(clause.clause(), "");
        assert!(clause.params_ref().is_empty());
    }

    #[test]
    fn empty_clause_adds_no_where_keyword() {
        let mut q = sql("SELECT handle FROM companies");
        WhereClause::new().apply_to(&mut q);
        q.push(" ORDER BY name");

        assert_eq!(q.to_sql(), "SELECT handle FROM companies ORDER BY name");
    }

    #[test]
    fn predicates_join_with_and_in_build_order() {
        let clause = WhereClause::new()
            .contains("name", Some("abc"))
            .at_least("num_employees", Some(5_i32));

        assert_eq!(
            clause.clause(),
            "LOWER(name) LIKE LOWER($1) AND num_employees >= $2"
        );
        // $1 is the wrapped pattern, $2 the raw bound.
        assert_eq!(format!("{:?}", clause.params_ref()), r#"["%abc%", 5]"#);
    }

    #[test]
    fn substring_wraps_value_in_percent() {
        let clause = WhereClause::new().contains("title", Some("engineer"));
        assert_eq!(clause.clause(), "LOWER(title) LIKE LOWER($1)");
        // One parameter for the wrapped pattern.
        assert_eq!(clause.params_ref().len(), 1);
    }

    #[test]
    fn nonzero_flag_binds_no_parameter() {
        let clause = WhereClause::new().nonzero("equity", Some(true));
        assert_eq!(clause.clause(), "equity > 0");
        assert!(clause.params_ref().is_empty());

        let clause = WhereClause::new().nonzero("equity", Some(false));
        assert_eq!(clause.clause(), "equity = 0");
        assert!(clause.params_ref().is_empty());

        let clause = WhereClause::new().nonzero("equity", None);
        assert!(clause.is_empty());
    }

    #[test]
    fn numbering_skips_flag_predicates() {
        let clause = WhereClause::new()
            .contains("title", Some("dev"))
            .at_least("salary", Some(50_000_i32))
            .nonzero("equity", Some(true))
            .equals("company_handle", Some("acme".to_string()));

        assert_eq!(
            clause.clause(),
            "LOWER(title) LIKE LOWER($1) AND salary >= $2 AND equity > 0 AND company_handle = $3"
        );
        assert_eq!(clause.params_ref().len(), 3);
    }

    #[test]
    fn numbering_continues_after_existing_binds() {
        let mut q = sql("SELECT id FROM jobs WHERE posted_by = ");
        q.push_bind("admin".to_string());
        q.push(" AND ");
        q.push_sql(WhereClause::new().at_least("salary", Some(1_i32)).into_sql());

        assert_eq!(
            q.to_sql(),
            "SELECT id FROM jobs WHERE posted_by = $1 AND salary >= $2"
        );
        assert_eq!(q.params_ref().len(), 2);
    }

    #[test]
    fn identical_input_builds_identical_output() {
        let build = || {
            WhereClause::new()
                .contains("name", Some("x"))
                .at_most("num_employees", Some(9_i32))
                .clause()
        };
        assert_eq!(build(), build());
    }
}
