//! Dynamic SQL composition.
//!
//! Two entry points:
//! - `query()` for a full SQL string that already carries `$1, $2...`.
//! - `sql()` for composing SQL piece by piece without manually tracking
//!   placeholder indices.
//!
//! # Example
//!
//! ```ignore
//! use jobboard::sql;
//!
//! let mut q = sql("SELECT handle, name FROM companies");
//! if let Some(min) = min_employees {
//!     q.push(" WHERE num_employees >= ").push_bind(min);
//! }
//! q.push(" ORDER BY name");
//!
//! let companies: Vec<Company> = q.fetch_all_as(&conn).await?;
//! ```

mod builder;
mod parts;
mod query;


pub use builder::Sql;
pub use query::Query;

/// Build a query from a pre-numbered SQL string (`$1, $2, ...`).
pub fn query(initial_sql: impl Into<String>) -> Query {
    Query::new(initial_sql)
}

/// Start composing a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// Emit a debug event for an executed statement.
pub(crate) fn trace_query(sql: &str, rows: u64, started: std::time::Instant) {
    tracing::debug!(
        target: "jobboard::sql",
        sql,
        rows,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "executed"
    );
}
