use super::trace_query;
use crate::client::GenericClient;
use crate::error::Result;
use crate::row::FromRow;
use std::time::Instant;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A lightweight builder for executing hand-written SQL with type-safe
/// parameter binding.
///
/// # Example
///
/// ```ignore
/// use jobboard::query;
///
/// let company: Company = query("SELECT * FROM companies WHERE handle = $1")
///     .bind(handle.to_string())
///     .fetch_one_as(&conn)
///     .await?;
/// ```
pub struct Query {
    sql: String,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
}

impl Query {
    /// Create a new query from a pre-numbered SQL string.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind a parameter to the query
    pub fn bind<T: ToSql + Sync + Send + 'static>(mut self, value: T) -> Self {
        self.params.push(Box::new(value));
        self
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref() as _).collect()
    }

    /// Execute the query and return all rows
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> Result<Vec<Row>> {
        let started = Instant::now();
        let rows = conn.query(&self.sql, &self.params_ref()).await?;
        trace_query(&self.sql, rows.len() as u64, started);
        Ok(rows)
    }

    /// Execute the query and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> Result<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return the first row, erroring when there is none
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> Result<Row> {
        let started = Instant::now();
        let row = conn.query_one(&self.sql, &self.params_ref()).await?;
        trace_query(&self.sql, 1, started);
        Ok(row)
    }

    /// Execute the query and return the first row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> Result<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> Result<Option<Row>> {
        let started = Instant::now();
        let row = conn.query_opt(&self.sql, &self.params_ref()).await?;
        trace_query(&self.sql, row.is_some() as u64, started);
        Ok(row)
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(&self, conn: &impl GenericClient) -> Result<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the query and return the number of affected rows
    pub async fn execute(&self, conn: &impl GenericClient) -> Result<u64> {
        let started = Instant::now();
        let affected = conn.execute(&self.sql, &self.params_ref()).await?;
        trace_query(&self.sql, affected, started);
        Ok(affected)
    }
}
