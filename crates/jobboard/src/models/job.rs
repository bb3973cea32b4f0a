//! Jobs: rows, inputs, filters, and CRUD operations.

use crate::client::GenericClient;
use crate::error::{Error, Result};
use crate::filter::WhereClause;
use crate::row::{FromRow, RowExt};
use crate::sql::{query, sql};
use crate::update::{ColumnOverrides, PartialUpdate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const JOB_COLUMNS: ColumnOverrides = &[("companyHandle", "company_handle")];

/// A job row. `equity` is a numeric fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Sparse input for [`Job::update`]; the owning company cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl JobPatch {
    pub(crate) fn into_update(self) -> PartialUpdate {
        PartialUpdate::new(JOB_COLUMNS)
            .set_opt("title", self.title)
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity)
    }
}

/// Optional criteria for [`Job::list`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    /// Case-insensitive substring match on the job title.
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    /// `true`: only jobs granting equity; `false`: only jobs granting none.
    pub has_equity: Option<bool>,
    /// Exact match on the owning company's handle.
    pub company_handle: Option<String>,
}

impl JobFilter {
    /// Build the WHERE clause, applying criteria in a fixed order
    /// (title, minSalary, hasEquity, companyHandle) regardless of how the
    /// filter was constructed.
    pub fn to_where_clause(&self) -> WhereClause {
        WhereClause::new()
            .contains("title", self.title.as_deref())
            .at_least("salary", self.min_salary)
            .nonzero("equity", self.has_equity)
            .equals("company_handle", self.company_handle.clone())
    }
}

impl Job {
    /// Insert a job and return the created row.
    ///
    /// A (title, companyHandle) collision surfaces as [`Error::Conflict`];
    /// an unknown company as [`Error::ForeignKey`]. Both come from the
    /// table's constraints, with no pre-insert check to race against.
    pub async fn create(conn: &impl GenericClient, data: NewJob) -> Result<Job> {
        query(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, salary, equity, company_handle",
        )
        .bind(data.title)
        .bind(data.salary)
        .bind(data.equity)
        .bind(data.company_handle)
        .fetch_one_as(conn)
        .await
    }

    /// Fetch a job by id.
    pub async fn get(conn: &impl GenericClient, id: i32) -> Result<Job> {
        query("SELECT id, title, salary, equity, company_handle FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| Error::not_found(format!("No job: {id}")))
    }

    /// List jobs matching `filter`, ordered by title.
    ///
    /// Zero matches is a valid empty result, not an error.
    pub async fn list(conn: &impl GenericClient, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut q = sql("SELECT id, title, salary, equity, company_handle FROM jobs");
        filter.to_where_clause().apply_to(&mut q);
        q.push(" ORDER BY title");
        q.fetch_all_as(conn).await
    }

    /// Apply a partial update and return the updated row.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: JobPatch) -> Result<Job> {
        let mut q = sql("UPDATE jobs SET ");
        q.push_sql(patch.into_update().into_set_clause()?);
        q.push(" WHERE id = ");
        q.push_bind(id);
        q.push(" RETURNING id, title, salary, equity, company_handle");

        q.fetch_opt_as(conn)
            .await?
            .ok_or_else(|| Error::not_found(format!("No job: {id}")))
    }

    /// Delete a job by id.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> Result<()> {
        let deleted = query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        if deleted == 0 {
            return Err(Error::not_found(format!("No job: {id}")));
        }
        Ok(())
    }
}
