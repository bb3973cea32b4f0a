//! Companies: rows, inputs, filters, and CRUD operations.

use crate::client::GenericClient;
use crate::error::{Error, Result};
use crate::filter::WhereClause;
use crate::row::{FromRow, RowExt};
use crate::sql::{query, sql};
use crate::update::{ColumnOverrides, PartialUpdate};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use super::job::Job;

/// External (camelCase) field names that differ from their storage columns.
///
/// Static and developer-authored: column names are interpolated into
/// statement text, so this table is the only place they may come from.
const COMPANY_COLUMNS: ColumnOverrides = &[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
];

/// A company row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Sparse input for [`Company::update`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl CompanyPatch {
    pub(crate) fn into_update(self) -> PartialUpdate {
        PartialUpdate::new(COMPANY_COLUMNS)
            .set_opt("name", self.name)
            .set_opt("description", self.description)
            .set_opt("numEmployees", self.num_employees)
            .set_opt("logoUrl", self.logo_url)
    }
}

/// Optional criteria for [`Company::list`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    /// Case-insensitive substring match on the company name.
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    /// Build the WHERE clause, applying criteria in a fixed order
    /// (name, minEmployees, maxEmployees) regardless of how the filter
    /// was constructed.
    pub fn to_where_clause(&self) -> WhereClause {
        WhereClause::new()
            .contains("name", self.name.as_deref())
            .at_least("num_employees", self.min_employees)
            .at_most("num_employees", self.max_employees)
    }
}

/// A company together with its jobs, as returned by the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

impl Company {
    /// Insert a company and return the created row.
    ///
    /// A handle or name collision surfaces as [`Error::Conflict`] via the
    /// table's uniqueness constraints; there is no separate duplicate-check
    /// round trip, so concurrent creates cannot race past the check.
    pub async fn create(conn: &impl GenericClient, data: NewCompany) -> Result<Company> {
        query(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING handle, name, description, num_employees, logo_url",
        )
        .bind(data.handle)
        .bind(data.name)
        .bind(data.description)
        .bind(data.num_employees)
        .bind(data.logo_url)
        .fetch_one_as(conn)
        .await
    }

    /// Fetch a company by handle.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> Result<Company> {
        query(
            "SELECT handle, name, description, num_employees, logo_url \
             FROM companies WHERE handle = $1",
        )
        .bind(handle.to_string())
        .fetch_opt_as(conn)
        .await?
        .ok_or_else(|| Error::not_found(format!("No company: {handle}")))
    }

    /// Fetch a company by handle together with its jobs, ordered by title.
    pub async fn get_with_jobs(conn: &impl GenericClient, handle: &str) -> Result<CompanyDetail> {
        let company = Self::get(conn, handle).await?;
        let jobs = query(
            "SELECT id, title, salary, equity, company_handle \
             FROM jobs WHERE company_handle = $1 ORDER BY title",
        )
        .bind(handle.to_string())
        .fetch_all_as(conn)
        .await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// List companies matching `filter`, ordered by name.
    ///
    /// Zero matches is a valid empty result, not an error.
    pub async fn list(conn: &impl GenericClient, filter: &CompanyFilter) -> Result<Vec<Company>> {
        let mut q = sql("SELECT handle, name, description, num_employees, logo_url FROM companies");
        filter.to_where_clause().apply_to(&mut q);
        q.push(" ORDER BY name");
        q.fetch_all_as(conn).await
    }

    /// Apply a partial update and return the updated row.
    ///
    /// Fails with [`Error::BadRequest`] when `patch` carries no fields and
    /// [`Error::NotFound`] when the handle does not resolve.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: CompanyPatch,
    ) -> Result<Company> {
        let mut q = sql("UPDATE companies SET ");
        q.push_sql(patch.into_update().into_set_clause()?);
        q.push(" WHERE handle = ");
        q.push_bind(handle.to_string());
        q.push(" RETURNING handle, name, description, num_employees, logo_url");

        q.fetch_opt_as(conn)
            .await?
            .ok_or_else(|| Error::not_found(format!("No company: {handle}")))
    }

    /// Delete a company by handle.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> Result<()> {
        let deleted = query("DELETE FROM companies WHERE handle = $1")
            .bind(handle.to_string())
            .execute(conn)
            .await?;

        if deleted == 0 {
            return Err(Error::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}
