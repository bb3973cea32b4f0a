//! # jobboard
//!
//! Postgres data layer for a job and company listing service.
//!
//! ## Features
//!
//! - **SQL explicit**: hand-written statements through `query()`, dynamic
//!   composition through `sql()` with automatic `$1, $2, ...` numbering
//! - **Partial updates**: sparse patch inputs become `"column"=$N` SET
//!   clauses with positionally-matched bound values
//! - **Dynamic filters**: optional list criteria become WHERE clauses in a
//!   fixed predicate order; absent criteria contribute nothing
//! - **Typed errors**: constraint violations map to `Conflict` /
//!   `ForeignKey` / `Check`, zero-field patches to `BadRequest`
//! - **Transaction-friendly**: every operation takes a [`GenericClient`],
//!   so the same code runs on a connection, a pooled client, or inside a
//!   transaction
//!
//! ## Example
//!
//! ```ignore
//! use jobboard::{Company, CompanyFilter, CompanyPatch, Config, PoolClient};
//!
//! let pool = Config::from_env()?.create_pool()?;
//! let conn = PoolClient::new(pool.get().await?);
//!
//! let big = Company::list(
//!     &conn,
//!     &CompanyFilter { min_employees: Some(100), ..Default::default() },
//! )
//! .await?;
//!
//! let patch = CompanyPatch { num_employees: Some(101), ..Default::default() };
//! let updated = Company::update(&conn, "acme", patch).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod row;
pub mod sql;
pub mod update;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "migrate")]
pub mod migrate;

pub use client::GenericClient;
pub use config::Config;
pub use error::{Error, Result};
pub use filter::WhereClause;
pub use models::{Company, CompanyDetail, CompanyFilter, CompanyPatch, NewCompany};
pub use models::{Job, JobFilter, JobPatch, NewJob};
pub use row::{FromRow, RowExt};
pub use sql::{Query, Sql, query, sql};
pub use update::{ColumnOverrides, PartialUpdate};

#[cfg(feature = "pool")]
pub use client::PoolClient;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
