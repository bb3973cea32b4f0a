//! SQL migrations via [`refinery`].
//!
//! Migration definitions live in this crate's `migrations/` directory and are
//! embedded at compile time.
//!
//! # Example
//!
//! ```ignore
//! use jobboard::{create_pool, migrate};
//!
//! # async fn main_impl() -> jobboard::Result<()> {
//! let pool = create_pool(&std::env::var("DATABASE_URL").unwrap())?;
//! migrate::run_pool(&pool).await?;
//! # Ok(()) }
//! ```

use crate::error::Result;

pub use refinery::{Report, Runner};

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Runner over the embedded migrations.
pub fn runner() -> Runner {
    embedded::migrations::runner()
}

/// Run migrations on a single PostgreSQL connection.
pub async fn run(client: &mut tokio_postgres::Client) -> Result<Report> {
    Ok(runner().run_async(client).await?)
}

/// Acquire a connection from a pool and run migrations on it.
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> Result<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
