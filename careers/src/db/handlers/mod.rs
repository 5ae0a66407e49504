//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection` (a pooled connection or an open transaction),
//! implements [`Repository`] for CRUD, and returns models from [`crate::db::models`]. Operations
//! that touch more than one row open their own nested transaction, so they stay atomic whatever
//! connection they are handed.
//!
//! - [`Companies`]: tenants, slug lookup
//! - [`Recruiters`]: login principals, email lookup
//! - [`Sections`]: careers page sections, ordered reads and the bulk reorder
//! - [`Jobs`]: job listings with public board filters
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let company = Companies::new(&mut tx).create(&request).await?;
//! tx.commit().await?;
//! ```

pub mod companies;
pub mod jobs;
pub mod recruiters;
pub mod repository;
pub mod sections;

pub use companies::Companies;
pub use jobs::Jobs;
pub use recruiters::Recruiters;
pub use repository::Repository;
pub use sections::Sections;
