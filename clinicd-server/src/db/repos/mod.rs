//! Repository implementations for database access
//!
//! Patterns shared by every repo:
//! - borrow the pool, construct per request
//! - list operations JOIN their children (no N+1)
//! - deletes check rows_affected and surface NotFound

pub mod prescriptions;
pub mod reviews;
pub mod users;

pub use prescriptions::PrescriptionRepo;
pub use reviews::ReviewRepo;
pub use users::UserRepo;

/// Database error type shared by all repositories.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
