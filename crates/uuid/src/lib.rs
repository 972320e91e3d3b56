//! Record identifiers and sharded-path utilities.
//!
//! Every CDX document is keyed by a *canonical* identifier: **32 lowercase hexadecimal
//! characters** (no hyphens). This is the same value you would get from
//! `Uuid::new_v4().simple().to_string()`.
//!
//! This crate provides:
//! - A wrapper type ([`RecordId`]) that guarantees the canonical format once constructed.
//! - Shared sharding logic used by the file-backed document store.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, documents live under:
//! `collection_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `cdx_data/allergies/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! This keeps any single directory from accumulating millions of entries.

mod record_id;

pub use record_id::{RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
