//! # API Shared
//!
//! Shared utilities and definitions for CDX APIs.
//!
//! Contains:
//! - Protobuf-generated types (`pb` module), with both server traits and client stubs
//! - Shared services like `HealthService`
//! - Authentication utilities (usable by both gRPC and REST)
//!
//! Used by `api-grpc`, `api-rest`, `cdx-client` and `cdx-core`.

// Re-export the generated protobuf module. The generated code will be placed
// into OUT_DIR at build time by the build script.
pub mod pb {
    tonic::include_proto!("cdx.v1");
}

pub mod auth;
pub mod health;

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("proto_descriptor");

/// Metadata key carrying the API key on gRPC calls and REST requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Metadata key carrying the acting user's identifier.
pub const USER_HEADER: &str = "x-cdx-user";

pub use health::HealthService;
pub use pb::*;
