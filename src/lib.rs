//! # VAS Storage - Versioned Artifact Storage Core
//!
//! A content-addressable storage and versioning engine for named file
//! collections (volumes and artifacts), built on Clean Architecture
//! principles.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business logic (entities, value objects, hashing, manifests)
//! - **Application**: Use cases and ports (interfaces)
//! - **Archive**: Tar/gzip packaging and directory snapshots
//! - **Infrastructure**: Adapters for object storage and persistence
//!
//! ## Key Features
//!
//! - Deterministic content-hash version ids with upload deduplication
//! - Two-phase presigned upload protocol with idempotent commits
//! - Version resolution by exact id, unique prefix, or HEAD
//! - Selective single-file extraction from version archives
//!
//! ## Example Usage
//!
//! ```no_run
//! use vas_storage::{Config, use_cases::PrepareUploadUseCase};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Setup repository and object store (see integration tests for full example)
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod archive;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use application::errors as application_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
