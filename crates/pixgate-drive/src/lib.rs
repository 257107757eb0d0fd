//! Pixgate Drive Library
//!
//! Google Drive client for the upload gateway: service-account authentication,
//! per-order folder provisioning, permission grants, and media uploads. The
//! `RemoteStore` trait is the seam consumers depend on, so the orchestrator
//! and tests are not coupled to the real service.

pub mod auth;
pub mod client;
pub mod error;
pub mod traits;

// Re-export commonly used types
pub use auth::TokenProvider;
pub use client::DriveClient;
pub use error::{DriveError, DriveResult};
pub use traits::RemoteStore;
