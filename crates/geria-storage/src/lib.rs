//! geria-storage
//!
//! Object storage. Thin wrapper around the AWS S3 SDK, an [`store::ObjectStore`]
//! seam with S3 and in-memory backends, and typed JSON documents with ETag
//! optimistic locking.

pub mod client;
pub mod error;
pub mod objects;
pub mod state;
pub mod store;
