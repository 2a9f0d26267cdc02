//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Entities, read models and ports; no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
