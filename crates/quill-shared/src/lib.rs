//! # Quill Shared
//!
//! Wire types for the Quill REST API, usable by the server and by any Rust client.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
