//! Socratic API Module
//!
//! The API module exposes the review relay over HTTP: one analysis
//! endpoint, a test-type listing for form-building clients, and a health
//! check.

pub mod error;
pub mod handlers;
pub mod models;
pub mod server;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use server::*;
