//! Identifiers and error types shared by the personnel crates.
//!
//! No I/O lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::EmployeeId;
