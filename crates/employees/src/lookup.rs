//! Read capability the validator needs from the employee store.

use async_trait::async_trait;
use thiserror::Error;

use personnel_core::EmployeeId;

use crate::employee::Employee;

/// The store could not answer a lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("employee lookup failed: {0}")]
pub struct LookupError(pub String);

/// Read-only view over the employee collection.
///
/// Validation rules that depend on other records (CEO uniqueness, boss
/// existence) go through this trait instead of a concrete store handle.
#[async_trait]
pub trait EmployeeLookup: Send + Sync {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, LookupError>;

    /// First employee whose role equals `role` case-insensitively.
    async fn find_by_role(&self, role: &str) -> Result<Option<Employee>, LookupError>;
}
