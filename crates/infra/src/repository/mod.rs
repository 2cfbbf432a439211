//! Employee collection storage abstractions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use personnel_core::EmployeeId;
use personnel_employees::{
    Employee, EmployeeDetails, EmployeeLookup, LookupError, RoleSalaryStats,
};

use crate::config::{StoreBackend, StoreSettings};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryEmployeeStore;
pub use postgres::PostgresEmployeeStore;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store operation error.
///
/// These are infrastructure failures; rule violations are reported by the
/// validator before the store is touched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("employee not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be mapped back to an employee.
    #[error("corrupt employee record: {0}")]
    Corrupt(String),
}

impl From<RepositoryError> for LookupError {
    fn from(err: RepositoryError) -> Self {
        LookupError(err.to_string())
    }
}

/// Queries and mutations over the single employee collection, keyed by id.
///
/// Lists come back in store order (insertion order). Name and role matching
/// is case-insensitive.
#[async_trait]
pub trait EmployeeRepository: EmployeeLookup {
    async fn get_by_id(&self, id: &EmployeeId) -> RepositoryResult<Option<Employee>>;

    /// Employees whose first name contains `name_part` and whose birthdate
    /// falls in `[start, end]`.
    async fn get_by_name_and_birthdate(
        &self,
        name_part: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Employee>>;

    async fn get_all(&self) -> RepositoryResult<Vec<Employee>>;

    async fn get_all_by_boss_id(&self, boss_id: &EmployeeId) -> RepositoryResult<Vec<Employee>>;

    /// First employee holding `role`.
    async fn get_by_role(&self, role: &str) -> RepositoryResult<Option<Employee>>;

    async fn get_count_and_avg_salary(&self, role: &str) -> RepositoryResult<RoleSalaryStats>;

    /// Insert a new employee; the store assigns the id.
    async fn add(&self, details: EmployeeDetails) -> RepositoryResult<Employee>;

    /// Replace the stored record with the same id. `None` if there is none.
    async fn update(&self, employee: Employee) -> RepositoryResult<Option<Employee>>;

    /// Change only the salary of an existing employee.
    async fn update_salary(&self, id: &EmployeeId, salary: Decimal) -> RepositoryResult<Employee>;

    /// Remove an employee. Unknown ids are ignored.
    async fn delete(&self, id: &EmployeeId) -> RepositoryResult<()>;
}

/// Open the store described by `settings`.
///
/// For Postgres this connects the pool and creates the employee table when
/// it does not exist yet.
pub async fn open_store(settings: &StoreSettings) -> RepositoryResult<Arc<dyn EmployeeRepository>> {
    match &settings.backend {
        StoreBackend::InMemory => {
            tracing::info!("using in-memory employee store");
            Ok(Arc::new(InMemoryEmployeeStore::new()))
        }
        StoreBackend::Postgres { url } => {
            let store = PostgresEmployeeStore::connect(url, settings.table()).await?;
            store.ensure_table().await?;
            tracing::info!(table = settings.table(), "using postgres employee store");
            Ok(Arc::new(store))
        }
    }
}
