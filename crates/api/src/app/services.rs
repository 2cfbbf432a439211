use std::sync::Arc;

use chrono::{Local, NaiveDate};

use personnel_core::EmployeeId;
use personnel_employees::{EmployeeDetails, EmployeeForm, EmployeeValidator, ValidationError};
use personnel_infra::{EmployeeRepository, InMemoryEmployeeStore, RepositoryResult, StoreSettings, open_store};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppServices {
    pub employees: Arc<dyn EmployeeRepository>,
}

impl AppServices {
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    /// Services over a fresh in-memory store (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryEmployeeStore::new()))
    }

    pub async fn open(settings: &StoreSettings) -> RepositoryResult<Self> {
        Ok(Self::new(open_store(settings).await?))
    }

    /// The server's local calendar date; age and employment rules use it.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Run the employee rules against `form`, with store lookups going to
    /// the configured repository. `current` names the record a full update
    /// replaces; creation passes `None`.
    pub async fn validate(
        &self,
        form: &EmployeeForm,
        current: Option<&EmployeeId>,
    ) -> Result<EmployeeDetails, ValidationError> {
        EmployeeValidator::new(self.employees.as_ref())
            .validate(form, current, self.today())
            .await
    }
}
