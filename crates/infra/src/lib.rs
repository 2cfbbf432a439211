//! Infrastructure layer: employee stores and their configuration.

pub mod config;
pub mod repository;

pub use config::{ConfigError, StoreBackend, StoreSettings};
pub use repository::{
    EmployeeRepository, InMemoryEmployeeStore, PostgresEmployeeStore, RepositoryError,
    RepositoryResult, open_store,
};
