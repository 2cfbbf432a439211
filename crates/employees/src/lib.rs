//! Employee records: the entity, its validation rules, and the read
//! capability those rules need from the store.

pub mod dates;
pub mod employee;
pub mod lookup;
pub mod validation;

pub use employee::{
    CEO_ROLE, Employee, EmployeeDetails, EmployeeForm, RoleSalaryStats, is_ceo_role,
};
pub use lookup::{EmployeeLookup, LookupError};
pub use validation::{EmployeeValidator, ValidationError};
