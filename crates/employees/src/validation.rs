//! Field rules applied to a candidate employee before it is stored.
//!
//! Every rule runs; messages are collected in field order so a client sees
//! all problems with a payload at once. Two rules consult the store through
//! [`EmployeeLookup`]: CEO uniqueness and boss existence.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

use personnel_core::EmployeeId;

use crate::employee::{CEO_ROLE, EmployeeDetails, EmployeeForm, is_ceo_role};
use crate::lookup::{EmployeeLookup, LookupError};

pub const MAX_NAME_LEN: usize = 50;
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 70;
pub const EARLIEST_EMPLOYMENT_YEAR: i32 = 2000;

pub const FIRST_NAME_REQUIRED: &str = "First Name is required";
pub const FIRST_NAME_SAME_AS_LAST: &str = "First Name must be different from the Last Name";
pub const FIRST_NAME_TOO_LONG: &str = "First Name cannot be longer than 50 characters";
pub const LAST_NAME_REQUIRED: &str = "Last Name is required";
pub const LAST_NAME_SAME_AS_FIRST: &str = "Last Name must be different from the First Name";
pub const LAST_NAME_TOO_LONG: &str = "Last Name cannot be longer than 50 characters";
pub const BIRTHDATE_REQUIRED: &str = "Birthdate is required";
pub const AGE_INVALID: &str = "Age is not valid";
pub const EMPLOYMENT_DATE_REQUIRED: &str = "Employment Date is required";
pub const EMPLOYMENT_DATE_INVALID: &str =
    "Employment Date is invalid, Must be greater than 01-01-2000 and cannot be a future date";
pub const HOME_ADDRESS_REQUIRED: &str = "Home Address is required";
pub const SALARY_REQUIRED: &str = "Current Salary is required";
pub const SALARY_NEGATIVE: &str = "Current Salary must be non-negative";
pub const ROLE_REQUIRED: &str = "Role is required";
pub const CEO_ALREADY_EXISTS: &str = "There can be only 1 employee with CEO role";
pub const CEO_HAS_BOSS: &str = "The CEO role cannot have a boss";
pub const ROLE_NEEDS_BOSS: &str = "Role is not valid, Only the CEO role has no boss";
pub const BOSS_NOT_FOUND: &str = "There is no boss with this Id";

/// Why a candidate employee was not accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more rules failed; messages are in field order.
    #[error("employee rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),

    /// A store lookup needed by a rule failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ValidationError {
    /// Rule messages, empty for lookup failures.
    pub fn messages(&self) -> &[String] {
        match self {
            ValidationError::Rejected(messages) => messages,
            ValidationError::Lookup(_) => &[],
        }
    }
}

/// Approximate age check on year and day-of-year.
///
/// `age = today.year - birth.year`; valid when strictly between 18 and 70,
/// or exactly 18 once today's day-of-year is past the birth day-of-year, or
/// exactly 70 while today's day-of-year is still before it. Day-of-year is
/// compared as-is, so leap years shift the boundary by a day.
pub fn is_valid_age(birthdate: NaiveDate, today: NaiveDate) -> bool {
    let age = today.year() - birthdate.year();
    let (today_doy, birth_doy) = (today.ordinal(), birthdate.ordinal());

    (age > MIN_AGE && age < MAX_AGE)
        || (age == MIN_AGE && today_doy > birth_doy)
        || (age == MAX_AGE && today_doy < birth_doy)
}

/// Employment must start in 2000 or later and not after `today`.
pub fn is_valid_employment_date(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() >= EARLIEST_EMPLOYMENT_YEAR && date <= today
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_name(value: &str, other: &str, messages: [&str; 3], errors: &mut Vec<String>) {
    let [required, same, too_long] = messages;
    if is_blank(value) {
        errors.push(required.to_string());
    }
    if value == other {
        errors.push(same.to_string());
    }
    // Length is measured in UTF-16 code units, as existing clients count it.
    if value.encode_utf16().count() > MAX_NAME_LEN {
        errors.push(too_long.to_string());
    }
}

/// Validates candidate employees against the field rules and the store.
pub struct EmployeeValidator<'a, L: ?Sized> {
    lookup: &'a L,
}

impl<'a, L> EmployeeValidator<'a, L>
where
    L: EmployeeLookup + ?Sized,
{
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Run every rule against `form`, judging dates relative to `today`.
    ///
    /// `current` is the id of the stored record being replaced, if any; the
    /// CEO-uniqueness rule does not count that record. Creation passes
    /// `None`, so an `id` inside the form never exempts anyone.
    ///
    /// Returns the validated fields, or all failing rule messages.
    pub async fn validate(
        &self,
        form: &EmployeeForm,
        current: Option<&EmployeeId>,
        today: NaiveDate,
    ) -> Result<EmployeeDetails, ValidationError> {
        let mut errors = Vec::new();

        check_name(
            &form.first_name,
            &form.last_name,
            [FIRST_NAME_REQUIRED, FIRST_NAME_SAME_AS_LAST, FIRST_NAME_TOO_LONG],
            &mut errors,
        );
        check_name(
            &form.last_name,
            &form.first_name,
            [LAST_NAME_REQUIRED, LAST_NAME_SAME_AS_FIRST, LAST_NAME_TOO_LONG],
            &mut errors,
        );

        // A missing date fails both its presence and its range rule.
        match form.birthdate {
            None => errors.extend([BIRTHDATE_REQUIRED, AGE_INVALID].map(String::from)),
            Some(birthdate) if !is_valid_age(birthdate, today) => {
                errors.push(AGE_INVALID.to_string())
            }
            Some(_) => {}
        }

        match form.employment_date {
            None => errors.extend(
                [EMPLOYMENT_DATE_REQUIRED, EMPLOYMENT_DATE_INVALID].map(String::from),
            ),
            Some(date) if !is_valid_employment_date(date, today) => {
                errors.push(EMPLOYMENT_DATE_INVALID.to_string())
            }
            Some(_) => {}
        }

        if is_blank(&form.home_address) {
            errors.push(HOME_ADDRESS_REQUIRED.to_string());
        }

        // Zero is the unset value for salary and counts as missing.
        match form.current_salary {
            None => errors.push(SALARY_REQUIRED.to_string()),
            Some(salary) if salary.is_zero() => errors.push(SALARY_REQUIRED.to_string()),
            Some(salary) if salary < Decimal::ZERO => errors.push(SALARY_NEGATIVE.to_string()),
            Some(_) => {}
        }

        self.check_role(form, current, &mut errors).await?;
        let boss_id = self.check_boss(form, &mut errors).await?;

        match (form.birthdate, form.employment_date, form.current_salary) {
            (Some(birthdate), Some(employment_date), Some(current_salary)) if errors.is_empty() => {
                Ok(EmployeeDetails {
                    first_name: form.first_name.clone(),
                    last_name: form.last_name.clone(),
                    birthdate,
                    employment_date,
                    home_address: form.home_address.clone(),
                    current_salary,
                    role: form.role.clone(),
                    boss_id,
                })
            }
            _ => {
                tracing::debug!(failures = errors.len(), "employee failed validation");
                Err(ValidationError::Rejected(errors))
            }
        }
    }

    async fn check_role(
        &self,
        form: &EmployeeForm,
        current: Option<&EmployeeId>,
        errors: &mut Vec<String>,
    ) -> Result<(), ValidationError> {
        let has_boss = form.boss_id.as_deref().is_some_and(|b| !b.is_empty());

        if is_blank(&form.role) {
            errors.push(ROLE_REQUIRED.to_string());
        }

        let is_ceo = is_ceo_role(&form.role);
        if is_ceo {
            if let Some(existing) = self.lookup.find_by_role(CEO_ROLE).await? {
                if Some(&existing.id) != current {
                    errors.push(CEO_ALREADY_EXISTS.to_string());
                }
            }
            if has_boss {
                errors.push(CEO_HAS_BOSS.to_string());
            }
        }

        if !is_ceo && !has_boss {
            errors.push(ROLE_NEEDS_BOSS.to_string());
        }

        Ok(())
    }

    /// Returns the parsed boss id when the reference resolves.
    async fn check_boss(
        &self,
        form: &EmployeeForm,
        errors: &mut Vec<String>,
    ) -> Result<Option<EmployeeId>, ValidationError> {
        let raw = match form.boss_id.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        let Ok(boss_id) = raw.parse::<EmployeeId>() else {
            errors.push(BOSS_NOT_FOUND.to_string());
            return Ok(None);
        };

        match self.lookup.find_by_id(&boss_id).await? {
            Some(_) => Ok(Some(boss_id)),
            None => {
                errors.push(BOSS_NOT_FOUND.to_string());
                Ok(None)
            }
        }
    }
}
