use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use personnel_core::{EmployeeId, Entity};

use crate::dates;

/// The one role that sits at the top of the hierarchy and has no boss.
pub const CEO_ROLE: &str = "CEO";

/// Whether `role` names the CEO role (case-insensitive).
pub fn is_ceo_role(role: &str) -> bool {
    role.to_lowercase() == CEO_ROLE.to_lowercase()
}

/// Candidate employee as received from a client, before validation.
///
/// Every field is optional or defaulted so that an incomplete payload still
/// reaches the validator and gets a full list of messages back instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeForm {
    /// Present on full updates; ignored on create.
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "dates::deserialize_opt")]
    pub birthdate: Option<NaiveDate>,
    #[serde(deserialize_with = "dates::deserialize_opt")]
    pub employment_date: Option<NaiveDate>,
    pub home_address: String,
    pub current_salary: Option<Decimal>,
    pub role: String,
    pub boss_id: Option<String>,
}

/// Employee fields that passed validation (everything except the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetails {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub employment_date: NaiveDate,
    pub home_address: String,
    pub current_salary: Decimal,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_id: Option<EmployeeId>,
}

/// A stored employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(flatten)]
    pub details: EmployeeDetails,
}

impl Employee {
    pub fn new(id: EmployeeId, details: EmployeeDetails) -> Self {
        Self { id, details }
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Head count and mean salary for one role.
///
/// `average_salary` is `None` when no employee holds the role; the mean of an
/// empty set is left undefined rather than reported as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSalaryStats {
    pub count: u64,
    pub average_salary: Option<Decimal>,
}

impl RoleSalaryStats {
    /// Compute the stats from the salaries of every matching employee.
    ///
    /// `None` when the salary total does not fit in a `Decimal`.
    pub fn from_salaries<I>(salaries: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let (count, total) = salaries
            .into_iter()
            .try_fold((0u64, Decimal::ZERO), |(n, sum), s| {
                Some((n + 1, sum.checked_add(s)?))
            })?;
        let average_salary = (count > 0).then(|| total / Decimal::from(count));
        Some(Self { count, average_salary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn details() -> EmployeeDetails {
        EmployeeDetails {
            first_name: "Ann".to_string(),
            last_name: "Smith".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            employment_date: NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
            home_address: "1 Main St".to_string(),
            current_salary: Decimal::new(450_050, 2),
            role: "Engineer".to_string(),
            boss_id: Some("64b7f0c2a1d3e4f5a6b7c8d9".parse().unwrap()),
        }
    }

    #[test]
    fn ceo_role_is_case_insensitive() {
        assert!(is_ceo_role("CEO"));
        assert!(is_ceo_role("ceo"));
        assert!(is_ceo_role("Ceo"));
        assert!(!is_ceo_role("CEO "));
        assert!(!is_ceo_role("CTO"));
    }

    #[test]
    fn employee_serializes_as_flat_camel_case_document() {
        let employee = Employee::new("0123456789abcdef01234567".parse().unwrap(), details());
        let json = serde_json::to_value(&employee).unwrap();

        assert_eq!(json["id"], "0123456789abcdef01234567");
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(json["birthdate"], "1990-04-12");
        assert_eq!(json["employmentDate"], "2015-09-01");
        assert_eq!(json["bossId"], "64b7f0c2a1d3e4f5a6b7c8d9");
        assert_eq!(json["currentSalary"].as_f64(), Some(4500.5));
    }

    #[test]
    fn form_tolerates_missing_fields_and_datetime_strings() {
        let form: EmployeeForm = serde_json::from_str(
            r#"{"firstName":"Ann","birthdate":"1990-04-12T00:00:00","currentSalary":1200.5}"#,
        )
        .unwrap();

        assert_eq!(form.first_name, "Ann");
        assert_eq!(form.last_name, "");
        assert_eq!(form.birthdate, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(form.employment_date, None);
        assert_eq!(form.current_salary, Some(Decimal::new(12005, 1)));
        assert_eq!(form.boss_id, None);
    }

    #[test]
    fn role_stats_average_over_matching_salaries() {
        let stats =
            RoleSalaryStats::from_salaries([Decimal::from(1000), Decimal::from(2000)]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_salary, Some(Decimal::from(1500)));
    }

    #[test]
    fn role_stats_over_empty_set_has_no_average() {
        let stats = RoleSalaryStats::from_salaries(Vec::new()).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average_salary, None);
    }

    #[test]
    fn role_stats_refuse_a_total_that_overflows() {
        let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
        assert_eq!(RoleSalaryStats::from_salaries([huge, huge]), None);
        assert!(RoleSalaryStats::from_salaries([huge, Decimal::ONE]).is_some());
    }

    #[test]
    fn salary_keeps_every_digit_on_the_wire() {
        let mut precise = details();
        precise.current_salary = "12345678901234567.89".parse().unwrap();
        let employee = Employee::new("0123456789abcdef01234567".parse().unwrap(), precise);

        let json = serde_json::to_string(&employee).unwrap();
        assert!(json.contains(r#""currentSalary":12345678901234567.89"#), "{json}");

        let form: EmployeeForm =
            serde_json::from_str(r#"{"currentSalary":12345678901234567.89}"#).unwrap();
        assert_eq!(form.current_salary, Some("12345678901234567.89".parse().unwrap()));
    }
}
