use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use personnel_core::{EmployeeId, Entity};
use personnel_employees::{
    Employee, EmployeeDetails, EmployeeLookup, LookupError, RoleSalaryStats,
};

use super::{EmployeeRepository, RepositoryError, RepositoryResult};

/// In-memory employee collection for tests/dev.
///
/// A vector keeps insertion order, which is the order lists come back in.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    inner: RwLock<Vec<Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<Employee>>> {
        self.inner
            .read()
            .map_err(|_| RepositoryError::Storage("employee store lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Vec<Employee>>> {
        self.inner
            .write()
            .map_err(|_| RepositoryError::Storage("employee store lock poisoned".to_string()))
    }

    fn filtered<F>(&self, pred: F) -> RepositoryResult<Vec<Employee>>
    where
        F: Fn(&Employee) -> bool,
    {
        Ok(self.read()?.iter().filter(|e| pred(e)).cloned().collect())
    }
}

fn same_role(employee: &Employee, role: &str) -> bool {
    employee.details.role.to_lowercase() == role.to_lowercase()
}

#[async_trait]
impl EmployeeLookup for InMemoryEmployeeStore {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, LookupError> {
        Ok(self.get_by_id(id).await?)
    }

    async fn find_by_role(&self, role: &str) -> Result<Option<Employee>, LookupError> {
        Ok(self.get_by_role(role).await?)
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeStore {
    async fn get_by_id(&self, id: &EmployeeId) -> RepositoryResult<Option<Employee>> {
        Ok(self.read()?.iter().find(|e| e.is_identified_by(id)).cloned())
    }

    async fn get_by_name_and_birthdate(
        &self,
        name_part: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Employee>> {
        let needle = name_part.to_lowercase();
        self.filtered(|e| {
            e.details.first_name.to_lowercase().contains(&needle)
                && e.details.birthdate >= start
                && e.details.birthdate <= end
        })
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Employee>> {
        Ok(self.read()?.clone())
    }

    async fn get_all_by_boss_id(&self, boss_id: &EmployeeId) -> RepositoryResult<Vec<Employee>> {
        self.filtered(|e| e.details.boss_id.as_ref() == Some(boss_id))
    }

    async fn get_by_role(&self, role: &str) -> RepositoryResult<Option<Employee>> {
        Ok(self.read()?.iter().find(|e| same_role(e, role)).cloned())
    }

    async fn get_count_and_avg_salary(&self, role: &str) -> RepositoryResult<RoleSalaryStats> {
        let employees = self.read()?;
        RoleSalaryStats::from_salaries(
            employees
                .iter()
                .filter(|e| same_role(e, role))
                .map(|e| e.details.current_salary),
        )
        .ok_or_else(|| RepositoryError::Storage(format!("salary total for role {role:?} overflows")))
    }

    async fn add(&self, details: EmployeeDetails) -> RepositoryResult<Employee> {
        let mut employees = self.write()?;
        let mut id = EmployeeId::generate();
        while employees.iter().any(|e| e.is_identified_by(&id)) {
            id = EmployeeId::generate();
        }

        let employee = Employee::new(id, details);
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn update(&self, employee: Employee) -> RepositoryResult<Option<Employee>> {
        let mut employees = self.write()?;
        match employees.iter_mut().find(|e| e.is_identified_by(employee.id())) {
            Some(slot) => {
                *slot = employee.clone();
                Ok(Some(employee))
            }
            None => Ok(None),
        }
    }

    async fn update_salary(&self, id: &EmployeeId, salary: Decimal) -> RepositoryResult<Employee> {
        let mut employees = self.write()?;
        let employee = employees
            .iter_mut()
            .find(|e| e.is_identified_by(id))
            .ok_or(RepositoryError::NotFound)?;
        employee.details.current_salary = salary;
        Ok(employee.clone())
    }

    async fn delete(&self, id: &EmployeeId) -> RepositoryResult<()> {
        self.write()?.retain(|e| !e.is_identified_by(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details(first_name: &str, birthdate: NaiveDate, role: &str, salary: i64) -> EmployeeDetails {
        EmployeeDetails {
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            birthdate,
            employment_date: ymd(2010, 3, 1),
            home_address: "12 Elm St".to_string(),
            current_salary: Decimal::from(salary),
            role: role.to_string(),
            boss_id: None,
        }
    }

    #[tokio::test]
    async fn add_then_get_by_id_round_trips() {
        let store = InMemoryEmployeeStore::new();
        let input = details("Ann", ymd(1990, 1, 1), "Engineer", 4000);

        let added = store.add(input.clone()).await.unwrap();
        let fetched = store.get_by_id(&added.id).await.unwrap().unwrap();

        assert_eq!(fetched.details, input);
        assert_eq!(fetched, added);
    }

    #[tokio::test]
    async fn name_and_birthdate_query_is_case_insensitive_and_inclusive() {
        let store = InMemoryEmployeeStore::new();
        let joanna = store.add(details("Joanna", ymd(2000, 1, 1), "Engineer", 1)).await.unwrap();
        let ann = store.add(details("ANN", ymd(2020, 1, 1), "Engineer", 1)).await.unwrap();
        store.add(details("Annette", ymd(1999, 12, 31), "Engineer", 1)).await.unwrap();
        store.add(details("Bob", ymd(2010, 5, 5), "Engineer", 1)).await.unwrap();

        let found = store
            .get_by_name_and_birthdate("ann", ymd(2000, 1, 1), ymd(2020, 1, 1))
            .await
            .unwrap();

        assert_eq!(found, vec![joanna, ann]);
    }

    #[tokio::test]
    async fn lists_keep_insertion_order_and_filter_by_boss() {
        let store = InMemoryEmployeeStore::new();
        let ceo = store.add(details("Cleo", ymd(1970, 1, 1), "CEO", 9000)).await.unwrap();
        let mut report = details("Rita", ymd(1985, 1, 1), "Manager", 5000);
        report.boss_id = Some(ceo.id.clone());
        let report = store.add(report).await.unwrap();

        assert_eq!(store.get_all().await.unwrap(), vec![ceo.clone(), report.clone()]);
        assert_eq!(store.get_all_by_boss_id(&ceo.id).await.unwrap(), vec![report.clone()]);
        assert!(store.get_all_by_boss_id(&report.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn role_lookup_and_stats_ignore_case() {
        let store = InMemoryEmployeeStore::new();
        let first = store.add(details("Ann", ymd(1990, 1, 1), "Engineer", 1000)).await.unwrap();
        store.add(details("Ben", ymd(1991, 1, 1), "ENGINEER", 2000)).await.unwrap();
        store.add(details("Cid", ymd(1992, 1, 1), "Designer", 7000)).await.unwrap();

        assert_eq!(store.get_by_role("engineer").await.unwrap(), Some(first));

        let stats = store.get_count_and_avg_salary("Engineer").await.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_salary, Some(Decimal::from(1500)));

        let none = store.get_count_and_avg_salary("Janitor").await.unwrap();
        assert_eq!(none, RoleSalaryStats { count: 0, average_salary: None });
    }

    #[tokio::test]
    async fn role_stats_report_an_overflowing_total_as_storage_error() {
        let store = InMemoryEmployeeStore::new();
        let huge: Decimal = "50000000000000000000000000000".parse().unwrap();
        for name in ["Ann", "Ben"] {
            let added = store.add(details(name, ymd(1990, 1, 1), "Engineer", 1)).await.unwrap();
            store.update_salary(&added.id, huge).await.unwrap();
        }

        let err = store.get_count_and_avg_salary("engineer").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
    }

    #[tokio::test]
    async fn update_salary_changes_only_salary() {
        let store = InMemoryEmployeeStore::new();
        let added = store.add(details("Ann", ymd(1990, 1, 1), "Engineer", 4000)).await.unwrap();

        let updated = store.update_salary(&added.id, Decimal::from(5000)).await.unwrap();

        let mut expected = added.clone();
        expected.details.current_salary = Decimal::from(5000);
        assert_eq!(updated, expected);
        assert_eq!(store.get_by_id(&added.id).await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn update_salary_of_unknown_id_fails() {
        let store = InMemoryEmployeeStore::new();
        let err = store
            .update_salary(&EmployeeId::generate(), Decimal::from(1))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::NotFound);
    }

    #[tokio::test]
    async fn full_update_replaces_by_id() {
        let store = InMemoryEmployeeStore::new();
        let added = store.add(details("Ann", ymd(1990, 1, 1), "Engineer", 4000)).await.unwrap();

        let replacement = Employee::new(added.id.clone(), details("Anne", ymd(1990, 1, 2), "Lead", 4500));
        assert_eq!(store.update(replacement.clone()).await.unwrap(), Some(replacement.clone()));
        assert_eq!(store.get_all().await.unwrap(), vec![replacement]);

        let stranger = Employee::new(EmployeeId::generate(), details("Zed", ymd(1990, 1, 1), "Lead", 1));
        assert_eq!(store.update(stranger).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_is_a_no_op_for_unknown_ids() {
        let store = InMemoryEmployeeStore::new();
        let added = store.add(details("Ann", ymd(1990, 1, 1), "Engineer", 4000)).await.unwrap();

        store.delete(&EmployeeId::generate()).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 1);

        store.delete(&added.id).await.unwrap();
        assert!(store.get_by_id(&added.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_capability_reads_through_to_the_store() {
        let store = InMemoryEmployeeStore::new();
        let ceo = store.add(details("Cleo", ymd(1970, 1, 1), "CEO", 9000)).await.unwrap();

        assert_eq!(store.find_by_id(&ceo.id).await.unwrap(), Some(ceo.clone()));
        assert_eq!(store.find_by_role("ceo").await.unwrap(), Some(ceo));
    }
}
