//! Postgres-backed employee store.
//!
//! One table holds the employee collection. A `seq` column records insertion
//! order so lists come back in the same order as the in-memory store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError |
//! |------------|-----------------|
//! | `RowNotFound` | `NotFound` |
//! | anything else | `Storage` |
//!
//! A row whose id or boss id is not a well-formed document id maps to
//! `Corrupt`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use personnel_core::EmployeeId;
use personnel_employees::{
    Employee, EmployeeDetails, EmployeeLookup, LookupError, RoleSalaryStats,
};

use super::{EmployeeRepository, RepositoryError, RepositoryResult};
use crate::config::check_table_name;

const COLUMNS: &str = "id, first_name, last_name, birthdate, employment_date, \
                       home_address, current_salary, role, boss_id";

/// Postgres-backed employee store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the store can be
/// shared behind an `Arc` across request handlers.
///
/// ## Consistency
///
/// Every operation is a single statement. The salary update is an
/// `UPDATE ... RETURNING`, so the read-modify-write happens inside Postgres.
#[derive(Debug, Clone)]
pub struct PostgresEmployeeStore {
    pool: Arc<PgPool>,
    table: String,
}

impl PostgresEmployeeStore {
    /// Wrap an existing pool. `table` must be a plain SQL identifier.
    pub fn new(pool: PgPool, table: &str) -> RepositoryResult<Self> {
        check_table_name(table).map_err(|e| RepositoryError::Storage(e.to_string()))?;
        Ok(Self {
            pool: Arc::new(pool),
            table: table.to_string(),
        })
    }

    pub async fn connect(url: &str, table: &str) -> RepositoryResult<Self> {
        let pool = PgPool::connect(url).await.map_err(storage_error)?;
        Self::new(pool, table)
    }

    /// Create the employee table and its lookup indexes if missing.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn ensure_table(&self) -> RepositoryResult<()> {
        let table = &self.table;
        let statements = [
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    seq             BIGSERIAL,
                    id              TEXT PRIMARY KEY,
                    first_name      TEXT NOT NULL,
                    last_name       TEXT NOT NULL,
                    birthdate       DATE NOT NULL,
                    employment_date DATE NOT NULL,
                    home_address    TEXT NOT NULL,
                    current_salary  NUMERIC NOT NULL,
                    role            TEXT NOT NULL,
                    boss_id         TEXT NULL
                )
                "#
            ),
            format!("CREATE INDEX IF NOT EXISTS {table}_role_idx ON {table} (lower(role))"),
            format!("CREATE INDEX IF NOT EXISTS {table}_boss_idx ON {table} (boss_id)"),
        ];

        for sql in &statements {
            sqlx::query(sql)
                .execute(&*self.pool)
                .await
                .map_err(storage_error)?;
        }
        Ok(())
    }

    async fn fetch_list(&self, sql: &str, bind: &[&str]) -> RepositoryResult<Vec<Employee>> {
        let mut query = sqlx::query(sql);
        for value in bind {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(&*self.pool).await.map_err(storage_error)?;
        rows.iter().map(employee_from_row).collect()
    }
}

fn storage_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Storage(other.to_string()),
    }
}

fn parse_id(raw: &str) -> RepositoryResult<EmployeeId> {
    raw.parse()
        .map_err(|e| RepositoryError::Corrupt(format!("{e}")))
}

fn employee_from_row(row: &PgRow) -> RepositoryResult<Employee> {
    let get_err = |e: sqlx::Error| RepositoryError::Corrupt(e.to_string());

    let id: String = row.try_get("id").map_err(get_err)?;
    let boss_id: Option<String> = row.try_get("boss_id").map_err(get_err)?;

    Ok(Employee::new(
        parse_id(&id)?,
        EmployeeDetails {
            first_name: row.try_get("first_name").map_err(get_err)?,
            last_name: row.try_get("last_name").map_err(get_err)?,
            birthdate: row.try_get("birthdate").map_err(get_err)?,
            employment_date: row.try_get("employment_date").map_err(get_err)?,
            home_address: row.try_get("home_address").map_err(get_err)?,
            current_salary: row.try_get("current_salary").map_err(get_err)?,
            role: row.try_get("role").map_err(get_err)?,
            boss_id: boss_id.as_deref().map(parse_id).transpose()?,
        },
    ))
}

#[async_trait]
impl EmployeeLookup for PostgresEmployeeStore {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, LookupError> {
        Ok(self.get_by_id(id).await?)
    }

    async fn find_by_role(&self, role: &str) -> Result<Option<Employee>, LookupError> {
        Ok(self.get_by_role(role).await?)
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeStore {
    #[instrument(skip(self, id), fields(id = %id))]
    async fn get_by_id(&self, id: &EmployeeId) -> RepositoryResult<Option<Employee>> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_error)?;
        row.as_ref().map(employee_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_name_and_birthdate(
        &self,
        name_part: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Employee>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM {}
            WHERE strpos(lower(first_name), lower($1)) > 0
              AND birthdate >= $2
              AND birthdate <= $3
            ORDER BY seq
            "#,
            self.table
        );
        let rows = sqlx::query(&sql)
            .bind(name_part)
            .bind(start)
            .bind(end)
            .fetch_all(&*self.pool)
            .await
            .map_err(storage_error)?;
        rows.iter().map(employee_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> RepositoryResult<Vec<Employee>> {
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY seq", self.table);
        self.fetch_list(&sql, &[]).await
    }

    #[instrument(skip(self, boss_id), fields(boss_id = %boss_id))]
    async fn get_all_by_boss_id(&self, boss_id: &EmployeeId) -> RepositoryResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE boss_id = $1 ORDER BY seq",
            self.table
        );
        self.fetch_list(&sql, &[boss_id.as_str()]).await
    }

    #[instrument(skip(self))]
    async fn get_by_role(&self, role: &str) -> RepositoryResult<Option<Employee>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} WHERE lower(role) = lower($1) ORDER BY seq LIMIT 1",
            self.table
        );
        Ok(self.fetch_list(&sql, &[role]).await?.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn get_count_and_avg_salary(&self, role: &str) -> RepositoryResult<RoleSalaryStats> {
        let sql = format!(
            "SELECT COUNT(*) AS count, AVG(current_salary) AS average \
             FROM {} WHERE lower(role) = lower($1)",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(role)
            .fetch_one(&*self.pool)
            .await
            .map_err(storage_error)?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
        let average: Option<Decimal> = row
            .try_get("average")
            .map_err(|e| RepositoryError::Corrupt(e.to_string()))?;

        Ok(RoleSalaryStats {
            count: u64::try_from(count).unwrap_or_default(),
            average_salary: average.filter(|_| count > 0),
        })
    }

    #[instrument(skip(self, details))]
    async fn add(&self, details: EmployeeDetails) -> RepositoryResult<Employee> {
        let id = EmployeeId::generate();
        let sql = format!(
            r#"
            INSERT INTO {} (
                id, first_name, last_name, birthdate, employment_date,
                home_address, current_salary, role, boss_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#,
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(&details.first_name)
            .bind(&details.last_name)
            .bind(details.birthdate)
            .bind(details.employment_date)
            .bind(&details.home_address)
            .bind(details.current_salary)
            .bind(&details.role)
            .bind(details.boss_id.as_ref().map(EmployeeId::as_str))
            .fetch_one(&*self.pool)
            .await
            .map_err(storage_error)?;
        employee_from_row(&row)
    }

    #[instrument(skip(self, employee), fields(id = %employee.id))]
    async fn update(&self, employee: Employee) -> RepositoryResult<Option<Employee>> {
        let sql = format!(
            r#"
            UPDATE {} SET
                first_name = $2,
                last_name = $3,
                birthdate = $4,
                employment_date = $5,
                home_address = $6,
                current_salary = $7,
                role = $8,
                boss_id = $9
            WHERE id = $1
            RETURNING {COLUMNS}
            "#,
            self.table
        );
        let details = &employee.details;
        let row = sqlx::query(&sql)
            .bind(employee.id.as_str())
            .bind(&details.first_name)
            .bind(&details.last_name)
            .bind(details.birthdate)
            .bind(details.employment_date)
            .bind(&details.home_address)
            .bind(details.current_salary)
            .bind(&details.role)
            .bind(details.boss_id.as_ref().map(EmployeeId::as_str))
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_error)?;
        row.as_ref().map(employee_from_row).transpose()
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn update_salary(&self, id: &EmployeeId, salary: Decimal) -> RepositoryResult<Employee> {
        let sql = format!(
            "UPDATE {} SET current_salary = $2 WHERE id = $1 RETURNING {COLUMNS}",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(salary)
            .fetch_optional(&*self.pool)
            .await
            .map_err(storage_error)?
            .ok_or(RepositoryError::NotFound)?;
        employee_from_row(&row)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn delete(&self, id: &EmployeeId) -> RepositoryResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        sqlx::query(&sql)
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}
