use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use rust_decimal::Decimal;

use personnel_core::EmployeeId;
use personnel_employees::dates::parse_date;
use personnel_employees::validation::SALARY_NEGATIVE;
use personnel_employees::{Employee, EmployeeForm};

use crate::app::dto::DeleteEmployeeQuery;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Returned when a name search has its date range inverted.
pub const INVERTED_RANGE: &str = "The end date must be greater than start date";

type ApiResult<T> = Result<T, ApiError>;

/// Routes under `/api/employees`.
///
/// Single, double and triple segment paths share their parameter names so
/// the router can tell them apart by segment count alone. A method a path
/// does not serve answers 404 like every other failure.
pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_employees)
                .post(add_employee)
                .put(update_employee)
                .delete(delete_employee)
                .fallback(unsupported_method),
        )
        .route("/bosses/:boss_id", get(list_by_boss).fallback(unsupported_method))
        .route("/roles/:role", get(role_salary_stats).fallback(unsupported_method))
        .route("/:key", get(get_employee).fallback(unsupported_method))
        .route("/:key/:arg", put(update_salary).fallback(unsupported_method))
        .route(
            "/:key/:arg/:end",
            get(search_by_name_and_birthdate).fallback(unsupported_method),
        )
}

async fn unsupported_method() -> ApiError {
    ApiError::NotFound
}

pub async fn add_employee(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<EmployeeForm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(form) = body?;
    // The store assigns the id; one sent by the client plays no part.
    let details = services.validate(&form, None).await?;

    let employee = services.employees.add(details).await?;
    tracing::info!(id = %employee.id, role = %employee.details.role, "employee added");
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<EmployeeForm>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let Json(form) = body?;
    let id = form
        .id
        .as_deref()
        .and_then(|raw| raw.parse::<EmployeeId>().ok());
    let details = services.validate(&form, id.as_ref()).await?;
    let id = id.ok_or(ApiError::NotFound)?;

    let updated = services
        .employees
        .update(Employee::new(id, details))
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(id = %updated.id, "employee updated");
    Ok(Json(updated))
}

pub async fn update_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, salary)): Path<(String, String)>,
) -> ApiResult<Json<Employee>> {
    let id: EmployeeId = id.parse().map_err(|_| ApiError::NotFound)?;
    let salary: Decimal = salary
        .parse()
        .map_err(|_| ApiError::Malformed(format!("invalid salary {salary:?}")))?;
    if salary < Decimal::ZERO {
        return Err(ApiError::Rejected(vec![SALARY_NEGATIVE.to_string()]));
    }

    let updated = services.employees.update_salary(&id, salary).await?;
    tracing::info!(id = %updated.id, salary = %salary, "salary updated");
    Ok(Json(updated))
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<DeleteEmployeeQuery>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let Query(query) = query.map_err(|e| ApiError::Malformed(e.body_text()))?;
    let id: EmployeeId = query
        .employee_id
        .as_deref()
        .ok_or(ApiError::NotFound)?
        .parse()?;

    services.employees.delete(&id).await?;
    tracing::info!(%id, "employee deleted");
    Ok(StatusCode::OK)
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let id: EmployeeId = id.parse()?;
    let employee = services
        .employees
        .get_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(employee))
}

pub async fn search_by_name_and_birthdate(
    Extension(services): Extension<Arc<AppServices>>,
    Path((name, start, end)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<Employee>>> {
    let start = parse_date(&start)?;
    let end = parse_date(&end)?;
    if start > end {
        return Err(ApiError::message(INVERTED_RANGE));
    }

    let found = services
        .employees
        .get_by_name_and_birthdate(&name, start, end)
        .await?;
    Ok(Json(found))
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(services.employees.get_all().await?))
}

pub async fn list_by_boss(
    Extension(services): Extension<Arc<AppServices>>,
    Path(boss_id): Path<String>,
) -> ApiResult<Json<Vec<Employee>>> {
    // A malformed id cannot match any stored boss reference.
    let Ok(boss_id) = boss_id.parse::<EmployeeId>() else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(services.employees.get_all_by_boss_id(&boss_id).await?))
}

pub async fn role_salary_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Path(role): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let stats = services.employees.get_count_and_avg_salary(&role).await?;
    if stats.average_salary.is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(stats))
}
