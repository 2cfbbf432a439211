use serde::Deserialize;

/// Query string of `DELETE /api/employees?employeeId=...`.
#[derive(Debug, Deserialize)]
pub struct DeleteEmployeeQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<String>,
}
