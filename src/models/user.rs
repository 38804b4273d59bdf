//! Staff user account DTO

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Create staff user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,
    /// Login name
    #[validate(length(min = 3, message = "User name must be at least 3 characters"))]
    pub user_name: String,
    pub password: Option<String>,
    pub contact_no: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email_id: Option<String>,
    pub address: Option<String>,
    /// Role assigned to the account; any JSON number is accepted
    pub user_role_id: f64,
    pub notes: Option<String>,
    pub employee_no: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
}
