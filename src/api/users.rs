//! Staff user endpoints

use axum::Json;
use validator::Validate;

use crate::{error::AppResult, models::user::CreateUser};

/// Validate a staff account creation request
#[utoipa::path(
    post,
    path = "/users/validate",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "Request is valid", body = CreateUser),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn validate_user(Json(user): Json<CreateUser>) -> AppResult<Json<CreateUser>> {
    user.validate()?;
    Ok(Json(user))
}
