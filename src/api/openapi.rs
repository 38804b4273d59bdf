//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, users, visitors};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitor Desk API",
        version = "0.3.0",
        description = "Visitor intake and gate pass REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        health::readiness_check,
        visitors::list_visitors,
        visitors::create_visitor,
        visitors::get_visitor,
        visitors::update_visitor,
        visitors::delete_visitor,
        visitors::get_visitor_by_national_id,
        visitors::update_visitor_status,
        users::validate_user,
    ),
    components(
        schemas(
            crate::models::visitor::Visitor,
            crate::models::visitor::StatusFlags,
            crate::models::visitor::UpdateStatusRequest,
            crate::models::visitor::DeleteResponse,
            crate::models::user::CreateUser,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "visitors", description = "Visitor intake and status"),
        (name = "users", description = "Staff accounts")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
