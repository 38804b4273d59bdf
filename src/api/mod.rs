//! API handlers for the visitor desk REST endpoints

pub mod health;
pub mod openapi;
pub mod users;
pub mod visitors;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Visitors
        .route("/visitors", get(visitors::list_visitors).post(visitors::create_visitor))
        .route(
            "/visitors/:id",
            get(visitors::get_visitor)
                .put(visitors::update_visitor)
                .delete(visitors::delete_visitor),
        )
        .route("/visitors/:id/status", put(visitors::update_visitor_status))
        .route(
            "/visitors/national-id/:nationalid",
            get(visitors::get_visitor_by_national_id),
        )
        // Staff users
        .route("/users/validate", post(users::validate_user))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use crate::{
        error::{AppError, AppResult},
        models::visitor::Visitor,
        repository::VisitorStore,
        services::{email::VisitorNotifier, visitors::VisitorsService, Services},
    };

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Visitor>>,
    }

    #[async_trait]
    impl VisitorStore for MemoryStore {
        async fn find_by_id(&self, id: i32) -> AppResult<Option<Visitor>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|v| v.id == Some(id)).cloned())
        }

        async fn find_by_national_id(&self, nationalid: &str) -> AppResult<Option<Visitor>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .find(|v| v.nationalid.as_deref() == Some(nationalid))
                .cloned())
        }

        async fn find_all(&self) -> AppResult<Vec<Visitor>> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn save(&self, visitor: &Visitor) -> AppResult<Visitor> {
            let mut rows = self.rows.lock().unwrap();
            let mut saved = visitor.clone();
            match saved.id {
                Some(id) => {
                    let slot = rows
                        .iter_mut()
                        .find(|v| v.id == Some(id))
                        .ok_or_else(|| AppError::NotFound(format!("Visitor with id {} not found", id)))?;
                    *slot = saved.clone();
                }
                None => {
                    saved.id = Some(rows.len() as i32 + 1);
                    rows.push(saved.clone());
                }
            }
            Ok(saved)
        }

        async fn delete_by_id(&self, id: i32) -> AppResult<u64> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|v| v.id != Some(id));
            Ok((before - rows.len()) as u64)
        }

        async fn ping(&self) -> AppResult<()> {
            Ok(())
        }
    }

    struct DownMailer;

    #[async_trait]
    impl VisitorNotifier for DownMailer {
        async fn send_visitor_qr_code(&self, _visitor: &Visitor) -> AppResult<()> {
            Err(AppError::Internal("SMTP relay unreachable".to_string()))
        }
    }

    fn app() -> Router {
        let state = AppState {
            services: Arc::new(Services {
                visitors: VisitorsService::new(Arc::new(MemoryStore::default()), Arc::new(DownMailer)),
            }),
        };
        create_router(state)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_create_normalizes_even_when_mail_is_down() {
        let app = app();

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/visitors",
            Some(json!({
                "name": "Ines Duarte",
                "nationalid": "PT-5521",
                "email": "ines@example.com",
                "date": "05-03-2024",
                "durationunit": "",
                "company": ""
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["date"], "2024-03-05");
        assert!(body["durationunit"].is_null());
        assert!(body["company"].is_null());
        for flag in ["isApproved", "inprogress", "complete", "exit"] {
            assert_eq!(body[flag], false, "{}", flag);
        }
    }

    #[tokio::test]
    async fn test_visitor_lifecycle() {
        let app = app();
        call(&app, "POST", "/api/v1/visitors", Some(json!({ "name": "Ravi", "nationalid": "IN-77" }))).await;

        let (status, body) = call(&app, "PUT", "/api/v1/visitors/1/status", Some(json!({ "status": "APPROVE" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isApproved"], true);
        assert_eq!(body["inprogress"], true);
        assert_eq!(body["complete"], false);

        let (status, body) = call(&app, "PUT", "/api/v1/visitors/1", Some(json!({ "purpose": "Interview", "name": "" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["purpose"], "Interview");
        assert_eq!(body["name"], "Ravi");
        assert_eq!(body["isApproved"], true);

        let (status, body) = call(&app, "GET", "/api/v1/visitors/national-id/IN-77", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);

        let (_, body) = call(&app, "GET", "/api/v1/visitors", None).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (status, body) = call(&app, "DELETE", "/api/v1/visitors/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Visitor with id 1 deleted successfully");

        let (status, _) = call(&app, "GET", "/api/v1/visitors/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_status_is_bad_request() {
        let app = app();
        call(&app, "POST", "/api/v1/visitors", Some(json!({ "name": "Ravi" }))).await;

        let (status, body) = call(&app, "PUT", "/api/v1/visitors/1/status", Some(json!({ "status": "bogus" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid status: bogus");

        let (status, _) = call(&app, "PUT", "/api/v1/visitors/1/status", Some(json!({ "status": "approve " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = call(&app, "GET", "/api/v1/visitors/1", None).await;
        assert_eq!(body["isApproved"], false);
        assert_eq!(body["inprogress"], false);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let app = app();

        for (method, uri, body) in [
            ("GET", "/api/v1/visitors/5", None),
            ("PUT", "/api/v1/visitors/5", Some(json!({}))),
            ("DELETE", "/api/v1/visitors/5", None),
            ("PUT", "/api/v1/visitors/5/status", Some(json!({ "status": "exit" }))),
            ("GET", "/api/v1/visitors/national-id/nobody", None),
        ] {
            let (status, body) = call(&app, method, uri, body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
            assert_eq!(body["error"], "NoSuchVisitor");
        }
    }

    #[tokio::test]
    async fn test_validate_user() {
        let app = app();

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/users/validate",
            Some(json!({
                "firstName": "Mei",
                "lastName": "Tanaka",
                "userName": "mtanaka",
                "emailId": "mei@example.com",
                "userRoleId": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userName"], "mtanaka");

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/users/validate",
            Some(json!({
                "firstName": "Mei",
                "lastName": "Tanaka",
                "userName": "mt",
                "emailId": "not-an-email",
                "userRoleId": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_readiness() {
        let (status, body) = call(&app(), "GET", "/api/v1/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }
}
