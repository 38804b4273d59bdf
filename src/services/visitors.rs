//! Visitor record service

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::visitor::{DeleteResponse, StatusToken, Visitor},
    repository::VisitorStore,
    services::{email::VisitorNotifier, normalize},
};

/// Result of the best-effort notification that follows a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    Failed(String),
}

/// A record that has been written, with the outcome of its notification.
///
/// The write is authoritative: a failed notification never turns a
/// committed write into an error.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub record: T,
    pub notification: NotificationOutcome,
}

#[derive(Clone)]
pub struct VisitorsService {
    store: Arc<dyn VisitorStore>,
    notifier: Arc<dyn VisitorNotifier>,
}

impl VisitorsService {
    pub fn new(store: Arc<dyn VisitorStore>, notifier: Arc<dyn VisitorNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Register a new visitor and email their QR code
    pub async fn create(&self, input: Map<String, Value>) -> AppResult<Committed<Visitor>> {
        let draft = merge(&Visitor::default(), input)?;
        let saved = self.store.save(&draft).await?;

        let notification = self.notify(&saved).await;
        Ok(Committed { record: saved, notification })
    }

    /// List every visitor
    pub async fn find_all(&self) -> AppResult<Vec<Visitor>> {
        self.store.find_all().await
    }

    /// Get a visitor by ID
    pub async fn find_one(&self, id: i32) -> AppResult<Visitor> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update and re-send the QR code
    pub async fn update(&self, id: i32, input: Map<String, Value>) -> AppResult<Committed<Visitor>> {
        let existing = self.find_one(id).await?;
        let updated = merge(&existing, input)?;
        let saved = self.store.save(&updated).await?;

        let notification = self.notify(&saved).await;
        Ok(Committed { record: saved, notification })
    }

    /// Delete a visitor
    pub async fn remove(&self, id: i32) -> AppResult<DeleteResponse> {
        if self.store.delete_by_id(id).await? == 0 {
            return Err(not_found(id));
        }
        Ok(DeleteResponse {
            message: format!("Visitor with id {} deleted successfully", id),
        })
    }

    /// Get a visitor by national ID
    pub async fn find_by_national_id(&self, nationalid: &str) -> AppResult<Visitor> {
        self.store
            .find_by_national_id(nationalid)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Visitor with national ID {} not found", nationalid))
            })
    }

    /// Apply a status token to a visitor
    pub async fn update_status(&self, id: i32, status: &str) -> AppResult<Visitor> {
        let mut visitor = self.find_one(id).await?;
        let token: StatusToken = status.parse()?;

        tracing::info!("Updating status for visitor {} to {}", id, token);
        visitor.status.apply(token);

        let saved = self.store.save(&visitor).await?;
        tracing::debug!("Saved visitor {} with status {:?}", id, saved.status);
        Ok(saved)
    }

    /// Check that visitor storage is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    async fn notify(&self, visitor: &Visitor) -> NotificationOutcome {
        match self.notifier.send_visitor_qr_code(visitor).await {
            Ok(()) => {
                tracing::info!("QR code email sent for visitor {:?}", visitor.id);
                NotificationOutcome::Sent
            }
            Err(e) => {
                tracing::warn!("QR code email failed for visitor {:?}: {}", visitor.id, e);
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Visitor with id {} not found", id))
}

/// Normalize `input` and merge the cleaned fields onto `base`
fn merge(base: &Visitor, input: Map<String, Value>) -> AppResult<Visitor> {
    let mut record = match serde_json::to_value(base) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(AppError::Internal("Visitor did not serialize to an object".to_string())),
        Err(e) => return Err(AppError::Internal(format!("Failed to serialize visitor: {}", e))),
    };

    let cleaned = normalize::normalize(input, &record);
    tracing::debug!("Cleaned visitor data: {:?}", cleaned);
    record.extend(cleaned);

    serde_json::from_value(Value::Object(record))
        .map_err(|e| AppError::Validation(format!("Invalid visitor data: {}", e)))
}
