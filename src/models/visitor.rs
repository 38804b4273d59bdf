//! Visitor model and status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AppError;

/// Visit status flags.
///
/// The flags are independent and accumulate: a visitor can be marked
/// `exit` without ever having been approved. Only `is_approved` can go
/// back to `false`, through [`StatusToken::Disapprove`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusFlags {
    #[serde(rename = "isApproved")]
    pub is_approved: bool,
    pub inprogress: bool,
    pub complete: bool,
    pub exit: bool,
}

impl StatusFlags {
    /// Apply a status transition in place
    pub fn apply(&mut self, token: StatusToken) {
        match token {
            StatusToken::Approve => {
                self.is_approved = true;
                self.inprogress = true;
            }
            StatusToken::Disapprove => self.is_approved = false,
            StatusToken::InProgress => self.inprogress = true,
            StatusToken::Complete => self.complete = true,
            StatusToken::Exit => self.exit = true,
        }
    }
}

/// Status token accepted by the status endpoint (case-insensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusToken {
    Approve,
    Disapprove,
    InProgress,
    Complete,
    Exit,
}

impl StatusToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusToken::Approve => "approve",
            StatusToken::Disapprove => "disapprove",
            StatusToken::InProgress => "inprogress",
            StatusToken::Complete => "complete",
            StatusToken::Exit => "exit",
        }
    }
}

impl std::fmt::Display for StatusToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusToken {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" => Ok(StatusToken::Approve),
            "disapprove" => Ok(StatusToken::Disapprove),
            "inprogress" => Ok(StatusToken::InProgress),
            "complete" => Ok(StatusToken::Complete),
            "exit" => Ok(StatusToken::Exit),
            _ => Err(AppError::BadRequest(format!("Invalid status: {}", s))),
        }
    }
}

/// Visitor record
///
/// `id` is `None` until the record has been saved once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visitor {
    pub id: Option<i32>,
    pub name: Option<String>,
    /// National identity number, unique per visitor
    pub nationalid: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Reason for the visit
    pub purpose: Option<String>,
    /// Person being visited
    pub host: Option<String>,
    /// Visit date, normally YYYY-MM-DD
    #[sqlx(rename = "visit_date")]
    pub date: Option<String>,
    #[sqlx(rename = "visit_time")]
    pub time: Option<String>,
    pub duration: Option<i32>,
    /// Unit of `duration` (minutes, hours, days); `null` when unset
    pub durationunit: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub status: StatusFlags,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of approve, disapprove, inprogress, complete, exit
    pub status: String,
}

/// Confirmation returned after deleting a visitor
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}
