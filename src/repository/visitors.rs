//! Visitors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::visitor::Visitor,
};

/// Storage for visitor records.
///
/// `save` inserts when `visitor.id` is `None` and overwrites the whole
/// record otherwise, so every column (status flags included) is written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Visitor>>;

    async fn find_by_national_id(&self, nationalid: &str) -> AppResult<Option<Visitor>>;

    async fn find_all(&self) -> AppResult<Vec<Visitor>>;

    async fn save(&self, visitor: &Visitor) -> AppResult<Visitor>;

    /// Returns the number of deleted rows
    async fn delete_by_id(&self, id: i32) -> AppResult<u64>;

    /// Cheap connectivity check used by the readiness check
    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, v: &Visitor) -> AppResult<Visitor> {
        let row = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (
                name, nationalid, email, phone, company, purpose, host,
                visit_date, visit_time, duration, durationunit, notes,
                is_approved, inprogress, complete, exit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&v.name)
        .bind(&v.nationalid)
        .bind(&v.email)
        .bind(&v.phone)
        .bind(&v.company)
        .bind(&v.purpose)
        .bind(&v.host)
        .bind(&v.date)
        .bind(&v.time)
        .bind(v.duration)
        .bind(&v.durationunit)
        .bind(&v.notes)
        .bind(v.status.is_approved)
        .bind(v.status.inprogress)
        .bind(v.status.complete)
        .bind(v.status.exit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_national_id(e, v))?;

        Ok(row)
    }

    async fn update(&self, id: i32, v: &Visitor) -> AppResult<Visitor> {
        sqlx::query_as::<_, Visitor>(
            r#"
            UPDATE visitors SET
                name = $2, nationalid = $3, email = $4, phone = $5, company = $6,
                purpose = $7, host = $8, visit_date = $9, visit_time = $10,
                duration = $11, durationunit = $12, notes = $13,
                is_approved = $14, inprogress = $15, complete = $16, exit = $17,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&v.name)
        .bind(&v.nationalid)
        .bind(&v.email)
        .bind(&v.phone)
        .bind(&v.company)
        .bind(&v.purpose)
        .bind(&v.host)
        .bind(&v.date)
        .bind(&v.time)
        .bind(v.duration)
        .bind(&v.durationunit)
        .bind(&v.notes)
        .bind(v.status.is_approved)
        .bind(v.status.inprogress)
        .bind(v.status.complete)
        .bind(v.status.exit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_national_id(e, v))?
        .ok_or_else(|| AppError::NotFound(format!("Visitor with id {} not found", id)))
    }
}

fn duplicate_national_id(e: sqlx::Error, v: &Visitor) -> AppError {
    let unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique {
        AppError::Conflict(format!(
            "Visitor with national ID {} already exists",
            v.nationalid.as_deref().unwrap_or_default()
        ))
    } else {
        AppError::Database(e)
    }
}

#[async_trait]
impl VisitorStore for VisitorsRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Visitor>> {
        let row = sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_national_id(&self, nationalid: &str) -> AppResult<Option<Visitor>> {
        let row = sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE nationalid = $1")
            .bind(nationalid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> AppResult<Vec<Visitor>> {
        let rows = sqlx::query_as::<_, Visitor>("SELECT * FROM visitors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn save(&self, visitor: &Visitor) -> AppResult<Visitor> {
        match visitor.id {
            Some(id) => self.update(id, visitor).await,
            None => self.insert(visitor).await,
        }
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM visitors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
