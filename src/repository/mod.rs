//! Repository layer for database operations

pub mod visitors;

use sqlx::{Pool, Postgres};

pub use visitors::VisitorStore;

/// Main repository struct, one store per table
#[derive(Clone)]
pub struct Repository {
    pub visitors: visitors::VisitorsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            visitors: visitors::VisitorsRepository::new(pool),
        }
    }
}
