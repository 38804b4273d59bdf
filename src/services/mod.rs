//! Business logic services

pub mod email;
pub mod normalize;
pub mod visitors;

use std::sync::Arc;

use crate::{config::EmailConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub visitors: visitors::VisitorsService,
}

impl Services {
    /// Wire services to the Postgres repository and the SMTP mailer
    pub fn new(repository: Repository, email_config: EmailConfig) -> Self {
        let mailer = email::EmailService::new(email_config);
        Self {
            visitors: visitors::VisitorsService::new(
                Arc::new(repository.visitors),
                Arc::new(mailer),
            ),
        }
    }
}
