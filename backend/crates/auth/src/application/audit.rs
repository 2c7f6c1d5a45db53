//! Audit Recorder
//!
//! Appends login occurrences. Password-change occurrences are part of the
//! password change batch and are written by the store's commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::{identity::Identity, occurrence::Occurrence};
use crate::domain::repository::OccurrenceRepository;
use crate::domain::value_object::occurrence_type::OccurrenceType;
use crate::error::{AuthError, AuthResult};

pub struct AuditRecorder<O>
where
    O: OccurrenceRepository,
{
    repo: Arc<O>,
    config: Arc<AuthConfig>,
}

impl<O> AuditRecorder<O>
where
    O: OccurrenceRepository,
{
    pub fn new(repo: Arc<O>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Record a successful login
    ///
    /// Fails with [`AuthError::AuditWrite`] unless the store returns the
    /// written record.
    pub async fn record_login(
        &self,
        identity: &Identity,
        at: DateTime<Utc>,
    ) -> AuthResult<Occurrence> {
        let occurrence = Occurrence::new(
            identity.user_name.as_str(),
            at,
            OccurrenceType::Login,
            self.config.login_reason.as_str(),
        );
        self.record(&occurrence).await
    }

    pub async fn record(&self, occurrence: &Occurrence) -> AuthResult<Occurrence> {
        match self.repo.append_occurrence(occurrence).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(AuthError::AuditWrite),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    occurrence_type = %occurrence.occurrence_type,
                    "Occurrence append failed"
                );
                Err(AuthError::AuditWrite)
            }
        }
    }
}
