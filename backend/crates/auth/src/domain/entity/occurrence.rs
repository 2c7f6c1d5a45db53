//! Occurrence Entity
//!
//! Immutable audit record of a security-relevant event.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::occurrence_type::OccurrenceType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// User name of the identity the event concerns
    pub user_code: String,
    pub occurred_at: DateTime<Utc>,
    pub occurrence_type: OccurrenceType,
    /// Free-text reason
    pub reason: String,
    pub related_code: Option<String>,
}

impl Occurrence {
    pub fn new(
        user_code: impl Into<String>,
        occurred_at: DateTime<Utc>,
        occurrence_type: OccurrenceType,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            user_code: user_code.into(),
            occurred_at,
            occurrence_type,
            reason: reason.into(),
            related_code: None,
        }
    }

    pub fn with_related_code(mut self, code: impl Into<String>) -> Self {
        self.related_code = Some(code.into());
        self
    }
}
