//! Registration Entity
//!
//! Enrollment of a person in a course. Read-only for this crate. A person
//! may hold several registrations, and each registration code doubles as
//! the user name of one identity.

use serde::Serialize;

use crate::domain::value_object::tenant_id::CompanyId;

/// Key of the person (participant + branch) behind a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonRef {
    pub participant_code: i64,
    pub branch_code: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub company_id: CompanyId,
    /// Enrollment code
    pub code: String,
    pub course_name: Option<String>,
    pub person: PersonRef,
    /// Student situation is active
    pub active: bool,
}

/// What the caller needs to let the end user pick one of several registrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationSummary {
    pub code: String,
    pub course: Option<String>,
}

impl From<&Registration> for RegistrationSummary {
    fn from(registration: &Registration) -> Self {
        Self {
            code: registration.code.trim().to_string(),
            course: registration.course_name.clone(),
        }
    }
}
