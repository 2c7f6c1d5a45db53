//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    identity::{Identity, NewIdentity},
    occurrence::Occurrence,
    password_change::{PasswordChange, PasswordChangeBatch, PasswordHistoryEntry},
    registration::{PersonRef, Registration, RegistrationSummary},
    tenant::TenantContext,
};
pub use repository::{
    CredentialCipher, CredentialStore, IdentityRepository, OccurrenceRepository,
    PasswordHistoryRepository, RegistrationRepository, SecurityPolicyRepository,
    TenantRepository,
};
