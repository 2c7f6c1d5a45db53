//! Repository Traits
//!
//! Interfaces for the external collaborators the pipelines depend on.
//! Implementations live in the infrastructure layer.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::entity::{
    identity::{Identity, NewIdentity},
    occurrence::Occurrence,
    password_change::{PasswordChangeBatch, PasswordHistoryEntry},
    registration::Registration,
};
use crate::domain::value_object::{
    document_number::DocumentNumber,
    email::Email,
    identity_id::IdentityId,
    policy_type::PolicyType,
    tenant_id::{CompanyGroupId, CompanyId},
    transform_direction::TransformDirection,
    user_name::UserName,
};
use crate::error::AuthResult;

/// Backing store of the tenant hierarchy
#[trait_variant::make(TenantRepository: Send)]
pub trait LocalTenantRepository {
    /// The company group flagged as main
    async fn find_main_company_group(&self) -> AuthResult<Option<CompanyGroupId>>;

    /// The company flagged as main within a group
    async fn find_main_company(&self, group_id: CompanyGroupId) -> AuthResult<Option<CompanyId>>;
}

/// Identity lookups and mutations
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Create identity, returning it with its assigned key
    async fn create_identity(&self, identity: &NewIdentity) -> AuthResult<Identity>;

    /// Update the mutable attributes of an identity
    async fn update_identity(&self, identity: &Identity) -> AuthResult<()>;

    async fn find_identity_by_id(&self, identity_id: IdentityId) -> AuthResult<Option<Identity>>;

    async fn find_identity_by_username(&self, user_name: &UserName)
    -> AuthResult<Option<Identity>>;

    async fn find_identity_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Every identity whose user name is one of `user_names`
    async fn find_identities_by_usernames(
        &self,
        user_names: &[UserName],
    ) -> AuthResult<Vec<Identity>>;

    /// Apply a password change batch atomically
    ///
    /// Returns `false` when the store refused the batch; in that case nothing
    /// from the batch is visible afterwards.
    async fn commit_password_change(&self, batch: &PasswordChangeBatch) -> AuthResult<bool>;
}

/// The reversible credential transform
#[trait_variant::make(CredentialCipher: Send)]
pub trait LocalCredentialCipher {
    /// `Ok(None)` when the transform produced nothing for this input
    async fn transform(
        &self,
        input: &str,
        context: &NaiveDateTime,
        direction: TransformDirection,
    ) -> AuthResult<Option<String>>;
}

/// Read-only registration lookups
#[trait_variant::make(RegistrationRepository: Send)]
pub trait LocalRegistrationRepository {
    /// Active registrations whose person holds the given document
    async fn find_registrations_by_document(
        &self,
        company_id: CompanyId,
        document: &DocumentNumber,
    ) -> AuthResult<Vec<Registration>>;

    /// Every registration code of the person behind `code`, `code` included
    async fn find_sibling_registration_codes(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> AuthResult<Vec<String>>;
}

/// Per-tenant security settings
#[trait_variant::make(SecurityPolicyRepository: Send)]
pub trait LocalSecurityPolicyRepository {
    async fn find_policy_value(
        &self,
        company_id: CompanyId,
        policy_type: PolicyType,
    ) -> AuthResult<Option<i32>>;
}

/// Append-only password history
#[trait_variant::make(PasswordHistoryRepository: Send)]
pub trait LocalPasswordHistoryRepository {
    /// Timestamp of the most recent change
    async fn find_last_password_change(
        &self,
        identity_id: IdentityId,
    ) -> AuthResult<Option<DateTime<Utc>>>;

    async fn append_password_history(&self, entry: &PasswordHistoryEntry) -> AuthResult<()>;
}

/// Append-only audit trail
#[trait_variant::make(OccurrenceRepository: Send)]
pub trait LocalOccurrenceRepository {
    /// Returns the stored record, `None` when nothing was written
    async fn append_occurrence(&self, occurrence: &Occurrence) -> AuthResult<Option<Occurrence>>;
}

/// Everything the pipelines need from one backing store
pub trait CredentialStore:
    TenantRepository
    + IdentityRepository
    + CredentialCipher
    + RegistrationRepository
    + SecurityPolicyRepository
    + PasswordHistoryRepository
    + OccurrenceRepository
    + Send
    + Sync
{
}

impl<T> CredentialStore for T where
    T: TenantRepository
        + IdentityRepository
        + CredentialCipher
        + RegistrationRepository
        + SecurityPolicyRepository
        + PasswordHistoryRepository
        + OccurrenceRepository
        + Send
        + Sync
{
}
