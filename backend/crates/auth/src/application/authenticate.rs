//! Authenticate Use Case
//!
//! Resolves an identity from a user name or a document number, checks the
//! account state, verifies the password through the reversible transform and
//! decides whether a password change must be forced.
//!
//! Every step gates the next one. A login occurrence is only written for a
//! plain success; forced-change and disambiguation outcomes leave no trace.

use std::sync::Arc;

use platform::clock::Clock;
use platform::crypto::fingerprint;
use platform::password::ClearTextPassword;

use crate::application::audit::AuditRecorder;
use crate::application::config::AuthConfig;
use crate::application::credential::decrypt_stored;
use crate::application::password_policy::PasswordPolicyEvaluator;
use crate::application::tenant_resolver::TenantResolver;
use crate::domain::entity::{
    identity::Identity,
    registration::{Registration, RegistrationSummary},
};
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    document_number::DocumentNumber, tenant_id::CompanyId, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// Authenticate input
pub struct AuthenticateInput {
    /// User name, or a document number of the person behind it
    pub identifier: String,
    pub password: String,
}

/// Authenticate outcome
#[derive(Debug)]
pub enum AuthOutcome {
    /// Password verified, login recorded
    Authenticated { identity: Identity },
    /// Password verified but temporary or expired; nothing recorded
    MustChangePassword { identity: Identity },
    /// Document matched several registrations; caller must pick one
    MultipleRegistrations {
        registrations: Vec<RegistrationSummary>,
    },
}

impl AuthOutcome {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthOutcome::Authenticated { identity }
            | AuthOutcome::MustChangePassword { identity } => Some(identity),
            AuthOutcome::MultipleRegistrations { .. } => None,
        }
    }

    pub fn must_change_password(&self) -> bool {
        matches!(self, AuthOutcome::MustChangePassword { .. })
    }
}

enum ResolvedIdentity {
    Single(Identity),
    Ambiguous(Vec<Registration>),
}

/// Authenticate use case
pub struct AuthenticateUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    tenants: TenantResolver<S>,
    policy: PasswordPolicyEvaluator<S, S>,
    audit: AuditRecorder<S>,
    clock: Arc<dyn Clock>,
}

impl<S> AuthenticateUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: Arc<AuthConfig>) -> Self {
        Self {
            tenants: TenantResolver::new(store.clone()),
            policy: PasswordPolicyEvaluator::new(
                store.clone(),
                store.clone(),
                clock.clone(),
                config.clone(),
            ),
            audit: AuditRecorder::new(store.clone(), config),
            store,
            clock,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AuthResult<AuthOutcome> {
        let AuthenticateInput {
            identifier,
            password,
        } = input;
        let password = ClearTextPassword::new(password);

        self.run(&identifier, &password)
            .await
            .inspect_err(|e| {
                tracing::info!(identifier = %fingerprint(&identifier), "Authentication failed");
                e.log();
            })
    }

    async fn run(&self, identifier: &str, password: &ClearTextPassword) -> AuthResult<AuthOutcome> {
        let tenant = self.tenants.resolve().await?;

        let identity = match self.resolve_identity(tenant.company_id, identifier).await? {
            ResolvedIdentity::Single(identity) => identity,
            ResolvedIdentity::Ambiguous(registrations) => {
                tracing::info!(
                    identifier = %fingerprint(identifier),
                    count = registrations.len(),
                    "Document matches several registrations"
                );
                return Ok(AuthOutcome::MultipleRegistrations {
                    registrations: registrations.iter().map(RegistrationSummary::from).collect(),
                });
            }
        };

        if identity.is_locked() {
            return Err(AuthError::AccountLocked);
        }
        if identity.stored_secret().is_none() {
            return Err(AuthError::EmptyPassword);
        }

        let stored = decrypt_stored(self.store.as_ref(), &identity).await?;
        if !stored.matches_trimmed(password.expose()) {
            return Err(AuthError::InvalidCredentials);
        }

        if identity.temporary_password
            || self
                .policy
                .expiry_check(identity.identity_id, tenant.company_id)
                .await?
        {
            tracing::info!(
                identity_id = %identity.identity_id,
                temporary = identity.temporary_password,
                "Password change required"
            );
            return Ok(AuthOutcome::MustChangePassword { identity });
        }

        self.audit.record_login(&identity, self.clock.now()).await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            company_id = %tenant.company_id,
            "Identity authenticated"
        );

        Ok(AuthOutcome::Authenticated { identity })
    }

    /// User name first, then the document's registrations
    async fn resolve_identity(
        &self,
        company_id: CompanyId,
        identifier: &str,
    ) -> AuthResult<ResolvedIdentity> {
        if let Ok(user_name) = UserName::new(identifier) {
            if let Some(identity) = self.store.find_identity_by_username(&user_name).await? {
                return Ok(ResolvedIdentity::Single(identity));
            }
        }

        let registrations = match DocumentNumber::parse(identifier) {
            Some(document) => {
                self.store
                    .find_registrations_by_document(company_id, &document)
                    .await?
            }
            None => Vec::new(),
        };

        match registrations.as_slice() {
            [] => Err(AuthError::InvalidCredentials),
            [only] => {
                let user_name = UserName::from_db(&only.code);
                self.store
                    .find_identity_by_username(&user_name)
                    .await?
                    .map(ResolvedIdentity::Single)
                    .ok_or(AuthError::InvalidCredentials)
            }
            _ => Ok(ResolvedIdentity::Ambiguous(registrations)),
        }
    }
}
