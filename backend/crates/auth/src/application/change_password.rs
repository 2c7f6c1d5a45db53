//! Change Password Use Case
//!
//! Verifies the current password, validates the new one against the tenant
//! policy and commits it to every identity of the same person in one batch.

use std::collections::HashSet;
use std::sync::Arc;

use platform::clock::Clock;
use platform::crypto::constant_time_eq;
use platform::password::ClearTextPassword;
use serde::Serialize;

use crate::application::config::AuthConfig;
use crate::application::credential::{decrypt_stored, encrypt_for};
use crate::application::password_policy::PasswordPolicyEvaluator;
use crate::application::tenant_resolver::TenantResolver;
use crate::domain::entity::{
    identity::Identity,
    password_change::{PasswordChange, PasswordChangeBatch},
};
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    identity_id::IdentityId, tenant_id::CompanyId, user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub identity_id: IdentityId,
    /// Registration code the change was started from, if any
    pub registration: Option<String>,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Change password output
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordOutput {
    pub is_success: bool,
}

/// Change password use case
pub struct ChangePasswordUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    tenants: TenantResolver<S>,
    policy: PasswordPolicyEvaluator<S, S>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl<S> ChangePasswordUseCase<S>
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
            store,
            clock,
            config,
        }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> AuthResult<ChangePasswordOutput> {
        let identity_id = input.identity_id;
        self.run(input).await.inspect_err(|e| {
            tracing::info!(identity_id = %identity_id, "Password change failed");
            e.log();
        })
    }

    async fn run(&self, input: ChangePasswordInput) -> AuthResult<ChangePasswordOutput> {
        let ChangePasswordInput {
            identity_id,
            registration,
            current_password,
            new_password,
            confirm_password,
        } = input;
        let current_password = ClearTextPassword::new(current_password);
        let new_password = ClearTextPassword::new(new_password);
        let confirm_password = ClearTextPassword::new(confirm_password);

        let identity = self
            .store
            .find_identity_by_id(identity_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let stored = decrypt_stored(self.store.as_ref(), &identity).await?;
        if !stored.matches_trimmed(current_password.expose()) {
            return Err(AuthError::InvalidCurrentPassword);
        }
        if stored.matches_trimmed(new_password.expose()) {
            return Err(AuthError::PasswordUnchanged);
        }
        if !constant_time_eq(
            new_password.expose().as_bytes(),
            confirm_password.expose().as_bytes(),
        ) {
            return Err(AuthError::PasswordConfirmationMismatch);
        }

        let tenant = self.tenants.resolve().await?;

        self.policy
            .validate_composition(&new_password, tenant.company_id)
            .await?;

        let targets = self
            .collect_targets(tenant.company_id, identity, registration.as_deref())
            .await?;

        let mut changes = Vec::with_capacity(targets.len());
        for target in &targets {
            let new_secret = encrypt_for(self.store.as_ref(), target, &new_password).await?;
            changes.push(PasswordChange {
                identity_id: target.identity_id,
                user_name: target.user_name.clone(),
                new_secret,
            });
        }

        let batch = PasswordChangeBatch {
            changes,
            changed_at: self.clock.now(),
            reason: self.config.password_change_reason.clone(),
            related_code: self.config.password_change_related_code.clone(),
        };

        match self.store.commit_password_change(&batch).await {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::Commit),
            Err(e) => {
                tracing::error!(error = %e, identity_id = %identity_id, "Password change commit failed");
                return Err(AuthError::Commit);
            }
        }

        tracing::info!(
            identity_id = %identity_id,
            company_id = %tenant.company_id,
            identities = batch.changes.len(),
            "Password changed"
        );

        Ok(ChangePasswordOutput { is_success: true })
    }

    /// The loaded identity plus every identity of the same person
    ///
    /// Siblings are found through the given registration code, or the
    /// identity's own user name when none is given. A code whose person does
    /// not own the loaded identity contributes nothing.
    async fn collect_targets(
        &self,
        company_id: CompanyId,
        identity: Identity,
        registration: Option<&str>,
    ) -> AuthResult<Vec<Identity>> {
        let code = registration
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(identity.user_name.as_str())
            .to_string();

        let sibling_names: Vec<UserName> = self
            .store
            .find_sibling_registration_codes(company_id, &code)
            .await?
            .iter()
            .map(UserName::from_db)
            .collect();

        if !sibling_names.is_empty() && !sibling_names.contains(&identity.user_name) {
            tracing::warn!(
                identity_id = %identity.identity_id,
                "Registration does not belong to this identity, siblings ignored"
            );
            return Ok(vec![identity]);
        }

        let siblings = if sibling_names.is_empty() {
            Vec::new()
        } else {
            self.store
                .find_identities_by_usernames(&sibling_names)
                .await?
        };

        let mut seen = HashSet::from([identity.identity_id]);
        let mut targets = vec![identity];
        for sibling in siblings {
            if seen.insert(sibling.identity_id) {
                targets.push(sibling);
            }
        }
        Ok(targets)
    }
}
