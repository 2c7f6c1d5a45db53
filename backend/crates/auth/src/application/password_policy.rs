//! Password Policy Evaluator
//!
//! Evaluates passwords against the tenant's security settings:
//! - expiration: has the current password aged past the configured window
//! - composition: minimum length, then the configured character-class rule

use std::sync::Arc;

use chrono::Duration;
use platform::clock::Clock;
use platform::password::{
    check_alphanumeric_only, check_digits_only, check_full_complexity, ClearTextPassword,
};

use crate::application::config::AuthConfig;
use crate::domain::repository::{PasswordHistoryRepository, SecurityPolicyRepository};
use crate::domain::value_object::{
    identity_id::IdentityId,
    policy_type::{CompositionRule, PolicyType},
    tenant_id::CompanyId,
};
use crate::error::{AuthError, AuthResult};

pub struct PasswordPolicyEvaluator<P, H>
where
    P: SecurityPolicyRepository,
    H: PasswordHistoryRepository,
{
    policy_repo: Arc<P>,
    history_repo: Arc<H>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl<P, H> PasswordPolicyEvaluator<P, H>
where
    P: SecurityPolicyRepository,
    H: PasswordHistoryRepository,
{
    pub fn new(
        policy_repo: Arc<P>,
        history_repo: Arc<H>,
        clock: Arc<dyn Clock>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            policy_repo,
            history_repo,
            clock,
            config,
        }
    }

    /// `true` when the identity's password must be treated as expired
    ///
    /// No policy, no history, or a never-expires value all mean `false`.
    pub async fn expiry_check(
        &self,
        identity_id: IdentityId,
        company_id: CompanyId,
    ) -> AuthResult<bool> {
        let Some(days) = self
            .policy_repo
            .find_policy_value(company_id, PolicyType::Expiration)
            .await?
        else {
            return Ok(false);
        };

        if self.config.is_never_expires(days) {
            return Ok(false);
        }

        let Some(last_change) = self
            .history_repo
            .find_last_password_change(identity_id)
            .await?
        else {
            return Ok(false);
        };

        let expired = last_change + Duration::days(i64::from(days)) < self.clock.now();
        if expired {
            tracing::debug!(
                identity_id = %identity_id,
                policy_days = days,
                last_change = %last_change,
                "Password expired"
            );
        }
        Ok(expired)
    }

    /// Check a candidate password against the length and composition settings
    ///
    /// Each check runs whenever its setting exists.
    pub async fn validate_composition(
        &self,
        password: &ClearTextPassword,
        company_id: CompanyId,
    ) -> AuthResult<()> {
        if let Some(min) = self
            .policy_repo
            .find_policy_value(company_id, PolicyType::Length)
            .await?
        {
            let min = usize::try_from(min).unwrap_or(0);
            if password.char_count() < min {
                return Err(AuthError::PasswordTooShort { min });
            }
        }

        let rule = self
            .policy_repo
            .find_policy_value(company_id, PolicyType::Composition)
            .await?
            .and_then(CompositionRule::from_code);

        check_composition(password.expose(), rule)
    }
}

fn check_composition(password: &str, rule: Option<CompositionRule>) -> AuthResult<()> {
    match rule {
        Some(CompositionRule::DigitsOnly) => {
            check_digits_only(password).map_err(|_| AuthError::DigitsOnlyViolation)
        }
        Some(CompositionRule::AlphanumericOnly) => {
            check_alphanumeric_only(password).map_err(|_| AuthError::SpecialCharacterNotAllowed)
        }
        Some(CompositionRule::FullComplexity) => {
            check_full_complexity(password).map_err(|_| AuthError::ComplexityViolation)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only_rule() {
        let rule = Some(CompositionRule::DigitsOnly);
        assert!(check_composition("123456", rule).is_ok());
        assert!(matches!(
            check_composition("12345a", rule),
            Err(AuthError::DigitsOnlyViolation)
        ));
    }

    #[test]
    fn test_alphanumeric_rule() {
        let rule = Some(CompositionRule::AlphanumericOnly);
        assert!(check_composition("password123", rule).is_ok());
        assert!(matches!(
            check_composition("p@ssword123", rule),
            Err(AuthError::SpecialCharacterNotAllowed)
        ));
    }

    #[test]
    fn test_full_complexity_requires_symbol() {
        let rule = Some(CompositionRule::FullComplexity);
        assert!(matches!(
            check_composition("password123", rule),
            Err(AuthError::ComplexityViolation)
        ));
        assert!(check_composition("password123!", rule).is_ok());
    }

    #[test]
    fn test_no_rule_accepts_anything() {
        assert!(check_composition("~~ anything ~~", None).is_ok());
    }
}
