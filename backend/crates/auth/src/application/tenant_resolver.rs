//! Policy Resolver
//!
//! Resolves the (main company group, main company) pair every credential
//! operation runs under. Both flags must be set; nothing is guessed.

use std::sync::Arc;

use crate::domain::entity::tenant::TenantContext;
use crate::domain::repository::TenantRepository;
use crate::error::{AuthError, AuthResult};

pub struct TenantResolver<T>
where
    T: TenantRepository,
{
    repo: Arc<T>,
}

impl<T> TenantResolver<T>
where
    T: TenantRepository,
{
    pub fn new(repo: Arc<T>) -> Self {
        Self { repo }
    }

    pub async fn resolve(&self) -> AuthResult<TenantContext> {
        let group_id = self
            .repo
            .find_main_company_group()
            .await?
            .ok_or(AuthError::TenantNotConfigured)?;

        let company_id = self
            .repo
            .find_main_company(group_id)
            .await?
            .ok_or(AuthError::PrimaryCompanyNotConfigured)?;

        tracing::debug!(group_id = %group_id, company_id = %company_id, "Tenant resolved");

        Ok(TenantContext {
            group_id,
            company_id,
        })
    }
}
