//! Tenant Context
//!
//! The (company group, company) pair every credential operation is scoped to.

use crate::domain::value_object::tenant_id::{CompanyGroupId, CompanyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub group_id: CompanyGroupId,
    pub company_id: CompanyId,
}
