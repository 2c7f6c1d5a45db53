use kernel::id::{Id, markers};

pub type CompanyGroupId = Id<markers::CompanyGroup>;

/// The company all policy and registration lookups are scoped to
pub type CompanyId = Id<markers::Company>;
