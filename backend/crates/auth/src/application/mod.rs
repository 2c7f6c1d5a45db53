//! Application Layer
//!
//! Use cases and application services.

pub mod audit;
pub mod authenticate;
pub mod change_password;
pub mod config;
pub mod credential;
pub mod password_policy;
pub mod tenant_resolver;

// Re-exports
pub use audit::AuditRecorder;
pub use authenticate::{AuthOutcome, AuthenticateInput, AuthenticateUseCase};
pub use change_password::{ChangePasswordInput, ChangePasswordOutput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use password_policy::PasswordPolicyEvaluator;
pub use tenant_resolver::TenantResolver;
