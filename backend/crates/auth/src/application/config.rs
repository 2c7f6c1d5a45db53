//! Application Configuration
//!
//! Configuration for the Auth application layer.

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expiration policy value meaning "never expires"
    pub never_expires_days: i32,
    /// Reason stored on login occurrences
    pub login_reason: String,
    /// Reason stored on password-change occurrences
    pub password_change_reason: String,
    /// Related code stored on password-change occurrences
    pub password_change_related_code: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            never_expires_days: 999,
            login_reason: "ACESSO SIS".to_string(),
            password_change_reason: "TROCA_SENHA".to_string(),
            password_change_related_code: "[...]".to_string(),
        }
    }
}

impl AuthConfig {
    /// Whether an expiration policy value disables expiry
    pub fn is_never_expires(&self, days: i32) -> bool {
        days == 0 || days == self.never_expires_days
    }
}
