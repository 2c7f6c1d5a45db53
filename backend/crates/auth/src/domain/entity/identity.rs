//! Identity Entity
//!
//! A login-capable credential record. Created and mutated only through the
//! credential store; the pipelines read it and, on password change, hand the
//! store a new secret.

use chrono::NaiveDateTime;

use crate::domain::value_object::{
    email::Email, encrypted_secret::EncryptedSecret, identity_id::IdentityId,
    user_name::UserName, user_status::UserStatus,
};

/// Identity entity
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable numeric key
    pub identity_id: IdentityId,
    /// Unique, case-insensitive login handle
    pub user_name: UserName,
    /// Unique, case-insensitive email
    pub email: Option<Email>,
    pub full_name: Option<String>,
    /// Reversibly encrypted password
    pub secret: Option<EncryptedSecret>,
    /// Password was issued by an operator and must be replaced at next login
    pub temporary_password: bool,
    pub locked: bool,
    /// Account creation time; also the context of the reversible transform
    pub registered_at: Option<NaiveDateTime>,
    pub status: UserStatus,
}

impl Identity {
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Stored secret, unless it is missing or blank
    pub fn stored_secret(&self) -> Option<&EncryptedSecret> {
        self.secret.as_ref().filter(|s| !s.is_empty())
    }

    /// Context the credential cipher needs to transform this identity's secret
    pub fn transform_context(&self) -> Option<NaiveDateTime> {
        self.registered_at
    }

    /// Replace the secret after a committed change
    pub fn apply_new_secret(&mut self, secret: EncryptedSecret) {
        self.secret = Some(secret);
        self.temporary_password = false;
    }
}

/// Data needed to create an identity; the store assigns the key
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub user_name: UserName,
    pub email: Option<Email>,
    pub full_name: Option<String>,
    pub secret: Option<EncryptedSecret>,
    pub temporary_password: bool,
    pub registered_at: NaiveDateTime,
}

impl NewIdentity {
    pub fn into_identity(self, identity_id: IdentityId) -> Identity {
        Identity {
            identity_id,
            user_name: self.user_name,
            email: self.email,
            full_name: self.full_name,
            secret: self.secret,
            temporary_password: self.temporary_password,
            locked: false,
            registered_at: Some(self.registered_at),
            status: UserStatus::Active,
        }
    }
}
