//! Credential transform helpers shared by both pipelines

use chrono::NaiveDateTime;
use platform::password::ClearTextPassword;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::CredentialCipher;
use crate::domain::value_object::{
    encrypted_secret::EncryptedSecret, transform_direction::TransformDirection,
};
use crate::error::{AuthError, AuthResult};

/// Recover the clear-text password stored for `identity`
///
/// A missing secret or creation timestamp is [`AuthError::EmptyPassword`];
/// a failing transform is [`AuthError::CredentialTransform`].
pub async fn decrypt_stored<C>(cipher: &C, identity: &Identity) -> AuthResult<ClearTextPassword>
where
    C: CredentialCipher,
{
    let secret = identity.stored_secret().ok_or(AuthError::EmptyPassword)?;
    let context = identity
        .transform_context()
        .ok_or(AuthError::EmptyPassword)?;

    run_transform(
        cipher,
        secret.as_str(),
        &context,
        TransformDirection::Decrypt,
        identity,
    )
    .await
    .map(ClearTextPassword::new)
}

/// Encrypt `password` with the given identity's own context
pub async fn encrypt_for<C>(
    cipher: &C,
    identity: &Identity,
    password: &ClearTextPassword,
) -> AuthResult<EncryptedSecret>
where
    C: CredentialCipher,
{
    let context = identity.transform_context().ok_or_else(|| {
        AuthError::CredentialTransform(format!(
            "identity {} has no creation timestamp",
            identity.identity_id
        ))
    })?;

    run_transform(
        cipher,
        password.expose(),
        &context,
        TransformDirection::Encrypt,
        identity,
    )
    .await
    .map(EncryptedSecret::from_db)
}

async fn run_transform<C>(
    cipher: &C,
    input: &str,
    context: &NaiveDateTime,
    direction: TransformDirection,
    identity: &Identity,
) -> AuthResult<String>
where
    C: CredentialCipher,
{
    match cipher.transform(input, context, direction).await {
        Ok(Some(output)) => Ok(output),
        Ok(None) => Err(AuthError::CredentialTransform(format!(
            "transform {direction} returned nothing for identity {}",
            identity.identity_id
        ))),
        Err(AuthError::CredentialTransform(msg)) => Err(AuthError::CredentialTransform(msg)),
        Err(e) => Err(AuthError::CredentialTransform(format!(
            "transform {direction} failed for identity {}: {e}",
            identity.identity_id
        ))),
    }
}
