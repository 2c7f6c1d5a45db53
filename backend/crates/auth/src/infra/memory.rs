//! In-memory credential store using a Tokio mutex.
//!
//! Backs every repository trait for single-process use and for tests. The
//! reversible transform XORs the input with a SHA-256 keystream derived from
//! the context timestamp and encodes the result as base64.
//!
//! Failure switches let callers simulate an infrastructure that refuses to
//! transform, to store occurrences or to commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDateTime, Utc};
use platform::crypto::sha256;
use tokio::sync::Mutex;

use crate::domain::entity::{
    identity::{Identity, NewIdentity},
    occurrence::Occurrence,
    password_change::{PasswordChangeBatch, PasswordHistoryEntry},
    registration::Registration,
};
use crate::domain::repository::{
    CredentialCipher, IdentityRepository, OccurrenceRepository, PasswordHistoryRepository,
    RegistrationRepository, SecurityPolicyRepository, TenantRepository,
};
use crate::domain::value_object::{
    document_number::DocumentNumber,
    email::Email,
    encrypted_secret::EncryptedSecret,
    identity_id::IdentityId,
    policy_type::PolicyType,
    tenant_id::{CompanyGroupId, CompanyId},
    transform_direction::TransformDirection,
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
struct InnerState {
    main_group: Option<CompanyGroupId>,
    main_companies: HashMap<CompanyGroupId, CompanyId>,
    identities: BTreeMap<IdentityId, Identity>,
    last_identity_id: i64,
    /// Registrations with the document of the person behind them
    registrations: Vec<(Registration, DocumentNumber)>,
    policies: HashMap<(CompanyId, PolicyType), i32>,
    history: Vec<PasswordHistoryEntry>,
    occurrences: Vec<Occurrence>,
    fail_transform: bool,
    drop_occurrences: bool,
    reject_commit: bool,
    transform_calls: usize,
}

/// In-memory credential store
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encrypt `plain` the way [`CredentialCipher::transform`] does
    pub fn seal(plain: &str, context: &NaiveDateTime) -> EncryptedSecret {
        EncryptedSecret::from_db(STANDARD.encode(xor_keystream(plain.as_bytes(), context)))
    }

    fn open(secret: &str, context: &NaiveDateTime) -> Option<String> {
        let bytes = STANDARD.decode(secret.trim()).ok()?;
        String::from_utf8(xor_keystream(&bytes, context)).ok()
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Flag `group_id` as the main group and `company_id` as its main company
    pub async fn set_main_tenant(&self, group_id: CompanyGroupId, company_id: CompanyId) {
        let mut state = self.state.lock().await;
        state.main_group = Some(group_id);
        state.main_companies.insert(group_id, company_id);
    }

    pub async fn set_main_group(&self, group_id: Option<CompanyGroupId>) {
        self.state.lock().await.main_group = group_id;
    }

    pub async fn clear_main_company(&self, group_id: CompanyGroupId) {
        self.state.lock().await.main_companies.remove(&group_id);
    }

    pub async fn insert_registration(&self, registration: Registration, document: DocumentNumber) {
        self.state
            .lock()
            .await
            .registrations
            .push((registration, document));
    }

    pub async fn set_policy(&self, company_id: CompanyId, policy_type: PolicyType, value: i32) {
        self.state
            .lock()
            .await
            .policies
            .insert((company_id, policy_type), value);
    }

    // ========================================================================
    // Failure switches
    // ========================================================================

    /// Make every transform fail
    pub async fn fail_transform(&self, fail: bool) {
        self.state.lock().await.fail_transform = fail;
    }

    /// Make occurrence appends store nothing
    pub async fn drop_occurrences(&self, drop: bool) {
        self.state.lock().await.drop_occurrences = drop;
    }

    /// Make password change commits report failure
    pub async fn reject_commit(&self, reject: bool) {
        self.state.lock().await.reject_commit = reject;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub async fn occurrences(&self) -> Vec<Occurrence> {
        self.state.lock().await.occurrences.clone()
    }

    pub async fn history(&self) -> Vec<PasswordHistoryEntry> {
        self.state.lock().await.history.clone()
    }

    pub async fn identity(&self, identity_id: IdentityId) -> Option<Identity> {
        self.state.lock().await.identities.get(&identity_id).cloned()
    }

    /// Number of transforms requested so far
    pub async fn transform_calls(&self) -> usize {
        self.state.lock().await.transform_calls
    }
}

fn xor_keystream(input: &[u8], context: &NaiveDateTime) -> Vec<u8> {
    let key = sha256(context.format("%Y-%m-%d %H:%M:%S%.f").to_string().as_bytes());
    input
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}

// ============================================================================
// Repository implementations
// ============================================================================

impl TenantRepository for MemoryAuthStore {
    async fn find_main_company_group(&self) -> AuthResult<Option<CompanyGroupId>> {
        Ok(self.state.lock().await.main_group)
    }

    async fn find_main_company(&self, group_id: CompanyGroupId) -> AuthResult<Option<CompanyId>> {
        Ok(self
            .state
            .lock()
            .await
            .main_companies
            .get(&group_id)
            .copied())
    }
}

impl IdentityRepository for MemoryAuthStore {
    async fn create_identity(&self, identity: &NewIdentity) -> AuthResult<Identity> {
        let mut state = self.state.lock().await;

        if state
            .identities
            .values()
            .any(|i| i.user_name == identity.user_name)
        {
            return Err(AuthError::Internal(format!(
                "User name already exists: {}",
                identity.user_name
            )));
        }
        if let Some(email) = &identity.email {
            if state.identities.values().any(|i| i.email.as_ref() == Some(email)) {
                return Err(AuthError::Internal("Email already exists".to_string()));
            }
        }

        state.last_identity_id += 1;
        let identity_id = IdentityId::from_db(state.last_identity_id);
        let created = identity.clone().into_identity(identity_id);
        state.identities.insert(identity_id, created.clone());

        Ok(created)
    }

    async fn update_identity(&self, identity: &Identity) -> AuthResult<()> {
        let mut state = self.state.lock().await;
        match state.identities.get_mut(&identity.identity_id) {
            Some(stored) => {
                *stored = identity.clone();
                Ok(())
            }
            None => Err(AuthError::Internal(format!(
                "Identity not found: {}",
                identity.identity_id
            ))),
        }
    }

    async fn find_identity_by_id(&self, identity_id: IdentityId) -> AuthResult<Option<Identity>> {
        Ok(self.identity(identity_id).await)
    }

    async fn find_identity_by_username(
        &self,
        user_name: &UserName,
    ) -> AuthResult<Option<Identity>> {
        let state = self.state.lock().await;
        Ok(state
            .identities
            .values()
            .find(|i| &i.user_name == user_name)
            .cloned())
    }

    async fn find_identity_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let state = self.state.lock().await;
        Ok(state
            .identities
            .values()
            .find(|i| i.email.as_ref() == Some(email))
            .cloned())
    }

    async fn find_identities_by_usernames(
        &self,
        user_names: &[UserName],
    ) -> AuthResult<Vec<Identity>> {
        let state = self.state.lock().await;
        Ok(state
            .identities
            .values()
            .filter(|i| user_names.contains(&i.user_name))
            .cloned()
            .collect())
    }

    async fn commit_password_change(&self, batch: &PasswordChangeBatch) -> AuthResult<bool> {
        let mut state = self.state.lock().await;

        if state.reject_commit
            || batch
                .identity_ids()
                .any(|id| !state.identities.contains_key(&id))
        {
            return Ok(false);
        }

        for change in &batch.changes {
            if let Some(identity) = state.identities.get_mut(&change.identity_id) {
                identity.apply_new_secret(change.new_secret.clone());
            }
        }
        state.history.extend(batch.history_entries());
        state.occurrences.extend(batch.occurrences());

        Ok(true)
    }
}

impl CredentialCipher for MemoryAuthStore {
    async fn transform(
        &self,
        input: &str,
        context: &NaiveDateTime,
        direction: TransformDirection,
    ) -> AuthResult<Option<String>> {
        let mut state = self.state.lock().await;
        state.transform_calls += 1;

        if state.fail_transform {
            return Err(AuthError::CredentialTransform(format!(
                "transform {direction} unavailable"
            )));
        }

        Ok(match direction {
            TransformDirection::Encrypt => {
                Some(Self::seal(input, context).as_str().to_string())
            }
            TransformDirection::Decrypt => Self::open(input, context),
        })
    }
}

impl RegistrationRepository for MemoryAuthStore {
    async fn find_registrations_by_document(
        &self,
        company_id: CompanyId,
        document: &DocumentNumber,
    ) -> AuthResult<Vec<Registration>> {
        let state = self.state.lock().await;
        Ok(state
            .registrations
            .iter()
            .filter(|(r, doc)| r.company_id == company_id && r.active && doc == document)
            .map(|(r, _)| r.clone())
            .collect())
    }

    async fn find_sibling_registration_codes(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> AuthResult<Vec<String>> {
        let state = self.state.lock().await;
        let code = code.trim();

        let Some(person) = state
            .registrations
            .iter()
            .find(|(r, _)| r.company_id == company_id && r.code.trim() == code)
            .map(|(r, _)| r.person)
        else {
            return Ok(Vec::new());
        };

        Ok(state
            .registrations
            .iter()
            .filter(|(r, _)| r.company_id == company_id && r.person == person)
            .map(|(r, _)| r.code.trim().to_string())
            .collect())
    }
}

impl SecurityPolicyRepository for MemoryAuthStore {
    async fn find_policy_value(
        &self,
        company_id: CompanyId,
        policy_type: PolicyType,
    ) -> AuthResult<Option<i32>> {
        Ok(self
            .state
            .lock()
            .await
            .policies
            .get(&(company_id, policy_type))
            .copied())
    }
}

impl PasswordHistoryRepository for MemoryAuthStore {
    async fn find_last_password_change(
        &self,
        identity_id: IdentityId,
    ) -> AuthResult<Option<DateTime<Utc>>> {
        let state = self.state.lock().await;
        Ok(state
            .history
            .iter()
            .filter(|entry| entry.identity_id == identity_id)
            .map(|entry| entry.changed_at)
            .max())
    }

    async fn append_password_history(&self, entry: &PasswordHistoryEntry) -> AuthResult<()> {
        self.state.lock().await.history.push(entry.clone());
        Ok(())
    }
}

impl OccurrenceRepository for MemoryAuthStore {
    async fn append_occurrence(&self, occurrence: &Occurrence) -> AuthResult<Option<Occurrence>> {
        let mut state = self.state.lock().await;
        if state.drop_occurrences {
            return Ok(None);
        }
        state.occurrences.push(occurrence.clone());
        Ok(Some(occurrence.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn context() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 8, 15)
            .unwrap()
            .and_hms_opt(14, 2, 9)
            .unwrap()
    }

    #[tokio::test]
    async fn test_transform_is_reversible() {
        let store = MemoryAuthStore::new();
        let sealed = store
            .transform("123456", &context(), TransformDirection::Encrypt)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(sealed, "123456");

        let opened = store
            .transform(&sealed, &context(), TransformDirection::Decrypt)
            .await
            .unwrap();
        assert_eq!(opened.as_deref(), Some("123456"));
        assert_eq!(store.transform_calls().await, 2);
    }

    #[tokio::test]
    async fn test_context_changes_ciphertext() {
        let other = context() + chrono::Duration::seconds(1);
        assert_ne!(
            MemoryAuthStore::seal("123456", &context()),
            MemoryAuthStore::seal("123456", &other)
        );
    }

    #[tokio::test]
    async fn test_failing_transform() {
        let store = MemoryAuthStore::new();
        store.fail_transform(true).await;
        let result = store
            .transform("x", &context(), TransformDirection::Encrypt)
            .await;
        assert!(matches!(result, Err(AuthError::CredentialTransform(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_user_name() {
        let store = MemoryAuthStore::new();
        let new_identity = NewIdentity {
            user_name: UserName::new("student").unwrap(),
            email: Some(Email::new("student@example.com").unwrap()),
            full_name: None,
            secret: None,
            temporary_password: false,
            registered_at: context(),
        };
        let created = store.create_identity(&new_identity).await.unwrap();
        assert_eq!(created.identity_id.value(), 1);

        assert!(store.create_identity(&new_identity).await.is_err());

        let by_email = store
            .find_identity_by_email(&Email::new("STUDENT@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(by_email.map(|i| i.identity_id), Some(created.identity_id));
    }
}
