//! PostgreSQL Repository Implementations
//!
//! Tables read or written:
//! - `company_groups`, `company_group_companies`: tenant hierarchy with `is_main` flags
//! - `sec_users`: identities
//! - `registrations` joined with `participant_branches` (document) and `courses`
//! - `security_policies`: per-company integer settings keyed by policy type
//! - `password_history`, `user_occurrences`: append-only
//!
//! The reversible transform is the stored function
//! `u_snd_cripstr(text, timestamp without time zone, char)`.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::{
    identity::{Identity, NewIdentity},
    occurrence::Occurrence,
    password_change::{PasswordChangeBatch, PasswordHistoryEntry},
    registration::{PersonRef, Registration},
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
    user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

const IDENTITY_COLUMNS: &str = r#"
    user_id,
    user_name,
    email,
    full_name,
    password,
    temporary_password,
    locked,
    created_at,
    status
"#;

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_identity(&self, filter: &str, value: &str) -> AuthResult<Option<Identity>> {
        let sql = format!("SELECT {IDENTITY_COLUMNS} FROM sec_users WHERE {filter} = $1 LIMIT 1");
        let row = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_identity()).transpose()
    }
}

// ============================================================================
// Tenant Repository Implementation
// ============================================================================

impl TenantRepository for PgAuthRepository {
    async fn find_main_company_group(&self) -> AuthResult<Option<CompanyGroupId>> {
        let group_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT group_id
            FROM company_groups
            WHERE is_main AND is_active
            ORDER BY group_id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(group_id.map(CompanyGroupId::from_db))
    }

    async fn find_main_company(&self, group_id: CompanyGroupId) -> AuthResult<Option<CompanyId>> {
        let company_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT company_id
            FROM company_group_companies
            WHERE group_id = $1 AND is_main
            ORDER BY company_id
            LIMIT 1
            "#,
        )
        .bind(group_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(company_id.map(CompanyId::from_db))
    }
}

// ============================================================================
// Identity Repository Implementation
// ============================================================================

impl IdentityRepository for PgAuthRepository {
    async fn create_identity(&self, identity: &NewIdentity) -> AuthResult<Identity> {
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sec_users (
                user_name,
                email,
                full_name,
                password,
                temporary_password,
                locked,
                created_at,
                status
            ) VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING user_id
            "#,
        )
        .bind(identity.user_name.as_str())
        .bind(identity.email.as_ref().map(Email::as_str))
        .bind(identity.full_name.as_deref())
        .bind(identity.secret.as_ref().map(EncryptedSecret::as_str))
        .bind(identity.temporary_password)
        .bind(identity.registered_at)
        .bind(UserStatus::Active.code())
        .fetch_one(&self.pool)
        .await?;

        let identity_id = IdentityId::new(user_id)
            .map_err(|e| AuthError::Internal(format!("Invalid user_id: {}", e)))?;

        Ok(identity.clone().into_identity(identity_id))
    }

    async fn update_identity(&self, identity: &Identity) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE sec_users SET
                user_name = $2,
                email = $3,
                full_name = $4,
                password = $5,
                temporary_password = $6,
                locked = $7,
                status = $8
            WHERE user_id = $1
            "#,
        )
        .bind(identity.identity_id.value())
        .bind(identity.user_name.as_str())
        .bind(identity.email.as_ref().map(Email::as_str))
        .bind(identity.full_name.as_deref())
        .bind(identity.secret.as_ref().map(EncryptedSecret::as_str))
        .bind(identity.temporary_password)
        .bind(identity.locked)
        .bind(identity.status.code())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_identity_by_id(&self, identity_id: IdentityId) -> AuthResult<Option<Identity>> {
        let sql = format!("SELECT {IDENTITY_COLUMNS} FROM sec_users WHERE user_id = $1");
        let row = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(identity_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn find_identity_by_username(
        &self,
        user_name: &UserName,
    ) -> AuthResult<Option<Identity>> {
        self.fetch_identity("UPPER(TRIM(user_name))", user_name.as_str())
            .await
    }

    async fn find_identity_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        self.fetch_identity("UPPER(TRIM(email))", email.as_str()).await
    }

    async fn find_identities_by_usernames(
        &self,
        user_names: &[UserName],
    ) -> AuthResult<Vec<Identity>> {
        let names: Vec<&str> = user_names.iter().map(UserName::as_str).collect();
        let sql = format!(
            "SELECT {IDENTITY_COLUMNS} FROM sec_users WHERE UPPER(TRIM(user_name)) = ANY($1) ORDER BY user_id"
        );
        let rows = sqlx::query_as::<_, IdentityRow>(&sql)
            .bind(names)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_identity()).collect()
    }

    async fn commit_password_change(&self, batch: &PasswordChangeBatch) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        for change in &batch.changes {
            let updated = sqlx::query(
                r#"
                UPDATE sec_users SET
                    password = $2,
                    temporary_password = FALSE
                WHERE user_id = $1
                "#,
            )
            .bind(change.identity_id.value())
            .bind(change.new_secret.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 0 {
                tx.rollback().await?;
                tracing::warn!(
                    identity_id = %change.identity_id,
                    "Identity vanished during password change, batch rolled back"
                );
                return Ok(false);
            }
        }

        for entry in batch.history_entries() {
            sqlx::query(
                r#"
                INSERT INTO password_history (user_id, changed_at, secret)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(entry.identity_id.value())
            .bind(entry.changed_at)
            .bind(entry.secret.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for occurrence in batch.occurrences() {
            insert_occurrence(&mut tx, &occurrence).await?;
        }

        tx.commit().await?;

        Ok(true)
    }
}

// ============================================================================
// Credential Cipher Implementation
// ============================================================================

impl CredentialCipher for PgAuthRepository {
    async fn transform(
        &self,
        input: &str,
        context: &NaiveDateTime,
        direction: TransformDirection,
    ) -> AuthResult<Option<String>> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT u_snd_cripstr($1, $2::timestamp without time zone, $3::char)",
        )
        .bind(input)
        .bind(context)
        .bind(direction.code())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::CredentialTransform(format!("u_snd_cripstr {direction}: {e}")))
    }
}

// ============================================================================
// Registration Repository Implementation
// ============================================================================

impl RegistrationRepository for PgAuthRepository {
    async fn find_registrations_by_document(
        &self,
        company_id: CompanyId,
        document: &DocumentNumber,
    ) -> AuthResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT
                r.company_id,
                r.registration_code,
                c.course_name,
                r.participant_code,
                r.participant_branch_code,
                r.situation_active
            FROM registrations r
            JOIN participant_branches pb
                ON pb.participant_code = r.participant_code
               AND pb.branch_code = r.participant_branch_code
            LEFT JOIN courses c ON c.course_id = r.course_id
            WHERE r.company_id = $1
              AND r.situation_active
              AND regexp_replace(pb.document_number, '\D', '', 'g') = $2
            ORDER BY r.registration_code
            "#,
        )
        .bind(company_id.value())
        .bind(document.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_registration()).collect()
    }

    async fn find_sibling_registration_codes(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> AuthResult<Vec<String>> {
        let codes = sqlx::query_scalar::<_, String>(
            r#"
            SELECT TRIM(sibling.registration_code)
            FROM registrations origin
            JOIN registrations sibling
                ON sibling.participant_code = origin.participant_code
               AND sibling.participant_branch_code = origin.participant_branch_code
               AND sibling.company_id = origin.company_id
            WHERE origin.company_id = $1
              AND TRIM(origin.registration_code) = $2
            ORDER BY 1
            "#,
        )
        .bind(company_id.value())
        .bind(code.trim())
        .fetch_all(&self.pool)
        .await?;

        Ok(codes)
    }
}

// ============================================================================
// Security Policy Repository Implementation
// ============================================================================

impl SecurityPolicyRepository for PgAuthRepository {
    async fn find_policy_value(
        &self,
        company_id: CompanyId,
        policy_type: PolicyType,
    ) -> AuthResult<Option<i32>> {
        let value = sqlx::query_scalar::<_, Option<i32>>(
            r#"
            SELECT policy_value
            FROM security_policies
            WHERE company_id = $1 AND policy_type = $2
            LIMIT 1
            "#,
        )
        .bind(company_id.value())
        .bind(policy_type.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.flatten())
    }
}

// ============================================================================
// Password History Repository Implementation
// ============================================================================

impl PasswordHistoryRepository for PgAuthRepository {
    async fn find_last_password_change(
        &self,
        identity_id: IdentityId,
    ) -> AuthResult<Option<DateTime<Utc>>> {
        let last = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(changed_at) FROM password_history WHERE user_id = $1",
        )
        .bind(identity_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(last)
    }

    async fn append_password_history(&self, entry: &PasswordHistoryEntry) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO password_history (user_id, changed_at, secret)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.identity_id.value())
        .bind(entry.changed_at)
        .bind(entry.secret.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Occurrence Repository Implementation
// ============================================================================

impl OccurrenceRepository for PgAuthRepository {
    async fn append_occurrence(&self, occurrence: &Occurrence) -> AuthResult<Option<Occurrence>> {
        let row = sqlx::query_as::<_, OccurrenceRow>(
            r#"
            INSERT INTO user_occurrences (
                user_code,
                occurred_at,
                occurrence_type,
                reason,
                related_code
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING user_code, occurred_at, occurrence_type, reason, related_code
            "#,
        )
        .bind(&occurrence.user_code)
        .bind(occurrence.occurred_at)
        .bind(occurrence.occurrence_type.code())
        .bind(&occurrence.reason)
        .bind(occurrence.related_code.as_deref().unwrap_or_default())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_occurrence()).transpose()
    }
}

async fn insert_occurrence(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    occurrence: &Occurrence,
) -> AuthResult<()> {
    sqlx::query(
        r#"
        INSERT INTO user_occurrences (
            user_code,
            occurred_at,
            occurrence_type,
            reason,
            related_code
        ) VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&occurrence.user_code)
    .bind(occurrence.occurred_at)
    .bind(occurrence.occurrence_type.code())
    .bind(&occurrence.reason)
    .bind(occurrence.related_code.as_deref().unwrap_or_default())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    user_id: i64,
    user_name: String,
    email: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
    temporary_password: Option<bool>,
    locked: Option<bool>,
    created_at: Option<NaiveDateTime>,
    status: Option<String>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let identity_id = IdentityId::new(self.user_id)
            .map_err(|e| AuthError::Internal(format!("Invalid user_id: {}", e)))?;

        Ok(Identity {
            identity_id,
            user_name: UserName::from_db(&self.user_name),
            email: self
                .email
                .filter(|e| !e.trim().is_empty())
                .map(Email::from_db),
            full_name: self.full_name,
            secret: self.password.map(EncryptedSecret::from_db),
            temporary_password: self.temporary_password.unwrap_or(false),
            locked: self.locked.unwrap_or(false),
            registered_at: self.created_at,
            status: self
                .status
                .as_deref()
                .and_then(UserStatus::from_code)
                .unwrap_or_default(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    company_id: i64,
    registration_code: String,
    course_name: Option<String>,
    participant_code: i64,
    participant_branch_code: i64,
    situation_active: bool,
}

impl RegistrationRow {
    fn into_registration(self) -> AuthResult<Registration> {
        let company_id = CompanyId::new(self.company_id)
            .map_err(|e| AuthError::Internal(format!("Invalid company_id: {}", e)))?;

        Ok(Registration {
            company_id,
            code: self.registration_code.trim().to_string(),
            course_name: self.course_name.map(|name| name.trim().to_string()),
            person: PersonRef {
                participant_code: self.participant_code,
                branch_code: self.participant_branch_code,
            },
            active: self.situation_active,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OccurrenceRow {
    user_code: String,
    occurred_at: DateTime<Utc>,
    occurrence_type: String,
    reason: String,
    related_code: Option<String>,
}

impl OccurrenceRow {
    fn into_occurrence(self) -> AuthResult<Occurrence> {
        let occurrence_type = self
            .occurrence_type
            .parse()
            .map_err(|e| AuthError::Internal(format!("Invalid occurrence_type: {}", e)))?;

        Ok(Occurrence {
            user_code: self.user_code,
            occurred_at: self.occurred_at,
            occurrence_type,
            reason: self.reason,
            related_code: self.related_code.filter(|code| !code.is_empty()),
        })
    }
}
