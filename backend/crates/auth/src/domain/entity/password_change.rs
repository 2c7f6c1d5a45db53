//! Password Change Batch
//!
//! Everything one committed password change writes: for each affected
//! identity, the new secret, one history entry and one occurrence. The
//! store applies a batch atomically.

use chrono::{DateTime, Utc};

use crate::domain::entity::occurrence::Occurrence;
use crate::domain::value_object::{
    encrypted_secret::EncryptedSecret, identity_id::IdentityId,
    occurrence_type::OccurrenceType, user_name::UserName,
};

/// Append-only record of a password that was set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHistoryEntry {
    pub identity_id: IdentityId,
    pub secret: EncryptedSecret,
    pub changed_at: DateTime<Utc>,
}

/// New secret for one identity, already encrypted with that identity's context
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub identity_id: IdentityId,
    pub user_name: UserName,
    pub new_secret: EncryptedSecret,
}

#[derive(Debug, Clone)]
pub struct PasswordChangeBatch {
    pub changes: Vec<PasswordChange>,
    pub changed_at: DateTime<Utc>,
    pub reason: String,
    pub related_code: String,
}

impl PasswordChangeBatch {
    pub fn history_entries(&self) -> impl Iterator<Item = PasswordHistoryEntry> + '_ {
        self.changes.iter().map(|change| PasswordHistoryEntry {
            identity_id: change.identity_id,
            secret: change.new_secret.clone(),
            changed_at: self.changed_at,
        })
    }

    pub fn occurrences(&self) -> impl Iterator<Item = Occurrence> + '_ {
        self.changes.iter().map(|change| {
            Occurrence::new(
                change.user_name.as_str(),
                self.changed_at,
                OccurrenceType::PasswordChange,
                self.reason.as_str(),
            )
            .with_related_code(self.related_code.as_str())
        })
    }

    pub fn identity_ids(&self) -> impl Iterator<Item = IdentityId> + '_ {
        self.changes.iter().map(|change| change.identity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_one_history_row_and_occurrence_per_identity() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let batch = PasswordChangeBatch {
            changes: vec![
                PasswordChange {
                    identity_id: IdentityId::from_db(1),
                    user_name: UserName::from_db("2023001"),
                    new_secret: EncryptedSecret::from_db("aaa"),
                },
                PasswordChange {
                    identity_id: IdentityId::from_db(2),
                    user_name: UserName::from_db("2024007"),
                    new_secret: EncryptedSecret::from_db("bbb"),
                },
            ],
            changed_at: at,
            reason: "TROCA_SENHA".to_string(),
            related_code: "[...]".to_string(),
        };

        let history: Vec<_> = batch.history_entries().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].identity_id, IdentityId::from_db(2));
        assert_eq!(history[1].secret, EncryptedSecret::from_db("bbb"));
        assert_eq!(history[0].changed_at, at);

        let occurrences: Vec<_> = batch.occurrences().collect();
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].user_code, "2023001");
        assert_eq!(occurrences[0].occurrence_type, OccurrenceType::PasswordChange);
        assert_eq!(occurrences[0].related_code.as_deref(), Some("[...]"));
    }
}
