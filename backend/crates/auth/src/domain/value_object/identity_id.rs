use kernel::id::{Id, markers};

/// Numeric key of a credential-bearing identity
pub type IdentityId = Id<markers::Identity>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_from_db() {
        let id = IdentityId::from_db(1207);
        assert_eq!(id.value(), 1207);
        assert_eq!(id.to_string(), "1207");
    }

    #[test]
    fn test_identity_id_rejects_zero() {
        assert!(IdentityId::new(0).is_err());
    }
}
