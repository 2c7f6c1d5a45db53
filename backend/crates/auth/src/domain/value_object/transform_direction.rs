use derive_more::Display;

/// Direction of the reversible credential transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TransformDirection {
    #[display("E")]
    Encrypt,
    #[display("D")]
    Decrypt,
}

impl TransformDirection {
    /// Single-character code understood by the store's transform routine
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Encrypt => "E",
            Self::Decrypt => "D",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(TransformDirection::Encrypt.code(), "E");
        assert_eq!(TransformDirection::Decrypt.to_string(), "D");
    }
}
