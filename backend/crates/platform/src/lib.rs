//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Clear-text password handling (zeroized, redacted, trimmed comparison)
//! - Character-class predicates for password composition rules
//! - Constant-time comparison and log-safe fingerprints
//! - An injectable wall clock

pub mod clock;
pub mod crypto;
pub mod password;
