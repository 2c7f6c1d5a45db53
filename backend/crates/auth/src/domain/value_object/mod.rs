//! Value Object Module

pub mod document_number;
pub mod email;
pub mod encrypted_secret;
pub mod identity_id;
pub mod occurrence_type;
pub mod policy_type;
pub mod tenant_id;
pub mod transform_direction;
pub mod user_name;
pub mod user_status;
