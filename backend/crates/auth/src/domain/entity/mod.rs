//! Entity Module

pub mod identity;
pub mod occurrence;
pub mod password_change;
pub mod registration;
pub mod tenant;
