//! Backend-independent types, errors, and the provider trait

pub mod error;
pub mod provider;
pub mod types;
