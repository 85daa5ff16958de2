pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod services;
pub mod types;
pub mod validate;

pub use error::{AdminError, AdminResult};
pub use validate::{is_valid_uuid, is_valid_uuid_str, sanitize_uuid, sanitize_uuid_opt, sanitize_uuid_str};

#[cfg(test)]
pub mod testing;
