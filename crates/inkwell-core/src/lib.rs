//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the post listing query composer, ports and application services.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use error::{DomainError, FieldError, RepoError, Violations};
