//! # Quill Core
//!
//! The domain layer of the Quill blog platform.
//! Entities, ports and the services that orchestrate them. No infrastructure
//! dependencies live here; storage, hashing and mail are reached through ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
