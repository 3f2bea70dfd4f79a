//! Credentials: hashing capability and the username → password-hash document.

pub mod domain;
pub mod hasher;
pub mod service;

pub use hasher::{Argon2Hasher, SecretHasher};
pub use service::CredentialStore;
