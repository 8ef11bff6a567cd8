//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, constant-time comparison)
//! - Password hashing (Argon2id, salted, constant-time verification)
//! - Outbound email transport (SMTP via lettre)

pub mod crypto;
pub mod mailer;
pub mod password;
