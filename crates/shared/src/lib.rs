//! Shared utilities for the ToDo API backend.
//!
//! This crate provides functionality used across the other crates:
//! - JWT issuance and validation
//! - Password hashing with Argon2id
//! - Hashing helpers for refresh-token bookkeeping
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
