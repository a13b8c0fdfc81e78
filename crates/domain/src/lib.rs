//! Domain layer for the ToDo API backend.
//!
//! This crate contains:
//! - Domain models (ToDoEntry, Principal, Role)
//! - The entry store contract and an in-memory implementation
//! - The approval workflow that governs entry status transitions

pub mod models;
pub mod services;
