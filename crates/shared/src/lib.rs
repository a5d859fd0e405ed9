//! Shared utilities for the Qyra queue backend.
//!
//! This crate provides primitives used by more than one crate:
//! - Random code generation for ticket tokens
//! - Admin password hashing with Argon2id
//! - JWT issuing and validation for the admin gate
//! - Reusable validation rules

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
