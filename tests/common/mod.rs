//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - Database fixtures (in-memory and file-backed SQLite)
//! - A recording notifier standing in for SMTP
//! - Test application builder and request helpers
//! - Authentication helpers

#![allow(dead_code)]

pub mod app;
pub mod auth_helpers;
pub mod database;
pub mod notifier;

pub use app::*;
pub use auth_helpers::*;
pub use database::*;
pub use notifier::*;
