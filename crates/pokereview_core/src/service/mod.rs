//! Use-case services on top of the catalog repositories.
//!
//! # Responsibility
//! - Apply caller-side policy the repositories leave open: duplicate-name
//!   rejection, foreign-id existence checks, multi-call orchestration.
//! - Turn zero-row mutation outcomes into typed service errors.

pub mod catalog_service;
