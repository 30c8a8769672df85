//! Core types and trait definitions for the jot notes service.
//!
//! This crate is deliberately free of HTTP and database dependencies;
//! every other crate in the workspace depends on it.

pub mod action;
pub mod note;
pub mod store;
pub mod user;
