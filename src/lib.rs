// ABOUTME: Library root for chatlog — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
