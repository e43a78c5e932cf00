// ABOUTME: Library root for studyclaw — local persistence tools for a study-planning agent.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod config;
pub mod session;
pub mod tools;
