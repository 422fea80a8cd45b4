//! Integration-style tests for the bridge core.

pub mod harness;
