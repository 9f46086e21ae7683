//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - Helper builders for constructing use cases and app state over in-memory storage

mod app_state_builder;
mod factories;

pub use app_state_builder::*;
pub use factories::*;
