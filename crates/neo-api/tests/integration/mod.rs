//! Integration test modules.

pub mod approach_tests;
pub mod common;
pub mod database_tests;
pub mod health_tests;
pub mod report_tests;
pub mod testcontainers_support;
