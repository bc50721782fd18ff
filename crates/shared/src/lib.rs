pub mod domain;
pub mod error;
pub mod protocol;
pub mod time;

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod domain_tests;
