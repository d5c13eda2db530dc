//! Property test modules

mod flatten_tests;
mod validate_tests;
