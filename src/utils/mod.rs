//! Shared helpers.

pub mod code_generator;
