//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat_client;
pub mod session_controller;

#[cfg(test)]
pub(crate) mod test_support;
