//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — generative models the consultant can run on
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — preview helpers for log lines

pub mod error;
pub mod model;
pub mod string;
