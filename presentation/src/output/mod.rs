//! Terminal output: static formatting and the streaming message renderer.

pub mod console;
pub mod stream;
