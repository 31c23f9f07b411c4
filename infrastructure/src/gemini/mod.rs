//! Gemini adapter
//!
//! Talks to the Generative Language REST API with
//! `streamGenerateContent?alt=sse`. The API is stateless, so each
//! [`GeminiSession`](session::GeminiSession) keeps its own turn history and
//! replays it on every request.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;
pub mod sse;
