//! Concrete [`ClientWrapper`](crate::client_wrapper::ClientWrapper) transports.
//!
//! Both talk to the Google generative-language API; they differ only in endpoint and wire
//! format, so an [`Agent`](crate::Agent) works the same on top of either.

pub mod common;
pub mod http_pool;

pub mod gemini;
pub mod text;
