//! Provider specific [`ClientWrapper`](crate::client_wrapper::ClientWrapper) implementations.
//!
//! Both providers are reached through OpenAI-compatible chat endpoints and share one
//! pooled HTTP client (see [`common`]).

pub mod common;

pub mod gemini;
pub mod openai;
