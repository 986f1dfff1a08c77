// src/mistry/mod.rs

pub mod chat_session;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod math;
#[cfg(feature = "server")]
pub mod server;

// Let's explicitly export ChatSession so we don't have to access it via mistry::chat_session::ChatSession
// and instead as mistry::ChatSession
pub use chat_session::ChatSession;
