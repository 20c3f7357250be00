//! Cross-cutting pieces: errors, logging, shared type aliases

pub mod error;
pub mod logging;
pub mod types;
