//! Extraction, validation and retry around the text model.

pub mod backstory;
pub mod config;
pub mod extract;
pub mod outcome;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod retry;
pub mod scenario;
pub mod stat_delta;
pub mod vocabulary;
