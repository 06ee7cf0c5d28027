//! Life Sim Engine: typed scenarios, outcomes and backstories from a text model.
//!
//! A generative text model answers in loosely tagged text. This crate asks
//! it for content, pulls the tagged fields out, validates them into typed
//! records, and retries a bounded number of times when the text is
//! unusable or the model can't be reached.

pub mod core;
pub mod schema;
