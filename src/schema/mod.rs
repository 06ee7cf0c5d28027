//! Typed records produced from, and fed into, text model exchanges.

pub mod backstory;
pub mod character;
pub mod outcome;
pub mod relationship;
pub mod scenario;
pub mod stats;
