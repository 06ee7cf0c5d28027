use serde::{Deserialize, Serialize};
use std::fmt;

/// How a character feels about someone, 1 (hatred) to 10 (pure love).
///
/// The text model writes this inconsistently (`7`, `7.0`, `7/10`), so
/// every response kind funnels it through [`RelationshipStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RelationshipStatus(u8);

impl RelationshipStatus {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Coerces the raw tag text into a status.
    ///
    /// Accepts a bare integer, an integral decimal, or a score out of ten.
    /// Anything else, or a value outside 1..=10, is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let number = match raw.split_once('/') {
            Some((score, scale)) if scale.trim() == "10" => score.trim(),
            Some(_) => return None,
            None => raw,
        };
        let number = match number.split_once('.') {
            Some((whole, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => whole,
            Some(_) => return None,
            None => number,
        };
        number.parse::<u8>().ok().and_then(Self::new)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RelationshipStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("relationship status {} is outside 1..=10", value))
    }
}

impl From<RelationshipStatus> for u8 {
    fn from(status: RelationshipStatus) -> u8 {
        status.0
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A relationship the character already has. Input to prompt building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    pub relationship_type: String,
    pub relationship_status: RelationshipStatus,
}

/// A new person the text model introduced into the character's life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRecord {
    pub name: String,
    pub age: u32,
    /// Expected to be "male" or "female" but passed through as written.
    pub gender: String,
    pub relationship_type: String,
    pub relationship_status: RelationshipStatus,
}

/// A person the text model says should leave the character's relationships.
///
/// `name` is meant to match an existing [`Relationship`] exactly; checking
/// that is up to whoever applies the removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRemoval {
    pub name: String,
    pub reason: String,
}
