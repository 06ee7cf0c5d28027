use serde::{Deserialize, Serialize};
use std::fmt;

use super::relationship::RelationshipStatus;

/// Gender of the player character, picked before the backstory is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parent as described in the backstory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRecord {
    pub name: String,
    pub age: u32,
    pub relationship_status: RelationshipStatus,
}

/// An older sibling as described in the backstory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingRecord {
    pub name: String,
    pub age: u32,
    /// Passed through as written ("Male", "female", ...).
    pub gender: String,
    pub relationship_status: RelationshipStatus,
}

/// The circumstances a new character is born into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackstoryResult {
    pub name: String,
    pub gender: Gender,
    pub location: String,
    pub situation: String,
    pub mother: ParentRecord,
    pub father: ParentRecord,
    pub siblings: Vec<SiblingRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
        assert_eq!(Gender::Male.to_string(), "male");
    }
}
