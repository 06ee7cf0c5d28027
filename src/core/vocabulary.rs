/// Tag vocabulary shared by the prompts and the response assemblers.
///
/// These names are the wire format between the engine and the text model.
/// Renaming or restructuring any of them is a breaking change and must bump
/// [`PROTOCOL_VERSION`].

/// Version of the tag vocabulary below.
pub const PROTOCOL_VERSION: u32 = 1;

pub const SCENARIO: &str = "scenario";

pub const SUMMARY: &str = "summary";
pub const OUTCOME: &str = "outcome";
pub const NOTABLE_LIFE_EVENT: &str = "notableLifeEvent";
pub const LIFE_EVENT_SUMMARY: &str = "lifeEventSummary";

/// Container of zero or more [`RELATIONSHIP`] blocks.
pub const NEW_RELATIONSHIPS: &str = "newRelationships";
pub const RELATIONSHIP: &str = "relationship";
/// Container of zero or more [`REMOVED_RELATIONSHIP`] blocks.
pub const REMOVED_RELATIONSHIPS: &str = "removedRelationships";
pub const REMOVED_RELATIONSHIP: &str = "removedRelationship";

// Fields inside relationship blocks.
pub const NAME: &str = "name";
pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
pub const RELATIONSHIP_TYPE: &str = "relationshipType";
pub const RELATIONSHIP_STATUS: &str = "relationshipStatus";
pub const REASON: &str = "reason";

// Backstory fields. `name` is shared with the relationship blocks.
pub const LOCATION: &str = "location";
pub const SITUATION: &str = "situation";
pub const MOTHER: &str = "mother";
pub const MOTHER_AGE: &str = "motherAge";
pub const MOTHER_RELATIONSHIP: &str = "motherRelationship";
pub const FATHER: &str = "father";
pub const FATHER_AGE: &str = "fatherAge";
pub const FATHER_RELATIONSHIP: &str = "fatherRelationship";

/// `choice1`, `choice2`, `choice3`.
pub fn choice(index: usize) -> String {
    format!("choice{}", index)
}

/// `choice1Stats`, `choice2Stats`, `choice3Stats`.
pub fn choice_stats(index: usize) -> String {
    format!("choice{}Stats", index)
}

/// The four tags describing the sibling at a 1-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingTags {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub relationship: String,
}

impl SiblingTags {
    pub fn for_index(index: usize) -> Self {
        Self {
            name: format!("sibling{}", index),
            age: format!("siblingAge{}", index),
            gender: format!("siblingGender{}", index),
            relationship: format!("siblingRelationship{}", index),
        }
    }
}

/// The closing tag that ends one repeated block, e.g. `</relationship>`.
pub fn terminator(block: &str) -> String {
    format!("</{}>", block)
}
