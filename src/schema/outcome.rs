use serde::{Deserialize, Serialize};

use super::relationship::{RelationshipRecord, RelationshipRemoval};

/// What came of a choice, as judged by the text model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeResult {
    pub summary: String,
    pub outcome: String,
    pub notable_life_event: bool,
    /// Only ever `Some` when `notable_life_event` is true.
    pub life_event_summary: Option<String>,
    pub new_relationships: Vec<RelationshipRecord>,
    pub removed_relationships: Vec<RelationshipRemoval>,
}
