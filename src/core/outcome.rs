/// Outcome assembly: the narrative result of a choice plus relationship changes.

use serde::{Deserialize, Serialize};

use crate::core::extract::{
    extract_tag, require_age, require_bool, require_status, require_text, split_blocks,
    ExtractError,
};
use crate::core::vocabulary;
use crate::schema::outcome::OutcomeResult;
use crate::schema::relationship::{RelationshipRecord, RelationshipRemoval};

/// What to do with a relationship block whose fields don't decode.
///
/// Applied the same way to new relationships and removals. A record is
/// never kept with a field blanked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordPolicy {
    /// Skip the malformed record and keep the rest of the outcome.
    #[default]
    DropMalformed,
    /// Fail the whole outcome so it gets regenerated.
    RejectResponse,
}

/// Builds an [`OutcomeResult`] from a raw response.
///
/// `summary`, `outcome` and `notableLifeEvent` are required, and
/// `lifeEventSummary` is required only when the event flag is true. Both
/// relationship lists are optional and come back empty when absent.
pub fn assemble_outcome(text: &str, policy: RecordPolicy) -> Result<OutcomeResult, ExtractError> {
    let summary = require_text(text, vocabulary::SUMMARY)?;
    let outcome = require_text(text, vocabulary::OUTCOME)?;
    let notable_life_event = require_bool(text, vocabulary::NOTABLE_LIFE_EVENT)?;
    let life_event_summary = if notable_life_event {
        Some(require_text(text, vocabulary::LIFE_EVENT_SUMMARY)?)
    } else {
        None
    };

    let new_relationships = collect_records(
        text,
        vocabulary::NEW_RELATIONSHIPS,
        vocabulary::RELATIONSHIP,
        policy,
        decode_relationship,
    )?;
    let removed_relationships = collect_records(
        text,
        vocabulary::REMOVED_RELATIONSHIPS,
        vocabulary::REMOVED_RELATIONSHIP,
        policy,
        decode_removal,
    )?;

    Ok(OutcomeResult {
        summary,
        outcome,
        notable_life_event,
        life_event_summary,
        new_relationships,
        removed_relationships,
    })
}

fn collect_records<T>(
    text: &str,
    container: &str,
    block: &str,
    policy: RecordPolicy,
    decode: fn(&str) -> Result<T, ExtractError>,
) -> Result<Vec<T>, ExtractError> {
    let opening = format!("<{}>", block);
    let terminator = vocabulary::terminator(block);
    let mut records = Vec::new();

    // Filler such as "None" inside the container is not a record.
    let segments = split_blocks(extract_tag(text, container), &terminator)
        .into_iter()
        .filter(|segment| segment.contains(&opening));

    for (index, raw) in segments.enumerate() {
        match decode(raw) {
            Ok(record) => records.push(record),
            Err(error) => match policy {
                RecordPolicy::DropMalformed => {
                    tracing::warn!(
                        container,
                        block = index + 1,
                        error = %error,
                        "dropping malformed record"
                    );
                }
                RecordPolicy::RejectResponse => return Err(error),
            },
        }
    }

    Ok(records)
}

fn decode_relationship(block: &str) -> Result<RelationshipRecord, ExtractError> {
    Ok(RelationshipRecord {
        name: require_text(block, vocabulary::NAME)?,
        age: require_age(block, vocabulary::AGE)?,
        gender: require_text(block, vocabulary::GENDER)?,
        relationship_type: require_text(block, vocabulary::RELATIONSHIP_TYPE)?,
        relationship_status: require_status(block, vocabulary::RELATIONSHIP_STATUS)?,
    })
}

fn decode_removal(block: &str) -> Result<RelationshipRemoval, ExtractError> {
    Ok(RelationshipRemoval {
        name: require_text(block, vocabulary::NAME)?,
        reason: require_text(block, vocabulary::REASON)?,
    })
}
