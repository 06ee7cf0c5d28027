/// Stat-delta decoding: the JSON object inside a `choiceNStats` tag.

use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use crate::schema::stats::{Stat, StatDelta, DELTA_MAX, DELTA_MIN};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("not a JSON object: {0}")]
    NotAnObject(String),
    #[error("missing key \"{0}\"")]
    MissingKey(&'static str),
    #[error("unexpected key \"{0}\"")]
    UnknownKey(String),
    #[error("\"{key}\" must be a whole number, got {value}")]
    NotAnInteger { key: &'static str, value: String },
    #[error("\"{key}\" must be between 1 and 5, got {value}")]
    OutOfRange { key: &'static str, value: i64 },
}

/// Decodes a stats object such as
/// `{"Health":3,"Intelligence":3,"Charisma":2,"Happiness":4,"Fitness":3,"Creativity":3}`.
///
/// All six capitalised keys must be present, each with an integer in 1..=5,
/// and no other keys are allowed. Nothing is clamped or defaulted: a bad
/// object fails so the whole scenario is regenerated.
pub fn decode_stat_delta(raw: &str) -> Result<StatDelta, DecodeError> {
    let body = strip_code_fence(raw);
    let fields: FxHashMap<String, Value> =
        serde_json::from_str(body).map_err(|e| DecodeError::NotAnObject(e.to_string()))?;

    if let Some(unknown) = fields.keys().find(|key| Stat::from_key(key).is_none()) {
        return Err(DecodeError::UnknownKey(unknown.clone()));
    }

    let field = |stat: Stat| -> Result<u8, DecodeError> {
        let key = stat.key();
        let value = fields.get(key).ok_or(DecodeError::MissingKey(key))?;
        let number = value.as_i64().ok_or_else(|| DecodeError::NotAnInteger {
            key,
            value: value.to_string(),
        })?;
        if !(DELTA_MIN as i64..=DELTA_MAX as i64).contains(&number) {
            return Err(DecodeError::OutOfRange { key, value: number });
        }
        Ok(number as u8)
    };

    Ok(StatDelta {
        health: field(Stat::Health)?,
        intelligence: field(Stat::Intelligence)?,
        charisma: field(Stat::Charisma)?,
        happiness: field(Stat::Happiness)?,
        fitness: field(Stat::Fitness)?,
        creativity: field(Stat::Creativity)?,
    })
}

/// Removes a Markdown code fence (```json … ```) wrapped around the object.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop an info string such as `json` on the opening fence line.
    match rest.find('\n') {
        Some(newline) if !rest[..newline].contains('{') => rest[newline + 1..].trim(),
        _ => rest.trim(),
    }
}
