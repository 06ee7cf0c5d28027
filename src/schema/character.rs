use serde::{Deserialize, Serialize};

use super::stats::CharacterStats;

/// Everything the prompts need to know about the character at this turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterState {
    pub name: String,
    pub age: u32,
    pub stats: CharacterStats,
    #[serde(default)]
    pub net_worth: i64,
    /// Summaries of earlier turns, oldest first.
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub life_events: Vec<String>,
}

/// The broad developmental stage a given age falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeStage {
    EarlyChildhood,
    Preschool,
    Elementary,
    Older,
}

impl LifeStage {
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=2 => Self::EarlyChildhood,
            3..=5 => Self::Preschool,
            6..=12 => Self::Elementary,
            _ => Self::Older,
        }
    }
}

impl CharacterState {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
            stats: CharacterStats::default(),
            net_worth: 0,
            history: Vec::new(),
            life_events: Vec::new(),
        }
    }

    pub fn life_stage(&self) -> LifeStage {
        LifeStage::for_age(self.age)
    }
}
