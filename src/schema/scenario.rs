use serde::{Deserialize, Serialize};

use super::stats::StatDelta;

/// Number of choices every scenario offers.
pub const CHOICE_COUNT: usize = 3;

/// One option the player can pick, with its effect on each stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub choice_text: String,
    pub delta: StatDelta,
}

/// A situation and exactly three choices, in the order the model gave them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_text: String,
    pub choices: [Choice; CHOICE_COUNT],
}

impl ScenarioResult {
    /// Looks up a choice by its 1-based position.
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        index.checked_sub(1).and_then(|i| self.choices.get(i))
    }
}
