/// Scenario assembly: one situation and three choice/stats pairs.

use std::fmt;

use crate::core::extract::{require, require_text, ExtractError};
use crate::core::stat_delta::decode_stat_delta;
use crate::core::vocabulary;
use crate::schema::scenario::{Choice, ScenarioResult, CHOICE_COUNT};

/// Where scenario assembly is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStage {
    AwaitingScenario,
    AwaitingChoice(usize),
    AwaitingChoiceStats(usize),
    Complete,
}

impl ScenarioStage {
    /// The stage that follows this one. `Complete` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::AwaitingScenario => Self::AwaitingChoice(1),
            Self::AwaitingChoice(i) => Self::AwaitingChoiceStats(i),
            Self::AwaitingChoiceStats(i) if i < CHOICE_COUNT => Self::AwaitingChoice(i + 1),
            Self::AwaitingChoiceStats(_) | Self::Complete => Self::Complete,
        }
    }
}

impl fmt::Display for ScenarioStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingScenario => write!(f, "scenario"),
            Self::AwaitingChoice(i) => write!(f, "choice {}", i),
            Self::AwaitingChoiceStats(i) => write!(f, "choice {} stats", i),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// A scenario response that failed, with the stage it stopped at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFailure {
    pub stage: ScenarioStage,
    pub error: ExtractError,
}

/// Builds a [`ScenarioResult`] from a raw response.
///
/// Walks the stages in order and stops at the first missing or invalid
/// field. All eight fields are required; a partial scenario is never
/// returned.
pub fn assemble_scenario(text: &str) -> Result<ScenarioResult, ExtractError> {
    assemble_scenario_staged(text).map_err(|failure| failure.error)
}

/// Like [`assemble_scenario`] but reports the stage that failed.
pub fn assemble_scenario_staged(text: &str) -> Result<ScenarioResult, ScenarioFailure> {
    let mut stage = ScenarioStage::AwaitingScenario;
    let mut scenario_text = None;
    let mut pending_text = None;
    let mut choices = Vec::with_capacity(CHOICE_COUNT);

    while stage != ScenarioStage::Complete {
        let fail = |error| ScenarioFailure { stage, error };
        match stage {
            ScenarioStage::AwaitingScenario => {
                scenario_text = Some(require_text(text, vocabulary::SCENARIO).map_err(fail)?);
            }
            ScenarioStage::AwaitingChoice(i) => {
                pending_text = Some(require_text(text, &vocabulary::choice(i)).map_err(fail)?);
            }
            ScenarioStage::AwaitingChoiceStats(i) => {
                let tag = vocabulary::choice_stats(i);
                let raw = require(text, &tag).map_err(fail)?;
                let delta = decode_stat_delta(raw)
                    .map_err(|e| fail(ExtractError::decode(&tag, e.to_string())))?;
                if let Some(choice_text) = pending_text.take() {
                    choices.push(Choice { choice_text, delta });
                }
            }
            ScenarioStage::Complete => {}
        }
        stage = stage.next();
    }

    let found = choices.len();
    let shape_error = ScenarioFailure {
        stage,
        error: ExtractError::Shape {
            what: "choices",
            expected: CHOICE_COUNT,
            found,
        },
    };
    let choices: [Choice; CHOICE_COUNT] = choices.try_into().map_err(|_| shape_error.clone())?;
    let scenario_text = scenario_text.ok_or(shape_error)?;

    Ok(ScenarioResult {
        scenario_text,
        choices,
    })
}
