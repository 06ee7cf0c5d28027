//! WASM bindings for lifesim-engine, used by the browser frontend.
//!
//! The frontend makes the text model calls itself and hands raw responses
//! here for assembly. Every result crosses the boundary as a JSON string.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use lifesim_engine::core::backstory::{assemble_backstory, BackstoryPlan, SiblingDistribution};
use lifesim_engine::core::config::EngineConfig;
use lifesim_engine::core::outcome::{assemble_outcome, RecordPolicy};
use lifesim_engine::core::scenario::assemble_scenario_staged;
use lifesim_engine::schema::backstory::Gender;
use lifesim_engine::schema::stats::{CharacterStats, StatDelta};

/// Shipped defaults, compiled into the WASM binary.
const DEFAULT_CONFIG: &str = include_str!("../../data/engine.ron");

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

fn parse_gender(s: &str) -> Result<Gender, JsError> {
    match s.to_lowercase().as_str() {
        "male" => Ok(Gender::Male),
        "female" => Ok(Gender::Female),
        other => Err(JsError::new(&format!("Unknown gender: {other}"))),
    }
}

#[wasm_bindgen]
pub struct ResponseParser {
    record_policy: RecordPolicy,
    siblings: SiblingDistribution,
    rng: StdRng,
}

#[wasm_bindgen]
impl ResponseParser {
    /// Create a parser from a RON config, or the shipped one when `config_ron` is absent.
    #[wasm_bindgen(constructor)]
    pub fn new(config_ron: Option<String>, seed: u64) -> Result<ResponseParser, JsError> {
        let source = config_ron.as_deref().unwrap_or(DEFAULT_CONFIG);
        let config = EngineConfig::parse_ron(source)
            .map_err(|e| JsError::new(&format!("Config parse error: {e}")))?;
        let siblings = config
            .sibling_distribution()
            .map_err(|e| JsError::new(&format!("Config error: {e}")))?;

        Ok(ResponseParser {
            record_policy: config.record_policy,
            siblings,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Assemble a scenario response. Errors name the stage that failed.
    pub fn parse_scenario(&self, raw: &str) -> Result<String, JsError> {
        let result = assemble_scenario_staged(raw)
            .map_err(|f| JsError::new(&format!("Scenario error at {}: {}", f.stage, f.error)))?;
        to_json(&result)
    }

    /// Assemble an outcome response under the configured record policy.
    pub fn parse_outcome(&self, raw: &str) -> Result<String, JsError> {
        let result = assemble_outcome(raw, self.record_policy)
            .map_err(|e| JsError::new(&format!("Outcome error: {e}")))?;
        to_json(&result)
    }

    /// Assemble a backstory response against the plan it was prompted with.
    pub fn parse_backstory(
        &self,
        raw: &str,
        gender: &str,
        sibling_count: usize,
    ) -> Result<String, JsError> {
        let plan = BackstoryPlan {
            gender: parse_gender(gender)?,
            sibling_count,
        };
        let result = assemble_backstory(raw, &plan)
            .map_err(|e| JsError::new(&format!("Backstory error: {e}")))?;
        to_json(&result)
    }

    /// Draw a gender and sibling count for a new character.
    ///
    /// Returns `{"gender": "female", "siblingCount": 2}`.
    pub fn draw_backstory_plan(&mut self) -> Result<String, JsError> {
        let plan = BackstoryPlan::draw(&self.siblings, &mut self.rng);
        to_json(&plan)
    }

    /// Apply a choice's stat delta to the character's stats, both as JSON.
    ///
    /// A delta with any field outside 1..=5 is rejected.
    pub fn apply_delta(
        &self,
        stats_json: &str,
        delta_json: &str,
        points_per_step: u8,
    ) -> Result<String, JsError> {
        let stats: CharacterStats = serde_json::from_str(stats_json)
            .map_err(|e| JsError::new(&format!("Invalid stats JSON: {e}")))?;
        let delta: StatDelta = serde_json::from_str(delta_json)
            .map_err(|e| JsError::new(&format!("Invalid delta JSON: {e}")))?;
        to_json(&stats.apply(&delta, points_per_step))
    }

    /// Reseed the plan generator.
    pub fn reset(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
