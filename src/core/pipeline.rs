/// The engine: prompt → text model → assembler, under the retry policy.
///
/// Holds no mutable state, so one engine can serve concurrent requests.

use std::path::Path;
use std::sync::Arc;

use crate::core::backstory::{assemble_backstory, BackstoryPlan, SiblingDistribution};
use crate::core::config::{ConfigError, EngineConfig};
use crate::core::extract::ExtractError;
use crate::core::outcome::{assemble_outcome, RecordPolicy};
use crate::core::prompt::{DefaultPrompts, PromptBuilder};
use crate::core::provider::TextProvider;
use crate::core::retry::{with_retry, AttemptError, RetryPolicy, TerminalFailure};
use crate::core::scenario::assemble_scenario;
use crate::schema::backstory::BackstoryResult;
use crate::schema::character::CharacterState;
use crate::schema::outcome::OutcomeResult;
use crate::schema::relationship::Relationship;
use crate::schema::scenario::{Choice, ScenarioResult};

/// The top-level engine. Built via `LifeSimEngine::builder(provider)`.
pub struct LifeSimEngine {
    provider: Arc<dyn TextProvider>,
    prompts: Arc<dyn PromptBuilder>,
    retry: RetryPolicy,
    record_policy: RecordPolicy,
    siblings: SiblingDistribution,
}

/// Builder for constructing a `LifeSimEngine`.
pub struct LifeSimEngineBuilder {
    provider: Arc<dyn TextProvider>,
    prompts: Option<Arc<dyn PromptBuilder>>,
    config_path: Option<String>,
    /// Directly provided configuration (for testing without files).
    config: Option<EngineConfig>,
}

impl LifeSimEngine {
    pub fn builder(provider: Arc<dyn TextProvider>) -> LifeSimEngineBuilder {
        LifeSimEngineBuilder {
            provider,
            prompts: None,
            config_path: None,
            config: None,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn record_policy(&self) -> RecordPolicy {
        self.record_policy
    }

    /// Asks for a scenario with three choices suited to the character.
    pub async fn generate_scenario(
        &self,
        character: &CharacterState,
        relationships: &[Relationship],
    ) -> Result<ScenarioResult, TerminalFailure> {
        let prompt = self.prompts.scenario(character, relationships);
        self.run("generate_scenario", &prompt, assemble_scenario).await
    }

    /// Asks the text model what came of `choice` in the given scenario.
    pub async fn evaluate_choice(
        &self,
        choice: &Choice,
        scenario_text: &str,
        character: &CharacterState,
        relationships: &[Relationship],
    ) -> Result<OutcomeResult, TerminalFailure> {
        let prompt = self
            .prompts
            .evaluation(choice, scenario_text, character, relationships);
        let policy = self.record_policy;
        self.run("evaluate_choice", &prompt, |text| assemble_outcome(text, policy))
            .await
    }

    /// Draws a fresh plan (gender and sibling count) and generates a backstory for it.
    pub async fn generate_backstory(&self) -> Result<BackstoryResult, TerminalFailure> {
        let plan = self.draw_backstory_plan();
        self.generate_backstory_with(&plan).await
    }

    /// Generates a backstory for a plan the caller already chose.
    ///
    /// The plan stays the same across retries; only the text is regenerated.
    pub async fn generate_backstory_with(
        &self,
        plan: &BackstoryPlan,
    ) -> Result<BackstoryResult, TerminalFailure> {
        tracing::debug!(
            gender = %plan.gender,
            siblings = plan.sibling_count,
            "generating backstory"
        );
        let prompt = self.prompts.backstory(plan);
        self.run("generate_backstory", &prompt, |text| assemble_backstory(text, plan))
            .await
    }

    pub fn draw_backstory_plan(&self) -> BackstoryPlan {
        BackstoryPlan::draw(&self.siblings, &mut rand::thread_rng())
    }

    async fn run<T, A>(
        &self,
        operation: &'static str,
        prompt: &str,
        assemble: A,
    ) -> Result<T, TerminalFailure>
    where
        A: Fn(&str) -> Result<T, ExtractError>,
    {
        let provider = &self.provider;
        let assemble = &assemble;
        with_retry(&self.retry, operation, |attempt| async move {
            let raw = provider.complete(prompt).await?;
            tracing::trace!(attempt, operation, response = %raw, "raw response");
            Ok::<T, AttemptError>(assemble(&raw)?)
        })
        .await
    }
}

impl LifeSimEngineBuilder {
    pub fn prompts(mut self, prompts: Arc<dyn PromptBuilder>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    pub fn config_file(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    /// Provide configuration directly (for testing without files).
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<LifeSimEngine, ConfigError> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => EngineConfig::load_from_ron(Path::new(&path))?,
            (None, None) => EngineConfig::default(),
        };

        Ok(LifeSimEngine {
            provider: self.provider,
            prompts: self.prompts.unwrap_or_else(|| Arc::new(DefaultPrompts)),
            retry: config.retry_policy(),
            record_policy: config.record_policy,
            siblings: config.sibling_distribution()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every prompt.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(mut replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            replies.reverse();
            Arc::new(Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextProvider for ScriptedProvider {
        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| {
                    Err(ProviderError::RequestFailed("script exhausted".to_string()))
                })
        }
    }

    const STATS: &str = r#"{"Health":3,"Intelligence":3,"Charisma":3,"Happiness":4,"Fitness":3,"Creativity":3}"#;

    fn scenario_reply() -> String {
        format!(
            "<scenario>You find a wallet.</scenario>\
             <choice1>Keep it</choice1><choice1Stats>{s}</choice1Stats>\
             <choice2>Hand it in</choice2><choice2Stats>{s}</choice2Stats>\
             <choice3>Leave it</choice3><choice3Stats>{s}</choice3Stats>",
            s = STATS
        )
    }

    fn engine(provider: Arc<ScriptedProvider>) -> LifeSimEngine {
        LifeSimEngine::builder(provider).build().unwrap()
    }

    #[tokio::test]
    async fn scenario_retries_bad_text_then_succeeds() {
        let provider = ScriptedProvider::new(vec![
            Ok("<scenario>No choices here.</scenario>".to_string()),
            Err(ProviderError::RequestFailed("502".to_string())),
            Ok(scenario_reply()),
        ]);
        let engine = engine(provider.clone());
        let character = CharacterState::new("Sam", 8);

        let result = engine.generate_scenario(&character, &[]).await.unwrap();
        assert_eq!(result.choices[0].choice_text, "Keep it");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn scenario_gives_up_after_three() {
        let provider = ScriptedProvider::new(vec![
            Ok("garbage".to_string()),
            Ok("garbage".to_string()),
            Ok("garbage".to_string()),
            Ok(scenario_reply()),
        ]);
        let engine = engine(provider.clone());

        let failure = engine
            .generate_scenario(&CharacterState::new("Sam", 8), &[])
            .await
            .unwrap_err();
        assert_eq!(failure.attempts, 3);
        assert_eq!(failure.operation, "generate_scenario");
        assert_eq!(
            failure.last_error,
            AttemptError::Extract(ExtractError::TagMissing("scenario".to_string()))
        );
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn every_attempt_resends_the_same_prompt() {
        let provider = ScriptedProvider::new(vec![Ok("x".to_string()), Ok(scenario_reply())]);
        let engine = engine(provider.clone());
        engine
            .generate_scenario(&CharacterState::new("Sam", 8), &[])
            .await
            .unwrap();
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }

    #[tokio::test]
    async fn evaluate_choice_uses_record_policy() {
        let reply = "<summary>s</summary><outcome>o</outcome><notableLifeEvent>false</notableLifeEvent>\
                     <newRelationships><relationship><name>A</name><age>x</age><gender>male</gender>\
                     <relationshipType>friend</relationshipType><relationshipStatus>5</relationshipStatus>\
                     </relationship></newRelationships>";
        let choice = Choice {
            choice_text: "Keep it".to_string(),
            delta: crate::schema::stats::StatDelta::neutral(),
        };
        let character = CharacterState::new("Sam", 8);

        let lenient = engine(ScriptedProvider::new(vec![Ok(reply.to_string())]));
        let outcome = lenient
            .evaluate_choice(&choice, "You find a wallet.", &character, &[])
            .await
            .unwrap();
        assert!(outcome.new_relationships.is_empty());

        let strict_provider = ScriptedProvider::new(vec![Ok(reply.to_string()); 3]);
        let strict = LifeSimEngine::builder(strict_provider.clone())
            .with_config(EngineConfig {
                record_policy: RecordPolicy::RejectResponse,
                ..EngineConfig::default()
            })
            .build()
            .unwrap();
        assert!(strict
            .evaluate_choice(&choice, "You find a wallet.", &character, &[])
            .await
            .is_err());
        assert_eq!(strict_provider.calls(), 3);
    }

    #[tokio::test]
    async fn backstory_plan_is_fixed_across_retries() {
        let plan = BackstoryPlan {
            gender: crate::schema::backstory::Gender::Male,
            sibling_count: 1,
        };
        let parents = "<name>Leo Park</name><location>Halifax, Canada</location>\
                       <situation>Leo is born in winter.</situation>\
                       <mother>Ana Park</mother><motherAge>29</motherAge><motherRelationship>9</motherRelationship>\
                       <father>Jin Park</father><fatherAge>31</fatherAge><fatherRelationship>8</fatherRelationship>";
        let complete = format!(
            "{}<sibling1>Mia Park</sibling1><siblingAge1>3</siblingAge1>\
             <siblingGender1>female</siblingGender1><siblingRelationship1>9</siblingRelationship1>",
            parents
        );
        let provider = ScriptedProvider::new(vec![Ok(parents.to_string()), Ok(complete)]);
        let engine = engine(provider.clone());

        let result = engine.generate_backstory_with(&plan).await.unwrap();
        assert_eq!(result.siblings.len(), 1);
        assert_eq!(result.siblings[0].name, "Mia Park");
        assert_eq!(result.gender, crate::schema::backstory::Gender::Male);
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts[0], prompts[1]);
    }

    #[test]
    fn builder_reads_config_file() {
        let provider = ScriptedProvider::new(vec![]);
        let engine = LifeSimEngine::builder(provider)
            .config_file("data/engine.ron")
            .build()
            .unwrap();
        assert_eq!(engine.retry_policy().max_attempts, 3);
        assert_eq!(engine.record_policy(), RecordPolicy::DropMalformed);
    }

    #[test]
    fn builder_reports_missing_config_file() {
        let provider = ScriptedProvider::new(vec![]);
        let result = LifeSimEngine::builder(provider)
            .config_file("data/does_not_exist.ron")
            .build();
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
