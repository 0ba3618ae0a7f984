//! Evaluate use case
//!
//! Poses one thought experiment to every enabled provider concurrently.
//!
//! ```text
//! Validate ─▶ Dispatch ─▶ Await-All ─▶ Assemble
//! ```
//!
//! Only invalid input, an unknown case, or an assembled response that fails
//! its own validation fail the request. Provider failures stay in their slot.
//! Every provider gets a slot; those the request left out get a placeholder.

use super::retry::{ProviderError, run_with_retry};
use crate::config::EvaluationConfig;
use crate::ports::credentials::CredentialResolver;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider::{
    CompletionRequest, Credentials, GatewayError, OutputSchema, ProviderAdapter,
};
use dilemma_domain::{
    EvaluationResponse, InputError, ModelResult, PromptTemplate, ProviderId, RETRY_NOTE,
    ThoughtCase, ThoughtExperimentInput, UserPromptArgs, mock_result, parse_model_result,
};
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Summary used for the fallback result after both attempts failed
const FAILED_SUMMARY: &str = "エラーが発生しました。";

/// Schema name sent with evaluation requests
const RESULT_SCHEMA_NAME: &str = "thought_experiment_result";

/// Summary used for a provider the request did not enable
const NOT_REQUESTED_SUMMARY: &str = "このモデルはリクエストされていません。";

/// Errors that fail a whole evaluation request
#[derive(Error, Debug)]
pub enum EvaluateError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Response failed validation: {0}")]
    ResponseAssembly(String),
}

/// One provider's settled outcome
#[derive(Debug, Clone)]
struct ProviderOutcome {
    provider: ProviderId,
    result: ModelResult,
    error: Option<String>,
}

impl ProviderOutcome {
    fn fallback(provider: ProviderId, summary: &str, error: impl ToString) -> Self {
        Self {
            provider,
            result: ModelResult::fallback(summary),
            error: Some(error.to_string()),
        }
    }

    fn not_requested(provider: ProviderId) -> Self {
        Self {
            provider,
            result: ModelResult::fallback(NOT_REQUESTED_SUMMARY),
            error: None,
        }
    }
}

/// Localized summary for a provider that has no credentials configured
fn missing_config_summary(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Gpt => "OpenAI APIキーが設定されていません。",
        ProviderId::Gemini => "Gemini APIキーが設定されていません。",
        ProviderId::Claude => "Bedrock認証情報が設定されていません。",
    }
}

/// Call an adapter once, bounded by `timeout`
pub(crate) async fn invoke_with_timeout(
    adapter: &dyn ProviderAdapter,
    request: &CompletionRequest,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<String, GatewayError> {
    tokio::time::timeout(timeout, adapter.invoke(request, credentials))
        .await
        .map_err(|_| GatewayError::Timeout)?
}

/// Use case for evaluating a thought experiment across providers
pub struct EvaluateUseCase {
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
    credentials: Arc<dyn CredentialResolver>,
    config: EvaluationConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluationConfig, credentials: Arc<dyn CredentialResolver>) -> Self {
        Self {
            adapters: HashMap::new(),
            credentials,
            config,
        }
    }

    /// Register the adapter for the provider it reports
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.provider(), adapter);
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Decode and evaluate a raw JSON request body
    pub async fn execute_json(
        &self,
        body: serde_json::Value,
    ) -> Result<EvaluationResponse, EvaluateError> {
        let input = ThoughtExperimentInput::from_json(body)?;
        self.execute(input).await
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: ThoughtExperimentInput,
    ) -> Result<EvaluationResponse, EvaluateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ThoughtExperimentInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<EvaluationResponse, EvaluateError> {
        // Validate
        let input = input.validate()?;
        let case = ThoughtCase::find(&input.case_id)
            .ok_or_else(|| EvaluateError::CaseNotFound(input.case_id.clone()))?;
        let providers = input.enabled_providers();

        let outcomes = if self.config.mock_mode {
            info!("Mock mode: synthesizing results for {} providers", providers.len());
            providers
                .iter()
                .map(|&provider| ProviderOutcome {
                    provider,
                    result: mock_result(provider, &input),
                    error: None,
                })
                .collect::<Vec<_>>()
        } else {
            // Dispatch + Await-All
            info!(
                case = case.id,
                principle = %input.principle_id,
                "Evaluating with {} providers",
                providers.len()
            );
            progress.on_dispatch(&providers);

            let args = UserPromptArgs {
                case_title: case.title,
                scenario_text: &input.scenario_text,
                option_a: &input.option_a,
                option_b: &input.option_b,
                principle: input.principle_id,
                if_conditions: &input.if_conditions,
                target_confidence: input.target_confidence,
            };

            let args = &args;
            let tasks = providers.iter().map(|&provider| async move {
                let outcome = self.evaluate_provider(provider, args).await;
                progress.on_provider_complete(provider, outcome.error.is_none());
                outcome
            });
            let outcomes = join_all(tasks).await;
            progress.on_complete();
            outcomes
        };

        // Assemble
        let skipped = ProviderId::ALL
            .into_iter()
            .filter(|p| !providers.contains(p))
            .map(ProviderOutcome::not_requested);
        let mut results = BTreeMap::new();
        let mut errors = BTreeMap::new();
        for outcome in outcomes.into_iter().chain(skipped) {
            if let Some(error) = outcome.error {
                errors.insert(outcome.provider, error);
            }
            results.insert(outcome.provider, outcome.result);
        }

        let response = EvaluationResponse::new(input, results, errors);
        response.validate().map_err(EvaluateError::ResponseAssembly)?;

        info!(errors = response.error_count(), "Evaluation assembled");
        Ok(response)
    }

    /// Run one provider to completion; never fails
    async fn evaluate_provider(
        &self,
        provider: ProviderId,
        args: &UserPromptArgs<'_>,
    ) -> ProviderOutcome {
        let summary = missing_config_summary(provider);

        let (Some(settings), Some(adapter)) =
            (self.config.settings(provider), self.adapters.get(&provider))
        else {
            warn!("Provider {} has no adapter or settings", provider);
            return ProviderOutcome::fallback(
                provider,
                summary,
                ProviderError::ConfigMissing(format!(
                    "{} is not configured",
                    provider.display_name()
                )),
            );
        };

        let Some(credentials) = settings.credentials.resolve(self.credentials.as_ref()).await
        else {
            warn!("Provider {} skipped: credentials not set", provider);
            return ProviderOutcome::fallback(
                provider,
                summary,
                ProviderError::ConfigMissing(format!(
                    "{} not set",
                    settings.credentials.names().join("/")
                )),
            );
        };

        let system_prompt = PromptTemplate::system_prompt();
        let schema = OutputSchema::new(RESULT_SCHEMA_NAME, ModelResult::json_schema());
        let invoke = |note: Option<&str>| {
            let request = CompletionRequest::new(
                system_prompt,
                PromptTemplate::user_prompt(args, note),
                &settings.model,
            )
            .with_output_schema(schema.clone());
            let retry = note.is_some();
            let adapter = Arc::clone(adapter);
            let credentials = &credentials;
            let timeout = self.config.call_timeout;
            async move {
                debug!(
                    provider = %provider,
                    retry,
                    prompt_len = request.user_prompt.len(),
                    "Invoking provider"
                );
                invoke_with_timeout(adapter.as_ref(), &request, credentials, timeout)
                    .await
                    .map_err(ProviderError::from)
            }
        };

        match run_with_retry(invoke, parse_model_result, RETRY_NOTE).await {
            Ok(outcome) => {
                if outcome.retried() {
                    info!("Provider {} succeeded on retry", provider);
                } else {
                    info!("Provider {} responded", provider);
                }
                ProviderOutcome {
                    provider,
                    result: outcome.result,
                    error: outcome.first_error.map(|e| e.to_string()),
                }
            }
            Err(failure) => {
                warn!("Provider {} failed both attempts: {}", provider, failure);
                ProviderOutcome::fallback(provider, FAILED_SUMMARY, failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use crate::ports::credentials::{CredentialSpec, NoCredentials};
    use async_trait::async_trait;
    use dilemma_domain::{Decision, FIRST_RUN, Principle};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID_B: &str = r#"{"decision":"B","confidence":66,"key_assumptions":["x"],"reasoning_summary":"y","what_changed_by_if":"初回"}"#;

    // ==================== Test Mocks ====================

    struct ScriptedAdapter {
        provider: ProviderId,
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedAdapter {
        fn new(provider: ProviderId, replies: Vec<Result<&str, GatewayError>>) -> Arc<Self> {
            Arc::new(Self {
                provider,
                replies: Mutex::new(replies.into_iter().map(|r| r.map(String::from)).collect()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: None,
            })
        }

        fn slow(provider: ProviderId, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                provider,
                replies: Mutex::new(VecDeque::new()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: Some(delay),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        fn provider(&self) -> ProviderId {
            self.provider
        }

        async fn invoke(
            &self,
            request: &CompletionRequest,
            _credentials: &Credentials,
        ) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.user_prompt.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::ConnectionError("no reply".into())))
        }
    }

    struct AllKeys;

    #[async_trait]
    impl CredentialResolver for AllKeys {
        async fn resolve(&self, name: &str) -> Option<String> {
            Some(format!("value-of-{}", name))
        }
    }

    fn input(principle: Principle, conditions: &[&str]) -> ThoughtExperimentInput {
        ThoughtExperimentInput {
            case_id: "trolley".to_string(),
            principle_id: principle,
            if_conditions: conditions.iter().map(|c| c.to_string()).collect(),
            target_confidence: 80,
            scenario_text: "runaway trolley".to_string(),
            option_a: "pull lever".to_string(),
            option_b: "do nothing".to_string(),
            enabled_models: None,
        }
    }

    fn use_case(adapters: &[Arc<ScriptedAdapter>]) -> EvaluateUseCase {
        adapters.iter().fold(
            EvaluateUseCase::new(EvaluationConfig::default(), Arc::new(AllKeys)),
            |uc, a| uc.with_adapter(a.clone()),
        )
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_all_providers_succeed() {
        let adapters: Vec<_> = ProviderId::ALL
            .into_iter()
            .map(|p| ScriptedAdapter::new(p, vec![Ok(VALID_B)]))
            .collect();
        let response = use_case(&adapters)
            .execute(input(Principle::Deontology, &[]))
            .await
            .unwrap();

        assert_eq!(response.results.len(), 3);
        assert!(response.errors.is_none());
        assert!(response.results.values().all(|r| r.decision == Decision::B));
        assert!(adapters.iter().all(|a| a.calls() == 1));
    }

    #[tokio::test]
    async fn test_zero_providers_configured() {
        let adapters: Vec<_> = ProviderId::ALL
            .into_iter()
            .map(|p| ScriptedAdapter::new(p, vec![Ok(VALID_B)]))
            .collect();
        let use_case = adapters.iter().fold(
            EvaluateUseCase::new(EvaluationConfig::default(), Arc::new(NoCredentials)),
            |uc, a| uc.with_adapter(a.clone()),
        );

        let response = use_case.execute(input(Principle::None, &[])).await.unwrap();

        assert_eq!(response.results.len(), 3);
        assert_eq!(response.error_count(), 3);
        for result in response.results.values() {
            assert_eq!(result.decision, Decision::A);
            assert_eq!(result.confidence, 51);
            assert_eq!(result.what_changed_by_if, FIRST_RUN);
        }
        assert!(adapters.iter().all(|a| a.calls() == 0));
        let errors = response.errors.unwrap();
        assert!(errors[&ProviderId::Gpt].contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_unparseable_output_retried_once_then_fallback() {
        let gpt = ScriptedAdapter::new(
            ProviderId::Gpt,
            vec![Ok("I cannot decide."), Ok("I still cannot decide.")],
        );
        let gemini = ScriptedAdapter::new(ProviderId::Gemini, vec![Ok(VALID_B)]);
        let claude = ScriptedAdapter::new(ProviderId::Claude, vec![Ok(VALID_B)]);

        let response = use_case(&[gpt.clone(), gemini.clone(), claude.clone()])
            .execute(input(Principle::Utilitarian, &[]))
            .await
            .unwrap();

        assert_eq!(gpt.calls(), 2);
        let prompts = gpt.prompts.lock().unwrap().clone();
        assert!(!prompts[0].ends_with(RETRY_NOTE));
        assert!(prompts[1].ends_with(RETRY_NOTE));

        let errors = response.errors.as_ref().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[&ProviderId::Gpt].contains("No JSON object"));
        assert_eq!(
            response.results[&ProviderId::Gpt].reasoning_summary,
            FAILED_SUMMARY
        );
        assert_eq!(response.results[&ProviderId::Gemini].decision, Decision::B);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_keeps_first_error() {
        let gemini = ScriptedAdapter::new(
            ProviderId::Gemini,
            vec![
                Err(GatewayError::Http {
                    provider: "Gemini",
                    status: 503,
                    body: "overloaded".into(),
                }),
                Ok(VALID_B),
            ],
        );
        let mut input = input(Principle::Care, &[]);
        input.enabled_models = Some(vec![ProviderId::Gemini]);

        let response = use_case(&[gemini.clone()]).execute(input).await.unwrap();

        assert_eq!(gemini.calls(), 2);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[&ProviderId::Gemini].confidence, 66);
        let errors = response.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[&ProviderId::Gemini].contains("503"));
    }

    #[tokio::test]
    async fn test_disabled_providers_get_placeholder() {
        let gpt = ScriptedAdapter::new(ProviderId::Gpt, vec![Ok(VALID_B)]);
        let claude = ScriptedAdapter::new(ProviderId::Claude, vec![Ok(VALID_B)]);
        let use_case = [gpt.clone(), claude.clone()].iter().fold(
            EvaluateUseCase::new(EvaluationConfig::default(), Arc::new(NoCredentials)),
            |uc, a| uc.with_adapter(a.clone()),
        );
        let mut input = input(Principle::None, &[]);
        input.enabled_models = Some(vec![ProviderId::Gpt]);

        let response = use_case.execute(input).await.unwrap();

        let keys: Vec<_> = response.results.keys().copied().collect();
        assert_eq!(keys, ProviderId::ALL.to_vec());
        for provider in [ProviderId::Gemini, ProviderId::Claude] {
            let result = &response.results[&provider];
            assert_eq!(result.reasoning_summary, NOT_REQUESTED_SUMMARY);
            assert_eq!(result.confidence, 51);
        }
        let errors = response.errors.unwrap();
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![ProviderId::Gpt]);
        assert_eq!(claude.calls(), 0);
    }

    #[tokio::test]
    async fn test_mock_mode_fills_disabled_providers() {
        let use_case = EvaluateUseCase::new(
            EvaluationConfig::default().with_mock_mode(true),
            Arc::new(NoCredentials),
        );
        let mut input = input(Principle::Utilitarian, &[]);
        input.enabled_models = Some(vec![ProviderId::Claude]);

        let response = use_case.execute(input).await.unwrap();

        assert_eq!(response.results.len(), 3);
        assert!(response.errors.is_none());
        assert_eq!(
            response.results[&ProviderId::Gpt].reasoning_summary,
            NOT_REQUESTED_SUMMARY
        );
        assert_ne!(
            response.results[&ProviderId::Claude].reasoning_summary,
            NOT_REQUESTED_SUMMARY
        );
    }

    #[tokio::test]
    async fn test_missing_adapter_is_config_error() {
        let response = use_case(&[])
            .execute(input(Principle::None, &[]))
            .await
            .unwrap();
        assert_eq!(response.error_count(), 3);
        assert!(
            response.errors.unwrap()[&ProviderId::Claude].starts_with("Missing configuration")
        );
    }

    #[tokio::test]
    async fn test_mock_mode_bypasses_network() {
        let adapters: Vec<_> = ProviderId::ALL
            .into_iter()
            .map(|p| ScriptedAdapter::new(p, vec![Ok(VALID_B)]))
            .collect();
        let use_case = adapters.iter().fold(
            EvaluateUseCase::new(
                EvaluationConfig::default().with_mock_mode(true),
                Arc::new(NoCredentials),
            ),
            |uc, a| uc.with_adapter(a.clone()),
        );

        let first = use_case.execute(input(Principle::Utilitarian, &[])).await.unwrap();
        let second = use_case.execute(input(Principle::Utilitarian, &[])).await.unwrap();

        assert_eq!(first, second);
        assert!(first.errors.is_none());
        assert_eq!(first.results.len(), 3);
        for result in first.results.values() {
            assert_eq!(result.decision, Decision::A);
            assert!((51..=100).contains(&result.confidence));
        }
        assert!(adapters.iter().all(|a| a.calls() == 0));
    }

    #[tokio::test]
    async fn test_unknown_case_fails_before_dispatch() {
        let gpt = ScriptedAdapter::new(ProviderId::Gpt, vec![Ok(VALID_B)]);
        let mut input = input(Principle::None, &[]);
        input.case_id = "lifeboat".to_string();

        let err = use_case(&[gpt.clone()]).execute(input).await.unwrap_err();

        assert!(matches!(err, EvaluateError::CaseNotFound(id) if id == "lifeboat"));
        assert_eq!(gpt.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_input_fails_before_dispatch() {
        let gpt = ScriptedAdapter::new(ProviderId::Gpt, vec![Ok(VALID_B)]);
        let err = use_case(&[gpt.clone()])
            .execute(input(Principle::None, &["a", "b", "c"]))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(_)));
        assert_eq!(gpt.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_json_rejects_malformed_body() {
        let err = use_case(&[])
            .execute_json(serde_json::json!({"caseId": "trolley"}))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(InputError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_two_conditions_reach_the_prompt() {
        let claude = ScriptedAdapter::new(ProviderId::Claude, vec![Ok(VALID_B)]);
        let mut input = input(Principle::Risk, &["1人は子ども", "夜間である"]);
        input.enabled_models = Some(vec![ProviderId::Claude]);

        use_case(&[claude.clone()]).execute(input).await.unwrap();

        let prompt = claude.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains(r#"["1人は子ども","夜間である"]"#));
        assert!(!prompt.contains("if条件(配列): []"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_transport_error() {
        let slow = ScriptedAdapter::slow(ProviderId::Gpt, Duration::from_secs(600));
        let config = EvaluationConfig::default().with_call_timeout(Duration::from_secs(1));
        let use_case = EvaluateUseCase::new(config, Arc::new(AllKeys)).with_adapter(slow.clone());
        let mut input = input(Principle::None, &[]);
        input.enabled_models = Some(vec![ProviderId::Gpt]);

        let response = use_case.execute(input).await.unwrap();

        assert_eq!(slow.calls(), 2);
        assert!(response.errors.unwrap()[&ProviderId::Gpt].contains("Timeout"));
    }

    #[tokio::test]
    async fn test_custom_settings_model_is_sent() {
        struct ModelEcho;

        #[async_trait]
        impl ProviderAdapter for ModelEcho {
            fn provider(&self) -> ProviderId {
                ProviderId::Gemini
            }

            async fn invoke(
                &self,
                request: &CompletionRequest,
                _credentials: &Credentials,
            ) -> Result<String, GatewayError> {
                assert_eq!(request.model, "gemini-2.0-flash");
                let schema = request.output_schema.as_ref().unwrap();
                assert_eq!(schema.name, RESULT_SCHEMA_NAME);
                assert_eq!(schema.schema, ModelResult::json_schema());
                Ok(VALID_B.to_string())
            }
        }

        let config = EvaluationConfig::default().with_provider(
            ProviderId::Gemini,
            ProviderSettings::new("gemini-2.0-flash", CredentialSpec::api_key("GOOGLE_API_KEY")),
        );
        let use_case = EvaluateUseCase::new(config, Arc::new(AllKeys)).with_adapter(Arc::new(ModelEcho));
        let mut input = input(Principle::Fairness, &[]);
        input.enabled_models = Some(vec![ProviderId::Gemini]);

        let response = use_case.execute(input).await.unwrap();
        assert!(response.errors.is_none());
    }
}
