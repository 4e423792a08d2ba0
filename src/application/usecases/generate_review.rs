//! 폼 입력부터 프롬프트 구성, 외부 생성 호출, 이력 반영까지의 유스케이스.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing::{debug, error, info};

use crate::application::ports::{ConfigRepository, GeneratorFactory, Reporter, ReviewGenerator};
use crate::domain::policy::compose;
use crate::domain::review::{
    ComposedPrompt, GeneratedReview, GenerationSettings, ProviderResponse, ReviewRequest,
};
use crate::domain::session::{Action, SessionState};

/// 생성 실패 시 사용자에게 보여주는 단일 안내 문구.
pub const GENERATION_FAILED_NOTICE: &str = "Something went wrong. Please try again.";

pub struct GenerateReviewUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub generator_factory: &'a dyn GeneratorFactory,
    pub reporter: &'a dyn Reporter,
}

impl<'a> GenerateReviewUseCase<'a> {
    /// 외부 호출 없이 구성된 프롬프트만 반환한다(dry-run/미리보기).
    pub fn preview(&self, request: &ReviewRequest) -> Result<ComposedPrompt> {
        Ok(compose(request)?)
    }

    /// 리뷰 1건을 생성한다. 재시도는 하지 않는다.
    pub async fn execute(&self, request: &ReviewRequest) -> Result<GeneratedReview> {
        let prompt = compose(request)?;
        debug!(
            review_type = %request.review_type,
            system_len = prompt.system_instruction.len(),
            prompt_len = prompt.user_prompt.len(),
            "composed review prompt"
        );

        let config = self
            .config_repo
            .load()
            .context("failed to load eslreview config")?;
        let settings = config.generation_settings();
        let generator = self.generator_factory.build(&config)?;

        self.reporter.section("Generate");
        self.reporter.kv("Type", request.review_type.code());
        self.reporter.kv("Model", &settings.model);
        self.reporter.status(generator.name(), "waiting for response");

        let timeout = config.timeout();
        let response = match request_text(generator.as_ref(), &prompt, &settings, timeout).await {
            Ok(response) => response,
            Err(err) => {
                self.reporter.status(generator.name(), "failed");
                return Err(err);
            }
        };

        info!(
            review_type = %request.review_type,
            prompt_tokens = ?response.usage.prompt_tokens,
            completion_tokens = ?response.usage.completion_tokens,
            total_tokens = ?response.usage.total_tokens,
            "review generated"
        );
        self.reporter.status(generator.name(), "done");

        Ok(GeneratedReview::from_request(
            request,
            response.content,
            Local::now(),
        ))
    }

    /// 세션 상태 위에서 생성 1회를 수행하고 전이된 상태를 돌려준다.
    /// 검증 실패는 상태를 바꾸지 않고, 생성 실패는 busy만 해제한다.
    /// 사용자에게는 실패 원인 대신 단일 안내 문구만 돌려주고, 원인은 로그로 남긴다.
    pub async fn execute_in_session(&self, state: SessionState) -> (SessionState, Result<()>) {
        let request = match state.submit() {
            Ok(request) => request,
            Err(err) => return (state, Err(err.into())),
        };

        let state = state.apply(Action::GenerationStarted);
        match self.execute(&request).await {
            Ok(review) => (state.apply(Action::GenerationSucceeded(review)), Ok(())),
            Err(err) => {
                error!("review generation failed: {err:#}");
                (
                    state.apply(Action::GenerationFailed),
                    Err(anyhow!(GENERATION_FAILED_NOTICE)),
                )
            }
        }
    }
}

/// 제한 시간 안에 본문을 받아 공백을 정리한다. 빈 본문은 실패로 본다.
async fn request_text(
    generator: &dyn ReviewGenerator,
    prompt: &ComposedPrompt,
    settings: &GenerationSettings,
    timeout: Duration,
) -> Result<ProviderResponse> {
    let name = generator.name();
    let response = tokio::time::timeout(timeout, generator.generate(prompt, settings))
        .await
        .map_err(|_| anyhow!("{name}: no response within {}ms", timeout.as_millis()))??;

    let content = response.content.trim().to_string();
    if content.is_empty() {
        bail!("{name}: empty review text");
    }
    Ok(ProviderResponse { content, ..response })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::application::config::Config;
    use crate::domain::error::ReviewError;
    use crate::domain::review::{ReviewType, TokenUsage};
    use crate::domain::session::FormField;

    struct FixedConfig(Config);

    impl ConfigRepository for FixedConfig {
        fn load(&self) -> Result<Config> {
            Ok(self.0.clone())
        }

        fn inspect_pretty_json(&self) -> Result<String> {
            Ok("{}".to_string())
        }
    }

    #[derive(Clone)]
    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct FakeGenerator {
        reply: Reply,
        seen: std::sync::Arc<Mutex<Vec<(ComposedPrompt, GenerationSettings)>>>,
    }

    #[async_trait]
    impl ReviewGenerator for FakeGenerator {
        fn name(&self) -> &'static str {
            "Fake"
        }

        async fn generate(
            &self,
            prompt: &ComposedPrompt,
            settings: &GenerationSettings,
        ) -> Result<ProviderResponse> {
            self.seen
                .lock()
                .expect("lock")
                .push((prompt.clone(), settings.clone()));
            match self.reply {
                Reply::Text(text) => Ok(ProviderResponse {
                    content: text.to_string(),
                    usage: TokenUsage::default(),
                }),
                Reply::Fail => bail!("Fake: request failed (500)"),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    bail!("unreachable")
                }
            }
        }
    }

    struct FakeFactory {
        reply: Reply,
        seen: std::sync::Arc<Mutex<Vec<(ComposedPrompt, GenerationSettings)>>>,
    }

    impl FakeFactory {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen: Default::default(),
            }
        }
    }

    impl GeneratorFactory for FakeFactory {
        fn build(&self, _config: &Config) -> Result<Box<dyn ReviewGenerator>> {
            Ok(Box::new(FakeGenerator {
                reply: self.reply.clone(),
                seen: self.seen.clone(),
            }))
        }
    }

    struct SilentReporter;

    impl Reporter for SilentReporter {
        fn section(&self, _name: &str) {}
        fn kv(&self, _key: &str, _value: &str) {}
        fn status(&self, _scope: &str, _message: &str) {}
    }

    #[derive(Default)]
    struct StatusLog(Mutex<Vec<String>>);

    impl Reporter for StatusLog {
        fn section(&self, _name: &str) {}
        fn kv(&self, _key: &str, _value: &str) {}
        fn status(&self, scope: &str, message: &str) {
            self.0.lock().expect("lock").push(format!("{scope}: {message}"));
        }
    }

    fn named_state() -> SessionState {
        SessionState::default()
            .apply(Action::SetType(ReviewType::SpecificReview))
            .apply(Action::SetField(FormField::StudentName, "Madison".to_string()))
            .apply(Action::SetField(FormField::SessionNotes, "engaged well".to_string()))
    }

    #[tokio::test]
    async fn success_passes_sampling_settings_and_records_history() {
        let config_repo = FixedConfig(Config::default());
        let factory = FakeFactory::new(Reply::Text("  Dear Madison, great class!  "));
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &SilentReporter,
        };

        let (state, result) = use_case.execute_in_session(named_state()).await;
        assert!(result.is_ok());
        assert!(!state.busy);
        assert_eq!(state.history.len(), 1);
        let latest = state.history.latest().expect("recorded");
        assert_eq!(latest.content, "Dear Madison, great class!");
        assert_eq!(latest.student_name.as_deref(), Some("Madison"));

        let seen = factory.seen.lock().expect("lock");
        let (prompt, settings) = &seen[0];
        assert!(prompt.user_prompt.contains("Madison"));
        assert_eq!(settings.temperature, 1.0);
        assert_eq!(settings.top_p, 0.95);
    }

    #[tokio::test]
    async fn empty_text_is_a_failure() {
        let config_repo = FixedConfig(Config::default());
        let factory = FakeFactory::new(Reply::Text("   "));
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &SilentReporter,
        };

        let (state, result) = use_case.execute_in_session(named_state()).await;
        let err = result.expect_err("empty text must fail");
        assert_eq!(err.to_string(), GENERATION_FAILED_NOTICE);
        assert!(!state.busy);
        assert!(state.history.is_empty());
        assert!(state.result.is_none());
    }

    #[tokio::test]
    async fn provider_error_commits_nothing() {
        let config_repo = FixedConfig(Config::default());
        let factory = FakeFactory::new(Reply::Fail);
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &SilentReporter,
        };

        let (state, result) = use_case.execute_in_session(named_state()).await;
        let err = result.expect_err("provider failure");
        assert_eq!(format!("{err:#}"), GENERATION_FAILED_NOTICE);
        assert!(!state.busy);
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn failure_is_reported_as_failed_status() {
        let config_repo = FixedConfig(Config::default());
        let factory = FakeFactory::new(Reply::Fail);
        let reporter = StatusLog::default();
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &reporter,
        };

        let request = named_state().submit().expect("valid form");
        let err = use_case.execute(&request).await.expect_err("provider failure");
        assert!(format!("{err:#}").contains("request failed (500)"));
        assert_eq!(
            reporter.0.lock().expect("lock").as_slice(),
            ["Fake: waiting for response".to_string(), "Fake: failed".to_string()]
        );
    }

    #[tokio::test]
    async fn hanging_call_times_out() {
        let mut config = Config::default();
        config.defaults.timeout_ms = Some(20);
        let config_repo = FixedConfig(config);
        let factory = FakeFactory::new(Reply::Hang);
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &SilentReporter,
        };

        let request = named_state().submit().expect("valid form");
        let err = use_case.execute(&request).await.expect_err("timeout must fail");
        assert!(format!("{err:#}").contains("no response within 20ms"));

        let (state, result) = use_case.execute_in_session(named_state()).await;
        assert_eq!(
            result.expect_err("timeout must fail").to_string(),
            GENERATION_FAILED_NOTICE
        );
        assert!(!state.busy);
    }

    #[tokio::test]
    async fn missing_name_never_calls_generator() {
        let config_repo = FixedConfig(Config::default());
        let factory = FakeFactory::new(Reply::Text("unused"));
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &SilentReporter,
        };

        let (state, result) = use_case.execute_in_session(SessionState::default()).await;
        let err = result.expect_err("name is required");
        assert_eq!(
            err.downcast_ref::<ReviewError>(),
            Some(&ReviewError::MissingStudentName)
        );
        assert_eq!(state, SessionState::default());
        assert!(factory.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn eleven_generations_keep_ten_newest() {
        let config_repo = FixedConfig(Config::default());
        let factory = FakeFactory::new(Reply::Text("review"));
        let use_case = GenerateReviewUseCase {
            config_repo: &config_repo,
            generator_factory: &factory,
            reporter: &SilentReporter,
        };

        let mut state = SessionState::default().apply(Action::SetType(ReviewType::GeneralReview));
        for n in 1..=11u8 {
            state = state.apply(Action::SetFocusRating(n % 5 + 1));
            let (next, result) = use_case.execute_in_session(state).await;
            assert!(result.is_ok());
            state = next;
        }
        assert_eq!(state.history.len(), 10);
        assert_eq!(factory.seen.lock().expect("lock").len(), 11);
    }
}
