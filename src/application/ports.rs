//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::Config;
use crate::domain::review::{ComposedPrompt, GenerationSettings, ProviderResponse};

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 외부 텍스트 생성 서비스 포트.
#[async_trait]
pub trait ReviewGenerator: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        settings: &GenerationSettings,
    ) -> Result<ProviderResponse>;
}

/// 설정에 맞는 생성기를 구성하는 팩토리 포트.
pub trait GeneratorFactory: Send + Sync {
    fn build(&self, config: &Config) -> Result<Box<dyn ReviewGenerator>>;
}

/// 클립보드 복사 포트.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy(&self, text: &str) -> Result<()>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
}
