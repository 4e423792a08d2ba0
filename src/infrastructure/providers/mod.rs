//! 외부 텍스트 생성 provider 모듈.
//! HTTP API를 호출하고 결과/사용량을 표준화한다.

mod api_runner;
pub mod gemini;

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::ReviewGenerator;

/// 설정에 맞는 생성기를 구성한다. 현재는 Gemini만 지원한다.
pub fn build_generator(config: &Config) -> Result<Box<dyn ReviewGenerator>> {
    Ok(Box::new(gemini::GeminiProvider::from_config(config)?))
}
