//! 생성기 팩토리 포트 구현 어댑터.

use anyhow::Result;

use crate::application::config::Config;
use crate::application::ports::{GeneratorFactory, ReviewGenerator};
use crate::infrastructure::providers;

/// 설정에서 HTTP provider를 구성하는 팩토리 어댑터.
pub struct GeneratorFactoryAdapter;

impl GeneratorFactory for GeneratorFactoryAdapter {
    fn build(&self, config: &Config) -> Result<Box<dyn ReviewGenerator>> {
        providers::build_generator(config)
    }
}
