//! 애플리케이션 조립(composition root) 모듈.

use crate::application::ports::Clipboard;
use crate::application::usecases::copy_review::CopyReviewUseCase;
use crate::application::usecases::generate_review::GenerateReviewUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::infrastructure::adapters::{
    CommandClipboard, ConsoleReporter, GeneratorFactoryAdapter, JsonConfigRepository,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    generator_factory: GeneratorFactoryAdapter,
    reporter: ConsoleReporter,
    clipboard: Box<dyn Clipboard>,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AppComposition {
    /// 진행 상황 출력 여부를 받아 실행 조합을 생성한다.
    pub fn new(quiet: bool) -> Self {
        Self::with_clipboard(quiet, Box::new(CommandClipboard))
    }

    /// 클립보드 어댑터를 외부에서 주입한다.
    pub fn with_clipboard(quiet: bool, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            config_repo: JsonConfigRepository,
            generator_factory: GeneratorFactoryAdapter,
            reporter: ConsoleReporter::new(quiet),
            clipboard,
        }
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 리뷰 생성 유스케이스를 생성한다.
    pub fn generate_usecase(&self) -> GenerateReviewUseCase<'_> {
        GenerateReviewUseCase {
            config_repo: &self.config_repo,
            generator_factory: &self.generator_factory,
            reporter: &self.reporter,
        }
    }

    /// 클립보드 복사 유스케이스를 생성한다.
    pub fn copy_usecase(&self) -> CopyReviewUseCase<'_> {
        CopyReviewUseCase {
            clipboard: self.clipboard.as_ref(),
        }
    }
}
