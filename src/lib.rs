//! eslreview library root.
//! Clean Architecture + DDD 계층을 외부에 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use domain::review::{ComposedPrompt, GeneratedReview};
use domain::session::FormState;
use interface::cli::AppComposition;

/// 라이브러리 직접 호출용 생성 함수. 진행 상황 출력은 끈다.
pub async fn generate(form: &FormState) -> Result<GeneratedReview> {
    let composition = AppComposition::new(true);
    composition
        .generate_usecase()
        .execute(&form.to_request()?)
        .await
}

/// 외부 호출 없이 구성된 프롬프트를 반환한다.
pub fn compose_prompt(form: &FormState) -> Result<ComposedPrompt> {
    Ok(domain::policy::compose(&form.to_request()?)?)
}

/// 설정 점검 JSON 출력용 함수.
pub fn inspect_config_pretty_json() -> Result<String> {
    let composition = AppComposition::default();
    composition.inspect_config_usecase().execute()
}
