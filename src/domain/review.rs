//! 리뷰 도메인 엔티티/값 객체.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::domain::error::ReviewError;

pub const MIN_FOCUS_RATING: u8 = 1;
pub const MAX_FOCUS_RATING: u8 = 5;
pub const DEFAULT_FOCUS_RATING: u8 = MAX_FOCUS_RATING;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_TOP_P: f32 = 0.95;

/// 리뷰 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewType {
    /// 섹션형 상세 요약(IDS)
    #[default]
    IndividualDetailedSummary,
    /// 이름/내용 없는 일반 리뷰
    GeneralReview,
    /// 학생 개인 편지형 리뷰
    SpecificReview,
}

impl ReviewType {
    pub const ALL: [ReviewType; 3] = [
        Self::IndividualDetailedSummary,
        Self::GeneralReview,
        Self::SpecificReview,
    ];

    /// 화면/이력 표기용 코드값.
    pub fn code(self) -> &'static str {
        match self {
            Self::IndividualDetailedSummary => "IDS",
            Self::GeneralReview => "G-Review",
            Self::SpecificReview => "S-Review",
        }
    }

    /// 학생 이름이 필요한 형식인지 여부.
    pub fn requires_student_name(self) -> bool {
        !matches!(self, Self::GeneralReview)
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReviewType {
    type Err = ReviewError;

    /// 지원값: ids, g/g-review/general, s/s-review/specific (대소문자 무시)
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ids" | "i" | "detailed" => Ok(Self::IndividualDetailedSummary),
            "g" | "g-review" | "general" => Ok(Self::GeneralReview),
            "s" | "s-review" | "specific" => Ok(Self::SpecificReview),
            _ => Err(ReviewError::UnknownReviewType(raw.trim().to_string())),
        }
    }
}

/// 생성 1회분 입력. 폼 상태에서 매번 새로 만들어지며 저장되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub review_type: ReviewType,
    pub student_name: String,
    pub lesson_topic: String,
    pub phonics_info: String,
    pub session_notes: String,
    pub focus_rating: u8,
}

/// 외부 생성 호출에 그대로 넘길 지시문 묶음.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// 생성 호출의 샘플링 설정.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub usage: TokenUsage,
}

/// 생성 성공 1건. 이력에 들어간 뒤에는 변경되지 않는다.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReview {
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub review_type: ReviewType,
    pub student_name: Option<String>,
}

impl GeneratedReview {
    /// 요청 정보를 바탕으로 결과를 만든다. G-Review는 이름을 남기지 않는다.
    pub fn from_request(
        request: &ReviewRequest,
        content: String,
        timestamp: DateTime<Local>,
    ) -> Self {
        let student_name = request
            .review_type
            .requires_student_name()
            .then(|| request.student_name.trim().to_string());

        Self {
            content,
            timestamp,
            review_type: request.review_type,
            student_name,
        }
    }
}
