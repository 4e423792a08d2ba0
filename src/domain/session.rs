//! 폼/결과/이력 상태와 액션 기반 전이 규칙.
//!
//! 상태는 액션마다 새 스냅샷으로 교체된다(`apply(self, action) -> Self`).

use crate::domain::error::ReviewError;
use crate::domain::history::ReviewHistory;
use crate::domain::review::{
    DEFAULT_FOCUS_RATING, GeneratedReview, MAX_FOCUS_RATING, MIN_FOCUS_RATING, ReviewRequest,
    ReviewType,
};

/// 입력 폼 텍스트 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    StudentName,
    LessonTopic,
    PhonicsInfo,
    SessionNotes,
}

/// 사용자가 편집 중인 폼 값.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub review_type: ReviewType,
    pub student_name: String,
    pub lesson_topic: String,
    pub phonics_info: String,
    pub session_notes: String,
    pub focus_rating: u8,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            review_type: ReviewType::default(),
            student_name: String::new(),
            lesson_topic: String::new(),
            phonics_info: String::new(),
            session_notes: String::new(),
            focus_rating: DEFAULT_FOCUS_RATING,
        }
    }
}

impl FormState {
    fn with_field(mut self, field: FormField, value: String) -> Self {
        match field {
            FormField::StudentName => self.student_name = value,
            FormField::LessonTopic => self.lesson_topic = value,
            FormField::PhonicsInfo => self.phonics_info = value,
            FormField::SessionNotes => self.session_notes = value,
        }
        self
    }

    /// 현재 폼 값으로 요청을 만든다. 이름이 필요한 형식은 빈 이름을 거부한다.
    pub fn to_request(&self) -> Result<ReviewRequest, ReviewError> {
        if self.review_type.requires_student_name() && self.student_name.trim().is_empty() {
            return Err(ReviewError::MissingStudentName);
        }

        Ok(ReviewRequest {
            review_type: self.review_type,
            student_name: self.student_name.clone(),
            lesson_topic: self.lesson_topic.clone(),
            phonics_info: self.phonics_info.clone(),
            session_notes: self.session_notes.clone(),
            focus_rating: self.focus_rating,
        })
    }
}

/// 단발성 생성 실행 옵션(CLI/라이브러리 호출용).
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub form: FormState,
    /// 외부 호출 없이 구성된 프롬프트만 출력
    pub dry_run: bool,
}

/// 세션 상태 전이 액션.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetType(ReviewType),
    SetField(FormField, String),
    SetFocusRating(u8),
    GenerationStarted,
    GenerationSucceeded(GeneratedReview),
    GenerationFailed,
    ClearForm,
    CopyFinished(bool),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub form: FormState,
    pub busy: bool,
    pub result: Option<GeneratedReview>,
    pub history: ReviewHistory,
    pub copy_success: bool,
}

impl SessionState {
    /// 액션을 적용한 새 상태를 반환한다.
    pub fn apply(self, action: Action) -> Self {
        match action {
            Action::SetType(review_type) => Self {
                form: FormState {
                    review_type,
                    ..self.form
                },
                ..self
            },
            Action::SetField(field, value) => Self {
                form: self.form.with_field(field, value),
                ..self
            },
            // 화면은 1~5 별점만 제공하므로 범위 밖 입력은 가장 가까운 값으로 맞춘다.
            Action::SetFocusRating(rating) => Self {
                form: FormState {
                    focus_rating: rating.clamp(MIN_FOCUS_RATING, MAX_FOCUS_RATING),
                    ..self.form
                },
                ..self
            },
            Action::GenerationStarted => Self { busy: true, ..self },
            Action::GenerationSucceeded(review) => {
                let mut history = self.history;
                history.record(review.clone());
                Self {
                    busy: false,
                    result: Some(review),
                    history,
                    copy_success: false,
                    ..self
                }
            }
            Action::GenerationFailed => Self {
                busy: false,
                ..self
            },
            Action::ClearForm => Self {
                form: FormState::default(),
                result: None,
                copy_success: false,
                ..self
            },
            Action::CopyFinished(success) => Self {
                copy_success: success,
                ..self
            },
        }
    }

    /// 생성 시작 전 검증. 진행 중이면 재요청을 막는다.
    pub fn submit(&self) -> Result<ReviewRequest, ReviewError> {
        if self.busy {
            return Err(ReviewError::Busy);
        }
        self.form.to_request()
    }
}
