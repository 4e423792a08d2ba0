//! 리뷰 도메인 오류.

use thiserror::Error;

/// 도메인 규칙 위반. 생성 파이프라인으로 넘기기 전에 호출자에서 즉시 표면화한다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Please enter at least the student name.")]
    MissingStudentName,
    #[error("focus rating must be between 1 and 5 (got {0})")]
    FocusRatingOutOfRange(u8),
    #[error("a review is already being generated")]
    Busy,
    #[error("unknown review type: {0} (expected ids, g-review or s-review)")]
    UnknownReviewType(String),
}
