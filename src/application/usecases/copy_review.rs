//! 생성된 리뷰를 클립보드로 복사하는 유스케이스.

use tracing::warn;

use crate::application::ports::Clipboard;
use crate::domain::session::{Action, SessionState};

pub struct CopyReviewUseCase<'a> {
    pub clipboard: &'a dyn Clipboard,
}

impl<'a> CopyReviewUseCase<'a> {
    /// 복사 성공 여부를 반환한다. 실패는 로그만 남기고 전파하지 않는다.
    pub async fn execute(&self, text: &str) -> bool {
        match self.clipboard.copy(text).await {
            Ok(()) => true,
            Err(err) => {
                warn!("failed to copy review to clipboard: {err:#}");
                false
            }
        }
    }

    /// 이력 항목(0 = 최신)을 복사하고 결과를 세션 상태에 반영한다.
    /// 복사할 항목이 없으면 상태를 그대로 돌려준다.
    pub async fn execute_in_session(
        &self,
        state: SessionState,
        index: usize,
    ) -> (SessionState, Option<bool>) {
        let Some(text) = state.history.get(index).map(|r| r.content.clone()) else {
            return (state, None);
        };
        let copied = self.execute(&text).await;
        (state.apply(Action::CopyFinished(copied)), Some(copied))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use chrono::Local;

    use super::*;
    use crate::domain::review::{GeneratedReview, ReviewType};

    #[derive(Default)]
    struct MemoryClipboard {
        fail: bool,
        copied: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Clipboard for MemoryClipboard {
        async fn copy(&self, text: &str) -> Result<()> {
            if self.fail {
                bail!("no clipboard command available");
            }
            self.copied.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    fn state_with_review() -> SessionState {
        SessionState::default().apply(Action::GenerationSucceeded(GeneratedReview {
            content: "You did a wonderful job today.".to_string(),
            timestamp: Local::now(),
            review_type: ReviewType::GeneralReview,
            student_name: None,
        }))
    }

    #[tokio::test]
    async fn copies_latest_review() {
        let clipboard = MemoryClipboard::default();
        let use_case = CopyReviewUseCase { clipboard: &clipboard };
        let (state, copied) = use_case.execute_in_session(state_with_review(), 0).await;
        assert_eq!(copied, Some(true));
        assert!(state.copy_success);
        assert_eq!(
            clipboard.copied.lock().expect("lock").as_slice(),
            ["You did a wonderful job today.".to_string()]
        );
    }

    #[tokio::test]
    async fn clipboard_failure_is_not_fatal() {
        let clipboard = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let use_case = CopyReviewUseCase { clipboard: &clipboard };
        let (state, copied) = use_case.execute_in_session(state_with_review(), 0).await;
        assert_eq!(copied, Some(false));
        assert!(!state.copy_success);
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn missing_entry_leaves_state_untouched() {
        let clipboard = MemoryClipboard::default();
        let use_case = CopyReviewUseCase { clipboard: &clipboard };
        let before = state_with_review();
        let (after, copied) = use_case.execute_in_session(before.clone(), 3).await;
        assert_eq!(copied, None);
        assert_eq!(after, before);
    }
}
