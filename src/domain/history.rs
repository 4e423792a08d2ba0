//! 세션 동안만 유지되는 생성 이력.

use std::collections::VecDeque;

use crate::domain::review::GeneratedReview;

pub const HISTORY_LIMIT: usize = 10;

/// 최신순으로 최대 `HISTORY_LIMIT`건을 보관하는 이력.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewHistory {
    entries: VecDeque<GeneratedReview>,
}

impl ReviewHistory {
    /// 새 결과를 맨 앞에 넣고, 용량을 넘는 가장 오래된 항목을 버린다.
    pub fn record(&mut self, review: GeneratedReview) {
        self.entries.push_front(review);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// 최신순 조회.
    pub fn iter(&self) -> impl Iterator<Item = &GeneratedReview> {
        self.entries.iter()
    }

    /// 0 = 가장 최근 항목.
    pub fn get(&self, index: usize) -> Option<&GeneratedReview> {
        self.entries.get(index)
    }

    pub fn latest(&self) -> Option<&GeneratedReview> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
