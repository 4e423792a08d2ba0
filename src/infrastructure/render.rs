//! 폼/결과/이력을 터미널 표시용 텍스트로 렌더링하는 모듈.

use crate::domain::history::ReviewHistory;
use crate::domain::review::{ComposedPrompt, GeneratedReview, ReviewType};
use crate::domain::session::FormState;

const PREVIEW_CHARS: usize = 60;

/// 현재 폼 값을 표시한다. G-Review는 이름/주제/파닉스 입력을 숨긴다.
pub fn render_form(form: &FormState) -> String {
    let mut out = String::new();
    out.push_str(&format!("Format      : {}\n", form.review_type));
    if form.review_type != ReviewType::GeneralReview {
        out.push_str(&format!("Student     : {}\n", or_dash(&form.student_name)));
        out.push_str(&format!("Topic       : {}\n", or_dash(&form.lesson_topic)));
        out.push_str(&format!("Phonics     : {}\n", or_dash(&form.phonics_info)));
    }
    out.push_str(&format!("Notes       : {}\n", or_dash(&form.session_notes)));
    out.push_str(&format!(
        "Focus       : {} ({}/5)\n",
        stars(form.focus_rating),
        form.focus_rating
    ));
    out
}

/// 생성 결과 본문과 메타 정보를 표시한다.
pub fn render_review(review: &GeneratedReview) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}", review.review_type));
    if let Some(name) = &review.student_name {
        out.push_str(&format!(" for {name}"));
    }
    out.push('\n');
    out.push_str(&format!(
        "- Generated: {}\n\n",
        review.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(review.content.trim());
    out.push('\n');
    out
}

/// 이력 목록(최신순)을 한 줄 요약으로 표시한다.
pub fn render_history(history: &ReviewHistory) -> String {
    if history.is_empty() {
        return "No reviews generated in this session yet.\n".to_string();
    }

    let mut out = String::new();
    for (idx, review) in history.iter().enumerate() {
        let who = review.student_name.as_deref().unwrap_or("General");
        out.push_str(&format!(
            "[{idx}] {} {:<8} {:<12} {}\n",
            review.timestamp.format("%H:%M"),
            review.review_type.code(),
            who,
            preview(&review.content, PREVIEW_CHARS)
        ));
    }
    out
}

/// dry-run/미리보기용 프롬프트 표시.
pub fn render_prompt(prompt: &ComposedPrompt) -> String {
    format!(
        "## System Instruction\n\n{}\n\n## Prompt\n\n{}\n",
        prompt.system_instruction.trim(),
        prompt.user_prompt.trim()
    )
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn or_dash(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() { "-" } else { trimmed }
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}
