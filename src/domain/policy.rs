//! 도메인 정책(리뷰 프롬프트 구성, 집중도 톤 규칙).

use crate::domain::error::ReviewError;
use crate::domain::review::{
    ComposedPrompt, MAX_FOCUS_RATING, MIN_FOCUS_RATING, ReviewRequest, ReviewType,
};

/// 모든 형식에 공통으로 쓰는 시스템 지시문.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional ESL teacher's assistant. \
You write encouraging, very simple English reviews (A1-A2 level).
You avoid complex words. You NEVER use bullet points. You use 'class' instead of 'session'.
CRITICAL: This is a ONE-ON-ONE lesson. There is only one teacher and one student.
NEVER use 'us' or 'we'. ALWAYS use 'me' or 'I' when referring to the teacher-student interaction \
(e.g., 'he told me' instead of 'he told us').";

/// 어떤 형식에서도 쓰면 안 되는 일반 연습 분류 문구.
pub const BANNED_PHRASE: &str = "General English Practice";

pub const GENERAL_LENGTH: &str = "120-160 words";
pub const SPECIFIC_LENGTH: &str = "120-150 words";

/// 집중도 점수를 톤 지시문으로 변환한다.
/// 1..=5 밖의 값은 톤을 추측하지 않고 도메인 오류로 거부한다.
pub fn focus_detail(rating: u8) -> Result<String, ReviewError> {
    if !(MIN_FOCUS_RATING..=MAX_FOCUS_RATING).contains(&rating) {
        return Err(ReviewError::FocusRatingOutOfRange(rating));
    }

    let detail = match rating {
        5 => "The student's focus was absolutely perfect (5/5). Use words like 'outstanding concentration', \
'incredible energy', and 'exceptional focus'. Make this a major highlight of the review."
            .to_string(),
        4 => "The student had great focus (4/5). Praise their attention and how it helped them learn faster."
            .to_string(),
        3 => "The student's focus was okay (3/5). Encourage them to stay a bit more concentrated next time \
to catch every detail."
            .to_string(),
        low => format!(
            "The student's focus was low ({low}/5). Address this gently but clearly. Mention that staying \
focused is key to learning and encourage them to try harder to listen to me next time."
        ),
    };
    Ok(detail)
}

/// 리뷰 요청을 시스템 지시문 + 사용자 프롬프트로 변환한다.
/// 순수 함수이며 같은 입력에는 항상 같은 출력을 만든다.
pub fn compose(request: &ReviewRequest) -> Result<ComposedPrompt, ReviewError> {
    let focus = focus_detail(request.focus_rating)?;

    let user_prompt = match request.review_type {
        ReviewType::IndividualDetailedSummary => build_detailed_prompt(request, &focus),
        ReviewType::GeneralReview => build_general_prompt(&focus),
        ReviewType::SpecificReview => build_specific_prompt(request, &focus),
    };

    Ok(ComposedPrompt {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        user_prompt,
    })
}

fn build_detailed_prompt(request: &ReviewRequest, focus: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Generate a detailed IDS review for {} for a one-on-one class.\n\n",
        request.student_name
    ));

    out.push_str("Details to include:\n");
    if let Some(topic) = present(&request.lesson_topic) {
        out.push_str(&format!("- Topic: {topic}\n"));
    }
    if let Some(phonics) = present(&request.phonics_info) {
        out.push_str(&format!("- Phonics & Words: {phonics}\n"));
    }
    out.push_str(&format!("- Engagement Context: {focus}\n"));
    if let Some(notes) = present(&request.session_notes) {
        out.push_str(&format!("- Transcript/Notes: {notes}\n"));
    }
    out.push('\n');

    out.push_str("STRICT FORMAT REQUIREMENTS:\n");
    out.push_str("1. USE EXACT HEADINGS: 'Improvements:', 'Difficulties:', and 'Suggestions:'.\n");
    out.push_str("2. NO BULLET POINTS. Use only rich, detailed paragraphs.\n");
    out.push_str(
        "3. 'Improvements:' must be a long paragraph covering EVERYTHING from the notes/transcript and phonics.\n",
    );
    out.push_str(&format!(
        "4. Integrate the focus rating ({}/5) deeply into the 'Improvements' or as a concluding positive reinforcement.\n",
        request.focus_rating
    ));
    out.push_str(
        "5. REMEMBER: This is one-on-one. Use \"I\" and \"me\", never \"we\" or \"us\".\n",
    );
    out
}

fn build_general_prompt(focus: &str) -> String {
    let mut out = String::new();
    out.push_str("Generate a GENERAL ESL review for a one-on-one class.\n");
    out.push_str("RULES:\n");
    out.push_str("- NO names. NO specific lesson content. NO phonics.\n");
    out.push_str(&format!(
        "- DO NOT mention \"{BANNED_PHRASE}\" or \"session\". Use \"class\".\n"
    ));
    out.push_str("- ALWAYS use 'you' & 'your'.\n");
    out.push_str("- Refer to the interaction as between 'you' and 'me'. NEVER use 'us'.\n");
    out.push_str(&format!(
        "- Focus context: {focus} (Make the focus/engagement the central theme of this review).\n"
    ));
    out.push_str(
        "- STERN RULE: Must be 100% unique, fresh, and creative. Never recycle sentences.\n",
    );
    out.push_str("- TONE: Warm, personal, and encouraging.\n");
    out.push_str(&format!("- LENGTH: {GENERAL_LENGTH}.\n"));
    out.push_str("- No bullet points.\n");
    out
}

fn build_specific_prompt(request: &ReviewRequest, focus: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Generate a SPECIFIC student review for {} for a one-on-one class.\n",
        request.student_name
    ));
    out.push_str("RULES:\n");
    match (present(&request.session_notes), present(&request.phonics_info)) {
        (Some(notes), Some(phonics)) => out.push_str(&format!(
            "- Incorporate BOTH the transcript notes ({notes}) and the phonics/words ({phonics}).\n"
        )),
        (Some(notes), None) => {
            out.push_str(&format!("- Incorporate the transcript notes ({notes}).\n"))
        }
        (None, Some(phonics)) => {
            out.push_str(&format!("- Incorporate the phonics/words ({phonics}).\n"))
        }
        // 수업 내용이 없으면 집중도와 일반적인 격려를 중심으로 쓴다.
        (None, None) => {
            out.push_str("- Base the message on the student's focus and effort in class.\n")
        }
    }
    if let Some(topic) = present(&request.lesson_topic) {
        out.push_str(&format!("- Mention the topic ({topic}).\n"));
    }
    out.push_str(&format!("- DO NOT use the phrase \"{BANNED_PHRASE}\".\n"));
    out.push_str("- Use the word \"class\" instead of \"session\".\n");
    out.push_str("- TONE: Personal letter style using 'you' and 'your'.\n");
    out.push_str(&format!(
        "- Focus: {focus} (Ensure the focus rating significantly changes the tone of the message).\n"
    ));
    out.push_str("- Refer to yourself as 'I' or 'me'. NEVER use 'us' or 'we'.\n");
    out.push_str(&format!("- LENGTH: {SPECIFIC_LENGTH}.\n"));
    out.push_str("- No bullet points.\n");
    out
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
