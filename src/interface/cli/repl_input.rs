//! REPL 입력 처리기.
//! `/`로 시작하면 입력 중 실시간으로 명령 추천과 인자 검증 힌트를 표시한다.

use std::env;
use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::history::HISTORY_LIMIT;
use crate::domain::review::{MAX_FOCUS_RATING, MIN_FOCUS_RATING, ReviewType};

pub(crate) struct Suggestion {
    pub slash: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

pub(crate) const SUGGESTIONS: [Suggestion; 14] = [
    Suggestion { slash: "/generate", description: "generate a review from the form", usage: "/generate" },
    Suggestion { slash: "/type", description: "choose review format", usage: "/type <ids|g|s>" },
    Suggestion { slash: "/name", description: "set student name", usage: "/name <text>" },
    Suggestion { slash: "/topic", description: "set lesson topic (optional)", usage: "/topic <text>" },
    Suggestion { slash: "/phonics", description: "set phonics & key words", usage: "/phonics <text>" },
    Suggestion { slash: "/notes", description: "set class notes/transcript", usage: "/notes <text>" },
    Suggestion { slash: "/focus", description: "set student focus rating", usage: "/focus <1-5>" },
    Suggestion { slash: "/show", description: "show current form and last result", usage: "/show" },
    Suggestion { slash: "/prompt", description: "preview the composed prompt", usage: "/prompt" },
    Suggestion { slash: "/history", description: "list reviews from this session", usage: "/history" },
    Suggestion { slash: "/copy", description: "copy a review to the clipboard", usage: "/copy [index]" },
    Suggestion { slash: "/clear", description: "reset the form", usage: "/clear" },
    Suggestion { slash: "/config", description: "show effective merged config", usage: "/config" },
    Suggestion { slash: "/exit", description: "exit interactive shell", usage: "/exit" },
];

/// Enter 시 바로 실행하지 않고 인자 입력 상태로 확장하는 명령.
const NEEDS_ARGUMENT: &[&str] = &["/type", "/name", "/topic", "/phonics", "/notes", "/focus"];
const TYPE_CHOICES: [&str; 3] = ["ids", "g-review", "s-review"];
const PROMPT_PREFIX: &str = "> ";
// 입력 영역 기본 높이: 상단 구분선 + 입력줄 + 하단 구분선
const PANEL_BASE_HEIGHT: usize = 3;

/// REPL 한 줄 입력을 읽는다.
/// - TTY + 지원 터미널: 실시간 추천 + 방향키 선택
/// - non-TTY/미지원 터미널: 일반 라인 입력
pub fn read_repl_input(prefill: Option<&str>) -> Result<Option<String>> {
    let initial = prefill.unwrap_or_default();

    if !supports_interactive_input() {
        return read_line_fallback(initial);
    }

    match read_line_interactive(initial) {
        Ok(v) => Ok(v),
        Err(_) => read_line_fallback(initial),
    }
}

fn supports_interactive_input() -> bool {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return false;
    }

    // dumb 터미널에서는 제어 시퀀스 기반 UI를 비활성화한다.
    !matches!(env::var("TERM"), Ok(term) if term.eq_ignore_ascii_case("dumb"))
}

fn read_line_fallback(initial: &str) -> Result<Option<String>> {
    print!("eslreview> {initial}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let typed = line.trim_end_matches(['\n', '\r']).to_string();
    if initial.is_empty() || typed.starts_with('/') {
        return Ok(Some(typed));
    }
    Ok(Some(format!("{initial}{typed}")))
}

/// 편집 중인 입력줄과 커서(문자 단위) 상태.
struct LineEditor {
    text: String,
    cursor: usize,
}

impl LineEditor {
    fn new(initial: &str) -> Self {
        Self {
            text: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    fn replace(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.text = text;
    }

    fn insert(&mut self, ch: char) {
        let idx = byte_index_at_char(&self.text, self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    fn remove_at(&mut self, char_idx: usize) {
        let start = byte_index_at_char(&self.text, char_idx);
        let end = byte_index_at_char(&self.text, char_idx + 1);
        if start < end {
            self.text.replace_range(start..end, "");
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.remove_at(self.cursor);
        }
    }

    fn move_to(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.text.chars().count());
    }
}

fn read_line_interactive(initial: &str) -> Result<Option<String>> {
    let mut stdout = io::stdout();
    let _guard = RawModeGuard::enter(&mut stdout)?;

    let mut line = LineEditor::new(initial);
    let mut selected = 0usize;

    loop {
        let suggestions = match_suggestions(&line.text);
        selected = selected.min(suggestions.len().saturating_sub(1));
        render_frame(&mut stdout, &line, &suggestions, selected)?;

        let key = match event::read()? {
            Event::Paste(text) => {
                text.chars().for_each(|ch| line.insert(ch));
                continue;
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        match key.code {
            KeyCode::Enter => {
                if let Some(expanded) = expand_input(&line.text, &suggestions, selected) {
                    line.replace(expanded);
                    continue;
                }
                let submitted = finalize_input(&line.text, &suggestions, selected);
                clear_screen(&mut stdout)?;
                return Ok(Some(submitted));
            }
            KeyCode::Backspace => line.backspace(),
            KeyCode::Delete => line.delete(),
            KeyCode::Left => line.move_to(line.cursor.saturating_sub(1)),
            KeyCode::Right => line.move_to(line.cursor + 1),
            KeyCode::Home => line.move_to(0),
            KeyCode::End => line.move_to(usize::MAX),
            KeyCode::Up => selected = selected.saturating_sub(1),
            KeyCode::Down => selected = (selected + 1).min(suggestions.len().saturating_sub(1)),
            KeyCode::Tab => {
                if let Some(item) = suggestions.get(selected) {
                    line.replace(item.slash.to_string());
                } else if let Some(completed) = complete_type_argument(&line.text) {
                    line.replace(completed);
                }
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                clear_screen(&mut stdout)?;
                return Ok(None);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                clear_screen(&mut stdout)?;
                return Ok(Some("/exit".to_string()));
            }
            KeyCode::Char(ch)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                line.insert(ch);
            }
            _ => {}
        }
    }
}

/// 공백 없는 `/...` 입력에 대해 접두어가 맞는 명령을 추천한다.
pub(crate) fn match_suggestions(input: &str) -> Vec<&'static Suggestion> {
    if !input.starts_with('/') || input.contains(' ') {
        return Vec::new();
    }

    let query = input.to_ascii_lowercase();
    SUGGESTIONS
        .iter()
        .filter(|s| s.slash.starts_with(&query))
        .collect()
}

fn finalize_input(input: &str, suggestions: &[&Suggestion], selected: usize) -> String {
    match suggestions.get(selected) {
        Some(item) if !input.contains(' ') => item.slash.to_string(),
        _ => input.to_string(),
    }
}

/// 인자가 필요한 명령을 단독 입력 시 공백을 추가해 확장한다.
pub(crate) fn expand_input(
    input: &str,
    suggestions: &[&Suggestion],
    selected: usize,
) -> Option<String> {
    if input.contains(' ') {
        return None;
    }

    let command = suggestions
        .get(selected)
        .map(|item| item.slash)
        .unwrap_or(input);
    NEEDS_ARGUMENT
        .contains(&command)
        .then(|| format!("{command} "))
}

/// `/type` 인자를 유일한 후보로 완성한다.
pub(crate) fn complete_type_argument(input: &str) -> Option<String> {
    let rest = input.strip_prefix("/type ")?.trim().to_ascii_lowercase();
    let mut matches = TYPE_CHOICES.iter().filter(|c| c.starts_with(&rest));
    match (matches.next(), matches.next()) {
        (Some(only), None) if *only != rest => Some(format!("/type {only}")),
        _ => None,
    }
}

/// 명령별 인자 검증 결과를 실시간 힌트로 반환한다.
pub(crate) fn realtime_hint(input: &str) -> Option<(Color, String)> {
    let trimmed = input.trim_start();
    let (command, rest) = match trimmed.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    let hint = |text: &str| Some((Color::Yellow, format!("hint: {text}")));
    let ready = |text: String| Some((Color::Green, format!("ready: {text}")));
    let error = |text: String| Some((Color::Red, format!("error: {text}")));

    match command {
        "/focus" if rest.is_empty() => hint("/focus <1-5>"),
        "/focus" => match rest.parse::<u8>() {
            Ok(n) if (MIN_FOCUS_RATING..=MAX_FOCUS_RATING).contains(&n) => {
                ready(format!("focus {n}/5, press Enter to apply"))
            }
            _ => error(format!("focus must be {MIN_FOCUS_RATING}-{MAX_FOCUS_RATING}")),
        },
        "/type" if rest.is_empty() => hint("/type <ids|g|s>"),
        "/type" => match rest.parse::<ReviewType>() {
            Ok(review_type) => ready(format!("switch to {review_type}")),
            Err(err) => error(err.to_string()),
        },
        "/copy" if rest.is_empty() => ready("copy the latest review".to_string()),
        "/copy" => match rest.parse::<usize>() {
            Ok(n) if n < HISTORY_LIMIT => ready(format!("copy history entry [{n}]")),
            _ => error(format!("index must be 0-{}", HISTORY_LIMIT - 1)),
        },
        "/name" | "/topic" | "/phonics" | "/notes" if rest.is_empty() => {
            hint(&format!("{command} <text> (empty clears the field)"))
        }
        "/name" | "/topic" | "/phonics" | "/notes" => {
            ready(format!("set {} to \"{rest}\"", command.trim_start_matches('/')))
        }
        _ => None,
    }
}

fn render_frame(
    stdout: &mut io::Stdout,
    line: &LineEditor,
    suggestions: &[&Suggestion],
    selected: usize,
) -> Result<()> {
    let (w, h) = terminal::size().unwrap_or((120, 40));
    // 패널 배경의 우측 끊김을 막기 위해 터미널 전체 폭을 사용한다.
    let width = (w as usize).max(20);
    let total_rows = h as usize;

    let hint = realtime_hint(&line.text);
    let panel_height = PANEL_BASE_HEIGHT + usize::from(hint.is_some()) + suggestions.len();
    let panel_top = total_rows.saturating_sub(panel_height);
    let input_row = panel_top + 1;

    // 이전 프레임 잔상을 지우기 위해 가능한 최대 영역을 클리어한다.
    let max_panel_height = PANEL_BASE_HEIGHT + 1 + SUGGESTIONS.len();
    for row in total_rows.saturating_sub(max_panel_height)..total_rows {
        execute!(
            stdout,
            cursor::MoveTo(0, row as u16),
            terminal::Clear(ClearType::CurrentLine)
        )?;
    }

    let divider = "─".repeat(width);
    draw_line(stdout, panel_top, &divider, width, Color::White, true)?;
    if line.text.is_empty() {
        let placeholder = prompt_line("/ Enter run · ↑↓ select · Tab autocomplete", width);
        draw_line(stdout, input_row, &placeholder, width, Color::Grey, true)?;
    } else {
        draw_line(stdout, input_row, &prompt_line(&line.text, width), width, Color::White, true)?;
    }
    draw_line(stdout, panel_top + 2, &divider, width, Color::White, true)?;

    let mut row = panel_top + 3;
    if let Some((color, text)) = hint {
        draw_line(stdout, row, &text, width, color, false)?;
        row += 1;
    }
    for (idx, item) in suggestions.iter().enumerate() {
        let marker = if idx == selected { ">" } else { " " };
        let text = format!(
            "{marker} {:<10} - {} | usage: {}",
            item.slash, item.description, item.usage
        );
        draw_line(stdout, row, &text, width, Color::White, false)?;
        row += 1;
    }

    let col = cursor_col(line, width) as u16;
    execute!(stdout, cursor::MoveTo(col, input_row as u16), cursor::Show)?;
    stdout.flush()?;
    Ok(())
}

/// 한 줄을 그린다. `panel`이면 입력 영역 배경색을 적용한다.
fn draw_line(
    stdout: &mut io::Stdout,
    row: usize,
    text: &str,
    width: usize,
    fg: Color,
    panel: bool,
) -> Result<()> {
    execute!(stdout, cursor::MoveTo(0, row as u16))?;
    if panel {
        execute!(stdout, SetBackgroundColor(Color::DarkGrey))?;
    }
    execute!(
        stdout,
        SetForegroundColor(fg),
        terminal::Clear(ClearType::CurrentLine)
    )?;
    write!(stdout, "{}", pad_display(&clip_display(text, width), width))?;
    execute!(stdout, ResetColor)?;
    Ok(())
}

fn prompt_line(input: &str, width: usize) -> String {
    let available = width.saturating_sub(display_width(PROMPT_PREFIX));
    clip_display(
        &format!("{PROMPT_PREFIX}{}", tail_display(input, available)),
        width,
    )
}

fn cursor_col(line: &LineEditor, width: usize) -> usize {
    let prefix = display_width(PROMPT_PREFIX);
    let available = width.saturating_sub(prefix);
    let last_col = width.saturating_sub(1);

    if display_width(&line.text) <= available {
        let before: String = line.text.chars().take(line.cursor).collect();
        return (prefix + display_width(&before)).min(last_col);
    }

    // 오버플로우 시에는 tail 표시 정책상 커서를 입력 끝쪽에 둔다.
    (prefix + display_width(&tail_display(&line.text, available))).min(last_col)
}

/// 폭을 넘으면 앞부분을 `...`으로 줄여 끝부분을 보여준다.
pub(crate) fn tail_display(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut used = 0usize;
    let mut tail: Vec<char> = Vec::new();
    for ch in text.chars().rev() {
        let cw = char_width(ch);
        if used + cw > budget {
            break;
        }
        tail.push(ch);
        used += cw;
    }
    tail.reverse();
    format!("...{}", tail.into_iter().collect::<String>())
}

/// 폭을 넘으면 뒷부분을 `...`으로 자른다.
pub(crate) fn clip_display(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let cw = char_width(ch);
        if used + cw > budget {
            break;
        }
        out.push(ch);
        used += cw;
    }
    out.push_str("...");
    out
}

fn pad_display(text: &str, width: usize) -> String {
    let used = display_width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}

fn clear_screen(stdout: &mut io::Stdout) -> Result<()> {
    // 명령 실행 출력은 항상 상단에서 시작하도록 화면을 정리한다.
    execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(ClearType::All),
        ResetColor,
        cursor::Show
    )?;
    stdout.flush()?;
    Ok(())
}

// unicode-width 크레이트로 터미널 표시 폭을 계산한다.
fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn byte_index_at_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter(stdout: &mut io::Stdout) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout, cursor::Show)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, ResetColor);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_filter_by_prefix() {
        let slashes: Vec<&str> = match_suggestions("/c").iter().map(|s| s.slash).collect();
        assert_eq!(slashes, vec!["/copy", "/clear", "/config"]);
        assert_eq!(match_suggestions("/").len(), SUGGESTIONS.len());
        assert!(match_suggestions("/name Leo").is_empty());
        assert!(match_suggestions("name").is_empty());
    }

    #[test]
    fn commands_with_arguments_expand_on_enter() {
        let suggestions = match_suggestions("/fo");
        assert_eq!(expand_input("/fo", &suggestions, 0).as_deref(), Some("/focus "));
        assert_eq!(expand_input("/focus 3", &[], 0), None);

        let suggestions = match_suggestions("/gen");
        assert_eq!(expand_input("/gen", &suggestions, 0), None);
        assert_eq!(finalize_input("/gen", &suggestions, 0), "/generate");
    }

    #[test]
    fn type_argument_completes_unique_choice() {
        assert_eq!(complete_type_argument("/type g").as_deref(), Some("/type g-review"));
        assert_eq!(complete_type_argument("/type s-review"), None);
        assert_eq!(complete_type_argument("/type x"), None);
        assert_eq!(complete_type_argument("/focus 3"), None);
    }

    #[test]
    fn focus_hint_validates_range() {
        let (color, text) = realtime_hint("/focus 4").expect("hint");
        assert_eq!(color, Color::Green);
        assert!(text.contains("4/5"));

        let (color, text) = realtime_hint("/focus 7").expect("hint");
        assert_eq!(color, Color::Red);
        assert!(text.contains("1-5"));
    }

    #[test]
    fn type_and_copy_hints() {
        assert_eq!(realtime_hint("/type").map(|h| h.0), Some(Color::Yellow));
        assert_eq!(realtime_hint("/type s").map(|h| h.0), Some(Color::Green));
        assert_eq!(realtime_hint("/type weekly").map(|h| h.0), Some(Color::Red));
        assert_eq!(realtime_hint("/copy 12").map(|h| h.0), Some(Color::Red));
        assert_eq!(realtime_hint("/generate"), None);
    }

    #[test]
    fn line_editor_handles_multibyte_text() {
        let mut line = LineEditor::new("/name 민");
        line.insert('수');
        assert_eq!(line.text, "/name 민수");
        line.move_to(6);
        line.delete();
        assert_eq!(line.text, "/name 수");
        line.move_to(usize::MAX);
        line.backspace();
        assert_eq!(line.text, "/name ");
    }

    #[test]
    fn display_clipping_respects_width() {
        assert_eq!(clip_display("abcdefgh", 6), "abc...");
        assert_eq!(tail_display("abcdefgh", 6), "...fgh");
        assert_eq!(clip_display("short", 10), "short");
        assert_eq!(tail_display("abc", 2), "..");
    }
}
