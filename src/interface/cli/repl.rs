//! `eslreview` 대화형 쉘(REPL) 인터페이스.
//! 세션 상태(폼/결과/이력)는 REPL 루프가 소유하고 명령마다 새 상태로 교체한다.

use std::io::{self, IsTerminal, Write};

use anyhow::{Result, anyhow};

use crate::domain::history::HISTORY_LIMIT;
use crate::domain::review::{MAX_FOCUS_RATING, MIN_FOCUS_RATING, ReviewType};
use crate::domain::session::{Action, FormField, SessionState};
use crate::infrastructure::render::{render_form, render_history, render_prompt, render_review};
use crate::interface::cli::composition::AppComposition;
use crate::interface::cli::repl_input::read_repl_input;

/// 대화형 입력으로 `/command`를 처리한다.
pub async fn run_repl(composition: &AppComposition) -> Result<()> {
    print_welcome(composition);
    io::stdout().flush()?;

    let mut state = SessionState::default();
    let mut next_prefill: Option<String> = None;

    loop {
        let prefill = next_prefill.take();
        let Some(raw_input) = read_repl_input(prefill.as_deref())? else {
            println!();
            break;
        };
        let input = raw_input.trim();
        if input.is_empty() {
            continue;
        }

        match parse_repl_command(input) {
            Ok(ReplCommand::Exit) => break,
            Ok(ReplCommand::NeedsArgs(command)) => {
                // 인자가 빠진 명령은 입력창에 재프리필한다.
                next_prefill = Some(format!("{command} "));
            }
            Ok(cmd) => {
                let (next, outcome) = execute_command(composition, state, cmd).await;
                state = next;
                if let Err(err) = outcome {
                    eprintln!("error: {err:#}");
                }
            }
            Err(msg) => {
                eprintln!("error: {msg}");
                eprintln!("hint: start typing / for command suggestions");
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    /// 인자가 필요한 명령만 입력된 상태. 다음 입력 라운드에 프리필한다.
    NeedsArgs(&'static str),
    SetType(ReviewType),
    SetField(FormField, String),
    SetFocus(u8),
    Show,
    Prompt,
    Generate,
    History,
    Copy(usize),
    Clear,
    InspectConfig,
}

async fn execute_command(
    composition: &AppComposition,
    state: SessionState,
    command: ReplCommand,
) -> (SessionState, Result<()>) {
    match command {
        ReplCommand::Exit | ReplCommand::NeedsArgs(_) => (state, Ok(())),
        ReplCommand::SetType(review_type) => {
            let state = state.apply(Action::SetType(review_type));
            print!("{}", render_form(&state.form));
            (state, Ok(()))
        }
        ReplCommand::SetField(field, value) => {
            (state.apply(Action::SetField(field, value)), Ok(()))
        }
        ReplCommand::SetFocus(rating) => {
            let state = state.apply(Action::SetFocusRating(rating));
            print!("{}", render_form(&state.form));
            (state, Ok(()))
        }
        ReplCommand::Show => {
            print!("{}", render_form(&state.form));
            if let Some(review) = &state.result {
                println!();
                print!("{}", render_review(review));
            }
            (state, Ok(()))
        }
        ReplCommand::Prompt => {
            let outcome = state
                .form
                .to_request()
                .map_err(anyhow::Error::from)
                .and_then(|request| composition.generate_usecase().preview(&request))
                .map(|prompt| print!("{}", render_prompt(&prompt)));
            (state, outcome)
        }
        ReplCommand::Generate => {
            let (state, outcome) = composition
                .generate_usecase()
                .execute_in_session(state)
                .await;
            if outcome.is_ok()
                && let Some(review) = &state.result
            {
                print!("{}", render_review(review));
                println!("\nhint: /copy to copy this review");
            }
            (state, outcome)
        }
        ReplCommand::History => {
            print!("{}", render_history(&state.history));
            (state, Ok(()))
        }
        ReplCommand::Copy(index) => {
            let (state, copied) = composition
                .copy_usecase()
                .execute_in_session(state, index)
                .await;
            let outcome = match copied {
                Some(true) => {
                    println!("Copied!");
                    Ok(())
                }
                Some(false) => Err(anyhow!(
                    "could not copy to clipboard (no clipboard command found)"
                )),
                None => Err(anyhow!("no review at history index {index}")),
            };
            (state, outcome)
        }
        ReplCommand::Clear => {
            let state = state.apply(Action::ClearForm);
            println!("form cleared ({} review(s) kept in history)", state.history.len());
            (state, Ok(()))
        }
        ReplCommand::InspectConfig => {
            let outcome = composition
                .inspect_config_usecase()
                .execute()
                .map(|json| println!("{json}"));
            (state, outcome)
        }
    }
}

fn parse_repl_command(input: &str) -> Result<ReplCommand, String> {
    if !input.starts_with('/') {
        return Err("slash command only. example: /name Madison".to_string());
    }

    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    let no_args = |cmd: ReplCommand| {
        if rest.is_empty() {
            Ok(cmd)
        } else {
            Err(format!("usage: {command} (takes no arguments)"))
        }
    };

    match command {
        "/exit" | "/quit" => Ok(ReplCommand::Exit),
        "/type" if rest.is_empty() => Ok(ReplCommand::NeedsArgs("/type")),
        "/type" => rest
            .parse::<ReviewType>()
            .map(ReplCommand::SetType)
            .map_err(|err| format!("{err}. usage: /type <ids|g|s>")),
        "/focus" if rest.is_empty() => Ok(ReplCommand::NeedsArgs("/focus")),
        "/focus" => match rest.parse::<u8>() {
            Ok(n) if (MIN_FOCUS_RATING..=MAX_FOCUS_RATING).contains(&n) => {
                Ok(ReplCommand::SetFocus(n))
            }
            _ => Err(format!(
                "usage: /focus <{MIN_FOCUS_RATING}-{MAX_FOCUS_RATING}>"
            )),
        },
        "/name" => Ok(ReplCommand::SetField(FormField::StudentName, rest.to_string())),
        "/topic" => Ok(ReplCommand::SetField(FormField::LessonTopic, rest.to_string())),
        "/phonics" => Ok(ReplCommand::SetField(FormField::PhonicsInfo, rest.to_string())),
        "/notes" => Ok(ReplCommand::SetField(FormField::SessionNotes, rest.to_string())),
        "/show" => no_args(ReplCommand::Show),
        "/prompt" => no_args(ReplCommand::Prompt),
        "/generate" => no_args(ReplCommand::Generate),
        "/history" => no_args(ReplCommand::History),
        "/clear" => no_args(ReplCommand::Clear),
        "/config" => no_args(ReplCommand::InspectConfig),
        "/copy" if rest.is_empty() => Ok(ReplCommand::Copy(0)),
        "/copy" => match rest.parse::<usize>() {
            Ok(n) if n < HISTORY_LIMIT => Ok(ReplCommand::Copy(n)),
            _ => Err(format!("usage: /copy [0-{}]", HISTORY_LIMIT - 1)),
        },
        other => Err(format!("unknown command: {other}")),
    }
}

fn print_welcome(composition: &AppComposition) {
    let interactive = io::stdout().is_terminal();
    if interactive {
        // 대화형 터미널에서는 시작 화면을 지우고 배너를 출력한다.
        print!("\x1b[2J\x1b[H");
    }

    let title = paint("eslreview interactive shell", "1;36", interactive);
    let subtitle = paint("simple-English reviews for one-on-one lessons", "2;37", interactive);
    let cmd_form = paint("/type /name /topic /phonics /notes /focus", "1;33", interactive);
    let cmd_generate = paint("/generate (/prompt to preview)", "1;35", interactive);
    let cmd_copy = paint("/history /copy [index]", "1;32", interactive);
    let cmd_exit = paint("/exit", "1;31", interactive);

    println!("+------------------------------------------------------------+");
    println!("| {:<58} |", title);
    println!("| {:<58} |", subtitle);
    println!("+------------------------------------------------------------+");
    println!("| Status Dashboard                                           |");
    for line in composition.inspect_config_usecase().dashboard_lines() {
        println!("| {:<58} |", fit_box_line(&line, 58));
    }
    println!("+------------------------------------------------------------+");
    println!("| Quick start                                                |");
    println!("|  1) {:<54} |", cmd_form);
    println!("|  2) {:<54} |", cmd_generate);
    println!("|  3) {:<54} |", cmd_copy);
    println!("|  4) {:<54} |", cmd_exit);
    println!("+------------------------------------------------------------+");
    println!();
}

fn paint(text: &str, ansi: &str, interactive: bool) -> String {
    if interactive {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn fit_box_line(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let head: String = chars.into_iter().take(width - 3).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_commands_keep_inner_spaces() {
        assert_eq!(
            parse_repl_command("/notes  Read the story,  then  retold it "),
            Ok(ReplCommand::SetField(
                FormField::SessionNotes,
                "Read the story,  then  retold it".to_string()
            ))
        );
        assert_eq!(
            parse_repl_command("/name"),
            Ok(ReplCommand::SetField(FormField::StudentName, String::new()))
        );
    }

    #[test]
    fn type_and_focus_without_argument_request_prefill() {
        assert_eq!(parse_repl_command("/type"), Ok(ReplCommand::NeedsArgs("/type")));
        assert_eq!(parse_repl_command("/focus"), Ok(ReplCommand::NeedsArgs("/focus")));
    }

    #[test]
    fn type_accepts_codes_and_aliases() {
        assert_eq!(
            parse_repl_command("/type g"),
            Ok(ReplCommand::SetType(ReviewType::GeneralReview))
        );
        assert_eq!(
            parse_repl_command("/type S-Review"),
            Ok(ReplCommand::SetType(ReviewType::SpecificReview))
        );
        assert!(parse_repl_command("/type weekly").is_err());
    }

    #[test]
    fn focus_outside_range_is_rejected() {
        assert_eq!(parse_repl_command("/focus 3"), Ok(ReplCommand::SetFocus(3)));
        assert!(parse_repl_command("/focus 0").is_err());
        assert!(parse_repl_command("/focus 6").is_err());
        assert!(parse_repl_command("/focus high").is_err());
    }

    #[test]
    fn copy_defaults_to_latest() {
        assert_eq!(parse_repl_command("/copy"), Ok(ReplCommand::Copy(0)));
        assert_eq!(parse_repl_command("/copy 9"), Ok(ReplCommand::Copy(9)));
        assert!(parse_repl_command("/copy 10").is_err());
    }

    #[test]
    fn plain_text_and_unknown_commands_are_errors() {
        assert!(parse_repl_command("hello").is_err());
        assert!(parse_repl_command("/review").is_err());
        assert!(parse_repl_command("/generate now").is_err());
        assert_eq!(parse_repl_command("/quit"), Ok(ReplCommand::Exit));
    }

    #[test]
    fn box_lines_are_clipped() {
        assert_eq!(fit_box_line("abcdefghij", 6), "abc...");
        assert_eq!(fit_box_line("short", 58), "short");
    }
}
