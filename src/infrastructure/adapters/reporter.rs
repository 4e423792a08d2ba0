//! 콘솔 리포터 포트 구현 어댑터.

use std::io::{self, IsTerminal};

use crate::application::ports::Reporter;

/// 콘솔 전용 리포터 어댑터. `quiet`이면 진행 상황을 출력하지 않는다.
pub struct ConsoleReporter {
    interactive: bool,
    quiet: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ConsoleReporter {
    /// stderr가 TTY일 때만 상태 색상을 사용한다.
    pub fn new(quiet: bool) -> Self {
        Self {
            interactive: io::stderr().is_terminal(),
            quiet,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        if self.quiet {
            return;
        }
        eprintln!();
        eprintln!("==================== {} ====================", name);
    }

    fn kv(&self, key: &str, value: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{:<12}: {}", key, value);
    }

    fn status(&self, scope: &str, message: &str) {
        if self.quiet {
            return;
        }
        let message = if self.interactive {
            colorize_status(message)
        } else {
            message.to_string()
        };
        eprintln!("[{:<12}] {}", scope, message);
    }
}

fn colorize_status(status: &str) -> String {
    match status {
        "done" => format!("\x1b[32m{status}\x1b[0m"),
        s if s.starts_with("waiting") => format!("\x1b[33m{s}\x1b[0m"),
        s if s.starts_with("failed") => format!("\x1b[31m{s}\x1b[0m"),
        _ => status.to_string(),
    }
}
