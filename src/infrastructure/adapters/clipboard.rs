//! 클립보드 포트 구현 어댑터.
//! 플랫폼 클립보드 명령에 stdin으로 텍스트를 넘긴다.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::Clipboard;

/// 먼저 발견되는 명령을 사용한다.
const CLIPBOARD_COMMANDS: &[&[&str]] = &[
    &["pbcopy"],
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
    &["clip"],
];

/// 로컬 클립보드 명령 기반 어댑터.
pub struct CommandClipboard;

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn copy(&self, text: &str) -> Result<()> {
        let Some(cmd) = CLIPBOARD_COMMANDS
            .iter()
            .find(|cmd| which::which(cmd[0]).is_ok())
        else {
            bail!("no clipboard command found (tried pbcopy, wl-copy, xclip, xsel, clip)");
        };
        debug!(command = cmd[0], "copy to clipboard");
        pipe_to_command(cmd, text).await
    }
}

async fn pipe_to_command(cmd: &[&str], text: &str) -> Result<()> {
    let program = cmd[0];
    let mut child = Command::new(program)
        .args(&cmd[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to run clipboard command: {program}"))?;

    let mut stdin = child
        .stdin
        .take()
        .context("failed to open clipboard command stdin")?;
    let written = stdin.write_all(text.as_bytes()).await;
    // EOF를 보내야 명령이 종료된다.
    drop(stdin);

    // 쓰기 실패여도 자식 프로세스는 회수한다.
    let status = child
        .wait()
        .await
        .with_context(|| format!("failed to wait for {program}"))?;
    written.with_context(|| format!("failed to write to {program}"))?;

    if !status.success() {
        bail!("clipboard command failed: {program} ({status})");
    }
    Ok(())
}
