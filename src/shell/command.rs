//! Subprocess execution.
//!
//! Commands are argument lists, never shell strings: the program is
//! `argv[0]` and every other element is passed through unchanged.

use crate::error::{ImportScanError, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Standard output and standard error interleaved in arrival order.
    pub combined: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The text of the line, whichever stream it came from.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(s) | Self::Stderr(s) => s,
        }
    }
}

/// Render an argument list for display.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(argv: &[String], options: &CommandOptions) -> Result<Command> {
    let (program, args) = argv.split_first().ok_or_else(|| ImportScanError::CommandSpawn {
        command: String::new(),
        message: "empty command".to_string(),
    })?;

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null());
    Ok(cmd)
}

fn spawn_error(argv: &[String], e: std::io::Error) -> ImportScanError {
    ImportScanError::CommandSpawn {
        command: display_command(argv),
        message: e.to_string(),
    }
}

/// Execute a command, capturing stdout and stderr separately.
///
/// `combined` holds stdout followed by stderr.
pub fn execute(argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Executing: {}", display_command(argv));

    let output = build(argv, options)?
        .output()
        .map_err(|e| spawn_error(argv, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let combined = format!("{}{}", stdout, stderr);

    Ok(CommandResult {
        exit_code: output.status.code(),
        success: output.status.success(),
        stdout,
        stderr,
        combined,
        duration: start.elapsed(),
    })
}

/// Send each line of `stream` until EOF.
///
/// Invalid UTF-8 is replaced rather than ending the stream.
fn forward_lines<R: Read>(
    stream: R,
    tx: &Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(wrap(line)).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!("Stopped reading command output: {}", e);
                break;
            }
        }
    }
}

/// Execute a command, streaming each output line to `callback`.
///
/// Lines from both streams are delivered and recorded in `combined` in the
/// order they arrive. The callback runs on the calling thread.
pub fn execute_streaming(
    argv: &[String],
    options: &CommandOptions,
    callback: &dyn Fn(&OutputLine),
) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Executing: {}", display_command(argv));

    let mut cmd = build(argv, options)?;
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| spawn_error(argv, e))?;

    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::new();

    if let Some(stdout) = child.stdout.take() {
        let tx = tx.clone();
        readers.push(thread::spawn(move || forward_lines(stdout, &tx, OutputLine::Stdout)));
    }

    if let Some(stderr) = child.stderr.take() {
        let tx = tx.clone();
        readers.push(thread::spawn(move || forward_lines(stderr, &tx, OutputLine::Stderr)));
    }

    // Only the reader threads hold senders now; the loop ends when both close.
    drop(tx);

    let mut stdout = String::new();
    let mut stderr = String::new();
    let mut combined = String::new();

    for line in rx {
        callback(&line);
        match &line {
            OutputLine::Stdout(text) => {
                stdout.push_str(text);
                stdout.push('\n');
            }
            OutputLine::Stderr(text) => {
                stderr.push_str(text);
                stderr.push('\n');
            }
        }
        combined.push_str(line.text());
        combined.push('\n');
    }

    for reader in readers {
        let _ = reader.join();
    }

    let status = child.wait().map_err(|e| spawn_error(argv, e))?;

    Ok(CommandResult {
        exit_code: status.code(),
        success: status.success(),
        stdout,
        stderr,
        combined,
        duration: start.elapsed(),
    })
}
