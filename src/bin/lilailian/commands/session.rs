// ABOUTME: Interactive session command for the lilailian CLI
// ABOUTME: Reads one submission per stdin line with a fixed profile; failures do not end the loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::io::{self, Write};

use lilailian::coaching::{CoachSession, Submission};
use lilailian::errors::{AppError, AppResult};
use lilailian::llm::{ImageAttachment, LlmProvider};
use lilailian::models::UserProfile;
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::helpers::display;

const IMAGE_COMMAND: &str = ":image";
const QUIT_COMMANDS: [&str; 2] = [":quit", ":q"];

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
enum SessionLine<'a> {
    Skip,
    Quit,
    Note(&'a str),
    Image { path: &'a str, note: Option<&'a str> },
    MissingImagePath,
}

fn parse_line(line: &str) -> SessionLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return SessionLine::Skip;
    }
    if QUIT_COMMANDS.contains(&line) {
        return SessionLine::Quit;
    }
    let Some(rest) = line.strip_prefix(IMAGE_COMMAND) else {
        return SessionLine::Note(line);
    };
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return SessionLine::Note(line);
    }
    let rest = rest.trim_start();
    if rest.is_empty() {
        return SessionLine::MissingImagePath;
    }
    match rest.split_once(char::is_whitespace) {
        Some((path, note)) => {
            let note = note.trim();
            SessionLine::Image {
                path,
                note: (!note.is_empty()).then_some(note),
            }
        }
        None => SessionLine::Image {
            path: rest,
            note: None,
        },
    }
}

/// One read from stdin
#[derive(Debug)]
enum Input {
    Line(String),
    Unreadable(AppError),
    End,
}

/// Read one line; a line that is not UTF-8 is consumed and reported, not fatal
async fn read_input<R: AsyncBufRead + Unpin>(reader: &mut R) -> AppResult<Input> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(Input::End);
    }
    Ok(match String::from_utf8(buf) {
        Ok(line) => Input::Line(line),
        Err(e) => Input::Unreadable(
            AppError::invalid_input("input line is not valid UTF-8; skipped").with_source(e),
        ),
    })
}

fn prompt() {
    eprint!("> ");
    // A failed flush only loses the prompt marker
    let _ = io::stderr().flush();
}

/// Run submissions from stdin until end of input or `:quit`
pub async fn run<P: LlmProvider>(
    session: &CoachSession<P>,
    profile: &UserProfile,
    json: bool,
) -> AppResult<()> {
    eprintln!(
        "哩來練 session for {} ({}). Type a note, `:image PATH [note]`, or `:quit`.",
        profile.name(),
        profile.target()
    );

    let mut reader = BufReader::new(stdin());
    prompt();
    loop {
        let line = match read_input(&mut reader).await? {
            Input::Line(line) => line,
            Input::Unreadable(e) => {
                display::print_error(&e);
                prompt();
                continue;
            }
            Input::End => break,
        };
        let submission = match parse_line(&line) {
            SessionLine::Skip => {
                prompt();
                continue;
            }
            SessionLine::Quit => break,
            SessionLine::MissingImagePath => {
                display::print_error(&AppError::missing_field("usage: :image PATH [note]"));
                prompt();
                continue;
            }
            SessionLine::Note(note) => Ok(Submission::note(note)),
            SessionLine::Image { path, note } => ImageAttachment::from_path(path)
                .await
                .map(|image| Submission::new(note.map(str::to_owned), Some(image))),
        };

        if let Err(e) = submit_one(session, profile, submission, json).await {
            debug!(code = ?e.code, "Submission failed; continuing session");
            display::print_error(&e);
        }
        prompt();
    }
    Ok(())
}

async fn submit_one<P: LlmProvider>(
    session: &CoachSession<P>,
    profile: &UserProfile,
    submission: AppResult<Submission>,
    json: bool,
) -> AppResult<()> {
    let submission = submission?;
    let spinner = display::spinner("教練分析中...");
    let result = session.submit(profile, submission).await;
    spinner.finish_and_clear();
    display::print_outcome(&result?, json)
}
