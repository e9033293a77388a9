// ABOUTME: Single-submission command for the lilailian CLI
// ABOUTME: Loads the optional photo, sends one request, and prints the coach outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::path::PathBuf;

use lilailian::coaching::{CoachSession, Submission};
use lilailian::errors::AppResult;
use lilailian::llm::{ImageAttachment, LlmProvider};
use lilailian::models::UserProfile;
use tracing::info;

use crate::helpers::display;

/// Analyze one photo and/or note
pub async fn run<P: LlmProvider>(
    session: &CoachSession<P>,
    profile: &UserProfile,
    note: Option<String>,
    image: Option<PathBuf>,
    json: bool,
) -> AppResult<()> {
    let image = match image {
        Some(path) => Some(ImageAttachment::from_path(&path).await?),
        None => None,
    };
    let submission = Submission::new(note, image);

    info!(model = session.model(), "Analyzing submission");
    let spinner = display::spinner("教練分析中...");
    let result = session.submit(profile, submission).await;
    spinner.finish_and_clear();

    display::print_outcome(&result?, json)
}
