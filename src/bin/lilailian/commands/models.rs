// ABOUTME: Model diagnostics command for the lilailian CLI
// ABOUTME: Lists generation models visible to the API key and checks the configured one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use lilailian::coaching::CoachSession;
use lilailian::errors::AppResult;
use lilailian::llm::LlmProvider;

use crate::helpers::display;

/// List the models the key can use
pub async fn run<P: LlmProvider>(session: &CoachSession<P>, json: bool) -> AppResult<()> {
    let spinner = display::spinner("Listing models...");
    let result = session.diagnose_models().await;
    spinner.finish_and_clear();

    display::print_diagnosis(&result?, json)
}
