// ABOUTME: Output formatting helpers for the lilailian CLI
// ABOUTME: Renders coach outcomes, model diagnoses, errors and the busy spinner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use lilailian::coaching::{CoachOutcome, ExtractedRecord, ModelDiagnosis, ParseFailure, Reply};
use lilailian::errors::{AppError, AppResult, ErrorCode};

/// Spinner on stderr while a model call is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print a coach outcome, structured or raw
pub fn print_outcome(outcome: &CoachOutcome, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    match outcome {
        CoachOutcome::Structured { extracted, reply } => print_structured(extracted, reply)?,
        CoachOutcome::RawText { failure, reply } => print_raw(failure, reply),
    }
    Ok(())
}

fn print_structured(extracted: &ExtractedRecord, reply: &Reply) -> AppResult<()> {
    let record = &extracted.record;

    println!("\n教練說：{}", record.coach_comment_or_default());
    println!("{}", "=".repeat(60));

    if let Some(item) = &record.item_name {
        println!("   Item: {item}");
    }
    if let Some(kind) = &record.record_type {
        println!("   Type: {kind}");
    }
    if let Some(timestamp) = &record.timestamp {
        println!("   Time: {timestamp}");
    }
    if let Some(metrics) = &record.data_metrics {
        for (name, value) in metrics.present() {
            println!("   {name}: {value}");
        }
        for (name, value) in &metrics.extra {
            println!("   {name}: {value}");
        }
    }

    println!("\nRecord JSON:");
    println!("{}", serde_json::to_string_pretty(record)?);

    if let Some(remarks) = &extracted.remarks {
        println!("\n{remarks}");
    }
    print_footer(reply);
    Ok(())
}

fn print_raw(failure: &ParseFailure, reply: &Reply) {
    println!("\n教練的回覆 (no structured record: {}):", failure.reason);
    println!("{}", "=".repeat(60));
    println!("{}", failure.original_text);
    print_footer(reply);
}

fn print_footer(reply: &Reply) {
    println!(
        "\n[{} | {} | {}]",
        reply.model,
        reply.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        reply.submission_id
    );
}

/// Print which models the key can use
pub fn print_diagnosis(diagnosis: &ModelDiagnosis, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(diagnosis)?);
        return Ok(());
    }

    if diagnosis.is_empty() {
        println!("Your API key cannot use any generation model. Create a new key and try again.");
        return Ok(());
    }

    println!("Models available for generateContent:");
    for model in &diagnosis.available {
        match &model.display_name {
            Some(name) => println!("   {} ({name})", model.id()),
            None => println!("   {}", model.id()),
        }
    }

    if diagnosis.configured_available() {
        println!(
            "\nOK: the configured model '{}' is available.",
            diagnosis.configured_model
        );
    } else {
        println!(
            "\nThe configured model '{}' is not in the list. Set LILAILIAN_MODEL or pass --model with one of the names above.",
            diagnosis.configured_model
        );
    }
    Ok(())
}

/// Print an error with a hint for the common cases
pub fn print_error(error: &AppError) {
    eprintln!("Error: {error}");
    match error.code {
        ErrorCode::ConfigMissing => {
            eprintln!("Hint: export GEMINI_API_KEY=<your key> or pass --api-key.");
        }
        ErrorCode::ExternalAuthFailed => {
            eprintln!("Hint: check that the API key is correct and has access to the model.");
        }
        _ => {}
    }
}
