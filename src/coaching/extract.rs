// ABOUTME: Locates and parses the fenced record embedded in a free-form model reply
// ABOUTME: Small fence scanner plus strict serde parsing; failures keep the original text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

//! # Reply Extraction
//!
//! The model is asked for one fenced JSON block but is free to write around
//! it, omit it, or emit several blocks. [`extract_record`] picks the payload
//! with these rules:
//!
//! - the first block tagged `json` (any case)
//! - otherwise the first fenced block of any tag
//! - otherwise the whole reply
//!
//! A fence is a run of three or more backticks. A block closes at the first
//! later bare run at least as long as its opener that is not inside a JSON
//! string, so longer outer fences and backticks inside string values both
//! nest. A run followed by an info string (```` ```json ````) only ever opens
//! a block. A block with no closing fence runs to the end of the reply.
//!
//! When no top-level block is tagged `json`, blocks nested inside other
//! blocks are searched for one before falling back to the first block.
//!
//! Parsing is strict: fields the payload omits stay absent and a number
//! written as a string is a shape mismatch. A failure is an ordinary outcome
//! carrying the untouched reply for display.

use std::ops::Range;

use serde::Serialize;
use serde_json::error::Category;
use thiserror::Error;

use crate::models::CoachRecord;

/// Shortest backtick run that counts as a fence
const MIN_FENCE_LEN: usize = 3;

/// Tag that marks a block as structured data
const JSON_TAG: &str = "json";

/// Where the parsed payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    /// A block tagged `json`
    TaggedJson,
    /// The first fenced block, untagged or tagged otherwise
    Fenced,
    /// No fence at all; the whole reply was the candidate
    WholeText,
}

/// A record pulled out of a reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRecord {
    /// The parsed record
    pub record: CoachRecord,
    /// Which rule selected the payload
    pub payload_source: PayloadSource,
    /// Conversational text around the block, trimmed
    pub remarks: Option<String>,
}

/// Why a reply did not yield a record
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The selected candidate is empty after trimming
    #[error("the structured block is empty")]
    EmptyPayload,
    /// The candidate is not valid JSON
    #[error("the structured block is not valid JSON (line {line}, column {column}): {detail}")]
    MalformedSyntax {
        /// 1-based line within the candidate
        line: usize,
        /// 1-based column within the candidate
        column: usize,
        /// Parser message
        detail: String,
    },
    /// The candidate is JSON but not a record
    #[error("the structured block does not match the record layout: {detail}")]
    ShapeMismatch {
        /// Parser message
        detail: String,
    },
}

/// Extraction failure; carries the reply verbatim for fallback display
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{reason}")]
pub struct ParseFailure {
    /// The complete reply, unmodified
    pub original_text: String,
    /// Which rule selected the failed candidate
    pub payload_source: PayloadSource,
    /// What went wrong
    pub reason: FailureReason,
}

/// A fenced block located in the reply (byte offsets)
#[derive(Debug, Clone, PartialEq, Eq)]
struct FencedBlock {
    /// From the opening fence to just past the closing fence
    outer: Range<usize>,
    /// Payload between the fences
    content: Range<usize>,
    /// Info string right after the opening fence
    tag: Range<usize>,
}

/// Extract a coach record from a model reply
///
/// Pure: the same input always produces the same result.
///
/// # Errors
///
/// Returns a [`ParseFailure`] holding the original text when the selected
/// candidate is empty, not JSON, or not shaped like a record.
pub fn extract_record(text: &str) -> Result<ExtractedRecord, ParseFailure> {
    let blocks = scan_blocks(text, 0..text.len());
    let selected = blocks
        .iter()
        .find(|block| is_json_tagged(text, block))
        .cloned()
        .or_else(|| find_nested_json(text, &blocks))
        .map(|block| (block, PayloadSource::TaggedJson))
        .or_else(|| blocks.first().cloned().map(|block| (block, PayloadSource::Fenced)));

    let (candidate, payload_source, remarks) = match selected {
        Some((block, source)) => (
            &text[block.content.clone()],
            source,
            join_remarks(&text[..block.outer.start], &text[block.outer.end..]),
        ),
        None => (text, PayloadSource::WholeText, None),
    };

    parse_candidate(candidate)
        .map(|record| ExtractedRecord {
            record,
            payload_source,
            remarks,
        })
        .map_err(|reason| ParseFailure {
            original_text: text.to_owned(),
            payload_source,
            reason,
        })
}

fn is_json_tagged(text: &str, block: &FencedBlock) -> bool {
    text[block.tag.clone()].eq_ignore_ascii_case(JSON_TAG)
}

/// Depth-first search for a `json` block inside the contents of `blocks`
fn find_nested_json(text: &str, blocks: &[FencedBlock]) -> Option<FencedBlock> {
    blocks.iter().find_map(|block| {
        let inner = scan_blocks(text, block.content.clone());
        inner
            .iter()
            .find(|candidate| is_json_tagged(text, candidate))
            .cloned()
            .or_else(|| find_nested_json(text, &inner))
    })
}

fn parse_candidate(candidate: &str) -> Result<CoachRecord, FailureReason> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(FailureReason::EmptyPayload);
    }
    serde_json::from_str::<CoachRecord>(trimmed).map_err(|e| match e.classify() {
        Category::Data => FailureReason::ShapeMismatch {
            detail: e.to_string(),
        },
        Category::Syntax | Category::Eof | Category::Io => FailureReason::MalformedSyntax {
            line: e.line(),
            column: e.column(),
            detail: e.to_string(),
        },
    })
}

fn join_remarks(before: &str, after: &str) -> Option<String> {
    let pieces: Vec<&str> = [before.trim(), after.trim()]
        .into_iter()
        .filter(|piece| !piece.is_empty())
        .collect();
    if pieces.is_empty() {
        None
    } else {
        Some(pieces.join("\n\n"))
    }
}

// ============================================================================
// Fence Scanner
// ============================================================================

/// Pair fences sequentially within `within`; offsets index into `text`
fn scan_blocks(text: &str, within: Range<usize>) -> Vec<FencedBlock> {
    let bytes = &text.as_bytes()[..within.end];
    let mut blocks = Vec::new();
    let mut cursor = within.start;

    while let Some(opener) = next_fence(bytes, cursor) {
        let tag_start = opener.end;
        let tag_end = tag_start
            + bytes[tag_start..]
                .iter()
                .take_while(|b| is_tag_byte(**b))
                .count();

        let line_end = bytes[tag_end..]
            .iter()
            .position(|b| *b == b'\n')
            .map_or(bytes.len(), |offset| tag_end + offset);
        let content_start = if text[tag_end..line_end].trim().is_empty() {
            (line_end + 1).min(bytes.len())
        } else {
            tag_end
        };

        let min_len = opener.len();
        match closing_fence(bytes, content_start, min_len) {
            Some(closer) => {
                blocks.push(FencedBlock {
                    outer: opener.start..closer.end,
                    content: content_start..closer.start,
                    tag: tag_start..tag_end,
                });
                cursor = closer.end;
            }
            None => {
                blocks.push(FencedBlock {
                    outer: opener.start..bytes.len(),
                    content: content_start..bytes.len(),
                    tag: tag_start..tag_end,
                });
                break;
            }
        }
    }

    blocks
}

const fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-')
}

/// A run that ends where no info string follows; only these close blocks
fn is_bare_run(bytes: &[u8], run_end: usize) -> bool {
    !bytes.get(run_end).copied().is_some_and(is_tag_byte)
}

/// Length of the backtick run starting at `start`
fn run_len(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|b| **b == b'`').count()
}

/// First backtick run of fence length at or after `from`
fn next_fence(bytes: &[u8], from: usize) -> Option<Range<usize>> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let len = run_len(bytes, i);
            if len >= MIN_FENCE_LEN {
                return Some(i..i + len);
            }
            i += len;
        } else {
            i += 1;
        }
    }
    None
}

/// Closing run for a block whose content starts at `from`
///
/// Only bare runs close a block. Runs inside double-quoted strings are skipped. A raw line break ends a
/// string, since JSON strings cannot span lines. When the content ends inside
/// an unterminated string, quoting is ignored and the first long-enough run
/// closes the block.
fn closing_fence(bytes: &[u8], from: usize, min_len: usize) -> Option<Range<usize>> {
    let mut in_string = false;
    let mut escaped = false;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' || b == b'\n' {
                in_string = false;
            }
            i += 1;
        } else if b == b'"' {
            in_string = true;
            i += 1;
        } else if b == b'`' {
            let len = run_len(bytes, i);
            if len >= min_len && is_bare_run(bytes, i + len) {
                return Some(i..i + len);
            }
            i += len;
        } else {
            i += 1;
        }
    }

    if in_string {
        return first_run_at_least(bytes, from, min_len);
    }
    None
}

fn first_run_at_least(bytes: &[u8], from: usize, min_len: usize) -> Option<Range<usize>> {
    let mut cursor = from;
    while let Some(run) = next_fence(bytes, cursor) {
        if run.len() >= min_len && is_bare_run(bytes, run.end) {
            return Some(run);
        }
        cursor = run.end;
    }
    None
}
