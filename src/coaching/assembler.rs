// ABOUTME: Builds the ordered content parts for one model invocation
// ABOUTME: Context tag first, then the optional note, then the optional photo
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use super::context::build_context_tag;
use crate::constants::labels;
use crate::errors::{AppError, AppResult};
use crate::llm::{ContentPart, ImageAttachment};
use crate::models::UserProfile;

/// What the user handed in for one request
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Free-text note
    pub note: Option<String>,
    /// Meal photo or workout screenshot
    pub image: Option<ImageAttachment>,
}

impl Submission {
    /// Submission with both parts optional
    #[must_use]
    pub const fn new(note: Option<String>, image: Option<ImageAttachment>) -> Self {
        Self { note, image }
    }

    /// Note-only submission
    #[must_use]
    pub fn note(note: impl Into<String>) -> Self {
        Self::new(Some(note.into()), None)
    }

    /// Photo-only submission
    #[must_use]
    pub const fn image(image: ImageAttachment) -> Self {
        Self::new(None, Some(image))
    }

    /// Attach a note
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The note, if it is non-empty
    #[must_use]
    pub fn effective_note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }

    /// Whether a photo is attached
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// True when there is nothing to send
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effective_note().is_none() && self.image.is_none()
    }
}

/// Build the content parts for a submission
///
/// # Errors
///
/// Returns a missing-field error, and builds nothing, when the submission has
/// neither a non-empty note nor a photo.
pub fn assemble(profile: &UserProfile, submission: Submission) -> AppResult<Vec<ContentPart>> {
    if submission.is_empty() {
        return Err(AppError::missing_field(
            "send a note, a photo, or both; an empty submission is not sent to the coach",
        ));
    }

    let mut parts = Vec::with_capacity(3);
    parts.push(ContentPart::Text(build_context_tag(profile)));
    if let Some(note) = submission.effective_note() {
        parts.push(ContentPart::Text(format!("{}{note}", labels::USER_NOTE_PREFIX)));
    }
    if let Some(image) = submission.image {
        parts.push(ContentPart::Image(image));
    }
    Ok(parts)
}
