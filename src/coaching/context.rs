// ABOUTME: Formats the user profile into the context line sent first in every request
// ABOUTME: Produces "[User: .., Target: .., TDEE: .., Current_Fat: ..%]"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use crate::models::UserProfile;

/// Render the profile as the model's context tag
///
/// Body fat keeps at least one decimal place (`25.0`, `18.5`).
#[must_use]
pub fn build_context_tag(profile: &UserProfile) -> String {
    format!(
        "[User: {}, Target: {}, TDEE: {}, Current_Fat: {}%]",
        profile.name(),
        profile.target().label(),
        profile.tdee(),
        format_body_fat(profile.body_fat_pct())
    )
}

/// Plain decimal notation, never an exponent, with a `.0` on whole numbers
fn format_body_fat(pct: f64) -> String {
    let mut rendered = pct.to_string();
    if !rendered.contains('.') {
        rendered.push_str(".0");
    }
    rendered
}
