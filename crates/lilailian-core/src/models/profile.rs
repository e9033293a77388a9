// ABOUTME: User profile collected before each submission
// ABOUTME: UserProfile and Target with validation of TDEE and body-fat values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{labels, profile_defaults};
use crate::errors::AppError;

/// Current training goal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Lose body fat
    #[default]
    FatLoss,
    /// Build muscle
    MuscleGain,
    /// Hold current composition
    Maintain,
}

impl Target {
    /// All targets in form order
    pub const ALL: [Self; 3] = [Self::FatLoss, Self::MuscleGain, Self::Maintain];

    /// Label rendered into the context tag
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FatLoss => labels::TARGET_FAT_LOSS,
            Self::MuscleGain => labels::TARGET_MUSCLE_GAIN,
            Self::Maintain => labels::TARGET_MAINTAIN,
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

impl FromStr for Target {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(target) = Self::ALL.into_iter().find(|t| t.label() == trimmed) {
            return Ok(target);
        }
        match trimmed.to_lowercase().replace('_', "-").as_str() {
            "fat-loss" | "cut" | "lose" => Ok(Self::FatLoss),
            "muscle-gain" | "bulk" | "gain" => Ok(Self::MuscleGain),
            "maintain" | "maintenance" => Ok(Self::Maintain),
            _ => Err(AppError::invalid_input(format!(
                "unknown target '{trimmed}'; expected one of {}, {}, {} (or fat-loss, muscle-gain, maintain)",
                labels::TARGET_FAT_LOSS,
                labels::TARGET_MUSCLE_GAIN,
                labels::TARGET_MAINTAIN
            ))),
        }
    }
}

/// Profile fields that tailor every model request
///
/// Built once per session and passed by reference into each submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    name: String,
    target: Target,
    tdee: u32,
    body_fat_pct: f64,
}

impl UserProfile {
    /// Create a validated profile
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, TDEE is zero, or the body-fat
    /// percentage is not a finite value between 0 and 100.
    pub fn new(
        name: impl Into<String>,
        target: Target,
        tdee: u32,
        body_fat_pct: f64,
    ) -> Result<Self, AppError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::missing_field("profile name must not be empty"));
        }
        if tdee == 0 {
            return Err(AppError::out_of_range("TDEE must be a positive number"));
        }
        if !body_fat_pct.is_finite() || !(0.0..=100.0).contains(&body_fat_pct) {
            return Err(AppError::out_of_range(format!(
                "body fat must be between 0 and 100 percent, got {body_fat_pct}"
            )));
        }
        Ok(Self {
            name,
            target,
            tdee,
            body_fat_pct,
        })
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Training goal
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Total daily energy expenditure (kcal)
    #[must_use]
    pub const fn tdee(&self) -> u32 {
        self.tdee
    }

    /// Body-fat percentage
    #[must_use]
    pub const fn body_fat_pct(&self) -> f64 {
        self.body_fat_pct
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: profile_defaults::NAME.to_owned(),
            target: Target::default(),
            tdee: profile_defaults::TDEE,
            body_fat_pct: profile_defaults::BODY_FAT_PCT,
        }
    }
}
