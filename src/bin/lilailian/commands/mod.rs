// ABOUTME: Re-exports command modules for the lilailian CLI
// ABOUTME: Provides access to the analyze, session and models commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

pub mod analyze;
pub mod models;
pub mod session;
