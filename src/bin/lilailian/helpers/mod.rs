// ABOUTME: Re-exports helper modules for the lilailian CLI
// ABOUTME: Provides access to output formatting utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

pub mod display;
