// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared between UI and fetch logic.

pub mod address;
pub mod email;
pub mod feed;
pub mod route;
