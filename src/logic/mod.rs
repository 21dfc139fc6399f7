// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effecting and pure business logic behind the pages.

pub mod api;
pub mod export;
pub mod mock_feed;
pub mod search;
