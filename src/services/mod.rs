// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod auth;
pub mod auth_db;
pub mod auth_middleware;
pub mod logging;
pub mod session_store;
