// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod billing;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod fixed;
pub mod installments;
pub mod logging;
pub mod models;
pub mod purchases;
pub mod repo;
pub mod session;
pub mod stats;
pub mod store;
pub mod utils;
