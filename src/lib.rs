// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget;
pub mod categories;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod insight;
pub mod ledger;
pub mod models;
pub mod money;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod theme;
pub mod trend;
pub mod utils;
