// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assets;
pub mod budgets;
pub mod categories;
pub mod filter;
pub mod reports;
pub mod exporter;
pub mod importer;
pub mod insight;
pub mod settings;
pub mod doctor;
