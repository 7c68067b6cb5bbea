// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the nestegg library.

/// All errors the ledger, store, and adapters can produce.
///
/// Validation variants are raised before any state is touched, so a caller
/// receiving one can assume the in-memory state is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum NesteggError {
    /// A required name was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// The category already exists in the registry.
    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    /// The category is not present in the registry.
    #[error("category '{0}' not found")]
    UnknownCategory(String),

    /// The name is reserved (`Total`, the All filter).
    #[error("'{0}' is a reserved name")]
    ReservedCategory(String),

    /// The fallback category receives reassigned records and cannot be deleted.
    #[error("cannot delete the fallback category '{0}'")]
    FallbackCategory(String),

    /// Reorder target outside the registry.
    #[error("position {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Negative or zero where not allowed, or a sum outside `Decimal` range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid color '{0}', expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("unknown category domain '{0}', expected 'asset' or 'budget'")]
    InvalidDomain(String),

    /// The Total budget row only accepts metadata edits.
    #[error("the Total row is derived from the other budgets and cannot be edited directly")]
    DerivedRow,

    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("{kind} id prefix '{key}' is ambiguous")]
    Ambiguous { kind: &'static str, key: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The insight service answered with something we could not use.
    #[error("insight error: {0}")]
    Insight(String),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, NesteggError>;
