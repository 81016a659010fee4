// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors surfaced by the ledger engine.
//!
//! Every engine operation reports failure synchronously through
//! [`LedgerError`]. Validation happens before any write, and store failures
//! inside a transaction leave nothing behind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed input: negative amount, empty name, unknown category, bad period.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Update/delete referencing an id with no current row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// The store is unavailable or the transaction was aborted.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A stored value could not be decoded.
    #[error("Corrupt {column} value '{value}'")]
    Corrupt { column: &'static str, value: String },

    /// A roll-up left the representable decimal range.
    #[error("{what} is out of range")]
    Overflow { what: &'static str },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn asset_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Asset", id }
    }

    pub fn liability_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Liability",
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
