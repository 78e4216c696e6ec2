// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors raised by the payroll engine and its repositories.
///
/// Every variant aborts the operation that produced it; the engine never
/// returns partial results alongside an error.
#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl PayrollError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PayrollError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        PayrollError::NotFound(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        PayrollError::InconsistentState(msg.into())
    }
}

pub type PayrollResult<T> = std::result::Result<T, PayrollError>;
