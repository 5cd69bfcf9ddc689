//! Errors returned by the rules engine.
//!
//! Dice resolution itself never fails; these cover identifier parsing and
//! combat parameter validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::ParameterError;

/// Errors that can occur when selecting rules or preparing a combat action
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RulesError {
    #[error("Unknown rule edition: {0}")]
    UnknownEdition(String),

    #[error("Unknown fortification: {0}")]
    UnknownFortification(String),

    #[error("Unknown combat action: {0}")]
    UnknownAction(String),

    #[error("Invalid combat parameters: {}", join_errors(.0))]
    InvalidParameters(Vec<ParameterError>),
}

fn join_errors(errors: &[ParameterError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
