//! Registry of the available rule editions.
//!
//! The set of editions is fixed at compile time. Identifiers that come from
//! storage or user input must be checked with [`is_valid`] (or parsed into
//! [`EditionId`]) before use.

use crate::error::RulesError;
use crate::rules::{Fan, RulesEdition, Tehnolog};

pub use crate::rules::EditionId;

static TEHNOLOG: Tehnolog = Tehnolog;
static FAN: Fan = Fan;

/// All editions, in display order
pub static EDITIONS: [&'static dyn RulesEdition; 2] = [&TEHNOLOG, &FAN];

/// The edition used when none has been chosen
pub fn default_edition() -> EditionId {
    EditionId::Tehnolog
}

pub fn get(id: EditionId) -> &'static dyn RulesEdition {
    match id {
        EditionId::Tehnolog => &TEHNOLOG,
        EditionId::Fan => &FAN,
    }
}

/// Look up an edition by its string identifier
pub fn lookup(id: &str) -> Result<&'static dyn RulesEdition, RulesError> {
    id.parse().map(get)
}

pub fn list_all() -> &'static [&'static dyn RulesEdition] {
    &EDITIONS
}

pub fn is_valid(id: &str) -> bool {
    EditionId::ALL.iter().any(|known| known.as_str() == id)
}
