//! Rule editions.
//!
//! Each edition is a self-contained implementation of hit, damage and melee
//! resolution over the shared dice module. Editions never call into each
//! other, so either can be replaced without touching the other.

pub mod fan;
pub mod tehnolog;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dice::DiceSource;
use crate::error::RulesError;
use crate::types::{DamageResult, Fortification, HitResult, MeleeResult, Target, WeaponSpecial};

pub use fan::Fan;
pub use tehnolog::Tehnolog;

/// Identifier of a rule edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditionId {
    /// The official rules
    Tehnolog,
    /// The fan edition
    Fan,
}

impl EditionId {
    pub const ALL: [EditionId; 2] = [EditionId::Tehnolog, EditionId::Fan];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditionId::Tehnolog => "tehnolog",
            EditionId::Fan => "fan",
        }
    }
}

impl FromStr for EditionId {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| RulesError::UnknownEdition(s.to_string()))
    }
}

impl fmt::Display for EditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata for an edition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionInfo {
    pub id: EditionId,
    pub name: &'static str,
    /// Rulebook the edition is transcribed from
    pub source: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    /// Theme colour for selectors, as a CSS hex code
    pub color: &'static str,
    pub supports_special_effects: bool,
}

/// Hit, damage and melee resolution for one edition of the rules
pub trait RulesEdition: Send + Sync {
    fn info(&self) -> &'static EditionInfo;

    /// Roll the weapon's range against the distance to the target
    fn calculate_hit(
        &self,
        range: &str,
        distance: i32,
        fortification: Fortification,
        dice: &mut dyn DiceSource,
    ) -> HitResult;

    /// Roll the weapon's power against the target
    fn calculate_damage(
        &self,
        power: &str,
        target: &Target,
        special: Option<&WeaponSpecial>,
        dice: &mut dyn DiceSource,
    ) -> DamageResult;

    /// Opposed D6 + melee stat rolls
    fn calculate_melee(
        &self,
        attacker_melee: i32,
        defender_melee: i32,
        dice: &mut dyn DiceSource,
    ) -> MeleeResult;

    fn id(&self) -> EditionId {
        self.info().id
    }

    fn name(&self) -> &'static str {
        self.info().name
    }

    fn supports_special_effects(&self) -> bool {
        self.info().supports_special_effects
    }
}

impl fmt::Debug for dyn RulesEdition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RulesEdition").field(&self.id()).finish()
    }
}
