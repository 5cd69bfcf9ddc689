//! Combat actions resolved through a rule edition.
//!
//! A combat action is one of shot, grenade or melee. This module validates
//! the parameters a player sets up, runs the edition's hit/damage/melee
//! functions in the right order, and summarises the outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::dice::{self, DiceSource};
use crate::error::RulesError;
use crate::rules::RulesEdition;
use crate::types::{
    DamageResult, Fortification, HitResult, MeleeResult, MeleeWinner, Target, VehicleTarget,
    WeaponSpecial,
};

/// Power of a thrown grenade
pub const GRENADE_POWER: &str = "1D20";

/// Longest distance a ranged action can target
pub const MAX_DISTANCE: i32 = 20;

/// Highest armor or melee stat a target can have
pub const MAX_STAT: i32 = 10;

/// Kind of combat action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatAction {
    Shot,
    Melee,
    Grenade,
}

impl CombatAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatAction::Shot => "shot",
            CombatAction::Melee => "melee",
            CombatAction::Grenade => "grenade",
        }
    }
}

impl FromStr for CombatAction {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shot" => Ok(CombatAction::Shot),
            "melee" => Ok(CombatAction::Melee),
            "grenade" => Ok(CombatAction::Grenade),
            _ => Err(RulesError::UnknownAction(s.to_string())),
        }
    }
}

/// A weapon profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub range: String,
    pub power: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<WeaponSpecial>,
}

impl Weapon {
    pub fn new(name: impl Into<String>, range: impl Into<String>, power: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            power: power.into(),
            special: None,
        }
    }

    pub fn with_special(mut self, special: impl Into<WeaponSpecial>) -> Self {
        self.special = Some(special.into());
        self
    }
}

/// Parameters the player sets before rolling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatParameters {
    /// Distance to the target in steps
    pub distance: i32,
    pub target_armor: i32,
    pub target_melee: i32,
    #[serde(default)]
    pub fortification: Fortification,
}

/// A single invalid combat parameter
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParameterError {
    #[error("distance must be between 1 and 20, got {0}")]
    DistanceOutOfRange(i32),

    #[error("armor must be between 0 and 10, got {0}")]
    ArmorOutOfRange(i32),

    #[error("target melee must be between 0 and 10, got {0}")]
    MeleeOutOfRange(i32),

    #[error("grenades already used")]
    GrenadesSpent,
}

/// Check parameters for an action, reporting every violation at once
pub fn validate_parameters(
    action: CombatAction,
    params: &CombatParameters,
    grenades_available: bool,
) -> Result<(), RulesError> {
    let mut errors = Vec::new();

    match action {
        CombatAction::Shot | CombatAction::Grenade => {
            if !(1..=MAX_DISTANCE).contains(&params.distance) {
                errors.push(ParameterError::DistanceOutOfRange(params.distance));
            }
            if !(0..=MAX_STAT).contains(&params.target_armor) {
                errors.push(ParameterError::ArmorOutOfRange(params.target_armor));
            }
            if action == CombatAction::Grenade && !grenades_available {
                errors.push(ParameterError::GrenadesSpent);
            }
        }
        CombatAction::Melee => {
            if !(0..=MAX_STAT).contains(&params.target_melee) {
                errors.push(ParameterError::MeleeOutOfRange(params.target_melee));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RulesError::InvalidParameters(errors))
    }
}

/// Everything one combat action produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatResult {
    pub action: CombatAction,
    pub parameters: CombatParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit: Option<HitResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<DamageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub melee: Option<MeleeResult>,
}

impl CombatResult {
    pub fn summary(&self) -> Summary {
        if self.action == CombatAction::Melee {
            if let Some(melee) = &self.melee {
                return match melee.winner {
                    MeleeWinner::Attacker => Summary::MeleeVictory,
                    MeleeWinner::Defender => Summary::CounterAttack,
                    MeleeWinner::Draw => Summary::MeleeDraw,
                };
            }
        }

        match (&self.hit, &self.damage) {
            (Some(hit), _) if !hit.success => Summary::Miss,
            (Some(_), Some(damage)) if damage.damage == 0 => Summary::NoPenetration,
            (Some(_), Some(damage)) => Summary::Wounds(damage.damage),
            _ => Summary::Completed,
        }
    }
}

/// One-line verdict shown to players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Summary {
    Miss,
    NoPenetration,
    Wounds(u32),
    MeleeVictory,
    CounterAttack,
    MeleeDraw,
    Completed,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Miss => f.write_str("Промах"),
            Summary::NoPenetration => f.write_str("Попадание, но не пробито"),
            Summary::Wounds(n) => write!(f, "Попадание: {n} ранений"),
            Summary::MeleeVictory => f.write_str("Победа в ближнем бою"),
            Summary::CounterAttack => f.write_str("Контратака"),
            Summary::MeleeDraw => f.write_str("Ничья в ближнем бою"),
            Summary::Completed => f.write_str("Завершено"),
        }
    }
}

/// Fire a weapon: range check first, then power against the target on a hit
pub fn resolve_shot(
    edition: &dyn RulesEdition,
    weapon: &Weapon,
    params: &CombatParameters,
    vehicle: Option<&VehicleTarget>,
    dice: &mut dyn DiceSource,
) -> CombatResult {
    let hit = edition.calculate_hit(&weapon.range, params.distance, params.fortification, dice);

    let damage = if hit.success {
        let target = Target {
            armor: params.target_armor,
            fortification: params.fortification,
            vehicle: vehicle.cloned(),
        };
        edition.calculate_damage(&weapon.power, &target, weapon.special.as_ref(), dice)
    } else {
        DamageResult::default()
    };
    debug!(
        edition = %edition.id(),
        weapon = %weapon.name,
        hit = hit.success,
        damage = damage.damage,
        "shot resolved"
    );

    CombatResult {
        action: CombatAction::Shot,
        parameters: *params,
        hit: Some(hit),
        damage: Some(damage),
        melee: None,
    }
}

/// Throw a grenade: it always lands, the D6 only says how far it scatters
pub fn resolve_grenade(
    edition: &dyn RulesEdition,
    params: &CombatParameters,
    dice: &mut dyn DiceSource,
) -> CombatResult {
    let scatter = dice::roll_die(6, dice);
    let hit = HitResult {
        success: true,
        roll: scatter,
        total: scatter as i32,
        is_grenade: true,
    };

    let target = Target::infantry(params.target_armor).with_fortification(params.fortification);
    let damage = edition.calculate_damage(GRENADE_POWER, &target, None, dice);
    debug!(edition = %edition.id(), scatter, damage = damage.damage, "grenade resolved");

    CombatResult {
        action: CombatAction::Grenade,
        parameters: *params,
        hit: Some(hit),
        damage: Some(damage),
        melee: None,
    }
}

pub fn resolve_melee(
    edition: &dyn RulesEdition,
    attacker_melee: i32,
    params: &CombatParameters,
    dice: &mut dyn DiceSource,
) -> CombatResult {
    let melee = edition.calculate_melee(attacker_melee, params.target_melee, dice);
    debug!(edition = %edition.id(), winner = ?melee.winner, "melee resolved");

    CombatResult {
        action: CombatAction::Melee,
        parameters: *params,
        hit: None,
        damage: None,
        melee: Some(melee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::LoadedDice;
    use crate::rules::{Fan, Tehnolog};
    use pretty_assertions::assert_eq;

    fn params(distance: i32, armor: i32) -> CombatParameters {
        CombatParameters {
            distance,
            target_armor: armor,
            target_melee: 2,
            fortification: Fortification::None,
        }
    }

    #[test]
    fn test_validate_shot_ranges() {
        assert!(validate_parameters(CombatAction::Shot, &params(5, 3), true).is_ok());
        assert_eq!(
            validate_parameters(CombatAction::Shot, &params(0, 11), true),
            Err(RulesError::InvalidParameters(vec![
                ParameterError::DistanceOutOfRange(0),
                ParameterError::ArmorOutOfRange(11),
            ]))
        );
    }

    #[test]
    fn test_validate_grenade_needs_grenades() {
        assert_eq!(
            validate_parameters(CombatAction::Grenade, &params(3, 2), false),
            Err(RulesError::InvalidParameters(vec![ParameterError::GrenadesSpent]))
        );
    }

    #[test]
    fn test_validate_melee_ignores_distance() {
        let mut p = params(0, 99);
        assert!(validate_parameters(CombatAction::Melee, &p, false).is_ok());
        p.target_melee = -1;
        assert!(validate_parameters(CombatAction::Melee, &p, false).is_err());
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("grenade".parse::<CombatAction>(), Ok(CombatAction::Grenade));
        assert_eq!(
            "charge".parse::<CombatAction>(),
            Err(RulesError::UnknownAction("charge".into()))
        );
    }

    #[test]
    fn test_shot_hit_then_damage() {
        let rifle = Weapon::new("Винтовка", "D6", "2D6");
        let mut dice = LoadedDice::new(vec![5, 4, 1]);
        let result = resolve_shot(&Tehnolog, &rifle, &params(3, 2), None, &mut dice);
        assert!(result.hit.as_ref().unwrap().success);
        assert_eq!(result.damage.as_ref().unwrap().rolls, vec![4, 1]);
        assert_eq!(result.summary(), Summary::Wounds(1));
        assert_eq!(result.summary().to_string(), "Попадание: 1 ранений");
    }

    #[test]
    fn test_shot_miss_skips_damage_roll() {
        let rifle = Weapon::new("Винтовка", "D6", "2D6");
        let mut dice = LoadedDice::new(vec![1, 6, 6]);
        let result = resolve_shot(&Tehnolog, &rifle, &params(3, 2), None, &mut dice);
        assert_eq!(result.damage, Some(DamageResult::default()));
        assert_eq!(result.summary(), Summary::Miss);
        assert_eq!(dice.rolled(), 1);
    }

    #[test]
    fn test_shot_no_penetration() {
        let rifle = Weapon::new("Винтовка", "D12", "D6");
        let mut dice = LoadedDice::new(vec![8, 2]);
        let result = resolve_shot(&Fan, &rifle, &params(3, 4), None, &mut dice);
        assert_eq!(result.summary(), Summary::NoPenetration);
    }

    #[test]
    fn test_shot_passes_weapon_special() {
        let mortar = Weapon::new("Миномёт", "D20", "4D20").with_special("Взрыв 2ш - 1D20");
        let mut dice = LoadedDice::new(vec![15, 10, 10, 10, 10]);
        let result = resolve_shot(&Fan, &mortar, &params(10, 3), None, &mut dice);
        let special = result.damage.unwrap().special.unwrap();
        assert!(special.description.contains("2ш"));
    }

    #[test]
    fn test_shot_at_vehicle_uses_zones_in_fan() {
        let cannon = Weapon::new("Пушка", "D12", "D12");
        let tank = VehicleTarget::new(7, 9);
        let mut dice = LoadedDice::new(vec![10, 11]);
        let result = resolve_shot(&Fan, &cannon, &params(5, 0), Some(&tank), &mut dice);
        assert_eq!(result.damage.unwrap().damage, 2);
    }

    #[test]
    fn test_grenade_always_lands() {
        let mut dice = LoadedDice::new(vec![4, 12]);
        let result = resolve_grenade(&Tehnolog, &params(3, 5), &mut dice);
        let hit = result.hit.as_ref().unwrap();
        assert!(hit.success);
        assert!(hit.is_grenade);
        assert_eq!(hit.roll, 4);
        assert_eq!(result.damage.as_ref().unwrap().rolls, vec![12]);
        assert_eq!(result.summary(), Summary::Wounds(1));
    }

    #[test]
    fn test_melee_summary() {
        let mut dice = LoadedDice::new(vec![3, 3]);
        let result = resolve_melee(&Fan, 2, &params(1, 0), &mut dice);
        assert_eq!(result.summary(), Summary::MeleeDraw);
        assert_eq!(result.summary().to_string(), "Ничья в ближнем бою");

        let mut dice = LoadedDice::new(vec![6, 1]);
        let result = resolve_melee(&Tehnolog, 2, &params(1, 0), &mut dice);
        assert_eq!(result.summary(), Summary::MeleeVictory);
    }
}
