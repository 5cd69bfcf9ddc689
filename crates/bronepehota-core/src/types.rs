//! Value types shared by both rule editions.
//!
//! Everything here is computed fresh per call. Field names serialize in
//! camelCase because the results are handed to a JavaScript front end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dice::DieType;
use crate::error::RulesError;

/// A target's cover level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fortification {
    #[default]
    None,
    Light,
    Bunker,
    Heavy,
}

impl Fortification {
    pub const ALL: [Fortification; 4] = [
        Fortification::None,
        Fortification::Light,
        Fortification::Bunker,
        Fortification::Heavy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fortification::None => "none",
            Fortification::Light => "light",
            Fortification::Bunker => "bunker",
            Fortification::Heavy => "heavy",
        }
    }
}

impl FromStr for Fortification {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fortification::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| RulesError::UnknownFortification(s.to_string()))
    }
}

impl fmt::Display for Fortification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a range check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitResult {
    pub success: bool,
    /// First raw die face, 0 for the melee sentinel
    pub roll: u32,
    /// Evaluated total including the bonus
    pub total: i32,
    /// Set for grenade throws, where the roll is a scatter distance
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_grenade: bool,
}

/// Which side won a melee exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeleeWinner {
    Attacker,
    Defender,
    Draw,
}

/// Opposed D6 + melee stat rolls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeleeResult {
    pub attacker_roll: u32,
    pub attacker_total: i32,
    pub defender_roll: u32,
    pub defender_total: i32,
    pub winner: MeleeWinner,
}

impl MeleeResult {
    /// Wounds dealt to the loser: the margin between the totals
    pub fn damage(&self) -> u32 {
        self.attacker_total.abs_diff(self.defender_total)
    }
}

/// Kind of special weapon effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Aoe,
    Repair,
    Burst,
}

/// A structured special effect, as weapon data may declare it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpecialEffect {
    /// Explosion hitting everything within `radius` steps
    Aoe { radius: u32, damage: String },
    /// Restores `amount` durability, optionally to units within `range`
    Repair {
        amount: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<u32>,
    },
    /// Several shots fired in separate directions
    Burst { count: u32, directions: Vec<String> },
}

impl SpecialEffect {
    pub fn kind(&self) -> EffectKind {
        match self {
            SpecialEffect::Aoe { .. } => EffectKind::Aoe,
            SpecialEffect::Repair { .. } => EffectKind::Repair,
            SpecialEffect::Burst { .. } => EffectKind::Burst,
        }
    }
}

/// A weapon's special rule: free text from the data sheet, or structured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeaponSpecial {
    Effect(SpecialEffect),
    Text(String),
}

impl From<&str> for WeaponSpecial {
    fn from(text: &str) -> Self {
        WeaponSpecial::Text(text.to_string())
    }
}

impl From<SpecialEffect> for WeaponSpecial {
    fn from(effect: SpecialEffect) -> Self {
        WeaponSpecial::Effect(effect)
    }
}

/// A special effect as resolved for display and application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOutcome {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    pub description: String,
    /// Added to accumulated damage; negative values heal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
}

/// Outcome of a power roll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageResult {
    pub damage: u32,
    /// Each die's face with the bonus already added
    pub rolls: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialOutcome>,
}

/// Vehicle health band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneColor {
    Green,
    Yellow,
    Red,
}

/// Damage a penetrating die deals, by die size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagePerDie {
    #[serde(rename = "D6")]
    pub d6: u32,
    #[serde(rename = "D12")]
    pub d12: u32,
    #[serde(rename = "D20")]
    pub d20: u32,
}

impl DamagePerDie {
    pub const STANDARD: DamagePerDie = DamagePerDie {
        d6: 1,
        d12: 2,
        d20: 3,
    };

    pub fn for_die(&self, die: DieType) -> u32 {
        match die {
            DieType::D6 => self.d6,
            DieType::D12 => self.d12,
            DieType::D20 => self.d20,
        }
    }
}

impl Default for DamagePerDie {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// One band of a vehicle's durability track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurabilityZone {
    /// Zone ceiling: a die must exceed this to penetrate
    pub max: i32,
    pub color: ZoneColor,
    #[serde(default)]
    pub damage_per_die: DamagePerDie,
}

impl DurabilityZone {
    pub fn new(max: i32, color: ZoneColor) -> Self {
        Self {
            max,
            color,
            damage_per_die: DamagePerDie::STANDARD,
        }
    }
}

/// Vehicle state needed for zone-based damage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTarget {
    pub current_durability: i32,
    pub durability_max: i32,
    /// Explicit zones from the vehicle's data sheet, overriding the default thirds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durability_zones: Option<Vec<DurabilityZone>>,
}

impl VehicleTarget {
    pub fn new(current_durability: i32, durability_max: i32) -> Self {
        Self {
            current_durability,
            durability_max,
            durability_zones: None,
        }
    }

    pub fn with_zones(mut self, zones: Vec<DurabilityZone>) -> Self {
        self.durability_zones = Some(zones);
        self
    }
}

/// What a power roll is resolved against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub armor: i32,
    #[serde(default)]
    pub fortification: Fortification,
    /// Present when the target is a vehicle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleTarget>,
}

impl Target {
    pub fn infantry(armor: i32) -> Self {
        Self {
            armor,
            fortification: Fortification::None,
            vehicle: None,
        }
    }

    pub fn vehicle(armor: i32, vehicle: VehicleTarget) -> Self {
        Self {
            armor,
            fortification: Fortification::None,
            vehicle: Some(vehicle),
        }
    }

    pub fn with_fortification(mut self, fortification: Fortification) -> Self {
        self.fortification = fortification;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fortification_from_str() {
        assert_eq!("heavy".parse::<Fortification>(), Ok(Fortification::Heavy));
        assert_eq!("none".parse::<Fortification>(), Ok(Fortification::None));
        assert_eq!(
            "sandbags".parse::<Fortification>(),
            Err(RulesError::UnknownFortification("sandbags".into()))
        );
    }

    #[test]
    fn test_melee_damage_is_margin() {
        let result = MeleeResult {
            attacker_roll: 4,
            attacker_total: 7,
            defender_roll: 3,
            defender_total: 5,
            winner: MeleeWinner::Attacker,
        };
        assert_eq!(result.damage(), 2);
    }

    #[test]
    fn test_weapon_special_deserializes_text_or_effect() {
        let text: WeaponSpecial = serde_json::from_str(r#""Ремонт 2""#).unwrap();
        assert_eq!(text, WeaponSpecial::Text("Ремонт 2".into()));

        let effect: WeaponSpecial =
            serde_json::from_str(r#"{"type":"aoe","radius":2,"damage":"1D20"}"#).unwrap();
        assert_eq!(
            effect,
            WeaponSpecial::Effect(SpecialEffect::Aoe {
                radius: 2,
                damage: "1D20".into()
            })
        );
    }

    #[test]
    fn test_damage_result_json_shape() {
        let result = DamageResult {
            damage: 0,
            rolls: vec![5],
            special: Some(SpecialOutcome {
                kind: EffectKind::Repair,
                description: "Ремонт 2 повреждений".into(),
                additional_damage: Some(-2),
                targets: None,
            }),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["special"]["type"], "repair");
        assert_eq!(json["special"]["additionalDamage"], -2);
        assert!(json["special"].get("targets").is_none());
    }

    #[test]
    fn test_zone_json_uses_die_names() {
        let zone: DurabilityZone = serde_json::from_str(
            r#"{"max":5,"color":"yellow","damagePerDie":{"D6":1,"D12":2,"D20":3}}"#,
        )
        .unwrap();
        assert_eq!(zone, DurabilityZone::new(5, ZoneColor::Yellow));
    }

    #[test]
    fn test_hit_result_omits_grenade_flag_when_unset() {
        let hit = HitResult {
            success: true,
            roll: 4,
            total: 4,
            is_grenade: false,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert!(json.get("isGrenade").is_none());
    }
}
