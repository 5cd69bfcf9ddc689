//! Official rules ("Технолог").
//!
//! Cover raises the target's armor and never affects the hit roll.
//! Vehicles take damage exactly like infantry: every die that beats armor
//! is one wound. Special weapon rules are not interpreted.

use tracing::debug;

use super::{EditionId, EditionInfo, RulesEdition};
use crate::dice::{self, DiceNotation, DiceSource};
use crate::types::{
    DamageResult, Fortification, HitResult, MeleeResult, MeleeWinner, Target, WeaponSpecial,
};

static INFO: EditionInfo = EditionInfo {
    id: EditionId::Tehnolog,
    name: "Технолог",
    source: "docs/original/Bronepekhota_Pravila_05_08_08.pdf",
    description: "Официальные правила. Укрытие повышает броню цели, техника получает урон как пехота.",
    features: &[
        "Укрытие: +1/+2/+3 к броне",
        "Каждый кубик выше брони наносит 1 ранение",
        "Особые свойства оружия не применяются",
    ],
    color: "#ef4444",
    supports_special_effects: false,
};

/// Armor added by cover
pub fn armor_bonus(fortification: Fortification) -> i32 {
    match fortification {
        Fortification::None => 0,
        Fortification::Light => 1,
        Fortification::Bunker => 2,
        Fortification::Heavy => 3,
    }
}

/// The official rules edition
#[derive(Debug, Clone, Copy, Default)]
pub struct Tehnolog;

impl RulesEdition for Tehnolog {
    fn info(&self) -> &'static EditionInfo {
        &INFO
    }

    fn calculate_hit(
        &self,
        range: &str,
        distance: i32,
        _fortification: Fortification,
        dice: &mut dyn DiceSource,
    ) -> HitResult {
        let outcome = dice::roll(range, dice);
        HitResult {
            success: outcome.total >= distance,
            roll: outcome.rolls.first().copied().unwrap_or(0),
            total: outcome.total,
            is_grenade: false,
        }
    }

    fn calculate_damage(
        &self,
        power: &str,
        target: &Target,
        _special: Option<&WeaponSpecial>,
        dice: &mut dyn DiceSource,
    ) -> DamageResult {
        let effective_armor = target.armor.saturating_add(armor_bonus(target.fortification));
        debug!(
            power,
            armor = target.armor,
            fortification = %target.fortification,
            effective_armor,
            "resolving official damage"
        );

        let rolls = DiceNotation::parse(power).roll_each(dice);
        let damage = rolls.iter().filter(|&&r| r > effective_armor).count() as u32;
        DamageResult {
            damage,
            rolls,
            special: None,
        }
    }

    fn calculate_melee(
        &self,
        attacker_melee: i32,
        defender_melee: i32,
        dice: &mut dyn DiceSource,
    ) -> MeleeResult {
        let attacker_roll = dice::roll_die(6, dice);
        let defender_roll = dice::roll_die(6, dice);
        let attacker_total = attacker_melee.saturating_add(attacker_roll as i32);
        let defender_total = defender_melee.saturating_add(defender_roll as i32);

        let winner = if attacker_total > defender_total {
            MeleeWinner::Attacker
        } else if defender_total > attacker_total {
            MeleeWinner::Defender
        } else {
            MeleeWinner::Draw
        };

        MeleeResult {
            attacker_roll,
            attacker_total,
            defender_roll,
            defender_total,
            winner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{LoadedDice, MELEE_RANGE};
    use crate::types::VehicleTarget;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hit_compares_total_to_distance() {
        let mut dice = LoadedDice::new(vec![4]);
        let hit = Tehnolog.calculate_hit("D6", 4, Fortification::None, &mut dice);
        assert!(hit.success);
        assert_eq!((hit.roll, hit.total), (4, 4));

        let mut dice = LoadedDice::new(vec![3]);
        assert!(!Tehnolog.calculate_hit("D6", 4, Fortification::None, &mut dice).success);
    }

    #[test]
    fn test_hit_bonus() {
        let mut dice = LoadedDice::new(vec![2]);
        let hit = Tehnolog.calculate_hit("D6+2", 4, Fortification::None, &mut dice);
        assert_eq!(hit.roll, 2);
        assert_eq!(hit.total, 4);
        assert!(hit.success);
    }

    #[test]
    fn test_hit_ignores_fortification() {
        let results: Vec<HitResult> = Fortification::ALL
            .into_iter()
            .map(|f| Tehnolog.calculate_hit("D6", 3, f, &mut LoadedDice::new(vec![3])))
            .collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert!(results[0].success);
    }

    #[test]
    fn test_hit_melee_range() {
        let mut dice = LoadedDice::new(vec![6]);
        let hit = Tehnolog.calculate_hit(MELEE_RANGE, 1, Fortification::None, &mut dice);
        assert_eq!((hit.roll, hit.total), (0, 0));
        assert!(!hit.success);
    }

    #[test]
    fn test_damage_virtual_fire() {
        let mut dice = LoadedDice::new(vec![3, 1]);
        let result = Tehnolog.calculate_damage("2D6", &Target::infantry(2), None, &mut dice);
        assert_eq!(result.rolls, vec![3, 1]);
        assert_eq!(result.damage, 1);
    }

    #[test]
    fn test_damage_light_cover_raises_armor() {
        let target = Target::infantry(2).with_fortification(Fortification::Light);
        let mut dice = LoadedDice::new(vec![3, 2]);
        let result = Tehnolog.calculate_damage("2D6", &target, None, &mut dice);
        assert_eq!(result.damage, 0);
    }

    #[test]
    fn test_damage_cover_table() {
        assert_eq!(armor_bonus(Fortification::None), 0);
        assert_eq!(armor_bonus(Fortification::Light), 1);
        assert_eq!(armor_bonus(Fortification::Bunker), 2);
        assert_eq!(armor_bonus(Fortification::Heavy), 3);

        let bunker = Target::infantry(4).with_fortification(Fortification::Bunker);
        let mut dice = LoadedDice::new(vec![7, 6]);
        assert_eq!(Tehnolog.calculate_damage("D12", &bunker, None, &mut dice).damage, 1);
        assert_eq!(Tehnolog.calculate_damage("D12", &bunker, None, &mut dice).damage, 0);
    }

    #[test]
    fn test_damage_bonus_applies_per_die() {
        let mut dice = LoadedDice::new(vec![3, 4]);
        let result = Tehnolog.calculate_damage("2D6+2", &Target::infantry(5), None, &mut dice);
        assert_eq!(result.rolls, vec![5, 6]);
        assert_eq!(result.damage, 1);
    }

    #[test]
    fn test_oversized_power_rolls_fallback_die() {
        let mut dice = LoadedDice::new(vec![3]);
        let result = Tehnolog.calculate_damage("D6+3000000000", &Target::infantry(2), None, &mut dice);
        assert_eq!(result.rolls, vec![3]);
        assert_eq!(result.damage, 1);
    }

    #[test]
    fn test_extreme_stats_saturate() {
        let fortress = Target::infantry(i32::MAX).with_fortification(Fortification::Heavy);
        let mut dice = LoadedDice::new(vec![20]);
        assert_eq!(Tehnolog.calculate_damage("D20", &fortress, None, &mut dice).damage, 0);

        let mut dice = LoadedDice::new(vec![6, 1]);
        let result = Tehnolog.calculate_melee(i32::MAX, 0, &mut dice);
        assert_eq!(result.attacker_total, i32::MAX);
        assert_eq!(result.winner, MeleeWinner::Attacker);
    }

    #[test]
    fn test_vehicle_damaged_like_infantry() {
        let vehicle = Target::vehicle(0, VehicleTarget::new(7, 9));
        let mut dice = LoadedDice::new(vec![5, 11]);
        let result = Tehnolog.calculate_damage("2D12", &vehicle, None, &mut dice);
        assert_eq!(result.damage, 2);
        assert_eq!(result.rolls, vec![5, 11]);
    }

    #[test]
    fn test_special_is_ignored() {
        let special = WeaponSpecial::from("Взрыв 2ш - 1D20");
        let mut dice = LoadedDice::new(vec![10, 2, 18, 4]);
        let result =
            Tehnolog.calculate_damage("4D20", &Target::infantry(3), Some(&special), &mut dice);
        assert_eq!(result.special, None);
        assert_eq!(result.damage, 3);
    }

    #[test]
    fn test_melee() {
        let mut dice = LoadedDice::new(vec![4, 3]);
        let result = Tehnolog.calculate_melee(3, 2, &mut dice);
        assert_eq!(result.attacker_roll, 4);
        assert_eq!(result.attacker_total, 7);
        assert_eq!(result.defender_roll, 3);
        assert_eq!(result.defender_total, 5);
        assert_eq!(result.winner, MeleeWinner::Attacker);

        let mut dice = LoadedDice::new(vec![3, 3]);
        assert_eq!(Tehnolog.calculate_melee(2, 2, &mut dice).winner, MeleeWinner::Draw);

        let mut dice = LoadedDice::new(vec![1, 6]);
        assert_eq!(Tehnolog.calculate_melee(2, 2, &mut dice).winner, MeleeWinner::Defender);
    }
}
