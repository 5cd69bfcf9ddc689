//! Fan edition ("Фанатская Редакция", after Panov's rules).
//!
//! Differences from the official rules:
//! - cover adds to the effective distance of the hit roll, never to armor;
//! - vehicles take damage by durability zone: a die must beat the ceiling of
//!   the vehicle's current zone, and then deals damage by die size;
//! - special weapon rules (explosions, repair, bursts) are interpreted.

use tracing::debug;

use super::{EditionId, EditionInfo, RulesEdition};
use crate::dice::{self, DiceNotation, DiceSource};
use crate::effects;
use crate::types::{
    DamageResult, DurabilityZone, Fortification, HitResult, MeleeResult, MeleeWinner, Target,
    VehicleTarget, WeaponSpecial, ZoneColor,
};

static INFO: EditionInfo = EditionInfo {
    id: EditionId::Fan,
    name: "Фанатская Редакция",
    source: "docs/panov/rules-originnal.pdf",
    description: "Фанатская редакция правил Панова. Укрытие увеличивает дистанцию, техника получает урон по зонам прочности.",
    features: &[
        "Укрытие: +1/+2 к дистанции",
        "Зоны прочности техники: D6=1, D12=2, D20=3",
        "Взрывы, ремонт и очереди",
    ],
    color: "#3b82f6",
    supports_special_effects: true,
};

/// Distance added by cover. Bunker and heavy cover give the same bonus.
pub fn distance_bonus(fortification: Fortification) -> i32 {
    match fortification {
        Fortification::None => 0,
        Fortification::Light => 1,
        Fortification::Bunker => 2,
        Fortification::Heavy => 2,
    }
}

fn ceil_third(n: i32) -> i32 {
    n.div_euclid(3) + i32::from(n.rem_euclid(3) != 0)
}

/// Zones derived from maximum durability: ceilings at 2/3, 1/3 and 0
pub fn default_zones(durability_max: i32) -> [DurabilityZone; 3] {
    [
        // ceil(2m/3) == m - floor(m/3), without doubling m first
        DurabilityZone::new(durability_max - durability_max.div_euclid(3), ZoneColor::Green),
        DurabilityZone::new(ceil_third(durability_max), ZoneColor::Yellow),
        DurabilityZone::new(0, ZoneColor::Red),
    ]
}

/// The zone a vehicle is currently in.
///
/// Zones are scanned from the highest ceiling down; the first one whose
/// ceiling lies below current durability is active. Explicit zones from the
/// vehicle's data take precedence over the derived thirds.
pub fn active_zone(vehicle: &VehicleTarget) -> DurabilityZone {
    let mut zones = match &vehicle.durability_zones {
        Some(zones) if !zones.is_empty() => zones.clone(),
        _ => default_zones(vehicle.durability_max).to_vec(),
    };
    zones.sort_by(|a, b| b.max.cmp(&a.max));
    zones
        .into_iter()
        .find(|zone| zone.max < vehicle.current_durability)
        .unwrap_or_else(|| DurabilityZone::new(0, ZoneColor::Red))
}

fn infantry_damage(power: &str, armor: i32, dice: &mut dyn DiceSource) -> DamageResult {
    let rolls = DiceNotation::parse(power).roll_each(dice);
    let damage = rolls.iter().filter(|&&r| r > armor).count() as u32;
    DamageResult {
        damage,
        rolls,
        special: None,
    }
}

fn vehicle_damage(power: &str, vehicle: &VehicleTarget, dice: &mut dyn DiceSource) -> DamageResult {
    let notation = DiceNotation::parse(power);
    let zone = active_zone(vehicle);
    let per_die = zone.damage_per_die.for_die(notation.die_type());
    debug!(
        power,
        current = vehicle.current_durability,
        zone = ?zone.color,
        ceiling = zone.max,
        per_die,
        "resolving zone damage"
    );

    let rolls = notation.roll_each(dice);
    let penetrating = rolls.iter().filter(|&&r| r > zone.max).count() as u32;
    let damage = penetrating.saturating_mul(per_die);
    DamageResult {
        damage,
        rolls,
        special: None,
    }
}

/// The fan rules edition
#[derive(Debug, Clone, Copy, Default)]
pub struct Fan;

impl RulesEdition for Fan {
    fn info(&self) -> &'static EditionInfo {
        &INFO
    }

    fn calculate_hit(
        &self,
        range: &str,
        distance: i32,
        fortification: Fortification,
        dice: &mut dyn DiceSource,
    ) -> HitResult {
        let effective_distance = distance.saturating_add(distance_bonus(fortification));
        let outcome = dice::roll(range, dice);
        debug!(range, distance, effective_distance, total = outcome.total, "resolving fan hit");
        HitResult {
            success: outcome.total >= effective_distance,
            roll: outcome.rolls.first().copied().unwrap_or(0),
            total: outcome.total,
            is_grenade: false,
        }
    }

    fn calculate_damage(
        &self,
        power: &str,
        target: &Target,
        special: Option<&WeaponSpecial>,
        dice: &mut dyn DiceSource,
    ) -> DamageResult {
        // A special rule overrides everything else, including vehicle zones
        if let Some(special) = special.filter(|s| effects::is_present(s)) {
            let mut result = infantry_damage(power, target.armor, dice);
            result.special = effects::resolve(special);
            return result;
        }

        match &target.vehicle {
            Some(vehicle) => vehicle_damage(power, vehicle, dice),
            None => infantry_damage(power, target.armor, dice),
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
