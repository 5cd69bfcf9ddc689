//! Special weapon effects from free-text weapon data.
//!
//! Weapon sheets describe special rules in prose. Only three phrasings
//! carry mechanics, and each has one pattern below:
//!
//! - AoE: `Взрыв 2ш - 1D20` (explosion, 2-step radius, 1D20 damage)
//! - Repair: `Ремонт 2` or `Ремонт 2 повреждения`
//! - Burst: `3 выстрела в 3х направлениях`
//!
//! Text matching none of them has no mechanical effect. If weapon data is
//! reworded, these patterns must follow.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{EffectKind, SpecialEffect, SpecialOutcome, WeaponSpecial};

/// Firing directions a burst covers, in order
pub const BURST_DIRECTIONS: [&str; 3] = ["вперёд", "влево-вперёд", "вправо-вперёд"];

static AOE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Взрыв\s+([0-9]+)ш\s*[-–]\s*([0-9]+D[0-9]+)").expect("aoe effect regex")
});

static REPAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Ремонт\s+([0-9]+)").expect("repair effect regex"));

static BURST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s+выстрел.*?([0-9]+)[xх]\s+направл").expect("burst effect regex")
});

pub fn parse_aoe(text: &str) -> Option<SpecialEffect> {
    let caps = AOE.captures(text)?;
    Some(SpecialEffect::Aoe {
        radius: caps[1].parse().ok()?,
        damage: caps[2].to_string(),
    })
}

pub fn parse_repair(text: &str) -> Option<SpecialEffect> {
    let caps = REPAIR.captures(text)?;
    Some(SpecialEffect::Repair {
        amount: caps[1].parse().ok()?,
        range: None,
    })
}

pub fn parse_burst(text: &str) -> Option<SpecialEffect> {
    let caps = BURST.captures(text)?;
    let count: u32 = caps[1].parse().ok()?;
    Some(SpecialEffect::Burst {
        count,
        directions: BURST_DIRECTIONS
            .iter()
            .take(count as usize)
            .map(|d| d.to_string())
            .collect(),
    })
}

/// Try each pattern in turn: AoE, then repair, then burst
pub fn parse(text: &str) -> Option<SpecialEffect> {
    parse_aoe(text)
        .or_else(|| parse_repair(text))
        .or_else(|| parse_burst(text))
}

/// Empty text counts as no special rule at all. Whitespace is still a rule,
/// one that matches no pattern.
pub fn is_present(special: &WeaponSpecial) -> bool {
    match special {
        WeaponSpecial::Text(text) => !text.is_empty(),
        WeaponSpecial::Effect(_) => true,
    }
}

/// Resolve a weapon's special rule into its displayable outcome
pub fn resolve(special: &WeaponSpecial) -> Option<SpecialOutcome> {
    match special {
        WeaponSpecial::Text(text) => {
            let effect = parse(text)?;
            Some(match effect {
                // Text names the shot count; only the listed directions become targets
                SpecialEffect::Burst { count, directions } => SpecialOutcome {
                    kind: EffectKind::Burst,
                    description: format!("{count} выстрела в {count} направлениях"),
                    additional_damage: None,
                    targets: Some(directions),
                },
                other => describe(&other),
            })
        }
        WeaponSpecial::Effect(effect) => Some(describe(effect)),
    }
}

/// Outcome for a structured effect
pub fn describe(effect: &SpecialEffect) -> SpecialOutcome {
    match effect {
        SpecialEffect::Aoe { radius, .. } => SpecialOutcome {
            kind: EffectKind::Aoe,
            description: format!("Взрыв в радиусе {radius}ш"),
            // rolled separately for each target in the blast
            additional_damage: Some(0),
            targets: None,
        },
        SpecialEffect::Repair { amount, range } => {
            let mut description = format!("Ремонт {amount} повреждений");
            if let Some(range) = range {
                description.push_str(&format!(" (радиус {range})"));
            }
            SpecialOutcome {
                kind: EffectKind::Repair,
                description,
                additional_damage: Some(-amount),
                targets: None,
            }
        }
        SpecialEffect::Burst { count, directions } => SpecialOutcome {
            kind: EffectKind::Burst,
            description: format!("{count} выстрела в {} направлениях", directions.len()),
            additional_damage: None,
            targets: Some(directions.clone()),
        },
    }
}
